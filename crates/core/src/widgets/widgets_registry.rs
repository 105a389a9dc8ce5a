use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, info, warn};
use uuid::Uuid;

use super::widgets_io::{check_widgets, export_widgets, parse_widgets};
use super::widgets_model::{NewWidget, WidgetConfig, WidgetsRecord};
use super::widgets_traits::WidgetRegistryTrait;
use crate::constants::WIDGETS_STORAGE_KEY;
use crate::errors::{Error, Result, ValidationError};
use crate::storage::{load_json, save_json, KeyValueStore};

pub struct WidgetRegistry {
    store: Arc<dyn KeyValueStore>,
    widgets: RwLock<Vec<WidgetConfig>>,
}

impl WidgetRegistry {
    /// Load the stored widget list. A missing record starts empty; a
    /// corrupt one is an error so it is never silently overwritten.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let record: WidgetsRecord =
            load_json(store.as_ref(), WIDGETS_STORAGE_KEY)?.unwrap_or_default();
        info!("Loaded {} widgets", record.widgets.len());

        Ok(Self {
            store,
            widgets: RwLock::new(record.widgets),
        })
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<WidgetConfig>> {
        match self.widgets.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Widget registry lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<WidgetConfig>> {
        match self.widgets.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Widget registry lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn reorder_locked(&self, current: &mut Vec<WidgetConfig>, from: usize, to: usize) -> Result<()> {
        let len = current.len();
        for index in [from, to] {
            if index >= len {
                return Err(ValidationError::IndexOutOfRange { index, len }.into());
            }
        }
        if from == to {
            return Ok(());
        }

        let mut next = current.clone();
        let moved = next.remove(from);
        next.insert(to, moved);
        self.commit(current, next)
    }

    /// Persist `next`, then make it the current list.
    fn commit(&self, current: &mut Vec<WidgetConfig>, next: Vec<WidgetConfig>) -> Result<()> {
        let record = WidgetsRecord { widgets: next };
        save_json(self.store.as_ref(), WIDGETS_STORAGE_KEY, &record)?;
        *current = record.widgets;
        Ok(())
    }
}

impl WidgetRegistryTrait for WidgetRegistry {
    fn widgets(&self) -> Vec<WidgetConfig> {
        self.read().clone()
    }

    fn get(&self, id: &str) -> Option<WidgetConfig> {
        self.read().iter().find(|w| w.id == id).cloned()
    }

    fn add(&self, config: WidgetConfig) -> Result<()> {
        config.validate()?;

        let mut current = self.write();
        if current.iter().any(|w| w.id == config.id) {
            return Err(ValidationError::DuplicateId(config.id).into());
        }

        debug!("Adding widget {} ({})", config.name, config.id);
        let mut next = Vec::with_capacity(current.len() + 1);
        next.push(config);
        next.extend(current.iter().cloned());
        self.commit(&mut current, next)
    }

    fn create(&self, new_widget: NewWidget) -> Result<WidgetConfig> {
        let config = new_widget.into_config(Uuid::new_v4().to_string())?;
        self.add(config.clone())?;
        Ok(config)
    }

    fn update(&self, config: WidgetConfig) -> Result<()> {
        config.validate()?;

        let mut current = self.write();
        let Some(index) = current.iter().position(|w| w.id == config.id) else {
            return Err(Error::WidgetNotFound(config.id));
        };

        let mut next = current.clone();
        next[index] = config;
        self.commit(&mut current, next)
    }

    fn remove(&self, id: &str) -> Result<bool> {
        let mut current = self.write();
        if !current.iter().any(|w| w.id == id) {
            debug!("Remove ignored, widget {} not found", id);
            return Ok(false);
        }

        let next = current.iter().filter(|w| w.id != id).cloned().collect();
        self.commit(&mut current, next)?;
        Ok(true)
    }

    fn reorder(&self, from: usize, to: usize) -> Result<()> {
        let mut current = self.write();
        self.reorder_locked(&mut current, from, to)
    }

    fn move_widget(&self, active_id: &str, over_id: &str) -> Result<bool> {
        if active_id == over_id {
            return Ok(false);
        }

        let mut current = self.write();
        let from = current.iter().position(|w| w.id == active_id);
        let to = current.iter().position(|w| w.id == over_id);
        let (Some(from), Some(to)) = (from, to) else {
            return Ok(false);
        };

        self.reorder_locked(&mut current, from, to)?;
        Ok(true)
    }

    fn replace_all(&self, widgets: Vec<WidgetConfig>) -> Result<()> {
        check_widgets(&widgets)?;

        let mut current = self.write();
        info!("Replacing {} widgets with {}", current.len(), widgets.len());
        self.commit(&mut current, widgets)
    }

    fn import_json(&self, raw: &str) -> Result<usize> {
        let widgets = parse_widgets(raw)?;
        let count = widgets.len();

        let mut current = self.write();
        info!("Importing {} widgets", count);
        self.commit(&mut current, widgets)?;
        Ok(count)
    }

    fn export_json(&self) -> Result<String> {
        export_widgets(&self.read())
    }
}
