use std::sync::{Arc, RwLock};

use log::{debug, warn};

use super::{ThemeMode, ThemeSettings};
use crate::constants::THEME_STORAGE_KEY;
use crate::errors::Result;
use crate::storage::{load_json, save_json, KeyValueStore};

pub trait ThemeServiceTrait: Send + Sync {
    fn theme(&self) -> ThemeMode;

    fn set_theme(&self, theme: ThemeMode) -> Result<()>;

    /// Flip between dark and light, returning the new mode.
    fn toggle_theme(&self) -> Result<ThemeMode>;
}

pub struct ThemeService {
    store: Arc<dyn KeyValueStore>,
    current: RwLock<ThemeMode>,
}

impl ThemeService {
    /// Load the stored theme. A missing or unreadable record falls back to dark.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let theme = match load_json::<ThemeSettings>(store.as_ref(), THEME_STORAGE_KEY) {
            Ok(Some(settings)) => settings.theme,
            Ok(None) => ThemeMode::default(),
            Err(e) => {
                warn!("Ignoring stored theme: {}", e);
                ThemeMode::default()
            }
        };
        debug!("Theme loaded: {}", theme);

        Self {
            store,
            current: RwLock::new(theme),
        }
    }
}

impl ThemeServiceTrait for ThemeService {
    fn theme(&self) -> ThemeMode {
        match self.current.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn set_theme(&self, theme: ThemeMode) -> Result<()> {
        let mut current = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Theme lock poisoned, recovering");
                poisoned.into_inner()
            }
        };
        save_json(self.store.as_ref(), THEME_STORAGE_KEY, &ThemeSettings { theme })?;
        *current = theme;
        Ok(())
    }

    fn toggle_theme(&self) -> Result<ThemeMode> {
        let next = self.theme().toggled();
        self.set_theme(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;

    #[test]
    fn test_defaults_to_dark() {
        let service = ThemeService::load(Arc::new(MemoryKeyValueStore::new()));
        assert_eq!(service.theme(), ThemeMode::Dark);
    }

    #[test]
    fn test_toggle_persists() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let service = ThemeService::load(store.clone());

        assert_eq!(service.toggle_theme().unwrap(), ThemeMode::Light);
        assert_eq!(
            store.get(THEME_STORAGE_KEY).unwrap().as_deref(),
            Some(r#"{"theme":"light"}"#)
        );

        let reloaded = ThemeService::load(store);
        assert_eq!(reloaded.theme(), ThemeMode::Light);
    }

    #[test]
    fn test_corrupt_record_falls_back() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store.set(THEME_STORAGE_KEY, "{\"theme\":\"sepia\"}").unwrap();
        let service = ThemeService::load(store);
        assert_eq!(service.theme(), ThemeMode::Dark);
    }

    #[test]
    fn test_parse_theme() {
        assert_eq!(" Light ".parse::<ThemeMode>().unwrap(), ThemeMode::Light);
        assert!("sepia".parse::<ThemeMode>().is_err());
    }
}
