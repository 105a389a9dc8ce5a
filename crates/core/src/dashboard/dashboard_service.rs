use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info, warn};
use serde_json::Value;
use tokio::sync::watch;

use finboard_market_data::{
    ApiProvider, Clock, FetchCache, FetchCacheConfig, FinnhubEndpoint, HttpFetcher,
    PollingSession, ProviderClient, SessionState,
};

use super::dashboard_model::{DashboardConfig, SyncReport};
use crate::errors::{Error, Result};
use crate::render::{render_widget, TableQuery, WidgetView};
use crate::settings::ThemeService;
use crate::storage::KeyValueStore;
use crate::widgets::{NewWidget, WidgetConfig, WidgetRegistry, WidgetRegistryTrait};

/// A running dashboard: persisted widgets, one polling session per widget,
/// and a response cache shared by all of them.
///
/// Mutations made through the dashboard resync sessions on their own.
/// After changing the registry directly, call [`Dashboard::sync_sessions`].
///
/// Sessions are spawned on the ambient tokio runtime.
pub struct Dashboard {
    registry: WidgetRegistry,
    theme: ThemeService,
    cache: Arc<FetchCache>,
    client: ProviderClient,
    sessions: Mutex<HashMap<String, PollingSession>>,
}

impl Dashboard {
    /// Restore widgets and theme from `store`. No session runs until the
    /// first [`sync_sessions`](Self::sync_sessions).
    pub fn load(
        config: DashboardConfig,
        store: Arc<dyn KeyValueStore>,
        fetcher: Arc<dyn HttpFetcher>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let registry = WidgetRegistry::load(store.clone())?;
        let theme = ThemeService::load(store);
        let cache = Arc::new(FetchCache::with_config(
            fetcher.clone(),
            clock,
            FetchCacheConfig {
                ttl: config.cache_ttl,
            },
        ));
        let client = ProviderClient::new(config.api_base_url, fetcher);

        Ok(Self {
            registry,
            theme,
            cache,
            client,
            sessions: Mutex::new(HashMap::new()),
        })
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    pub fn theme(&self) -> &ThemeService {
        &self.theme
    }

    pub fn cache(&self) -> &Arc<FetchCache> {
        &self.cache
    }

    pub fn client(&self) -> &ProviderClient {
        &self.client
    }

    pub fn widgets(&self) -> Vec<WidgetConfig> {
        self.registry.widgets()
    }

    fn lock_sessions(&self) -> MutexGuard<'_, HashMap<String, PollingSession>> {
        self.sessions.lock().unwrap_or_else(|poisoned| {
            warn!("Session map mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Bring sessions in line with the registry: start one for each new
    /// widget, stop the ones whose widget is gone, and restart any whose
    /// URL or interval changed.
    pub fn sync_sessions(&self) -> SyncReport {
        let widgets = self.registry.widgets();
        let live: HashSet<&str> = widgets.iter().map(|w| w.id.as_str()).collect();

        let mut report = SyncReport::default();
        let mut sessions = self.lock_sessions();

        sessions.retain(|id, session| {
            if live.contains(id.as_str()) {
                return true;
            }
            session.stop();
            report.stopped += 1;
            false
        });

        for widget in &widgets {
            let spec = widget.poll_spec();
            match sessions.get_mut(&widget.id) {
                Some(session) => {
                    if session.reconfigure(spec) {
                        report.restarted += 1;
                    }
                }
                None => {
                    sessions.insert(
                        widget.id.clone(),
                        PollingSession::start(self.cache.clone(), spec),
                    );
                    report.started += 1;
                }
            }
        }

        if !report.is_noop() {
            debug!(
                "Synced sessions: {} started, {} restarted, {} stopped",
                report.started, report.restarted, report.stopped
            );
        }
        report
    }

    pub fn session_count(&self) -> usize {
        self.lock_sessions().len()
    }

    pub fn add_widget(&self, new_widget: NewWidget) -> Result<WidgetConfig> {
        let created = self.registry.create(new_widget)?;
        info!("Created widget {} ({})", created.name, created.id);
        self.sync_sessions();
        Ok(created)
    }

    pub fn update_widget(&self, config: WidgetConfig) -> Result<()> {
        self.registry.update(config)?;
        self.sync_sessions();
        Ok(())
    }

    pub fn remove_widget(&self, id: &str) -> Result<bool> {
        let removed = self.registry.remove(id)?;
        if removed {
            self.sync_sessions();
        }
        Ok(removed)
    }

    /// Reordering never touches sessions.
    pub fn reorder(&self, from: usize, to: usize) -> Result<()> {
        self.registry.reorder(from, to)
    }

    pub fn move_widget(&self, active_id: &str, over_id: &str) -> Result<bool> {
        self.registry.move_widget(active_id, over_id)
    }

    /// Replace all widgets from a config file. The current list and its
    /// sessions are untouched if the file is rejected.
    pub fn import(&self, raw: &str) -> Result<usize> {
        let count = self.registry.import_json(raw)?;
        self.sync_sessions();
        Ok(count)
    }

    pub fn export(&self) -> Result<String> {
        self.registry.export_json()
    }

    pub fn subscribe(&self, id: &str) -> Option<watch::Receiver<SessionState>> {
        self.lock_sessions().get(id).map(PollingSession::subscribe)
    }

    /// Current state of a widget's session. A widget without a session
    /// reads as loading.
    pub fn state(&self, id: &str) -> SessionState {
        self.lock_sessions()
            .get(id)
            .map(PollingSession::state)
            .unwrap_or_default()
    }

    pub fn view(&self, id: &str, query: &TableQuery) -> Result<WidgetView> {
        let config = self
            .registry
            .get(id)
            .ok_or_else(|| Error::WidgetNotFound(id.to_string()))?;
        Ok(render_widget(&config, &self.state(id), query))
    }

    /// Views of all widgets in display order, tables on their first page.
    pub fn views(&self) -> Vec<WidgetView> {
        let query = TableQuery::default();
        self.registry
            .widgets()
            .iter()
            .map(|config| render_widget(config, &self.state(&config.id), &query))
            .collect()
    }

    /// Proxy URL for a provider and symbol, e.g. while filling in a new widget.
    pub fn request_url(
        &self,
        provider: ApiProvider,
        symbol: &str,
        endpoint: Option<FinnhubEndpoint>,
    ) -> Result<String> {
        Ok(self.client.request_url(provider, symbol, endpoint)?)
    }

    /// Fetch a URL once, bypassing the cache, to discover its fields.
    pub async fn test_connection(&self, url: &str) -> Result<Value> {
        Ok(self.client.test_connection(url).await?)
    }

    /// Stop every session. Widgets stay registered.
    pub fn shutdown(&self) {
        let mut sessions = self.lock_sessions();
        for session in sessions.values_mut() {
            session.stop();
        }
        info!("Stopped {} polling sessions", sessions.len());
        sessions.clear();
    }
}
