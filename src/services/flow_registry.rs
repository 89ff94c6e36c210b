use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::services::provider_client::HotelProviderApi;
use crate::services::rate_catalog::RateCatalog;
use crate::services::search_session::SearchSession;

struct ActiveCatalog {
    hotel_id: String,
    catalog: Arc<RateCatalog>,
}

/// One inquiry's search flow: its session plus, once a hotel was opened, the
/// normalized catalog for that hotel. Session and catalog have exactly one
/// owner at a time; installing a new one retires the old first.
pub struct HotelSearchFlow<P> {
    pub session: SearchSession<P>,
    catalog: Mutex<Option<ActiveCatalog>>,
}

impl<P: HotelProviderApi> HotelSearchFlow<P> {
    fn new(provider: Arc<P>) -> Self {
        Self { session: SearchSession::new(provider), catalog: Mutex::new(None) }
    }

    fn catalog_slot(&self) -> MutexGuard<'_, Option<ActiveCatalog>> {
        self.catalog.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Install the catalog for a newly opened hotel, discarding whichever
    /// hotel was open before.
    pub fn install_catalog(&self, hotel_id: String, catalog: RateCatalog) -> Arc<RateCatalog> {
        let mut slot = self.catalog_slot();
        if let Some(old) = slot.take() {
            log::info!("discarding catalog for hotel {}", old.hotel_id);
        }
        let catalog = Arc::new(catalog);
        *slot = Some(ActiveCatalog { hotel_id, catalog: catalog.clone() });
        catalog
    }

    pub fn active_catalog(&self) -> Option<(String, Arc<RateCatalog>)> {
        self.catalog_slot()
            .as_ref()
            .map(|active| (active.hotel_id.clone(), active.catalog.clone()))
    }

    pub fn clear_catalog(&self) {
        self.catalog_slot().take();
    }
}

/// Registry of active flows keyed by inquiry token. Replacing or retiring a
/// flow cancels its session and drops its catalog under the registry lock,
/// so a stale flow and its successor never hold state at the same time.
pub struct HotelSearchFlows<P> {
    provider: Arc<P>,
    flows: Mutex<HashMap<String, Arc<HotelSearchFlow<P>>>>,
}

impl<P: HotelProviderApi> HotelSearchFlows<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider, flows: Mutex::new(HashMap::new()) }
    }

    fn locked(&self) -> MutexGuard<'_, HashMap<String, Arc<HotelSearchFlow<P>>>> {
        self.flows.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Retire whatever flow holds this inquiry token and install a fresh
    /// one.
    pub fn replace(&self, inquiry_token: &str) -> Arc<HotelSearchFlow<P>> {
        let mut flows = self.locked();
        if let Some(old) = flows.remove(inquiry_token) {
            old.session.cancel();
            old.clear_catalog();
        }
        let flow = Arc::new(HotelSearchFlow::new(self.provider.clone()));
        flows.insert(inquiry_token.to_string(), flow.clone());
        flow
    }

    pub fn get(&self, inquiry_token: &str) -> Option<Arc<HotelSearchFlow<P>>> {
        self.locked().get(inquiry_token).cloned()
    }

    /// Cancel and drop a flow. Returns false if none was registered.
    pub fn retire(&self, inquiry_token: &str) -> bool {
        match self.locked().remove(inquiry_token) {
            Some(flow) => {
                flow.session.cancel();
                flow.clear_catalog();
                true
            }
            None => false,
        }
    }
}
