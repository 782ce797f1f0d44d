use std::sync::Arc;

use crate::classifier::Classifier;
use crate::config::Config;
use crate::location::LocationResolver;
use crate::routing::SeverityRouter;
use crate::store::FacilityStore;

/// Shared, read-only state handed to every request handler. Nothing here is
/// mutated per request; the only interior mutability is the process-local
/// resolution and stage-1 caches owned by their respective components.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn FacilityStore>,
    pub resolver: LocationResolver,
    pub router: SeverityRouter,
    pub classifier: Classifier,
}
