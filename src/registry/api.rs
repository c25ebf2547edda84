//! Public API for the service point registry

use crate::core::time::SystemClock;
use crate::registry::ServicePointRegistry;
use std::sync::{Arc, LazyLock};

/// Global registry instance
static REGISTRY_SERVICE: LazyLock<Arc<ServicePointRegistry>> = LazyLock::new(|| {
    log::trace!("Initializing service point registry");
    Arc::new(ServicePointRegistry::new(Arc::new(SystemClock)))
});

/// Access the service point registry
///
/// Each call returns the same shared instance.
pub fn get_registry_service() -> Arc<ServicePointRegistry> {
    Arc::clone(&REGISTRY_SERVICE)
}
