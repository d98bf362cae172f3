use sekai_core::SusParser;

use crate::service::{LevelDataService, Result, ServiceConfig};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    level_data: LevelDataService,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Creates the storage backend and pairs it with the bundled SUS parser.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let backend = config.connect_storage()?;
        Ok(Self::from_parts(LevelDataService::new(backend, SusParser)))
    }

    /// Creates application state from an already built service.
    pub fn from_parts(level_data: LevelDataService) -> Self {
        Self { level_data }
    }

    /// Returns the level data service.
    pub fn level_data(&self) -> &LevelDataService {
        &self.level_data
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(level_data: LevelDataService);
