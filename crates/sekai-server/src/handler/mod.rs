//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use sekai_core::SusParser;
//! use sekai_opendal::{StorageBackend, StorageConfig};
//! use sekai_server::handler::routes;
//! use sekai_server::middleware::{OpenApiConfig, RouterOpenApiExt};
//! use sekai_server::service::{LevelDataService, ServiceState};
//!
//! # fn example() -> anyhow::Result<()> {
//! let backend = StorageBackend::new(StorageConfig::memory())?;
//! let state = ServiceState::from_parts(LevelDataService::new(backend, SusParser));
//!
//! let router = routes()
//!     .with_state::<()>(state)
//!     .with_open_api(OpenApiConfig::default());
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
mod levels;
mod monitors;
mod request;
mod response;

use aide::axum::ApiRouter;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::request::LevelPathParams;
pub use crate::handler::response::{ErrorResponse, GzipLevelData, Health, ServiceStatus};
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns an [`ApiRouter`] with all routes.
///
/// Unknown paths fall through to a `404 not_found` error body.
pub fn routes() -> ApiRouter<ServiceState> {
    ApiRouter::new()
        .merge(levels::routes())
        .merge(monitors::routes())
        .fallback(handler)
}

#[cfg(test)]
mod test {
    use aide::axum::ApiRouter;
    use aide::openapi::OpenApi;
    use axum_test::TestServer;
    use sekai_core::SusParser;
    use sekai_opendal::FixtureStore;

    use crate::handler::routes;
    use crate::service::{LevelDataService, ServiceState};

    /// Returns a state over an empty fixture store.
    fn create_test_state() -> ServiceState {
        ServiceState::from_parts(LevelDataService::new(FixtureStore::new(), SusParser))
    }

    /// Returns a new [`TestServer`] with the given router.
    pub fn create_test_server_with_router(
        router: impl Fn(ServiceState) -> ApiRouter<ServiceState>,
    ) -> anyhow::Result<TestServer> {
        let state = create_test_state();
        let router = router(state.clone());
        create_test_server_with_state(router, state)
    }

    /// Returns a new [`TestServer`] with the given router and state.
    pub fn create_test_server_with_state(
        router: ApiRouter<ServiceState>,
        state: ServiceState,
    ) -> anyhow::Result<TestServer> {
        let app = router.with_state::<()>(state);
        let app = app.finish_api(&mut OpenApi::default());
        let server = TestServer::new(app)?;
        Ok(server)
    }

    /// Returns a new [`TestServer`] with all routes over the given service.
    pub fn create_test_server_with_service(
        level_data: LevelDataService,
    ) -> anyhow::Result<TestServer> {
        create_test_server_with_state(routes(), ServiceState::from_parts(level_data))
    }

    /// Returns a new [`TestServer`] with the default router and state.
    pub fn create_test_server() -> anyhow::Result<TestServer> {
        create_test_server_with_state(routes(), create_test_state())
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let server = create_test_server()?;
        assert!(server.is_running());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/levels").await;
        response.assert_status_not_found();
        response.assert_json(&serde_json::json!({"error": "Not Found", "code": "not_found"}));

        Ok(())
    }
}
