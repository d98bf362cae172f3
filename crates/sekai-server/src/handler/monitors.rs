//! Service health handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::Json;

use crate::handler::response::Health;
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "sekai_server::handler::monitors";

#[tracing::instrument(skip_all)]
async fn health_status() -> Json<Health> {
    let health = Health::default();

    tracing::debug!(
        target: TRACING_TARGET,
        version = %health.version,
        "Health status check requested"
    );

    Json(health)
}

fn health_status_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get service health")
        .description("Returns the liveness status and version of the service.")
        .response::<200, Json<Health>>()
}

/// Returns a [`Router`] with all health monitoring routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/health", get_with(health_status, health_status_docs))
        .with_path_items(|item| item.tag("Monitors"))
}
