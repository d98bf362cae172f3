//! Level data response types.

use aide::generate::GenContext;
use aide::openapi::{MediaType, Operation, Response as ApiResponse};
use axum::http::header;
use axum::response::{IntoResponse, Response};

/// Media type of compressed level data.
const APPLICATION_GZIP: &str = "application/gzip";

/// Gzip-compressed level data JSON.
#[must_use]
#[derive(Debug, Clone)]
pub struct GzipLevelData(pub Vec<u8>);

impl IntoResponse for GzipLevelData {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, APPLICATION_GZIP)], self.0).into_response()
    }
}

impl aide::OperationOutput for GzipLevelData {
    type Inner = Self;

    fn operation_response(_ctx: &mut GenContext, _operation: &mut Operation) -> Option<ApiResponse> {
        Some(ApiResponse {
            description: "Gzip-compressed level data JSON".to_owned(),
            content: [(APPLICATION_GZIP.to_owned(), MediaType::default())]
                .into_iter()
                .collect(),
            ..ApiResponse::default()
        })
    }

    fn inferred_responses(
        ctx: &mut GenContext,
        operation: &mut Operation,
    ) -> Vec<(Option<u16>, ApiResponse)> {
        Self::operation_response(ctx, operation)
            .map(|response| vec![(Some(200), response)])
            .unwrap_or_default()
    }
}
