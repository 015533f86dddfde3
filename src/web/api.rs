use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::{
    content::query::{self, ListParams, RawListParams},
    web::{AppState, responses::json_error},
};

/// Public Read API: `GET /api/exhibits`.
///
/// Accepts `category`, `search`, `sort` (`newest|oldest|az|za`), `page` and
/// `limit` (1–100). Pagination is validated before the store is touched, and
/// responses always instruct caches not to store them.
pub async fn list_exhibits(
    State(state): State<AppState>,
    Query(raw): Query<RawListParams>,
) -> Response {
    let params = ListParams::from_raw(raw);
    if params.validate().is_err() {
        return json_error(
            StatusCode::BAD_REQUEST,
            "Invalid pagination parameters",
            "page must be >= 1 and limit within 1..=100",
        )
        .into_response();
    }

    let records = match state.exhibits().list_published().await {
        Ok(records) => records,
        Err(err) => {
            error!(?err, "failed to fetch exhibits from the content store");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch exhibits",
                err.to_string(),
            )
            .into_response();
        }
    };

    match query::run(records, &params) {
        Ok(page) => (
            StatusCode::OK,
            [(header::CACHE_CONTROL, "no-store, must-revalidate")],
            Json(page),
        )
            .into_response(),
        // validate() ran above; reaching this arm means the params changed
        // meaning, so treat it as the same validation failure.
        Err(err) => {
            json_error(StatusCode::BAD_REQUEST, "Invalid pagination parameters", err.to_string())
                .into_response()
        }
    }
}
