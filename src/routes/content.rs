use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Content Store Router
///
/// `/content?type={news|achievements|gallery|settings}[&id=N]`. No authentication is
/// applied at this layer.
pub fn content_routes() -> Router<AppState> {
    Router::new().route(
        "/content",
        // GET lists a collection (or fetches settings), POST creates, PUT replaces the
        // settings singleton, DELETE removes a record by id.
        get(handlers::list_content)
            .post(handlers::create_content)
            .put(handlers::update_settings)
            .delete(handlers::delete_content),
    )
}
