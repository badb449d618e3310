use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Registration Store Router
///
/// `/register[?id=N]`. Sign-up is public; the PUT/DELETE admin operations are not guarded
/// here either, matching the store contract.
pub fn registration_routes() -> Router<AppState> {
    Router::new().route(
        "/register",
        // GET lists, POST signs up, PUT applies a partial update (admin flag, names,
        // position, department), DELETE removes.
        get(handlers::list_registrations)
            .post(handlers::create_registration)
            .put(handlers::update_registration)
            .delete(handlers::delete_registration),
    )
}
