/*
 * Responsibility
 * - URL layout of v1
 * - everything here sits behind the group gate (see app::build_router)
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::ping::ping;

pub fn routes() -> Router {
    Router::new().route("/ping", get(ping))
}
