use axum::{routing::patch, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/users/:id/role",
        patch(handlers::profile::update_user_role),
    )
}
