//! Root and database info handlers.

use axum::{extract::Extension, Json};
use seismo_common::DatabaseInfo;
use seismo_protocol::ServerDescription;
use std::sync::Arc;

use crate::metrics::record_request;
use crate::state::AppState;

/// GET / - Server name and version
pub async fn root_handler() -> Json<ServerDescription> {
    record_request("root");
    Json(ServerDescription::new(env!("CARGO_PKG_VERSION")))
}

/// GET /info - Static database properties
pub async fn info_handler(Extension(state): Extension<Arc<AppState>>) -> Json<DatabaseInfo> {
    record_request("info");
    Json(state.database.info().clone())
}
