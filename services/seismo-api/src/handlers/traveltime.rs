//! Travel time handler.

use axum::{
    extract::{Extension, RawQuery},
    response::{IntoResponse, Response},
    Json,
};
use seismo_protocol::{get_travel_time, SeismoError, TravelTimeQuery, TravelTimeResponse};
use std::sync::Arc;

use super::{raw_parameters, seismo_error_response};
use crate::metrics::record_request;
use crate::state::AppState;

fn travel_time(
    state: &AppState,
    query: Option<&str>,
) -> Result<TravelTimeResponse, SeismoError> {
    let args = state.ttime_validator.validate(&raw_parameters(query))?;
    let query = TravelTimeQuery::from_args(&args)?;
    let travel_time = get_travel_time(
        state.travel_time_provider(),
        &query.source,
        &query.receiver,
        &query.phase,
    )?;
    Ok(TravelTimeResponse { travel_time })
}

/// GET /ttime
pub async fn ttime_handler(
    Extension(state): Extension<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Response {
    record_request("ttime");

    match travel_time(&state, query.as_deref()) {
        Ok(body) => Json(body).into_response(),
        Err(e) => seismo_error_response(&e),
    }
}
