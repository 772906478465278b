//! Seismograms handler.

use axum::{
    extract::{Extension, RawQuery},
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use chrono::Utc;
use seismo_protocol::{
    build_headers, resolve_time_window, validate_geometry, RawParameters, SeismoError,
    SeismogramsQuery,
};
use std::sync::Arc;
use tracing::{debug, info};

use super::{raw_parameters, seismo_error_response};
use crate::extraction::{spawn_extraction, ExtractionRequest};
use crate::metrics::record_request;
use crate::state::AppState;

/// Validate the query and resolve it into an extraction request.
pub async fn prepare_request(
    state: &AppState,
    raw: &RawParameters,
) -> Result<ExtractionRequest, SeismoError> {
    let args = state.seismograms_validator.validate(raw)?;
    let query = SeismogramsQuery::from_args(&args)?;

    let window = resolve_time_window(&query.time, &state.extent).await?;
    validate_geometry(&query.source, &query.receiver, state.database.info())?;
    let window =
        window.resolve_phases(&query.source, &query.receiver, state.travel_time_provider())?;

    debug!(
        starttime = %window.starttime,
        endtime = %window.endtime,
        components = %query.components,
        "Resolved seismogram request"
    );

    Ok(ExtractionRequest { query, window })
}

/// GET /seismograms
pub async fn seismograms_handler(
    Extension(state): Extension<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Response {
    record_request("seismograms");

    let raw = raw_parameters(query.as_deref());
    let request = match prepare_request(&state, &raw).await {
        Ok(request) => request,
        Err(e) => return seismo_error_response(&e),
    };

    let Some(extractor) = state.extractor.clone() else {
        return seismo_error_response(&SeismoError::ExtractionUnavailable(
            "No seismogram extraction backend is configured.".to_string(),
        ));
    };

    let headers = build_headers(
        request.query.format,
        request.query.label.as_deref(),
        &state.config.default_label,
        Utc::now(),
    );
    let disposition = match HeaderValue::from_str(&headers.content_disposition) {
        Ok(value) => value,
        Err(_) => {
            return seismo_error_response(&SeismoError::InvalidValue(format!(
                "Label '{}' cannot be used as a filename.",
                headers.filename.escape_debug()
            )))
        }
    };
    info!(
        format = %request.query.format,
        filename = %headers.filename,
        "Streaming seismograms"
    );

    let (body, _handle) = spawn_extraction(extractor, request, state.config.channel_capacity);

    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::OK;
    let response_headers = response.headers_mut();
    response_headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(headers.content_type),
    );
    response_headers.insert(header::CONTENT_DISPOSITION, disposition);
    response
}
