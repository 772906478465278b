//! End-to-end tests of the request pipeline: validation, time window
//! resolution, geometry and response headers.

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use seismo_common::{DatabaseInfo, ExtentRequest, Receiver, SeismogramExtent, Source, TimeSpec};
use seismo_protocol::{
    build_headers, resolve_time_window, validate_geometry, ExtentProvider, OutputFormat,
    ParamKind, ParameterSchema, ParameterSpec, ParameterValidator, RawParameters, SeismoError,
    SeismogramsQuery, TimeSettings,
};
use test_utils::{forward_info, origin_time, reciprocal_info};
use tokio_test::{assert_err, assert_ok};

/// Extent derived from database metadata the same way the database crate
/// does for the native sampling rate.
struct InfoExtent(DatabaseInfo);

#[async_trait]
impl ExtentProvider for InfoExtent {
    async fn extent(&self, request: &ExtentRequest) -> Result<SeismogramExtent, SeismoError> {
        let shift = Duration::milliseconds((self.0.src_shift * 1000.0) as i64);
        let length = Duration::milliseconds((self.0.length() * 1000.0) as i64);
        let start = request.origin_time - shift;
        Ok(SeismogramExtent::new(start, start + length))
    }
}

fn provider() -> InfoExtent {
    InfoExtent(reciprocal_info())
}

fn raw(pairs: &[(&str, &str)]) -> RawParameters {
    RawParameters::from_pairs(pairs.iter().copied())
}

// ============================================================================
// Schema validation
// ============================================================================

#[test]
fn test_unknown_key_rejected_regardless_of_known_keys() {
    let validator = SeismogramsQuery::validator();
    let mut pairs = vec![
        ("sourcelatitude", "1"),
        ("sourcelongitude", "2"),
        ("receiverlatitude", "3"),
        ("receiverlongitude", "4"),
    ];
    assert_ok!(validator.validate(&raw(&pairs)));

    pairs.push(("sourcedepth", "1000"));
    let err = validator.validate(&raw(&pairs)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "The following unknown parameters have been passed: 'sourcedepth'"
    );

    let err = validator.validate(&raw(&[("bogus", "1")])).unwrap_err();
    assert_eq!(err.kind(), "unknown-parameter");
}

#[test]
fn test_missing_required_reported_in_schema_order() {
    let err = SeismogramsQuery::validator()
        .validate(&raw(&[("receiverlatitude", "3")]))
        .unwrap_err();
    assert_eq!(err, SeismoError::MissingParameter("sourcelatitude".to_string()));
}

// ============================================================================
// Time window
// ============================================================================

#[tokio::test]
async fn test_numeric_endtime_relative_to_origin() {
    let t = origin_time();
    let settings = TimeSettings {
        origintime: Some(t),
        endtime: Some(TimeSpec::offset(60.0)),
        ..Default::default()
    };
    let window = resolve_time_window(&settings, &provider()).await.unwrap();

    assert_eq!(window.starttime, TimeSpec::absolute(t));
    assert_eq!(window.endtime, TimeSpec::absolute(t + Duration::seconds(60)));
}

#[tokio::test]
async fn test_start_at_extent_end_fails() {
    let t = origin_time();
    let extent = provider()
        .extent(&ExtentRequest::unshifted(t, None, 12))
        .await
        .unwrap();
    let settings = TimeSettings {
        origintime: Some(t),
        starttime: Some(TimeSpec::absolute(extent.endtime)),
        ..Default::default()
    };
    let err = resolve_time_window(&settings, &provider()).await.unwrap_err();
    assert_eq!(err.kind(), "starttime-after-data-ends");
}

#[tokio::test]
async fn test_endtime_at_extent_bounds_accepted() {
    let t = origin_time();
    let settings = TimeSettings {
        origintime: Some(t),
        starttime: Some(TimeSpec::offset(-30.0)),
        endtime: Some(TimeSpec::offset(3600.0)),
        ..Default::default()
    };
    let window = resolve_time_window(&settings, &provider()).await.unwrap();
    assert_eq!(window.endtime, TimeSpec::absolute(window.extent.endtime));
    assert_eq!(window.bounds().0, t - Duration::seconds(30));
}

#[tokio::test]
async fn test_query_to_window() {
    let args = SeismogramsQuery::validator()
        .validate(&raw(&[
            ("sourcelatitude", "1"),
            ("sourcelongitude", "2"),
            ("receiverlatitude", "3"),
            ("receiverlongitude", "4"),
            ("origintime", "2010-03-04T05:06:07Z"),
            ("starttime", "10"),
        ]))
        .unwrap();
    let query = SeismogramsQuery::from_args(&args).unwrap();
    let window = resolve_time_window(&query.time, &provider()).await.unwrap();

    assert_eq!(
        window.starttime,
        TimeSpec::absolute(origin_time() + Duration::seconds(10))
    );
    assert_eq!(window.endtime, TimeSpec::absolute(window.extent.endtime));
}

// ============================================================================
// Geometry
// ============================================================================

#[test]
fn test_reciprocal_depth_range() {
    let info = reciprocal_info();
    let receiver = Receiver::new(0.0, 0.0);

    assert_ok!(validate_geometry(&Source::new(0.0, 0.0, 0.0), &receiver, &info));
    assert_err!(validate_geometry(&Source::new(0.0, 0.0, 7_000_000.0), &receiver, &info));
}

#[test]
fn test_forward_depth_must_match() {
    let info = forward_info(10.0);
    let receiver = Receiver::new(0.0, 0.0);

    assert_ok!(validate_geometry(&Source::new(0.0, 0.0, 10_000.0), &receiver, &info));
    let err = assert_err!(validate_geometry(&Source::new(0.0, 0.0, 10_001.0), &receiver, &info));
    assert!(err.to_string().contains("10.0 km"));
}

// ============================================================================
// Response headers
// ============================================================================

#[test]
fn test_miniseed_headers_from_raw_parameters() {
    let validator = ParameterValidator::new(
        ParameterSchema::new()
            .with(ParameterSpec::optional("format", ParamKind::Format).with_default("saczip"))
            .with(ParameterSpec::optional("label", ParamKind::Str)),
    );
    let args = validator.validate(&raw(&[("format", "miniseed")])).unwrap();
    let format = args.get_format("format").unwrap();
    let now = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();

    let headers = build_headers(format, args.get_str("label"), "instaseis", now);

    assert_eq!(format, OutputFormat::Miniseed);
    assert_eq!(headers.content_type, "application/octet-stream");
    assert!(headers.filename.starts_with("instaseis_2020-01-02T03_04_05"));
    assert!(headers.filename.ends_with(".mseed"));
}
