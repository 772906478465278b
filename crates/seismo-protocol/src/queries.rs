//! Endpoint schemas and the typed queries built from them.

use std::fmt;

use seismo_common::{Receiver, Source};
use serde::{Deserialize, Serialize};

use crate::errors::SeismoError;
use crate::headers::OutputFormat;
use crate::schema::{
    ParamKind, ParameterSchema, ParameterSpec, ParameterValidator, ValidatedArgs,
};
use crate::window::TimeSettings;

const TIME_HINT: &str = "YYYY-MM-DDTHH:MM:SS";
const TIME_SETTING_HINT: &str = "Datetime String/Float/Phase+-Offset";
const VALID_COMPONENTS: &str = "ZNERT";
const MAX_KERNELWIDTH: i64 = 20;

/// Physical quantity of the returned seismograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Displacement,
    Velocity,
    Acceleration,
}

impl Units {
    pub fn from_query_param(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "displacement" => Some(Units::Displacement),
            "velocity" => Some(Units::Velocity),
            "acceleration" => Some(Units::Acceleration),
            _ => None,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::Displacement => f.write_str("displacement"),
            Units::Velocity => f.write_str("velocity"),
            Units::Acceleration => f.write_str("acceleration"),
        }
    }
}

fn check_coordinates(args: &ValidatedArgs) -> Result<(), SeismoError> {
    for name in ["sourcelatitude", "receiverlatitude"] {
        if let Some(lat) = args.get_f64(name) {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(SeismoError::InvalidValue(format!(
                    "Parameter '{}' must be between -90 and 90.",
                    name
                )));
            }
        }
    }
    for name in ["sourcelongitude", "receiverlongitude"] {
        if let Some(lon) = args.get_f64(name) {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(SeismoError::InvalidValue(format!(
                    "Parameter '{}' must be between -180 and 180.",
                    name
                )));
            }
        }
    }
    Ok(())
}

fn check_code(args: &ValidatedArgs, name: &str, max_len: usize) -> Result<(), SeismoError> {
    match args.get_str(name) {
        Some(code) if code.chars().count() > max_len => Err(SeismoError::InvalidValue(format!(
            "'{}' must have at most {} characters.",
            name, max_len
        ))),
        _ => Ok(()),
    }
}

fn geometry_specs(schema: ParameterSchema) -> ParameterSchema {
    schema
        .with(ParameterSpec::required("sourcelatitude", ParamKind::Float))
        .with(ParameterSpec::required("sourcelongitude", ParamKind::Float))
        .with(ParameterSpec::optional("sourcedepthinmeters", ParamKind::Float).with_default("0"))
        .with(ParameterSpec::required("receiverlatitude", ParamKind::Float))
        .with(ParameterSpec::required("receiverlongitude", ParamKind::Float))
        .with(ParameterSpec::optional("receiverdepthinmeters", ParamKind::Float))
}

fn source_from_args(args: &ValidatedArgs) -> Result<Source, SeismoError> {
    Ok(Source::new(
        args.require_f64("sourcelatitude")?,
        args.require_f64("sourcelongitude")?,
        args.get_f64("sourcedepthinmeters").unwrap_or(0.0),
    ))
}

fn receiver_from_args(args: &ValidatedArgs) -> Result<Receiver, SeismoError> {
    let mut receiver = Receiver::new(
        args.require_f64("receiverlatitude")?,
        args.require_f64("receiverlongitude")?,
    );
    if let Some(depth) = args.get_f64("receiverdepthinmeters") {
        receiver = receiver.with_depth(depth);
    }
    Ok(receiver)
}

/// A validated `/seismograms` request.
#[derive(Debug, Clone, PartialEq)]
pub struct SeismogramsQuery {
    pub components: String,
    pub units: Units,
    pub source: Source,
    pub receiver: Receiver,
    pub time: TimeSettings,
    pub format: OutputFormat,
    pub label: Option<String>,
}

impl SeismogramsQuery {
    pub fn schema() -> ParameterSchema {
        let schema = ParameterSchema::new()
            .with(ParameterSpec::optional("components", ParamKind::Str).with_default("ZNE"))
            .with(ParameterSpec::optional("units", ParamKind::Str).with_default("displacement"))
            .with(ParameterSpec::optional("dt", ParamKind::Float))
            .with(ParameterSpec::optional("kernelwidth", ParamKind::Int).with_default("12"));

        geometry_specs(schema)
            .with(ParameterSpec::optional("networkcode", ParamKind::Str).with_default("XX"))
            .with(ParameterSpec::optional("stationcode", ParamKind::Str).with_default("SYN"))
            .with(ParameterSpec::optional("locationcode", ParamKind::Str).with_default(""))
            .with(ParameterSpec::optional("origintime", ParamKind::Time).with_format(TIME_HINT))
            .with(
                ParameterSpec::optional("starttime", ParamKind::TimeSetting)
                    .with_format(TIME_SETTING_HINT),
            )
            .with(
                ParameterSpec::optional("endtime", ParamKind::TimeSetting)
                    .with_format(TIME_SETTING_HINT),
            )
            .with(ParameterSpec::optional("format", ParamKind::Format).with_default("saczip"))
            .with(ParameterSpec::optional("label", ParamKind::Str))
    }

    /// Cross-field checks run after coercion.
    pub fn check(args: &ValidatedArgs) -> Result<(), SeismoError> {
        check_coordinates(args)?;

        let components = args.get_str("components").unwrap_or_default();
        if components.is_empty() {
            return Err(SeismoError::InvalidValue(
                "A request with no components will not return anything...".to_string(),
            ));
        }
        if let Some(bad) = components.chars().find(|c| !VALID_COMPONENTS.contains(*c)) {
            return Err(SeismoError::InvalidValue(format!(
                "Invalid component '{}'. Valid components: {}",
                bad, VALID_COMPONENTS
            )));
        }

        if let Some(units) = args.get_str("units") {
            if Units::from_query_param(units).is_none() {
                return Err(SeismoError::InvalidValue(format!(
                    "Unit must be one of 'displacement', 'velocity', or 'acceleration', got '{}'.",
                    units
                )));
            }
        }

        if let Some(dt) = args.get_f64("dt") {
            if dt <= 0.0 {
                return Err(SeismoError::InvalidValue(
                    "The sampling rate 'dt' must be positive.".to_string(),
                ));
            }
        }

        if let Some(kw) = args.get_i64("kernelwidth") {
            if !(1..=MAX_KERNELWIDTH).contains(&kw) {
                return Err(SeismoError::InvalidValue(format!(
                    "`kernelwidth` must not be smaller than 1 or larger than {}.",
                    MAX_KERNELWIDTH
                )));
            }
        }

        check_code(args, "networkcode", 2)?;
        check_code(args, "stationcode", 5)?;
        check_code(args, "locationcode", 2)?;

        // the label ends up unquoted in the download filename
        if let Some(label) = args.get_str("label") {
            if !label.chars().all(|c| c.is_ascii_graphic()) {
                return Err(SeismoError::InvalidValue(
                    "'label' may only contain visible ASCII characters.".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn validator() -> ParameterValidator {
        ParameterValidator::new(Self::schema()).with_hook(Self::check)
    }

    /// Build the typed query from validated arguments.
    pub fn from_args(args: &ValidatedArgs) -> Result<Self, SeismoError> {
        let units = args
            .get_str("units")
            .and_then(Units::from_query_param)
            .unwrap_or(Units::Displacement);

        let kernelwidth = args
            .get_i64("kernelwidth")
            .map(u32::try_from)
            .transpose()
            .map_err(|_| SeismoError::InvalidValue("Invalid `kernelwidth`.".to_string()))?
            .unwrap_or(12);

        let receiver = receiver_from_args(args)?.with_codes(
            args.get_str("networkcode").unwrap_or("XX"),
            args.get_str("stationcode").unwrap_or("SYN"),
            args.get_str("locationcode").unwrap_or(""),
        );

        Ok(Self {
            components: args.get_str("components").unwrap_or("ZNE").to_string(),
            units,
            source: source_from_args(args)?,
            receiver,
            time: TimeSettings {
                origintime: args.get_time("origintime"),
                starttime: args.get_time_setting("starttime").cloned(),
                endtime: args.get_time_setting("endtime").cloned(),
                dt: args.get_f64("dt"),
                kernelwidth,
            },
            format: args.get_format("format").unwrap_or(OutputFormat::Saczip),
            label: args.get_str("label").map(str::to_string),
        })
    }
}

/// A validated `/ttime` request.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelTimeQuery {
    pub source: Source,
    pub receiver: Receiver,
    pub phase: String,
}

impl TravelTimeQuery {
    pub fn schema() -> ParameterSchema {
        geometry_specs(ParameterSchema::new())
            .with(ParameterSpec::required("phase", ParamKind::Str))
    }

    pub fn validator() -> ParameterValidator {
        ParameterValidator::new(Self::schema()).with_hook(check_coordinates)
    }

    pub fn from_args(args: &ValidatedArgs) -> Result<Self, SeismoError> {
        Ok(Self {
            source: source_from_args(args)?,
            receiver: receiver_from_args(args)?,
            phase: args.require_str("phase")?.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RawParameters;
    use seismo_common::TimeSpec;

    fn base() -> Vec<(&'static str, &'static str)> {
        vec![
            ("sourcelatitude", "10"),
            ("sourcelongitude", "20"),
            ("receiverlatitude", "-30"),
            ("receiverlongitude", "40"),
        ]
    }

    fn validate(extra: &[(&'static str, &'static str)]) -> Result<SeismogramsQuery, SeismoError> {
        let mut pairs = base();
        pairs.extend_from_slice(extra);
        let args = SeismogramsQuery::validator().validate(&RawParameters::from_pairs(pairs))?;
        SeismogramsQuery::from_args(&args)
    }

    #[test]
    fn test_seismograms_defaults() {
        let query = validate(&[]).unwrap();
        assert_eq!(query.components, "ZNE");
        assert_eq!(query.units, Units::Displacement);
        assert_eq!(query.format, OutputFormat::Saczip);
        assert_eq!(query.time.kernelwidth, 12);
        assert_eq!(query.time.dt, None);
        assert_eq!(query.source.depth_in_m, 0.0);
        assert_eq!(query.receiver.depth_in_m, None);
        assert_eq!(query.receiver.network, "XX");
        assert_eq!(query.receiver.station, "SYN");
        assert_eq!(query.receiver.location, "");
        assert!(query.label.is_none());
    }

    #[test]
    fn test_seismograms_time_settings() {
        let query = validate(&[
            ("origintime", "2010-03-04T05:06:07Z"),
            ("starttime", "P-10"),
            ("endtime", "60"),
        ])
        .unwrap();
        assert!(query.time.origintime.is_some());
        assert_eq!(query.time.starttime, Some(TimeSpec::phase("P", -10.0)));
        assert_eq!(query.time.endtime, Some(TimeSpec::offset(60.0)));
    }

    #[test]
    fn test_bad_time_setting_uses_hint() {
        let err = validate(&[("starttime", "P+x")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parameter 'starttime' must be formatted as: 'Datetime String/Float/Phase+-Offset'"
        );
    }

    #[test]
    fn test_latitude_range() {
        let mut pairs = base();
        pairs[0] = ("sourcelatitude", "91");
        let err = SeismogramsQuery::validator()
            .validate(&RawParameters::from_pairs(pairs))
            .unwrap_err();
        assert_eq!(err.kind(), "invalid-value");
    }

    #[test]
    fn test_components_checked() {
        assert!(validate(&[("components", "ZRT")]).is_ok());
        assert!(validate(&[("components", "")]).is_err());
        assert!(validate(&[("components", "ZX")]).is_err());
    }

    #[test]
    fn test_units_and_dt() {
        assert_eq!(
            validate(&[("units", "velocity")]).unwrap().units,
            Units::Velocity
        );
        assert!(validate(&[("units", "pressure")]).is_err());
        assert!(validate(&[("dt", "0")]).is_err());
        assert_eq!(validate(&[("dt", "0.5")]).unwrap().time.dt, Some(0.5));
    }

    #[test]
    fn test_kernelwidth_range() {
        assert!(validate(&[("kernelwidth", "0")]).is_err());
        assert!(validate(&[("kernelwidth", "21")]).is_err());
        assert_eq!(
            validate(&[("kernelwidth", "20")]).unwrap().time.kernelwidth,
            20
        );
    }

    #[test]
    fn test_station_codes() {
        assert!(validate(&[("networkcode", "IUX")]).is_err());
        assert!(validate(&[("stationcode", "ANMOXX")]).is_err());
        let query = validate(&[("networkcode", "IU"), ("stationcode", "ANMO")]).unwrap();
        assert_eq!(query.receiver.network, "IU");
        assert_eq!(query.receiver.station, "ANMO");
    }

    #[test]
    fn test_label_characters() {
        let query = validate(&[("label", "my_run-1.v2")]).unwrap();
        assert_eq!(query.label.as_deref(), Some("my_run-1.v2"));

        for label in ["a\nb", "a b", "caf\u{e9}", "tab\t"] {
            let err = validate(&[("label", label)]).unwrap_err();
            assert_eq!(err.kind(), "invalid-value");
            assert_eq!(err.status_code(), 400);
        }
    }

    #[test]
    fn test_ttime_query() {
        let mut pairs = base();
        pairs.push(("phase", "P"));
        pairs.push(("sourcedepthinmeters", "1000"));
        let args = TravelTimeQuery::validator()
            .validate(&RawParameters::from_pairs(pairs))
            .unwrap();
        let query = TravelTimeQuery::from_args(&args).unwrap();
        assert_eq!(query.phase, "P");
        assert_eq!(query.source.depth_in_m, 1000.0);
    }

    #[test]
    fn test_ttime_rejects_seismogram_parameters() {
        let mut pairs = base();
        pairs.push(("phase", "P"));
        pairs.push(("format", "miniseed"));
        let err = TravelTimeQuery::validator()
            .validate(&RawParameters::from_pairs(pairs))
            .unwrap_err();
        assert_eq!(err.kind(), "unknown-parameter");
    }
}
