//! Declarative query parameter schemas and their validation.
//!
//! A [`ParameterSchema`] lists every parameter an endpoint accepts together
//! with its type, whether it is required, an optional default and an optional
//! format hint for error messages. [`ParameterValidator`] checks a raw query
//! against a schema and produces [`ValidatedArgs`].
//!
//! Checks run in a fixed order so that error messages are reproducible:
//!
//! 1. unknown parameters
//! 2. duplicate parameters
//! 3. per parameter, in schema order: missing required value, then coercion
//! 4. the endpoint's cross-field hook

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use seismo_common::time::{parse_datetime, parse_seconds};
use seismo_common::TimeSpec;

use crate::errors::SeismoError;
use crate::headers::OutputFormat;

/// Type a raw string is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Any string, kept verbatim.
    Str,
    /// A finite floating point number.
    Float,
    /// A signed integer.
    Int,
    /// An absolute UTC time.
    Time,
    /// An absolute time, a numeric offset or a phase-relative time.
    TimeSetting,
    /// An output format name.
    Format,
}

impl ParamKind {
    /// Name used in "could not be converted" messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamKind::Str => "str",
            ParamKind::Float => "float",
            ParamKind::Int => "int",
            ParamKind::Time => "UTCDateTime",
            ParamKind::TimeSetting => "time setting",
            ParamKind::Format => "format",
        }
    }

    /// Coerce a raw value, returning `None` if it does not fit the type.
    pub fn coerce(&self, raw: &str) -> Option<ParamValue> {
        match self {
            ParamKind::Str => Some(ParamValue::Str(raw.to_string())),
            ParamKind::Float => parse_seconds(raw).map(ParamValue::Float),
            ParamKind::Int => raw.trim().parse::<i64>().ok().map(ParamValue::Int),
            ParamKind::Time => parse_datetime(raw).ok().map(ParamValue::Time),
            ParamKind::TimeSetting => TimeSpec::parse(raw).ok().map(ParamValue::TimeSetting),
            ParamKind::Format => OutputFormat::from_query_param(raw.trim()).map(ParamValue::Format),
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A coerced parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Float(f64),
    Int(i64),
    Time(DateTime<Utc>),
    TimeSetting(TimeSpec),
    Format(OutputFormat),
}

/// Declaration of a single parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParamKind,
    pub required: bool,
    /// Raw default, coerced like a given value. Ignored for required
    /// parameters.
    pub default: Option<String>,
    /// Shown in coercion errors, e.g. `YYYY-MM-DDTHH:MM:SS`.
    pub format_hint: Option<String>,
}

impl ParameterSpec {
    pub fn required(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            default: None,
            format_hint: None,
        }
    }

    pub fn optional(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind)
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_format(mut self, hint: impl Into<String>) -> Self {
        self.format_hint = Some(hint.into());
        self
    }
}

/// Ordered set of parameter declarations for one endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSchema {
    specs: Vec<ParameterSpec>,
}

impl ParameterSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter. A later declaration with the same name replaces the
    /// earlier one in place.
    pub fn with(mut self, spec: ParameterSpec) -> Self {
        match self.specs.iter_mut().find(|s| s.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.specs.push(spec),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Query parameters as received: every key with all of its values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawParameters {
    values: BTreeMap<String, Vec<String>>,
}

impl RawParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from decoded `key=value` pairs, keeping repeated keys.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut raw = Self::new();
        for (key, value) in pairs {
            raw.push(key, value);
        }
        raw
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Parameters after coercion. Absent optional parameters without a default
/// have no entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedArgs {
    values: BTreeMap<String, ParamValue>,
}

impl ValidatedArgs {
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(ParamValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(ParamValue::Float(v)) => Some(*v),
            Some(ParamValue::Int(v)) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(ParamValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_time(&self, name: &str) -> Option<DateTime<Utc>> {
        match self.get(name) {
            Some(ParamValue::Time(t)) => Some(*t),
            _ => None,
        }
    }

    pub fn get_time_setting(&self, name: &str) -> Option<&TimeSpec> {
        match self.get(name) {
            Some(ParamValue::TimeSetting(t)) => Some(t),
            _ => None,
        }
    }

    pub fn get_format(&self, name: &str) -> Option<OutputFormat> {
        match self.get(name) {
            Some(ParamValue::Format(f)) => Some(*f),
            _ => None,
        }
    }

    /// Like [`get_f64`](Self::get_f64) but a missing value is an error.
    pub fn require_f64(&self, name: &str) -> Result<f64, SeismoError> {
        self.get_f64(name)
            .ok_or_else(|| SeismoError::MissingParameter(name.to_string()))
    }

    /// Like [`get_str`](Self::get_str) but a missing value is an error.
    pub fn require_str(&self, name: &str) -> Result<&str, SeismoError> {
        self.get_str(name)
            .ok_or_else(|| SeismoError::MissingParameter(name.to_string()))
    }

    fn insert(&mut self, name: &str, value: ParamValue) {
        self.values.insert(name.to_string(), value);
    }
}

/// Cross-field check run after all parameters have been coerced.
pub type ValidationHook = Box<dyn Fn(&ValidatedArgs) -> Result<(), SeismoError> + Send + Sync>;

/// Validates raw queries against a fixed schema.
pub struct ParameterValidator {
    schema: ParameterSchema,
    hook: Option<ValidationHook>,
}

impl ParameterValidator {
    pub fn new(schema: ParameterSchema) -> Self {
        Self { schema, hook: None }
    }

    /// Attach the endpoint-specific cross-field check.
    pub fn with_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ValidatedArgs) -> Result<(), SeismoError> + Send + Sync + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn schema(&self) -> &ParameterSchema {
        &self.schema
    }

    /// Validate and coerce `raw`, failing on the first defect.
    pub fn validate(&self, raw: &RawParameters) -> Result<ValidatedArgs, SeismoError> {
        let unknown: Vec<String> = raw
            .keys()
            .filter(|k| !self.schema.contains(k))
            .map(str::to_string)
            .collect();
        if !unknown.is_empty() {
            return Err(SeismoError::UnknownParameters(unknown));
        }

        let duplicates: Vec<String> = raw
            .iter()
            .filter(|(_, values)| values.len() > 1)
            .map(|(k, _)| k.to_string())
            .collect();
        if !duplicates.is_empty() {
            return Err(SeismoError::DuplicateParameters(duplicates));
        }

        let mut args = ValidatedArgs::default();
        for spec in self.schema.iter() {
            let given = raw.get(&spec.name).and_then(|values| values.first());

            let value = match (given, spec.required) {
                (Some(v), _) => v.as_str(),
                (None, true) => return Err(SeismoError::MissingParameter(spec.name.clone())),
                (None, false) => match spec.default.as_deref() {
                    Some(default) => default,
                    None => continue,
                },
            };

            let coerced = spec.kind.coerce(value).ok_or_else(|| {
                let message = match &spec.format_hint {
                    Some(hint) => {
                        format!("Parameter '{}' must be formatted as: '{}'", spec.name, hint)
                    }
                    None => format!(
                        "Parameter '{}' could not be converted to '{}'.",
                        spec.name, spec.kind
                    ),
                };
                SeismoError::invalid_parameter(&spec.name, message)
            })?;

            args.insert(&spec.name, coerced);
        }

        if let Some(hook) = &self.hook {
            hook(&args)?;
        }

        Ok(args)
    }
}
