//! Provider-specific extra query parameters.
//!
//! Extra parameters are forwarded verbatim as query-string pairs on every
//! request, e.g. Mapbox `radiuses` or GraphHopper `points_encoded`. Keys are
//! kept sorted so request URLs are deterministic.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

/// Errors returned by [`ExtraParams::from_json`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtraParamsError {
    /// The document was not a JSON object.
    #[error("extra parameters must be a JSON object")]
    NotAnObject,
    /// A value was an array, object or null.
    #[error("extra parameter '{key}' must be a string, number or boolean")]
    UnsupportedValue { key: String },
}

/// Ordered map of extra query parameters.
///
/// # Examples
/// ```
/// use rap_core::ExtraParams;
/// use serde_json::json;
///
/// let params = ExtraParams::from_json(&json!({"radiuses": "100;100", "alternatives": false}))?;
/// let pairs: Vec<_> = params.iter().collect();
/// assert_eq!(pairs, [("alternatives", "false"), ("radiuses", "100;100")]);
/// # Ok::<(), rap_core::ExtraParamsError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraParams(BTreeMap<String, String>);

impl ExtraParams {
    /// Construct an empty parameter set.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add or replace a parameter.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace a parameter in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Build parameters from a flat JSON object.
    ///
    /// Strings are taken as-is; numbers and booleans are stringified.
    pub fn from_json(value: &Value) -> Result<Self, ExtraParamsError> {
        let object = value.as_object().ok_or(ExtraParamsError::NotAnObject)?;
        let mut params = Self::new();
        for (key, entry) in object {
            let rendered = match entry {
                Value::String(text) => text.clone(),
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => {
                    return Err(ExtraParamsError::UnsupportedValue { key: key.clone() });
                }
            };
            params.insert(key.clone(), rendered);
        }
        Ok(params)
    }
}

impl<K, V> FromIterator<(K, V)> for ExtraParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
