//! Errors produced when scanning driver values.

use std::fmt;

use crate::storage::DriverValueKind;

/// Error scanning a [`DriverValue`](crate::DriverValue) into an [`Optional`](crate::Optional).
#[derive(Debug)]
#[non_exhaustive]
pub enum ScanError {
    /// Text / byte payload is not valid JSON for the target type.
    Json(serde_json::Error),
    /// Driver value is neither null, nor of the target type, nor text / bytes.
    UnsupportedType {
        /// Kind of the rejected driver value.
        kind: DriverValueKind,
        /// Name of the target payload type.
        expected: &'static str,
    },
    /// Driver reported a value type that has no [`DriverValue`](crate::DriverValue) counterpart.
    UnknownSourceType {
        /// Type name as reported by the driver.
        type_name: String,
        /// Name of the target payload type.
        expected: &'static str,
    },
}

impl fmt::Display for ScanError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => fmt::Display::fmt(err, formatter),
            Self::UnsupportedType { kind, expected } => write!(
                formatter,
                "unsupported source type: cannot scan {kind} value into `{expected}`"
            ),
            Self::UnknownSourceType {
                type_name,
                expected,
            } => write!(
                formatter,
                "unsupported source type: cannot scan driver value of type `{type_name}` into `{expected}`"
            ),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::UnsupportedType { .. } | Self::UnknownSourceType { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl ScanError {
    /// Returns the JSON decoding error, if this error was caused by one.
    pub fn as_json(&self) -> Option<&serde_json::Error> {
        match self {
            Self::Json(err) => Some(err),
            Self::UnsupportedType { .. } | Self::UnknownSourceType { .. } => None,
        }
    }
}
