//! Relational storage encoding for [`Optional`].
//!
//! Storage layers exchange values with the database driver as [`DriverValue`]s. An [`Optional`] is stored
//! as the native null value if it is absent, and as a JSON-encoded byte blob if it is present.
//! Scanning is more lenient since drivers may return values in a variety of shapes:
//!
//! - [`DriverValue::Null`] is scanned as an absent container.
//! - A scalar or text value having *exactly* the payload type (e.g., [`DriverValue::Int`] for `i64`
//!   or [`DriverValue::Text`] for `String`) is accepted as is.
//! - Otherwise, text and byte values are decoded as JSON.
//! - All other values are rejected with [`ScanError::UnsupportedType`]. There is no implicit coercion;
//!   e.g., an `Int` value cannot be scanned into an `Optional<i32>`.
//!
//! # Examples
//!
//! ```
//! use optional_value::{DriverValue, Optional};
//!
//! let stored = Optional::present(vec![1_u32, 2]).store()?;
//! assert_eq!(stored, DriverValue::Bytes(b"[1,2]".to_vec()));
//! let scanned = Optional::<Vec<u32>>::scan(stored)?;
//! assert_eq!(scanned, Optional::present(vec![1, 2]));
//!
//! assert_eq!(Optional::<u32>::absent().store()?, DriverValue::Null);
//! assert!(Optional::<u32>::scan(DriverValue::Null)?.is_absent());
//!
//! // Values of the matching type are accepted directly.
//! let scanned = Optional::<i64>::scan(DriverValue::Int(42))?;
//! assert_eq!(scanned, Optional::present(42));
//! # anyhow::Ok(())
//! ```

use std::{any::Any, fmt};

use serde::{Serialize, de::DeserializeOwned};

use crate::{Optional, ScanError, json::PresentPayload};

/// Value exchanged with a database driver.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DriverValue {
    /// Native `NULL`.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
}

impl From<bool> for DriverValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for DriverValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for DriverValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for DriverValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for DriverValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<Vec<u8>> for DriverValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl DriverValue {
    /// Checks whether this is the native null value.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the kind of this value.
    pub const fn kind(&self) -> DriverValueKind {
        match self {
            Self::Null => DriverValueKind::Null,
            Self::Bool(_) => DriverValueKind::Bool,
            Self::Int(_) => DriverValueKind::Int,
            Self::Float(_) => DriverValueKind::Float,
            Self::Text(_) => DriverValueKind::Text,
            Self::Bytes(_) => DriverValueKind::Bytes,
        }
    }

    /// Attempts to extract a payload of exactly the type `T`. Bytes are never extracted directly;
    /// they are always treated as encoded data.
    fn into_exact<T: 'static>(self) -> Result<T, Self> {
        match self {
            Self::Bool(value) => exact_cast(value).map_err(Self::Bool),
            Self::Int(value) => exact_cast(value).map_err(Self::Int),
            Self::Float(value) => exact_cast(value).map_err(Self::Float),
            Self::Text(value) => exact_cast(value).map_err(Self::Text),
            other @ (Self::Null | Self::Bytes(_)) => Err(other),
        }
    }
}

fn exact_cast<T: 'static, U: 'static>(value: U) -> Result<T, U> {
    let mut slot = Some(value);
    let cast = (&mut slot as &mut dyn Any)
        .downcast_mut::<Option<T>>()
        .and_then(Option::take);
    match (cast, slot) {
        (Some(value), _) => Ok(value),
        (None, Some(value)) => Err(value),
        (None, None) => unreachable!("slot is only emptied by a successful cast"),
    }
}

/// Kind of a [`DriverValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverValueKind {
    /// Native `NULL`.
    Null,
    /// Boolean value.
    Bool,
    /// Integer value.
    Int,
    /// Floating-point value.
    Float,
    /// Text value.
    Text,
    /// Raw bytes.
    Bytes,
}

impl fmt::Display for DriverValueKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Int => "integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::Bytes => "bytes",
        })
    }
}

impl<T: Serialize> Optional<T> {
    /// Converts this container into a value to be passed to a database driver.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized to JSON, including the case when it is
    /// a non-finite float (which would be indistinguishable from an absent value otherwise).
    pub fn store(&self) -> serde_json::Result<DriverValue> {
        match self.get() {
            Some(value) => serde_json::to_vec(&PresentPayload(value)).map(DriverValue::Bytes),
            None => Ok(DriverValue::Null),
        }
    }
}

impl<T: DeserializeOwned + 'static> Optional<T> {
    /// Scans a value returned by a database driver.
    ///
    /// # Errors
    ///
    /// - Returns [`ScanError::Json`] if a text / byte value is not valid JSON for `T`.
    /// - Returns [`ScanError::UnsupportedType`] if the value is neither null, nor of type `T`, nor text / bytes.
    pub fn scan(value: DriverValue) -> Result<Self, ScanError> {
        let kind = value.kind();
        if value.is_null() {
            tracing::trace!(%kind, "scanned null driver value");
            return Ok(Self::absent());
        }

        let value = match value.into_exact::<T>() {
            Ok(payload) => {
                tracing::trace!(%kind, "scanned driver value of the payload type");
                return Ok(Self::present(payload));
            }
            Err(value) => value,
        };

        let payload = match value {
            DriverValue::Text(text) => {
                tracing::trace!(%kind, len = text.len(), "decoding driver value as JSON");
                serde_json::from_str(&text)?
            }
            DriverValue::Bytes(bytes) => {
                tracing::trace!(%kind, len = bytes.len(), "decoding driver value as JSON");
                serde_json::from_slice(&bytes)?
            }
            _ => {
                tracing::trace!(%kind, "unsupported driver value");
                return Err(ScanError::UnsupportedType {
                    kind,
                    expected: std::any::type_name::<T>(),
                });
            }
        };
        Ok(Self::present(payload))
    }

    /// Scans a value returned by a database driver into this container. On error, the container
    /// is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Self::scan()`].
    pub fn scan_into(&mut self, value: DriverValue) -> Result<(), ScanError> {
        *self = Self::scan(value)?;
        Ok(())
    }
}
