//! JSON encoding for [`Optional`].
//!
//! A present container is encoded exactly as its payload, with no extra tagging; an absent container
//! is encoded as `null`. Conversely, `null` always decodes to an absent container, and any other input
//! is decoded as the payload type. Decoding errors are returned unchanged.
//!
//! Non-finite floats (`NaN` and infinities) are not representable in JSON, and `serde_json` would silently
//! encode them as `null`, turning a present container into an absent one. Encoding a present container
//! therefore fails if its payload is a non-finite float (possibly wrapped into newtypes or `Some(_)`).
//!
//! The [`Serialize`] / [`Deserialize`] implementations are format-agnostic; the functions in this module
//! are shortcuts for JSON specifically.
//!
//! # Examples
//!
//! ```
//! use optional_value::{json, Optional};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct User {
//!     name: String,
//!     email: Optional<String>,
//! }
//!
//! let user: User = serde_json::from_str(r#"{ "name": "alice", "email": null }"#)?;
//! assert!(user.email.is_absent());
//! assert_eq!(serde_json::to_string(&user)?, r#"{"name":"alice","email":null}"#);
//!
//! let user: User = serde_json::from_str(r#"{ "name": "bob", "email": "bob@example.com" }"#)?;
//! assert_eq!(json::to_string(&user.email)?, r#""bob@example.com""#);
//!
//! assert!(json::to_vec(&Optional::present(f64::NAN)).is_err());
//! # anyhow::Ok(())
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::DeserializeOwned, ser};

use crate::Optional;

impl<T: Serialize> Serialize for Optional<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.get() {
            Some(value) => PresentPayload(value).serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

/// Payload of a present container. Serializes as the wrapped value, but rejects top-level non-finite floats,
/// which self-describing formats may encode as `null`.
#[derive(Debug)]
pub(crate) struct PresentPayload<'a, T: ?Sized>(pub &'a T);

impl<T: Serialize + ?Sized> Serialize for PresentPayload<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(FiniteFloats(serializer))
    }
}

#[cold]
fn non_finite_float<E: ser::Error>(value: impl fmt::Display) -> E {
    E::custom(format_args!(
        "cannot encode non-finite float `{value}` as a present value"
    ))
}

macro_rules! forward_values {
    ($($method:ident($ty:ty),)*) => {
        $(
        fn $method(self, value: $ty) -> Result<Self::Ok, Self::Error> {
            self.0.$method(value)
        }
        )*
    };
}

/// Serializer wrapper rejecting non-finite floats; looks through newtypes and `Some(_)`.
struct FiniteFloats<S>(S);

impl<S: Serializer> Serializer for FiniteFloats<S> {
    type Ok = S::Ok;
    type Error = S::Error;
    type SerializeSeq = S::SerializeSeq;
    type SerializeTuple = S::SerializeTuple;
    type SerializeTupleStruct = S::SerializeTupleStruct;
    type SerializeTupleVariant = S::SerializeTupleVariant;
    type SerializeMap = S::SerializeMap;
    type SerializeStruct = S::SerializeStruct;
    type SerializeStructVariant = S::SerializeStructVariant;

    forward_values!(
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_i128(i128),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_u128(u128),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
    );

    fn serialize_f32(self, value: f32) -> Result<Self::Ok, Self::Error> {
        if value.is_finite() {
            self.0.serialize_f32(value)
        } else {
            Err(non_finite_float(value))
        }
    }

    fn serialize_f64(self, value: f64) -> Result<Self::Ok, Self::Error> {
        if value.is_finite() {
            self.0.serialize_f64(value)
        } else {
            Err(non_finite_float(value))
        }
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        self.0.serialize_none()
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Self::Ok, Self::Error> {
        self.0.serialize_some(&PresentPayload(value))
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        self.0.serialize_unit()
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Self::Ok, Self::Error> {
        self.0.serialize_unit_struct(name)
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        self.0.serialize_unit_variant(name, variant_index, variant)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        self.0.serialize_newtype_struct(name, &PresentPayload(value))
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        self.0
            .serialize_newtype_variant(name, variant_index, variant, value)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        self.0.serialize_seq(len)
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        self.0.serialize_tuple(len)
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        self.0.serialize_tuple_struct(name, len)
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        self.0
            .serialize_tuple_variant(name, variant_index, variant, len)
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        self.0.serialize_map(len)
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        self.0.serialize_struct(name, len)
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        self.0
            .serialize_struct_variant(name, variant_index, variant, len)
    }

    fn collect_str<T: ?Sized + fmt::Display>(self, value: &T) -> Result<Self::Ok, Self::Error> {
        self.0.collect_str(value)
    }

    fn is_human_readable(&self) -> bool {
        self.0.is_human_readable()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Optional<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // `null` is mapped to `None` by the deserializer before `T` gets a say
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

/// Encodes a container as a JSON byte vector.
///
/// # Errors
///
/// Propagates serialization errors for the payload.
pub fn to_vec<T: Serialize>(value: &Optional<T>) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(value)
}

/// Encodes a container as a JSON string.
///
/// # Errors
///
/// Propagates serialization errors for the payload.
pub fn to_string<T: Serialize>(value: &Optional<T>) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

/// Decodes a container from JSON bytes.
///
/// # Errors
///
/// Returns the `serde_json` error if `bytes` are neither `null` nor valid JSON for `T`.
pub fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> serde_json::Result<Optional<T>> {
    serde_json::from_slice(bytes)
}

/// Decodes a container from a JSON string.
///
/// # Errors
///
/// Returns the `serde_json` error if `s` is neither `null` nor valid JSON for `T`.
pub fn from_str<T: DeserializeOwned>(s: &str) -> serde_json::Result<Optional<T>> {
    serde_json::from_str(s)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;
    use test_casing::test_casing;

    use super::*;
    use crate::testonly::{Compound, Level, Meters};

    #[test]
    fn encoding_primitives() {
        assert_eq!(to_vec(&Optional::present(42)).unwrap(), b"42");
        assert_eq!(to_vec(&Optional::present("test")).unwrap(), br#""test""#);
        assert_eq!(to_vec(&Optional::<u32>::absent()).unwrap(), b"null");
        assert_eq!(to_vec(&Optional::<String>::absent()).unwrap(), b"null");
    }

    #[test]
    fn encoding_composite_values() {
        let value = Optional::present(Compound::sample());
        let json = serde_json::to_value(value).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 5,
                "name": "test",
                "tags": ["first", "second"],
                "level": "high",
                "parent": null,
            })
        );

        let value = Optional::present(vec![Optional::present(1), Optional::absent()]);
        assert_eq!(to_string(&value).unwrap(), "[1,null]");
    }

    #[test_casing(5, ["null", " null", "null\n", "\tnull ", "null\r\n"])]
    #[test]
    fn null_always_decodes_to_absent(input: &str) {
        assert_eq!(from_slice::<u64>(input.as_bytes()).unwrap(), Optional::absent());
        assert_eq!(from_slice::<String>(input.as_bytes()).unwrap(), Optional::absent());
        assert_eq!(from_slice::<Compound>(input.as_bytes()).unwrap(), Optional::absent());
        assert_eq!(
            from_slice::<Vec<Optional<u8>>>(input.as_bytes()).unwrap(),
            Optional::absent()
        );
    }

    #[test]
    fn decoding_present_values() {
        assert_eq!(from_slice::<u64>(b"42").unwrap(), Optional::present(42));
        assert_eq!(
            from_slice::<String>(br#""null""#).unwrap(),
            Optional::present("null".to_owned())
        );
        assert_eq!(from_slice::<Level>(br#""low""#).unwrap(), Optional::present(Level::Low));

        let map: Optional<HashMap<String, Optional<i32>>> =
            from_slice(br#"{ "a": 1, "b": null }"#).unwrap();
        let map = map.unwrap();
        assert_eq!(map["a"], Optional::present(1));
        assert_eq!(map["b"], Optional::absent());
    }

    #[test]
    fn decoding_error_is_propagated() {
        let err = from_slice::<u64>(br#""not a number""#).unwrap_err();
        assert!(err.is_data(), "{err}");
        assert!(err.to_string().contains("invalid type"), "{err}");

        let err = from_slice::<u64>(b"nulx").unwrap_err();
        assert!(err.is_syntax(), "{err}");

        let err = from_slice::<Level>(br#""medium""#).unwrap_err();
        assert!(err.to_string().contains("unknown variant"), "{err}");
    }

    #[test]
    fn decoding_error_matches_payload_error() {
        let input = br#"{ "id": "five" }"#;
        let payload_err = serde_json::from_slice::<Compound>(input).unwrap_err();
        let err = from_slice::<Compound>(input).unwrap_err();
        assert_eq!(err.to_string(), payload_err.to_string());
        assert_matches!(err.classify(), serde_json::error::Category::Data);
    }

    #[test]
    fn decoding_struct_fields() {
        let compound: Compound = serde_json::from_str(
            r#"{ "id": 1, "name": "test", "tags": [], "level": "low", "parent": 3 }"#,
        )
        .unwrap();
        assert_eq!(compound.parent, Optional::present(3));

        let compound: Compound = serde_json::from_str(
            r#"{ "id": 1, "name": "test", "tags": [], "level": "low", "parent": null }"#,
        )
        .unwrap();
        assert_eq!(compound.parent, Optional::absent());

        let compound: Compound =
            serde_json::from_str(r#"{ "id": 1, "name": "test", "tags": [], "level": "low" }"#)
                .unwrap();
        assert_eq!(compound.parent, Optional::absent());
        assert_eq!(from_str::<u32>(" 3 ").unwrap(), Optional::present(3));
    }

    #[test_casing(3, [f64::NAN, f64::INFINITY, f64::NEG_INFINITY])]
    #[test]
    fn non_finite_floats_are_rejected(value: f64) {
        let err = to_vec(&Optional::present(value)).unwrap_err();
        assert!(err.to_string().contains("non-finite float"), "{err}");

        let err = to_vec(&Optional::present(Meters(value))).unwrap_err();
        assert!(err.to_string().contains("non-finite float"), "{err}");
        let err = to_vec(&Optional::present(Some(value))).unwrap_err();
        assert!(err.to_string().contains("non-finite float"), "{err}");
        let err = to_vec(&Optional::present(Optional::present(value))).unwrap_err();
        assert!(err.to_string().contains("non-finite float"), "{err}");

        let err = to_string(&Optional::present(f32::NAN)).unwrap_err();
        assert!(err.to_string().contains("non-finite float"), "{err}");

        // Nested floats cannot turn the container into `null`
        let encoded = to_string(&Optional::present(vec![value])).unwrap();
        assert_eq!(encoded, "[null]");
    }

    #[test]
    fn finite_floats_round_trip() {
        for value in [0.0, -0.0, 1.5, -1e-300, f64::MAX, f64::MIN_POSITIVE] {
            let encoded = to_vec(&Optional::present(value)).unwrap();
            assert_eq!(from_slice::<f64>(&encoded).unwrap(), Optional::present(value));
        }
        let encoded = to_string(&Optional::present(Meters(2.5))).unwrap();
        assert_eq!(encoded, "2.5");
        assert_eq!(from_str(&encoded).unwrap(), Optional::present(Meters(2.5)));
    }

    #[test]
    fn nested_null_collapses_to_outer_absent() {
        let value: Optional<Optional<u8>> = from_slice(b"null").unwrap();
        assert_eq!(value, Optional::absent());
        let value: Optional<Optional<u8>> = from_slice(b"7").unwrap();
        assert_eq!(value.flatten(), Optional::present(7));
    }
}
