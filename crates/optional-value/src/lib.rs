//! `optional-value` – present-or-absent value container with lossless JSON and relational storage encodings.
//!
//! # Overview
//!
//! The central type of the library is [`Optional`], a value that is either *present* (holds a payload)
//! or *absent*. It provides a complete set of combinators (mapping, chaining, fallbacks, in-place mutation)
//! and two encodings that preserve the present / absent distinction across a round trip:
//!
//! - [JSON](json): a present container is encoded exactly as its payload; an absent one is encoded as `null`.
//!   Implemented via [`serde`], so it works with any self-describing format.
//! - [Relational storage](storage): a container is converted to / from a [`DriverValue`] exchanged with
//!   a database driver. Absence maps to the native `NULL`, and presence to a JSON-encoded blob.
//!
//! # Error handling
//!
//! [`Optional::expect()`] and [`Optional::unwrap()`] panic if the container is absent; they should be used
//! only if absence is a logic error. Decoding failures are recoverable: JSON errors are returned as
//! [`serde_json::Error`] unchanged, and storage scanning errors as [`ScanError`].
//!
//! # Crate features
//!
//! ## `sqlx`
//!
//! *(Off by default)*
//!
//! Implements [`sqlx::Type`], [`sqlx::Encode`] and [`sqlx::Decode`] for `Optional<T>` with the SQLite backend,
//! so that containers can be bound to queries and read from rows directly. Binding a container fails
//! if [`Optional::store()`] fails, e.g. for a present non-finite float.
//!
//! # Examples
//!
//! ```
//! use optional_value::{json, DriverValue, Optional};
//!
//! let mut name = Optional::<String>::absent();
//! assert_eq!(name.as_ref().map_or(0, String::len), 0);
//! name.get_or_insert_with(|| "anonymous".to_owned()).make_ascii_uppercase();
//! assert_eq!(name.as_ref().unwrap(), "ANONYMOUS");
//!
//! // JSON encoding
//! assert_eq!(json::to_string(&name)?, r#""ANONYMOUS""#);
//! let decoded: Optional<String> = json::from_str("null")?;
//! assert!(decoded.is_absent());
//!
//! // Storage encoding
//! let stored = name.store()?;
//! assert_eq!(stored, DriverValue::Bytes(br#""ANONYMOUS""#.to_vec()));
//! assert_eq!(Optional::<String>::scan(stored)?, name);
//! # anyhow::Ok(())
//! ```

// Documentation settings
#![doc(html_root_url = "https://docs.rs/optional-value/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
// Linter settings
#![warn(missing_docs)]

pub use self::{
    error::ScanError,
    optional::{Iter, Optional},
    storage::{DriverValue, DriverValueKind},
};

mod error;
pub mod json;
mod optional;
#[cfg(feature = "sqlx")]
mod sqlx_impl;
pub mod storage;
#[cfg(test)]
mod testonly;

#[cfg(doctest)]
doc_comment::doctest!("../README.md");
