//! Test-only functionality shared among multiple test modules.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};

use crate::Optional;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Level {
    Low,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Compound {
    pub id: u64,
    pub name: String,
    pub tags: Vec<String>,
    pub level: Level,
    pub parent: Optional<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct Meters(pub f64);

impl Compound {
    pub(crate) fn sample() -> Self {
        Self {
            id: 5,
            name: "test".to_owned(),
            tags: vec!["first".to_owned(), "second".to_owned()],
            level: Level::High,
            parent: Optional::absent(),
        }
    }
}

pub(crate) fn optional<T: std::fmt::Debug>(
    payload: impl Strategy<Value = T>,
) -> impl Strategy<Value = Optional<T>> {
    proptest::option::of(payload).prop_map(Optional::from)
}

pub(crate) fn compound() -> impl Strategy<Value = Compound> {
    let level = prop_oneof![Just(Level::Low), Just(Level::High)];
    let tags = proptest::collection::vec("[a-z]{0,8}", 0..4);
    (any::<u64>(), ".*", tags, level, optional(any::<u32>())).prop_map(
        |(id, name, tags, level, parent)| Compound {
            id,
            name,
            tags,
            level,
            parent,
        },
    )
}
