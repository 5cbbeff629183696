//! Domain identifiers.
//!
//! Task IDs are ULID based: sortable by creation time and generated without
//! coordination, so concurrent `create_task` calls never collide.
//!
//! The textual form is `task-<ULID>`. It is what the API hands out and what
//! it accepts back, so `Display` and `FromStr` must stay symmetric.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

const TASK_PREFIX: &str = "task-";

/// Identifier of a download task.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(Ulid);

impl TaskId {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl From<Ulid> for TaskId {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", TASK_PREFIX, self.0)
    }
}

/// Returned when a string is not a valid `task-<ULID>`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid task id: {0}")]
pub struct ParseTaskIdError(String);

impl FromStr for TaskId {
    type Err = ParseTaskIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .strip_prefix(TASK_PREFIX)
            .ok_or_else(|| ParseTaskIdError(s.to_string()))?;
        Ulid::from_string(raw)
            .map(Self)
            .map_err(|_| ParseTaskIdError(s.to_string()))
    }
}

impl Serialize for TaskId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
