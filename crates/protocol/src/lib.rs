//! Wire-level data model shared by every frame in the tree: field records,
//! the upward report, and the completion payload the root dispatches.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Name of the event the root emits once every frame has reported.
pub const FIELDS_LOADED_EVENT: &str = "frames:loaded";

/// One field, as scraped from a frame: a field name paired with its
/// display label. Duplicate names across frames are preserved, never
/// deduplicated.
///
/// Wire shape is a single-entry object, `{"<name>": "<label>"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRecord {
    pub name: String,
    pub label: String,
}

impl FieldRecord {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }

    /// Sort key for the final ordering: the field name, compared bytewise.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.name
    }
}

impl Serialize for FieldRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.label)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = FieldRecord;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a single-entry map of field name to label")
            }

            fn visit_map<A>(self, mut access: A) -> Result<FieldRecord, A::Error>
            where
                A: MapAccess<'de>,
            {
                let (name, label): (String, String) = access
                    .next_entry()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                if access.next_entry::<String, String>()?.is_some() {
                    return Err(de::Error::invalid_length(2, &self));
                }
                Ok(FieldRecord { name, label })
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// The message a frame sends toward the root, exactly once.
///
/// `descendant_count` is the number of frames subordinate to the sender
/// as resolved at send time; under star topology this is the sender's
/// immediate child count, and the root recovers the true tree size by
/// summation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub fields: Vec<FieldRecord>,
    pub descendant_count: usize,
}

impl Report {
    pub fn new(fields: Vec<FieldRecord>, descendant_count: usize) -> Self {
        Self {
            fields,
            descendant_count,
        }
    }
}

/// Payload of the one-shot completion event: every frame's fields,
/// merged and fully sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldsLoaded {
    pub fields: Vec<FieldRecord>,
}
