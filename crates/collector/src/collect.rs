use crate::error::{CollectorError, Result};
use framefield_protocol::FieldRecord;
use std::collections::HashMap;

/// Produces this frame's own field records.
///
/// Called synchronously, once per frame at startup. Implementations own
/// whatever document access they need; the aggregation core only sees
/// the resulting records.
pub trait LocalCollector {
    fn collect_fields(&self) -> Result<Vec<FieldRecord>>;
}

/// Collector over a fixed list of records.
#[derive(Debug, Clone, Default)]
pub struct StaticFields {
    fields: Vec<FieldRecord>,
}

impl StaticFields {
    pub fn new(fields: Vec<FieldRecord>) -> Self {
        Self { fields }
    }
}

impl LocalCollector for StaticFields {
    fn collect_fields(&self) -> Result<Vec<FieldRecord>> {
        Ok(self.fields.clone())
    }
}

/// A label pointing at a field element by id, with its display text.
#[derive(Debug, Clone)]
pub struct Label {
    pub target: String,
    pub text: String,
}

/// In-memory stand-in for a frame's label markup: labels reference field
/// elements by id, and each referenced element carries the field name.
///
/// A label whose target id resolves to nothing is a collection error;
/// the agent boundary decides what to do with it.
#[derive(Debug, Clone, Default)]
pub struct LabeledDocument {
    labels: Vec<Label>,
    field_names_by_id: HashMap<String, String>,
}

impl LabeledDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a field element: its id and its field name.
    #[must_use]
    pub fn field(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.field_names_by_id.insert(id.into(), name.into());
        self
    }

    /// Adds a label pointing at a field element by id.
    #[must_use]
    pub fn label(mut self, target: impl Into<String>, text: impl Into<String>) -> Self {
        self.labels.push(Label {
            target: target.into(),
            text: text.into(),
        });
        self
    }
}

impl LocalCollector for LabeledDocument {
    fn collect_fields(&self) -> Result<Vec<FieldRecord>> {
        let mut out = Vec::with_capacity(self.labels.len());
        for label in &self.labels {
            let name = self.field_names_by_id.get(&label.target).ok_or_else(|| {
                CollectorError::DanglingLabel {
                    label: label.text.clone(),
                    target: label.target.clone(),
                }
            })?;
            out.push(FieldRecord::new(name.clone(), label.text.clone()));
        }
        Ok(out)
    }
}
