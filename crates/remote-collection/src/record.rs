//! Record Contract
//!
//! Every collection element exposes its editable fields by name so that one
//! generic view can render rows, the create form and the edit modal.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// One editable field of a record or draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Serialized field name
    pub name: &'static str,
    /// Human readable label
    pub label: &'static str,
}

/// Named string fields, in display order
pub trait Fields {
    const FIELDS: &'static [FieldSpec];

    fn field(&self, name: &str) -> Option<&str>;

    /// Returns false when `name` is not a field of this type
    fn set_field(&mut self, name: &str, value: String) -> bool;

    /// Names of fields that are empty or whitespace only
    fn missing_fields(&self) -> Vec<&'static str> {
        Self::FIELDS
            .iter()
            .filter(|spec| self.field(spec.name).map_or(true, |v| v.trim().is_empty()))
            .map(|spec| spec.name)
            .collect()
    }
}

/// A server-owned record living in a remote collection
pub trait Record:
    Fields + Clone + PartialEq + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The create body: the record without its server-assigned id
    type Draft: Fields + Clone + Default + PartialEq + std::fmt::Debug + Serialize + Send + Sync + 'static;

    /// REST path segment and log label, e.g. `users`
    const RESOURCE: &'static str;
    /// Singular display name, e.g. `User`
    const LABEL: &'static str;

    /// Server-assigned id; `None` until the server has confirmed the record
    fn id(&self) -> Option<&str>;

    /// Placeholder shown while a create is in flight
    fn from_draft(draft: &Self::Draft) -> Self;
}
