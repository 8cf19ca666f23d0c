//! Presence tracking
//!
//! A field is present when its input key appears in the raw input, whatever
//! the value. Keys are matched exactly; undeclared keys are ignored.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::schema::Schema;
use crate::value::Value;

/// Names of the fields whose input key was supplied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceSet {
    fields: BTreeSet<String>,
}

impl PresenceSet {
    /// Records which of the schema's fields have their key in `raw`.
    pub fn track(raw: &IndexMap<String, Value>, schema: &Schema) -> Self {
        let fields = schema
            .fields()
            .iter()
            .filter(|field| raw.contains_key(field.key()))
            .map(|field| field.name().to_string())
            .collect();
        Self { fields }
    }

    /// Whether the field was explicitly supplied
    pub fn was_filled(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    /// Present field names in name order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DeclaredType, FieldDecl, SchemaBuilder};

    fn schema() -> Schema {
        SchemaBuilder::new("Post")
            .field(FieldDecl::new("title", DeclaredType::String))
            .field(FieldDecl::new("post", DeclaredType::Int).nullable())
            .field(FieldDecl::new("post_status", DeclaredType::String).from_key("postStatus"))
            .build()
            .unwrap()
    }

    fn raw(pairs: &[(&str, Value)]) -> IndexMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_null_value_counts_as_present() {
        let presence = PresenceSet::track(&raw(&[("post", Value::Null)]), &schema());
        assert!(presence.was_filled("post"));
        assert!(!presence.was_filled("title"));
    }

    #[test]
    fn test_undeclared_keys_ignored() {
        let presence = PresenceSet::track(
            &raw(&[("title", Value::from("x")), ("extra", Value::Int(1))]),
            &schema(),
        );
        assert_eq!(presence.len(), 1);
        assert!(!presence.was_filled("extra"));
    }

    #[test]
    fn test_keys_match_exactly() {
        let presence = PresenceSet::track(&raw(&[("Title", Value::from("x"))]), &schema());
        assert!(presence.is_empty());
    }

    #[test]
    fn test_presence_follows_input_key() {
        let presence = PresenceSet::track(&raw(&[("postStatus", Value::from("draft"))]), &schema());
        assert!(presence.was_filled("post_status"));

        let by_name = PresenceSet::track(&raw(&[("post_status", Value::from("draft"))]), &schema());
        assert!(!by_name.was_filled("post_status"));
    }
}
