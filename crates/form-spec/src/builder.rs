use std::io;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::{
    render::render_form,
    request::RequestData,
    slug::slugify,
    spec::{form::FormConfig, input::InputField},
};

/// Collects form settings and an ordered queue of input fields, then renders them.
#[derive(Debug, Clone)]
pub struct FormBuilder {
    config: FormConfig,
    inputs: IndexMap<String, InputField>,
}

impl Default for FormBuilder {
    fn default() -> Self {
        Self::new("", None)
    }
}

impl FormBuilder {
    /// Seed the default settings with `action` and merge `overrides` over them.
    pub fn new(action: &str, overrides: Option<&Map<String, Value>>) -> Self {
        Self {
            config: FormConfig::from_overrides(action, overrides),
            inputs: IndexMap::new(),
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Change one form setting. Returns `false` and leaves the settings untouched when the
    /// key is unknown or the value fails its whitelist.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> bool {
        let value = value.into();
        let stored = self.config.set(key, &value);
        if !stored {
            tracing::debug!(key = %key, %value, "form setting rejected");
        }
        stored
    }

    /// Queue a field. An empty `slug` is derived from `label`; `overrides` is merged over
    /// the field defaults (anything other than an object counts as no overrides). A slug
    /// already in the queue is replaced in place.
    pub fn add_input(&mut self, label: &str, overrides: Value, slug: &str) -> &mut Self {
        let slug = if slug.is_empty() {
            slugify(label)
        } else {
            slug.to_string()
        };
        let field = match &overrides {
            Value::Object(map) => InputField::new(label, &slug).merge(map),
            _ => InputField::new(label, &slug),
        };
        self.inputs.insert(slug, field);
        self
    }

    /// Queue several `[label, overrides?, slug?]` entries in order. Returns `false`
    /// without touching the queue when `entries` is not an array.
    pub fn add_inputs(&mut self, entries: &Value) -> bool {
        let Value::Array(entries) = entries else {
            return false;
        };

        for entry in entries {
            let Value::Array(parts) = entry else {
                tracing::debug!(%entry, "skipping input entry that is not an array");
                continue;
            };
            let label = parts.first().map(text_of).unwrap_or_default();
            let overrides = parts.get(1).cloned().unwrap_or(Value::Null);
            let slug = parts.get(2).map(text_of).unwrap_or_default();
            self.add_input(&label, overrides, &slug);
        }

        true
    }

    /// Stored descriptor for `slug`, as queued (before any request repopulation).
    pub fn get_input(&self, slug: &str) -> Option<&InputField> {
        self.inputs.get(slug)
    }

    /// Queued `(slug, field)` pairs in render order.
    pub fn inputs(&self) -> impl Iterator<Item = (&str, &InputField)> {
        self.inputs.iter().map(|(slug, field)| (slug.as_str(), field))
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Render the whole form as one HTML string.
    pub fn render(&self, request: &RequestData) -> String {
        render_form(&self.config, self.inputs.values(), request)
    }

    /// Render and write the markup straight to `out`.
    pub fn emit<W: io::Write>(&self, request: &RequestData, out: &mut W) -> io::Result<()> {
        out.write_all(self.render(request).as_bytes())
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn derived_slug_becomes_name_and_id() {
        let mut builder = FormBuilder::default();
        builder.add_input("Contact Name!", Value::Null, "");
        let field = builder.get_input("contact-name-").expect("queued field");
        assert_eq!(field.name, "contact-name-");
        assert_eq!(field.id, "contact-name-");
        assert_eq!(field.label, "Contact Name!");
    }

    #[test]
    fn explicit_slug_is_kept_verbatim() {
        let mut builder = FormBuilder::default();
        builder.add_input("Nome", json!({ "request_populate": false }), "contact_name");
        let field = builder.get_input("contact_name").expect("queued field");
        assert_eq!(field.name, "contact_name");
        assert!(!field.request_populate);
    }

    #[test]
    fn re_adding_a_slug_overwrites_in_place() {
        let mut builder = FormBuilder::default();
        builder
            .add_input("First", Value::Null, "")
            .add_input("Second", Value::Null, "")
            .add_input("Other", json!({ "value": "x" }), "first");
        assert_eq!(builder.len(), 2);
        let order: Vec<_> = builder.inputs().map(|(slug, _)| slug).collect();
        assert_eq!(order, vec!["first", "second"]);
        let first = builder.get_input("first").expect("first");
        assert_eq!(first.label, "Other");
        assert_eq!(first.value, "x");
    }

    #[test]
    fn add_inputs_rejects_non_arrays() {
        let mut builder = FormBuilder::default();
        assert!(!builder.add_inputs(&json!({ "label": "Name" })));
        assert!(!builder.add_inputs(&json!("Name")));
        assert!(builder.is_empty());
    }

    #[test]
    fn add_inputs_defaults_missing_parts() {
        let mut builder = FormBuilder::default();
        let accepted = builder.add_inputs(&json!([
            ["Email"],
            ["Message", { "type": "textarea" }],
            ["Topic", {}, "subject"],
            "not an entry"
        ]));
        assert!(accepted);
        let slugs: Vec<_> = builder.inputs().map(|(slug, _)| slug).collect();
        assert_eq!(slugs, vec!["email", "message", "subject"]);
    }

    #[test]
    fn set_reports_rejection_without_mutation() {
        let mut builder = FormBuilder::default();
        assert!(builder.set("method", "get"));
        assert!(!builder.set("method", "delete"));
        assert!(!builder.set("colour", "red"));
        assert_eq!(builder.config().method.as_str(), "get");
    }
}
