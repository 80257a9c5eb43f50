use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field kinds understood by the renderer. Anything else renders as a plain `<input>`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    #[default]
    Text,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Hidden,
    Submit,
    /// Raw markup taken from the label; no element, no wrap.
    Html,
    /// `<h3>` heading taken from the label.
    Title,
    Range,
    Number,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Hidden => "hidden",
            FieldType::Submit => "submit",
            FieldType::Html => "html",
            FieldType::Title => "title",
            FieldType::Range => "range",
            FieldType::Number => "number",
            FieldType::Other(kind) => kind,
        }
    }

    /// Types whose request value never overwrites `value` directly.
    pub fn skips_value_repopulation(&self) -> bool {
        matches!(
            self,
            FieldType::Html
                | FieldType::Title
                | FieldType::Radio
                | FieldType::Checkbox
                | FieldType::Select
                | FieldType::Submit
        )
    }

    /// Types that never get an automatic `<label>`.
    pub fn skips_label(&self) -> bool {
        matches!(
            self,
            FieldType::Hidden | FieldType::Submit | FieldType::Title | FieldType::Html
        )
    }

    /// Types emitted without the wrap tag and before/after markup.
    pub fn skips_wrap(&self) -> bool {
        matches!(self, FieldType::Hidden | FieldType::Html)
    }

    pub fn is_toggle(&self) -> bool {
        matches!(self, FieldType::Radio | FieldType::Checkbox)
    }

    pub fn takes_range(&self) -> bool {
        matches!(self, FieldType::Range | FieldType::Number)
    }
}

impl From<String> for FieldType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "text" => FieldType::Text,
            "textarea" => FieldType::Textarea,
            "select" => FieldType::Select,
            "radio" => FieldType::Radio,
            "checkbox" => FieldType::Checkbox,
            "hidden" => FieldType::Hidden,
            "submit" => FieldType::Submit,
            "html" => FieldType::Html,
            "title" => FieldType::Title,
            "range" => FieldType::Range,
            "number" => FieldType::Number,
            _ => FieldType::Other(raw),
        }
    }
}

impl From<&str> for FieldType {
    fn from(raw: &str) -> Self {
        FieldType::from(raw.to_string())
    }
}

impl From<FieldType> for String {
    fn from(kind: FieldType) -> Self {
        match kind {
            FieldType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// A `class` attribute value, either one verbatim string or a list of classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ClassList {
    Text(String),
    List(Vec<String>),
}

impl ClassList {
    pub fn list<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ClassList::List(classes.into_iter().map(Into::into).collect())
    }

    /// True only for an empty list; an empty string still renders ` class=""`.
    pub fn is_empty(&self) -> bool {
        matches!(self, ClassList::List(classes) if classes.is_empty())
    }
}

impl Default for ClassList {
    fn default() -> Self {
        ClassList::List(Vec::new())
    }
}

/// A queued input field. Override maps use these field names as keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InputField {
    #[serde(rename = "type")]
    #[schemars(with = "String")]
    pub kind: FieldType,
    pub name: String,
    pub id: String,
    pub label: String,
    pub value: String,
    pub placeholder: String,
    pub class: ClassList,
    pub min: String,
    pub max: String,
    pub step: String,
    pub autofocus: bool,
    pub checked: bool,
    /// Option key selected by default in a `select`.
    pub selected: Option<String>,
    pub required: bool,
    pub add_label: bool,
    /// Option value to display label, in display order.
    pub options: IndexMap<String, String>,
    pub wrap_tag: String,
    pub wrap_class: ClassList,
    pub wrap_id: String,
    pub wrap_style: String,
    pub before_html: String,
    pub after_html: String,
    pub request_populate: bool,
}

impl InputField {
    /// Defaults for a field registered under `slug`.
    pub fn new(label: impl Into<String>, slug: &str) -> Self {
        Self {
            kind: FieldType::Text,
            name: slug.to_string(),
            id: slug.to_string(),
            label: label.into(),
            value: String::new(),
            placeholder: String::new(),
            class: ClassList::default(),
            min: String::new(),
            max: String::new(),
            step: String::new(),
            autofocus: false,
            checked: false,
            selected: None,
            required: false,
            add_label: true,
            options: IndexMap::new(),
            wrap_tag: "div".into(),
            wrap_class: ClassList::list(["form_field_wrap"]),
            wrap_id: String::new(),
            wrap_style: String::new(),
            before_html: String::new(),
            after_html: String::new(),
            request_populate: true,
        }
    }

    /// Radio and checkbox fields with options render as a group of inputs.
    pub fn is_group(&self) -> bool {
        self.kind.is_toggle() && !self.options.is_empty()
    }

    /// Apply `overrides` key by key. A value that does not fit its attribute is skipped
    /// and the current value is kept; unknown keys are ignored.
    pub fn merge(self, overrides: &Map<String, Value>) -> Self {
        if overrides.is_empty() {
            return self;
        }
        let Ok(Value::Object(mut current)) = serde_json::to_value(&self) else {
            return self;
        };
        let mut merged = self;

        for (key, raw) in overrides {
            let Some(previous) = current.get(key).cloned() else {
                tracing::debug!(key = %key, "ignoring unknown input attribute");
                continue;
            };

            let accepted = candidates(&previous, raw).into_iter().find_map(|candidate| {
                let mut attempt = current.clone();
                attempt.insert(key.clone(), candidate.clone());
                serde_json::from_value::<InputField>(Value::Object(attempt))
                    .ok()
                    .map(|field| (candidate, field))
            });

            match accepted {
                Some((candidate, field)) => {
                    current.insert(key.clone(), candidate);
                    merged = field;
                }
                None => {
                    tracing::debug!(key = %key, value = %raw, "input attribute rejected; keeping default");
                }
            }
        }

        merged
    }
}

/// Values to try for an override, most faithful first. Scalars are stringified for
/// string attributes; an option list becomes a map keyed by position and option labels
/// are stringified.
fn candidates(previous: &Value, raw: &Value) -> Vec<Value> {
    let mut attempts = vec![raw.clone()];
    match raw {
        Value::Number(_) | Value::Bool(_) => attempts.push(Value::String(raw.to_string())),
        Value::Null if previous.is_string() => attempts.push(Value::String(String::new())),
        Value::Array(items) if previous.is_object() => {
            let indexed = items
                .iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), Value::String(scalar_text(item))))
                .collect::<Map<_, _>>();
            attempts.push(Value::Object(indexed));
        }
        Value::Array(items) => {
            attempts.push(Value::Array(
                items
                    .iter()
                    .map(|item| Value::String(scalar_text(item)))
                    .collect(),
            ));
        }
        Value::Object(entries) if previous.is_object() => {
            let stringified = entries
                .iter()
                .map(|(key, item)| (key.clone(), Value::String(scalar_text(item))))
                .collect::<Map<_, _>>();
            attempts.push(Value::Object(stringified));
        }
        _ => {}
    }
    attempts
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
