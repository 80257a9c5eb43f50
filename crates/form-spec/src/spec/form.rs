use serde_json::{Map, Value};

use crate::spec::input::ClassList;

/// HTTP method used by the form element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Post,
    Get,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Post => "post",
            Method::Get => "get",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "post" => Some(Method::Post),
            "get" => Some(Method::Get),
            _ => None,
        }
    }
}

/// Encoding of the submitted body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Enctype {
    #[default]
    UrlEncoded,
    Multipart,
}

impl Enctype {
    /// MIME type written into the `enctype` attribute.
    pub fn as_mime(&self) -> &'static str {
        match self {
            Enctype::UrlEncoded => "application/x-www-form-urlencoded",
            Enctype::Multipart => "multipart/form-data",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "urlencoded" | "application/x-www-form-urlencoded" => Some(Enctype::UrlEncoded),
            "multipart" | "multipart/form-data" => Some(Enctype::Multipart),
            _ => None,
        }
    }
}

/// Controls how void elements are closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Markup {
    #[default]
    Html,
    Xhtml,
}

impl Markup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Markup::Html => "html",
            Markup::Xhtml => "xhtml",
        }
    }

    /// Closing sequence for a void element such as `<input>`.
    pub fn field_close(&self) -> &'static str {
        match self {
            Markup::Html => ">",
            Markup::Xhtml => " />",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "html" => Some(Markup::Html),
            "xhtml" => Some(Markup::Xhtml),
            _ => None,
        }
    }
}

/// Nonce request attached to the form. Stored for callers; the renderer emits nothing for it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Nonce {
    #[default]
    Disabled,
    Enabled,
    Token(String),
}

impl Nonce {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(true) => Some(Nonce::Enabled),
            Value::Bool(false) => Some(Nonce::Disabled),
            Value::String(token) => Some(Nonce::Token(token.clone())),
            _ => None,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Nonce::Disabled => Value::Bool(false),
            Nonce::Enabled => Value::Bool(true),
            Nonce::Token(token) => Value::String(token.clone()),
        }
    }
}

/// Form-level attributes and feature flags.
#[derive(Debug, Clone, PartialEq)]
pub struct FormConfig {
    pub action: String,
    pub method: Method,
    pub enctype: Enctype,
    pub class: ClassList,
    pub id: String,
    pub markup: Markup,
    pub novalidate: bool,
    pub add_nonce: Nonce,
    pub add_honeypot: bool,
    pub form_element: bool,
    pub add_submit: bool,
}

impl FormConfig {
    /// Defaults for every setting, with the given action.
    pub fn with_action(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            method: Method::Post,
            enctype: Enctype::UrlEncoded,
            class: ClassList::default(),
            id: String::new(),
            markup: Markup::Html,
            novalidate: false,
            add_nonce: Nonce::Disabled,
            add_honeypot: true,
            form_element: true,
            add_submit: true,
        }
    }

    /// Validate `value` for `key` and store it. Unknown keys and rejected values leave
    /// the config untouched and return `false`.
    pub fn set(&mut self, key: &str, value: &Value) -> bool {
        match SETTING_RULES.iter().find(|(name, _)| *name == key) {
            Some((_, apply)) => apply(self, value),
            None => false,
        }
    }

    /// Current value of a setting in the dynamic form accepted by [`FormConfig::set`].
    pub fn get(&self, key: &str) -> Option<Value> {
        let value = match key {
            "action" => Value::String(self.action.clone()),
            "method" => Value::String(self.method.as_str().into()),
            "enctype" => Value::String(self.enctype.as_mime().into()),
            "class" => match &self.class {
                ClassList::Text(text) => Value::String(text.clone()),
                ClassList::List(classes) => {
                    Value::Array(classes.iter().cloned().map(Value::String).collect())
                }
            },
            "id" => Value::String(self.id.clone()),
            "markup" => Value::String(self.markup.as_str().into()),
            "novalidate" => Value::Bool(self.novalidate),
            "add_nonce" => self.add_nonce.to_value(),
            "add_honeypot" => Value::Bool(self.add_honeypot),
            "form_element" => Value::Bool(self.form_element),
            "add_submit" => Value::Bool(self.add_submit),
            _ => return None,
        };
        Some(value)
    }

    /// Defaults merged with `overrides`. A rejected override falls back to the default
    /// for its key; overrides for unknown keys are dropped.
    pub fn from_overrides(action: &str, overrides: Option<&Map<String, Value>>) -> Self {
        let mut config = Self::with_action(action);
        let Some(overrides) = overrides else {
            return config;
        };

        for (key, value) in overrides {
            if !is_setting_key(key) {
                tracing::debug!(key = %key, "dropping unknown form setting");
                continue;
            }
            if !config.set(key, value) {
                tracing::debug!(key = %key, %value, "form setting rejected; keeping default");
            }
        }

        config
    }
}

type ApplySetting = fn(&mut FormConfig, &Value) -> bool;

/// Whitelist table: each key maps to a function that validates and stores its value.
pub static SETTING_RULES: &[(&str, ApplySetting)] = &[
    ("action", set_action),
    ("method", set_method),
    ("enctype", set_enctype),
    ("class", set_class),
    ("id", set_id),
    ("markup", set_markup),
    ("novalidate", set_novalidate),
    ("add_nonce", set_nonce),
    ("add_honeypot", set_honeypot),
    ("form_element", set_form_element),
    ("add_submit", set_add_submit),
];

fn set_action(config: &mut FormConfig, value: &Value) -> bool {
    config.action = loose_string(value);
    true
}

fn set_method(config: &mut FormConfig, value: &Value) -> bool {
    store_parsed(value, Method::parse, &mut config.method)
}

fn set_enctype(config: &mut FormConfig, value: &Value) -> bool {
    store_parsed(value, Enctype::parse, &mut config.enctype)
}

fn set_class(config: &mut FormConfig, value: &Value) -> bool {
    config.class = loose_classes(value);
    true
}

fn set_id(config: &mut FormConfig, value: &Value) -> bool {
    config.id = loose_string(value);
    true
}

fn set_markup(config: &mut FormConfig, value: &Value) -> bool {
    store_parsed(value, Markup::parse, &mut config.markup)
}

fn set_novalidate(config: &mut FormConfig, value: &Value) -> bool {
    store_flag(value, &mut config.novalidate)
}

fn set_nonce(config: &mut FormConfig, value: &Value) -> bool {
    match Nonce::from_value(value) {
        Some(nonce) => {
            config.add_nonce = nonce;
            true
        }
        None => false,
    }
}

fn set_honeypot(config: &mut FormConfig, value: &Value) -> bool {
    store_flag(value, &mut config.add_honeypot)
}

fn set_form_element(config: &mut FormConfig, value: &Value) -> bool {
    store_flag(value, &mut config.form_element)
}

fn set_add_submit(config: &mut FormConfig, value: &Value) -> bool {
    store_flag(value, &mut config.add_submit)
}

pub fn is_setting_key(key: &str) -> bool {
    SETTING_RULES.iter().any(|(name, _)| *name == key)
}

fn store_parsed<T>(value: &Value, parse: fn(&str) -> Option<T>, slot: &mut T) -> bool {
    match value.as_str().and_then(parse) {
        Some(parsed) => {
            *slot = parsed;
            true
        }
        None => false,
    }
}

fn store_flag(value: &Value, slot: &mut bool) -> bool {
    match value.as_bool() {
        Some(flag) => {
            *slot = flag;
            true
        }
        None => false,
    }
}

fn loose_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn loose_classes(value: &Value) -> ClassList {
    match value {
        Value::Null => ClassList::default(),
        Value::String(text) if text.is_empty() => ClassList::default(),
        Value::Array(items) => ClassList::List(items.iter().map(loose_string).collect()),
        other => ClassList::Text(loose_string(other)),
    }
}
