use std::{fs, path::Path};

use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{builder::FormBuilder, error::FormError, spec::input::InputField};

/// JSON document describing a whole form: settings plus the input queue.
///
/// Each entry of `inputs` is `[label, overrides?, slug?]`, the shape accepted by
/// [`FormBuilder::add_inputs`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormDefinition {
    #[serde(default)]
    pub action: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub settings: Map<String, Value>,
    #[serde(default)]
    pub inputs: Vec<Value>,
}

impl FormDefinition {
    pub fn from_json(raw: &str) -> Result<Self, FormError> {
        serde_json::from_str(raw).map_err(FormError::Parse)
    }

    pub fn load(path: &Path) -> Result<Self, FormError> {
        let raw = fs::read_to_string(path).map_err(|source| FormError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Build a [`FormBuilder`] from the settings and queue every input. Documents are
    /// stricter than [`FormBuilder::add_inputs`]: every entry needs a string label.
    pub fn into_builder(self) -> Result<FormBuilder, FormError> {
        for (index, entry) in self.inputs.iter().enumerate() {
            let labelled = entry
                .as_array()
                .and_then(|parts| parts.first())
                .is_some_and(Value::is_string);
            if !labelled {
                return Err(FormError::InvalidDefinition(format!(
                    "input {index} must be [label, overrides?, slug?]"
                )));
            }
        }

        let mut builder = FormBuilder::new(&self.action, Some(&self.settings));
        builder.add_inputs(&Value::Array(self.inputs));
        Ok(builder)
    }
}

/// JSON Schema for [`FormDefinition`] documents.
pub fn definition_schema() -> Value {
    schema_for!(FormDefinition).to_value()
}

/// JSON Schema describing the keys accepted in input override maps.
pub fn input_schema() -> Value {
    schema_for!(InputField).to_value()
}
