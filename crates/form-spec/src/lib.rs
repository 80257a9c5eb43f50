#![allow(missing_docs)]

pub mod builder;
pub mod definition;
pub mod error;
pub mod render;
pub mod request;
pub mod slug;
pub mod spec;

pub use builder::FormBuilder;
pub use definition::{FormDefinition, definition_schema, input_schema};
pub use error::FormError;
pub use render::{DEFAULT_SUBMIT, class_attr, honeypot_field, render_field, render_form};
pub use request::{RequestData, RequestValue};
pub use slug::slugify;
pub use spec::{ClassList, Enctype, FieldType, FormConfig, InputField, Markup, Method, Nonce};
