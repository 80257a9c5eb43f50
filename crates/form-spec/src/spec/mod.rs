pub mod form;
pub mod input;

pub use form::{Enctype, FormConfig, Markup, Method, Nonce, SETTING_RULES, is_setting_key};
pub use input::{ClassList, FieldType, InputField};
