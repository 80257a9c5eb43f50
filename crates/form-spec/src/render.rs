//! Single-pass HTML rendering of a form configuration and its input queue.
//!
//! No escaping is applied to labels, values or options. The `html` and `title`
//! field types rely on that to inject markup verbatim.

use crate::{
    request::{RequestData, RequestValue},
    slug::slugify,
    spec::{
        form::{FormConfig, Markup},
        input::{ClassList, FieldType, InputField},
    },
};

/// Markup appended when the queue has no submit field and `add_submit` is on.
pub const DEFAULT_SUBMIT: &str =
    r#"<div class="form_field_wrap"><input type="submit" value="Submit" name="submit"></div>"#;

pub const HONEYPOT_LABEL: &str = "Leave blank to submit";

/// How a field is turned into markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldMarkup {
    /// Label emitted verbatim.
    Raw,
    /// Label inside `<h3>`.
    Heading,
    Textarea,
    Select,
    /// One radio/checkbox input per option under a heading.
    Group,
    Input,
}

impl FieldMarkup {
    fn of(field: &InputField) -> Self {
        match field.kind {
            FieldType::Html => FieldMarkup::Raw,
            FieldType::Title => FieldMarkup::Heading,
            FieldType::Textarea => FieldMarkup::Textarea,
            FieldType::Select => FieldMarkup::Select,
            _ if field.is_group() => FieldMarkup::Group,
            _ => FieldMarkup::Input,
        }
    }
}

/// Element name, trailing fragment, and optional heading produced by the type dispatch.
struct Dispatched {
    element: Option<&'static str>,
    end: String,
    heading: Option<String>,
}

/// Render the opening tag, honeypot, queued fields, default submit, and closing tag.
pub fn render_form<'a>(
    config: &FormConfig,
    inputs: impl IntoIterator<Item = &'a InputField>,
    request: &RequestData,
) -> String {
    let mut output = String::new();

    if config.form_element {
        output.push_str(&open_tag(config));
    }

    let mut has_submit = false;
    let mut rendered = 0usize;
    let mut push_field = |field: &InputField| {
        if field.kind == FieldType::Submit {
            has_submit = true;
        }
        output.push_str(&render_field(field, config.markup, request));
        rendered += 1;
    };

    if config.add_honeypot {
        push_field(&honeypot_field());
    }
    for field in inputs {
        push_field(field);
    }

    if !has_submit && config.add_submit {
        output.push_str(DEFAULT_SUBMIT);
    }

    if config.form_element {
        output.push_str("</form>");
    }

    tracing::debug!(fields = rendered, bytes = output.len(), "rendered form");
    output
}

/// The hidden anti-spam field rendered ahead of the queue.
pub fn honeypot_field() -> InputField {
    let mut field = InputField::new(HONEYPOT_LABEL, "honeypot");
    field.id = "form_honeypot".into();
    field.wrap_class = ClassList::list(["form_field_wrap", "hidden"]);
    field.wrap_style = "display: none".into();
    field.request_populate = false;
    field
}

/// ` class="a b "` for a list, where each class keeps its trailing space, and
/// ` class="text"` for a plain string. An empty list renders nothing.
pub fn class_attr(classes: &ClassList) -> String {
    match classes {
        ClassList::Text(text) => format!(r#" class="{text}""#),
        ClassList::List(list) if list.is_empty() => String::new(),
        ClassList::List(list) => {
            let mut attr = String::from(r#" class=""#);
            for class in list {
                attr.push_str(class);
                attr.push(' ');
            }
            attr.push('"');
            attr
        }
    }
}

fn open_tag(config: &FormConfig) -> String {
    let mut tag = format!(r#"<form method="{}""#, config.method.as_str());
    tag.push_str(&format!(r#" enctype="{}""#, config.enctype.as_mime()));
    if !config.action.is_empty() {
        tag.push_str(&format!(r#" action="{}""#, config.action));
    }
    if !config.id.is_empty() {
        tag.push_str(&format!(r#" id="{}""#, config.id));
    }
    tag.push_str(&class_attr(&config.class));
    if config.novalidate {
        tag.push_str(" novalidate");
    }
    tag.push('>');
    tag
}

/// Render one field, wrapped unless it is `hidden` or `html`.
pub fn render_field(field: &InputField, markup: Markup, request: &RequestData) -> String {
    let submitted = if field.request_populate {
        request.get(&field.name)
    } else {
        None
    };
    let field = repopulate(field, submitted);
    let kind = FieldMarkup::of(&field);
    let dispatched = dispatch(&field, kind, markup, submitted);

    let label_html = match dispatched.heading {
        Some(heading) => heading,
        None if field.add_label && !field.kind.skips_label() => label_tag(&field),
        None => String::new(),
    };

    let body = match dispatched.element {
        Some(element) => {
            let tag = format!(
                r#"<{element}{id} name="{name}"{range}{class}{flags}{end}"#,
                id = optional_attr("id", &field.id),
                name = field.name,
                range = range_attrs(&field),
                class = class_attr(&field.class),
                flags = flag_attrs(&field),
                end = dispatched.end,
            );
            if field.kind == FieldType::Checkbox {
                tag + &label_html
            } else {
                label_html + &tag
            }
        }
        None => label_html + &dispatched.end,
    };

    if field.kind.skips_wrap() {
        body
    } else {
        wrap(&field, &body)
    }
}

/// Per-render copy of `field` with the submitted value applied.
fn repopulate(field: &InputField, submitted: Option<&RequestValue>) -> InputField {
    let mut working = field.clone();
    let Some(submitted) = submitted else {
        return working;
    };

    if !working.kind.skips_value_repopulation()
        && let Some(value) = submitted.first()
    {
        working.value = value.to_string();
    }

    if working.kind.is_toggle() && working.options.is_empty() {
        working.checked = true;
    }

    working
}

fn dispatch(
    field: &InputField,
    kind: FieldMarkup,
    markup: Markup,
    submitted: Option<&RequestValue>,
) -> Dispatched {
    match kind {
        FieldMarkup::Raw => Dispatched {
            element: None,
            end: field.label.clone(),
            heading: None,
        },
        FieldMarkup::Heading => Dispatched {
            element: None,
            end: format!("<h3>{}</h3>", field.label),
            heading: None,
        },
        FieldMarkup::Textarea => Dispatched {
            element: Some("textarea"),
            end: format!(">{}</textarea>", field.value),
            heading: None,
        },
        FieldMarkup::Select => {
            let mut end = String::from(">");
            for (key, label) in &field.options {
                let selected = submitted.is_some_and(|submitted| submitted.contains(key))
                    || field.selected.as_deref() == Some(key.as_str());
                end.push_str(&format!(
                    r#"<option value="{key}"{}>{label}</option>"#,
                    if selected { " selected" } else { "" }
                ));
            }
            end.push_str("</select>");
            Dispatched {
                element: Some("select"),
                end,
                heading: None,
            }
        }
        FieldMarkup::Group => {
            let mut end = String::new();
            for (key, label) in &field.options {
                let slug = slugify(label);
                end.push_str(&format!(
                    r#"<input type="{}" name="{}[]" value="{key}" id="{slug}""#,
                    field.kind.as_str(),
                    field.name,
                ));
                if submitted.is_some_and(|submitted| submitted.contains(key)) {
                    end.push_str(" checked");
                }
                end.push_str(markup.field_close());
                end.push_str(&format!(r#" <label for="{slug}">{label}</label>"#));
            }
            Dispatched {
                element: None,
                end,
                heading: Some(format!(
                    r#"<div class="checkbox_header">{}</div>"#,
                    field.label
                )),
            }
        }
        FieldMarkup::Input => {
            let mut end = format!(
                r#" type="{}" value="{}""#,
                field.kind.as_str(),
                field.value
            );
            if field.checked {
                end.push_str(" checked");
            }
            end.push_str(markup.field_close());
            Dispatched {
                element: Some("input"),
                end,
                heading: None,
            }
        }
    }
}

fn label_tag(field: &InputField) -> String {
    let marker = if field.required {
        " <strong>*</strong>"
    } else {
        ""
    };
    format!(r#"<label for="{}">{}{marker}</label>"#, field.id, field.label)
}

fn optional_attr(name: &str, value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        format!(r#" {name}="{value}""#)
    }
}

fn range_attrs(field: &InputField) -> String {
    if !field.kind.takes_range() {
        return String::new();
    }
    [
        optional_attr("min", &field.min),
        optional_attr("max", &field.max),
        optional_attr("step", &field.step),
    ]
    .concat()
}

fn flag_attrs(field: &InputField) -> String {
    let mut flags = String::new();
    if field.autofocus {
        flags.push_str(" autofocus");
    }
    if field.checked {
        flags.push_str(" checked");
    }
    if field.required {
        flags.push_str(" required");
    }
    flags
}

fn wrap(field: &InputField, body: &str) -> String {
    let mut wrapped = field.before_html.clone();
    let has_tag = !field.wrap_tag.is_empty();
    if has_tag {
        wrapped.push('<');
        wrapped.push_str(&field.wrap_tag);
        wrapped.push_str(&class_attr(&field.wrap_class));
        wrapped.push_str(&optional_attr("style", &field.wrap_style));
        wrapped.push_str(&optional_attr("id", &field.wrap_id));
        wrapped.push('>');
    }
    wrapped.push_str(body);
    if has_tag {
        wrapped.push_str("</");
        wrapped.push_str(&field.wrap_tag);
        wrapped.push('>');
    }
    wrapped.push_str(&field.after_html);
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(kind: &str) -> InputField {
        let mut field = InputField::new("Label", "slug");
        field.kind = FieldType::from(kind);
        field.add_label = false;
        field.wrap_tag.clear();
        field
    }

    #[test]
    fn class_attr_keeps_trailing_space_for_lists_only() {
        assert_eq!(class_attr(&ClassList::default()), "");
        assert_eq!(class_attr(&ClassList::list(["a", "b"])), r#" class="a b ""#);
        assert_eq!(class_attr(&ClassList::Text("wide".into())), r#" class="wide""#);
        assert_eq!(class_attr(&ClassList::Text(String::new())), r#" class="""#);
    }

    #[test]
    fn xhtml_closes_void_elements() {
        let html = render_field(&field("email"), Markup::Xhtml, &RequestData::new());
        assert_eq!(
            html,
            r#"<input id="slug" name="slug" type="email" value="" />"#
        );
    }

    #[test]
    fn checked_flag_is_emitted_twice_on_inputs() {
        let mut checkbox = field("checkbox");
        checkbox.checked = true;
        let html = render_field(&checkbox, Markup::Html, &RequestData::new());
        assert_eq!(
            html,
            r#"<input id="slug" name="slug" checked type="checkbox" value="" checked>"#
        );
    }

    #[test]
    fn range_attributes_only_for_numeric_types() {
        let mut number = field("number");
        number.min = "0".into();
        number.step = "5".into();
        let html = render_field(&number, Markup::Html, &RequestData::new());
        assert!(html.contains(r#" name="slug" min="0" step="5""#));
        assert!(!html.contains("max="));

        let mut text = field("text");
        text.min = "0".into();
        let html = render_field(&text, Markup::Html, &RequestData::new());
        assert!(!html.contains("min="));
    }

    #[test]
    fn empty_wrap_tag_keeps_before_and_after() {
        let mut text = field("text");
        text.before_html = "<p>".into();
        text.after_html = "</p>".into();
        let html = render_field(&text, Markup::Html, &RequestData::new());
        assert_eq!(
            html,
            r#"<p><input id="slug" name="slug" type="text" value=""></p>"#
        );
    }

    #[test]
    fn honeypot_ignores_request_values() {
        let request = RequestData::new().with("honeypot", "spam");
        let html = render_field(&honeypot_field(), Markup::Html, &request);
        assert!(html.contains(r#"value="""#));
        assert!(html.starts_with(r#"<div class="form_field_wrap hidden " style="display: none">"#));
    }
}
