use crate::domain::form::value_to_text;
use crate::domain::schema::{FieldDescriptor, FieldKind, Visibility};
use maud::{html, Markup};
use serde_json::{Map, Value};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

/// Inline red-bordered message shown under the section it concerns.
pub fn error_box(message: &str) -> Markup {
    html! {
        div class="error-box" role="alert"
            style="border: 1px solid #dc2626; border-radius: 6px; padding: 0.5rem 0.75rem; color: #b91c1c; background: #fef2f2;"
        {
            (message)
        }
    }
}

pub fn notice_box(message: &str) -> Markup {
    html! {
        div class="notice-box" role="status"
            style="border: 1px solid #10b981; border-radius: 6px; padding: 0.5rem 0.75rem; background: #ecfdf5;"
        {
            (message)
        }
    }
}

/// One labelled input. Conditional fields whose controlling value does not match
/// are rendered `hidden` and without `required`.
pub fn field_input(
    field: &FieldDescriptor,
    values: &Map<String, Value>,
    invalid: bool,
    error: Option<&str>,
) -> Markup {
    let visible = field.is_visible(values);
    let current = values.get(field.key).and_then(value_to_text).unwrap_or_default();
    let input_id = format!("field-{}", field.key);
    let (shown_when_field, shown_when_value) = match field.visibility {
        Visibility::Always => (None, None),
        Visibility::WhenEquals { field, value } => (Some(field), Some(value)),
    };
    let style = invalid.then_some("border: 2px solid #dc2626;");

    html! {
        div class="field"
            hidden[!visible]
            data-shown-when-field=[shown_when_field]
            data-shown-when-value=[shown_when_value]
        {
            @if !field.label.is_empty() {
                label for=(input_id) {
                    (field.label)
                    @if field.required { span class="required" { " *" } }
                }
            }
            @match field.kind {
                FieldKind::Choice(options) => {
                    select id=(input_id) name=(field.key)
                        required[field.required && visible]
                        autofocus[invalid]
                        style=[style]
                    {
                        option value="" { "Select…" }
                        @for option in options {
                            option value=(option) selected[option.eq_ignore_ascii_case(&current)] { (option) }
                        }
                    }
                }
                FieldKind::LongText => {
                    textarea id=(input_id) name=(field.key) rows="4"
                        placeholder=[field.placeholder]
                        required[field.required && visible]
                        autofocus[invalid]
                        style=[style]
                    { (current) }
                }
                FieldKind::Number => {
                    input type="text" inputmode="decimal" id=(input_id) name=(field.key)
                        value=(current)
                        placeholder=[field.placeholder]
                        required[field.required && visible]
                        autofocus[invalid]
                        style=[style];
                }
                FieldKind::Text => {
                    input type="text" id=(input_id) name=(field.key)
                        value=(current)
                        placeholder=[field.placeholder]
                        required[field.required && visible]
                        autofocus[invalid]
                        style=[style];
                }
            }
            @if let Some(message) = error {
                (error_box(message))
            }
        }
    }
}

/// Previous / Next bar of the regular steps.
pub fn nav_bar(has_previous: bool) -> Markup {
    html! {
        div class="wizard-nav" {
            @if has_previous {
                button type="submit" name="action" value="previous" formnovalidate class="btn" { "Previous" }
            }
            button type="submit" name="action" value="save_draft" formnovalidate class="btn btn-secondary" { "Save as draft" }
            button type="submit" name="action" value="next" class="btn primary" { "Next" }
        }
    }
}
