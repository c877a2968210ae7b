//! XML representation of API responses.
//!
//! Responses are serialized to a JSON tree first and then written out as
//! elements: object members become child elements with PascalCase names,
//! list items are named by [`XmlDocument::item_element`], and null members are
//! omitted.

use serde::Serialize;
use serde_json::Value;

use crate::error::AppResult;

const DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// A response type with known XML element names.
pub trait XmlDocument: Serialize {
    /// Name of the document element.
    fn root_element() -> String;

    /// Name of each item element in the list held by `field`, or in the
    /// document itself when it is a list (`field` is `None`).
    fn item_element(field: Option<&str>) -> String;
}

/// Serialize a response as an XML document.
pub fn to_xml<T: XmlDocument>(value: &T) -> AppResult<String> {
    let tree = serde_json::to_value(value)?;
    let mut out = String::from(DECLARATION);
    write_element(&mut out, &T::root_element(), None, &tree, &T::item_element);
    Ok(out)
}

fn write_element(
    out: &mut String,
    name: &str,
    field: Option<&str>,
    value: &Value,
    item_element: &dyn Fn(Option<&str>) -> String,
) {
    match value {
        Value::Null => {}
        Value::Object(members) => {
            open(out, name);
            for (key, member) in members {
                write_element(out, &pascal_case(key), Some(key), member, item_element);
            }
            close(out, name);
        }
        Value::Array(items) => {
            let item_name = item_element(field);
            open(out, name);
            for item in items {
                write_element(out, &item_name, None, item, item_element);
            }
            close(out, name);
        }
        Value::String(s) => {
            open(out, name);
            escape_into(out, s);
            close(out, name);
        }
        Value::Bool(_) | Value::Number(_) => {
            open(out, name);
            out.push_str(&value.to_string());
            close(out, name);
        }
    }
}

fn open(out: &mut String, name: &str) {
    out.push('<');
    out.push_str(name);
    out.push('>');
}

fn close(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
}

/// `totalCount` -> `TotalCount`.
fn pascal_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
