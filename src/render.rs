//! Thin text presentation of the section list. One formatter per section
//! kind, selected by the kind tag.

use crate::sections::{Section, SectionRegistry};
use serde_json::Value;

pub fn render_registry(registry: &SectionRegistry) -> String {
    registry
        .iter()
        .map(render_section)
        .collect::<Vec<String>>()
        .join("\n\n")
}

pub fn render_section(section: &Section) -> String {
    let mut out = format!("== {} ==", section.kind.title());
    for (key, value) in &section.props {
        out.push_str(&format!("\n  {}: {}", key, render_value(value)));
    }
    out
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<String>>()
            .join(" | "),
        other => other.to_string(),
    }
}
