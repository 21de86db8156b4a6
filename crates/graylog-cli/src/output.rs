use anyhow::Result;
use colored::Colorize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;

pub fn print_value(value: &Value, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Table => println!("{}", render_table(value)),
    }
    Ok(())
}

pub fn print_success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn render_table(value: &Value) -> String {
    if let Some(items) = value.get("items").and_then(Value::as_array) {
        if items.is_empty() {
            return "No resources found.".to_string();
        }
        let mut builder = Builder::default();
        builder.push_record(["ID", "Title", "Type"]);
        for item in items {
            builder.push_record([
                text(item.get("id")),
                text(item.get("title")),
                text(item.get("type").or_else(|| item.pointer("/config/type"))),
            ]);
        }
        let mut rendered = builder.build().with(Style::rounded()).to_string();
        if let Some(total) = value.get("total").and_then(Value::as_u64) {
            rendered.push_str(&format!("\nTotal: {total}"));
        }
        return rendered;
    }

    match value {
        Value::Object(fields) => {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            for (key, field) in fields {
                builder.push_record([key.clone(), text(Some(field))]);
            }
            builder.build().with(Style::rounded()).to_string()
        }
        other => text(Some(other)),
    }
}

// Nested values are shown as compact JSON.
fn text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
