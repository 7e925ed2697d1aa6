use comfy_table::{presets::UTF8_FULL, Table};
use serde_json::{json, Map, Value};

use crate::client::Response;

const NO_RESULTS: &str = "No results found.";

enum Body<'a> {
    Error(String),
    Empty,
    Tables(&'a Map<String, Value>),
    Opaque(&'a Value),
}

fn classify(response: &Response) -> Body<'_> {
    let body = match response {
        Response::Failure(message) => return Body::Error(message.clone()),
        Response::Success(body) => body,
    };

    if let Some(error) = body.get("error") {
        return Body::Error(render_value(error));
    }

    match body.get("results") {
        Some(Value::Object(tables)) if !tables.is_empty() => Body::Tables(tables),
        Some(other) if !is_blank(other) => Body::Opaque(other),
        _ => Body::Empty,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Strings print bare; everything else prints as compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn error_line(message: &str) -> String {
    format!("Error: {}", message)
}

/// Plain-text report: one block per database, one `key: value` line per field.
pub fn format_results(response: &Response) -> String {
    let tables = match classify(response) {
        Body::Error(message) => return error_line(&message),
        Body::Empty => return NO_RESULTS.to_string(),
        Body::Opaque(value) => {
            let mut lines = vec![render_value(value)];
            lines.extend(error_block(response));
            return lines.join("\n");
        }
        Body::Tables(tables) => tables,
    };

    let mut lines = Vec::new();
    for (db, data) in tables {
        lines.push(format!("Database: {}", db));
        match data {
            Value::Array(records) => {
                for record in records {
                    lines.push("  ---".to_string());
                    match record {
                        Value::Object(fields) => {
                            for (key, value) in fields {
                                lines.push(format!("  {}: {}", key, render_value(value)));
                            }
                        }
                        other => lines.push(format!("  {}", render_value(other))),
                    }
                }
            }
            other => lines.push(format!("  {}", render_value(other))),
        }
        lines.push(String::new());
    }

    lines.extend(error_block(response));
    lines.join("\n")
}

/// Per-term failures reported alongside partial results.
fn error_block(response: &Response) -> Vec<String> {
    let errors = match response.payload().and_then(|body| body.get("errors")) {
        Some(Value::Object(errors)) if !errors.is_empty() => errors,
        _ => return Vec::new(),
    };

    let mut lines = vec!["Errors:".to_string()];
    for (term, error) in errors {
        lines.push(format!("  {}: {}", term, render_value(error)));
    }
    lines
}

/// Like [`format_results`] but lays each database out as a table whose
/// columns are every field seen across its records.
pub fn format_table(response: &Response) -> String {
    let tables = match classify(response) {
        Body::Tables(tables) => tables,
        _ => return format_results(response),
    };

    let mut lines = Vec::new();
    for (db, data) in tables {
        lines.push(format!("Database: {}", db));
        match data.as_array() {
            Some(records) if records.iter().all(Value::is_object) => {
                lines.push(records_table(records).to_string());
            }
            _ => lines.push(format!("  {}", render_value(data))),
        }
        lines.push(String::new());
    }

    lines.extend(error_block(response));
    lines.join("\n")
}

fn records_table(records: &[Value]) -> Table {
    let mut columns: Vec<&str> = Vec::new();
    for fields in records.iter().filter_map(Value::as_object) {
        for key in fields.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key.as_str());
            }
        }
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(columns.clone());

    for fields in records.iter().filter_map(Value::as_object) {
        table.add_row(
            columns
                .iter()
                .map(|column| fields.get(*column).map(render_value).unwrap_or_else(|| "-".to_string()))
                .collect::<Vec<_>>(),
        );
    }

    table
}

/// Raw response body, or `{"error": ...}` for a transport failure.
pub fn format_json(response: &Response) -> serde_json::Result<String> {
    match response {
        Response::Success(body) => serde_json::to_string_pretty(body),
        Response::Failure(message) => serde_json::to_string_pretty(&json!({ "error": message })),
    }
}

/// Summary of the `/data/stats` payload.
pub fn format_stats(response: &Response) -> String {
    let body = match response {
        Response::Failure(message) => return error_line(message),
        Response::Success(body) => body,
    };

    if let Some(error) = body.get("error") {
        return error_line(&render_value(error));
    }

    let rows = match body.get("rows") {
        Some(Value::Number(n)) => n.as_u64().map(format_number).unwrap_or_else(|| n.to_string()),
        Some(other) => render_value(other),
        None => "N/A".to_string(),
    };

    let features = body.get("features");
    let feature_count = |name: &str| count(features.and_then(|f| f.get(name)));

    [
        format!("Total Records: {}", rows),
        format!("Available Databases: {}", count(body.get("tables"))),
        format!("Hash Lookup Databases: {}", feature_count("hash_lookup")),
        format!("Combo Lookup Databases: {}", feature_count("combo_lookup")),
        format!("Extended View Databases: {}", feature_count("view_more")),
    ]
    .join("\n")
}

fn count(value: Option<&Value>) -> usize {
    match value {
        Some(Value::Array(items)) => items.len(),
        Some(Value::Object(map)) => map.len(),
        _ => 0,
    }
}

/// `1234567` -> `1,234,567`
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
