use crate::dataset::Record;
use serde_json::Value;

/// Trim and collapse whitespace in every string field.
///
/// Fields whose name contains "name" (case-insensitive) are also lowercased.
/// Non-string fields are copied unchanged.
pub fn normalize_strings(record: &Record) -> Record {
    record
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => {
                    let collapsed = collapse_whitespace(s);
                    if key.to_lowercase().contains("name") {
                        Value::String(collapsed.to_lowercase())
                    } else {
                        Value::String(collapsed)
                    }
                }
                other => other.clone(),
            };
            (key.clone(), value)
        })
        .collect()
}

/// Trim leading and trailing whitespace from a string `name` field only.
pub fn trim_name(record: &Record) -> Record {
    let mut next = record.clone();
    if let Some(Value::String(name)) = next.get_mut("name") {
        *name = name.trim_matches(is_blank).to_string();
    }
    next
}

/// Set `category` to `default` when it is missing or falsy
/// (null, false, 0 or the empty string).
pub fn with_default_category(record: &Record, default: &str) -> Record {
    let mut next = record.clone();
    let needs_default = match next.get("category") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(_) => false,
    };
    if needs_default {
        next.insert("category".to_string(), Value::String(default.to_string()));
    }
    next
}

/// Unicode whitespace plus the byte-order mark.
fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

fn collapse_whitespace(s: &str) -> String {
    s.split(is_blank)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_normalize_name_field() {
        let result = normalize_strings(&record(json!({"name": "  Adidas Shoes  "})));
        assert_eq!(Value::Object(result), json!({"name": "adidas shoes"}));
    }

    #[test]
    fn test_normalize_collapses_internal_whitespace() {
        let result = normalize_strings(&record(json!({"description": "  some  text   here "})));
        assert_eq!(Value::Object(result), json!({"description": "some text here"}));
    }

    #[test]
    fn test_normalize_mixed_record() {
        let input = record(json!({
            "id": "  10 ",
            "name": "  Adidas Shoes  ",
            "description": "  some  text   here "
        }));

        let result = normalize_strings(&input);

        assert_eq!(result["id"], json!("10"));
        assert_eq!(result["name"], json!("adidas shoes"));
        assert_eq!(result["description"], json!("some text here"));
    }

    #[test]
    fn test_name_match_is_case_insensitive_substring() {
        let input = record(json!({
            "userName": " Jane\tDOE ",
            "FILENAME": "README.MD",
            "title": "Keep Case"
        }));

        let result = normalize_strings(&input);

        assert_eq!(result["userName"], json!("jane doe"));
        assert_eq!(result["FILENAME"], json!("readme.md"));
        assert_eq!(result["title"], json!("Keep Case"));
    }

    #[test]
    fn test_non_string_fields_pass_through() {
        let input = record(json!({
            "count": 3,
            "active": true,
            "name": null,
            "meta": {"name": "  Nested  "},
            "tags": ["  a  "]
        }));

        let result = normalize_strings(&input);

        assert_eq!(Value::Object(result), Value::Object(input));
    }

    #[test]
    fn test_normalize_does_not_touch_input() {
        let input = record(json!({"name": "  X  "}));
        let _ = normalize_strings(&input);
        assert_eq!(input["name"], json!("  X  "));
    }

    #[test]
    fn test_trim_name_only_trims() {
        let input = record(json!({"name": "  Mixed  Case ", "other": "  keep  "}));
        let result = trim_name(&input);
        assert_eq!(result["name"], json!("Mixed  Case"));
        assert_eq!(result["other"], json!("  keep  "));
    }

    #[test]
    fn test_byte_order_mark_counts_as_whitespace() {
        let input = record(json!({"name": "\u{feff}  Alpha\u{feff}Beta ", "sku": "\u{feff}A1"}));

        let normalized = normalize_strings(&input);
        assert_eq!(normalized["name"], json!("alpha beta"));
        assert_eq!(normalized["sku"], json!("A1"));

        let trimmed = trim_name(&input);
        assert_eq!(trimmed["name"], json!("Alpha\u{feff}Beta"));
    }

    #[test]
    fn test_default_category() {
        let missing = with_default_category(&record(json!({"id": 1})), "General");
        assert_eq!(missing["category"], json!("General"));

        let empty = with_default_category(&record(json!({"category": ""})), "General");
        assert_eq!(empty["category"], json!("General"));

        let kept = with_default_category(&record(json!({"category": "Shoes"})), "General");
        assert_eq!(kept["category"], json!("Shoes"));
    }
}
