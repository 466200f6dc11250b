//! Text helpers around model output: code fences, line numbering and
//! best-effort array extraction.

use serde_json::Value;

/// Remove a leading ```` ```html ```` / ```` ``` ```` and a trailing ```` ``` ````
pub fn strip_code_fences(text: &str) -> String {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```html") {
        body = rest.trim_start();
    }
    if let Some(rest) = body.strip_prefix("```") {
        body = rest.trim_start();
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest.trim_end();
    }
    body.to_string()
}

/// Prefix each line with its 1-based number: `"{n}: {line}"`
pub fn number_lines(text: &str) -> String {
    text.split('\n')
        .enumerate()
        .map(|(i, line)| format!("{}: {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse the span from the first `[` to the last `]` as a JSON array
///
/// Tolerates prose or fences around the array.
pub fn extract_json_array(text: &str) -> Option<Vec<Value>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }
    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(Value::Array(items)) => Some(items),
        Ok(_) => None,
        Err(e) => {
            log::debug!("Array extraction failed: {}", e);
            None
        }
    }
}

/// The string elements of the embedded array, non-strings skipped
pub fn extract_string_array(text: &str) -> Vec<String> {
    extract_json_array(text)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html_fence() {
        assert_eq!(strip_code_fences("```html\n<div></div>\n```"), "<div></div>");
    }

    #[test]
    fn test_strip_bare_fence() {
        assert_eq!(strip_code_fences("  ```\n<p/>\n```  "), "<p/>");
    }

    #[test]
    fn test_inner_fences_untouched() {
        let text = "<pre>```code```</pre>";
        assert_eq!(strip_code_fences(text), text);
    }

    #[test]
    fn test_number_lines() {
        assert_eq!(number_lines("a\n\nb"), "1: a\n2: \n3: b");
    }

    #[test]
    fn test_array_with_surrounding_prose() {
        let text = "Sure! Here are names:\n```json\n[\"Neon Noir\", \"Soft Paper\", 3]\n```";
        assert_eq!(extract_string_array(text), vec!["Neon Noir", "Soft Paper"]);
    }

    #[test]
    fn test_no_array() {
        assert!(extract_json_array("nothing here").is_none());
        assert!(extract_json_array("] backwards [").is_none());
        assert!(extract_string_array("[not json]").is_empty());
    }
}
