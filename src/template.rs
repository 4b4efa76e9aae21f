use regex::{Captures, Regex};
use serde_json::{Map, Value};

/// Interpolates `{{ key }}` placeholders in a template against a record.
///
/// Each placeholder name is trimmed of surrounding whitespace and looked up
/// in the record. The placeholder is replaced only when the key exists and
/// its value is truthy in the dynamic sense; otherwise it is preserved
/// verbatim, delimiters and original whitespace included. Matching is
/// non-greedy and substitution is a single pass, so substituted text is
/// never re-scanned.
///
/// There is no escaping mechanism for literal `{{` sequences.
///
/// # Example
///
/// ```
/// use serde_json::{json, Map};
/// use whatsblast::template::render;
///
/// let mut record = Map::new();
/// record.insert("nombre".into(), json!("Ana"));
/// record.insert("income".into(), json!(""));
///
/// let out = render("Hola {{nombre}}, saldo {{income}}", &record);
/// assert_eq!(out, "Hola Ana, saldo {{income}}");
/// ```
pub fn render(template: &str, record: &Map<String, Value>) -> String {
    let placeholder = Regex::new(r"\{\{(.*?)\}\}").unwrap();

    placeholder
        .replace_all(template, |caps: &Captures| {
            let key = caps[1].trim();
            match record.get(key) {
                Some(value) if is_truthy(value) => value_to_text(value),
                // Missing or falsy: keep the placeholder untouched
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Dynamic truthiness of a record value.
///
/// Null, `false`, numeric zero and the empty string all suppress
/// substitution. The numeric-zero rule is deliberate product behavior even
/// though it can surprise (an income of exactly zero keeps its
/// placeholder).
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
