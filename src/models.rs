use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

// ============ External (Source) Schema ============

/// Zone as delivered by the source feed: a single label or a list of labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZoneValue {
    /// Single zone label.
    One(String),
    /// Multiple zone labels.
    Many(Vec<String>),
}

/// Represents a prospect as delivered by the external source feed.
///
/// Only `id` and `name` are guaranteed; everything else is optional and may
/// be missing. Unknown fields are kept so they survive the adaptation into
/// the local schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceProspect {
    /// Identifier from the source system.
    pub id: String,
    /// Full name as a single string.
    pub name: String,
    /// Raw phone number, possibly formatted.
    #[serde(default)]
    pub phone: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Zone label(s).
    #[serde(default)]
    pub zone: Option<ZoneValue>,
    /// Estimated income.
    #[serde(default)]
    pub income: Option<f64>,
    /// Any additional fields the source sends.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============ Local Schema ============

/// Represents a prospect in the local schema used by the store and the
/// template engine.
///
/// `phone` contains only decimal digits (non-digits are stripped at
/// ingestion) and is empty when the source had none. Open-ended columns
/// (zone, income, email, whatever else the source sent) live in `extras`
/// as plain text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prospect {
    /// Unique identifier, stable across recomputations.
    pub id: String,
    /// Text before the first space of the source full name.
    pub first_name: String,
    /// Remainder of the source full name, empty if there was none.
    pub last_name: String,
    /// Digits-only phone number, possibly empty.
    pub phone: String,
    /// Additional named columns as text.
    pub extras: BTreeMap<String, String>,
}

impl Prospect {
    /// Adapts a source prospect into the local schema.
    ///
    /// Pure and total: missing optional fields become empty strings and the
    /// adaptation never fails.
    pub fn from_source(source: &SourceProspect) -> Self {
        let (first_name, last_name) = split_full_name(&source.name);

        let phone = source
            .phone
            .as_deref()
            .map(|p| p.chars().filter(|c| c.is_ascii_digit()).collect())
            .unwrap_or_default();

        let mut extras = BTreeMap::new();
        extras.insert("zone".to_string(), join_zone(source.zone.as_ref()));
        extras.insert(
            "income".to_string(),
            source.income.map(format_currency).unwrap_or_default(),
        );
        extras.insert(
            "email".to_string(),
            source.email.clone().unwrap_or_default(),
        );

        for (key, value) in &source.extra {
            if let Some(text) = scalar_to_text(value) {
                extras.entry(key.clone()).or_insert(text);
            }
        }

        Self {
            id: source.id.clone(),
            first_name,
            last_name,
            phone,
            extras,
        }
    }

    /// Builds the record the template engine interpolates against.
    ///
    /// Fixed fields are exposed under the keys the shipped templates use
    /// (`nombre`, `apellido`, `telefono`); every extra column keeps its own
    /// name.
    pub fn record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert("id".to_string(), Value::String(self.id.clone()));
        record.insert("nombre".to_string(), Value::String(self.first_name.clone()));
        record.insert(
            "apellido".to_string(),
            Value::String(self.last_name.clone()),
        );
        record.insert("telefono".to_string(), Value::String(self.phone.clone()));
        for (key, value) in &self.extras {
            record.insert(key.clone(), Value::String(value.clone()));
        }
        record
    }

    /// Looks up a column by name, as text.
    ///
    /// Used by filtering, where comparison is exact string equality over the
    /// coerced value.
    pub fn field_text(&self, column: &str) -> Option<&str> {
        match column {
            "id" => Some(&self.id),
            "nombre" => Some(&self.first_name),
            "apellido" => Some(&self.last_name),
            "telefono" => Some(&self.phone),
            _ => self.extras.get(column).map(String::as_str),
        }
    }

    /// Display name for notifications and logs.
    pub fn display_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

fn split_full_name(full: &str) -> (String, String) {
    match full.split_once(' ') {
        Some((first, rest)) => (first.to_string(), rest.to_string()),
        None => (full.to_string(), String::new()),
    }
}

fn join_zone(zone: Option<&ZoneValue>) -> String {
    match zone {
        Some(ZoneValue::One(z)) => z.clone(),
        Some(ZoneValue::Many(zs)) => zs.join(", "),
        None => String::new(),
    }
}

fn scalar_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        // Nested arrays/objects have no column representation
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Formats an income value as a currency-prefixed, thousands-grouped string.
///
/// Example: `1500000.0` -> `"$1,500,000"`, `1234.5` -> `"$1,234.50"`.
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    // Round to cents first so fractions carry into the whole part
    let cents_total = (amount.abs() * 100.0).round() as u64;
    let whole = cents_total / 100;
    let cents = cents_total % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    if cents == 0 {
        format!("{}${}", sign, grouped)
    } else {
        format!("{}${}.{:02}", sign, grouped, cents)
    }
}
