use crate::core::schema::{fields, DetailSchema, FieldKind, Locator};
use crate::models::{FighterDetail, RawPayload, RosterEntry, NOT_AVAILABLE};
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Payload violates the shape the provider is expected to send
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Payload is not valid JSON (content type {content_type}): {source}")]
    InvalidJson {
        content_type: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected an array of fighters, found {0}")]
    UnexpectedShape(&'static str),
}

/// Best-effort value of one extracted field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Number(Option<u32>),
}

/// Field name to value; fields whose locator matched nothing are absent
pub type ExtractedFields = BTreeMap<String, FieldValue>;

/// Schema-driven roster and detail extraction
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    schema: DetailSchema,
}

impl Extractor {
    pub fn new(schema: DetailSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &DetailSchema {
        &self.schema
    }

    /// Parse a roster payload, unwrapping a `{ "data": [...] }` envelope
    pub fn extract_roster(&self, payload: &RawPayload) -> Result<Vec<RosterEntry>, ExtractError> {
        let value: Value =
            serde_json::from_str(&payload.body).map_err(|source| ExtractError::InvalidJson {
                content_type: payload
                    .content_type
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string()),
                source,
            })?;
        let items = unwrap_envelope(value)?;
        let total = items.len();

        let entries: Vec<RosterEntry> = items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let entry = roster_entry_from_value(item);
                if entry.is_none() {
                    tracing::warn!("Skipping roster item {} from {}: no usable id", index, payload.url);
                }
                entry
            })
            .collect();

        tracing::debug!("Extracted {} of {} roster entries from {}", entries.len(), total, payload.url);
        Ok(entries)
    }

    /// Run every rule of the schema against a page
    pub fn extract_fields(&self, html: &str) -> ExtractedFields {
        let document = Html::parse_document(html);
        let mut extracted = ExtractedFields::new();

        for rule in &self.schema.fields {
            let Some(raw) = locate(&document, &rule.locator) else {
                tracing::debug!("Field {} not found in page", rule.field);
                continue;
            };

            let value = match rule.kind {
                FieldKind::Text => FieldValue::Text(raw),
                FieldKind::Number => FieldValue::Number(parse_first_number(&raw)),
                FieldKind::Division => {
                    match parse_first_number(&raw).and_then(division_for_weight) {
                        Some(division) => FieldValue::Text(division.to_string()),
                        None => {
                            tracing::debug!("No division for weight {:?}", raw);
                            continue;
                        }
                    }
                }
            };
            extracted.insert(rule.field.clone(), value);
        }

        extracted
    }

    /// Build a fighter profile from a detail page
    ///
    /// `profile_ref` becomes the id; the caller overlays roster identity.
    pub fn extract_detail(&self, payload: &RawPayload, profile_ref: &str) -> FighterDetail {
        let extracted = self.extract_fields(&payload.body);

        FighterDetail {
            id: profile_ref.to_string(),
            name: text_field(&extracted, fields::NAME),
            height: text_field(&extracted, fields::HEIGHT),
            reach: text_field(&extracted, fields::REACH),
            stance: text_field(&extracted, fields::STANCE),
            weight_class: text_field(&extracted, fields::WEIGHT_CLASS),
            dob: text_field(&extracted, fields::DOB),
            wins: number_field(&extracted, fields::WINS),
            losses: number_field(&extracted, fields::LOSSES),
            draws: number_field(&extracted, fields::DRAWS),
            profile_url: payload.url.clone(),
        }
    }
}

fn text_field(extracted: &ExtractedFields, field: &str) -> String {
    match extracted.get(field) {
        Some(FieldValue::Text(text)) => text.clone(),
        Some(FieldValue::Number(Some(n))) => n.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn number_field(extracted: &ExtractedFields, field: &str) -> Option<u32> {
    match extracted.get(field) {
        Some(FieldValue::Number(n)) => *n,
        Some(FieldValue::Text(text)) => parse_first_number(text),
        None => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Take `data` out of an envelope object, then insist on an array
pub fn unwrap_envelope(value: Value) -> Result<Vec<Value>, ExtractError> {
    let inner = match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) => data,
            None => Value::Object(map),
        },
        other => other,
    };

    match inner {
        Value::Array(items) => Ok(items),
        other => Err(ExtractError::UnexpectedShape(json_kind(&other))),
    }
}

fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn roster_entry_from_value(value: &Value) -> Option<RosterEntry> {
    let obj = value.as_object()?;

    let slug = string_field(obj, &["slug", "profile_ref", "profileRef", "url"])
        .filter(|s| !s.is_empty());
    let id = string_field(obj, &["id", "fighter_id", "fighterId"])
        .filter(|s| !s.is_empty())
        .or_else(|| slug.clone())?;

    let mut first_name = string_field(obj, &["first_name", "firstName"]);
    let mut last_name = string_field(obj, &["last_name", "lastName"]);
    if first_name.is_none() && last_name.is_none() {
        if let Some(name) = string_field(obj, &["name", "full_name", "fullName"]) {
            let (first, last) = name.split_once(' ').unwrap_or((name.as_str(), ""));
            first_name = Some(first.trim().to_string());
            last_name = Some(last.trim().to_string());
        }
    }

    Some(RosterEntry {
        profile_ref: slug.unwrap_or_else(|| id.clone()),
        id,
        first_name: first_name.unwrap_or_default(),
        last_name: last_name.unwrap_or_default(),
        nickname: string_field(obj, &["nickname", "nick_name", "nickName"]).unwrap_or_default(),
    })
}

/// First run of ASCII digits, if any and if it fits
pub fn parse_first_number(text: &str) -> Option<u32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Men's division upper limits in pounds, lightest first
const DIVISIONS: [(u32, &str); 9] = [
    (115, "Strawweight"),
    (125, "Flyweight"),
    (135, "Bantamweight"),
    (145, "Featherweight"),
    (155, "Lightweight"),
    (170, "Welterweight"),
    (185, "Middleweight"),
    (205, "Light Heavyweight"),
    (265, "Heavyweight"),
];

/// Lightest division whose limit the weight fits under
pub fn division_for_weight(lbs: u32) -> Option<&'static str> {
    if lbs == 0 {
        return None;
    }
    DIVISIONS
        .iter()
        .find(|(limit, _)| lbs <= *limit)
        .map(|(_, name)| *name)
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            tracing::warn!("Invalid selector {:?} in detail schema: {}", css, e);
            None
        }
    }
}

fn strip_label<'t>(text: &'t str, label: &str) -> Option<&'t str> {
    let head = text.get(..label.len())?;
    if head.eq_ignore_ascii_case(label) {
        text.get(label.len()..).map(str::trim)
    } else {
        None
    }
}

fn locate(document: &Html, locator: &Locator) -> Option<String> {
    match locator {
        Locator::Text { selector: css } => {
            let sel = selector(css)?;
            document.select(&sel).next().map(element_text)
        }
        Locator::Attr { selector: css, attr } => {
            let sel = selector(css)?;
            document
                .select(&sel)
                .find_map(|el| el.value().attr(attr))
                .map(|v| v.trim().to_string())
        }
        Locator::Labeled { item, label } => {
            let sel = selector(item)?;
            let label = label.trim();
            document.select(&sel).find_map(|el| {
                let text = element_text(el);
                strip_label(&text, label).map(str::to_string)
            })
        }
        Locator::Segment {
            selector: css,
            delimiter,
            index,
        } => {
            let sel = selector(css)?;
            let text = element_text(document.select(&sel).next()?);
            text.split(delimiter.as_str())
                .nth(*index)
                .map(|part| part.trim().to_string())
        }
    }
}
