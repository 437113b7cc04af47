use serde::{Deserialize, Serialize};

/// Field names understood by the detail extractor
pub mod fields {
    pub const NAME: &str = "name";
    pub const HEIGHT: &str = "height";
    pub const REACH: &str = "reach";
    pub const STANCE: &str = "stance";
    pub const WEIGHT_CLASS: &str = "weight_class";
    pub const DOB: &str = "dob";
    pub const WINS: &str = "wins";
    pub const LOSSES: &str = "losses";
    pub const DRAWS: &str = "draws";
}

/// Where a field lives in the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Locator {
    /// Text content of the first element matching `selector`
    Text { selector: String },
    /// Attribute value of the first element matching `selector` that carries it
    Attr { selector: String, attr: String },
    /// Text following `label` inside the first `item` element that starts with it,
    /// e.g. `<li><i>Reach:</i> 84"</li>`
    Labeled { item: String, label: String },
    /// The `index`-th piece of the element text split on `delimiter`,
    /// e.g. the losses in `Record: 27-1-0`
    Segment {
        selector: String,
        delimiter: String,
        index: usize,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    /// First run of digits in the located text
    Number,
    /// Division name for the first number in the located text, read as pounds
    Division,
}

/// One `(field, locator)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    pub field: String,
    #[serde(default)]
    pub kind: FieldKind,
    pub locator: Locator,
}

impl FieldRule {
    pub fn text(field: &str, locator: Locator) -> Self {
        Self {
            field: field.to_string(),
            kind: FieldKind::Text,
            locator,
        }
    }

    pub fn number(field: &str, locator: Locator) -> Self {
        Self {
            field: field.to_string(),
            kind: FieldKind::Number,
            locator,
        }
    }

    pub fn division(field: &str, locator: Locator) -> Self {
        Self {
            field: field.to_string(),
            kind: FieldKind::Division,
            locator,
        }
    }
}

/// Declarative description of a fighter detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailSchema {
    pub fields: Vec<FieldRule>,
}

const UFCSTATS_INFO_ITEM: &str = "li.b-list__box-list-item";
const UFCSTATS_RECORD: &str = "span.b-content__title-record";

fn labeled(label: &str) -> Locator {
    Locator::Labeled {
        item: UFCSTATS_INFO_ITEM.to_string(),
        label: label.to_string(),
    }
}

fn record_part(index: usize) -> Locator {
    Locator::Segment {
        selector: UFCSTATS_RECORD.to_string(),
        delimiter: "-".to_string(),
        index,
    }
}

impl DetailSchema {
    pub fn new(fields: Vec<FieldRule>) -> Self {
        Self { fields }
    }

    /// Layout of a ufcstats.com fighter-details page
    pub fn ufcstats() -> Self {
        Self::new(vec![
            FieldRule::text(
                fields::NAME,
                Locator::Text {
                    selector: "span.b-content__title-highlight".to_string(),
                },
            ),
            FieldRule::text(fields::HEIGHT, labeled("Height:")),
            FieldRule::text(fields::REACH, labeled("Reach:")),
            FieldRule::text(fields::STANCE, labeled("STANCE:")),
            // The page lists body weight only
            FieldRule::division(fields::WEIGHT_CLASS, labeled("Weight:")),
            FieldRule::text(fields::DOB, labeled("DOB:")),
            FieldRule::number(fields::WINS, record_part(0)),
            FieldRule::number(fields::LOSSES, record_part(1)),
            FieldRule::number(fields::DRAWS, record_part(2)),
        ])
    }

    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|r| r.field == field)
    }
}

impl Default for DetailSchema {
    fn default() -> Self {
        Self::ufcstats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_covers_detail_fields() {
        let schema = DetailSchema::default();
        for field in [
            fields::NAME,
            fields::HEIGHT,
            fields::REACH,
            fields::STANCE,
            fields::WEIGHT_CLASS,
            fields::DOB,
            fields::WINS,
            fields::LOSSES,
            fields::DRAWS,
        ] {
            assert!(schema.rule(field).is_some(), "missing rule for {}", field);
        }
        assert_eq!(schema.rule(fields::WINS).map(|r| r.kind), Some(FieldKind::Number));
        assert_eq!(
            schema.rule(fields::WEIGHT_CLASS).map(|r| r.kind),
            Some(FieldKind::Division)
        );
    }

    #[test]
    fn test_rule_deserializes_from_config_shape() {
        let json = serde_json::json!({
            "field": "reach",
            "locator": { "kind": "labeled", "item": "li", "label": "Reach:" }
        });
        let rule: FieldRule = serde_json::from_value(json).unwrap();
        assert_eq!(rule.kind, FieldKind::Text);
        assert_eq!(
            rule.locator,
            Locator::Labeled {
                item: "li".to_string(),
                label: "Reach:".to_string()
            }
        );
    }
}
