use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder for string fields that could not be located in the source
pub const NOT_AVAILABLE: &str = "N/A";

/// Minimal identity of one fighter as listed by the roster provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub nickname: String,
    #[serde(rename = "profileRef")]
    pub profile_ref: String,
}

impl RosterEntry {
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        nickname: impl Into<String>,
        profile_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            nickname: nickname.into(),
            profile_ref: profile_ref.into(),
        }
    }

    /// "First Last", trimmed so a missing half leaves no stray space
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn summary(&self) -> FighterSummary {
        FighterSummary {
            id: self.id.clone(),
            name: self.full_name(),
        }
    }
}

/// Immutable roster snapshot published by the roster cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub entries: Vec<RosterEntry>,
    #[serde(rename = "fetchedAt")]
    pub fetched_at: DateTime<Utc>,
}

impl Roster {
    pub fn new(entries: Vec<RosterEntry>, fetched_at: DateTime<Utc>) -> Self {
        Self { entries, fetched_at }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact lookup by provider id or profile reference
    pub fn find_by_identifier(&self, identifier: &str) -> Option<&RosterEntry> {
        let identifier = identifier.trim();
        self.entries
            .iter()
            .find(|e| e.id == identifier || e.profile_ref == identifier)
    }
}

/// Fully resolved fighter profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FighterDetail {
    pub id: String,
    pub name: String,
    pub height: String,
    pub reach: String,
    pub stance: String,
    #[serde(rename = "weightClass")]
    pub weight_class: String,
    pub dob: String,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub draws: Option<u32>,
    #[serde(rename = "profileUrl")]
    pub profile_url: String,
}

/// Search hit returned to incremental search widgets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FighterSummary {
    pub id: String,
    pub name: String,
}

/// Raw body returned by an upstream provider
#[derive(Debug, Clone)]
pub struct RawPayload {
    pub url: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl RawPayload {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content_type: None,
            body: body.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_trims_missing_half() {
        let entry = RosterEntry::new("1", "", "Adesanya", "The Last Stylebender", "1");
        assert_eq!(entry.full_name(), "Adesanya");

        let entry = RosterEntry::new("2", "Jon", "Jones", "Bones", "2");
        assert_eq!(entry.full_name(), "Jon Jones");
    }

    #[test]
    fn test_find_by_identifier() {
        let roster = Roster::new(
            vec![
                RosterEntry::new("1", "Jon", "Jones", "Bones", "jon-jones"),
                RosterEntry::new("2", "Conor", "McGregor", "Notorious", "conor-mcgregor"),
            ],
            Utc::now(),
        );

        assert_eq!(roster.find_by_identifier("2").map(|e| e.last_name.as_str()), Some("McGregor"));
        assert_eq!(roster.find_by_identifier("jon-jones").map(|e| e.id.as_str()), Some("1"));
        assert!(roster.find_by_identifier("3").is_none());
    }

    #[test]
    fn test_detail_serializes_unknown_numbers_as_null() {
        let detail = FighterDetail {
            id: "1".to_string(),
            name: "Jon Jones".to_string(),
            height: NOT_AVAILABLE.to_string(),
            reach: NOT_AVAILABLE.to_string(),
            stance: NOT_AVAILABLE.to_string(),
            weight_class: NOT_AVAILABLE.to_string(),
            dob: NOT_AVAILABLE.to_string(),
            wins: Some(27),
            losses: None,
            draws: None,
            profile_url: "http://example.test/1".to_string(),
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["wins"], 27);
        assert!(json["losses"].is_null());
        assert_eq!(json["weightClass"], "N/A");
        assert_eq!(json["profileUrl"], "http://example.test/1");
    }
}
