// Core algorithm exports
pub mod extractor;
pub mod matcher;
pub mod schema;

pub use extractor::{division_for_weight, parse_first_number, unwrap_envelope, ExtractError, ExtractedFields, Extractor, FieldValue};
pub use matcher::{normalize_query, MatchResult, MatchTier, Matcher, MIN_QUERY_LEN};
pub use schema::{DetailSchema, FieldKind, FieldRule, Locator};
