use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query string accepted by `GET /api/fighter`
///
/// Exactly one of `name`, `id` or `search` is honored, in that order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct FighterQuery {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 200))]
    pub id: Option<String>,
    #[validate(length(max = 100))]
    pub search: Option<String>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
}
