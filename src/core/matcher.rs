use crate::models::{Roster, RosterEntry};

/// Default minimum query length, in characters after normalization
pub const MIN_QUERY_LEN: usize = 2;

/// Matching strategies, in the order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchTier {
    /// Full name equals the query
    Exact,
    /// Full name contains the query
    Substring,
    /// Nickname contains the query
    Nickname,
}

impl MatchTier {
    pub const ALL: [MatchTier; 3] = [MatchTier::Exact, MatchTier::Substring, MatchTier::Nickname];
}

/// Outcome of resolving one query against a roster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult<'a> {
    Found {
        entry: &'a RosterEntry,
        tier: MatchTier,
    },
    NotFound,
}

impl<'a> MatchResult<'a> {
    pub fn entry(&self) -> Option<&'a RosterEntry> {
        match self {
            MatchResult::Found { entry, .. } => Some(entry),
            MatchResult::NotFound => None,
        }
    }

    pub fn tier(&self) -> Option<MatchTier> {
        match self {
            MatchResult::Found { tier, .. } => Some(*tier),
            MatchResult::NotFound => None,
        }
    }
}

/// Trim and lowercase a human-entered query
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Lowercased keys for one roster entry, computed once per pass
struct EntryKeys<'a> {
    entry: &'a RosterEntry,
    full_name: String,
    nickname: String,
}

impl<'a> EntryKeys<'a> {
    fn new(entry: &'a RosterEntry) -> Self {
        Self {
            entry,
            full_name: entry.full_name().to_lowercase(),
            nickname: entry.nickname.trim().to_lowercase(),
        }
    }

    fn satisfies(&self, tier: MatchTier, query: &str) -> bool {
        match tier {
            MatchTier::Exact => self.full_name == query,
            MatchTier::Substring => self.full_name.contains(query),
            MatchTier::Nickname => self.nickname.contains(query),
        }
    }

    fn best_tier(&self, query: &str) -> Option<MatchTier> {
        MatchTier::ALL
            .into_iter()
            .find(|tier| self.satisfies(*tier, query))
    }
}

/// Deterministic tiered name matcher
///
/// Tiers are tried strictly in order; within a tier the first entry in roster
/// order wins. There is no scoring beyond that.
#[derive(Debug, Clone)]
pub struct Matcher {
    min_query_len: usize,
}

impl Matcher {
    pub fn new(min_query_len: usize) -> Self {
        Self { min_query_len }
    }

    pub fn min_query_len(&self) -> usize {
        self.min_query_len
    }

    /// Whether an already-normalized query is long enough to match
    pub fn accepts(&self, normalized: &str) -> bool {
        normalized.chars().count() >= self.min_query_len
    }

    /// Resolve a query to the single best roster entry
    pub fn match_query<'a>(&self, query: &str, roster: &'a Roster) -> MatchResult<'a> {
        let query = normalize_query(query);
        if !self.accepts(&query) {
            return MatchResult::NotFound;
        }

        let keys: Vec<EntryKeys<'a>> = roster.entries.iter().map(EntryKeys::new).collect();

        for tier in MatchTier::ALL {
            if let Some(hit) = keys.iter().find(|k| k.satisfies(tier, &query)) {
                tracing::trace!("Matched {:?} via {:?}", hit.entry.id, tier);
                return MatchResult::Found {
                    entry: hit.entry,
                    tier,
                };
            }
        }

        MatchResult::NotFound
    }

    /// Every entry matching the query, ordered by tier and then roster order
    pub fn search<'a>(&self, query: &str, roster: &'a Roster, limit: usize) -> Vec<&'a RosterEntry> {
        let query = normalize_query(query);
        if !self.accepts(&query) || limit == 0 {
            return Vec::new();
        }

        let mut hits: Vec<(MatchTier, &'a RosterEntry)> = roster
            .entries
            .iter()
            .filter_map(|entry| {
                EntryKeys::new(entry)
                    .best_tier(&query)
                    .map(|tier| (tier, entry))
            })
            .collect();

        // Stable sort keeps roster order within a tier
        hits.sort_by_key(|(tier, _)| *tier);
        hits.truncate(limit);

        hits.into_iter().map(|(_, entry)| entry).collect()
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(MIN_QUERY_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn roster(entries: Vec<RosterEntry>) -> Roster {
        Roster::new(entries, Utc::now())
    }

    fn jones_roster() -> Roster {
        roster(vec![
            RosterEntry::new("1", "Israel", "Adesanya", "The Last Stylebender", "israel-adesanya"),
            RosterEntry::new("2", "Jon", "Jones", "Bones", "jon-jones"),
            RosterEntry::new("3", "Alex", "Pereira", "Poatan", "alex-pereira"),
        ])
    }

    #[test]
    fn test_exact_tier() {
        let matcher = Matcher::default();
        let roster = jones_roster();

        let result = matcher.match_query("  Jon Jones ", &roster);
        assert_eq!(result.tier(), Some(MatchTier::Exact));
        assert_eq!(result.entry().map(|e| e.id.as_str()), Some("2"));
    }

    #[test]
    fn test_substring_tier() {
        let matcher = Matcher::default();
        let roster = jones_roster();

        let result = matcher.match_query("jones", &roster);
        assert_eq!(result.tier(), Some(MatchTier::Substring));
        assert_eq!(result.entry().map(|e| e.id.as_str()), Some("2"));
    }

    #[test]
    fn test_nickname_tier() {
        let matcher = Matcher::default();
        let roster = jones_roster();

        let result = matcher.match_query("BONES", &roster);
        assert_eq!(result.tier(), Some(MatchTier::Nickname));
        assert_eq!(result.entry().map(|e| e.id.as_str()), Some("2"));
    }

    #[test]
    fn test_no_match() {
        let matcher = Matcher::default();
        assert_eq!(matcher.match_query("conor", &jones_roster()), MatchResult::NotFound);
    }

    #[test]
    fn test_short_query_is_not_found() {
        let matcher = Matcher::default();
        let roster = jones_roster();

        assert_eq!(matcher.match_query("j", &roster), MatchResult::NotFound);
        assert_eq!(matcher.match_query("   ", &roster), MatchResult::NotFound);
        assert_eq!(matcher.match_query(" a  ", &roster), MatchResult::NotFound);
    }

    #[test]
    fn test_name_substring_beats_earlier_nickname() {
        let matcher = Matcher::default();
        let roster = roster(vec![
            RosterEntry::new("1", "Justin", "Gaethje", "The Highlight", "justin-gaethje"),
            RosterEntry::new("2", "Highlight", "Reel", "", "highlight-reel"),
        ]);

        let result = matcher.match_query("highlight", &roster);
        assert_eq!(result.tier(), Some(MatchTier::Substring));
        assert_eq!(result.entry().map(|e| e.id.as_str()), Some("2"));
    }

    #[test]
    fn test_first_in_roster_order_wins_within_tier() {
        let matcher = Matcher::default();
        let roster = roster(vec![
            RosterEntry::new("1", "Nick", "Diaz", "", "nick-diaz"),
            RosterEntry::new("2", "Nate", "Diaz", "", "nate-diaz"),
        ]);

        let result = matcher.match_query("diaz", &roster);
        assert_eq!(result.entry().map(|e| e.id.as_str()), Some("1"));
    }

    #[test]
    fn test_exact_beats_earlier_substring() {
        let matcher = Matcher::default();
        let roster = roster(vec![
            RosterEntry::new("1", "Jon", "Jonesy", "", "a"),
            RosterEntry::new("2", "Jon", "Jones", "", "b"),
        ]);

        let result = matcher.match_query("jon jones", &roster);
        assert_eq!(result.tier(), Some(MatchTier::Exact));
        assert_eq!(result.entry().map(|e| e.id.as_str()), Some("2"));
    }

    #[test]
    fn test_search_orders_by_tier_then_roster() {
        let matcher = Matcher::default();
        let roster = roster(vec![
            RosterEntry::new("1", "Cody", "Garbrandt", "No Love", "1"),
            RosterEntry::new("2", "Diego", "Lopes", "", "2"),
            RosterEntry::new("3", "Lo", "Lo", "", "3"),
            RosterEntry::new("4", "Jose", "Aldo", "Junior", "4"),
        ]);

        let ids: Vec<&str> = matcher
            .search("lo", &roster, 10)
            .into_iter()
            .map(|e| e.id.as_str())
            .collect();
        // "Lo Lo" is not an exact hit for "lo", so all three land in their best tier
        assert_eq!(ids, vec!["2", "3", "1"]);
    }

    #[test]
    fn test_search_respects_limit_and_short_queries() {
        let matcher = Matcher::default();
        let roster = jones_roster();

        assert_eq!(matcher.search("e", &roster, 10).len(), 0);
        assert_eq!(matcher.search("a", &roster, 10).len(), 0);
        assert_eq!(matcher.search("es", &roster, 1).len(), 1);
        assert!(matcher.search("es", &roster, 0).is_empty());
    }
}
