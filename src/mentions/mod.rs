use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Upper bound on how many candidates the popup ever shows at once.
pub const MAX_SUGGESTIONS: usize = 5;

/// One mentionable entity. `name` is what the filter matches against;
/// everything else the candidate source supplies rides along untouched in
/// `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    pub name: String,
    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl Mention {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: Map::new(),
        }
    }
}

/// Case-insensitive substring filter over the candidate list. An empty query
/// matches everything. Relative order is preserved and the result is cut to
/// the first [`MAX_SUGGESTIONS`] matches.
pub fn filter_mentions(mentions: &[Mention], query: &str) -> Vec<Mention> {
    let needle = query.to_lowercase();
    mentions
        .iter()
        .filter(|mention| needle.is_empty() || mention.name.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(mentions: &[Mention]) -> Vec<&str> {
        mentions.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn substring_match_is_case_insensitive() {
        let candidates = vec![
            Mention::named("Alice"),
            Mention::named("Alan"),
            Mention::named("Bob"),
        ];
        let filtered = filter_mentions(&candidates, "al");
        assert_eq!(names(&filtered), vec!["Alice", "Alan"]);
    }

    #[test]
    fn matches_anywhere_in_the_name() {
        let candidates = vec![Mention::named("Donald"), Mention::named("Ronald")];
        assert_eq!(names(&filter_mentions(&candidates, "nal")), vec![
            "Donald", "Ronald"
        ]);
    }

    #[test]
    fn empty_query_returns_first_five_in_order() {
        let candidates: Vec<Mention> = (1..=7)
            .map(|i| Mention::named(format!("user{}", i)))
            .collect();
        let filtered = filter_mentions(&candidates, "");
        assert_eq!(names(&filtered), vec![
            "user1", "user2", "user3", "user4", "user5"
        ]);
    }

    #[test]
    fn truncates_matches_beyond_the_limit() {
        let candidates: Vec<Mention> = (0..10).map(|i| Mention::named(format!("a{}", i))).collect();
        assert_eq!(filter_mentions(&candidates, "a").len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn no_match_yields_empty() {
        let candidates = vec![Mention::named("Alice")];
        assert!(filter_mentions(&candidates, "zz").is_empty());
    }

    #[test]
    fn extra_metadata_survives_filtering() {
        let raw = serde_json::json!({ "name": "Alice", "avatar": "alice.png" });
        let mention: Mention = serde_json::from_value(raw).unwrap();
        let filtered = filter_mentions(std::slice::from_ref(&mention), "ali");
        assert_eq!(filtered[0].extra.get("avatar").and_then(Value::as_str), Some("alice.png"));
    }
}
