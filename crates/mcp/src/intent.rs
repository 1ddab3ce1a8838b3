// Query intent classification
//
// The reference server never executes SPL. It inspects the query text,
// decides which kind of request the caller is making, and serves the canned
// result set for that kind.

/// The query kinds the reference server can emulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryIntent {
    /// Field-distribution summary (`fieldsummary` anywhere in the query)
    FieldSummary,
    /// Small recency probe over the notable index
    DiscoveryProbe,
    /// Labeled incident export; also the fallback for anything unrecognized
    Export,
}

/// One entry in the classification table. Predicates receive the query text
/// already lowercased.
struct IntentRule {
    intent: QueryIntent,
    matches: fn(&str) -> bool,
}

/// Classification table, checked top to bottom; the first match wins and
/// `Export` is the fallback when nothing matches.
const RULES: &[IntentRule] = &[
    IntentRule {
        intent: QueryIntent::FieldSummary,
        matches: mentions_fieldsummary,
    },
    IntentRule {
        intent: QueryIntent::DiscoveryProbe,
        matches: looks_like_discovery_probe,
    },
];

fn mentions_fieldsummary(query: &str) -> bool {
    query.contains("fieldsummary")
}

fn looks_like_discovery_probe(query: &str) -> bool {
    query.contains("index=notable") && query.contains("head 5")
}

impl QueryIntent {
    /// Classify a query. Matching is case-insensitive.
    pub fn classify(query: &str) -> Self {
        let lowered = query.to_lowercase();
        RULES
            .iter()
            .find(|rule| (rule.matches)(&lowered))
            .map(|rule| rule.intent)
            .unwrap_or(QueryIntent::Export)
    }
}
