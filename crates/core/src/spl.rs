// SPL construction for notable-event exports

use crate::types::{Label, Rule};

/// Probe issued before any export to confirm the backend is reachable and
/// notable data exists. Operators can override it with their own SPL.
pub const DEFAULT_DISCOVERY_SPL: &str =
    "(index=notable earliest=-30d | head 5) OR (sourcetype=notable earliest=-30d | head 5)";

/// Build the export query for one label.
///
/// The emitted pipeline tags rows with the label, filters them by the label's
/// rules, orders newest-first, deduplicates repeated incidents, caps the row
/// count, and projects a fixed column set. The output is deterministic: the
/// same inputs always produce the same query text.
pub fn build_export_spl(base_search: &str, label: &Label, rules: &[Rule], limit: usize) -> String {
    let filter = where_expression(rules);
    format!(
        "{base_search}\n\
         | eval label=\"{label}\"\n\
         | where {filter}\n\
         | sort 0 - _time\n\
         | dedup rule_name, src, dest, label\n\
         | head {limit}\n\
         | table _time label rule_name severity src dest user host signature"
    )
}

/// Render the rules as an OR of parenthesized IN clauses, in rule order.
/// No rules at all means the filter accepts everything.
fn where_expression(rules: &[Rule]) -> String {
    if rules.is_empty() {
        return "true()".to_string();
    }
    // Values are embedded verbatim; SPL escaping is the mapping author's concern.
    rules
        .iter()
        .map(|rule| {
            let quoted = rule
                .values
                .iter()
                .map(|value| format!("\"{value}\""))
                .collect::<Vec<_>>()
                .join(",");
            format!("({} IN ({quoted}))", rule.field)
        })
        .collect::<Vec<_>>()
        .join(" OR ")
}
