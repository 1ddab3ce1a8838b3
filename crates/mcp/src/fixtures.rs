// Canned result sets served by the reference tool

use crate::intent::QueryIntent;
use serde_json::{json, Value};

/// Result payload for a classified query.
pub fn response_for(intent: QueryIntent) -> Value {
    match intent {
        QueryIntent::FieldSummary => field_summary(),
        QueryIntent::DiscoveryProbe => discovery_probe(),
        QueryIntent::Export => export_incidents(),
    }
}

/// Field-distribution summary over the notable index.
pub fn field_summary() -> Value {
    json!({
        "type": "splunk_query_result",
        "query_kind": "fieldsummary",
        "rows": [
            {
                "field": "mitre_tactic",
                "distinct_values": 3,
                "top_values": ["command-and-control", "exfiltration", "lateral-movement"]
            },
            {
                "field": "rule_name",
                "distinct_values": 12,
                "top_values": ["C2 Beaconing", "Suspicious RDP", "Large Data Transfer"]
            },
            {
                "field": "severity",
                "distinct_values": 3,
                "top_values": ["low", "medium", "high"]
            }
        ],
        "meta": { "note": "Mock fieldsummary response" }
    })
}

/// Small recency sample, two notable events.
pub fn discovery_probe() -> Value {
    json!({
        "type": "splunk_query_result",
        "query_kind": "discovery_probe",
        "rows": [
            {
                "_time": "2026-01-20T18:42:10Z",
                "rule_name": "C2 Beaconing",
                "mitre_tactic": "command-and-control",
                "severity": "high"
            },
            {
                "_time": "2026-01-20T19:05:44Z",
                "rule_name": "Suspicious RDP",
                "mitre_tactic": "lateral-movement",
                "severity": "medium"
            }
        ],
        "meta": { "note": "Mock discovery results" }
    })
}

/// Three labeled incidents covering the sample mapping. Served for every
/// export query regardless of its filter.
pub fn export_incidents() -> Value {
    json!({
        "type": "splunk_query_result",
        "query_kind": "export",
        "rows": [
            {
                "_time": "2026-01-19T03:10:21Z",
                "label": "C2",
                "rule_name": "C2 Beaconing",
                "severity": "high",
                "src": "10.0.1.10",
                "dest": "198.51.100.22",
                "user": "alice",
                "host": "host-a",
                "signature": "beaconing-interval"
            },
            {
                "_time": "2026-01-18T22:41:09Z",
                "label": "EXFIL",
                "rule_name": "Large Data Transfer",
                "severity": "high",
                "src": "10.0.2.15",
                "dest": "203.0.113.9",
                "user": "bob",
                "host": "host-b",
                "signature": "bytes-out-threshold"
            },
            {
                "_time": "2026-01-18T19:02:55Z",
                "label": "LATERAL",
                "rule_name": "Suspicious RDP",
                "severity": "medium",
                "src": "10.0.3.7",
                "dest": "10.0.4.8",
                "user": "carol",
                "host": "host-c",
                "signature": "rdp-admin-share"
            }
        ],
        "meta": { "note": "Mock export rows (not actually filtered)" }
    })
}
