//! Structural search against the RCSB PDB.
//!
//! One query shape: a chemical-descriptor search keyed by the same SMILES
//! string the rest of the pipeline consumes. The response is an ordered
//! result set; we keep the first ten identifiers as returned, duplicates
//! included, and treat an empty result as a normal outcome rather than a
//! failure.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use malarix_common::sandbox::SandboxClient;
use malarix_common::{ProteinIdSet, Result};

/// RCSB search API endpoint.
pub const RCSB_SEARCH_URL: &str = "https://search.rcsb.org/rcsbsearch/v2/query";

/// Maximum number of identifiers surfaced to the caller.
pub const MAX_RESULTS: usize = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result_set: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    identifier: String,
}

/// Client for SMILES-keyed structure search.
pub struct StructureSearchClient {
    client: SandboxClient,
    url: String,
}

impl StructureSearchClient {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: SandboxClient::new()?,
            url: RCSB_SEARCH_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint (test fixtures).
    pub fn with_url(url: &str) -> Result<Self> {
        Ok(Self {
            client: SandboxClient::new()?,
            url: url.to_string(),
        })
    }

    /// Entries whose bound chemical matches the query structure, best first.
    pub async fn related_structures(&self, smiles: &str) -> Result<ProteinIdSet> {
        info!(smiles, "searching RCSB for related structures");

        let response = self
            .client
            .post(&self.url)?
            .json(&chemical_query(smiles))
            .send()
            .await?;

        // The API answers 204 with no body when nothing matches.
        if response.status() == StatusCode::NO_CONTENT {
            debug!(smiles, "no matching structures");
            return Ok(ProteinIdSet::new());
        }

        let parsed: SearchResponse = response.error_for_status()?.json().await?;
        let ids = take_top(parsed.result_set.into_iter().map(|h| h.identifier));
        debug!(count = ids.len(), "structure search finished");
        Ok(ids)
    }
}

/// Graph-strict chemical search in the RCSB query grammar.
fn chemical_query(smiles: &str) -> serde_json::Value {
    json!({
        "query": {
            "type": "terminal",
            "service": "chemical",
            "parameters": {
                "value": smiles,
                "type": "descriptor",
                "descriptor_type": "SMILES",
                "match_type": "graph-strict"
            }
        },
        "return_type": "entry",
        "request_options": {
            "paginate": { "start": 0, "rows": MAX_RESULTS }
        }
    })
}

/// First `MAX_RESULTS` identifiers in response order, no dedup.
pub fn take_top(ids: impl IntoIterator<Item = String>) -> ProteinIdSet {
    ids.into_iter().take(MAX_RESULTS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{:04}", i)).collect()
    }

    #[test]
    fn truncates_to_ten_in_order() {
        let top = take_top(ids(15));
        assert_eq!(top.len(), 10);
        assert_eq!(top[0], "0000");
        assert_eq!(top[9], "0009");
    }

    #[test]
    fn shorter_lists_pass_through() {
        assert_eq!(take_top(ids(3)).len(), 3);
        assert!(take_top(Vec::new()).is_empty());
    }

    #[test]
    fn duplicates_survive_truncation() {
        let top = take_top(vec!["1ABC".to_string(), "1ABC".to_string(), "2XYZ".to_string()]);
        assert_eq!(top, vec!["1ABC", "1ABC", "2XYZ"]);
    }

    #[test]
    fn response_parsing() {
        let body = r#"{
            "query_id": "abc",
            "result_type": "entry",
            "total_count": 2,
            "result_set": [
                {"identifier": "4TZK", "score": 1.0},
                {"identifier": "1U72", "score": 0.91}
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        let ids: Vec<String> = parsed.result_set.into_iter().map(|h| h.identifier).collect();
        assert_eq!(ids, vec!["4TZK", "1U72"]);

        let empty: SearchResponse = serde_json::from_str(r#"{"total_count": 0}"#).unwrap();
        assert!(empty.result_set.is_empty());
    }

    #[test]
    fn query_shape() {
        let q = chemical_query("CCO");
        assert_eq!(q["query"]["service"], "chemical");
        assert_eq!(q["query"]["parameters"]["value"], "CCO");
        assert_eq!(q["query"]["parameters"]["descriptor_type"], "SMILES");
        assert_eq!(q["return_type"], "entry");
    }
}
