use std::collections::HashSet;
use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use tracing::warn;
use url::Url;

use crate::error::{MalarixError, Result};

/// A capped HTTP client that only allows requests to approved domains.
///
/// Malarix talks to exactly one family of external services (the RCSB
/// structural search); capping the client keeps a misconfigured endpoint
/// from reaching anywhere else.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a new SandboxClient with the default Malarix allowlist.
    pub fn new() -> Result<Self> {
        let mut allowlist = HashSet::new();
        let domains = vec![
            "search.rcsb.org", // PDB structural search
            "data.rcsb.org",   // PDB entry metadata
            "localhost",       // test fixtures
            "127.0.0.1",       // localhost alt
        ];
        for d in domains {
            allowlist.insert(d.to_string());
        }

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MalarixError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Validates if a URL is permitted under the current sandbox policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        if let Ok(parsed) = Url::parse(url) {
            if let Some(host) = parsed.host_str() {
                // Exact match or a subdomain of an allowed domain.
                for allowed in &self.allowlist {
                    if host == allowed || host.ends_with(&format!(".{}", allowed)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Exposes the inner `reqwest::Client` builder pattern safely for GET requests.
    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder> {
        if !self.is_allowed(url) {
            warn!(url, "blocked GET to non-allowlisted host");
            return Err(MalarixError::Security(format!(
                "domain not in allowlist for URL {}",
                url
            )));
        }
        Ok(self.client.get(url))
    }

    /// Exposes the inner `reqwest::Client` builder pattern safely for POST requests.
    pub fn post(&self, url: &str) -> Result<reqwest::RequestBuilder> {
        if !self.is_allowed(url) {
            warn!(url, "blocked POST to non-allowlisted host");
            return Err(MalarixError::Security(format!(
                "domain not in allowlist for URL {}",
                url
            )));
        }
        Ok(self.client.post(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rcsb_hosts_are_allowed() {
        let client = SandboxClient::new().unwrap();
        assert!(client.is_allowed("https://search.rcsb.org/rcsbsearch/v2/query"));
        assert!(client.is_allowed("https://data.rcsb.org/rest/v1/core/entry/1CRN"));
    }

    #[test]
    fn unknown_host_is_rejected() {
        let client = SandboxClient::new().unwrap();
        assert!(!client.is_allowed("https://example.com/query"));
        assert!(client.post("https://example.com/query").is_err());
    }

    #[test]
    fn allow_domain_extends_the_list() {
        let mut client = SandboxClient::new().unwrap();
        assert!(!client.is_allowed("https://internal.lab/query"));
        client.allow_domain("internal.lab");
        assert!(client.is_allowed("https://internal.lab/query"));
    }
}
