use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Error, anyhow};
use licensing::verify::VerificationResult;
use serde_json::json;

/// The only error message a caller ever sees; retrying is their call.
pub const SERVICE_UNAVAILABLE: &str = "License verification service temporarily unavailable";

/// Client for the verification proxy.
///
/// Each outgoing lookup takes a sequence number; a reply that comes back
/// after a newer lookup was issued is discarded instead of displayed out
/// of order.
pub struct VerifyClient {
    http: reqwest::Client,
    base_url: String,
    latest: AtomicU64,
}

impl VerifyClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            latest: AtomicU64::new(0),
        }
    }

    /// `Ok(None)` means a newer lookup superseded this one mid-flight.
    pub async fn verify(&self, query: &str) -> Result<Option<VerificationResult>, Error> {
        let seq = self.issue();

        let response = self
            .http
            .post(format!("{}/verify", self.base_url))
            .json(&json!({ "query": query }))
            .send()
            .await
            .map_err(|_| anyhow!(SERVICE_UNAVAILABLE))?;

        if !response.status().is_success() {
            return Err(anyhow!(SERVICE_UNAVAILABLE));
        }

        let result: VerificationResult = response
            .json()
            .await
            .map_err(|_| anyhow!(SERVICE_UNAVAILABLE))?;

        if !self.is_current(seq) {
            return Ok(None);
        }

        Ok(Some(result))
    }

    fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, seq: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }
}
