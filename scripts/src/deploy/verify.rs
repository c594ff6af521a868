use std::time::Duration;

use alloy::{hex, primitives::Address};
use reqwest::Client;
use tracing::{info, warn};

use crate::{deploy::artifacts::Artifact, errors::ScriptError};

/// How many times the verification status is polled before giving up
const STATUS_POLL_ATTEMPTS: u32 = 10;

/// Delay between two status polls
const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Publishes contract sources to an etherscan compatible explorer API
pub struct SourceVerifier {
    /// HTTP client
    http: Client,
    /// Explorer API URL
    api_url: String,
    /// Explorer API key
    api_key: String,
}

impl SourceVerifier {
    /// Verifier of the explorer at `api_url`
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            http: Client::new(),
            api_url,
            api_key,
        }
    }

    /// Submit the source of a freshly deployed contract and wait for the explorer verdict
    pub async fn publish_source(
        &self,
        artifact: &Artifact,
        address: Address,
        constructor_args: &[u8],
    ) -> Result<(), ScriptError> {
        let source = artifact.source.as_deref().ok_or_else(|| {
            ScriptError::Verification(format!("{} artifact has no source", artifact.contract_name))
        })?;
        let compiler_version = artifact.compiler_version.as_deref().ok_or_else(|| {
            ScriptError::Verification(format!(
                "{} artifact has no compiler version",
                artifact.contract_name
            ))
        })?;

        let params = [
            ("apikey", self.api_key.clone()),
            ("module", "contract".to_string()),
            ("action", "verifysourcecode".to_string()),
            ("contractaddress", format!("{address:#x}")),
            ("sourceCode", source.to_string()),
            ("codeformat", "solidity-single-file".to_string()),
            ("contractname", artifact.contract_name.clone()),
            ("compilerversion", format!("v{}", compiler_version.trim_start_matches('v'))),
            (
                "optimizationUsed",
                u8::from(artifact.optimizer_runs.is_some()).to_string(),
            ),
            ("runs", artifact.optimizer_runs.unwrap_or(200).to_string()),
            ("constructorArguements", hex::encode(constructor_args)),
        ];

        let body = self
            .http
            .post(&self.api_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| ScriptError::Verification(e.to_string()))?
            .text()
            .await
            .map_err(|e| ScriptError::Verification(e.to_string()))?;
        let guid = parse_explorer_response(&body)?;
        info!("Verification of {} submitted, guid {}", artifact.contract_name, guid);

        for _ in 0..STATUS_POLL_ATTEMPTS {
            tokio::time::sleep(STATUS_POLL_INTERVAL).await;
            match self.check_status(&guid).await {
                Ok(result) => {
                    info!("{} verification: {}", artifact.contract_name, result);
                    return Ok(());
                }
                Err(ScriptError::Verification(reason)) if reason.contains("Pending") => continue,
                Err(e) => return Err(e),
            }
        }

        warn!(
            "{} verification still pending after {} checks",
            artifact.contract_name, STATUS_POLL_ATTEMPTS
        );
        Ok(())
    }

    /// Verification status of a submission
    async fn check_status(&self, guid: &str) -> Result<String, ScriptError> {
        let body = self
            .http
            .get(&self.api_url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("module", "contract"),
                ("action", "checkverifystatus"),
                ("guid", guid),
            ])
            .send()
            .await
            .map_err(|e| ScriptError::Verification(e.to_string()))?
            .text()
            .await
            .map_err(|e| ScriptError::Verification(e.to_string()))?;

        parse_explorer_response(&body)
    }
}

/// Explorer responses carry `status` "1" on success and the payload in `result`
fn parse_explorer_response(body: &str) -> Result<String, ScriptError> {
    let parsed = json::parse(body).map_err(|e| ScriptError::Verification(e.to_string()))?;
    let result = parsed["result"].as_str().unwrap_or_default().to_string();
    if parsed["status"].as_str() == Some("1") {
        Ok(result)
    } else {
        Err(ScriptError::Verification(result))
    }
}
