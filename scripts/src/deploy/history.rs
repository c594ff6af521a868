use std::{fs, path::PathBuf};

use alloy::primitives::Address;
use json::JsonValue;

use crate::errors::ScriptError;

/// Addresses of every contract deployed by the scripts, per network and
/// contract name, oldest first. Persisted after each deployment.
#[derive(Debug)]
pub struct DeploymentHistory {
    /// The `deployments.json` file
    file_path: PathBuf,
    /// Network the session writes under
    network: String,
    /// Whole history, all networks
    parsed_json: JsonValue,
}

impl DeploymentHistory {
    /// Read the history file, starting an empty one if it doesn't exist
    pub fn load(file_path: impl Into<PathBuf>, network: &str) -> Result<Self, ScriptError> {
        let file_path = file_path.into();
        let parsed_json = if file_path.exists() {
            let file_contents = fs::read_to_string(&file_path)
                .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;
            json::parse(&file_contents).map_err(|e| ScriptError::JsonOutputError(e.to_string()))?
        } else {
            JsonValue::new_object()
        };

        Ok(Self {
            file_path,
            network: network.to_string(),
            parsed_json,
        })
    }

    /// All recorded addresses of a contract, oldest first
    pub fn all(&self, contract_name: &str) -> Vec<Address> {
        self.parsed_json[self.network.as_str()][contract_name]
            .members()
            .filter_map(|value| value.as_str())
            .filter_map(|raw| raw.parse::<Address>().ok())
            .collect()
    }

    /// Most recent deployment of a contract
    pub fn latest(&self, contract_name: &str) -> Option<Address> {
        self.nth_latest(contract_name, 1)
    }

    /// `n`-th most recent deployment, `1` being the latest
    pub fn nth_latest(&self, contract_name: &str, n: usize) -> Option<Address> {
        let all = self.all(contract_name);
        n.checked_sub(1)
            .and_then(|offset| all.len().checked_sub(offset + 1))
            .map(|index| all[index])
    }

    /// Record a new deployment and write the history back
    pub fn record(&mut self, contract_name: &str, address: Address) -> Result<(), ScriptError> {
        let entry = &mut self.parsed_json[self.network.as_str()][contract_name];
        if !entry.is_array() {
            *entry = JsonValue::new_array();
        }
        entry
            .push(JsonValue::String(format!("{address:#x}")))
            .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;
            }
        }
        fs::write(&self.file_path, json::stringify_pretty(self.parsed_json.clone(), 4))
            .map_err(|e| ScriptError::JsonOutputError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    fn scratch_file(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("savvy-history-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir.join("deployments.json")
    }

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn empty_history_has_no_deployments() {
        let history = DeploymentHistory::load(scratch_file("empty"), "development").unwrap();
        assert!(history.latest("ProxyAdmin").is_none());
        assert!(history.all("ProxyAdmin").is_empty());
    }

    #[test]
    fn records_and_indexes_from_the_end() {
        let file = scratch_file("indexing");
        let mut history = DeploymentHistory::load(&file, "development").unwrap();
        history.record("TransparentUpgradeableProxy", addr(1)).unwrap();
        history.record("TransparentUpgradeableProxy", addr(2)).unwrap();

        assert_eq!(history.latest("TransparentUpgradeableProxy"), Some(addr(2)));
        assert_eq!(history.nth_latest("TransparentUpgradeableProxy", 2), Some(addr(1)));
        assert_eq!(history.nth_latest("TransparentUpgradeableProxy", 3), None);
        assert_eq!(history.nth_latest("TransparentUpgradeableProxy", 0), None);
    }

    #[test]
    fn persists_per_network() {
        let file = scratch_file("networks");
        let mut history = DeploymentHistory::load(&file, "development").unwrap();
        history.record("SavvyFinanceFarm", addr(7)).unwrap();

        let reloaded = DeploymentHistory::load(&file, "development").unwrap();
        assert_eq!(reloaded.all("SavvyFinanceFarm"), vec![addr(7)]);

        let other = DeploymentHistory::load(&file, "bsc-test").unwrap();
        assert!(other.latest("SavvyFinanceFarm").is_none());
    }
}
