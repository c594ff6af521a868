use std::{fs, path::Path};

use alloy::{hex, primitives::Bytes};
use json::JsonValue;

use crate::errors::ScriptError;

/// A compiled contract, as written by the Solidity build into `<build_dir>/contracts`
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Name of the compiled contract
    pub contract_name: String,
    /// Creation bytecode, without constructor arguments
    pub bytecode: Bytes,
    /// Flattened source, needed to publish the contract on the explorer
    pub source: Option<String>,
    /// Full `solc` version string
    pub compiler_version: Option<String>,
    /// Optimizer runs, when the optimizer was enabled
    pub optimizer_runs: Option<u32>,
}

impl Artifact {
    /// Load `<build_dir>/contracts/<contract_name>.json`
    pub fn load(build_dir: &Path, contract_name: &str) -> Result<Artifact, ScriptError> {
        let path = build_dir
            .join("contracts")
            .join(format!("{contract_name}.json"));
        let content = fs::read_to_string(&path)
            .map_err(|e| ScriptError::Artifact(format!("{}: {}", path.display(), e)))?;
        Artifact::parse(contract_name, &content)
    }

    /// Parse an artifact document. Both a plain `bytecode` string and the
    /// `bytecode.object` layout are accepted.
    pub fn parse(contract_name: &str, content: &str) -> Result<Artifact, ScriptError> {
        let parsed = json::parse(content).map_err(|e| ScriptError::Artifact(e.to_string()))?;

        let raw_bytecode = parsed["bytecode"]
            .as_str()
            .or_else(|| parsed["bytecode"]["object"].as_str())
            .ok_or_else(|| {
                ScriptError::Artifact(format!("{} artifact has no bytecode", contract_name))
            })?;
        let bytecode = hex::decode(raw_bytecode)
            .map_err(|e| ScriptError::Artifact(format!("{}: {}", contract_name, e)))?;
        if bytecode.is_empty() {
            return Err(ScriptError::Artifact(format!(
                "{} artifact has empty bytecode, is it an interface?",
                contract_name
            )));
        }

        let optimizer = &parsed["compiler"]["optimizer"];
        let optimizer_runs = if optimizer["enabled"].as_bool().unwrap_or(false) {
            optimizer["runs"].as_u32()
        } else {
            None
        };

        Ok(Artifact {
            contract_name: parsed["contractName"]
                .as_str()
                .unwrap_or(contract_name)
                .to_string(),
            bytecode: Bytes::from(bytecode),
            source: string_field(&parsed["source"]),
            compiler_version: string_field(&parsed["compiler"]["version"]),
            optimizer_runs,
        })
    }

    /// Creation code followed by the ABI encoded constructor arguments
    pub fn deploy_code(&self, constructor_args: &[u8]) -> Bytes {
        let mut code = self.bytecode.to_vec();
        code.extend_from_slice(constructor_args);
        Bytes::from(code)
    }
}

/// Owned copy of a JSON string
fn string_field(value: &JsonValue) -> Option<String> {
    value.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_bytecode_artifacts() {
        let artifact = Artifact::parse(
            "SavvyFinance",
            r#"{
                "contractName": "SavvyFinance",
                "bytecode": "0x6080604052",
                "source": "contract SavvyFinance {}",
                "compiler": {"version": "0.8.13+commit.abaa5c0e", "optimizer": {"enabled": true, "runs": 200}}
            }"#,
        )
        .unwrap();
        assert_eq!(artifact.bytecode.to_vec(), vec![0x60, 0x80, 0x60, 0x40, 0x52]);
        assert_eq!(artifact.optimizer_runs, Some(200));
        assert_eq!(artifact.compiler_version.as_deref(), Some("0.8.13+commit.abaa5c0e"));
        assert!(artifact.source.is_some());
    }

    #[test]
    fn parses_nested_bytecode_artifacts() {
        let artifact =
            Artifact::parse("ProxyAdmin", r#"{"bytecode": {"object": "0x6080"}}"#).unwrap();
        assert_eq!(artifact.contract_name, "ProxyAdmin");
        assert_eq!(artifact.optimizer_runs, None);
        assert!(artifact.source.is_none());
    }

    #[test]
    fn rejects_interfaces_and_missing_bytecode() {
        assert!(Artifact::parse("IERC20", r#"{"bytecode": "0x"}"#).is_err());
        assert!(Artifact::parse("IERC20", r#"{"abi": []}"#).is_err());
    }

    #[test]
    fn appends_constructor_arguments() {
        let artifact = Artifact::parse("A", r#"{"bytecode": "0x60"}"#).unwrap();
        assert_eq!(artifact.deploy_code(&[0x01, 0x02]).to_vec(), vec![0x60, 0x01, 0x02]);
    }
}
