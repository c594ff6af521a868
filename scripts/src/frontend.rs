//! Hand-off of build artifacts, configuration and token list to the front end project.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::info;

use crate::{actions::Tokens, config::Config, errors::ScriptError};

/// Entry of the token list consumed by the front end
#[derive(Debug, Serialize)]
struct TokenListEntry {
    /// Logical token name
    name: String,
    /// Checksummed address
    address: String,
}

/// Replace `<front_end>/src/back_end_build` with the build directory, then write
/// `<front_end>/src/savvy-config.json` and `<front_end>/src/tokens.json`
pub fn update_front_end(
    build_dir: &Path,
    front_end_dir: &Path,
    config: &Config,
    tokens: &Tokens,
) -> Result<(), ScriptError> {
    let front_end_src = front_end_dir.join("src");

    copy_folder(build_dir, &front_end_src.join("back_end_build"))?;

    let config_json =
        serde_json::to_string(config).map_err(|e| ScriptError::FrontEnd(e.to_string()))?;
    write_file(&front_end_src.join("savvy-config.json"), &config_json)?;

    let token_list: Vec<TokenListEntry> = tokens
        .iter()
        .map(|(name, address)| TokenListEntry {
            name: name.clone(),
            address: address.to_checksum(None),
        })
        .collect();
    let token_list_json = serde_json::to_string_pretty(&token_list)
        .map_err(|e| ScriptError::FrontEnd(e.to_string()))?;
    write_file(&front_end_src.join("tokens.json"), &token_list_json)?;

    info!("Front end updated!");
    Ok(())
}

/// Copy `src` into `dest`, removing whatever `dest` held before
pub fn copy_folder(src: &Path, dest: &Path) -> Result<(), ScriptError> {
    if dest.exists() {
        fs::remove_dir_all(dest)
            .map_err(|e| ScriptError::FrontEnd(format!("{}: {}", dest.display(), e)))?;
    }
    copy_recursive(src, dest)
}

/// Copy `src` into `dest`, directories included
fn copy_recursive(src: &Path, dest: &Path) -> Result<(), ScriptError> {
    fs::create_dir_all(dest)
        .map_err(|e| ScriptError::FrontEnd(format!("{}: {}", dest.display(), e)))?;

    let entries =
        fs::read_dir(src).map_err(|e| ScriptError::FrontEnd(format!("{}: {}", src.display(), e)))?;
    for entry in entries {
        let entry = entry.map_err(|e| ScriptError::FrontEnd(e.to_string()))?;
        let path = entry.path();
        let target: PathBuf = dest.join(entry.file_name());
        if path.is_dir() {
            copy_recursive(&path, &target)?;
        } else {
            fs::copy(&path, &target)
                .map_err(|e| ScriptError::FrontEnd(format!("{}: {}", path.display(), e)))?;
        }
    }
    Ok(())
}

/// Write `content`, creating the parent directories
fn write_file(path: &Path, content: &str) -> Result<(), ScriptError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| ScriptError::FrontEnd(format!("{}: {}", parent.display(), e)))?;
    }
    fs::write(path, content).map_err(|e| ScriptError::FrontEnd(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use std::env;

    use alloy::primitives::Address;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("savvy-front-end-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn copy_replaces_the_destination() {
        let root = scratch_dir("copy");
        let build = root.join("build");
        fs::create_dir_all(build.join("contracts")).unwrap();
        fs::write(build.join("contracts/SavvyFinanceFarm.json"), "{}").unwrap();
        fs::write(build.join("deployments.json"), "{}").unwrap();

        let dest = root.join("dest");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("stale.json"), "old").unwrap();

        copy_folder(&build, &dest).unwrap();

        assert!(dest.join("contracts/SavvyFinanceFarm.json").exists());
        assert!(dest.join("deployments.json").exists());
        assert!(!dest.join("stale.json").exists());
    }

    #[test]
    fn writes_build_config_and_token_list() {
        let root = scratch_dir("update");
        let build = root.join("build");
        fs::create_dir_all(&build).unwrap();
        fs::write(build.join("deployments.json"), "{}").unwrap();
        let front_end = root.join("front_end");

        let config = Config::parse("[addresses]\nzero = \"0x0000000000000000000000000000000000000000\"\n").unwrap();
        let tokens: Tokens = vec![("svf".to_string(), Address::repeat_byte(0x11))];

        update_front_end(&build, &front_end, &config, &tokens).unwrap();

        let src = front_end.join("src");
        assert!(src.join("back_end_build/deployments.json").exists());

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(src.join("savvy-config.json")).unwrap()).unwrap();
        assert_eq!(
            written["addresses"]["zero"],
            "0x0000000000000000000000000000000000000000"
        );

        let token_list: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(src.join("tokens.json")).unwrap()).unwrap();
        assert_eq!(token_list[0]["name"], "svf");
        assert_eq!(
            token_list[0]["address"],
            Address::repeat_byte(0x11).to_checksum(None)
        );
    }

    #[test]
    fn missing_build_dir_fails() {
        let root = scratch_dir("missing");
        assert!(matches!(
            copy_folder(&root.join("nope"), &root.join("dest")),
            Err(ScriptError::FrontEnd(_))
        ));
    }
}
