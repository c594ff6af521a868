//! Definitions of errors that can occur during the execution of the Savvy Finance scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the Savvy Finance scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error when reading or writing a json file (deployment history, artifacts)
    JsonOutputError(String),
    /// Error when creating the client or resolving the signing account
    ClientInitialization(String),
    /// Error when fetching the nonce to deploy a contract
    NonceFetching(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// Missing or malformed configuration value
    Config(String),
    /// A logical contract name that has no mock or configured address
    ContractNotFound {
        /// The logical contract name that was requested
        name: String,
        /// The network it was requested on
        network: String,
    },
    /// Error reading a compiled contract artifact
    Artifact(String),
    /// Error fetching or parsing a token price
    PriceFeed(String),
    /// Error publishing contract source to the block explorer
    Verification(String),
    /// Error syncing files into the front end project
    FrontEnd(String),
    /// Error converting between decimal and base-unit amounts
    Units(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::JsonOutputError(s) => write!(f, "error handling json file: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error during client init: {}", s),
            ScriptError::NonceFetching(s) => {
                write!(f, "error during nonce fetching for client signing: {}", s)
            }
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::Config(s) => write!(f, "configuration error: {}", s),
            ScriptError::ContractNotFound { name, network } => {
                write!(f, "contract {} not found for {} network", name, network)
            }
            ScriptError::Artifact(s) => write!(f, "error reading contract artifact: {}", s),
            ScriptError::PriceFeed(s) => write!(f, "error fetching token price: {}", s),
            ScriptError::Verification(s) => write!(f, "error verifying contract source: {}", s),
            ScriptError::FrontEnd(s) => write!(f, "error updating front end: {}", s),
            ScriptError::Units(s) => write!(f, "error converting units: {}", s),
        }
    }
}

impl Error for ScriptError {}
