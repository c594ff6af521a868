//! Contract deployment: artifacts, history, source publishing and the per-contract routines.

/// Compiled contract artifacts
pub mod artifacts;
/// Generic deployment with history and publishing
#[allow(clippy::module_inception)]
pub mod deploy;
/// Deployed addresses, per network
pub mod history;
/// Local mocks of the external services
pub mod mocks;
/// Savvy Finance contracts
pub mod savvy;
/// Source publishing on block explorers
pub mod verify;
