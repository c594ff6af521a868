//! Contract bindings and the client used to read and send transactions.

pub mod abi;
/// RPC provider with its signer
pub mod client;
/// Read only calls
pub mod reader;
/// Transaction sending
pub mod sender;
