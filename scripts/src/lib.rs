//! Scripts for deploying, configuring and operating the Savvy Finance contracts.

#![deny(clippy::missing_docs_in_private_items)]

pub mod actions;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod errors;
pub mod frontend;
pub mod network;
pub mod price;
pub mod proxy;
pub mod registry;
pub mod reshape;
pub mod session;
pub mod staking;
pub mod units;

/// Our deploy utils
pub mod deploy;

// Our output utils
pub mod output_writer;

pub mod tx;
