//! Shared models for `lanprobe`: configuration, error types and the network
//! primitives (addresses, subnets, interfaces) the scanner is built on.

pub mod config;
pub mod error;
pub mod network;
