#![deny(missing_docs)]
//! Governance tools shared by the governance client crates

pub mod account;
pub mod error;
