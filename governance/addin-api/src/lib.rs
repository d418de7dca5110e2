#![deny(missing_docs)]
//! Governance voter weight addin (plugin) interface

pub mod max_voter_weight;
pub mod registrar;
pub mod voter_weight;
