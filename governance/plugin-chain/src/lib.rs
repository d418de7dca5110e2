#![deny(missing_docs)]
//! Voter weight plugin chain for spl-governance realms
//!
//! A realm's voting power is calculated by an ordered chain of plugins. Each plugin reads the
//! weight produced by its predecessor and may pass it through, rescale it or veto it.
//! The crate derives the plugin account addresses, walks the predecessor links stored in the
//! plugin Registrars, reduces the weight over the chain and assembles the plugin instructions

pub mod address;
pub mod chain;
pub mod client;
pub mod config;
pub mod error;
pub mod instruction;
pub mod plugins;
pub mod realm;
pub mod registrar;
pub mod registry;
pub mod weight;

// Export current sdk types for downstream users building with a different sdk version
pub use solana_program;
