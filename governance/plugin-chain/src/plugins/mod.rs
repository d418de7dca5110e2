//! Built-in plugin adapters

pub mod gateway;
pub mod on_chain;
