//! # Ports Layer - Listing Book
//!
//! - `inbound`: the driving API exposed to the transition engine

pub mod inbound;

pub use inbound::*;
