//! # shop-state
//!
//! Marketplace listing book for the market ledger.
//!
//! ## Role in System
//!
//! - **Single Source of Truth**: authoritative set of items currently
//!   offered for sale, indexed by seller and by product id
//! - **Unit of Serialization**: the book is a ledger-addressed singleton;
//!   the outer state store persists it as one canonical value
//! - **Synchronous Core**: no threads or suspension points of its own; the
//!   deterministic transition engine calls it one operation at a time and
//!   owns rollback on transaction failure
//!
//! ## Consistency
//!
//! Both indexes are mutated only behind the `register`/`unregister`
//! boundary, so the cross-index invariants can only be broken by a bug in
//! that one boundary, never by external callers.

pub mod domain;
pub mod ports;

pub use domain::*;
pub use ports::*;
