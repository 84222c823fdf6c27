//! # Market-Ledger Test Suite
//!
//! Unified test crate covering cross-crate behavior:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── shop_flows.rs         # Register/unregister/lookup scenarios
//!     └── snapshot_roundtrip.rs # Canonical serialization properties
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p market-tests
//! ```

pub mod integration;
