//! Cross-crate integration tests.

pub mod shop_flows;
pub mod snapshot_roundtrip;
