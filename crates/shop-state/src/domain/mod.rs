//! # Domain Layer - Listing Book
//!
//! ## Components
//!
//! - `shop`: `ShopState`, the dual-indexed listing book and its canonical
//!   serialization
//! - `errors`: `ShopError` enumeration

pub mod errors;
pub mod shop;

pub use errors::*;
pub use shop::*;
