//! Utility modules for trace reduction
//!
//! This module collection provides helpers for:
//! - **Quantities**: canonical hex quantities and big-integer conversion
//! - **Error handling**: revert reason extraction from failed frames

pub mod error_utils;
pub mod quantity_utils;

pub use quantity_utils::{serialize_bigint, to_bigint, to_quantity};
