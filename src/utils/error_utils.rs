//! Revert reason extraction for failed call frames
//!
//! A reverted frame may carry its reason in two places:
//! - ABI-encoded in `output` (`Error(string)` or `Panic(uint256)`)
//! - Pre-decoded by the node in `revertReason`
//!
//! The output bytes are preferred since they are what the contract returned.

use alloy::sol_types::decode_revert_reason;

use crate::types::CallTrace;

/// Best-effort human readable reason for a reverted frame
///
/// # Returns
/// * `Some(String)` - Decoded reason from the output, or the node's own decoding
/// * `None` - The frame carried no recognizable reason
pub fn revert_reason(trace: &CallTrace) -> Option<String> {
    parse_revert_output(&trace.output).or_else(|| trace.revert_reason.clone())
}

/// Decodes revert data returned by a failed call
///
/// Empty output (a bare `revert()`) has no reason.
pub fn parse_revert_output(output: &[u8]) -> Option<String> {
    if output.is_empty() {
        return None;
    }
    decode_revert_reason(output)
}
