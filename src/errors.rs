//! Error types for trace-based transaction simulation
//!
//! This module defines the error hierarchy used across the crate:
//! - Simulation errors surfaced to callers of the entry point
//! - Trace acquisition and trace shape errors
//! - Trace source initialization errors
//! - Handler decode errors, which never leave the trace walker

use thiserror::Error;

/// Top-level error type returned by [`crate::simulator::simulate_tx`]
///
/// A reverted sub-call is never an error; only a failure of the root call
/// (or of the trace request itself) is surfaced.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The root call of the simulated transaction reverted
    ///
    /// # Fields
    /// * `error` - Error string reported by the node (e.g. "execution reverted")
    /// * `reason` - Decoded revert reason, when the output carried one
    #[error("Execution reverted: {error}{}", reason.as_ref().map(|r| format!(" ({r})")).unwrap_or_default())]
    ExecutionReverted {
        error: String,
        reason: Option<String>,
    },

    /// The trace could not be obtained or understood
    #[error("Trace request failed: {0}")]
    Trace(#[from] TraceError),

    /// The trace source could not be set up
    #[error("Failed to initialize trace source: {0}")]
    Init(#[from] InitError),
}

/// Errors produced while fetching or assembling a call trace
#[derive(Debug, Error)]
pub enum TraceError {
    /// Transport-level or RPC-level failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The node returned no trace entries at all
    #[error("Node returned an empty trace")]
    EmptyTrace,

    /// Flat traces whose addresses do not describe a valid tree
    #[error("Malformed trace at {trace_address:?}: {reason}")]
    MalformedTrace {
        trace_address: Vec<usize>,
        reason: String,
    },
}

/// Initialization-specific errors
///
/// These occur while building a trace source from configuration,
/// typically related to connectivity and settings.
#[derive(Debug, Error)]
pub enum InitError {
    /// Invalid or malformed RPC URL
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    /// WebSocket connection establishment errors
    #[error("WebSocket connection failed: {0}")]
    WsConnection(String),

    /// No RPC URL was configured
    #[error("RPC_URL is not set")]
    MissingRpcUrl,

    /// A configuration value could not be parsed
    #[error("Invalid value {value:?} for {key}")]
    InvalidSetting {
        key: &'static str,
        value: String,
    },
}

/// Failure of a handler to decode the call it was matched against
///
/// Absorbed by the walker: the node simply contributes no effect.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Call data does not match the expected ABI shape
    #[error("ABI decoding failed: {0}")]
    Abi(#[from] alloy::sol_types::Error),

    /// The call has no target address (e.g. a failed creation)
    #[error("Call has no target address")]
    MissingTarget,

    /// Batch transfer with differently sized id and amount arrays
    #[error("Batch transfer has {ids} ids but {amounts} amounts")]
    LengthMismatch {
        ids: usize,
        amounts: usize,
    },
}
