//! Core types for trace-based simulation
//!
//! This module defines the data structures shared by the whole crate:
//! - The call trace tree returned by the node
//! - Token identifiers and discrete payments
//! - Transaction parameters and the final simulation result

use std::fmt;

pub use alloy::primitives::{Address, Bytes, B256, U256};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize, Serializer};

use crate::state::StateChange;

/// Default native token address (zero address)
pub const NATIVE_TOKEN_ADDRESS: Address = Address::ZERO;

/// Kind of frame in a call trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CallKind {
    Call,
    StaticCall,
    DelegateCall,
    CallCode,
    Create,
    Create2,
    SelfDestruct,
    /// Any frame type the node reports that this crate does not know about
    #[serde(other)]
    Unknown,
}

/// Log entry attached to a call frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceLog {
    /// Contract that emitted the log
    pub address: Address,
    /// Indexed topics, topic 0 being the event signature
    #[serde(default)]
    pub topics: Vec<B256>,
    /// ABI-encoded non-indexed data
    #[serde(default)]
    pub data: Bytes,
}

/// One frame of a `callTracer` trace
///
/// A frame with `error` set describes a reverted call. It stays in the tree,
/// but neither it nor any of its descendants may contribute effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallTrace {
    #[serde(rename = "type")]
    pub kind: CallKind,
    pub from: Address,
    /// Absent for creations that never produced an address
    #[serde(default)]
    pub to: Option<Address>,
    #[serde(default)]
    pub input: Bytes,
    #[serde(default)]
    pub output: Bytes,
    #[serde(default)]
    pub value: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revert_reason: Option<String>,
    /// Sub-calls in execution order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub calls: Vec<CallTrace>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<TraceLog>,
}

impl CallTrace {
    /// Creates a successful plain call frame with no sub-calls
    pub fn call(from: Address, to: Address, input: Bytes, value: U256) -> Self {
        Self {
            kind: CallKind::Call,
            from,
            to: Some(to),
            input,
            output: Bytes::new(),
            value: Some(value),
            error: None,
            revert_reason: None,
            calls: Vec::new(),
            logs: Vec::new(),
        }
    }

    /// Check if this frame reverted
    pub fn is_reverted(&self) -> bool {
        self.error.is_some()
    }

    /// Native value carried by the frame (zero when absent)
    pub fn value(&self) -> U256 {
        self.value.unwrap_or_default()
    }

    /// First four bytes of the input, if present
    pub fn selector(&self) -> Option<[u8; 4]> {
        self.input.get(..4)?.try_into().ok()
    }
}

/// Identifier of an asset whose balance can change
///
/// The canonical string form is one of:
/// - `native:<zero address>` for the chain's native currency
/// - `erc20:<token>`
/// - `erc721:<token>:<id>`
/// - `erc1155:<token>:<id>`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenId {
    Native,
    Erc20(Address),
    Erc721(Address, U256),
    Erc1155(Address, U256),
}

impl TokenId {
    /// Check if this identifier is the native currency
    pub fn is_native_token(&self) -> bool {
        matches!(self, TokenId::Native)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenId::Native => write!(f, "native:{:#x}", NATIVE_TOKEN_ADDRESS),
            TokenId::Erc20(token) => write!(f, "erc20:{:#x}", token),
            TokenId::Erc721(token, id) => write!(f, "erc721:{:#x}:{}", token, id),
            TokenId::Erc1155(token, id) => write!(f, "erc1155:{:#x}:{}", token, id),
        }
    }
}

impl Serialize for TokenId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Record of one transfer observed by a handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payment {
    pub from: Address,
    pub to: Address,
    pub token: TokenId,
    #[serde(serialize_with = "crate::utils::serialize_bigint")]
    pub amount: BigInt,
}

/// Transaction parameters for simulation
#[derive(Debug, Clone)]
pub struct SimulationTx {
    /// Transaction sender
    pub from: Address,
    /// Transaction target
    pub to: Address,
    /// Transaction input data
    pub data: Bytes,
    /// Native token value to send
    pub value: U256,
}

/// Outcome of one simulation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Net balance change per address and token
    pub state_change: StateChange,
    /// Every transfer in execution order
    pub payments: Vec<Payment>,
}

impl SimulationResult {
    /// Consumes the result, keeping only the netted state change
    pub fn into_state_change(self) -> StateChange {
        self.state_change
    }
}
