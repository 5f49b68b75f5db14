//! Parity-style flat traces
//!
//! `trace_call` answers with a flat list of frames, each locating itself in
//! the call tree through its `traceAddress` (the child index at every
//! level). Frames arrive in pre-order, so the tree can be rebuilt in one
//! pass by appending each frame to the parent its address names.

use serde::Deserialize;

use crate::{
    errors::TraceError,
    types::{Address, Bytes, CallKind, CallTrace, U256},
};

/// `action` object of a parity trace entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParityAction {
    #[serde(default)]
    pub from: Address,
    #[serde(default)]
    pub call_type: Option<String>,
    #[serde(default)]
    pub to: Option<Address>,
    #[serde(default)]
    pub input: Bytes,
    /// Init code of creations
    #[serde(default)]
    pub init: Option<Bytes>,
    #[serde(default)]
    pub value: Option<U256>,
}

/// `result` object of a parity trace entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParityResult {
    #[serde(default)]
    pub output: Bytes,
    /// Address of a created contract
    #[serde(default)]
    pub address: Option<Address>,
}

/// One entry of a flat parity trace
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParityTrace {
    pub action: ParityAction,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub result: Option<ParityResult>,
    #[serde(default)]
    pub trace_address: Vec<usize>,
    #[serde(default, rename = "type")]
    pub trace_type: Option<String>,
}

/// Response of `trace_call` with the `trace` type requested
#[derive(Debug, Clone, Deserialize)]
pub struct ParityTraceResults {
    #[serde(default)]
    pub trace: Vec<ParityTrace>,
}

impl ParityTrace {
    fn kind(&self) -> CallKind {
        match self.trace_type.as_deref() {
            Some("call") | None => match self.action.call_type.as_deref() {
                Some("call") | None => CallKind::Call,
                Some("staticcall") => CallKind::StaticCall,
                Some("delegatecall") => CallKind::DelegateCall,
                Some("callcode") => CallKind::CallCode,
                Some(_) => CallKind::Unknown,
            },
            Some("create") => CallKind::Create,
            Some("suicide") => CallKind::SelfDestruct,
            Some(_) => CallKind::Unknown,
        }
    }

    /// Converts the entry into a childless frame
    fn into_frame(self) -> CallTrace {
        let kind = self.kind();
        let result = self.result.unwrap_or_default();
        CallTrace {
            kind,
            from: self.action.from,
            to: self.action.to.or(result.address),
            input: self.action.init.unwrap_or(self.action.input),
            output: result.output,
            value: self.action.value,
            error: self.error,
            revert_reason: None,
            calls: Vec::new(),
            logs: Vec::new(),
        }
    }
}

/// Rebuilds the call tree from flat parity traces
///
/// # Errors
/// * `TraceError::EmptyTrace` - No entries at all
/// * `TraceError::MalformedTrace` - The first entry is not the root, or an
///   address names a missing parent or skips a child index
pub fn build_call_tree(traces: Vec<ParityTrace>) -> Result<CallTrace, TraceError> {
    let mut entries = traces.into_iter();
    let root = entries.next().ok_or(TraceError::EmptyTrace)?;
    if !root.trace_address.is_empty() {
        return Err(TraceError::MalformedTrace {
            trace_address: root.trace_address,
            reason: "first entry is not the root".to_string(),
        });
    }
    let mut tree = root.into_frame();

    for mut entry in entries {
        let trace_address = std::mem::take(&mut entry.trace_address);
        let malformed = |reason: &str| TraceError::MalformedTrace {
            trace_address: trace_address.clone(),
            reason: reason.to_string(),
        };

        let (&index, parents) = trace_address
            .split_last()
            .ok_or_else(|| malformed("second root entry"))?;
        let mut parent = &mut tree;
        for &step in parents {
            parent = parent
                .calls
                .get_mut(step)
                .ok_or_else(|| malformed("parent frame missing"))?;
        }
        if index != parent.calls.len() {
            return Err(malformed("child index out of order"));
        }
        parent.calls.push(entry.into_frame());
    }

    Ok(tree)
}
