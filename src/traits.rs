//! Trait seams of the simulator
//!
//! # Key Traits
//! - `TraceSource`: anything able to answer a trace request with a call tree

use async_trait::async_trait;

use crate::{errors::TraceError, simulator::TraceCallRequest, types::CallTrace};

/// Provider of call traces for unbroadcast transactions
///
/// Implementors perform exactly one request per call and return the fully
/// materialized tree. Retries, timeouts and authentication are their own
/// concern.
#[async_trait]
pub trait TraceSource: Send + Sync {
    /// Traces `request` against the state named by its block tag
    async fn trace_call(&self, request: &TraceCallRequest) -> Result<CallTrace, TraceError>;
}

#[async_trait]
impl<T: TraceSource + ?Sized> TraceSource for &T {
    async fn trace_call(&self, request: &TraceCallRequest) -> Result<CallTrace, TraceError> {
        (**self).trace_call(request).await
    }
}
