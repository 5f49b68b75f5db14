//! Simulation entry points
//!
//! A simulation issues one `debug_traceCall` request with the `callTracer`
//! against the latest block, rejects a reverted root call, and reduces the
//! returned tree into a [`SimulationResult`].
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use trace_simulator::{
//!     config::SimulatorConfig,
//!     simulator::Simulator,
//!     types::{SimulationTx, TokenId},
//! };
//! use alloy::primitives::{address, Bytes, U256};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = SimulatorConfig::new("https://eth.llamarpc.com");
//! let simulator = Simulator::from_config(&config).await?;
//!
//! let sender = address!("C255fC198eEdAC7AF8aF0f6e0ca781794B094A61");
//! let result = simulator
//!     .simulate(&SimulationTx {
//!         from: sender,
//!         to: address!("d878229c9c3575F224784DE610911B5607a3ad15"),
//!         data: Bytes::new(),
//!         value: U256::from(120000000000000000u64),
//!     })
//!     .await?;
//!
//! println!("ETH delta: {:?}", result.state_change.get(&sender, &TokenId::Native));
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use tracing::{info, warn};

use crate::{
    collector::SimulationState,
    config::SimulatorConfig,
    errors::SimulationError,
    handlers::{default_registry, HandlerRegistry},
    rpc::RpcTraceSource,
    traits::TraceSource,
    types::{Address, Bytes, CallTrace, SimulationResult, SimulationTx},
    utils::{error_utils::revert_reason, to_quantity},
    walker::walk,
};

/// Block tag every trace request is evaluated against
pub const LATEST_BLOCK: &str = "latest";

/// Name of the geth built-in tracer producing call trees
pub const CALL_TRACER: &str = "callTracer";

/// Transaction object sent with a trace request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceCallTx {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    /// Canonical hex quantity, e.g. `0x0`
    pub value: String,
}

/// `tracerConfig` options of the call tracer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallTracerConfig {
    pub with_log: bool,
}

/// Tracer selection sent with a trace request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TracerOptions {
    pub tracer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracer_config: Option<CallTracerConfig>,
}

/// Everything a [`TraceSource`] needs to trace one transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceCallRequest {
    pub tx: TraceCallTx,
    pub block: String,
    pub options: TracerOptions,
}

impl TraceCallRequest {
    /// Builds a `callTracer` request for `tx` at the latest block
    pub fn new(tx: &SimulationTx) -> Self {
        Self {
            tx: TraceCallTx {
                from: tx.from,
                to: tx.to,
                data: tx.data.clone(),
                value: to_quantity(tx.value),
            },
            block: LATEST_BLOCK.to_string(),
            options: TracerOptions {
                tracer: CALL_TRACER.to_string(),
                tracer_config: None,
            },
        }
    }

    /// Asks the tracer to attach emitted logs to each frame
    pub fn with_logs(mut self, with_logs: bool) -> Self {
        self.options.tracer_config = with_logs.then_some(CallTracerConfig { with_log: true });
        self
    }
}

/// Simulates `tx` with one trace request to `source`
///
/// Frames are requested with their logs attached, which ERC721
/// `transferFrom` classification depends on.
///
/// # Returns
/// * `Ok(SimulationResult)` - Net balance changes and itemized payments
/// * `Err(SimulationError::ExecutionReverted)` - The transaction itself reverted
/// * `Err(SimulationError::Trace)` - The trace could not be obtained
pub async fn simulate_tx<S>(
    tx: &SimulationTx,
    source: &S,
) -> Result<SimulationResult, SimulationError>
where
    S: TraceSource + ?Sized,
{
    simulate_request(&TraceCallRequest::new(tx).with_logs(true), source).await
}

/// Simulates an already built request
pub async fn simulate_request<S>(
    request: &TraceCallRequest,
    source: &S,
) -> Result<SimulationResult, SimulationError>
where
    S: TraceSource + ?Sized,
{
    info!(
        from = %request.tx.from,
        to = %request.tx.to,
        value = %request.tx.value,
        "requesting call trace"
    );
    let trace = source.trace_call(request).await?;
    simulate_trace(&trace)
}

/// Reduces a trace with the default handler registry
pub fn simulate_trace(trace: &CallTrace) -> Result<SimulationResult, SimulationError> {
    simulate_trace_with(default_registry(), trace)
}

/// Reduces a trace with a caller-supplied registry
///
/// Fails without any partial result when the root frame reverted.
pub fn simulate_trace_with(
    registry: &HandlerRegistry,
    trace: &CallTrace,
) -> Result<SimulationResult, SimulationError> {
    if let Some(error) = &trace.error {
        let reason = revert_reason(trace);
        warn!(%error, reason = ?reason, "transaction reverted");
        return Err(SimulationError::ExecutionReverted {
            error: error.clone(),
            reason,
        });
    }

    let mut state = SimulationState::new();
    walk(registry, &mut state, trace);
    Ok(state.into())
}

/// Trace source bundled with request options
#[derive(Debug, Clone)]
pub struct Simulator<S> {
    source: S,
    with_logs: bool,
}

impl<S: TraceSource> Simulator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            with_logs: true,
        }
    }

    /// Requests per-frame logs, needed to tell ERC721 from ERC20 `transferFrom`
    ///
    /// Enabled by default.
    pub fn with_logs(mut self, with_logs: bool) -> Self {
        self.with_logs = with_logs;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Simulates one transaction
    pub async fn simulate(&self, tx: &SimulationTx) -> Result<SimulationResult, SimulationError> {
        let request = TraceCallRequest::new(tx).with_logs(self.with_logs);
        simulate_request(&request, &self.source).await
    }
}

impl Simulator<RpcTraceSource> {
    /// Connects to the configured node
    pub async fn from_config(config: &SimulatorConfig) -> Result<Self, SimulationError> {
        let source = RpcTraceSource::connect(&config.rpc_url, config.method).await?;
        Ok(Self::new(source).with_logs(config.with_logs))
    }
}
