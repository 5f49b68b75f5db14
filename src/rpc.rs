//! Trace source backed by a JSON-RPC node
//!
//! Supports both trace flavours exposed by execution clients:
//! - `debug_traceCall` with the `callTracer` (geth, reth, erigon, ...)
//! - `trace_call` with the `trace` type (parity/OpenEthereum style)
//!
//! Both are sent through alloy's raw request path so the crate controls the
//! exact parameter shapes.

use alloy::{
    network::AnyNetwork,
    providers::{DynProvider, Provider, ProviderBuilder, WsConnect},
};
use async_trait::async_trait;
use tracing::debug;

use crate::{
    config::TraceMethod,
    errors::{InitError, TraceError},
    parity::{build_call_tree, ParityTraceResults},
    simulator::TraceCallRequest,
    traits::TraceSource,
    types::CallTrace,
};

/// Type-erased provider over any EVM network
pub type AnyNetworkProvider = DynProvider<AnyNetwork>;

/// Connects to `rpc_url`, over HTTP(S) or WebSocket depending on its scheme
pub async fn get_provider(rpc_url: &str) -> Result<AnyNetworkProvider, InitError> {
    let provider = if rpc_url.starts_with("http") {
        let url = rpc_url
            .parse()
            .map_err(|_| InitError::InvalidRpcUrl(rpc_url.to_string()))?;
        ProviderBuilder::new()
            .network::<AnyNetwork>()
            .connect_http(url)
            .erased()
    } else {
        let ws_connect = WsConnect::new(rpc_url);
        ProviderBuilder::new()
            .network::<AnyNetwork>()
            .connect_ws(ws_connect)
            .await
            .map_err(|e| InitError::WsConnection(e.to_string()))?
            .erased()
    };
    Ok(provider)
}

/// [`TraceSource`] issuing one trace RPC per request
#[derive(Clone)]
pub struct RpcTraceSource<P = AnyNetworkProvider> {
    provider: P,
    method: TraceMethod,
}

impl<P> RpcTraceSource<P>
where
    P: Provider<AnyNetwork>,
{
    pub fn new(provider: P, method: TraceMethod) -> Self {
        Self { provider, method }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn method(&self) -> TraceMethod {
        self.method
    }
}

impl RpcTraceSource {
    /// Connects to `rpc_url` and traces with `method`
    pub async fn connect(rpc_url: &str, method: TraceMethod) -> Result<Self, InitError> {
        Ok(Self::new(get_provider(rpc_url).await?, method))
    }
}

#[async_trait]
impl<P> TraceSource for RpcTraceSource<P>
where
    P: Provider<AnyNetwork> + Send + Sync,
{
    async fn trace_call(&self, request: &TraceCallRequest) -> Result<CallTrace, TraceError> {
        match self.method {
            TraceMethod::DebugTraceCall => {
                debug!(block = %request.block, "debug_traceCall");
                let params = (
                    request.tx.clone(),
                    request.block.clone(),
                    request.options.clone(),
                );
                self.provider
                    .raw_request::<_, CallTrace>("debug_traceCall".into(), params)
                    .await
                    .map_err(|e| TraceError::Transport(e.to_string()))
            }
            TraceMethod::TraceCall => {
                debug!(block = %request.block, "trace_call");
                let params = (
                    request.tx.clone(),
                    vec!["trace".to_string()],
                    request.block.clone(),
                );
                let results = self
                    .provider
                    .raw_request::<_, ParityTraceResults>("trace_call".into(), params)
                    .await
                    .map_err(|e| TraceError::Transport(e.to_string()))?;
                build_call_tree(results.trace)
            }
        }
    }
}
