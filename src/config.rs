//! Simulator configuration
//!
//! Settings can be built in code or read from the environment:
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `RPC_URL` | HTTP(S) or WebSocket endpoint of the node | required |
//! | `TRACE_METHOD` | `debug` (`debug_traceCall`) or `parity` (`trace_call`) | `debug` |
//! | `TRACE_WITH_LOGS` | attach emitted logs to each frame | `true` |

use std::{env, str::FromStr};

use crate::errors::InitError;

pub const RPC_URL_ENV: &str = "RPC_URL";
pub const TRACE_METHOD_ENV: &str = "TRACE_METHOD";
pub const TRACE_WITH_LOGS_ENV: &str = "TRACE_WITH_LOGS";

/// RPC method used to obtain the call trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceMethod {
    /// Geth-style `debug_traceCall` with the `callTracer`
    #[default]
    DebugTraceCall,
    /// Parity/OpenEthereum-style `trace_call` with the `trace` type
    TraceCall,
}

impl FromStr for TraceMethod {
    type Err = InitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" | "debug_tracecall" | "geth" => Ok(TraceMethod::DebugTraceCall),
            "parity" | "trace_call" | "openethereum" => Ok(TraceMethod::TraceCall),
            _ => Err(InitError::InvalidSetting {
                key: TRACE_METHOD_ENV,
                value: s.to_string(),
            }),
        }
    }
}

/// Connection and request settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// RPC endpoint URL
    pub rpc_url: String,
    /// Trace RPC flavour
    pub method: TraceMethod,
    /// Whether frames should carry their logs
    pub with_logs: bool,
}

impl SimulatorConfig {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            method: TraceMethod::default(),
            with_logs: true,
        }
    }

    /// Reads the configuration from process environment variables
    pub fn from_env() -> Result<Self, InitError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, InitError> {
        let rpc_url = lookup(RPC_URL_ENV)
            .filter(|url| !url.trim().is_empty())
            .ok_or(InitError::MissingRpcUrl)?;
        let mut config = Self::new(rpc_url.trim());

        if let Some(method) = lookup(TRACE_METHOD_ENV) {
            config.method = method.parse()?;
        }
        if let Some(flag) = lookup(TRACE_WITH_LOGS_ENV) {
            config.with_logs = parse_flag(TRACE_WITH_LOGS_ENV, &flag)?;
        }
        Ok(config)
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, InitError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(InitError::InvalidSetting {
            key,
            value: value.to_string(),
        }),
    }
}
