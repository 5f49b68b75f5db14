//! # Trace-based Transaction Simulator
//!
//! Previews what an EVM transaction will do before it is broadcast. The node
//! is asked for a call trace of the transaction, and the trace is reduced
//! into:
//!
//! - **Net balance changes** per address and token ([`StateChange`])
//! - **Itemized payments** in execution order ([`Payment`])
//!
//! ## Core Features
//!
//! - **Trace Reduction**
//!   - Pre-order walk of the call tree, in execution order
//!   - Reverted sub-calls and everything below them are ignored
//!   - Arbitrary-precision balance arithmetic
//!
//! - **Asset Tracking**
//!   - Native value transfers
//!   - ERC20 `transfer` / `transferFrom`
//!   - ERC721 `transferFrom` / `safeTransferFrom`
//!   - ERC1155 single and batch transfers
//!
//! - **Trace Sources**
//!   - `debug_traceCall` with the `callTracer`
//!   - parity `trace_call`
//!   - Any custom [`TraceSource`]
//!
//! ## Features
//!
//! - `rustls-tls`: Uses rustls as the TLS implementation instead of native-tls (OpenSSL).
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use trace_simulator::{simulate_tx, RpcTraceSource, SimulationTx, TokenId};
//! use trace_simulator::config::TraceMethod;
//! use alloy::primitives::{address, Bytes, U256};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let source = RpcTraceSource::connect(
//!     "https://eth-mainnet.g.alchemy.com/v2/your-api-key",
//!     TraceMethod::DebugTraceCall,
//! ).await?;
//!
//! let tx = SimulationTx {
//!     from: address!("C255fC198eEdAC7AF8aF0f6e0ca781794B094A61"),
//!     to: address!("d878229c9c3575F224784DE610911B5607a3ad15"),
//!     data: Bytes::new(),
//!     value: U256::from(120000000000000000u64), // 0.12 ETH
//! };
//!
//! let result = simulate_tx(&tx, &source).await?;
//! for (address, token, delta) in result.state_change.iter() {
//!     println!("{address}: {token} {delta}");
//! }
//! for payment in &result.payments {
//!     println!("{} -> {}: {} {}", payment.from, payment.to, payment.amount, payment.token);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - `simulator`: Entry points and trace request construction
//! - `walker`: Call tree traversal
//! - `handlers`: Selector-keyed decoders and their registry
//! - `state` / `collector`: Balance aggregation and payment collection
//! - `rpc` / `parity`: Node-backed trace sources
//! - `types`, `traits`, `errors`, `config`, `utils`

pub mod collector;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod parity;
pub mod rpc;
pub mod simulator;
pub mod state;
pub mod traits;
pub mod types;
pub mod utils;
pub mod walker;

// Re-export only the essential types and functions
pub use errors::SimulationError;
pub use rpc::RpcTraceSource;
pub use simulator::{simulate_trace, simulate_tx, Simulator};
pub use state::StateChange;
pub use traits::TraceSource;
pub use types::{CallTrace, Payment, SimulationResult, SimulationTx, TokenId};
