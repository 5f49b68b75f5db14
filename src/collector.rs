//! Payment collection
//!
//! [`SimulationState`] is the mutable state a single simulation threads
//! through the trace walker: the netted [`StateChange`] plus the raw,
//! chronological list of payments.

use num_bigint::BigInt;

use crate::{
    state::StateChange,
    types::{Address, Payment, SimulationResult, TokenId},
};

/// Ordered log of observed transfers
///
/// No deduplication and no netting of opposite payments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payments(Vec<Payment>);

impl Payments {
    /// Appends one payment
    pub fn record(&mut self, from: Address, to: Address, token: TokenId, amount: BigInt) {
        self.0.push(Payment {
            from,
            to,
            token,
            amount,
        });
    }

    pub fn as_slice(&self) -> &[Payment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<Payment> {
        self.0
    }
}

/// State owned by one simulation run
#[derive(Debug, Clone, Default)]
pub struct SimulationState {
    pub state_change: StateChange,
    pub payments: Payments,
}

impl SimulationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves `amount` of `token` from `from` to `to`
    ///
    /// Debits the sender, credits the recipient and records the payment,
    /// so every recorded transfer nets to zero across the two parties.
    pub fn transfer(&mut self, from: Address, to: Address, token: TokenId, amount: BigInt) {
        self.state_change
            .apply_delta(from, token.clone(), &-amount.clone());
        self.state_change.apply_delta(to, token.clone(), &amount);
        self.payments.record(from, to, token, amount);
    }
}

impl From<SimulationState> for SimulationResult {
    fn from(state: SimulationState) -> Self {
        SimulationResult {
            state_change: state.state_change,
            payments: state.payments.into_vec(),
        }
    }
}
