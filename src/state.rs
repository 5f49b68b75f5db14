//! Net balance aggregation
//!
//! [`StateChange`] accumulates signed balance deltas keyed by address and
//! token. Amounts are arbitrary-precision so sums of 256-bit values can
//! never wrap. An entry that nets out to zero is kept with value `0`.

use std::collections::BTreeMap;

use num_bigint::BigInt;
use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::types::{Address, TokenId};

/// Balance changes of a single address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressState {
    /// Net delta per token
    #[serde(serialize_with = "serialize_balances")]
    pub token_balance_state: BTreeMap<TokenId, BigInt>,
}

/// Net balance changes of every touched address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StateChange(BTreeMap<Address, AddressState>);

impl StateChange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `delta` to the balance of `token` held by `address`
    ///
    /// The entry is created at zero on first touch.
    pub fn apply_delta(&mut self, address: Address, token: TokenId, delta: &BigInt) {
        let balance = self
            .0
            .entry(address)
            .or_default()
            .token_balance_state
            .entry(token)
            .or_default();
        *balance += delta;
    }

    /// Net delta of `token` for `address`, if it was ever touched
    pub fn get(&self, address: &Address, token: &TokenId) -> Option<&BigInt> {
        self.0.get(address)?.token_balance_state.get(token)
    }

    /// All token deltas of one address
    pub fn address_state(&self, address: &Address) -> Option<&AddressState> {
        self.0.get(address)
    }

    /// Iterates over every `(address, token, delta)` entry in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &TokenId, &BigInt)> {
        self.0.iter().flat_map(|(address, state)| {
            state
                .token_balance_state
                .iter()
                .map(move |(token, delta)| (address, token, delta))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of touched addresses
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

fn serialize_balances<S: Serializer>(
    balances: &BTreeMap<TokenId, BigInt>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(balances.len()))?;
    for (token, delta) in balances {
        map.serialize_entry(token, &delta.to_string())?;
    }
    map.end()
}
