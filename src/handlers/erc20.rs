//! ERC20 transfer decoding
//!
//! `transferFrom(address,address,uint256)` has the same selector for ERC20
//! and ERC721. The frame is treated as an NFT transfer when the target
//! emitted a four-topic `Transfer` event for the decoded id, otherwise it
//! is a fungible transfer of the decoded amount.

use alloy::{
    primitives::{keccak256, Address, B256, U256},
    sol,
    sol_types::SolCall,
};
use num_bigint::BigInt;
use once_cell::sync::Lazy;

use crate::{
    collector::SimulationState,
    errors::DecodeError,
    types::{CallKind, CallTrace, TokenId},
    utils::to_bigint,
};

sol! {
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
    }
}

/// keccak256("Transfer(address,address,uint256)"), shared by ERC20 and ERC721
pub static TRANSFER_EVENT_SIGNATURE: Lazy<B256> =
    Lazy::new(|| keccak256(b"Transfer(address,address,uint256)"));

/// `transfer(to, amount)`: the caller pays
pub fn handle_transfer(state: &mut SimulationState, trace: &CallTrace) -> Result<(), DecodeError> {
    let token = trace.to.ok_or(DecodeError::MissingTarget)?;
    let call = IERC20::transferCall::abi_decode(&trace.input)?;
    if call.amount.is_zero() {
        return Ok(());
    }
    state.transfer(trace.from, call.to, TokenId::Erc20(token), to_bigint(call.amount));
    Ok(())
}

/// `transferFrom(from, to, amount_or_id)`
pub fn handle_transfer_from(
    state: &mut SimulationState,
    trace: &CallTrace,
) -> Result<(), DecodeError> {
    let token = trace.to.ok_or(DecodeError::MissingTarget)?;
    let call = IERC20::transferFromCall::abi_decode(&trace.input)?;
    if emitted_nft_transfer(trace, token, call.amount) {
        state.transfer(
            call.from,
            call.to,
            TokenId::Erc721(token, call.amount),
            BigInt::from(1),
        );
    } else if !call.amount.is_zero() {
        state.transfer(call.from, call.to, TokenId::Erc20(token), to_bigint(call.amount));
    }
    Ok(())
}

/// Check if `token` logged an ERC721 `Transfer` for `id` within this frame
///
/// Proxied collections emit from the implementation's delegate frame, so
/// successful `DELEGATECALL`/`CALLCODE` sub-frames count as the same frame.
fn emitted_nft_transfer(trace: &CallTrace, token: Address, id: U256) -> bool {
    let own_log = trace.logs.iter().any(|log| {
        log.address == token
            && log.topics.len() == 4
            && log.topics[0] == *TRANSFER_EVENT_SIGNATURE
            && U256::from_be_slice(log.topics[3].as_slice()) == id
    });
    own_log
        || trace
            .calls
            .iter()
            .filter(|call| {
                matches!(call.kind, CallKind::DelegateCall | CallKind::CallCode)
                    && !call.is_reverted()
            })
            .any(|call| emitted_nft_transfer(call, token, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Bytes, TraceLog};

    use alloy::primitives::address;

    const HOLDER: Address = address!("1111111111111111111111111111111111111111");
    const SPENDER: Address = address!("2222222222222222222222222222222222222222");
    const RECIPIENT: Address = address!("3333333333333333333333333333333333333333");
    const TOKEN: Address = address!("4444444444444444444444444444444444444444");

    fn frame(from: Address, input: Vec<u8>) -> CallTrace {
        CallTrace::call(from, TOKEN, Bytes::from(input), U256::ZERO)
    }

    fn topic(address: Address) -> B256 {
        address.into_word()
    }

    #[test]
    fn test_transfer_debits_caller() {
        let input = IERC20::transferCall {
            to: RECIPIENT,
            amount: U256::from(1_000_000_000_000_000_000u128),
        }
        .abi_encode();
        let mut state = SimulationState::new();

        handle_transfer(&mut state, &frame(HOLDER, input)).unwrap();

        let token = TokenId::Erc20(TOKEN);
        let amount: BigInt = "1000000000000000000".parse().unwrap();
        assert_eq!(state.state_change.get(&HOLDER, &token), Some(&-amount.clone()));
        assert_eq!(state.state_change.get(&RECIPIENT, &token), Some(&amount));
        assert_eq!(state.payments.as_slice()[0].from, HOLDER);
    }

    #[test]
    fn test_transfer_from_debits_owner_not_spender() {
        let input = IERC20::transferFromCall {
            from: HOLDER,
            to: RECIPIENT,
            amount: U256::from(500u64),
        }
        .abi_encode();
        let mut state = SimulationState::new();

        handle_transfer_from(&mut state, &frame(SPENDER, input)).unwrap();

        let token = TokenId::Erc20(TOKEN);
        assert_eq!(state.state_change.get(&HOLDER, &token), Some(&BigInt::from(-500)));
        assert_eq!(state.state_change.get(&RECIPIENT, &token), Some(&BigInt::from(500)));
        assert!(state.state_change.address_state(&SPENDER).is_none());
    }

    #[test]
    fn test_transfer_from_with_nft_log_is_erc721() {
        let id = U256::from(1234u64);
        let input = IERC20::transferFromCall {
            from: HOLDER,
            to: RECIPIENT,
            amount: id,
        }
        .abi_encode();
        let mut trace = frame(HOLDER, input);
        trace.logs.push(TraceLog {
            address: TOKEN,
            topics: vec![
                *TRANSFER_EVENT_SIGNATURE,
                topic(HOLDER),
                topic(RECIPIENT),
                B256::from(id.to_be_bytes::<32>()),
            ],
            data: Bytes::new(),
        });
        let mut state = SimulationState::new();

        handle_transfer_from(&mut state, &trace).unwrap();

        let nft = TokenId::Erc721(TOKEN, id);
        assert_eq!(state.state_change.get(&HOLDER, &nft), Some(&BigInt::from(-1)));
        assert_eq!(state.state_change.get(&RECIPIENT, &nft), Some(&BigInt::from(1)));
        assert!(state.state_change.get(&HOLDER, &TokenId::Erc20(TOKEN)).is_none());
    }

    fn nft_transfer_log(from: Address, to: Address, id: U256) -> TraceLog {
        TraceLog {
            address: TOKEN,
            topics: vec![
                *TRANSFER_EVENT_SIGNATURE,
                topic(from),
                topic(to),
                B256::from(id.to_be_bytes::<32>()),
            ],
            data: Bytes::new(),
        }
    }

    fn delegate_to_implementation(log: TraceLog) -> CallTrace {
        let mut implementation = CallTrace::call(
            TOKEN,
            address!("5555555555555555555555555555555555555555"),
            Bytes::new(),
            U256::ZERO,
        );
        implementation.kind = CallKind::DelegateCall;
        implementation.logs.push(log);
        implementation
    }

    #[test]
    fn test_transfer_from_proxied_nft_is_erc721() {
        let id = U256::from(8817u64);
        let input = IERC20::transferFromCall {
            from: HOLDER,
            to: RECIPIENT,
            amount: id,
        }
        .abi_encode();
        let mut trace = frame(HOLDER, input);
        trace
            .calls
            .push(delegate_to_implementation(nft_transfer_log(HOLDER, RECIPIENT, id)));
        let mut state = SimulationState::new();

        handle_transfer_from(&mut state, &trace).unwrap();

        let nft = TokenId::Erc721(TOKEN, id);
        assert_eq!(state.state_change.get(&RECIPIENT, &nft), Some(&BigInt::from(1)));
        assert_eq!(state.state_change.get(&HOLDER, &nft), Some(&BigInt::from(-1)));
        assert_eq!(state.payments.len(), 1);
        assert_eq!(state.payments.as_slice()[0].token, nft);
    }

    #[test]
    fn test_transfer_from_ignores_reverted_delegate_logs() {
        let id = U256::from(8817u64);
        let input = IERC20::transferFromCall {
            from: HOLDER,
            to: RECIPIENT,
            amount: id,
        }
        .abi_encode();
        let mut trace = frame(HOLDER, input);
        let mut failed = delegate_to_implementation(nft_transfer_log(HOLDER, RECIPIENT, id));
        failed.error = Some("execution reverted".to_string());
        trace.calls.push(failed);
        let mut state = SimulationState::new();

        handle_transfer_from(&mut state, &trace).unwrap();

        assert!(state.state_change.get(&RECIPIENT, &TokenId::Erc721(TOKEN, id)).is_none());
        assert_eq!(
            state.state_change.get(&RECIPIENT, &TokenId::Erc20(TOKEN)),
            Some(&BigInt::from(8817))
        );
    }

    #[test]
    fn test_malformed_input_records_nothing() {
        let mut input = IERC20::transferCall::SELECTOR.to_vec();
        input.extend_from_slice(&[0u8; 10]);
        let mut state = SimulationState::new();

        assert!(handle_transfer(&mut state, &frame(HOLDER, input)).is_err());
        assert!(state.state_change.is_empty());
        assert!(state.payments.is_empty());
    }

    #[test]
    fn test_zero_amount_records_nothing() {
        let input = IERC20::transferCall {
            to: RECIPIENT,
            amount: U256::ZERO,
        }
        .abi_encode();
        let mut state = SimulationState::new();

        handle_transfer(&mut state, &frame(HOLDER, input)).unwrap();
        assert!(state.payments.is_empty());
    }
}
