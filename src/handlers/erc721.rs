//! ERC721 `safeTransferFrom` decoding
//!
//! Each transfer moves exactly one unit of `erc721:<token>:<id>`.

use alloy::{sol, sol_types::SolCall};
use num_bigint::BigInt;

use crate::{
    collector::SimulationState,
    errors::DecodeError,
    types::{Address, CallTrace, TokenId, U256},
};

sol! {
    interface IERC721 {
        function safeTransferFrom(address from, address to, uint256 tokenId) external;
        function safeTransferFrom(address from, address to, uint256 tokenId, bytes data) external;
    }
}

/// `safeTransferFrom(from, to, tokenId)`
pub fn handle_safe_transfer(
    state: &mut SimulationState,
    trace: &CallTrace,
) -> Result<(), DecodeError> {
    let token = trace.to.ok_or(DecodeError::MissingTarget)?;
    let call = IERC721::safeTransferFrom_0Call::abi_decode(&trace.input)?;
    move_nft(state, token, call.from, call.to, call.tokenId);
    Ok(())
}

/// `safeTransferFrom(from, to, tokenId, data)`
pub fn handle_safe_transfer_with_data(
    state: &mut SimulationState,
    trace: &CallTrace,
) -> Result<(), DecodeError> {
    let token = trace.to.ok_or(DecodeError::MissingTarget)?;
    let call = IERC721::safeTransferFrom_1Call::abi_decode(&trace.input)?;
    move_nft(state, token, call.from, call.to, call.tokenId);
    Ok(())
}

fn move_nft(state: &mut SimulationState, token: Address, from: Address, to: Address, id: U256) {
    state.transfer(from, to, TokenId::Erc721(token, id), BigInt::from(1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bytes;
    use alloy::primitives::address;

    const OWNER: Address = address!("00000000000000000000000000000000000000aa");
    const BUYER: Address = address!("00000000000000000000000000000000000000bb");
    const COLLECTION: Address = address!("bc4ca0eda7647a8ab7c2061c2e118a18a936f13d");

    #[test]
    fn test_safe_transfer_moves_one_unit() {
        let id = U256::from(8817u64);
        let input = IERC721::safeTransferFrom_0Call {
            from: OWNER,
            to: BUYER,
            tokenId: id,
        }
        .abi_encode();
        let trace = CallTrace::call(OWNER, COLLECTION, Bytes::from(input), U256::ZERO);
        let mut state = SimulationState::new();

        handle_safe_transfer(&mut state, &trace).unwrap();

        let nft = TokenId::Erc721(COLLECTION, id);
        assert_eq!(state.state_change.get(&OWNER, &nft), Some(&BigInt::from(-1)));
        assert_eq!(state.state_change.get(&BUYER, &nft), Some(&BigInt::from(1)));
        assert_eq!(state.payments.as_slice()[0].amount, BigInt::from(1));
    }

    #[test]
    fn test_safe_transfer_with_data() {
        let input = IERC721::safeTransferFrom_1Call {
            from: OWNER,
            to: BUYER,
            tokenId: U256::from(1u64),
            data: Bytes::from_static(b"hello"),
        }
        .abi_encode();
        let trace = CallTrace::call(OWNER, COLLECTION, Bytes::from(input), U256::ZERO);
        let mut state = SimulationState::new();

        handle_safe_transfer_with_data(&mut state, &trace).unwrap();

        assert_eq!(
            state.payments.as_slice()[0].token.to_string(),
            "erc721:0xbc4ca0eda7647a8ab7c2061c2e118a18a936f13d:1"
        );
    }

    #[test]
    fn test_truncated_input_is_rejected() {
        let input = IERC721::safeTransferFrom_0Call::SELECTOR.to_vec();
        let trace = CallTrace::call(OWNER, COLLECTION, Bytes::from(input), U256::ZERO);
        let mut state = SimulationState::new();

        assert!(handle_safe_transfer(&mut state, &trace).is_err());
        assert!(state.payments.is_empty());
    }
}
