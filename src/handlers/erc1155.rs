//! ERC1155 single and batch transfer decoding

use alloy::{sol, sol_types::SolCall};

use crate::{
    collector::SimulationState,
    errors::DecodeError,
    types::{CallTrace, TokenId},
    utils::to_bigint,
};

sol! {
    interface IERC1155 {
        function safeTransferFrom(address from, address to, uint256 id, uint256 value, bytes data) external;
        function safeBatchTransferFrom(address from, address to, uint256[] ids, uint256[] values, bytes data) external;
    }
}

/// `safeTransferFrom(from, to, id, value, data)`
pub fn handle_transfer(state: &mut SimulationState, trace: &CallTrace) -> Result<(), DecodeError> {
    let token = trace.to.ok_or(DecodeError::MissingTarget)?;
    let call = IERC1155::safeTransferFromCall::abi_decode(&trace.input)?;
    if !call.value.is_zero() {
        state.transfer(
            call.from,
            call.to,
            TokenId::Erc1155(token, call.id),
            to_bigint(call.value),
        );
    }
    Ok(())
}

/// `safeBatchTransferFrom(from, to, ids, values, data)`
///
/// One payment per non-zero `(id, value)` pair, in array order.
pub fn handle_batch_transfer(
    state: &mut SimulationState,
    trace: &CallTrace,
) -> Result<(), DecodeError> {
    let token = trace.to.ok_or(DecodeError::MissingTarget)?;
    let call = IERC1155::safeBatchTransferFromCall::abi_decode(&trace.input)?;
    if call.ids.len() != call.values.len() {
        return Err(DecodeError::LengthMismatch {
            ids: call.ids.len(),
            amounts: call.values.len(),
        });
    }
    for (id, value) in call.ids.iter().zip(&call.values) {
        if value.is_zero() {
            continue;
        }
        state.transfer(
            call.from,
            call.to,
            TokenId::Erc1155(token, *id),
            to_bigint(*value),
        );
    }
    Ok(())
}
