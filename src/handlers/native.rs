//! Native currency moved by a call's `value`

use crate::{
    collector::SimulationState,
    errors::DecodeError,
    types::{CallTrace, TokenId},
    utils::to_bigint,
};

/// Records the call value as a native transfer from caller to callee
///
/// Zero-value calls record nothing.
pub fn handle_value(state: &mut SimulationState, trace: &CallTrace) -> Result<(), DecodeError> {
    let value = trace.value();
    if value.is_zero() {
        return Ok(());
    }
    let to = trace.to.ok_or(DecodeError::MissingTarget)?;
    state.transfer(trace.from, to, TokenId::Native, to_bigint(value));
    Ok(())
}
