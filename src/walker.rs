//! Depth-first reduction of a call trace
//!
//! Frames are visited in pre-order, left to right, which is the order the
//! calls executed in. Only successful plain `CALL` frames are processed.
//! A reverted frame prunes its whole subtree: anything recorded below it
//! describes state the chain rolled back.
//!
//! `DELEGATECALL`, `STATICCALL`, `CALLCODE` and creations are not descended
//! into either. Effects reachable only through them are not reported.

use tracing::{debug, trace};

use crate::{
    collector::SimulationState,
    handlers::HandlerRegistry,
    types::{CallKind, CallTrace},
};

/// Applies every matching handler to `node` and its successful sub-calls
pub fn walk(registry: &HandlerRegistry, state: &mut SimulationState, node: &CallTrace) {
    if node.kind != CallKind::Call {
        trace!(kind = ?node.kind, to = ?node.to, "skipping unsupported frame");
        return;
    }
    if let Some(error) = &node.error {
        debug!(%error, to = ?node.to, subcalls = node.calls.len(), "pruning reverted frame");
        return;
    }

    for handler in registry.get_handlers(node) {
        trace!(handler = ?handler.kind, to = ?node.to, "dispatching");
        if let Err(err) = handler.handle(state, node) {
            debug!(handler = ?handler.kind, to = ?node.to, %err, "handler could not decode call");
        }
    }

    for call in &node.calls {
        walk(registry, state, call);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        handlers::default_registry,
        types::{Address, Bytes, TokenId, U256},
    };
    use num_bigint::BigInt;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn value_call(from: u8, to: u8, value: u64) -> CallTrace {
        CallTrace::call(addr(from), addr(to), Bytes::new(), U256::from(value))
    }

    fn run(root: &CallTrace) -> SimulationState {
        let mut state = SimulationState::new();
        walk(default_registry(), &mut state, root);
        state
    }

    #[test]
    fn test_preorder_payment_order() {
        // 1 -> 2 (value 1)
        //   2 -> 3 (value 2)
        //     3 -> 4 (value 3)
        //   2 -> 5 (value 4)
        let mut root = value_call(1, 2, 1);
        let mut middle = value_call(2, 3, 2);
        middle.calls.push(value_call(3, 4, 3));
        root.calls.push(middle);
        root.calls.push(value_call(2, 5, 4));

        let state = run(&root);

        let amounts: Vec<BigInt> = state
            .payments
            .as_slice()
            .iter()
            .map(|p| p.amount.clone())
            .collect();
        assert_eq!(amounts, (1..=4).map(BigInt::from).collect::<Vec<_>>());
    }

    #[test]
    fn test_reverted_subtree_is_pruned() {
        let mut root = value_call(1, 2, 10);
        let mut failed = value_call(2, 3, 5);
        failed.error = Some("execution reverted".to_string());
        failed.calls.push(value_call(3, 4, 7));
        root.calls.push(failed);
        root.calls.push(value_call(2, 6, 1));

        let state = run(&root);

        assert_eq!(state.payments.len(), 2);
        assert!(state.state_change.address_state(&addr(3)).is_none());
        assert!(state.state_change.address_state(&addr(4)).is_none());
        assert_eq!(
            state.state_change.get(&addr(2), &TokenId::Native),
            Some(&BigInt::from(9))
        );
    }

    #[test]
    fn test_non_call_frames_are_not_descended() {
        let mut root = value_call(1, 2, 0);
        for kind in [
            CallKind::DelegateCall,
            CallKind::StaticCall,
            CallKind::Create,
            CallKind::Create2,
            CallKind::CallCode,
        ] {
            let mut frame = value_call(2, 3, 5);
            frame.kind = kind;
            frame.calls.push(value_call(3, 4, 6));
            root.calls.push(frame);
        }

        let state = run(&root);

        assert!(state.state_change.is_empty());
        assert!(state.payments.is_empty());
    }

    #[test]
    fn test_children_of_unmatched_frames_still_visited() {
        let mut root = CallTrace::call(
            addr(1),
            addr(2),
            Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]),
            U256::ZERO,
        );
        root.calls.push(value_call(2, 3, 8));

        let state = run(&root);

        assert_eq!(
            state.state_change.get(&addr(3), &TokenId::Native),
            Some(&BigInt::from(8))
        );
    }

    #[test]
    fn test_decode_failure_does_not_stop_walk() {
        // `transfer` selector followed by a truncated argument
        let mut input = vec![0xa9, 0x05, 0x9c, 0xbb];
        input.extend_from_slice(&[0u8; 10]);
        let mut root = CallTrace::call(addr(1), addr(2), Bytes::from(input), U256::from(4u64));
        root.calls.push(value_call(2, 3, 6));

        let state = run(&root);

        assert_eq!(state.payments.len(), 2);
        assert_eq!(
            state.state_change.get(&addr(2), &TokenId::Native),
            Some(&BigInt::from(-2))
        );
        assert_eq!(
            state.state_change.get(&addr(3), &TokenId::Native),
            Some(&BigInt::from(6))
        );
        assert!(state
            .state_change
            .get(&addr(1), &TokenId::Erc20(addr(2)))
            .is_none());
    }

    #[test]
    fn test_walk_is_deterministic() {
        let mut root = value_call(1, 2, 3);
        root.calls.push(value_call(2, 1, 3));
        root.calls.push(value_call(2, 7, 1));

        let first = run(&root);
        let second = run(&root);

        assert_eq!(first.state_change, second.state_change);
        assert_eq!(first.payments, second.payments);
    }
}
