//! Call handlers
//!
//! A handler inspects one successful call frame and records the balance
//! effects it implies. Handlers form a closed set of variants
//! ([`HandlerKind`]), each bound to an optional 4-byte selector:
//!
//! - [`native`]: native value carried by any call (no selector)
//! - [`erc20`]: `transfer` and the ERC20/ERC721-ambiguous `transferFrom`
//! - [`erc721`]: both `safeTransferFrom` overloads
//! - [`erc1155`]: single and batch `safeTransferFrom`
//!
//! Every handler decodes its whole input before touching state, so a
//! [`DecodeError`] always means "no effect recorded".

use alloy::sol_types::SolCall;

use crate::{collector::SimulationState, errors::DecodeError, types::CallTrace};

pub mod erc1155;
pub mod erc20;
pub mod erc721;
pub mod native;
pub mod registry;

pub use registry::{default_registry, HandlerRegistry};

/// Decoder variants known to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// `transfer(address,uint256)`
    Erc20Transfer,
    /// `transferFrom(address,address,uint256)`, shared by ERC20 and ERC721
    TransferFrom,
    /// `safeTransferFrom(address,address,uint256)`
    Erc721SafeTransfer,
    /// `safeTransferFrom(address,address,uint256,bytes)`
    Erc721SafeTransferWithData,
    /// `safeTransferFrom(address,address,uint256,uint256,bytes)`
    Erc1155Transfer,
    /// `safeBatchTransferFrom(address,address,uint256[],uint256[],bytes)`
    Erc1155BatchTransfer,
    /// Native value attached to any call
    NativeTransfer,
}

impl HandlerKind {
    /// Default registration order
    pub const ALL: [HandlerKind; 7] = [
        HandlerKind::Erc20Transfer,
        HandlerKind::TransferFrom,
        HandlerKind::Erc721SafeTransfer,
        HandlerKind::Erc721SafeTransferWithData,
        HandlerKind::Erc1155Transfer,
        HandlerKind::Erc1155BatchTransfer,
        HandlerKind::NativeTransfer,
    ];

    /// Selector the variant is keyed by, `None` for catch-alls
    pub fn selector(self) -> Option<[u8; 4]> {
        match self {
            HandlerKind::Erc20Transfer => Some(erc20::IERC20::transferCall::SELECTOR),
            HandlerKind::TransferFrom => Some(erc20::IERC20::transferFromCall::SELECTOR),
            HandlerKind::Erc721SafeTransfer => {
                Some(erc721::IERC721::safeTransferFrom_0Call::SELECTOR)
            }
            HandlerKind::Erc721SafeTransferWithData => {
                Some(erc721::IERC721::safeTransferFrom_1Call::SELECTOR)
            }
            HandlerKind::Erc1155Transfer => Some(erc1155::IERC1155::safeTransferFromCall::SELECTOR),
            HandlerKind::Erc1155BatchTransfer => {
                Some(erc1155::IERC1155::safeBatchTransferFromCall::SELECTOR)
            }
            HandlerKind::NativeTransfer => None,
        }
    }
}

/// Registry entry: a decoder plus the selector it answers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallHandler {
    pub selector: Option<[u8; 4]>,
    pub kind: HandlerKind,
}

impl CallHandler {
    pub fn new(kind: HandlerKind) -> Self {
        Self {
            selector: kind.selector(),
            kind,
        }
    }

    /// Check if this handler applies to `trace`
    ///
    /// Selector-less handlers match every frame.
    pub fn matches(&self, trace: &CallTrace) -> bool {
        match self.selector {
            Some(selector) => trace.selector() == Some(selector),
            None => true,
        }
    }

    /// Decodes `trace` and applies its effects to `state`
    pub fn handle(&self, state: &mut SimulationState, trace: &CallTrace) -> Result<(), DecodeError> {
        match self.kind {
            HandlerKind::Erc20Transfer => erc20::handle_transfer(state, trace),
            HandlerKind::TransferFrom => erc20::handle_transfer_from(state, trace),
            HandlerKind::Erc721SafeTransfer => erc721::handle_safe_transfer(state, trace),
            HandlerKind::Erc721SafeTransferWithData => {
                erc721::handle_safe_transfer_with_data(state, trace)
            }
            HandlerKind::Erc1155Transfer => erc1155::handle_transfer(state, trace),
            HandlerKind::Erc1155BatchTransfer => erc1155::handle_batch_transfer(state, trace),
            HandlerKind::NativeTransfer => native::handle_value(state, trace),
        }
    }
}

impl From<HandlerKind> for CallHandler {
    fn from(kind: HandlerKind) -> Self {
        CallHandler::new(kind)
    }
}
