//! Selector-keyed handler table
//!
//! The default registry is built once on first use and never mutated
//! afterwards, so it can be shared freely across simulations.

use once_cell::sync::Lazy;

use super::{CallHandler, HandlerKind};
use crate::types::CallTrace;

static DEFAULT_REGISTRY: Lazy<HandlerRegistry> =
    Lazy::new(|| HandlerRegistry::new(HandlerKind::ALL.into_iter().map(CallHandler::new)));

/// Registry holding every handler the crate ships, in registration order
pub fn default_registry() -> &'static HandlerRegistry {
    &DEFAULT_REGISTRY
}

/// Ordered table of call handlers
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    handlers: Vec<CallHandler>,
}

impl HandlerRegistry {
    /// Builds a registry, keeping the first registration of each variant
    pub fn new(handlers: impl IntoIterator<Item = CallHandler>) -> Self {
        let mut unique: Vec<CallHandler> = Vec::new();
        for handler in handlers {
            if !unique.contains(&handler) {
                unique.push(handler);
            }
        }
        Self { handlers: unique }
    }

    /// Handlers that apply to `trace`, in registration order
    pub fn get_handlers<'a>(
        &'a self,
        trace: &'a CallTrace,
    ) -> impl Iterator<Item = &'a CallHandler> + 'a {
        self.handlers.iter().filter(move |handler| handler.matches(trace))
    }

    pub fn handlers(&self) -> &[CallHandler] {
        &self.handlers
    }
}
