//! Graph expansion

use super::{NodeHandle, NodeStore};
use crate::config::{UncollideConfig, DEFAULT_EXPANSION_FACTOR};

/// Spreads a whole layout outward, in place
pub trait GraphExpander {
    /// Apply one expansion step to every node
    fn expand(&mut self, store: &mut dyn NodeStore);
}

impl<F> GraphExpander for F
where
    F: FnMut(&mut dyn NodeStore),
{
    fn expand(&mut self, store: &mut dyn NodeStore) {
        self(store);
    }
}

/// Scales every position about the origin by a fixed factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformExpansion {
    /// Scale applied per step
    pub factor: f32,
}

impl UniformExpansion {
    /// Create an expander with the given factor
    pub const fn new(factor: f32) -> Self {
        Self { factor }
    }

    /// Create an expander using the configured `expansion_factor`
    pub const fn from_config(config: &UncollideConfig) -> Self {
        Self::new(config.expansion_factor)
    }
}

impl Default for UniformExpansion {
    fn default() -> Self {
        Self::new(DEFAULT_EXPANSION_FACTOR)
    }
}

impl GraphExpander for UniformExpansion {
    fn expand(&mut self, store: &mut dyn NodeStore) {
        for handle in NodeHandle::all(store.count()) {
            let position = store.position(handle);
            store.set_position(handle, position * self.factor);
        }
    }
}
