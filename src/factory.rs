use std::error::Error;

use crate::context::ContextHandle;
use crate::registry::Config;

/// Constructs pipeline components from a generic configuration value.
pub trait Factory {
    type Item: ?Sized;

    /// Returns type as a string that is used mainly for concrete component
    /// identification.
    fn ty() -> &'static str
    where
        Self: Sized;

    /// Constructs a new component owned by the given context by configuring
    /// it with the given config.
    fn from(&self, cfg: &Config, owner: &ContextHandle)
        -> Result<Box<Self::Item>, Box<dyn Error>>;
}
