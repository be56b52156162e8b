//! The synthesis entry point: cache, bind, synthesize.

use std::sync::Arc;

use tracing::debug;

use eventforge_types::PropertyBag;

use crate::binder::Binder;
use crate::cache::DescriptorCache;
use crate::config::{BindingConfig, SynthesisConfig};
use crate::descriptor::InterfaceDescriptor;
use crate::error::{DescriptorError, SynthesisError};
use crate::instance::EventInstance;
use crate::registry::TypeRegistry;

/// Builds event instances for any interface in a registry.
///
/// Construct one per process (or per test) and share it by reference; it
/// owns the descriptor cache and is safe to use from many threads.
#[derive(Debug)]
pub struct Synthesizer {
    cache: DescriptorCache,
    binding: BindingConfig,
}

impl Synthesizer {
    /// Create a synthesizer over `registry`.
    pub fn new(registry: Arc<TypeRegistry>, config: &SynthesisConfig) -> Self {
        Self {
            cache: DescriptorCache::new(registry, config.naming.convention()),
            binding: config.binding,
        }
    }

    /// Build an instance of `interface` from `bag`.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError::Descriptor`] if the interface cannot be
    /// resolved, or [`SynthesisError::Bind`] if the bag does not satisfy it.
    pub fn create(&self, interface: &str, bag: &PropertyBag) -> Result<EventInstance, SynthesisError> {
        let descriptor = self.cache.get_or_resolve(interface)?;
        let bound = Binder::new(self.cache.registry())
            .trace_ignored_properties(self.binding.trace_ignored_properties)
            .bind(&descriptor, bag)
            .inspect_err(|error| debug!(interface, %error, "property binding failed"))?;
        Ok(EventInstance::synthesize(bound))
    }

    /// The descriptor for `interface`.
    ///
    /// # Errors
    ///
    /// Returns the cached [`DescriptorError`] if the interface cannot be
    /// resolved.
    pub fn describe(&self, interface: &str) -> Result<Arc<InterfaceDescriptor>, DescriptorError> {
        self.cache.get_or_resolve(interface)
    }

    /// The underlying descriptor cache.
    pub const fn cache(&self) -> &DescriptorCache {
        &self.cache
    }
}
