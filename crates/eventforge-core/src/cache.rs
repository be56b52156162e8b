//! Concurrent, resolve-once descriptor cache.
//!
//! # Locking
//!
//! Each interface gets its own [`OnceLock`] cell, stored in a sharded
//! [`DashMap`]. A lookup takes a shard read lock only long enough to clone
//! the cell handle; resolution runs inside [`OnceLock::get_or_init`] with
//! no map lock held. Concurrent first requests for the *same* interface
//! wait on that interface's cell and observe the single published result;
//! requests for other interfaces never wait on it.
//!
//! Failures are cached exactly like successes, so a malformed interface
//! fails identically on every call. Only declared interfaces get an
//! entry; a name the registry does not know fails without touching the
//! map, so the cache is bounded by the registry. Entries are never
//! evicted: the interface universe is fixed when the registry is built.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use tracing::{debug, warn};

use eventforge_types::TypeName;

use crate::descriptor::InterfaceDescriptor;
use crate::error::DescriptorError;
use crate::naming::NamingConvention;
use crate::registry::TypeRegistry;
use crate::resolver::Resolver;

/// The cached outcome of resolving one interface.
pub type Resolved = Result<Arc<InterfaceDescriptor>, DescriptorError>;

/// Memoizes [`Resolver::resolve`] per interface.
#[derive(Debug)]
pub struct DescriptorCache {
    registry: Arc<TypeRegistry>,
    naming: Arc<dyn NamingConvention>,
    entries: DashMap<TypeName, Arc<OnceLock<Resolved>>>,
    /// Number of graph traversals actually performed.
    resolutions: AtomicU64,
}

impl DescriptorCache {
    /// Create an empty cache over a registry.
    pub fn new(registry: Arc<TypeRegistry>, naming: Arc<dyn NamingConvention>) -> Self {
        Self {
            registry,
            naming,
            entries: DashMap::new(),
            resolutions: AtomicU64::new(0),
        }
    }

    /// Return the descriptor for `interface`, resolving it on first use.
    ///
    /// # Errors
    ///
    /// Returns the (cached) [`DescriptorError`] if the interface cannot be
    /// resolved, or [`DescriptorError::UnknownInterface`] (not cached) if
    /// the registry does not declare it.
    pub fn get_or_resolve(&self, interface: &str) -> Resolved {
        if let Some(cell) = self.entries.get(interface) {
            if let Some(resolved) = cell.get() {
                return resolved.clone();
            }
        }

        let Some(def) = self.registry.interface(interface) else {
            debug!(interface, "lookup of undeclared interface");
            return Err(DescriptorError::UnknownInterface(TypeName::from(interface)));
        };
        let cell = Arc::clone(self.entries.entry(def.name.clone()).or_default().value());
        cell.get_or_init(|| self.resolve_uncached(interface)).clone()
    }

    /// Resolve every interface in the registry, in declaration order.
    pub fn resolve_all(&self) -> Vec<(TypeName, Resolved)> {
        self.registry
            .interfaces()
            .map(|def| (def.name.clone(), self.get_or_resolve(def.name.as_str())))
            .collect()
    }

    /// How many times the interface graph has been traversed.
    pub fn resolution_count(&self) -> u64 {
        self.resolutions.load(Ordering::Acquire)
    }

    /// Number of interfaces with a cache entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been requested yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The registry this cache resolves against.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    fn resolve_uncached(&self, interface: &str) -> Resolved {
        self.resolutions.fetch_add(1, Ordering::AcqRel);
        let resolved = Resolver::new(&self.registry, self.naming.as_ref())
            .resolve(interface)
            .map(Arc::new);

        match &resolved {
            Ok(descriptor) => debug!(
                interface,
                accessors = descriptor.len(),
                ancestors = descriptor.lineage().len().saturating_sub(1),
                "descriptor resolved"
            ),
            Err(error) => warn!(interface, %error, "descriptor resolution failed"),
        }
        resolved
    }
}
