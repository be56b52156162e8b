//! Interface resolution, descriptor caching, property binding, and event
//! synthesis.
//!
//! Given a registry of accessor-only event interfaces, this crate turns a
//! name -> value property bag into a concrete, read-only event instance
//! for any interface, without per-event boilerplate:
//!
//! ```text
//! Synthesizer::create(interface, bag)
//!   -> DescriptorCache::get_or_resolve   (resolve once per interface)
//!   -> Binder::bind                      (completeness, then compatibility)
//!   -> EventInstance::synthesize         (infallible construction)
//! ```
//!
//! # Modules
//!
//! - [`registry`] -- The frozen interface and type universe, with
//!   precomputed assignability.
//! - [`naming`] -- Pluggable accessor -> property name conventions.
//! - [`resolver`] -- Breadth-first interface flattening with diamond
//!   collapse.
//! - [`descriptor`] -- Resolved, immutable accessor contracts.
//! - [`cache`] -- Concurrent resolve-once descriptor cache.
//! - [`binder`] -- Property bag validation and coercion.
//! - [`instance`] -- Descriptor-backed event instances.
//! - [`synthesizer`] -- The [`Synthesizer`] facade.
//! - [`config`] -- Configuration loading from `eventforge-config.yaml`.
//! - [`error`] -- Error types for every stage.

pub mod binder;
pub mod cache;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod instance;
pub mod naming;
pub mod registry;
pub mod resolver;
pub mod synthesizer;

pub use binder::{Binder, BoundProperties};
pub use cache::DescriptorCache;
pub use config::{ConfigError, SynthesisConfig};
pub use descriptor::{AccessorSpec, InterfaceDescriptor, ValueShape};
pub use error::{BindError, DescriptorError, RegistryError, SynthesisError};
pub use instance::EventInstance;
pub use naming::{BeanNaming, NamingConvention, VerbatimNaming};
pub use registry::{RegistryBuilder, TypeRegistry};
pub use resolver::Resolver;
pub use synthesizer::Synthesizer;
