//! Interface descriptor resolution.
//!
//! Walks an interface's supertype graph breadth-first, collects every
//! abstract accessor, derives property names through the configured
//! [`NamingConvention`], and collapses accessors inherited along several
//! paths into one [`AccessorSpec`].
//!
//! # Collapse rule
//!
//! Two accessors that map to the same property are compatible when their
//! shapes are identical or one is a covariant refinement of the other
//! (`Player` refines `Entity`, `List` refines `Collection`,
//! `Optional<Player>` refines `Optional<Entity>`). The collapsed accessor
//! keeps the most specific shape. Required and optional never reconcile.
//!
//! Resolution is pure: it reads the registry and returns a new descriptor.
//! Memoization is the cache's job.

use std::collections::{HashMap, HashSet, VecDeque};

use eventforge_types::{InterfaceDef, MethodDecl, OBJECT, PropertyName, TypeName, TypeShape};

use crate::descriptor::{AccessorSpec, InterfaceDescriptor, ValueShape};
use crate::error::DescriptorError;
use crate::naming::NamingConvention;
use crate::registry::TypeRegistry;

/// Resolves interfaces against a registry with a naming convention.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    registry: &'a TypeRegistry,
    naming: &'a dyn NamingConvention,
}

impl<'a> Resolver<'a> {
    /// Create a resolver.
    pub const fn new(registry: &'a TypeRegistry, naming: &'a dyn NamingConvention) -> Self {
        Self { registry, naming }
    }

    /// Resolve `interface` into a descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::UnknownInterface`] if the interface or a
    /// supertype is not declared, [`DescriptorError::NonAccessorMethod`] if
    /// any abstract method is not a zero-argument accessor, and
    /// [`DescriptorError::ConflictingAccessor`] if inherited accessors for
    /// one property cannot be reconciled.
    pub fn resolve(&self, interface: &str) -> Result<InterfaceDescriptor, DescriptorError> {
        let root = self.lookup(interface)?;

        let mut lineage = Vec::new();
        let mut accessors: Vec<AccessorSpec> = Vec::new();
        let mut positions: HashMap<PropertyName, usize> = HashMap::new();

        let mut seen: HashSet<&'a str> = HashSet::from([root.name.as_str()]);
        let mut queue: VecDeque<&'a InterfaceDef> = VecDeque::from([root]);

        while let Some(def) = queue.pop_front() {
            lineage.push(def.name.clone());

            for method in def.methods.iter().filter(|m| !m.default_impl) {
                if !method.is_accessor_shaped() {
                    return Err(DescriptorError::NonAccessorMethod {
                        interface: def.name.clone(),
                        method: method.name.clone(),
                    });
                }

                let name = self.naming.property_name(&method.name, &method.returns);
                match positions.get(&name).copied().and_then(|i| accessors.get_mut(i)) {
                    Some(existing) => self.collapse(existing, def, method)?,
                    None => {
                        positions.insert(name.clone(), accessors.len());
                        accessors.push(AccessorSpec {
                            name,
                            methods: vec![method.name.clone()],
                            declared_by: vec![def.name.clone()],
                            value_shape: ValueShape::of(&method.returns),
                            expected_type: method.returns.clone(),
                        });
                    }
                }
            }

            for parent in &def.extends {
                if seen.insert(parent.as_str()) {
                    queue.push_back(self.lookup(parent.as_str())?);
                }
            }
        }

        Ok(InterfaceDescriptor::new(root.name.clone(), lineage, accessors))
    }

    fn lookup(&self, name: &str) -> Result<&'a InterfaceDef, DescriptorError> {
        self.registry
            .interface(name)
            .ok_or_else(|| DescriptorError::UnknownInterface(TypeName::from(name)))
    }

    /// Fold another declaration of an already collected accessor into it.
    fn collapse(
        &self,
        existing: &mut AccessorSpec,
        def: &InterfaceDef,
        method: &MethodDecl,
    ) -> Result<(), DescriptorError> {
        let incoming = &method.returns;
        if self.refines(incoming, &existing.expected_type) {
            existing.expected_type = incoming.clone();
        } else if !self.refines(&existing.expected_type, incoming) {
            let first_declared_by = existing
                .declared_by
                .first()
                .cloned()
                .unwrap_or_else(|| def.name.clone());
            return Err(DescriptorError::ConflictingAccessor {
                name: existing.name.clone(),
                first: existing.expected_type.clone(),
                first_declared_by,
                second: incoming.clone(),
                second_declared_by: def.name.clone(),
            });
        }

        if !existing.declared_by.contains(&def.name) {
            existing.declared_by.push(def.name.clone());
        }
        if !existing.methods.contains(&method.name) {
            existing.methods.push(method.name.clone());
        }
        Ok(())
    }

    /// Whether `sub` is `sup` or a covariant refinement of it.
    fn refines(&self, sub: &TypeShape, sup: &TypeShape) -> bool {
        match (sub, sup) {
            (a, b) if a == b => true,
            (TypeShape::Reference(a), TypeShape::Reference(b)) => {
                self.registry.is_assignable(a.as_str(), b.as_str())
            }
            (TypeShape::Optional(a), TypeShape::Optional(b)) => self.refines(a, b),
            (
                TypeShape::Container { kind: ka, element: ea },
                TypeShape::Container { kind: kb, element: eb },
            ) => ka.fits(*kb) && (ea == eb || is_object(eb)),
            (TypeShape::Container { .. }, TypeShape::Reference(b)) => b.as_str() == OBJECT,
            _ => false,
        }
    }
}

/// A raw container's element shape.
fn is_object(shape: &TypeShape) -> bool {
    matches!(shape, TypeShape::Reference(name) if name.as_str() == OBJECT)
}

#[cfg(test)]
mod tests {
    use eventforge_types::{ContainerKind, MethodDecl, Primitive, TypeDecl};

    use super::*;
    use crate::naming::{BeanNaming, VerbatimNaming};

    fn build(defs: Vec<InterfaceDef>) -> TypeRegistry {
        let mut builder = TypeRegistry::builder();
        let types = builder
            .declare_type(TypeDecl::new("Entity", Vec::<TypeName>::new()))
            .and_then(|b| b.declare_type(TypeDecl::new("Player", ["Entity"])));
        assert!(types.is_ok());
        for def in defs {
            assert!(builder.declare_interface(def).is_ok());
        }
        builder.build()
    }

    fn resolve(registry: &TypeRegistry, name: &str) -> Result<InterfaceDescriptor, DescriptorError> {
        Resolver::new(registry, &BeanNaming::strict()).resolve(name)
    }

    fn names(descriptor: &InterfaceDescriptor) -> Vec<&str> {
        descriptor.accessors().iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn collects_inherited_accessors_breadth_first() {
        let registry = build(vec![
            InterfaceDef::new("Event").accessor("getCause", TypeShape::reference("Cause")),
            InterfaceDef::new("TargetWorldEvent")
                .extends("Event")
                .accessor("getTargetWorld", TypeShape::reference("World")),
            InterfaceDef::new("ChangeBlockEvent")
                .extends("TargetWorldEvent")
                .accessor("getTransactions", TypeShape::list(TypeShape::reference("Transaction"))),
        ]);
        let descriptor = resolve(&registry, "ChangeBlockEvent");
        assert!(descriptor.is_ok());
        let descriptor = descriptor.ok();
        let descriptor = descriptor.as_ref();
        assert_eq!(descriptor.map(names), Some(vec!["transactions", "targetWorld", "cause"]));
        assert_eq!(
            descriptor.map(|d| d.lineage().iter().map(TypeName::as_str).collect::<Vec<_>>()),
            Some(vec!["ChangeBlockEvent", "TargetWorldEvent", "Event"])
        );
    }

    #[test]
    fn diamond_collapses_to_one_accessor() {
        let registry = build(vec![
            InterfaceDef::new("A").accessor("getX", TypeShape::Primitive(Primitive::Int)),
            InterfaceDef::new("B").accessor("getX", TypeShape::Primitive(Primitive::Int)),
            InterfaceDef::new("C").extends("A").extends("B"),
        ]);
        let descriptor = resolve(&registry, "C").ok();
        let x = descriptor.as_ref().and_then(|d| d.accessor("x"));
        assert_eq!(descriptor.as_ref().map(InterfaceDescriptor::len), Some(1));
        assert_eq!(
            x.map(|a| a.declared_by.iter().map(TypeName::as_str).collect::<Vec<_>>()),
            Some(vec!["A", "B"])
        );
        assert!(x.is_some_and(AccessorSpec::is_multiply_declared));
    }

    #[test]
    fn shared_ancestor_is_visited_once() {
        let registry = build(vec![
            InterfaceDef::new("Root").accessor("getId", TypeShape::Primitive(Primitive::Long)),
            InterfaceDef::new("Left").extends("Root"),
            InterfaceDef::new("Right").extends("Root"),
            InterfaceDef::new("Bottom").extends("Left").extends("Right"),
        ]);
        let descriptor = resolve(&registry, "Bottom").ok();
        assert_eq!(descriptor.as_ref().map(|d| d.lineage().len()), Some(4));
        assert_eq!(
            descriptor.and_then(|d| d.accessor("id").map(|a| a.declared_by.len())),
            Some(1)
        );
    }

    #[test]
    fn covariant_declarations_keep_the_narrowest_shape() {
        let registry = build(vec![
            InterfaceDef::new("TargetEntityEvent").accessor("getTargetEntity", TypeShape::reference("Entity")),
            InterfaceDef::new("TargetPlayerEvent")
                .accessor("getTargetEntity", TypeShape::reference("Player")),
            InterfaceDef::new("Join").extends("TargetEntityEvent").extends("TargetPlayerEvent"),
        ]);
        let descriptor = resolve(&registry, "Join").ok();
        assert_eq!(
            descriptor.and_then(|d| d.accessor("targetEntity").map(|a| a.expected_type.clone())),
            Some(TypeShape::reference("Player"))
        );
    }

    #[test]
    fn list_refines_collection() {
        let registry = build(vec![
            InterfaceDef::new("A").accessor(
                "getItems",
                TypeShape::container(ContainerKind::Collection, TypeShape::reference("Entity")),
            ),
            InterfaceDef::new("B").extends("A").accessor("getItems", TypeShape::list(TypeShape::reference("Entity"))),
        ]);
        let descriptor = resolve(&registry, "B").ok();
        assert_eq!(
            descriptor.and_then(|d| d.accessor("items").map(|a| a.expected_type.clone())),
            Some(TypeShape::list(TypeShape::reference("Entity")))
        );
    }

    #[test]
    fn typed_list_refines_raw_list() {
        let registry = build(vec![
            InterfaceDef::new("A").accessor("getItems", TypeShape::list(TypeShape::reference(OBJECT))),
            InterfaceDef::new("B").extends("A").accessor("getItems", TypeShape::list(TypeShape::reference("Entity"))),
        ]);
        let descriptor = resolve(&registry, "B").ok();
        assert_eq!(
            descriptor.and_then(|d| d.accessor("items").map(|a| a.expected_type.clone())),
            Some(TypeShape::list(TypeShape::reference("Entity")))
        );
    }

    #[test]
    fn incompatible_diamond_is_a_conflict() {
        let registry = build(vec![
            InterfaceDef::new("A").accessor("getX", TypeShape::Primitive(Primitive::Int)),
            InterfaceDef::new("B").accessor("getX", TypeShape::reference("Entity")),
            InterfaceDef::new("C").extends("A").extends("B"),
        ]);
        let result = resolve(&registry, "C");
        assert!(matches!(
            result,
            Err(DescriptorError::ConflictingAccessor { ref name, .. }) if name.as_str() == "x"
        ));
    }

    #[test]
    fn optional_and_required_never_reconcile() {
        let registry = build(vec![
            InterfaceDef::new("A").accessor("getNote", TypeShape::reference("String")),
            InterfaceDef::new("B").accessor("getNote", TypeShape::optional(TypeShape::reference("String"))),
            InterfaceDef::new("C").extends("A").extends("B"),
        ]);
        assert!(matches!(
            resolve(&registry, "C"),
            Err(DescriptorError::ConflictingAccessor { .. })
        ));
    }

    #[test]
    fn setters_are_rejected() {
        let registry = build(vec![InterfaceDef::new("Mutable")
            .accessor("getModifiedData", TypeShape::reference("Data"))
            .method(MethodDecl::setter("setModifiedData", TypeShape::reference("Data")))]);
        assert_eq!(
            resolve(&registry, "Mutable").err(),
            Some(DescriptorError::NonAccessorMethod {
                interface: TypeName::from("Mutable"),
                method: "setModifiedData".to_owned(),
            })
        );
    }

    #[test]
    fn inherited_non_accessor_is_rejected() {
        let registry = build(vec![
            InterfaceDef::new("Base").method(MethodDecl::accessor("fire", TypeShape::Void)),
            InterfaceDef::new("Child").extends("Base"),
        ]);
        assert!(matches!(
            resolve(&registry, "Child"),
            Err(DescriptorError::NonAccessorMethod { ref interface, .. }) if interface.as_str() == "Base"
        ));
    }

    #[test]
    fn default_methods_are_skipped() {
        let registry = build(vec![InterfaceDef::new("Event")
            .accessor("getCause", TypeShape::reference("Cause"))
            .method(MethodDecl::setter("setCancelled", TypeShape::Primitive(Primitive::Boolean)).with_default_impl())]);
        let descriptor = resolve(&registry, "Event").ok();
        assert_eq!(descriptor.as_ref().map(names), Some(vec!["cause"]));
    }

    #[test]
    fn unknown_interfaces_fail() {
        let registry = build(vec![InterfaceDef::new("Orphan").extends("Missing")]);
        assert_eq!(
            resolve(&registry, "Nope").err(),
            Some(DescriptorError::UnknownInterface(TypeName::from("Nope")))
        );
        assert_eq!(
            resolve(&registry, "Orphan").err(),
            Some(DescriptorError::UnknownInterface(TypeName::from("Missing")))
        );
    }

    #[test]
    fn naming_convention_is_pluggable() {
        let registry = build(vec![InterfaceDef::new("Foo").accessor("getTarget", TypeShape::reference("Entity"))]);
        let descriptor = Resolver::new(&registry, &VerbatimNaming).resolve("Foo").ok();
        assert_eq!(descriptor.as_ref().map(names), Some(vec!["getTarget"]));
    }

    #[test]
    fn resolution_is_deterministic() {
        let registry = build(vec![
            InterfaceDef::new("A").accessor("getX", TypeShape::Primitive(Primitive::Int)),
            InterfaceDef::new("B").accessor("getY", TypeShape::Primitive(Primitive::Int)),
            InterfaceDef::new("C").extends("A").extends("B"),
        ]);
        let first = resolve(&registry, "C").ok();
        let second = resolve(&registry, "C").ok();
        assert!(first.is_some());
        assert_eq!(first, second);
    }
}
