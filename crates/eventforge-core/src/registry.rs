//! The frozen universe of declared interfaces and reference types.
//!
//! The set of event interfaces is fixed when the host loads, so the
//! registry is assembled once through a [`RegistryBuilder`] (or from a
//! [`Catalog`]) and then shared read-only. Transitive supertype sets are
//! computed at build time, which keeps [`TypeRegistry::is_assignable`] a
//! pair of hash lookups on the binding hot path.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

use eventforge_types::{Catalog, InterfaceDef, OBJECT, TypeDecl, TypeName};

use crate::error::RegistryError;

/// Read-only registry of interfaces and plain reference types.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    /// Interface definitions by name.
    interfaces: HashMap<TypeName, InterfaceDef>,
    /// Interface names in declaration order.
    order: Vec<TypeName>,
    /// Every declared name -> all of its transitive supertypes (not itself).
    ancestors: HashMap<TypeName, HashSet<TypeName>>,
}

impl TypeRegistry {
    /// Start building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Build a registry from a catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateInterface`] or
    /// [`RegistryError::DuplicateType`] if a name is declared twice.
    pub fn from_catalog(catalog: Catalog) -> Result<Self, RegistryError> {
        let mut builder = Self::builder();
        for decl in catalog.types {
            builder.declare_type(decl)?;
        }
        for def in catalog.interfaces {
            builder.declare_interface(def)?;
        }
        Ok(builder.build())
    }

    /// Parse a YAML catalogue and build a registry from it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Yaml`] if the text is not a valid catalogue,
    /// or a duplicate-declaration error.
    pub fn parse_catalog(yaml: &str) -> Result<Self, RegistryError> {
        let catalog: Catalog = serde_yml::from_str(yaml)?;
        Self::from_catalog(catalog)
    }

    /// Load a YAML catalogue file and build a registry from it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Io`] if the file cannot be read, otherwise
    /// as [`TypeRegistry::parse_catalog`].
    pub fn from_catalog_file(path: &Path) -> Result<Self, RegistryError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_catalog(&contents)
    }

    /// Look up an interface definition.
    pub fn interface(&self, name: &str) -> Option<&InterfaceDef> {
        self.interfaces.get(name)
    }

    /// All interfaces, in declaration order.
    pub fn interfaces(&self) -> impl Iterator<Item = &InterfaceDef> {
        self.order.iter().filter_map(|name| self.interfaces.get(name))
    }

    /// Number of declared interfaces.
    pub fn interface_count(&self) -> usize {
        self.order.len()
    }

    /// Whether a value whose runtime type is `from` may be supplied where
    /// `to` is declared.
    ///
    /// Reflexive; every reference type is assignable to `Object`. Names
    /// the registry does not know are only assignable to themselves and
    /// to `Object`.
    pub fn is_assignable(&self, from: &str, to: &str) -> bool {
        from == to
            || to == OBJECT
            || self
                .ancestors
                .get(from)
                .is_some_and(|supertypes| supertypes.contains(to))
    }

    /// All transitive supertypes of `name`, excluding itself.
    pub fn supertypes_of(&self, name: &str) -> Option<&HashSet<TypeName>> {
        self.ancestors.get(name)
    }
}

/// Collects declarations and freezes them into a [`TypeRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    interfaces: HashMap<TypeName, InterfaceDef>,
    order: Vec<TypeName>,
    edges: HashMap<TypeName, Vec<TypeName>>,
}

impl RegistryBuilder {
    /// Declare an event interface.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateInterface`] if an interface with
    /// this name was already declared, or [`RegistryError::DuplicateType`]
    /// if the name belongs to a plain type.
    pub fn declare_interface(&mut self, def: InterfaceDef) -> Result<&mut Self, RegistryError> {
        if self.interfaces.contains_key(&def.name) {
            return Err(RegistryError::DuplicateInterface(def.name));
        }
        if self.edges.contains_key(&def.name) {
            return Err(RegistryError::DuplicateType(def.name));
        }
        self.edges.insert(def.name.clone(), def.extends.clone());
        self.order.push(def.name.clone());
        self.interfaces.insert(def.name.clone(), def);
        Ok(self)
    }

    /// Declare a plain reference type.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateType`] if the name is taken.
    pub fn declare_type(&mut self, decl: TypeDecl) -> Result<&mut Self, RegistryError> {
        if self.edges.contains_key(&decl.name) {
            return Err(RegistryError::DuplicateType(decl.name));
        }
        self.edges.insert(decl.name, decl.supertypes);
        Ok(self)
    }

    /// Freeze the declarations, precomputing transitive supertypes.
    pub fn build(self) -> TypeRegistry {
        let ancestors = self
            .edges
            .keys()
            .map(|name| (name.clone(), collect_ancestors(name, &self.edges)))
            .collect();

        TypeRegistry {
            interfaces: self.interfaces,
            order: self.order,
            ancestors,
        }
    }
}

/// Breadth-first walk of the supertype edges. Tolerates cycles and
/// undeclared supertypes (which are recorded but not expanded).
fn collect_ancestors(
    start: &TypeName,
    edges: &HashMap<TypeName, Vec<TypeName>>,
) -> HashSet<TypeName> {
    let mut seen = HashSet::new();
    let mut queue: VecDeque<&TypeName> = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        for parent in edges.get(current).into_iter().flatten() {
            if parent != start && seen.insert(parent.clone()) {
                queue.push_back(parent);
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use eventforge_types::TypeShape;

    use super::*;

    fn registry() -> TypeRegistry {
        let mut builder = TypeRegistry::builder();
        let declared = builder
            .declare_type(TypeDecl::new("Entity", ["Identifiable"]))
            .and_then(|b| b.declare_type(TypeDecl::new("Living", ["Entity"])))
            .and_then(|b| b.declare_type(TypeDecl::new("Player", ["Living", "User"])))
            .and_then(|b| {
                b.declare_interface(
                    InterfaceDef::new("TargetPlayerEvent")
                        .extends("TargetEntityEvent")
                        .accessor("getTargetEntity", TypeShape::reference("Player")),
                )
            })
            .and_then(|b| b.declare_interface(InterfaceDef::new("TargetEntityEvent").extends("Event")));
        assert!(declared.is_ok());
        builder.build()
    }

    #[test]
    fn assignability_is_transitive() {
        let registry = registry();
        assert!(registry.is_assignable("Player", "Entity"));
        assert!(registry.is_assignable("Player", "Identifiable"));
        assert!(registry.is_assignable("Player", "User"));
        assert!(!registry.is_assignable("Entity", "Player"));
    }

    #[test]
    fn everything_is_an_object() {
        let registry = registry();
        assert!(registry.is_assignable("Player", OBJECT));
        assert!(registry.is_assignable("Undeclared", OBJECT));
        assert!(registry.is_assignable("Undeclared", "Undeclared"));
        assert!(!registry.is_assignable("Undeclared", "Entity"));
    }

    #[test]
    fn interfaces_participate_in_the_hierarchy() {
        let registry = registry();
        assert!(registry.is_assignable("TargetPlayerEvent", "Event"));
        assert_eq!(registry.interface_count(), 2);
        let names: Vec<_> = registry.interfaces().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["TargetPlayerEvent", "TargetEntityEvent"]);
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut builder = TypeRegistry::builder();
        assert!(builder.declare_interface(InterfaceDef::new("A")).is_ok());
        assert!(matches!(
            builder.declare_interface(InterfaceDef::new("A")),
            Err(RegistryError::DuplicateInterface(_))
        ));
        assert!(matches!(
            builder.declare_type(TypeDecl::new("A", Vec::<TypeName>::new())),
            Err(RegistryError::DuplicateType(_))
        ));
    }

    #[test]
    fn cycles_terminate() {
        let mut builder = TypeRegistry::builder();
        let declared = builder
            .declare_type(TypeDecl::new("A", ["B"]))
            .and_then(|b| b.declare_type(TypeDecl::new("B", ["A"])));
        assert!(declared.is_ok());
        let registry = builder.build();
        assert!(registry.is_assignable("A", "B"));
        assert!(registry.is_assignable("B", "A"));
    }

    #[test]
    fn parses_yaml_catalogue() {
        let yaml = r"
types:
  - name: Player
    supertypes: [Entity]
interfaces:
  - name: TargetEntityEvent
    methods:
      - name: getTargetEntity
        returns: Entity
";
        let registry = TypeRegistry::parse_catalog(yaml);
        assert!(registry.is_ok(), "catalogue should parse: {registry:?}");
        let registry = registry.ok().unwrap_or_default();
        assert!(registry.interface("TargetEntityEvent").is_some());
        assert!(registry.is_assignable("Player", "Entity"));
    }
}
