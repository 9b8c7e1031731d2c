use super::ResourceKind;

/// A belongs-to relationship whose target type is chosen per record by a
/// discriminator field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolymorphicBelongsTo {
    pub name: String,
    pub foreign_key: String,
    pub discriminator: String,
    /// Restricts the targets; `None` accepts every registered type.
    pub targets: Option<Vec<ResourceKind>>,
}

impl PolymorphicBelongsTo {
    pub fn new(name: &str, foreign_key: &str, discriminator: &str) -> Self {
        Self {
            name: name.to_string(),
            foreign_key: foreign_key.to_string(),
            discriminator: discriminator.to_string(),
            targets: None,
        }
    }

    pub fn with_targets(mut self, targets: impl IntoIterator<Item = ResourceKind>) -> Self {
        self.targets = Some(targets.into_iter().collect());
        self
    }

    pub fn allows(&self, kind: ResourceKind) -> bool {
        self.targets
            .as_ref()
            .is_none_or(|targets| targets.contains(&kind))
    }
}

/// A resource type exposed over the API together with its relationships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceType {
    pub kind: ResourceKind,
    pub relationships: Vec<PolymorphicBelongsTo>,
}

impl ResourceType {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            relationships: Vec::new(),
        }
    }

    pub fn belongs_to_polymorphic(mut self, relationship: PolymorphicBelongsTo) -> Self {
        self.relationships.push(relationship);
        self
    }

    pub fn relationship(&self, name: &str) -> Option<&PolymorphicBelongsTo> {
        self.relationships.iter().find(|r| r.name == name)
    }

    /// Foreign-key and discriminator fields, hidden from `attributes`.
    pub fn linkage_fields(&self) -> impl Iterator<Item = &str> {
        self.relationships
            .iter()
            .flat_map(|r| [r.foreign_key.as_str(), r.discriminator.as_str()])
    }
}

/// Registered resource types, built once at start-up and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    types: Vec<ResourceType>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type, replacing an earlier registration of the same kind.
    pub fn register(mut self, resource: ResourceType) -> Self {
        self.types.retain(|t| t.kind != resource.kind);
        self.types.push(resource);
        self
    }

    /// `post` owning nothing, `fileModel` belonging to a polymorphic `parent`.
    pub fn with_default_types() -> Self {
        Self::new()
            .register(ResourceType::new(ResourceKind::Post))
            .register(
                ResourceType::new(ResourceKind::FileModel).belongs_to_polymorphic(
                    PolymorphicBelongsTo::new("parent", "parentId", "parentType"),
                ),
            )
    }

    pub fn get(&self, kind: ResourceKind) -> Option<&ResourceType> {
        self.types.iter().find(|t| t.kind == kind)
    }

    /// Looks a type up by its plural JSON:API name, as used in URLs and
    /// resource identifiers.
    pub fn by_type_name(&self, name: &str) -> Option<&ResourceType> {
        self.types.iter().find(|t| t.kind.type_name() == name)
    }

    /// Looks a type up by a discriminator value. Both the model name and
    /// the plural type name match; comparison is exact.
    pub fn by_discriminator(&self, value: &str) -> Option<&ResourceType> {
        self.types
            .iter()
            .find(|t| t.kind.model_name() == value || t.kind.type_name() == value)
    }

    pub fn types(&self) -> impl Iterator<Item = &ResourceType> {
        self.types.iter()
    }
}
