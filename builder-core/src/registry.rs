use std::collections::HashMap;

use shared_types::BlockDefinition;

use crate::error::RegistryError;

/// Lookup of registered block types.
pub trait BlockRegistry {
    /// `Ok(None)` means the type is not registered.
    fn lookup(&self, block_type: &str) -> Result<Option<BlockDefinition>, RegistryError>;
}

/// In-memory registry for hosts that register every type up front
#[derive(Debug, Clone, Default)]
pub struct StaticBlockRegistry {
    definitions: HashMap<String, BlockDefinition>,
}

impl StaticBlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: BlockDefinition) {
        self.definitions
            .insert(definition.block_type.clone(), definition);
    }

    pub fn with(mut self, definition: BlockDefinition) -> Self {
        self.register(definition);
        self
    }

    pub fn definitions(&self) -> impl Iterator<Item = &BlockDefinition> {
        self.definitions.values()
    }
}

impl BlockRegistry for StaticBlockRegistry {
    fn lookup(&self, block_type: &str) -> Result<Option<BlockDefinition>, RegistryError> {
        Ok(self.definitions.get(block_type).cloned())
    }
}

impl FromIterator<BlockDefinition> for StaticBlockRegistry {
    fn from_iter<T: IntoIterator<Item = BlockDefinition>>(iter: T) -> Self {
        let mut registry = Self::new();
        for definition in iter {
            registry.register(definition);
        }
        registry
    }
}
