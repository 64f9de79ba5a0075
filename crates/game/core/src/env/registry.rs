//! Explicit template registry.
//!
//! Built once at startup (usually by the content loaders) and handed to the
//! engine through [`GameEnv`](super::GameEnv). Nothing in the simulation looks
//! templates up through global state.

use std::collections::HashMap;

use super::{
    ArchetypeOracle, ArchetypeTemplate, ItemOracle, ItemTemplate, OracleError, SkillOracle,
    SkillTemplate,
};

/// Item, skill, and archetype templates keyed by their unique names.
#[derive(Clone, Debug, Default)]
pub struct TemplateRegistry {
    items: HashMap<String, ItemTemplate>,
    skills: HashMap<String, SkillTemplate>,
    archetypes: HashMap<String, ArchetypeTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an item template. Names must be unique.
    pub fn add_item(&mut self, template: ItemTemplate) -> Result<(), OracleError> {
        insert_unique(&mut self.items, template.name.clone(), template)
    }

    /// Registers a skill template. Names must be unique.
    pub fn add_skill(&mut self, template: SkillTemplate) -> Result<(), OracleError> {
        insert_unique(&mut self.skills, template.name.clone(), template)
    }

    /// Registers an archetype. Names must be unique.
    pub fn add_archetype(&mut self, template: ArchetypeTemplate) -> Result<(), OracleError> {
        insert_unique(&mut self.archetypes, template.name.clone(), template)
    }

    /// Removes an item template. Slots still holding it contribute nothing.
    pub fn remove_item(&mut self, name: &str) -> Option<ItemTemplate> {
        self.items.remove(name)
    }

    /// Checks that every skill referenced by an archetype exists.
    pub fn validate(&self) -> Result<(), OracleError> {
        for archetype in self.archetypes.values() {
            for skill in &archetype.skills {
                if !self.skills.contains_key(skill) {
                    return Err(OracleError::SkillNotFound(skill.clone()));
                }
            }
        }
        Ok(())
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    pub fn archetype_count(&self) -> usize {
        self.archetypes.len()
    }
}

fn insert_unique<T>(
    map: &mut HashMap<String, T>,
    name: String,
    template: T,
) -> Result<(), OracleError> {
    if map.contains_key(&name) {
        return Err(OracleError::DuplicateTemplate(name));
    }
    map.insert(name, template);
    Ok(())
}

impl ItemOracle for TemplateRegistry {
    fn item(&self, name: &str) -> Option<&ItemTemplate> {
        self.items.get(name)
    }
}

impl SkillOracle for TemplateRegistry {
    fn skill(&self, name: &str) -> Option<&SkillTemplate> {
        self.skills.get(name)
    }
}

impl ArchetypeOracle for TemplateRegistry {
    fn archetype(&self, name: &str) -> Option<&ArchetypeTemplate> {
        self.archetypes.get(name)
    }
}
