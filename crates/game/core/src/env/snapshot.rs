//! In-memory content bundle implementing every oracle trait.
//!
//! Content loaders build one of these once at startup; the runtime shares it
//! behind an `Arc`, and the client uses the same bundle for prediction.

use std::collections::BTreeMap;

use super::{
    ActorOracle, ActorTemplate, BuffDefinition, ConfigOracle, ItemDefinition, ItemOracle,
    SkillDefinition, SkillOracle, WorldRules,
};

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentSnapshot {
    pub skills: BTreeMap<String, SkillDefinition>,
    pub buffs: BTreeMap<String, BuffDefinition>,
    pub items: BTreeMap<String, ItemDefinition>,
    pub templates: BTreeMap<String, ActorTemplate>,
    pub rules: WorldRules,
}

impl ContentSnapshot {
    pub fn new(
        skills: impl IntoIterator<Item = SkillDefinition>,
        buffs: impl IntoIterator<Item = BuffDefinition>,
        items: impl IntoIterator<Item = ItemDefinition>,
        templates: impl IntoIterator<Item = ActorTemplate>,
        rules: WorldRules,
    ) -> Self {
        Self {
            skills: skills.into_iter().map(|s| (s.name.clone(), s)).collect(),
            buffs: buffs.into_iter().map(|b| (b.name.clone(), b)).collect(),
            items: items.into_iter().map(|i| (i.name.clone(), i)).collect(),
            templates: templates.into_iter().map(|t| (t.name.clone(), t)).collect(),
            rules,
        }
    }

    /// Names referenced by templates that do not resolve to a definition.
    ///
    /// Loaders call this once after assembling the bundle so broken content is
    /// reported at startup instead of surfacing as rejected casts.
    pub fn dangling_references(&self) -> Vec<String> {
        let mut missing = Vec::new();
        for template in self.templates.values() {
            for skill in &template.skills {
                if !self.skills.contains_key(&skill.name) {
                    missing.push(format!("{}: skill '{}'", template.name, skill.name));
                }
            }
            for stack in template.loot_items.iter().chain(&template.starting_items) {
                if !self.items.contains_key(&stack.item) {
                    missing.push(format!("{}: item '{}'", template.name, stack.item));
                }
            }
            for item in &template.shop {
                if !self.items.contains_key(item) {
                    missing.push(format!("{}: shop item '{}'", template.name, item));
                }
            }
        }
        for skill in self.skills.values() {
            if let super::SkillEffect::SelfBuff { buff } | super::SkillEffect::TargetBuff { buff } =
                &skill.effect
                && !self.buffs.contains_key(buff)
            {
                missing.push(format!("{}: buff '{}'", skill.name, buff));
            }
        }
        for name in [&self.rules.offender_buff, &self.rules.murderer_buff] {
            if !self.buffs.contains_key(name) {
                missing.push(format!("rules: buff '{name}'"));
            }
        }
        missing
    }
}

impl SkillOracle for ContentSnapshot {
    fn skill(&self, name: &str) -> Option<&SkillDefinition> {
        self.skills.get(name)
    }

    fn buff(&self, name: &str) -> Option<&BuffDefinition> {
        self.buffs.get(name)
    }
}

impl ItemOracle for ContentSnapshot {
    fn item(&self, name: &str) -> Option<&ItemDefinition> {
        self.items.get(name)
    }
}

impl ActorOracle for ContentSnapshot {
    fn template(&self, name: &str) -> Option<&ActorTemplate> {
        self.templates.get(name)
    }
}

impl ConfigOracle for ContentSnapshot {
    fn rules(&self) -> &WorldRules {
        &self.rules
    }
}
