//! Repository layer for dynamic runtime data.
//!
//! Repositories persist data that CHANGES during gameplay, here the player
//! characters saved at logout and on autosave. Static game content (skills,
//! items, templates) is served by oracles, not repositories.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileCharacterRepository;
pub use memory::InMemoryCharacterRepo;
pub use traits::{CharacterRepository, SavedCharacter};

#[cfg(test)]
pub(crate) fn test_record(name: &str) -> realm_core::CharacterRecord {
    realm_core::CharacterRecord {
        name: name.to_string(),
        template: "Warrior".to_string(),
        level: 3,
        health: 80,
        mana: 20,
        position: realm_core::Position::new(4.0, -2.0),
        gold: 75,
        skill_points: 1,
        strength: 2,
        intelligence: 1,
        inventory: vec![None; 4],
        equipment: vec![None; 5],
        trash: None,
        skills: Vec::new(),
        buffs: Vec::new(),
    }
}
