//! Traits describing read-only world data and external collaborators.
//!
//! Oracles expose skill, buff, item and actor templates plus the world rules.
//! The movement agent stands in for the navigation mesh. The [`Env`]
//! aggregate bundles them so the engine reaches everything through one
//! explicit context instead of global lookups.
mod actors;
mod config;
mod error;
mod items;
mod movement;
mod skills;
mod snapshot;

pub use actors::{ActorOracle, ActorTemplate, TemplateSkill};
pub use config::{ConfigOracle, WorldRules};
pub use error::OracleError;
pub use items::{ItemBonuses, ItemCategory, ItemDefinition, ItemOracle, ItemUsage};
pub use movement::{MovementAgent, StraightLineAgent};
pub use skills::{
    AmmoCost, BuffDefinition, LinearF32, LinearU32, SkillDefinition, SkillEffect, SkillOracle,
};
pub use snapshot::ContentSnapshot;

/// Aggregates the read-only oracles and collaborators used by the engine.
pub struct Env<'a, S, I, A, C, M>
where
    S: SkillOracle + ?Sized,
    I: ItemOracle + ?Sized,
    A: ActorOracle + ?Sized,
    C: ConfigOracle + ?Sized,
    M: MovementAgent + ?Sized,
{
    skills: Option<&'a S>,
    items: Option<&'a I>,
    actors: Option<&'a A>,
    config: Option<&'a C>,
    movement: Option<&'a M>,
}

// Manual impls: a derive would require the oracle types themselves to be `Copy`.
impl<S, I, A, C, M> Clone for Env<'_, S, I, A, C, M>
where
    S: SkillOracle + ?Sized,
    I: ItemOracle + ?Sized,
    A: ActorOracle + ?Sized,
    C: ConfigOracle + ?Sized,
    M: MovementAgent + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, I, A, C, M> Copy for Env<'_, S, I, A, C, M>
where
    S: SkillOracle + ?Sized,
    I: ItemOracle + ?Sized,
    A: ActorOracle + ?Sized,
    C: ConfigOracle + ?Sized,
    M: MovementAgent + ?Sized,
{
}

pub type GameEnv<'a> = Env<
    'a,
    dyn SkillOracle + 'a,
    dyn ItemOracle + 'a,
    dyn ActorOracle + 'a,
    dyn ConfigOracle + 'a,
    dyn MovementAgent + 'a,
>;

impl<'a, S, I, A, C, M> Env<'a, S, I, A, C, M>
where
    S: SkillOracle + ?Sized,
    I: ItemOracle + ?Sized,
    A: ActorOracle + ?Sized,
    C: ConfigOracle + ?Sized,
    M: MovementAgent + ?Sized,
{
    pub fn new(
        skills: Option<&'a S>,
        items: Option<&'a I>,
        actors: Option<&'a A>,
        config: Option<&'a C>,
        movement: Option<&'a M>,
    ) -> Self {
        Self {
            skills,
            items,
            actors,
            config,
            movement,
        }
    }

    pub fn with_all(
        skills: &'a S,
        items: &'a I,
        actors: &'a A,
        config: &'a C,
        movement: &'a M,
    ) -> Self {
        Self::new(
            Some(skills),
            Some(items),
            Some(actors),
            Some(config),
            Some(movement),
        )
    }

    pub fn empty() -> Self {
        Self {
            skills: None,
            items: None,
            actors: None,
            config: None,
            movement: None,
        }
    }

    /// # Errors
    ///
    /// Returns `OracleError::SkillsNotAvailable` if no skill oracle was provided.
    pub fn skills(&self) -> Result<&'a S, OracleError> {
        self.skills.ok_or(OracleError::SkillsNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::ItemsNotAvailable` if no item oracle was provided.
    pub fn items(&self) -> Result<&'a I, OracleError> {
        self.items.ok_or(OracleError::ItemsNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::ActorsNotAvailable` if no actor oracle was provided.
    pub fn actors(&self) -> Result<&'a A, OracleError> {
        self.actors.ok_or(OracleError::ActorsNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::ConfigNotAvailable` if no config oracle was provided.
    pub fn config(&self) -> Result<&'a C, OracleError> {
        self.config.ok_or(OracleError::ConfigNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::MovementNotAvailable` if no movement agent was provided.
    pub fn movement(&self) -> Result<&'a M, OracleError> {
        self.movement.ok_or(OracleError::MovementNotAvailable)
    }

    /// Shortcut for `config()?.rules()`.
    pub fn rules(&self) -> Result<&'a WorldRules, OracleError> {
        Ok(self.config()?.rules())
    }

    /// Resolves a skill template by name.
    pub fn skill(&self, name: &str) -> Result<&'a SkillDefinition, OracleError> {
        self.skills()?
            .skill(name)
            .ok_or_else(|| OracleError::SkillNotFound(name.to_string()))
    }

    /// Resolves a buff template by name.
    pub fn buff(&self, name: &str) -> Result<&'a BuffDefinition, OracleError> {
        self.skills()?
            .buff(name)
            .ok_or_else(|| OracleError::BuffNotFound(name.to_string()))
    }

    /// Resolves an item template by name.
    pub fn item(&self, name: &str) -> Result<&'a ItemDefinition, OracleError> {
        self.items()?
            .item(name)
            .ok_or_else(|| OracleError::ItemNotFound(name.to_string()))
    }

    /// Resolves an actor template by name.
    pub fn template(&self, name: &str) -> Result<&'a ActorTemplate, OracleError> {
        self.actors()?
            .template(name)
            .ok_or_else(|| OracleError::ActorTemplateNotFound(name.to_string()))
    }
}

impl<'a, S, I, A, C, M> Env<'a, S, I, A, C, M>
where
    S: SkillOracle + 'a,
    I: ItemOracle + 'a,
    A: ActorOracle + 'a,
    C: ConfigOracle + 'a,
    M: MovementAgent + 'a,
{
    /// Converts this environment into a trait-object based `GameEnv`.
    pub fn as_game_env(&self) -> GameEnv<'a> {
        let skills: Option<&'a dyn SkillOracle> = self.skills.map(|skills| skills as _);
        let items: Option<&'a dyn ItemOracle> = self.items.map(|items| items as _);
        let actors: Option<&'a dyn ActorOracle> = self.actors.map(|actors| actors as _);
        let config: Option<&'a dyn ConfigOracle> = self.config.map(|config| config as _);
        let movement: Option<&'a dyn MovementAgent> = self.movement.map(|agent| agent as _);
        Env::new(skills, items, actors, config, movement)
    }
}
