//! Item templates.

/// Closed set of item categories. Equipment slots accept exactly one category.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ItemCategory {
    Weapon,
    Head,
    Chest,
    Legs,
    Shield,
    Ammo,
    Potion,
    Material,
}

impl ItemCategory {
    pub const fn is_equipment(self) -> bool {
        matches!(
            self,
            Self::Weapon | Self::Head | Self::Chest | Self::Legs | Self::Shield
        )
    }
}

/// Stat bonuses granted while an item is equipped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ItemBonuses {
    pub health_max: u32,
    pub mana_max: u32,
    pub damage: u32,
    pub defense: u32,
}

/// Effect of using an item from the inventory. One unit is consumed per use.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemUsage {
    Restore { health: u32, mana: u32 },
    GrantBuff { buff: String, level: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub name: String,
    pub category: ItemCategory,
    pub max_stack: u16,
    #[cfg_attr(feature = "serde", serde(default))]
    pub buy_price: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sell_price: u64,
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub sellable: bool,
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub destroyable: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bonuses: ItemBonuses,
    #[cfg_attr(feature = "serde", serde(default))]
    pub usage: Option<ItemUsage>,
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

/// Lookup of item templates by name.
pub trait ItemOracle: Send + Sync {
    fn item(&self, name: &str) -> Option<&ItemDefinition>;
}
