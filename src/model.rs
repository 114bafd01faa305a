use crate::error::{InvalidCombatantError, ProviderError};
use crate::provider::PokeApiPokemon;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

pub const ATTACK: &str = "attack";
pub const DEFENSE: &str = "defense";
pub const SPEED: &str = "speed";

const REQUIRED_STATS: [&str; 3] = [ATTACK, DEFENSE, SPEED];

/// Dex number for catalog creatures, free-form id for custom ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CombatantId {
    Dex(u32),
    Custom(String),
}

impl Default for CombatantId {
    fn default() -> Self {
        CombatantId::Custom(String::new())
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatantId::Dex(n) => write!(f, "#{n}"),
            CombatantId::Custom(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub name: String,
    pub value: i64,
}

impl Stat {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Stat {
            name: name.into(),
            value,
        }
    }
}

/// Whether `start_battle` insists on every stat the damage formula reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatPolicy {
    #[default]
    Strict,
    /// Missing attack/defense/speed read as 0.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combatant {
    #[serde(default)]
    pub id: CombatantId,
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub types: Vec<String>,
    pub hp: i64,
    #[serde(default)]
    pub stats: Vec<Stat>,
}

impl Combatant {
    pub fn new(name: impl Into<String>, hp: i64) -> Self {
        Combatant {
            id: CombatantId::default(),
            name: name.into(),
            image_url: String::new(),
            types: Vec::new(),
            hp,
            stats: Vec::new(),
        }
    }

    /// Builder-style helper; replaces an existing stat of the same name.
    pub fn with_stat(mut self, name: &str, value: i64) -> Self {
        match self.stats.iter_mut().find(|s| s.name == name) {
            Some(stat) => stat.value = value,
            None => self.stats.push(Stat::new(name, value)),
        }
        self
    }

    pub fn stat(&self, name: &str) -> Option<i64> {
        self.stats.iter().find(|s| s.name == name).map(|s| s.value)
    }

    /// Permissive lookup used by the damage formula.
    pub fn stat_or_zero(&self, name: &str) -> i64 {
        self.stat(name).unwrap_or(0)
    }

    pub fn validate(&self, policy: StatPolicy) -> Result<(), InvalidCombatantError> {
        if self.hp <= 0 {
            return Err(InvalidCombatantError::NonPositiveHp {
                name: self.name.clone(),
                hp: self.hp,
            });
        }
        if policy == StatPolicy::Strict {
            let missing = REQUIRED_STATS
                .iter()
                .copied()
                .find(|s| self.stat(s).is_none());
            if let Some(stat) = missing {
                return Err(InvalidCombatantError::MissingStat {
                    name: self.name.clone(),
                    stat,
                });
            }
        }
        for stat in REQUIRED_STATS {
            match self.stat(stat) {
                Some(value) if value < 0 => {
                    return Err(InvalidCombatantError::NegativeStat {
                        name: self.name.clone(),
                        stat: stat.to_string(),
                        value,
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// One roster slot: either a ready combatant or a raw PokeAPI document.
///
/// Entries with a top-level `hp` are combatants; anything else is read as a
/// PokeAPI document, which keeps the field-level error of the chosen shape.
#[derive(Debug, Clone)]
pub enum RosterEntry {
    Combatant(Combatant),
    PokeApi(Box<PokeApiPokemon>),
}

impl<'de> Deserialize<'de> for RosterEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let entry = if value.get("hp").is_some() {
            serde_json::from_value(value).map(RosterEntry::Combatant)
        } else {
            serde_json::from_value(value).map(|doc| RosterEntry::PokeApi(Box::new(doc)))
        };
        entry.map_err(de::Error::custom)
    }
}

impl RosterEntry {
    pub fn into_combatant(self) -> Result<Combatant, ProviderError> {
        match self {
            RosterEntry::Combatant(c) => Ok(c),
            RosterEntry::PokeApi(doc) => doc.into_combatant(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RosterFile {
    pub combatants: Vec<RosterEntry>,
}
