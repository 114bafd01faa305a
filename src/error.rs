//! Error types raised when a battle cannot be set up.

use thiserror::Error;

/// A combatant record that cannot take part in a battle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidCombatantError {
    #[error("{name} cannot start battle: hp must be positive, got {hp}")]
    NonPositiveHp { name: String, hp: i64 },

    #[error("{name} cannot start battle: missing required stat `{stat}`")]
    MissingStat { name: String, stat: &'static str },

    #[error("{name} cannot start battle: stat `{stat}` is negative ({value})")]
    NegativeStat {
        name: String,
        stat: String,
        value: i64,
    },
}

/// Errors converting a provider document into a combatant.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("pokemon {0} has no `hp` base stat")]
    MissingHp(String),

    #[error("malformed pokemon document: {0}")]
    Json(#[from] serde_json::Error),
}
