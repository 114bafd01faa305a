//! Adapter from PokeAPI `/pokemon/{id}` documents to battle combatants.

use crate::error::ProviderError;
use crate::model::{Combatant, CombatantId, Stat};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct PokeApiPokemon {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    pub stats: Vec<BaseStat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: OtherSprites,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<Artwork>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Artwork {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BaseStat {
    pub base_stat: i64,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedResource {
    pub name: String,
}

impl PokeApiPokemon {
    pub fn from_json(raw: &str) -> Result<Self, ProviderError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Official artwork, falling back to the default sprite.
    pub fn image_url(&self) -> String {
        self.sprites
            .other
            .official_artwork
            .as_ref()
            .and_then(|art| art.front_default.clone())
            .or_else(|| self.sprites.front_default.clone())
            .unwrap_or_default()
    }

    /// `hp` comes from the `hp` base stat; every base stat (hp included)
    /// is carried into the stat list under its PokeAPI name.
    pub fn into_combatant(self) -> Result<Combatant, ProviderError> {
        let hp = self
            .stats
            .iter()
            .find(|s| s.stat.name == "hp")
            .map(|s| s.base_stat)
            .ok_or_else(|| ProviderError::MissingHp(self.name.clone()))?;
        let image_url = self.image_url();
        Ok(Combatant {
            id: CombatantId::Dex(self.id),
            name: self.name,
            image_url,
            types: self.types.into_iter().map(|t| t.kind.name).collect(),
            hp,
            stats: self
                .stats
                .into_iter()
                .map(|s| Stat::new(s.stat.name, s.base_stat))
                .collect(),
        })
    }
}
