//! Serde models for the subset of PokeAPI payloads the pipeline consumes.
//!
//! Every other field of the upstream JSON is ignored.

use serde::Deserialize;

/// A `{ "name": ..., "url": ... }` reference to another resource
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// A bare `{ "url": ... }` reference
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ApiResource {
    pub url: String,
}

/// `GET /pokemon/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct PokemonPayload {
    pub id: i64,
    pub name: String,
    pub height: i64,
    pub weight: i64,
    pub types: Vec<TypeSlot>,
    pub abilities: Vec<AbilitySlot>,
    pub stats: Vec<StatEntry>,
    #[serde(default)]
    pub held_items: Vec<HeldItemEntry>,
    pub species: ApiResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatEntry {
    pub base_stat: i64,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeldItemEntry {
    pub item: NamedResource,
}

/// `GET /pokemon-species/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct SpeciesPayload {
    /// Eighths female, or -1 for genderless
    #[serde(default = "genderless_rate")]
    pub gender_rate: i64,
    pub evolution_chain: ApiResource,
}

fn genderless_rate() -> i64 {
    -1
}

/// `GET /evolution-chain/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct EvolutionChainPayload {
    pub chain: ChainLink,
}

/// One node of the evolution tree
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChainLink {
    pub species: NamedResource,
    /// How this node is reached from its parent; empty on the root
    #[serde(default)]
    pub evolution_details: Vec<EvolutionDetail>,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EvolutionDetail {
    #[serde(default)]
    pub min_level: Option<i64>,
    #[serde(default)]
    pub trigger: Option<NamedResource>,
    #[serde(default)]
    pub item: Option<NamedResource>,
}
