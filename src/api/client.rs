use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::payload::{EvolutionChainPayload, PokemonPayload, SpeciesPayload};
use crate::error::{IngestError, Result};

pub const DEFAULT_API_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of the three payloads needed to ingest one creature.
///
/// The species and evolution-chain lookups take the URL embedded in the
/// previous payload rather than an id.
pub trait Catalog {
    fn fetch_pokemon(&self, id: u32) -> Result<PokemonPayload>;
    fn fetch_species(&self, url: &str) -> Result<SpeciesPayload>;
    fn fetch_evolution_chain(&self, url: &str) -> Result<EvolutionChainPayload>;
}

/// Blocking HTTP client for PokeAPI
pub struct PokeApiClient {
    client: Client,
    base_url: String,
}

impl PokeApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("pokedex-to-sqlite/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| IngestError::transport("<client setup>", e))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// URL of the per-creature detail endpoint
    pub fn pokemon_url(&self, id: u32) -> String {
        format!("{}/pokemon/{}", self.base_url, id)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| IngestError::transport(url, e))?;

        let text = response
            .text()
            .map_err(|e| IngestError::transport(url, e))?;

        serde_json::from_str(&text).map_err(|e| IngestError::decode(what, e))
    }
}

impl Catalog for PokeApiClient {
    fn fetch_pokemon(&self, id: u32) -> Result<PokemonPayload> {
        let url = self.pokemon_url(id);
        self.get_json(&url, &format!("pokemon {}", id))
    }

    fn fetch_species(&self, url: &str) -> Result<SpeciesPayload> {
        self.get_json(url, "species")
    }

    fn fetch_evolution_chain(&self, url: &str) -> Result<EvolutionChainPayload> {
        self.get_json(url, "evolution chain")
    }
}
