//! End-to-end tests of the fetch -> normalize -> lookup pipeline.
//!
//! The catalog is served from in-memory JSON fixtures shaped like PokeAPI
//! responses. The live API test is ignored by default:
//! ```sh
//! cargo test --test integration_test -- --ignored
//! ```

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rusqlite::types::Value as SqlValue;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

use pokedex_to_sqlite::api::{
    Catalog, EvolutionChainPayload, PokeApiClient, PokemonPayload, SpeciesPayload,
};
use pokedex_to_sqlite::error::{IngestError, Result};
use pokedex_to_sqlite::ingest::{ingest_one, populate};
use pokedex_to_sqlite::parser::{CreatureRecord, Gender};
use pokedex_to_sqlite::repl::run_prompt;
use pokedex_to_sqlite::schema::tables::ALL_TABLES;
use pokedex_to_sqlite::store::{initialize_schema, Store};
use pokedex_to_sqlite::ui::SilentUi;

/// Random seed for reproducible shuffles
const RANDOM_SEED: u64 = 42;

// =============================================================================
// Fixture Catalog
// =============================================================================

struct FixtureCatalog {
    pokemon: HashMap<u32, String>,
    species: HashMap<String, String>,
    chains: HashMap<String, String>,
}

fn decode<T: serde::de::DeserializeOwned>(raw: Option<&String>, what: String) -> Result<T> {
    let raw = raw.map(String::as_str).unwrap_or("");
    serde_json::from_str(raw).map_err(|e| IngestError::decode(what, e))
}

impl Catalog for FixtureCatalog {
    fn fetch_pokemon(&self, id: u32) -> Result<PokemonPayload> {
        decode(self.pokemon.get(&id), format!("pokemon {}", id))
    }

    fn fetch_species(&self, url: &str) -> Result<SpeciesPayload> {
        decode(self.species.get(url), "species".to_string())
    }

    fn fetch_evolution_chain(&self, url: &str) -> Result<EvolutionChainPayload> {
        decode(self.chains.get(url), "evolution chain".to_string())
    }
}

fn named(name: &str) -> Value {
    json!({ "name": name, "url": format!("fixture://{}", name) })
}

fn pokemon(id: u32, name: &str, types: &[&str], abilities: &[&str], held: &[&str]) -> Value {
    let stats = [("hp", 40 + id), ("attack", 50 + id), ("speed", 30 + id)];
    json!({
        "id": id,
        "name": name,
        "height": id * 3,
        "weight": id * 20,
        "types": types.iter().enumerate()
            .map(|(i, t)| json!({ "slot": i + 1, "type": named(t) }))
            .collect::<Vec<_>>(),
        "abilities": abilities.iter()
            .map(|a| json!({ "ability": named(a), "is_hidden": false }))
            .collect::<Vec<_>>(),
        "stats": stats.iter()
            .map(|(s, v)| json!({ "base_stat": v, "effort": 0, "stat": named(s) }))
            .collect::<Vec<_>>(),
        "held_items": held.iter()
            .map(|h| json!({ "item": named(h), "version_details": [] }))
            .collect::<Vec<_>>(),
        "species": { "name": name, "url": format!("fixture://species/{}", id) },
    })
}

fn species(gender_rate: i64, chain: u32) -> Value {
    json!({
        "gender_rate": gender_rate,
        "evolution_chain": { "url": format!("fixture://evolution-chain/{}", chain) },
    })
}

fn level_up(level: i64) -> Value {
    json!({ "min_level": level, "trigger": named("level-up"), "item": null })
}

fn use_item(item: &str) -> Value {
    json!({ "min_level": null, "trigger": named("use-item"), "item": named(item) })
}

fn link(name: &str, details: Vec<Value>, children: Vec<Value>) -> Value {
    json!({ "species": named(name), "evolution_details": details, "evolves_to": children })
}

static CATALOG: Lazy<FixtureCatalog> = Lazy::new(|| {
    let mut pokemon_map = HashMap::new();
    let mut species_map = HashMap::new();
    let mut chains = HashMap::new();

    let mut add = |id: u32, body: Value, species_body: Value| {
        pokemon_map.insert(id, body.to_string());
        species_map.insert(format!("fixture://species/{}", id), species_body.to_string());
    };

    add(1, pokemon(1, "bulbasaur", &["grass", "poison"], &["overgrow", "chlorophyll"], &[]), species(1, 1));
    add(2, pokemon(2, "ivysaur", &["grass", "poison"], &["overgrow", "chlorophyll"], &[]), species(1, 1));
    add(3, pokemon(3, "venusaur", &["grass", "poison"], &["overgrow", "chlorophyll"], &[]), species(1, 1));
    add(132, pokemon(132, "ditto", &["normal"], &["limber"], &["metal-powder", "quick-powder"]), species(-1, 132));
    add(133, pokemon(133, "eevee", &["normal"], &["run-away", "adaptability"], &[]), species(1, 67));
    add(134, pokemon(134, "vaporeon", &["water"], &["water-absorb"], &[]), species(1, 67));
    add(135, pokemon(135, "jolteon", &["electric"], &["volt-absorb"], &[]), species(1, 67));
    add(29, pokemon(29, "nidoran-f", &["poison"], &["poison-point"], &[]), species(8, 12));
    // Gender rate outside -1..=8
    add(501, pokemon(501, "oddity", &["normal"], &[], &[]), species(12, 132));
    // Species points at an evolution chain the catalog does not serve
    add(503, pokemon(503, "unchained", &["normal"], &[], &[]), species(4, 999));
    // Species url the catalog does not serve
    pokemon_map.insert(502, pokemon(502, "orphan", &["normal"], &[], &[]).to_string());
    // Missing "height" and "weight"
    pokemon_map.insert(
        500,
        json!({ "id": 500, "name": "broken", "types": [], "abilities": [], "stats": [],
                "species": { "name": "broken", "url": "fixture://species/500" } })
        .to_string(),
    );

    chains.insert(
        "fixture://evolution-chain/1".to_string(),
        json!({ "id": 1, "chain": link("bulbasaur", vec![], vec![
            link("ivysaur", vec![level_up(16)], vec![
                link("venusaur", vec![level_up(32)], vec![]),
            ]),
        ]) })
        .to_string(),
    );
    chains.insert(
        "fixture://evolution-chain/132".to_string(),
        json!({ "chain": link("ditto", vec![], vec![]) }).to_string(),
    );
    chains.insert(
        "fixture://evolution-chain/67".to_string(),
        json!({ "chain": link("eevee", vec![], vec![
            link("vaporeon", vec![use_item("water-stone")], vec![]),
            link("jolteon", vec![use_item("thunder-stone")], vec![]),
        ]) })
        .to_string(),
    );
    chains.insert(
        "fixture://evolution-chain/12".to_string(),
        json!({ "chain": link("nidoran-f", vec![], vec![
            link("nidorina", vec![level_up(16)], vec![]),
        ]) })
        .to_string(),
    );

    FixtureCatalog {
        pokemon: pokemon_map,
        species: species_map,
        chains,
    }
});

// =============================================================================
// Database Helpers
// =============================================================================

fn fresh_db() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("pokemon.db");
    initialize_schema(&path).expect("Failed to initialize schema");
    (dir, path)
}

fn ingest_all(db_path: &Path, ids: &[u32]) {
    for &id in ids {
        ingest_one(&*CATALOG, db_path, id).unwrap_or_else(|e| panic!("ingest {}: {}", id, e));
    }
}

/// Every row of every table, sorted
fn snapshot(db_path: &Path) -> Vec<(String, Vec<Vec<SqlValue>>)> {
    let store = Store::open(db_path).unwrap();
    let conn = store.connection();

    ALL_TABLES
        .iter()
        .map(|table| {
            let columns = table.column_names();
            let order: Vec<String> = (1..=columns.len()).map(|i| i.to_string()).collect();
            let sql = format!(
                "SELECT {} FROM {} ORDER BY {}",
                columns.join(", "),
                table.name,
                order.join(", ")
            );
            let mut stmt = conn.prepare(&sql).unwrap();
            let rows = stmt
                .query_map([], |row| {
                    (0..columns.len())
                        .map(|i| row.get::<_, SqlValue>(i))
                        .collect::<rusqlite::Result<Vec<_>>>()
                })
                .unwrap()
                .collect::<rusqlite::Result<Vec<_>>>()
                .unwrap();
            (table.name.to_string(), rows)
        })
        .collect()
}

fn evolution_pairs(db_path: &Path) -> Vec<(i64, i64)> {
    let store = Store::open(db_path).unwrap();
    let mut stmt = store
        .connection()
        .prepare("SELECT pokemon_id, evolves_to_id FROM evolutions ORDER BY 1, 2")
        .unwrap();
    stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<rusqlite::Result<Vec<_>>>()
        .unwrap()
}

fn count(db_path: &Path, table: &str) -> i64 {
    Store::open(db_path).unwrap().count_rows(table).unwrap()
}

// =============================================================================
// Normalization
// =============================================================================

#[test]
fn test_chain_in_forward_order() {
    let (_dir, db) = fresh_db();
    ingest_all(&db, &[1, 2, 3]);

    assert_eq!(evolution_pairs(&db), vec![(1, 2), (2, 3)]);
}

#[test]
fn test_chain_in_reverse_order() {
    let (_dir, db) = fresh_db();
    ingest_all(&db, &[3, 2, 1]);

    assert_eq!(evolution_pairs(&db), vec![(1, 2), (2, 3)]);
}

#[test]
fn test_edge_to_unfetched_creature_is_dropped() {
    let (_dir, db) = fresh_db();
    let ingested = ingest_one(&*CATALOG, &db, 1).unwrap();

    assert_eq!(ingested.summary.edges_stored, 0);
    assert_eq!(ingested.summary.edges_skipped, 2);
    assert!(evolution_pairs(&db).is_empty());
}

#[test]
fn test_no_backfill_when_target_arrives_standalone() {
    let (_dir, db) = fresh_db();
    ingest_all(&db, &[1]);

    // Ivysaur stored without its evolution chain
    let mut store = Store::open(&db).unwrap();
    let ivysaur = CreatureRecord {
        id: 2,
        name: "ivysaur".to_string(),
        height: 10,
        weight: 130,
        types: vec!["grass".to_string()],
        abilities: vec![],
        stats: vec![],
        held_items: vec![],
        gender: Gender::from_rate(1).unwrap(),
    };
    store.upsert_creature(&ivysaur, &[]).unwrap();
    drop(store);

    assert!(evolution_pairs(&db).is_empty());
}

#[test]
fn test_evolution_target_outside_catalog_is_dropped() {
    let (_dir, db) = fresh_db();
    ingest_all(&db, &[29]);

    assert!(evolution_pairs(&db).is_empty());
    let view = Store::open(&db).unwrap().lookup(29).unwrap().unwrap();
    assert_eq!(view.gender, Gender::Ratio { male: 0.0, female: 100.0 });
}

#[test]
fn test_renormalizing_is_idempotent() {
    let (_dir, db) = fresh_db();
    ingest_all(&db, &[1, 2, 3, 132]);
    let before = snapshot(&db);

    let again = ingest_one(&*CATALOG, &db, 2).unwrap();
    ingest_all(&db, &[1, 3, 132]);

    assert_eq!(again.summary.tags_linked, 0);
    assert_eq!(again.summary.edges_stored, 0);
    assert_eq!(snapshot(&db), before);
}

#[test]
fn test_tags_shared_across_creatures() {
    let (_dir, db) = fresh_db();
    ingest_all(&db, &[1, 2, 3]);

    assert_eq!(count(&db, "type"), 2);
    assert_eq!(count(&db, "ability"), 2);
    assert_eq!(count(&db, "pokemon_type"), 6);
    assert_eq!(count(&db, "pokemon_ability"), 6);
    assert_eq!(count(&db, "stats"), 9);
}

#[test]
fn test_insertion_order_does_not_change_final_state() {
    let family = [133, 134, 135];
    let (_dir, reference_db) = fresh_db();
    ingest_all(&reference_db, &family);
    let reference_edges = evolution_pairs(&reference_db);
    assert_eq!(reference_edges, vec![(133, 134), (133, 135)]);

    let mut rng = rand::rngs::StdRng::seed_from_u64(RANDOM_SEED);
    for _ in 0..5 {
        let mut order = family.to_vec();
        order.shuffle(&mut rng);

        let (_dir, db) = fresh_db();
        ingest_all(&db, &order);
        assert_eq!(evolution_pairs(&db), reference_edges, "order {:?}", order);
    }
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_malformed_payload_writes_nothing() {
    let (_dir, db) = fresh_db();
    let result = ingest_one(&*CATALOG, &db, 500);

    assert!(matches!(result, Err(IngestError::Decode { .. })));
    assert_eq!(count(&db, "pokemon"), 0);
}

#[test]
fn test_invalid_gender_rate_is_rejected() {
    let (_dir, db) = fresh_db();
    let result = ingest_one(&*CATALOG, &db, 501);

    assert!(matches!(
        result,
        Err(IngestError::InvalidField { field: "gender_rate", .. })
    ));
    assert_eq!(count(&db, "pokemon"), 0);
}

#[test]
fn test_missing_species_writes_nothing() {
    let (_dir, db) = fresh_db();
    let result = ingest_one(&*CATALOG, &db, 502);

    assert!(matches!(result, Err(IngestError::Decode { .. })));
    assert_eq!(count(&db, "pokemon"), 0);
    assert_eq!(count(&db, "type"), 0);
}

#[test]
fn test_missing_evolution_chain_writes_nothing() {
    let (_dir, db) = fresh_db();
    let result = ingest_one(&*CATALOG, &db, 503);

    assert!(matches!(result, Err(IngestError::Decode { .. })));
    assert_eq!(count(&db, "pokemon"), 0);
    assert_eq!(count(&db, "stats"), 0);
}

#[test]
fn test_batch_continues_past_missing_species_and_chain() {
    let (_dir, db) = fresh_db();
    let report = populate(&*CATALOG, &db, &[502, 503, 1], &mut SilentUi::new());

    let inserted: Vec<i64> = report.inserted.iter().map(|i| i.id).collect();
    let failed: Vec<u32> = report.failed.iter().map(|(id, _)| *id).collect();
    assert_eq!(inserted, vec![1]);
    assert_eq!(failed, vec![502, 503]);
    assert!(!report.is_complete());
    assert_eq!(count(&db, "pokemon"), 1);
}

#[test]
fn test_batch_continues_past_failures() {
    let (_dir, db) = fresh_db();
    let report = populate(&*CATALOG, &db, &[1, 500, 2, 9999], &mut SilentUi::new());

    let inserted: Vec<i64> = report.inserted.iter().map(|i| i.id).collect();
    let failed: Vec<u32> = report.failed.iter().map(|(id, _)| *id).collect();
    assert_eq!(inserted, vec![1, 2]);
    assert_eq!(failed, vec![500, 9999]);
    assert!(!report.interrupted);
    assert_eq!(report.summary(), "2 inserted, 2 failed");
    assert_eq!(evolution_pairs(&db), vec![(1, 2)]);
}

#[test]
fn test_unreachable_api_fails_each_id() {
    let (_dir, db) = fresh_db();
    let client = PokeApiClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
    let report = populate(&client, &db, &[1, 2], &mut SilentUi::new());

    assert!(report.inserted.is_empty());
    assert_eq!(report.failed.len(), 2);
    assert_eq!(count(&db, "pokemon"), 0);
}

// =============================================================================
// Lookup
// =============================================================================

#[test]
fn test_lookup_assembles_full_view() {
    let (_dir, db) = fresh_db();
    ingest_all(&db, &[133, 134, 135]);

    let view = Store::open(&db).unwrap().lookup(133).unwrap().unwrap();
    assert_eq!(view.name, "eevee");
    assert_eq!(view.height, 399);
    assert_eq!(view.types, vec!["normal"]);
    assert_eq!(view.abilities, vec!["run-away", "adaptability"]);
    let stat_names: Vec<&str> = view.stats.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(stat_names, vec!["hp", "attack", "speed"]);
    assert_eq!(view.gender, Gender::Ratio { male: 87.5, female: 12.5 });

    let targets: Vec<(&str, Option<&str>)> = view
        .evolutions
        .iter()
        .map(|e| (e.target.as_str(), e.item.as_deref()))
        .collect();
    assert_eq!(
        targets,
        vec![("Vaporeon", Some("water-stone")), ("Jolteon", Some("thunder-stone"))]
    );
}

#[test]
fn test_lookup_genderless_with_items() {
    let (_dir, db) = fresh_db();
    ingest_all(&db, &[132]);

    let view = Store::open(&db).unwrap().lookup(132).unwrap().unwrap();
    assert_eq!(view.gender, Gender::Genderless);
    assert_eq!(view.held_items, vec!["metal-powder", "quick-powder"]);
    assert!(view.evolutions.is_empty());
}

#[test]
fn test_lookup_missing_id() {
    let (_dir, db) = fresh_db();
    ingest_all(&db, &[1]);

    assert!(Store::open(&db).unwrap().lookup(150).unwrap().is_none());
}

#[test]
fn test_prompt_session() {
    let (_dir, db) = fresh_db();
    ingest_all(&db, &[1, 2]);

    let input = Cursor::new("pikachu\n1\n200\n3\nexit\n2\n");
    let mut output = Vec::new();
    run_prompt(input, &mut output, &db, 151).unwrap();
    let output = String::from_utf8(output).unwrap();

    assert!(output.contains("Invalid input. Please enter a number from 1 to 151 or 'exit'."));
    assert!(output.contains("ID: 1, Name: Bulbasaur, Height: 3, Weight: 20"));
    assert!(output.contains("  -> Ivysaur (Level 16, Trigger: level-up)"));
    assert!(output.contains("Only Pokémon IDs from 1 to 151 are allowed."));
    assert!(output.contains("No Pokémon found with ID 3"));
    assert!(output.contains("Program terminated."));
    // Input after `exit` is not read
    assert!(!output.contains("Name: Ivysaur"));
}

#[test]
fn test_prompt_stops_at_end_of_input() {
    let (_dir, db) = fresh_db();
    let mut output = Vec::new();
    run_prompt(Cursor::new("1\n"), &mut output, &db, 151).unwrap();

    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("No Pokémon found with ID 1"));
    assert!(!output.contains("Program terminated."));
}

// =============================================================================
// Live API
// =============================================================================

#[test]
#[ignore]
fn test_live_bulbasaur_family() {
    let (_dir, db) = fresh_db();
    let client = PokeApiClient::new(
        pokedex_to_sqlite::api::DEFAULT_API_URL,
        pokedex_to_sqlite::api::DEFAULT_TIMEOUT,
    )
    .unwrap();

    for id in [1, 2, 3] {
        ingest_one(&client, &db, id).expect("live ingest failed");
    }

    assert_eq!(evolution_pairs(&db), vec![(1, 2), (2, 3)]);
    let view = Store::open(&db).unwrap().lookup(1).unwrap().unwrap();
    assert_eq!(view.types, vec!["grass", "poison"]);
    assert_eq!(view.stats.len(), 6);
}
