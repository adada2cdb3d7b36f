//! Fetch-and-normalize for one creature, and the batch driver over an id list.

use std::path::Path;
use tracing::debug;

use crate::api::Catalog;
use crate::error::Result;
use crate::parser::{display_name, flatten_chain, parse_record};
use crate::store::{NormalizeSummary, Store};
use crate::ui::{Phase, Ui, FAILURE_MARKER};

/// Result of ingesting one id
#[derive(Debug, Clone, PartialEq)]
pub struct Ingested {
    pub id: i64,
    pub name: String,
    pub summary: NormalizeSummary,
}

/// Fetch one creature with its species and evolution chain, then store it.
///
/// All three requests complete before the database is opened, so a network
/// or decoding failure writes nothing.
pub fn ingest_one(catalog: &impl Catalog, db_path: &Path, id: u32) -> Result<Ingested> {
    let pokemon = catalog.fetch_pokemon(id)?;
    let species = catalog.fetch_species(&pokemon.species.url)?;
    let chain = catalog.fetch_evolution_chain(&species.evolution_chain.url)?;

    let record = parse_record(&pokemon, &species)?;
    let edges = flatten_chain(&chain.chain);

    let mut store = Store::open(db_path)?;
    let summary = store.upsert_creature(&record, &edges)?;

    Ok(Ingested {
        id: record.id,
        name: record.name,
        summary,
    })
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub inserted: Vec<Ingested>,
    pub failed: Vec<(u32, String)>,
    /// True if the UI asked to stop before every id was processed
    pub interrupted: bool,
}

impl BatchReport {
    /// Every requested id was processed and none failed
    pub fn is_complete(&self) -> bool {
        !self.interrupted && self.failed.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} inserted, {} failed",
            self.inserted.len(),
            self.failed.len()
        );
        if self.interrupted {
            line.push_str(" (stopped early)");
        }
        line
    }
}

/// Ingest every id in order. A failing id is reported and skipped.
pub fn populate(
    catalog: &impl Catalog,
    db_path: &Path,
    ids: &[u32],
    ui: &mut impl Ui,
) -> BatchReport {
    let mut report = BatchReport::default();
    let total = ids.len() as u64;

    ui.set_phase(Phase::Fetching);
    ui.set_info(format!("Writing to {}", db_path.display()));

    for (done, &id) in ids.iter().enumerate() {
        if ui.should_stop() {
            report.interrupted = true;
            break;
        }

        match ingest_one(catalog, db_path, id) {
            Ok(ingested) => {
                debug!(
                    id = ingested.id,
                    name = %ingested.name,
                    edges = ingested.summary.edges_stored,
                    "inserted"
                );
                ui.log(format!(
                    "Inserted {} (ID {})",
                    display_name(&ingested.name),
                    ingested.id
                ));
                report.inserted.push(ingested);
            }
            Err(e) => {
                debug!(id, error = %e, "failed to ingest");
                ui.log(format!("{} ID {}: {}", FAILURE_MARKER, id, e));
                report.failed.push((id, e.to_string()));
            }
        }

        ui.set_progress(done as u64 + 1, total, format!("Pokémon #{}", id));
    }

    ui.clear_progress();
    report
}
