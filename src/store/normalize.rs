//! Writes one creature into the normalized tables.
//!
//! Every step runs in its own transaction and is committed before the next
//! one starts. A failure leaves the earlier steps in place.

use rusqlite::{params, OptionalExtension, Transaction};
use tracing::debug;

use super::sqlite::Store;
use crate::error::Result;
use crate::parser::{CreatureRecord, EvolutionEdge};

/// Tag table, junction table and the junction's tag column
struct TagTables {
    tag: &'static str,
    junction: &'static str,
    column: &'static str,
}

const TYPE_TAGS: TagTables = TagTables {
    tag: "type",
    junction: "pokemon_type",
    column: "type_name",
};

const ABILITY_TAGS: TagTables = TagTables {
    tag: "ability",
    junction: "pokemon_ability",
    column: "ability_name",
};

const HELD_ITEM_TAGS: TagTables = TagTables {
    tag: "held_item",
    junction: "pokemon_held_item",
    column: "item_name",
};

/// Row counts produced by one normalization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeSummary {
    /// Junction rows that did not exist before
    pub tags_linked: usize,
    pub stats_written: usize,
    pub edges_stored: usize,
    /// Edges dropped because an endpoint is not in the store yet
    pub edges_skipped: usize,
}

impl Store {
    /// Upsert a creature and everything attached to it
    pub fn upsert_creature(
        &mut self,
        record: &CreatureRecord,
        edges: &[EvolutionEdge],
    ) -> Result<NormalizeSummary> {
        let mut summary = NormalizeSummary::default();

        let tx = self.conn.transaction()?;
        upsert_scalars(&tx, record)?;
        tx.commit()?;

        let tx = self.conn.transaction()?;
        summary.tags_linked += link_tags(&tx, record.id, &record.types, &TYPE_TAGS)?;
        summary.tags_linked += link_tags(&tx, record.id, &record.abilities, &ABILITY_TAGS)?;
        summary.tags_linked += link_tags(&tx, record.id, &record.held_items, &HELD_ITEM_TAGS)?;
        tx.commit()?;

        let tx = self.conn.transaction()?;
        summary.stats_written = upsert_stats(&tx, record)?;
        tx.commit()?;

        let tx = self.conn.transaction()?;
        let (stored, skipped) = insert_evolutions(&tx, edges)?;
        tx.commit()?;
        summary.edges_stored = stored;
        summary.edges_skipped = skipped;

        Ok(summary)
    }
}

fn upsert_scalars(tx: &Transaction, record: &CreatureRecord) -> Result<()> {
    tx.execute(
        "INSERT INTO pokemon (id, name, height, weight)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
             name = excluded.name,
             height = excluded.height,
             weight = excluded.weight",
        params![record.id, record.name, record.height, record.weight],
    )?;

    let (male, female) = record.gender.percentages();
    tx.execute(
        "UPDATE pokemon SET male_percentage = ?1, female_percentage = ?2 WHERE id = ?3",
        params![male, female, record.id],
    )?;

    Ok(())
}

fn link_tags(
    tx: &Transaction,
    creature_id: i64,
    names: &[String],
    tables: &TagTables,
) -> Result<usize> {
    let mut insert_tag =
        tx.prepare_cached(&format!("INSERT OR IGNORE INTO {} (name) VALUES (?1)", tables.tag))?;
    let mut insert_link = tx.prepare_cached(&format!(
        "INSERT OR IGNORE INTO {} (pokemon_id, {}) VALUES (?1, ?2)",
        tables.junction, tables.column
    ))?;

    let mut linked = 0;
    for name in names {
        insert_tag.execute(params![name])?;
        linked += insert_link.execute(params![creature_id, name])?;
    }

    Ok(linked)
}

fn upsert_stats(tx: &Transaction, record: &CreatureRecord) -> Result<usize> {
    let mut stmt = tx.prepare_cached(
        "INSERT INTO stats (pokemon_id, stat_name, base_stat)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(pokemon_id, stat_name) DO UPDATE SET base_stat = excluded.base_stat",
    )?;

    for stat in &record.stats {
        stmt.execute(params![record.id, stat.name, stat.value])?;
    }

    Ok(record.stats.len())
}

fn creature_id_by_name(tx: &Transaction, name: &str) -> Result<Option<i64>> {
    let id = tx
        .query_row("SELECT id FROM pokemon WHERE name = ?1", params![name], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(id)
}

/// Store edges whose endpoints both exist. Only the first condition of a
/// (from, to) pair is kept.
fn insert_evolutions(tx: &Transaction, edges: &[EvolutionEdge]) -> Result<(usize, usize)> {
    let mut stored = 0;
    let mut skipped = 0;

    for edge in edges {
        let from_id = creature_id_by_name(tx, &edge.from)?;
        let to_id = creature_id_by_name(tx, &edge.to)?;

        let (from_id, to_id) = match (from_id, to_id) {
            (Some(from_id), Some(to_id)) => (from_id, to_id),
            _ => {
                debug!(from = %edge.from, to = %edge.to, "skipping evolution with unknown endpoint");
                skipped += 1;
                continue;
            }
        };

        let mut stmt = tx.prepare_cached(
            "INSERT OR IGNORE INTO evolutions (pokemon_id, evolves_to_id, min_level, trigger, item)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for condition in &edge.conditions {
            stored += stmt.execute(params![
                from_id,
                to_id,
                condition.min_level,
                condition.trigger,
                condition.item
            ])?;
        }
    }

    Ok((stored, skipped))
}
