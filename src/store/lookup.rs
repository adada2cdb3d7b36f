use rusqlite::{params, OptionalExtension};

use super::sqlite::Store;
use crate::error::Result;
use crate::parser::{display_name, Gender, StatValue};

/// An outgoing evolution as shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionView {
    pub target_id: i64,
    /// Display name of the target, or `ID <n>` if it cannot be resolved
    pub target: String,
    pub min_level: Option<i64>,
    pub trigger: Option<String>,
    pub item: Option<String>,
}

/// Everything stored about one creature
#[derive(Debug, Clone, PartialEq)]
pub struct CreatureView {
    pub id: i64,
    pub name: String,
    pub height: i64,
    pub weight: i64,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub stats: Vec<StatValue>,
    pub gender: Gender,
    pub held_items: Vec<String>,
    pub evolutions: Vec<EvolutionView>,
}

impl Store {
    /// Assemble the view of one creature, `None` if the id is not stored
    pub fn lookup(&self, id: i64) -> Result<Option<CreatureView>> {
        let scalars = self
            .conn
            .query_row(
                "SELECT id, name, height, weight, male_percentage, female_percentage
                 FROM pokemon WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, Option<f64>>(4)?,
                        row.get::<_, Option<f64>>(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, name, height, weight, male, female)) = scalars else {
            return Ok(None);
        };

        Ok(Some(CreatureView {
            id,
            name,
            height,
            weight,
            types: self.names(
                "SELECT type_name FROM pokemon_type WHERE pokemon_id = ?1 ORDER BY rowid",
                id,
            )?,
            abilities: self.names(
                "SELECT ability_name FROM pokemon_ability WHERE pokemon_id = ?1 ORDER BY rowid",
                id,
            )?,
            stats: self.stats(id)?,
            gender: Gender::from_percentages(male, female),
            held_items: self.names(
                "SELECT item_name FROM pokemon_held_item WHERE pokemon_id = ?1 ORDER BY rowid",
                id,
            )?,
            evolutions: self.evolutions(id)?,
        }))
    }

    fn names(&self, sql: &str, id: i64) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let names = stmt
            .query_map(params![id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    fn stats(&self, id: i64) -> Result<Vec<StatValue>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT stat_name, base_stat FROM stats WHERE pokemon_id = ?1 ORDER BY rowid",
        )?;
        let stats = stmt
            .query_map(params![id], |row| {
                Ok(StatValue {
                    name: row.get(0)?,
                    value: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(stats)
    }

    fn evolutions(&self, id: i64) -> Result<Vec<EvolutionView>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT e.evolves_to_id, p.name, e.min_level, e.trigger, e.item
             FROM evolutions e
             LEFT JOIN pokemon p ON p.id = e.evolves_to_id
             WHERE e.pokemon_id = ?1
             ORDER BY e.rowid",
        )?;
        let evolutions = stmt
            .query_map(params![id], |row| {
                let target_id: i64 = row.get(0)?;
                let target_name: Option<String> = row.get(1)?;
                Ok(EvolutionView {
                    target_id,
                    target: target_name
                        .map(|name| display_name(&name))
                        .unwrap_or_else(|| format!("ID {}", target_id)),
                    min_level: row.get(2)?,
                    trigger: row.get(3)?,
                    item: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(evolutions)
    }
}
