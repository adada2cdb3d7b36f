//! Table schema definitions for the Pokédex store

use super::types::*;

// =============================================================================
// Entity Tables
// =============================================================================

pub static POKEMON: TableSchema = TableSchema {
    name: "pokemon",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text).unique(),
        Column::required("height", ColumnType::Integer),
        Column::required("weight", ColumnType::Integer),
        Column::new("male_percentage", ColumnType::Real),
        Column::new("female_percentage", ColumnType::Real),
    ],
    primary_key: &["id"],
    foreign_keys: &[],
    checks: &["(male_percentage IS NULL) = (female_percentage IS NULL)"],
};

pub static TYPE: TableSchema = TableSchema {
    name: "type",
    columns: &[Column::required("name", ColumnType::Text)],
    primary_key: &["name"],
    foreign_keys: &[],
    checks: &[],
};

pub static ABILITY: TableSchema = TableSchema {
    name: "ability",
    columns: &[Column::required("name", ColumnType::Text)],
    primary_key: &["name"],
    foreign_keys: &[],
    checks: &[],
};

pub static HELD_ITEM: TableSchema = TableSchema {
    name: "held_item",
    columns: &[Column::required("name", ColumnType::Text)],
    primary_key: &["name"],
    foreign_keys: &[],
    checks: &[],
};

// =============================================================================
// Junction Tables
// =============================================================================

pub static POKEMON_TYPE: TableSchema = TableSchema {
    name: "pokemon_type",
    columns: &[
        Column::required("pokemon_id", ColumnType::Integer),
        Column::required("type_name", ColumnType::Text),
    ],
    primary_key: &["pokemon_id", "type_name"],
    foreign_keys: &[
        ForeignKey::creature("pokemon_id"),
        ForeignKey::tag("type_name", "type"),
    ],
    checks: &[],
};

pub static POKEMON_ABILITY: TableSchema = TableSchema {
    name: "pokemon_ability",
    columns: &[
        Column::required("pokemon_id", ColumnType::Integer),
        Column::required("ability_name", ColumnType::Text),
    ],
    primary_key: &["pokemon_id", "ability_name"],
    foreign_keys: &[
        ForeignKey::creature("pokemon_id"),
        ForeignKey::tag("ability_name", "ability"),
    ],
    checks: &[],
};

pub static POKEMON_HELD_ITEM: TableSchema = TableSchema {
    name: "pokemon_held_item",
    columns: &[
        Column::required("pokemon_id", ColumnType::Integer),
        Column::required("item_name", ColumnType::Text),
    ],
    primary_key: &["pokemon_id", "item_name"],
    foreign_keys: &[
        ForeignKey::creature("pokemon_id"),
        ForeignKey::tag("item_name", "held_item"),
    ],
    checks: &[],
};

// =============================================================================
// Per-creature Attribute Tables
// =============================================================================

pub static STATS: TableSchema = TableSchema {
    name: "stats",
    columns: &[
        Column::required("pokemon_id", ColumnType::Integer),
        Column::required("stat_name", ColumnType::Text),
        Column::required("base_stat", ColumnType::Integer),
    ],
    primary_key: &["pokemon_id", "stat_name"],
    foreign_keys: &[ForeignKey::creature("pokemon_id")],
    checks: &[],
};

/// Keyed on (pokemon_id, evolves_to_id) only: a second trigger condition for
/// the same pair is ignored.
pub static EVOLUTIONS: TableSchema = TableSchema {
    name: "evolutions",
    columns: &[
        Column::required("pokemon_id", ColumnType::Integer),
        Column::required("evolves_to_id", ColumnType::Integer),
        Column::new("min_level", ColumnType::Integer),
        Column::new("trigger", ColumnType::Text),
        Column::new("item", ColumnType::Text),
    ],
    primary_key: &["pokemon_id", "evolves_to_id"],
    foreign_keys: &[
        ForeignKey::creature("pokemon_id"),
        ForeignKey::creature("evolves_to_id"),
    ],
    checks: &[],
};

// =============================================================================
// Table Registry
// =============================================================================

/// All tables, in declaration order
pub static ALL_TABLES: &[&TableSchema] = &[
    &POKEMON,
    &TYPE,
    &ABILITY,
    &HELD_ITEM,
    &POKEMON_TYPE,
    &POKEMON_ABILITY,
    &POKEMON_HELD_ITEM,
    &STATS,
    &EVOLUTIONS,
];

/// Get a table schema by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

/// Get all table names
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}
