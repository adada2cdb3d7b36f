use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

use super::schema_gen::{generate_create_table, generate_indexes};
use crate::error::{IngestError, Result};
use crate::schema::DependencyResolver;

/// An open handle on the Pokédex database.
///
/// Each unit of work opens its own `Store`; the connection closes when it
/// is dropped.
pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    /// Open (creating if needed) the database file
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::configure(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(conn)
    }

    fn configure(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;",
        )?;
        Ok(Self { conn })
    }

    /// Create any missing tables and indexes
    pub fn initialize_schema(&self) -> Result<()> {
        let tables = DependencyResolver::new()
            .creation_order()
            .map_err(IngestError::Schema)?;

        for schema in tables {
            debug!(table = schema.name, "ensuring table");
            self.conn.execute(&generate_create_table(schema), [])?;

            for index_sql in generate_indexes(schema) {
                self.conn.execute(&index_sql, [])?;
            }
        }

        Ok(())
    }

    /// Number of rows in a table
    pub fn count_rows(&self, table: &str) -> Result<i64> {
        let count = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })?;
        Ok(count)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Ensure the schema exists at `db_path`
pub fn initialize_schema(db_path: &Path) -> Result<()> {
    let store = Store::open(db_path)?;
    store.initialize_schema()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::table_names;

    fn existing_tables(store: &Store) -> Vec<String> {
        let mut stmt = store
            .connection()
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap()
    }

    #[test]
    fn test_initialize_creates_all_tables() {
        let store = Store::open_in_memory().unwrap();
        store.initialize_schema().unwrap();

        let tables = existing_tables(&store);
        for name in table_names() {
            assert!(tables.iter().any(|t| t == name), "missing table {}", name);
        }
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let store = Store::open_in_memory().unwrap();
        store.initialize_schema().unwrap();
        store
            .connection()
            .execute("INSERT INTO type (name) VALUES ('fire')", [])
            .unwrap();

        store.initialize_schema().unwrap();
        assert_eq!(store.count_rows("type").unwrap(), 1);
    }

    #[test]
    fn test_gender_pair_check_constraint() {
        let store = Store::open_in_memory().unwrap();
        store.initialize_schema().unwrap();

        let result = store.connection().execute(
            "INSERT INTO pokemon (id, name, height, weight, male_percentage)
             VALUES (1, 'bulbasaur', 7, 69, 50.0)",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_foreign_keys_enforced() {
        let store = Store::open_in_memory().unwrap();
        store.initialize_schema().unwrap();

        let result = store.connection().execute(
            "INSERT INTO stats (pokemon_id, stat_name, base_stat) VALUES (999, 'hp', 1)",
            [],
        );
        assert!(result.is_err());
    }
}
