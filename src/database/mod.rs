// Copyright 2023 Remi Bernotavicius

use diesel::prelude::Connection as _;
use diesel::RunQueryDsl as _;
use std::error::Error;
use std::path::Path;

pub mod models;
pub mod schema;
pub mod setup;

pub type Connection = diesel::sqlite::SqliteConnection;

/// Opens the store and makes sure the schema exists. Table creation is
/// idempotent, so connecting to an already-populated store is safe.
pub fn establish_connection(
    path: impl AsRef<Path>,
) -> Result<Connection, Box<dyn Error + Send + Sync + 'static>> {
    let mut connection = Connection::establish(&path.as_ref().to_string_lossy())?;
    diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut connection)?;
    setup::create_tables(&mut connection);
    Ok(connection)
}

#[cfg(test)]
mod tests {
    use diesel::sql_types::BigInt;
    use diesel::{QueryableByName, RunQueryDsl as _};

    #[derive(QueryableByName)]
    struct TableCount {
        #[diesel(sql_type = BigInt)]
        n: i64,
    }

    #[test]
    fn setup_is_idempotent() {
        let mut conn = super::establish_connection(":memory:").unwrap();

        // A second pass over an existing schema must not fail either.
        let failures = super::setup::create_tables(&mut conn);
        assert!(failures.is_empty());

        let count: TableCount = diesel::sql_query(
            "SELECT COUNT(*) AS n FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        )
        .get_result(&mut conn)
        .unwrap();
        assert_eq!(count.n as usize, super::setup::TABLES.len());
    }
}
