//! The SQLite connection provider and the query-execution capability.

use std::{fs, path::Path, sync::Mutex};

use regex::Regex;
use rusqlite::{Connection, ToSql, functions::FunctionFlags, types::Value};

use crate::Error;

use super::{migrations, tables::TableNames};

/// One result row, as raw column values.
pub type SqlRow = Vec<Value>;

/// The capability a retriever or persister requires from its storage
/// backend: execute one parametrized statement and return all result rows.
///
/// Implementations satisfy this contract at compile time through the trait
/// bound; there is no runtime capability introspection.
pub trait QueryExecutor {
    /// Execute one parametrized statement and return every result row as a
    /// raw value tuple. Statements that return no rows yield an empty list.
    ///
    /// Each call commits its own work.
    fn execute(&self, statement: &str, params: &[&dyn ToSql]) -> Result<Vec<SqlRow>, Error>;
}

/// Owns exactly one SQLite connection for its instance lifetime and
/// guarantees the schema required by the application exists before queries
/// run.
///
/// The connection carries a `regexp(pattern, text)` scalar function so
/// query text can use the `REGEXP` predicate, which suggestion matching
/// needs for its comma-separated month-membership column.
pub struct SqliteConnectionProvider {
    connection: Mutex<Connection>,
    tables: TableNames,
}

impl SqliteConnectionProvider {
    /// The path selecting an ephemeral in-memory store.
    pub const IN_MEMORY: &'static str = ":memory:";

    /// Open a connection to the database at `database_path`, creating the
    /// containing directory if the store is file-backed.
    ///
    /// # Errors
    /// Returns [Error::InvalidArgument] if `database_path` is empty, the
    /// table-name mapping has an empty entry, or the containing directory
    /// cannot be created.
    pub fn open(database_path: &str, tables: TableNames) -> Result<Self, Error> {
        if database_path.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "database_path must be a non-empty string".to_string(),
            ));
        }
        tables.validate()?;

        let connection = if database_path == Self::IN_MEMORY {
            Connection::open_in_memory()?
        } else {
            ensure_database_directory_exists(database_path)?;
            Connection::open(database_path)?
        };

        register_regexp(&connection)?;

        Ok(Self {
            connection: Mutex::new(connection),
            tables,
        })
    }

    /// Open an ephemeral in-memory store, used by tests and throwaway runs.
    pub fn open_in_memory(tables: TableNames) -> Result<Self, Error> {
        Self::open(Self::IN_MEMORY, tables)
    }

    /// Apply the versioned schema migrations.
    ///
    /// Safe to call on every startup; steps already recorded in the
    /// database's version are skipped.
    pub fn ensure_schema(&self) -> Result<(), Error> {
        let connection = self.connection.lock().unwrap();
        migrations::apply(&connection, &self.tables)?;

        Ok(())
    }

    /// The table-name mapping this provider migrates and serves.
    pub fn tables(&self) -> &TableNames {
        &self.tables
    }
}

impl QueryExecutor for SqliteConnectionProvider {
    fn execute(&self, statement: &str, params: &[&dyn ToSql]) -> Result<Vec<SqlRow>, Error> {
        let connection = self.connection.lock().unwrap();
        let mut prepared = connection.prepare(statement)?;
        let column_count = prepared.column_count();

        let mut rows = prepared.query(params)?;
        let mut result = Vec::new();

        while let Some(row) = rows.next()? {
            let mut tuple = Vec::with_capacity(column_count);
            for index in 0..column_count {
                tuple.push(row.get::<_, Value>(index)?);
            }
            result.push(tuple);
        }

        Ok(result)
    }
}

fn ensure_database_directory_exists(database_path: &str) -> Result<(), Error> {
    let Some(directory) = Path::new(database_path).parent() else {
        return Ok(());
    };

    if directory.as_os_str().is_empty() || directory.exists() {
        return Ok(());
    }

    fs::create_dir_all(directory).map_err(|error| {
        Error::InvalidArgument(format!(
            "could not create database directory {}: {error}",
            directory.display()
        ))
    })
}

fn register_regexp(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.create_scalar_function(
        "regexp",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |context| {
            let pattern = context.get::<String>(0)?;
            let text = context.get::<String>(1)?;

            let matcher = Regex::new(&pattern)
                .map_err(|error| rusqlite::Error::UserFunctionError(Box::new(error)))?;

            Ok(matcher.is_match(&text))
        },
    )
}
