//! The retriever/persister pair over a storage backend, and the factory
//! that constructs them bound to one shared connection provider.

mod persister;
mod retriever;
mod rows;

pub use persister::ExpensesPersister;
pub use retriever::{ExpensesRetriever, MINIMUM_COMMON_COST_OCCURRENCES};

use std::sync::Arc;

use crate::{
    Error,
    db::{SqliteConnectionProvider, TableNames},
};

/// The sealed set of storage backends selectable by configuration.
///
/// Exactly one backend is active at a time; all variants satisfy the same
/// retriever/persister contract through
/// [QueryExecutor](crate::db::QueryExecutor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// A single-file (or in-memory) SQLite store.
    Sqlite,
}

impl StorageBackend {
    /// Parse a backend selector string.
    ///
    /// Unknown selectors yield `None`; callers must check.
    ///
    /// # Errors
    /// Returns [Error::InvalidArgument] for an empty selector.
    pub fn parse(selector: &str) -> Result<Option<Self>, Error> {
        if selector.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "backend selector must be a non-empty string".to_string(),
            ));
        }

        match selector {
            "sqlite" => Ok(Some(Self::Sqlite)),
            _ => Ok(None),
        }
    }
}

/// A retriever/persister pair bound to one backing engine.
pub struct ExpenseStore {
    /// The read side of the store.
    pub retriever: ExpensesRetriever<SqliteConnectionProvider>,
    /// The write side of the store.
    pub persister: ExpensesPersister<SqliteConnectionProvider>,
}

/// Construct the retriever/persister pair for a backend selector, sharing
/// one connection provider and one table-name mapping.
///
/// The provider's schema is ensured before the pair is returned, so the
/// store is query-ready. Unknown selectors yield `Ok(None)`.
///
/// # Errors
/// Returns [Error::InvalidArgument] for an empty selector, database path or
/// table name.
pub fn create_expense_store(
    selector: &str,
    database_path: &str,
    tables: TableNames,
) -> Result<Option<ExpenseStore>, Error> {
    let Some(backend) = StorageBackend::parse(selector)? else {
        return Ok(None);
    };

    match backend {
        StorageBackend::Sqlite => {
            let provider = SqliteConnectionProvider::open(database_path, tables.clone())?;
            provider.ensure_schema()?;

            let provider = Arc::new(provider);
            let retriever = ExpensesRetriever::new(tables.clone(), Arc::clone(&provider))?;
            let persister = ExpensesPersister::new(tables, provider)?;

            Ok(Some(ExpenseStore {
                retriever,
                persister,
            }))
        }
    }
}

#[cfg(test)]
mod factory_tests {
    use crate::{
        Error,
        db::{SqliteConnectionProvider, TableNames},
    };

    use super::create_expense_store;

    #[test]
    fn empty_selector_is_rejected() {
        let result = create_expense_store(
            "",
            SqliteConnectionProvider::IN_MEMORY,
            TableNames::default(),
        );

        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn unknown_selector_yields_none() {
        let store = create_expense_store(
            "mariadb",
            SqliteConnectionProvider::IN_MEMORY,
            TableNames::default(),
        )
        .unwrap();

        assert!(store.is_none());
    }

    #[test]
    fn sqlite_selector_yields_a_query_ready_store() {
        let store = create_expense_store(
            "sqlite",
            SqliteConnectionProvider::IN_MEMORY,
            TableNames::default(),
        )
        .unwrap()
        .expect("sqlite should be a known backend");

        assert_eq!(store.retriever.retrieve_categories().unwrap(), []);
        assert_eq!(store.retriever.retrieve_expense("nope").unwrap(), None);
    }
}
