//! Implements a struct that holds the state of the REST server.

use std::sync::Arc;

use crate::{
    db::SqliteConnectionProvider,
    stores::{ExpenseStore, ExpensesPersister, ExpensesRetriever},
};

/// The state of the REST server: one retriever/persister pair bound to the
/// process's storage backend, constructed once at start-up.
#[derive(Clone)]
pub struct AppState {
    /// The read side of the expense store.
    pub retriever: Arc<ExpensesRetriever<SqliteConnectionProvider>>,
    /// The write side of the expense store.
    pub persister: Arc<ExpensesPersister<SqliteConnectionProvider>>,
}

impl AppState {
    /// Create the state from a factory-constructed store.
    pub fn new(store: ExpenseStore) -> Self {
        Self {
            retriever: Arc::new(store.retriever),
            persister: Arc::new(store.persister),
        }
    }
}
