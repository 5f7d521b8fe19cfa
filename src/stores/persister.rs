//! The write side of the expense store.

use std::sync::Arc;

use rusqlite::{ToSql, params};
use uuid::Uuid;

use crate::{
    Error,
    db::{Query, QueryExecutor, TableNames},
    escape,
    models::{Category, Expense, ExpenseChanges, Shop, Tag},
};

use super::{retriever::ExpensesRetriever, rows};

/// Writes expenses, categories, tags and shops to a storage backend.
///
/// Each operation is a single atomic unit; no transaction spans across
/// calls. Free-text names are escaped before they reach storage.
pub struct ExpensesPersister<E> {
    tables: TableNames,
    executor: Arc<E>,
}

impl<E> Clone for ExpensesPersister<E> {
    fn clone(&self) -> Self {
        Self {
            tables: self.tables.clone(),
            executor: Arc::clone(&self.executor),
        }
    }
}

impl<E: QueryExecutor> ExpensesPersister<E> {
    /// Create a persister over `executor`.
    ///
    /// # Errors
    /// Returns [Error::InvalidArgument] if the table-name mapping has an
    /// empty entry.
    pub fn new(tables: TableNames, executor: Arc<E>) -> Result<Self, Error> {
        tables.validate()?;

        Ok(Self { tables, executor })
    }

    /// Insert a new expense bound to its category id, then synchronize its
    /// tag relations.
    pub fn add_expense(&self, expense: &Expense) -> Result<(), Error> {
        self.executor.execute(
            &Query::SaveExpense.sql(&self.tables),
            params![
                expense.id,
                escape::escape(&expense.name),
                expense.cost,
                expense.purchase_date,
                expense.category.id,
            ],
        )?;

        self.persist_expense_tags(expense)?;

        tracing::debug!("added expense {}", expense.id);

        Ok(())
    }

    /// Apply a partial set of column updates to an expense, then re-read
    /// and return the fresh [Expense].
    ///
    /// The purchase date in `changes` must already be in epoch-second form.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `expense_id` does not refer to a stored
    /// expense.
    pub fn update_expense(
        &self,
        expense_id: &str,
        changes: &ExpenseChanges,
    ) -> Result<Expense, Error> {
        let mut assignments: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(name) = &changes.name {
            assignments.push(format!("name = ?{}", values.len() + 1));
            values.push(Box::new(escape::escape(name)));
        }
        if let Some(cost) = changes.cost {
            assignments.push(format!("cost = ?{}", values.len() + 1));
            values.push(Box::new(cost));
        }
        if let Some(purchase_date) = changes.purchase_date {
            assignments.push(format!("purchase_date = ?{}", values.len() + 1));
            values.push(Box::new(purchase_date));
        }
        if let Some(category_id) = &changes.category_id {
            assignments.push(format!("category_id = ?{}", values.len() + 1));
            values.push(Box::new(category_id.clone()));
        }

        if !assignments.is_empty() {
            let statement = format!(
                "UPDATE {expenses} SET {assignments} WHERE expense_id = ?{id_index}",
                expenses = self.tables.expenses,
                assignments = assignments.join(", "),
                id_index = values.len() + 1
            );
            values.push(Box::new(expense_id.to_string()));

            let params: Vec<&dyn ToSql> = values.iter().map(|value| value.as_ref()).collect();
            self.executor.execute(&statement, &params)?;
        }

        let expense = self
            .retriever()?
            .retrieve_expense(expense_id)?
            .ok_or(Error::NotFound)?;

        tracing::debug!("updated expense {}", expense.id);

        Ok(expense)
    }

    /// Insert a new category.
    ///
    /// # Errors
    /// Returns [Error::EmptyCategoryName] if the name is empty.
    pub fn add_category(&self, category: &Category) -> Result<(), Error> {
        if category.name.trim().is_empty() {
            return Err(Error::EmptyCategoryName);
        }

        self.executor.execute(
            &Query::SaveCategory.sql(&self.tables),
            params![category.id, escape::escape(&category.name)],
        )?;

        tracing::debug!("added category {}", category.id);

        Ok(())
    }

    /// Insert the tags that do not already exist, skipping those whose name
    /// is already stored.
    ///
    /// The returned tags represent the persisted state: a tag whose name
    /// already existed comes back with its *stored* identity rather than
    /// the caller-supplied one. Empty input is a no-op returning an empty
    /// list.
    pub fn persist_tags(&self, tags: &[Tag]) -> Result<Vec<Tag>, Error> {
        let mut persisted = Vec::with_capacity(tags.len());

        for tag in tags {
            if tag.name.trim().is_empty() {
                return Err(Error::EmptyTagName);
            }

            let name = escape::escape(&tag.name);
            let existing = self
                .executor
                .execute(&Query::TagByName.sql(&self.tables), params![name])?;

            match existing.first() {
                Some(row) => persisted.push(rows::tag_from_row(row, 0)?),
                None => {
                    self.executor
                        .execute(&Query::SaveTag.sql(&self.tables), params![tag.id, name])?;
                    persisted.push(tag.clone());
                }
            }
        }

        Ok(persisted)
    }

    /// Reconcile an expense's stored tag relations with its desired tags.
    ///
    /// Computes the name-wise difference between the tags currently related
    /// to the expense and `expense.tags`: relations for tags no longer
    /// present are deleted, net-new tags are persisted and linked.
    /// Idempotent: repeating the call with an unchanged expense performs no
    /// further writes.
    ///
    /// Returns the final tag set in the expense's order, with stored
    /// identities winning over caller-supplied ones.
    pub fn persist_expense_tags(&self, expense: &Expense) -> Result<Vec<Tag>, Error> {
        let stored = self.retriever()?.retrieve_expense_tags(&expense.id)?;
        let desired = &expense.tags;

        for stale in stored.iter().filter(|tag| !desired.contains(tag)) {
            self.executor.execute(
                &Query::DeleteExpenseTag.sql(&self.tables),
                params![expense.id, stale.id],
            )?;
        }

        let added: Vec<Tag> = desired
            .iter()
            .filter(|tag| !stored.contains(tag))
            .cloned()
            .collect();
        let linked = self.persist_tags(&added)?;

        for tag in &linked {
            self.executor.execute(
                &Query::SaveExpenseTag.sql(&self.tables),
                params![expense.id, tag.id],
            )?;
        }

        let resolved = desired
            .iter()
            .map(|tag| {
                stored
                    .iter()
                    .chain(linked.iter())
                    .find(|candidate| *candidate == tag)
                    .cloned()
                    .unwrap_or_else(|| tag.clone())
            })
            .collect();

        Ok(resolved)
    }

    /// Insert a shop, generating an id when the shop has none.
    ///
    /// Returns the shop as persisted.
    pub fn persist_shop(&self, shop: &Shop) -> Result<Shop, Error> {
        let shop_id = shop
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        self.executor.execute(
            &Query::SaveShop.sql(&self.tables),
            params![shop_id, escape::escape(&shop.name)],
        )?;

        tracing::debug!("added shop {shop_id}");

        Ok(Shop::new(Some(shop_id), shop.name.clone()))
    }

    fn retriever(&self) -> Result<ExpensesRetriever<E>, Error> {
        ExpensesRetriever::new(self.tables.clone(), Arc::clone(&self.executor))
    }
}
