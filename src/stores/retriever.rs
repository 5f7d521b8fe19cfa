//! The read side of the expense store.

use std::sync::Arc;

use rusqlite::params;
use uuid::Uuid;

use crate::{
    Error,
    db::{Query, QueryExecutor, TableNames},
    escape,
    models::{Category, Expense, MonthStatistics, SimilarExpenseName, Tag},
    month::{MonthKey, months_through},
};

use super::rows;

/// How many times a (name, cost) pair must have been recorded before its
/// cost is suggested by
/// [ExpensesRetriever::retrieve_common_expense_cost].
///
/// Policy rather than law: the value guards against suggesting a cost from
/// too little history and may become configurable.
pub const MINIMUM_COMMON_COST_OCCURRENCES: i64 = 5;

/// Reads expenses, categories, tags, suggestions and statistics from a
/// storage backend.
///
/// The backend capability is a compile-time bound on [QueryExecutor]; the
/// table-name mapping is validated eagerly at construction, before any
/// query runs.
pub struct ExpensesRetriever<E> {
    tables: TableNames,
    executor: Arc<E>,
}

impl<E> Clone for ExpensesRetriever<E> {
    fn clone(&self) -> Self {
        Self {
            tables: self.tables.clone(),
            executor: Arc::clone(&self.executor),
        }
    }
}

impl<E: QueryExecutor> ExpensesRetriever<E> {
    /// Create a retriever over `executor`.
    ///
    /// # Errors
    /// Returns [Error::InvalidArgument] if the table-name mapping has an
    /// empty entry.
    pub fn new(tables: TableNames, executor: Arc<E>) -> Result<Self, Error> {
        tables.validate()?;

        Ok(Self { tables, executor })
    }

    /// Look up a single expense by id, with its category joined and tags
    /// attached.
    ///
    /// A missing row yields `None`, never an error.
    pub fn retrieve_expense(&self, expense_id: &str) -> Result<Option<Expense>, Error> {
        let rows = self
            .executor
            .execute(&Query::ExpenseById.sql(&self.tables), params![expense_id])?;

        let Some(row) = rows.first() else {
            return Ok(None);
        };

        let mut expense = rows::expense_from_row(row)?;
        expense.tags = self.retrieve_expense_tags(&expense.id)?;

        Ok(Some(expense))
    }

    /// Return the expenses inside an inclusive window ending at the last
    /// second of `latest_month` ("YYYY-MM") and starting `number_of_months`
    /// back, ordered by purchase date descending, each with its category
    /// joined and tags attached.
    pub fn retrieve_expenses(
        &self,
        latest_month: &str,
        number_of_months: u32,
    ) -> Result<Vec<Expense>, Error> {
        if number_of_months == 0 {
            return Ok(Vec::new());
        }

        let latest = MonthKey::parse(latest_month)?;
        let start = latest.minus_months(number_of_months - 1).first_second();
        let end = latest.last_second();

        let rows = self
            .executor
            .execute(&Query::ExpensesInRange.sql(&self.tables), params![start, end])?;

        self.expenses_with_tags(&rows)
    }

    /// Return every "YYYY-MM" label from the oldest stored purchase month
    /// through the current month, contiguous even when intermediate months
    /// are empty.
    ///
    /// An empty store yields an empty list.
    pub fn retrieve_months(&self) -> Result<Vec<String>, Error> {
        let rows = self
            .executor
            .execute(&Query::OldestPurchaseDate.sql(&self.tables), params![])?;

        let Some(row) = rows.first() else {
            return Ok(Vec::new());
        };

        let oldest = MonthKey::from_timestamp(rows::integer(row, 0)?)?;

        Ok(months_through(oldest, MonthKey::current())
            .into_iter()
            .map(MonthKey::label)
            .collect())
    }

    /// Return every category, ordered by name ascending.
    pub fn retrieve_categories(&self) -> Result<Vec<Category>, Error> {
        let rows = self
            .executor
            .execute(&Query::AllCategories.sql(&self.tables), params![])?;

        rows.iter()
            .map(|row| rows::category_from_row(row, 0))
            .collect()
    }

    /// Return every tag, ordered by name ascending.
    pub fn retrieve_tags(&self) -> Result<Vec<Tag>, Error> {
        let rows = self
            .executor
            .execute(&Query::AllTags.sql(&self.tables), params![])?;

        rows.iter().map(|row| rows::tag_from_row(row, 0)).collect()
    }

    /// Return the tags currently associated to one expense through the
    /// join relation.
    pub fn retrieve_expense_tags(&self, expense_id: &str) -> Result<Vec<Tag>, Error> {
        let rows = self
            .executor
            .execute(&Query::TagsForExpense.sql(&self.tables), params![expense_id])?;

        rows.iter().map(|row| rows::tag_from_row(row, 0)).collect()
    }

    /// Return the expenses whose name contains `expense_name`,
    /// case-insensitively, newest first.
    pub fn filter_expenses(&self, expense_name: &str) -> Result<Vec<Expense>, Error> {
        let pattern = like_pattern(expense_name);
        let rows = self
            .executor
            .execute(&Query::ExpensesByName.sql(&self.tables), params![pattern])?;

        self.expenses_with_tags(&rows)
    }

    /// Return deduplicated name/category pairs whose name contains
    /// `expense_name`, ranked by how often the pair was recorded, most
    /// frequent first. Ties keep their first-seen order.
    pub fn retrieve_similar_expense_names(
        &self,
        expense_name: &str,
    ) -> Result<Vec<SimilarExpenseName>, Error> {
        let pattern = like_pattern(expense_name);
        let rows = self.executor.execute(
            &Query::SimilarExpenseNames.sql(&self.tables),
            params![pattern],
        )?;

        let mut counted: Vec<(SimilarExpenseName, usize)> = Vec::new();

        for row in &rows {
            let pair = SimilarExpenseName {
                name: escape::unescape(&rows::text(row, 0)?),
                category: escape::unescape(&rows::text(row, 1)?),
            };

            match counted.iter_mut().find(|(seen, _)| *seen == pair) {
                Some((_, count)) => *count += 1,
                None => counted.push((pair, 1)),
            }
        }

        // Stable sort keeps first-seen order between equal counts.
        counted.sort_by(|(_, left), (_, right)| right.cmp(left));

        Ok(counted.into_iter().map(|(pair, _)| pair).collect())
    }

    /// Return the cost of the most frequent (name, cost) group recorded
    /// under `expense_name`, or `0.0` when the best group has fewer than
    /// [MINIMUM_COMMON_COST_OCCURRENCES] occurrences.
    pub fn retrieve_common_expense_cost(&self, expense_name: &str) -> Result<f64, Error> {
        let rows = self.executor.execute(
            &Query::CommonExpenseCost.sql(&self.tables),
            params![escape::escape(expense_name)],
        )?;

        let Some(row) = rows.first() else {
            return Ok(0.0);
        };

        if rows::integer(row, 2)? < MINIMUM_COMMON_COST_OCCURRENCES {
            return Ok(0.0);
        }

        rows::real(row, 1)
    }

    /// Return recurring-expense templates due in `month` ("YYYY-MM") that
    /// have no identically-named expense recorded inside the month's
    /// window: "you usually pay for this in this month and haven't yet."
    ///
    /// Suggestions are expense-shaped: a fresh id, the template's name and
    /// cost, its category, no tags, dated at the month's first second.
    pub fn retrieve_expense_suggestions(&self, month: &str) -> Result<Vec<Expense>, Error> {
        let key = MonthKey::parse(month)?;
        // Exact token-boundary match against the comma-separated month
        // numbers, e.g. "3" matches "1,3,12" but not "13".
        let pattern = format!("(^|,){}(,|$)", key.month_number());

        let rows = self.executor.execute(
            &Query::SuggestionsForMonth.sql(&self.tables),
            params![pattern, key.first_second(), key.last_second()],
        )?;

        rows.iter()
            .map(|row| {
                Ok(Expense {
                    id: Uuid::new_v4().to_string(),
                    name: escape::unescape(&rows::text(row, 0)?),
                    cost: rows::real(row, 1)?,
                    purchase_date: key.first_second(),
                    category: rows::category_from_row(row, 2)?,
                    tags: Vec::new(),
                })
            })
            .collect()
    }

    /// For each of the last `number_of_months` calendar months (current
    /// month first), sum cost grouped by category over the month's full
    /// range, labeling each group with its "YYYY-MM" month.
    pub fn retrieve_statistics_for_months(
        &self,
        number_of_months: u32,
    ) -> Result<Vec<MonthStatistics>, Error> {
        let current = MonthKey::current();
        let mut statistics = Vec::new();

        for index in 0..number_of_months {
            let month = current.minus_months(index);
            let rows = self.executor.execute(
                &Query::StatisticsInRange.sql(&self.tables),
                params![month.first_second(), month.last_second()],
            )?;

            for row in &rows {
                statistics.push(MonthStatistics {
                    category: rows::category_from_row(row, 1)?,
                    total: rows::real(row, 0)?,
                    month: month.label(),
                });
            }
        }

        Ok(statistics)
    }

    fn expenses_with_tags(&self, rows: &[crate::db::SqlRow]) -> Result<Vec<Expense>, Error> {
        let mut expenses = Vec::with_capacity(rows.len());

        for row in rows {
            let mut expense = rows::expense_from_row(row)?;
            expense.tags = self.retrieve_expense_tags(&expense.id)?;
            expenses.push(expense);
        }

        Ok(expenses)
    }
}

fn like_pattern(needle: &str) -> String {
    format!("%{}%", escape::escape(needle))
}
