//! The JSON REST layer: thin route handlers over the retriever and
//! persister contracts.
//!
//! Dates cross this boundary as "YYYY-MM-DD" strings and months as
//! "YYYY-MM" labels; conversion to the internal timestamp form happens
//! here, before values reach the persister.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    models::{Category, Expense, ExpenseChanges, MonthStatistics, NewExpense, SimilarExpenseName, Tag},
    month::{self, MonthKey},
};

/// Build the application router over the process's expense store.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/expenses", get(get_expenses).post(create_expense))
        .route("/expenses/search", get(search_expenses))
        .route("/expenses/similar-names", get(get_similar_expense_names))
        .route("/expenses/common-cost", get(get_common_expense_cost))
        .route("/expenses/suggestions", get(get_expense_suggestions))
        .route(
            "/expenses/{expense_id}",
            get(get_expense).patch(update_expense),
        )
        .route("/months", get(get_months))
        .route("/categories", get(get_categories).post(create_category))
        .route("/tags", get(get_tags))
        .route("/statistics", get(get_statistics))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ExpensesQuery {
    month: Option<String>,
    count: Option<u32>,
}

async fn get_expenses(
    State(state): State<AppState>,
    Query(query): Query<ExpensesQuery>,
) -> Result<Json<Value>, Error> {
    let month = query.month.unwrap_or_else(|| MonthKey::current().label());
    let count = query.count.unwrap_or(1);

    let expenses = state.retriever.retrieve_expenses(&month, count)?;

    Ok(Json(json!({ "results": expenses })))
}

async fn get_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<String>,
) -> Result<Json<Expense>, Error> {
    state
        .retriever
        .retrieve_expense(&expense_id)?
        .map(Json)
        .ok_or(Error::NotFound)
}

async fn create_expense(
    State(state): State<AppState>,
    Json(new_expense): Json<NewExpense>,
) -> Result<(StatusCode, Json<Expense>), Error> {
    let expense = new_expense.into_expense()?;
    state.persister.add_expense(&expense)?;

    Ok((StatusCode::CREATED, Json(expense)))
}

#[derive(Debug, Deserialize)]
struct UpdateExpenseData {
    name: Option<String>,
    cost: Option<f64>,
    purchase_date: Option<String>,
    category_id: Option<String>,
}

async fn update_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<String>,
    Json(data): Json<UpdateExpenseData>,
) -> Result<Json<Expense>, Error> {
    let purchase_date = match &data.purchase_date {
        Some(date) => Some(month::parse_date_string(date)?),
        None => None,
    };

    let changes = ExpenseChanges {
        name: data.name,
        cost: data.cost,
        purchase_date,
        category_id: data.category_id,
    };

    let expense = state.persister.update_expense(&expense_id, &changes)?;

    Ok(Json(expense))
}

async fn get_months(State(state): State<AppState>) -> Result<Json<Vec<String>>, Error> {
    state.retriever.retrieve_months().map(Json)
}

async fn get_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>, Error> {
    state.retriever.retrieve_categories().map(Json)
}

#[derive(Debug, Deserialize)]
struct CategoryData {
    name: String,
}

async fn create_category(
    State(state): State<AppState>,
    Json(new_category): Json<CategoryData>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let category = Category::with_generated_id(new_category.name);
    state.persister.add_category(&category)?;

    Ok((StatusCode::CREATED, Json(category)))
}

async fn get_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, Error> {
    state.retriever.retrieve_tags().map(Json)
}

#[derive(Debug, Deserialize)]
struct NameQuery {
    name: String,
}

async fn search_expenses(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<Json<Vec<Expense>>, Error> {
    state.retriever.filter_expenses(&query.name).map(Json)
}

async fn get_similar_expense_names(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<Json<Vec<SimilarExpenseName>>, Error> {
    state
        .retriever
        .retrieve_similar_expense_names(&query.name)
        .map(Json)
}

async fn get_common_expense_cost(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<Json<Value>, Error> {
    let cost = state.retriever.retrieve_common_expense_cost(&query.name)?;

    Ok(Json(json!({ "cost": cost })))
}

#[derive(Debug, Deserialize)]
struct MonthQuery {
    month: String,
}

async fn get_expense_suggestions(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<Expense>>, Error> {
    state
        .retriever
        .retrieve_expense_suggestions(&query.month)
        .map(Json)
}

#[derive(Debug, Deserialize)]
struct StatisticsQuery {
    months: Option<u32>,
}

async fn get_statistics(
    State(state): State<AppState>,
    Query(query): Query<StatisticsQuery>,
) -> Result<Json<Vec<MonthStatistics>>, Error> {
    state
        .retriever
        .retrieve_statistics_for_months(query.months.unwrap_or(1))
        .map(Json)
}
