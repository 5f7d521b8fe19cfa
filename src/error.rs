//! Defines the app level error type and its conversion to JSON responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A constructor was given a missing or malformed dependency, e.g. an
    /// empty database path, a blank backend selector or an empty table name.
    ///
    /// This error is always raised eagerly, before any query runs, and is
    /// fatal to the call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the
    /// parameters (e.g., ID) are correct and that the resource has been
    /// created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// There was an error parsing a date or month string.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not parse date string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// An empty string was used to create a tag name.
    #[error("tag name cannot be empty")]
    EmptyTagName,

    /// A query returned a value that could not be converted into the
    /// expected model field.
    #[error("query returned a value of an unexpected type in column {0}")]
    UnexpectedColumnType(usize),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::InvalidArgument(_)
            | Error::InvalidDateFormat(_, _)
            | Error::EmptyCategoryName
            | Error::EmptyTagName => StatusCode::UNPROCESSABLE_ENTITY,
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            ref error => {
                tracing::error!("An unexpected error occurred: {}", error);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = match status_code {
            StatusCode::INTERNAL_SERVER_ERROR => json!({
                "error": "An unexpected error occurred, check the server logs for more details."
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (status_code, Json(body)).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::Error;

    #[test]
    fn not_found_maps_to_404() {
        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_argument_maps_to_422() {
        let response = Error::InvalidArgument("table_names.expenses".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn query_returned_no_rows_becomes_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }
}
