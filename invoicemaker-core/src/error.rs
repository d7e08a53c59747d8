use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            // Map "no rows" to NotFound
            sqlx::Error::RowNotFound => Self::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().unwrap_or_default();
                match code.as_ref() {
                    // PostgreSQL unique_violation / SQLite SQLITE_CONSTRAINT_UNIQUE
                    // and SQLITE_CONSTRAINT_PRIMARYKEY
                    "23505" | "2067" | "1555" => {
                        Self::AlreadyExists("Resource already exists".to_string())
                    }
                    // PostgreSQL foreign_key_violation / SQLite SQLITE_CONSTRAINT_FOREIGNKEY
                    "23503" | "787" => Self::NotFound("Referenced resource not found".to_string()),
                    // PostgreSQL check_violation / SQLite SQLITE_CONSTRAINT_CHECK
                    "23514" | "275" => Self::InvalidInput("Constraint check failed".to_string()),
                    // PostgreSQL not_null_violation / SQLite SQLITE_CONSTRAINT_NOTNULL
                    "23502" | "1299" => Self::InvalidInput("Required field is missing".to_string()),
                    _ => Self::Database(err),
                }
            }
            _ => Self::Database(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = Error::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("bad invoice number".to_string());
        assert!(format!("{err}").contains("bad invoice number"));
    }
}
