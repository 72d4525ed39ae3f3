use std::fmt;

#[derive(Debug)]
pub enum DbError {
    ConnectionError,
    QueryError(String),
    DecodeError(String),
    PoolError,
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbError::ConnectionError => write!(f, "Database connection error"),
            DbError::QueryError(msg) => write!(f, "Database query error: {}", msg),
            DbError::DecodeError(msg) => write!(f, "Database decode error: {}", msg),
            DbError::PoolError => write!(f, "Database pool error"),
        }
    }
}

impl std::error::Error for DbError {}

/// Conversion from sqlx errors
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => DbError::PoolError,
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) => DbError::ConnectionError,
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                DbError::DecodeError(err.to_string())
            }
            _ => DbError::QueryError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_display() {
        let error = DbError::ConnectionError;
        assert_eq!(format!("{}", error), "Database connection error");
    }

    #[test]
    fn test_query_error_display() {
        let error = DbError::QueryError("syntax error".to_string());
        assert_eq!(format!("{}", error), "Database query error: syntax error");
    }

    #[test]
    fn test_pool_error_from_sqlx() {
        let error: DbError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(error.to_string(), "Database pool error");
    }

    #[test]
    fn test_row_not_found_is_query_error() {
        let error: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, DbError::QueryError(_)));
    }

    #[test]
    fn test_error_source_is_none() {
        use std::error::Error;
        let error = DbError::PoolError;
        assert!(error.source().is_none());
    }
}
