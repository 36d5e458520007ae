use thiserror::Error;

/// Fatal pipeline errors. Every variant aborts the run.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("schema error in {step}: column '{column}' not found")]
    Schema { step: &'static str, column: String },

    #[error("cannot coerce column '{column}' at row {row}: {value:?} is not {expected}")]
    TypeCoercion {
        column: String,
        row: usize,
        value: Option<String>,
        expected: &'static str,
    },

    #[error(
        "data integrity fault in {context} at row {row}: neither ties nor overtime losses recorded \
         (W={wins}, L={losses}, T={ties}, OTL={overtime_losses})"
    )]
    DataIntegrity {
        context: &'static str,
        row: usize,
        wins: i32,
        losses: i32,
        ties: i32,
        overtime_losses: i32,
    },

    #[error("persisted row count mismatch in {table}: expected {expected}, found {found}")]
    PersistenceMismatch {
        table: String,
        expected: usize,
        found: usize,
    },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T, E = EtlError> = std::result::Result<T, E>;
