/// Schema failures raised while turning a source file into a city table.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DataError {
    /// A required column is absent from the input.
    #[error("Missing required column '{column}'")]
    MissingColumn { column: String },

    /// A cell could not be interpreted as the column's type.
    #[error("Row {row}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
}

impl DataError {
    pub fn missing(column: &str) -> Self {
        DataError::MissingColumn {
            column: column.to_string(),
        }
    }

    pub fn invalid(row: usize, column: &str, value: impl Into<String>) -> Self {
        DataError::InvalidValue {
            row,
            column: column.to_string(),
            value: value.into(),
        }
    }
}
