use thiserror::Error;

/// Rejections raised before any row is classified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("file is empty: no inventory rows found")]
    EmptyDataset,

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("unsupported inventory format: {0:?} (expected csv, xlsx, xls, xlsm, ods or json)")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_message_lists_names_in_order() {
        let err = InputError::MissingColumns(vec!["CPU".to_string(), "Storage".to_string()]);
        assert_eq!(err.to_string(), "missing required columns: CPU, Storage");
    }
}
