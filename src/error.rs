use crate::rpl::coordinate::CoordinateError;

/// Conditions that abort a conversion. There is no partial-result mode:
/// any of these means no container is handed back to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Unreadable spreadsheet: {0}")]
    UnreadableSpreadsheet(String),

    #[error("Insufficient rows: expected at least {required} rows ({header_rows} header rows and one data row), found {found}")]
    InsufficientRows {
        header_rows: usize,
        required: usize,
        found: usize,
    },

    #[error("Malformed coordinate in record {record} ({column}): {source}")]
    MalformedCoordinate {
        record: usize,
        column: &'static str,
        #[source]
        source: CoordinateError,
    },

    #[error("Container write failure: {0}")]
    ContainerWriteFailure(String),
}

impl ConversionError {
    /// True for conditions caused by the uploaded workbook rather than by storage
    pub fn is_input_error(&self) -> bool {
        !matches!(self, ConversionError::ContainerWriteFailure(_))
    }
}

impl From<hdf5::Error> for ConversionError {
    fn from(err: hdf5::Error) -> Self {
        ConversionError::ContainerWriteFailure(err.to_string())
    }
}

impl From<std::io::Error> for ConversionError {
    fn from(err: std::io::Error) -> Self {
        ConversionError::ContainerWriteFailure(err.to_string())
    }
}
