/// Errors from decoding or encoding workbooks.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The bytes are not a workbook calamine can open.
    #[error("failed to open workbook: {0}")]
    Open(String),

    /// The workbook contains no worksheet.
    #[error("workbook has no sheets")]
    NoSheets,

    /// The first sheet exists but could not be read.
    #[error("failed to read sheet '{name}': {reason}")]
    Sheet { name: String, reason: String },

    /// The output workbook could not be built.
    #[error("failed to write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    /// I/O error reading or writing a workbook file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
