//! Error types for tableau2pbi
//!
//! Two failure classes matter here: the input document is not well-formed
//! XML (nothing can be extracted, the run aborts), and a single worksheet
//! lacks a field binding a generator needs (that worksheet is skipped, the
//! batch continues). Both are distinct variants so callers can tell an
//! unparsable workbook apart from a valid workbook with nothing in it.

use std::fmt;
use thiserror::Error;

/// Result type alias using the tableau2pbi Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for conversion operations
#[derive(Error, Debug)]
pub enum Error {
    /// Workbook XML parsing error
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A worksheet lacks a binding a visual generator requires
    #[error("{0}")]
    MissingBinding(#[from] MissingFieldBinding),

    /// I/O error while reading the workbook or writing the project tree
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Workbook XML parsing error
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Byte offset in the input where parsing failed
    pub position: Option<usize>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
        }
    }

    /// Set the byte offset where parsing failed
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(position) = self.position {
            write!(f, " at byte {}", position)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// The field binding a generator could not find on a worksheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// `data_sources` is empty
    DataSource,
    /// `columns_axis` has no tokens
    ColumnsAxis,
    /// `rows_axis` has no tokens
    RowsAxis,
    /// `dependencies` is empty
    Dependencies,
    /// The first dependency has no column instances
    ColumnInstance,
}

impl BindingKind {
    fn describe(self) -> &'static str {
        match self {
            BindingKind::DataSource => "data source",
            BindingKind::ColumnsAxis => "columns-axis field",
            BindingKind::RowsAxis => "rows-axis field",
            BindingKind::Dependencies => "dependency block",
            BindingKind::ColumnInstance => "column instance",
        }
    }
}

/// A worksheet is missing a binding required by the selected generator
#[derive(Debug, Clone)]
pub struct MissingFieldBinding {
    /// Name of the worksheet the binding was looked up on
    pub worksheet: String,
    /// Which binding was absent
    pub binding: BindingKind,
}

impl MissingFieldBinding {
    /// Create a new missing-binding error
    pub fn new(worksheet: impl Into<String>, binding: BindingKind) -> Self {
        Self {
            worksheet: worksheet.into(),
            binding,
        }
    }
}

impl fmt::Display for MissingFieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "worksheet '{}' has no {}",
            self.worksheet,
            self.binding.describe()
        )
    }
}

impl std::error::Error for MissingFieldBinding {}
