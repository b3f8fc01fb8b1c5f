//! # tableau2pbi
//!
//! Converts Tableau workbook definitions (.twb, an XML dialect) into the
//! directory/file layout of a Power BI report project.
//!
//! The conversion is one-directional batch translation: one structured input
//! document in, a nested tree of JSON documents out. Two components do the
//! work, in sequence:
//!
//! - The **extractor** ([`extract`]) walks the workbook XML and produces one
//!   [`records::WorksheetRecord`] per worksheet and one
//!   [`records::DashboardRecord`] per dashboard.
//! - The **visual mapper** ([`visuals`]) dispatches each worksheet record to
//!   a visual archetype (column, bar, line, pie, table) and builds the
//!   visual-container JSON document for it.
//!
//! The [`project`] module ties both together and writes the `definition/`
//! tree a Power BI report project expects.
//!
//! ## Example
//!
//! ```rust,ignore
//! use tableau2pbi::document::Document;
//! use tableau2pbi::extract::{extract_dashboards, extract_worksheets};
//! use tableau2pbi::ids::RandomHexIds;
//! use tableau2pbi::project::write_project;
//!
//! let doc = Document::from_file("workbook.twb")?;
//! let worksheets = extract_worksheets(&doc);
//! let dashboards = extract_dashboards(&doc);
//! let summary = write_project(&dashboards, &worksheets, "out/definition".as_ref(), &mut RandomHexIds)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;

pub mod document;
pub mod records;
pub mod extract;

pub mod aggregation;
pub mod ids;
pub mod visuals;

pub mod report;
pub mod project;

// Re-exports for convenience
pub use error::{Error, Result};

/// Version of the tableau2pbi library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Schema URL stamped into every visual-container document
pub const VISUAL_CONTAINER_SCHEMA: &str =
    "https://developer.microsoft.com/json-schemas/fabric/item/report/definition/visualContainer/2.0.0/schema.json";

/// Schema URL for page definitions
pub const PAGE_SCHEMA: &str =
    "https://developer.microsoft.com/json-schemas/fabric/item/report/definition/page/1.4.0/schema.json";

/// Schema URL for the pages metadata document
pub const PAGES_METADATA_SCHEMA: &str =
    "https://developer.microsoft.com/json-schemas/fabric/item/report/definition/pagesMetadata/1.0.0/schema.json";

/// Schema URL for the report settings document
pub const REPORT_SCHEMA: &str =
    "https://developer.microsoft.com/json-schemas/fabric/item/report/definition/report/1.3.0/schema.json";
