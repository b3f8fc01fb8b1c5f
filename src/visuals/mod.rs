//! Power BI visual generation
//!
//! Dispatches a worksheet record to a visual archetype and builds the
//! visual-container JSON document for it. Each generator is a pure mapping
//! from (record, name, position) to a document; the only injected capability
//! is identifier generation for filter names.

mod base;
mod charts;
mod table;

pub use base::Position;
pub use charts::{bar_chart, column_chart, line_chart, pie_chart};
pub use table::{table, PLACEHOLDER_COLUMN};

use crate::error::Result;
use crate::ids::IdGenerator;
use crate::records::WorksheetRecord;
use tracing::debug;

/// Output artifact: one visual-container JSON document
pub type VisualDocument = serde_json::Value;

/// Chart-type family a worksheet maps onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Archetype {
    /// Vertical clustered columns
    Column,
    /// Horizontal bars
    Bar,
    /// Line chart
    Line,
    /// Pie chart
    Pie,
    /// Plain table, the fallback for everything unrecognized
    Table,
}

impl Archetype {
    /// The Power BI visual type identifier this archetype emits
    pub fn visual_type(self) -> &'static str {
        match self {
            Archetype::Column => "clusteredColumnChart",
            Archetype::Bar => "barChart",
            Archetype::Line => "lineChart",
            Archetype::Pie => "pieChart",
            Archetype::Table => "tableEx",
        }
    }
}

/// Select the archetype for a worksheet's mark type.
///
/// Mark types are matched case-insensitively. `bar` marks pick their
/// orientation from where the dimension sits: rows axis means horizontal
/// bars, columns axis means vertical columns, and when neither field
/// resolves to a dimension the horizontal bar is the documented fallback.
/// Unrecognized mark types fall back to a table, the only archetype that
/// needs no axis bindings.
pub fn select_archetype(mark_type: &str, worksheet: &WorksheetRecord) -> Archetype {
    let selected = match mark_type.to_lowercase().as_str() {
        "column" => Archetype::Column,
        "bar" => bar_orientation(worksheet),
        "line" => Archetype::Line,
        "pie" => Archetype::Pie,
        "table" => Archetype::Table,
        other => {
            debug!(
                worksheet = %worksheet.name,
                mark_type = other,
                "unrecognized mark type, falling back to table"
            );
            Archetype::Table
        }
    };
    debug!(worksheet = %worksheet.name, archetype = ?selected, "archetype selected");
    selected
}

// An is_dimension miss means "unknown", not "confirmed measure": shelf
// tokens do not always line up with dependency column names.
fn bar_orientation(worksheet: &WorksheetRecord) -> Archetype {
    if worksheet
        .rows_axis
        .first()
        .is_some_and(|field| worksheet.is_dimension(field))
    {
        Archetype::Bar
    } else if worksheet
        .columns_axis
        .first()
        .is_some_and(|field| worksheet.is_dimension(field))
    {
        Archetype::Column
    } else {
        Archetype::Bar
    }
}

/// Build the visual document for `worksheet` using the given archetype.
///
/// `worksheet` is the single record backing this visual; generators read
/// index 0 of every binding list, so multi-source or multi-series worksheets
/// are rejected implicitly rather than partially supported. `position`
/// overrides the archetype's default placement when given.
pub fn generate(
    archetype: Archetype,
    worksheet: &WorksheetRecord,
    name: &str,
    position: Option<Position>,
    ids: &mut dyn IdGenerator,
) -> Result<VisualDocument> {
    match archetype {
        Archetype::Column => charts::column_chart(worksheet, name, position),
        Archetype::Bar => charts::bar_chart(worksheet, name, position),
        Archetype::Line => charts::line_chart(worksheet, name, position, ids),
        Archetype::Pie => charts::pie_chart(worksheet, name, position, ids),
        Archetype::Table => table::table(worksheet, name, position, ids),
    }
}
