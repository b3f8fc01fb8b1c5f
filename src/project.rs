//! Power BI project tree writer
//!
//! Materialises the `definition/` directory of a Power BI report project:
//! one page folder per dashboard, one visual folder per worksheet the
//! dashboard references. A worksheet that cannot be mapped is logged and
//! skipped; it never aborts the rest of the batch.

use crate::error::{Error, Result};
use crate::ids::IdGenerator;
use crate::records::{normalize_name, DashboardRecord, WorksheetRecord};
use crate::report;
use crate::visuals;
use indexmap::IndexSet;
use serde_json::Value;
use std::fs;
use std::io::BufWriter;
use std::path::Path;
use tracing::{info, warn};

/// Outcome counters for one conversion run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Pages written, one per dashboard
    pub pages: usize,
    /// Visual documents written
    pub visuals: usize,
    /// Worksheet names skipped: no extracted record, or a required field
    /// binding was missing
    pub skipped: Vec<String>,
}

/// Write the whole `definition/` tree for the given dashboards.
///
/// Within a page, worksheet references are de-duplicated by normalized name
/// before lookup, so a dashboard listing the same worksheet twice gets one
/// visual.
pub fn write_project(
    dashboards: &[DashboardRecord],
    worksheets: &[WorksheetRecord],
    definition_dir: &Path,
    ids: &mut dyn IdGenerator,
) -> Result<ConversionSummary> {
    let pages_dir = definition_dir.join("pages");
    fs::create_dir_all(&pages_dir)?;

    let mut summary = ConversionSummary::default();
    let mut page_order: Vec<String> = Vec::new();

    for dashboard in dashboards {
        info!(
            dashboard = %dashboard.name,
            worksheets = ?dashboard.worksheet_names,
            "writing page"
        );
        let page_id = ids.next_id();
        let page_dir = pages_dir.join(&page_id);
        let visuals_dir = page_dir.join("visuals");
        fs::create_dir_all(&visuals_dir)?;
        write_json(
            &page_dir.join("page.json"),
            &report::page_definition(&page_id, &dashboard.name),
        )?;

        let mut seen: IndexSet<String> = IndexSet::new();
        for worksheet_name in &dashboard.worksheet_names {
            if !seen.insert(normalize_name(worksheet_name)) {
                continue;
            }
            let Some(record) = worksheets.iter().find(|ws| ws.matches_name(worksheet_name))
            else {
                warn!(worksheet = %worksheet_name, "no extracted record, skipping visual");
                summary.skipped.push(worksheet_name.clone());
                continue;
            };

            let visual_id = ids.next_id();
            let archetype = visuals::select_archetype(&record.mark_type, record);
            match visuals::generate(archetype, record, &visual_id, None, ids) {
                Ok(document) => {
                    let visual_dir = visuals_dir.join(&visual_id);
                    fs::create_dir_all(&visual_dir)?;
                    write_json(&visual_dir.join("visual.json"), &document)?;
                    summary.visuals += 1;
                }
                Err(Error::MissingBinding(missing)) => {
                    warn!(error = %missing, "skipping visual");
                    summary.skipped.push(worksheet_name.clone());
                }
                Err(other) => return Err(other),
            }
        }

        page_order.push(page_id);
        summary.pages += 1;
    }

    write_json(&pages_dir.join("pages.json"), &report::pages_metadata(&page_order))?;
    write_json(
        &definition_dir.join("report.json"),
        &report::report_definition(),
    )?;

    Ok(summary)
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    Ok(())
}
