//! Worksheet and dashboard extraction
//!
//! Walks a parsed workbook and produces one [`WorksheetRecord`] per
//! `worksheet` element and one [`DashboardRecord`] per `dashboard` element,
//! wherever they sit in the tree. Well-formedness is the [`Document`]
//! parser's concern; by the time these functions run, a workbook with zero
//! worksheets simply yields an empty list.

use crate::document::{Document, Element};
use crate::error::Result;
use crate::records::{
    ColumnDef, ColumnInstance, DashboardRecord, DataSourceRef, Dependency, Role, WorksheetRecord,
};
use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io::BufWriter;
use std::path::Path;

static SHELF_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":(.*?):").expect("shelf token pattern"));

/// All `:token:`-delimited substrings in shelf text, in order of appearance.
///
/// Matches are non-overlapping: the closing colon of one token is never
/// reused as the opening colon of the next, so
/// `[fed.1].[none:Region:nk] / [fed.1].[sum:Sales:qk]` yields
/// `["Region", "Sales"]`. This is the extraction contract for both axes.
/// Shelf text that encodes fields some other way produces no tokens; the
/// table generator is the only one that tolerates that.
pub fn shelf_tokens(text: &str) -> Vec<String> {
    SHELF_TOKEN
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}

/// Extract one record per worksheet element, at any depth.
///
/// Each field of the record comes from an independent descendant scan of the
/// worksheet element; a worksheet missing any of them gets empty values, not
/// an error. Binding requirements are enforced later, per generator.
pub fn extract_worksheets(document: &Document) -> Vec<WorksheetRecord> {
    let root = document.root();
    root.descendants_named("worksheet")
        .map(|worksheet| worksheet_record(worksheet, root))
        .collect()
}

fn worksheet_record(worksheet: &Element, root: &Element) -> WorksheetRecord {
    let title = worksheet
        .find_descendant("run")
        .and_then(|run| run.text())
        .unwrap_or_default()
        .to_string();

    let mark_type = worksheet
        .find_descendant("mark")
        .and_then(|mark| mark.attr("class"))
        .unwrap_or_default()
        .to_string();

    let columns_axis = worksheet
        .find_descendant("cols")
        .and_then(|cols| cols.text())
        .map(shelf_tokens)
        .unwrap_or_default();

    let rows_axis = worksheet
        .find_descendant("rows")
        .and_then(|rows| rows.text())
        .map(shelf_tokens)
        .unwrap_or_default();

    let mut data_sources = Vec::new();
    for datasources in worksheet.descendants_named("datasources") {
        for datasource in datasources.descendants_named("datasource") {
            let name = datasource.attr("name").unwrap_or_default().to_string();
            data_sources.push(DataSourceRef {
                caption: datasource.attr("caption").unwrap_or_default().to_string(),
                relation_name: resolve_relation(root, &name),
                name,
            });
        }
    }

    let mut dependencies = Vec::new();
    for block in worksheet.descendants_named("datasource-dependencies") {
        let columns = block
            .descendants_named("column")
            .map(|column| ColumnDef {
                caption: column.attr("caption").unwrap_or_default().to_string(),
                name: column.attr("name").unwrap_or_default().to_string(),
                role: Role::from_attr(column.attr("role").unwrap_or_default()),
                calculation_formula: column
                    .child("calculation")
                    .and_then(|calc| calc.attr("formula"))
                    .map(str::to_string),
            })
            .collect();

        let column_instances = block
            .descendants_named("column-instance")
            .map(|instance| ColumnInstance {
                column_ref: instance.attr("column").unwrap_or_default().to_string(),
                derivation: instance.attr("derivation").unwrap_or_default().to_string(),
            })
            .collect();

        dependencies.push(Dependency {
            datasource_name: block.attr("datasource").unwrap_or_default().to_string(),
            columns,
            column_instances,
        });
    }

    WorksheetRecord {
        name: worksheet.attr("name").unwrap_or_default().to_string(),
        title,
        mark_type,
        data_sources,
        columns_axis,
        rows_axis,
        dependencies,
    }
}

/// Resolve the relation backing a data source.
///
/// Scans the whole document for data source definitions with a matching
/// name, then takes the first relation nested inside another relation
/// (Tableau wraps the concrete table relation in a connection-level one).
/// First match wins; no match means `None`, with no fallback.
fn resolve_relation(root: &Element, datasource_name: &str) -> Option<String> {
    for datasource in root
        .descendants_named("datasource")
        .filter(|e| e.attr("name") == Some(datasource_name))
    {
        for relation in datasource.descendants_named("relation") {
            if let Some(inner) = relation.find_descendant("relation") {
                return Some(inner.attr("name").unwrap_or_default().to_string());
            }
        }
    }
    None
}

/// Extract one record per dashboard element.
///
/// Zone names are collected depth-first, zones without a name attribute are
/// skipped, and duplicates are dropped keeping first-occurrence order.
pub fn extract_dashboards(document: &Document) -> Vec<DashboardRecord> {
    document
        .root()
        .descendants_named("dashboard")
        .map(|dashboard| {
            let mut worksheet_names: IndexSet<String> = IndexSet::new();
            for zone in dashboard.descendants_named("zone") {
                if let Some(name) = zone.attr("name") {
                    worksheet_names.insert(name.to_string());
                }
            }
            DashboardRecord {
                name: dashboard.attr("name").unwrap_or_default().to_string(),
                worksheet_names: worksheet_names.into_iter().collect(),
            }
        })
        .collect()
}

/// Serialize the full extracted record list as pretty JSON.
///
/// Diagnostic artifact only; downstream consumers use the in-memory records,
/// never this file.
pub fn write_debug_dump<P: AsRef<Path>>(records: &[WorksheetRecord], path: P) -> Result<()> {
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), records)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const SAMPLE_TWB: &str = r#"<?xml version='1.0' encoding='utf-8'?>
<workbook>
  <datasources>
    <datasource caption='Ventas (ventas)' name='federated.0abc123'>
      <connection class='federated'>
        <relation connection='textscan.1' name='root' type='collection'>
          <relation connection='textscan.1' name='ventas.csv' table='[ventas#csv]' type='table'/>
        </relation>
      </connection>
    </datasource>
  </datasources>
  <worksheets>
    <worksheet name='Ventas por Region'>
      <layout-options>
        <title>
          <formatted-text>
            <run>Ventas por Region</run>
          </formatted-text>
        </title>
      </layout-options>
      <table>
        <view>
          <datasources>
            <datasource caption='Ventas (ventas)' name='federated.0abc123'/>
          </datasources>
          <datasource-dependencies datasource='federated.0abc123'>
            <column caption='Region' datatype='string' name='[Region]' role='dimension' type='nominal'/>
            <column caption='Sales' datatype='real' name='[Sales]' role='measure' type='quantitative'/>
            <column caption='Margin' datatype='real' name='[Calculation_42]' role='measure' type='quantitative'>
              <calculation class='tableau' formula='[Sales]*0.2'/>
            </column>
            <column-instance column='[Sales]' derivation='Sum' name='[sum:Sales:qk]' type='quantitative'/>
          </datasource-dependencies>
        </view>
        <panes>
          <pane>
            <mark class='Pie'/>
          </pane>
        </panes>
        <rows>[federated.0abc123].[sum:Sales:qk]</rows>
        <cols>[federated.0abc123].[none:Region:nk]</cols>
      </table>
    </worksheet>
  </worksheets>
  <dashboards>
    <dashboard name='Resumen'>
      <zones>
        <zone h='98000' id='3' name='Ventas por Region' w='98000'/>
        <zone h='2000' id='4' name='Ventas por Region' w='2000'/>
      </zones>
    </dashboard>
  </dashboards>
</workbook>"#;

    #[test]
    fn test_shelf_tokens_single() {
        assert_eq!(
            shelf_tokens("[federated.1].[none:Region:nk]"),
            vec!["Region".to_string()]
        );
    }

    #[test]
    fn test_shelf_tokens_multiple_in_order() {
        let text = "[fed.1].[none:Region:nk] / [fed.1].[sum:Sales:qk]";
        assert_eq!(
            shelf_tokens(text),
            vec!["Region".to_string(), "Sales".to_string()]
        );
    }

    #[test]
    fn test_shelf_tokens_none() {
        assert!(shelf_tokens("").is_empty());
        assert!(shelf_tokens("[Plain].[NoColons]").is_empty());
        // A single colon pair boundary is not reused
        assert_eq!(shelf_tokens(":a:b:"), vec!["a".to_string()]);
    }

    #[test]
    fn test_extract_worksheet_fields() {
        let doc = Document::parse(SAMPLE_TWB).unwrap();
        let records = extract_worksheets(&doc);
        assert_eq!(records.len(), 1);

        let ws = &records[0];
        assert_eq!(ws.name, "Ventas por Region");
        assert_eq!(ws.title, "Ventas por Region");
        assert_eq!(ws.mark_type, "Pie");
        assert_eq!(ws.columns_axis, vec!["Region".to_string()]);
        assert_eq!(ws.rows_axis, vec!["Sales".to_string()]);

        assert_eq!(ws.data_sources.len(), 1);
        assert_eq!(ws.data_sources[0].caption, "Ventas (ventas)");
        assert_eq!(ws.data_sources[0].name, "federated.0abc123");
        assert_eq!(
            ws.data_sources[0].relation_name.as_deref(),
            Some("ventas.csv")
        );

        assert_eq!(ws.dependencies.len(), 1);
        let dep = &ws.dependencies[0];
        assert_eq!(dep.datasource_name, "federated.0abc123");
        assert_eq!(dep.columns.len(), 3);
        assert_eq!(dep.columns[0].role, Role::Dimension);
        assert_eq!(dep.columns[1].role, Role::Measure);
        assert_eq!(dep.columns[1].calculation_formula, None);
        assert_eq!(
            dep.columns[2].calculation_formula.as_deref(),
            Some("[Sales]*0.2")
        );
        assert_eq!(dep.column_instances.len(), 1);
        assert_eq!(dep.column_instances[0].column_ref, "[Sales]");
        assert_eq!(dep.column_instances[0].derivation, "Sum");
    }

    #[test]
    fn test_zero_worksheets_is_empty_not_error() {
        let doc = Document::parse("<workbook><datasources/></workbook>").unwrap();
        assert!(extract_worksheets(&doc).is_empty());
        assert!(extract_dashboards(&doc).is_empty());
    }

    #[test]
    fn test_unresolved_relation_is_none() {
        let xml = r#"<workbook>
          <worksheet name='W'>
            <datasources><datasource caption='Orphan' name='missing.1'/></datasources>
          </worksheet>
        </workbook>"#;
        let doc = Document::parse(xml).unwrap();
        let records = extract_worksheets(&doc);
        assert_eq!(records[0].data_sources[0].relation_name, None);
    }

    #[test]
    fn test_dashboard_zone_deduplication_preserves_order() {
        let xml = r#"<workbook>
          <dashboard name='D'>
            <zone name='A'/><zone name='B'/><zone/><zone name='A'/><zone name='C'/>
          </dashboard>
        </workbook>"#;
        let doc = Document::parse(xml).unwrap();
        let dashboards = extract_dashboards(&doc);
        assert_eq!(dashboards.len(), 1);
        assert_eq!(dashboards[0].name, "D");
        assert_eq!(
            dashboards[0].worksheet_names,
            vec!["A".to_string(), "B".to_string(), "C".to_string()]
        );
    }

    #[test]
    fn test_debug_dump_writes_json() {
        let doc = Document::parse(SAMPLE_TWB).unwrap();
        let records = extract_worksheets(&doc);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        write_debug_dump(&records, &path).unwrap();

        let dumped: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(dumped[0]["name"], "Ventas por Region");
        assert_eq!(dumped[0]["dependencies"][0]["columns"][0]["role"], "dimension");
    }

    proptest! {
        /// Interleaving colon-free junk with colon-delimited tokens always
        /// recovers exactly the tokens, in order.
        #[test]
        fn prop_shelf_tokens_recovers_all_segments(
            tokens in proptest::collection::vec("[a-zA-Z0-9 \\[\\]\\.]{1,12}", 0..5),
            junk in proptest::collection::vec("[a-zA-Z0-9 \\[\\]\\.]{0,8}", 5),
        ) {
            let mut text = String::new();
            for (i, token) in tokens.iter().enumerate() {
                text.push_str(&junk[i]);
                text.push(':');
                text.push_str(token);
                text.push(':');
            }
            prop_assert_eq!(shelf_tokens(&text), tokens);
        }
    }
}
