//! Table visual builder
//!
//! The only archetype that does not read the single-category/single-value
//! bindings: it projects one column per field it can find, which is why it
//! serves as the fallback for unrecognized mark types and for worksheets
//! whose shelf text produced no axis tokens.

use super::base::{
    categorical_filter, column_field, container, title_object, Position,
};
use super::VisualDocument;
use crate::error::{BindingKind, MissingFieldBinding, Result};
use crate::ids::IdGenerator;
use crate::records::WorksheetRecord;
use serde_json::{json, Value};

pub(crate) const TABLE_POSITION: Position = Position {
    x: 532.91748367897765,
    y: 120.94581189877506,
    z: 4,
    width: 487.56280421693697,
    height: 177.63916122632588,
    tab_order: Some(2),
};

/// Column name used when a worksheet exposes neither axis tokens nor
/// dependency columns
pub const PLACEHOLDER_COLUMN: &str = "DefaultColumn";

/// Plain table over every column the worksheet exposes, with one
/// categorical filter per column
pub fn table(
    worksheet: &WorksheetRecord,
    name: &str,
    position: Option<Position>,
    ids: &mut dyn IdGenerator,
) -> Result<VisualDocument> {
    let entity = &worksheet
        .data_sources
        .first()
        .ok_or_else(|| MissingFieldBinding::new(&worksheet.name, BindingKind::DataSource))?
        .caption;

    let columns = table_columns(worksheet);

    let mut projections: Vec<Value> = Vec::with_capacity(columns.len());
    let mut filters: Vec<Value> = Vec::with_capacity(columns.len());
    for column in &columns {
        projections.push(json!({
            "field": column_field(entity, column),
            "queryRef": format!("{}.{}", entity, column),
            "nativeQueryRef": column
        }));
        filters.push(categorical_filter(
            ids.next_id(),
            column_field(entity, column),
        ));
    }

    let visual = json!({
        "visualType": super::Archetype::Table.visual_type(),
        "query": {
            "queryState": {
                "Values": {
                    "projections": projections
                }
            }
        },
        "drillFilterOtherVisuals": true,
        "visualContainerObjects": title_object(&worksheet.title)
    });

    Ok(container(
        name,
        position.unwrap_or(TABLE_POSITION),
        visual,
        Some(json!(filters)),
    ))
}

/// Fallback order: axis tokens first, then the first dependency block's
/// column names (bracket-stripped), then a single placeholder.
fn table_columns(worksheet: &WorksheetRecord) -> Vec<String> {
    if !worksheet.columns_axis.is_empty() {
        return worksheet.columns_axis.clone();
    }
    let derived: Vec<String> = worksheet
        .dependencies
        .first()
        .map(|dep| {
            dep.columns
                .iter()
                .map(|col| col.name.trim_matches(|c| c == '[' || c == ']').to_string())
                .collect()
        })
        .unwrap_or_default();
    if !derived.is_empty() {
        return derived;
    }
    vec![PLACEHOLDER_COLUMN.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::ids::SequentialIds;
    use crate::records::{ColumnDef, DataSourceRef, Dependency, Role};
    use pretty_assertions::assert_eq;

    fn worksheet(cols: &[&str], dependency_columns: &[&str]) -> WorksheetRecord {
        WorksheetRecord {
            name: "Detail".to_string(),
            title: "Detail".to_string(),
            mark_type: "Text".to_string(),
            data_sources: vec![DataSourceRef {
                caption: "Sales Data".to_string(),
                name: "federated.1".to_string(),
                relation_name: None,
            }],
            columns_axis: cols.iter().map(|s| s.to_string()).collect(),
            rows_axis: Vec::new(),
            dependencies: vec![Dependency {
                datasource_name: "federated.1".to_string(),
                columns: dependency_columns
                    .iter()
                    .map(|name| ColumnDef {
                        caption: String::new(),
                        name: name.to_string(),
                        role: Role::Dimension,
                        calculation_formula: None,
                    })
                    .collect(),
                column_instances: Vec::new(),
            }],
        }
    }

    #[test]
    fn test_axis_tokens_take_precedence() {
        let ws = worksheet(&["Region", "Segment"], &["[Sales]"]);
        assert_eq!(table_columns(&ws), vec!["Region", "Segment"]);
    }

    #[test]
    fn test_dependency_columns_are_bracket_stripped() {
        let ws = worksheet(&[], &["[Region]", "[Sales]"]);
        assert_eq!(table_columns(&ws), vec!["Region", "Sales"]);
    }

    #[test]
    fn test_placeholder_when_nothing_derivable() {
        let ws = worksheet(&[], &[]);
        assert_eq!(table_columns(&ws), vec![PLACEHOLDER_COLUMN]);
    }

    #[test]
    fn test_table_projects_and_filters_every_column() {
        let mut ids = SequentialIds::default();
        let doc = table(&worksheet(&["Region", "Segment"], &[]), "n", None, &mut ids).unwrap();

        assert_eq!(doc["visual"]["visualType"], "tableEx");
        assert_eq!(doc["position"]["tabOrder"], 2);

        let projections = doc["visual"]["query"]["queryState"]["Values"]["projections"]
            .as_array()
            .unwrap();
        assert_eq!(projections.len(), 2);
        assert_eq!(projections[0]["nativeQueryRef"], "Region");
        assert_eq!(projections[0]["queryRef"], "Sales Data.Region");
        // Table projections carry no aggregation and no active flag
        assert!(projections[0].get("active").is_none());

        let filters = doc["filterConfig"]["filters"].as_array().unwrap();
        assert_eq!(filters.len(), 2);
        assert!(filters.iter().all(|f| f["type"] == "Categorical"));
        assert_ne!(filters[0]["name"], filters[1]["name"]);
    }

    #[test]
    fn test_table_requires_a_data_source() {
        let mut ws = worksheet(&["Region"], &[]);
        ws.data_sources.clear();
        let mut ids = SequentialIds::default();
        let err = table(&ws, "n", None, &mut ids).unwrap_err();
        assert!(matches!(err, Error::MissingBinding(_)));
    }
}
