//! Column, bar, line and pie chart builders
//!
//! All four read the same single-category/single-value bindings and differ
//! only in visual type, default placement, sort target and filter emission,
//! so they share one assembly path configured per archetype.

use super::base::{
    advanced_filter, aggregation_field, axis_bindings, categorical_filter, category_projection,
    column_field, container, sort_definition, title_object, value_projection, Position,
};
use super::{Archetype, VisualDocument};
use crate::error::Result;
use crate::ids::IdGenerator;
use crate::records::WorksheetRecord;
use serde_json::json;

pub(crate) const COLUMN_POSITION: Position = Position {
    x: 100.0,
    y: 100.0,
    z: 2,
    width: 300.0,
    height: 300.0,
    tab_order: None,
};

pub(crate) const BAR_POSITION: Position = COLUMN_POSITION;

pub(crate) const LINE_POSITION: Position = Position {
    x: 9.4488915545918015,
    y: 0.0,
    z: 0,
    width: 1160.3238829038733,
    height: 680.32019193060978,
    tab_order: Some(0),
};

pub(crate) const PIE_POSITION: Position = Position {
    x: 9.4488915545918015,
    y: 0.0,
    z: 0,
    width: 1184.891000945812,
    height: 685.98952686336486,
    tab_order: Some(0),
};

/// What the default sort directive points at
enum SortBy {
    /// Ascending over the raw value column (column/bar)
    ValueAscending,
    /// Ascending over the category column (line)
    CategoryAscending,
    /// Descending over the aggregated value (pie)
    AggregateDescending,
}

struct ChartConfig {
    archetype: Archetype,
    default_position: Position,
    sort: SortBy,
    with_filters: bool,
}

fn chart(
    worksheet: &WorksheetRecord,
    name: &str,
    position: Option<Position>,
    ids: Option<&mut dyn IdGenerator>,
    config: ChartConfig,
) -> Result<VisualDocument> {
    let bindings = axis_bindings(worksheet)?;

    let (sort_field, direction) = match config.sort {
        SortBy::ValueAscending => (
            column_field(bindings.entity, bindings.value),
            "Ascending",
        ),
        SortBy::CategoryAscending => (
            column_field(bindings.entity, bindings.category),
            "Ascending",
        ),
        SortBy::AggregateDescending => (
            aggregation_field(bindings.entity, bindings.value, bindings.function),
            "Descending",
        ),
    };

    let visual = json!({
        "visualType": config.archetype.visual_type(),
        "query": {
            "queryState": {
                "Category": {
                    "projections": [
                        category_projection(bindings.entity, bindings.category)
                    ]
                },
                "Y": {
                    "projections": [
                        value_projection(bindings.entity, bindings.value, bindings.function)
                    ]
                }
            },
            "sortDefinition": sort_definition(sort_field, direction)
        },
        "visualContainerObjects": title_object(&worksheet.title),
        "drillFilterOtherVisuals": true
    });

    let filters = match (config.with_filters, ids) {
        (true, Some(ids)) => Some(json!([
            categorical_filter(
                ids.next_id(),
                column_field(bindings.entity, bindings.category)
            ),
            advanced_filter(
                ids.next_id(),
                aggregation_field(bindings.entity, bindings.value, bindings.function)
            ),
        ])),
        _ => None,
    };

    Ok(container(
        name,
        position.unwrap_or(config.default_position),
        visual,
        filters,
    ))
}

/// Vertical clustered-column chart, sorted ascending by its value field
pub fn column_chart(
    worksheet: &WorksheetRecord,
    name: &str,
    position: Option<Position>,
) -> Result<VisualDocument> {
    chart(
        worksheet,
        name,
        position,
        None,
        ChartConfig {
            archetype: Archetype::Column,
            default_position: COLUMN_POSITION,
            sort: SortBy::ValueAscending,
            with_filters: false,
        },
    )
}

/// Horizontal bar chart, sorted ascending by its value field
pub fn bar_chart(
    worksheet: &WorksheetRecord,
    name: &str,
    position: Option<Position>,
) -> Result<VisualDocument> {
    chart(
        worksheet,
        name,
        position,
        None,
        ChartConfig {
            archetype: Archetype::Bar,
            default_position: BAR_POSITION,
            sort: SortBy::ValueAscending,
            with_filters: false,
        },
    )
}

/// Line chart, sorted ascending by the category field, with one categorical
/// and one advanced filter
pub fn line_chart(
    worksheet: &WorksheetRecord,
    name: &str,
    position: Option<Position>,
    ids: &mut dyn IdGenerator,
) -> Result<VisualDocument> {
    chart(
        worksheet,
        name,
        position,
        Some(ids),
        ChartConfig {
            archetype: Archetype::Line,
            default_position: LINE_POSITION,
            sort: SortBy::CategoryAscending,
            with_filters: true,
        },
    )
}

/// Pie chart, sorted descending by the aggregated value, with one
/// categorical and one advanced filter
pub fn pie_chart(
    worksheet: &WorksheetRecord,
    name: &str,
    position: Option<Position>,
    ids: &mut dyn IdGenerator,
) -> Result<VisualDocument> {
    chart(
        worksheet,
        name,
        position,
        Some(ids),
        ChartConfig {
            archetype: Archetype::Pie,
            default_position: PIE_POSITION,
            sort: SortBy::AggregateDescending,
            with_filters: true,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::ids::SequentialIds;
    use crate::records::{ColumnInstance, DataSourceRef, Dependency};
    use pretty_assertions::assert_eq;

    fn worksheet() -> WorksheetRecord {
        WorksheetRecord {
            name: "Sales by Region".to_string(),
            title: "Sales by Region".to_string(),
            mark_type: "Bar".to_string(),
            data_sources: vec![DataSourceRef {
                caption: "Sales Data".to_string(),
                name: "federated.1".to_string(),
                relation_name: Some("sales.csv".to_string()),
            }],
            columns_axis: vec!["Region".to_string()],
            rows_axis: vec!["Sales".to_string()],
            dependencies: vec![Dependency {
                datasource_name: "federated.1".to_string(),
                columns: Vec::new(),
                column_instances: vec![ColumnInstance {
                    column_ref: "[Sales]".to_string(),
                    derivation: "Sum".to_string(),
                }],
            }],
        }
    }

    #[test]
    fn test_column_chart_shape() {
        let doc = column_chart(&worksheet(), "abc123", None).unwrap();

        assert_eq!(doc["$schema"], crate::VISUAL_CONTAINER_SCHEMA);
        assert_eq!(doc["name"], "abc123");
        assert_eq!(doc["position"]["x"], 100.0);
        assert_eq!(doc["position"]["z"], 2);
        assert!(doc["position"].get("tabOrder").is_none());
        assert_eq!(doc["visual"]["visualType"], "clusteredColumnChart");

        let query = &doc["visual"]["query"];
        assert_eq!(
            query["queryState"]["Category"]["projections"]
                .as_array()
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            query["queryState"]["Y"]["projections"]
                .as_array()
                .unwrap()
                .len(),
            1
        );
        // Ascending over the raw value column
        let sort = &query["sortDefinition"]["sort"][0];
        assert_eq!(sort["direction"], "Ascending");
        assert_eq!(sort["field"]["Column"]["Property"], "Sales");
        assert_eq!(query["sortDefinition"]["isDefaultSort"], true);

        assert_eq!(
            doc["visual"]["visualContainerObjects"]["title"][0]["properties"]["text"]["expr"]
                ["Literal"]["Value"],
            "Sales by Region"
        );
        assert_eq!(doc["visual"]["drillFilterOtherVisuals"], true);
        assert!(doc.get("filterConfig").is_none());
    }

    #[test]
    fn test_bar_chart_only_differs_in_visual_type() {
        let bar = bar_chart(&worksheet(), "n", None).unwrap();
        let column = column_chart(&worksheet(), "n", None).unwrap();
        assert_eq!(bar["visual"]["visualType"], "barChart");
        assert_eq!(bar["visual"]["query"], column["visual"]["query"]);
    }

    #[test]
    fn test_line_chart_sorts_by_category_and_filters() {
        let mut ids = SequentialIds::default();
        let doc = line_chart(&worksheet(), "n", None, &mut ids).unwrap();

        assert_eq!(doc["visual"]["visualType"], "lineChart");
        assert_eq!(doc["position"]["tabOrder"], 0);
        let sort = &doc["visual"]["query"]["sortDefinition"]["sort"][0];
        assert_eq!(sort["direction"], "Ascending");
        assert_eq!(sort["field"]["Column"]["Property"], "Region");

        let filters = doc["filterConfig"]["filters"].as_array().unwrap();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0]["type"], "Categorical");
        assert_eq!(filters[0]["field"]["Column"]["Property"], "Region");
        assert_eq!(filters[1]["type"], "Advanced");
        assert_eq!(
            filters[1]["field"]["Aggregation"]["Expression"]["Column"]["Property"],
            "Sales"
        );
        // Each filter carries a freshly generated identifier
        assert_ne!(filters[0]["name"], filters[1]["name"]);
    }

    #[test]
    fn test_pie_chart_sorts_descending_by_aggregate() {
        let mut ids = SequentialIds::default();
        let doc = pie_chart(&worksheet(), "n", None, &mut ids).unwrap();

        assert_eq!(doc["visual"]["visualType"], "pieChart");
        let sort = &doc["visual"]["query"]["sortDefinition"]["sort"][0];
        assert_eq!(sort["direction"], "Descending");
        assert_eq!(sort["field"]["Aggregation"]["Function"], 0);
        assert_eq!(
            doc["filterConfig"]["filters"].as_array().unwrap().len(),
            2
        );
    }

    #[test]
    fn test_derivation_code_flows_into_projection() {
        let mut ws = worksheet();
        ws.dependencies[0].column_instances[0].derivation = "Recuento".to_string();
        let doc = column_chart(&ws, "n", None).unwrap();
        assert_eq!(
            doc["visual"]["query"]["queryState"]["Y"]["projections"][0]["field"]["Aggregation"]
                ["Function"],
            5
        );
    }

    #[test]
    fn test_position_override() {
        let position = Position {
            x: 1.0,
            y: 2.0,
            z: 3,
            width: 4.0,
            height: 5.0,
            tab_order: None,
        };
        let doc = column_chart(&worksheet(), "n", Some(position)).unwrap();
        assert_eq!(doc["position"]["x"], 1.0);
        assert_eq!(doc["position"]["height"], 5.0);
    }

    #[test]
    fn test_missing_axis_is_reported_not_faulted() {
        let mut ws = worksheet();
        ws.columns_axis.clear();
        let err = column_chart(&ws, "n", None).unwrap_err();
        match err {
            Error::MissingBinding(missing) => {
                assert_eq!(missing.worksheet, "Sales by Region");
            }
            other => panic!("expected MissingBinding, got {:?}", other),
        }
    }
}
