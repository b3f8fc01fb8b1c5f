//! Shared builders for visual-container documents
//!
//! Every archetype emits the same field-expression shapes (a column
//! reference, an aggregation over a column) and the same container
//! scaffolding; the archetype modules only differ in how they assemble
//! them.

use crate::aggregation::AggregationFunction;
use crate::error::{BindingKind, MissingFieldBinding, Result};
use crate::records::WorksheetRecord;
use serde_json::{json, Value};
use tracing::warn;

/// Placement rectangle for a visual container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Horizontal offset
    pub x: f64,
    /// Vertical offset
    pub y: f64,
    /// Stacking order
    pub z: u32,
    /// Container width
    pub width: f64,
    /// Container height
    pub height: f64,
    /// Tab order, included in the document only when set
    pub tab_order: Option<u32>,
}

impl Position {
    pub(crate) fn to_json(self) -> Value {
        let mut position = json!({
            "x": self.x,
            "y": self.y,
            "z": self.z,
            "height": self.height,
            "width": self.width,
        });
        if let Some(tab_order) = self.tab_order {
            position["tabOrder"] = json!(tab_order);
        }
        position
    }
}

/// Field bindings every chart archetype reads from a worksheet.
///
/// All references anchor to the first data source; the first columns-axis
/// token is the category and the first rows-axis token the value.
#[derive(Debug)]
pub(crate) struct AxisBindings<'a> {
    pub entity: &'a str,
    pub category: &'a str,
    pub value: &'a str,
    pub function: AggregationFunction,
}

pub(crate) fn axis_bindings(worksheet: &WorksheetRecord) -> Result<AxisBindings<'_>> {
    let entity = &worksheet
        .data_sources
        .first()
        .ok_or_else(|| MissingFieldBinding::new(&worksheet.name, BindingKind::DataSource))?
        .caption;
    let category = worksheet
        .columns_axis
        .first()
        .ok_or_else(|| MissingFieldBinding::new(&worksheet.name, BindingKind::ColumnsAxis))?;
    let value = worksheet
        .rows_axis
        .first()
        .ok_or_else(|| MissingFieldBinding::new(&worksheet.name, BindingKind::RowsAxis))?;
    let dependency = worksheet
        .dependencies
        .first()
        .ok_or_else(|| MissingFieldBinding::new(&worksheet.name, BindingKind::Dependencies))?;
    let instance = dependency
        .column_instances
        .first()
        .ok_or_else(|| MissingFieldBinding::new(&worksheet.name, BindingKind::ColumnInstance))?;

    let function = match AggregationFunction::from_derivation(&instance.derivation) {
        Some(function) => function,
        None => {
            if !instance.derivation.is_empty() {
                warn!(
                    worksheet = %worksheet.name,
                    derivation = %instance.derivation,
                    "unknown derivation, defaulting to Sum"
                );
            }
            AggregationFunction::Sum
        }
    };

    Ok(AxisBindings {
        entity: entity.as_str(),
        category: category.as_str(),
        value: value.as_str(),
        function,
    })
}

/// `Column` field expression referencing `entity.property`
pub(crate) fn column_field(entity: &str, property: &str) -> Value {
    json!({
        "Column": {
            "Expression": {
                "SourceRef": {
                    "Entity": entity
                }
            },
            "Property": property
        }
    })
}

/// `Aggregation` field expression wrapping a column reference
pub(crate) fn aggregation_field(
    entity: &str,
    property: &str,
    function: AggregationFunction,
) -> Value {
    json!({
        "Aggregation": {
            "Expression": {
                "Column": {
                    "Expression": {
                        "SourceRef": {
                            "Entity": entity
                        }
                    },
                    "Property": property
                }
            },
            "Function": function.code()
        }
    })
}

/// Active category projection for the `Category` bucket
pub(crate) fn category_projection(entity: &str, property: &str) -> Value {
    json!({
        "field": column_field(entity, property),
        "queryRef": format!("{}.{}", entity, property),
        "nativeQueryRef": property,
        "active": true
    })
}

/// Aggregated value projection for the `Y` bucket
pub(crate) fn value_projection(
    entity: &str,
    property: &str,
    function: AggregationFunction,
) -> Value {
    json!({
        "field": aggregation_field(entity, property, function),
        "queryRef": format!("{}({}.{})", function.name(), entity, property),
        "nativeQueryRef": format!("{} of {}", function.name(), property)
    })
}

/// Default sort directive over a single field
pub(crate) fn sort_definition(field: Value, direction: &str) -> Value {
    json!({
        "sort": [
            {
                "field": field,
                "direction": direction
            }
        ],
        "isDefaultSort": true
    })
}

/// Container title carrying the worksheet title
pub(crate) fn title_object(title: &str) -> Value {
    json!({
        "title": [
            {
                "properties": {
                    "text": {
                        "expr": {
                            "Literal": {
                                "Value": title
                            }
                        }
                    }
                }
            }
        ]
    })
}

/// Categorical filter descriptor over a field
pub(crate) fn categorical_filter(name: String, field: Value) -> Value {
    json!({
        "name": name,
        "field": field,
        "type": "Categorical"
    })
}

/// Advanced filter descriptor over a field
pub(crate) fn advanced_filter(name: String, field: Value) -> Value {
    json!({
        "name": name,
        "field": field,
        "type": "Advanced"
    })
}

/// Assemble the top-level container document
pub(crate) fn container(
    name: &str,
    position: Position,
    visual: Value,
    filters: Option<Value>,
) -> Value {
    let mut document = json!({
        "$schema": crate::VISUAL_CONTAINER_SCHEMA,
        "name": name,
        "position": position.to_json(),
        "visual": visual
    });
    if let Some(filters) = filters {
        document["filterConfig"] = json!({ "filters": filters });
    }
    document
}
