//! Extracted record types
//!
//! The intermediate representation between a Tableau workbook and the Power
//! BI visual mapper. Records are built in one parse pass, held in memory and
//! consumed immediately; nothing mutates them after extraction.

use serde::Serialize;

/// Field role declared on a dependency column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Categorical field
    Dimension,
    /// Quantitative field
    Measure,
    /// Role attribute absent or unrecognized
    #[default]
    #[serde(rename = "")]
    Unknown,
}

impl Role {
    /// Parse the `role` attribute of a dependency column
    pub fn from_attr(value: &str) -> Self {
        match value {
            "dimension" => Role::Dimension,
            "measure" => Role::Measure,
            _ => Role::Unknown,
        }
    }
}

/// Data source bound to a worksheet
#[derive(Debug, Clone, Serialize)]
pub struct DataSourceRef {
    /// Display caption, used as the query entity name downstream
    pub caption: String,
    /// Internal data source name
    pub name: String,
    /// Backing relation, resolved from the workbook's top-level data source
    /// definitions; `None` when no nested relation was found
    pub relation_name: Option<String>,
}

/// Column metadata from a dependency block
#[derive(Debug, Clone, Serialize)]
pub struct ColumnDef {
    /// Display caption
    pub caption: String,
    /// Bracketed internal name, e.g. `[Sales]`
    pub name: String,
    /// Declared role
    pub role: Role,
    /// Formula, present only for calculated fields
    pub calculation_formula: Option<String>,
}

/// Aggregated use of a column on a worksheet
#[derive(Debug, Clone, Serialize)]
pub struct ColumnInstance {
    /// Bracketed name of the column this instance refers to
    pub column_ref: String,
    /// Free-text aggregation name, e.g. `Sum`, `Promedio`, `Recuento`
    pub derivation: String,
}

/// Dependency block: the columns a worksheet pulls from one data source
#[derive(Debug, Clone, Serialize)]
pub struct Dependency {
    /// Name of the data source the columns belong to
    pub datasource_name: String,
    /// Column metadata, in document order
    pub columns: Vec<ColumnDef>,
    /// Column instances, in document order
    pub column_instances: Vec<ColumnInstance>,
}

/// One record per `worksheet` element found in the workbook
#[derive(Debug, Clone, Serialize)]
pub struct WorksheetRecord {
    /// Worksheet identifier (its own `name` attribute)
    pub name: String,
    /// Display title from the nearest descendant run text; may be empty
    pub title: String,
    /// Mark-class attribute, the visual archetype hint (`Bar`, `Pie`, ...)
    pub mark_type: String,
    /// Data sources bound to the worksheet. Generators anchor every field
    /// reference to the first entry; multi-source worksheets are not
    /// supported.
    pub data_sources: Vec<DataSourceRef>,
    /// All `:token:`-delimited field tokens from the columns shelf, in order
    pub columns_axis: Vec<String>,
    /// All `:token:`-delimited field tokens from the rows shelf, in order
    pub rows_axis: Vec<String>,
    /// Dependency blocks, in document order
    pub dependencies: Vec<Dependency>,
}

impl WorksheetRecord {
    /// Whether `field` resolves to a column whose role is dimension.
    ///
    /// Both the queried token and every known column name/caption are
    /// bracket-stripped and case-folded before comparison. A `false` return
    /// means "unknown", never a confirmed negative: shelf tokens do not
    /// always line up with dependency column names.
    pub fn is_dimension(&self, field: &str) -> bool {
        let wanted = normalize_field(field);
        self.dependencies
            .iter()
            .flat_map(|dep| dep.columns.iter())
            .any(|col| {
                (normalize_field(&col.name) == wanted
                    || normalize_field(&col.caption) == wanted)
                    && col.role == Role::Dimension
            })
    }

    /// Compare this worksheet's name against `name`, trimmed and case-folded
    pub fn matches_name(&self, name: &str) -> bool {
        normalize_name(&self.name) == normalize_name(name)
    }
}

/// One record per `dashboard` element found in the workbook
#[derive(Debug, Clone, Serialize)]
pub struct DashboardRecord {
    /// Dashboard name attribute
    pub name: String,
    /// Zone names in first-occurrence order, de-duplicated
    pub worksheet_names: Vec<String>,
}

/// Strip bracket characters and case-fold, for field-token comparison
pub(crate) fn normalize_field(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '[' && *c != ']')
        .collect::<String>()
        .to_lowercase()
}

/// Trim and case-fold, for worksheet/dashboard name comparison
pub fn normalize_name(value: &str) -> String {
    value.trim().to_lowercase()
}
