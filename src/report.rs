//! Report-level JSON templates
//!
//! The page, pages-metadata and report-settings documents are fixed shapes
//! copied from what Power BI Desktop writes for an empty report; only names
//! and page order vary. No mapping logic lives here.

use serde_json::{json, Value};

/// Page definition for one dashboard
pub fn page_definition(name: &str, display_name: &str) -> Value {
    json!({
        "$schema": crate::PAGE_SCHEMA,
        "name": name,
        "displayName": display_name,
        "displayOption": "FitToPage",
        "height": 720,
        "width": 1280
    })
}

/// Pages metadata: ordering plus the active page (the first one, or empty
/// when the report has no pages)
pub fn pages_metadata(page_order: &[String]) -> Value {
    json!({
        "$schema": crate::PAGES_METADATA_SCHEMA,
        "pageOrder": page_order,
        "activePageName": page_order.first().map(String::as_str).unwrap_or("")
    })
}

/// Report settings with the Power BI Desktop defaults
pub fn report_definition() -> Value {
    json!({
        "$schema": crate::REPORT_SCHEMA,
        "themeCollection": {
            "baseTheme": {
                "name": "CY24SU10",
                "reportVersionAtImport": "5.64",
                "type": "SharedResources"
            }
        },
        "layoutOptimization": "None",
        "objects": {
            "section": [
                {
                    "properties": {
                        "verticalAlignment": {
                            "expr": {
                                "Literal": {
                                    "Value": "'Top'"
                                }
                            }
                        }
                    }
                }
            ]
        },
        "resourcePackages": [
            {
                "name": "SharedResources",
                "type": "SharedResources",
                "items": [
                    {
                        "name": "CY24SU10",
                        "path": "BaseThemes/CY24SU10.json",
                        "type": "BaseTheme"
                    }
                ]
            }
        ],
        "settings": {
            "useStylableVisualContainerHeader": true,
            "defaultDrillFilterOtherVisuals": true,
            "allowChangeFilterTypes": true,
            "useDefaultAggregateDisplayName": true
        }
    })
}
