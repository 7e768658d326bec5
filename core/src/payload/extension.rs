//! Database-extension tables attached to a student record.
//!
//! Both namespaces share one descriptor shape; every value travels as a
//! string-typed field.

use serde::Serialize;
use serde_json::{Map, Value};

use super::scalar_text;

/// Vendor-defined extension table.
pub const BUILT_IN_EXTENSION: &str = "u_studentsuserfields";
/// Site-defined extension table.
pub const SITE_EXTENSION: &str = "u_students_extension";

/// Wrapper holding every extension table of one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtensionData {
    #[serde(rename = "_table_extension")]
    pub tables: Vec<TableExtension>,
}

/// One extension table and the fields to write into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableExtension {
    pub name: String,
    #[serde(rename = "recordFound")]
    pub record_found: bool,
    #[serde(rename = "_field")]
    pub fields: Vec<ExtensionField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtensionField {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// Build the descriptor for `namespace` from its key/value pairs.
pub fn table_extension(namespace: &str, data: &Map<String, Value>) -> TableExtension {
    TableExtension {
        name: namespace.to_string(),
        record_found: false,
        fields: data
            .iter()
            .map(|(key, value)| ExtensionField {
                name: key.clone(),
                kind: "String".to_string(),
                value: scalar_text(value),
            })
            .collect(),
    }
}

/// Collect the tables present on a record, built-in first.
/// `None` when neither namespace was supplied.
pub fn extension_data(
    built_in: Option<&Map<String, Value>>,
    site: Option<&Map<String, Value>>,
) -> Option<ExtensionData> {
    let tables: Vec<TableExtension> = [(BUILT_IN_EXTENSION, built_in), (SITE_EXTENSION, site)]
        .into_iter()
        .filter_map(|(namespace, data)| data.map(|d| table_extension(namespace, d)))
        .collect();

    if tables.is_empty() {
        None
    } else {
        Some(ExtensionData { tables })
    }
}
