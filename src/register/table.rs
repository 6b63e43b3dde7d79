//! BigQuery table resources

use serde::{Deserialize, Serialize};

/// Source format of an external table
pub const PARQUET_FORMAT: &str = "PARQUET";

/// Fully qualified table name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReference {
    /// Project
    pub project_id: String,
    /// Dataset
    pub dataset_id: String,
    /// Table
    pub table_id: String,
}

/// Where an external table reads its data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalDataConfiguration {
    /// Let the warehouse infer the schema from the files
    pub autodetect: bool,
    /// File format
    pub source_format: String,
    /// Storage URIs
    pub source_uris: Vec<String>,
}

/// Body of a `tables.insert` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableResource {
    /// Table name
    pub table_reference: TableReference,
    /// External source
    pub external_data_configuration: ExternalDataConfiguration,
}

impl TableResource {
    /// External table over Parquet files, schema autodetected
    pub fn external_parquet(
        project_id: impl Into<String>,
        dataset_id: impl Into<String>,
        table_id: impl Into<String>,
        source_uri: impl Into<String>,
    ) -> Self {
        Self {
            table_reference: TableReference {
                project_id: project_id.into(),
                dataset_id: dataset_id.into(),
                table_id: table_id.into(),
            },
            external_data_configuration: ExternalDataConfiguration {
                autodetect: true,
                source_format: PARQUET_FORMAT.to_string(),
                source_uris: vec![source_uri.into()],
            },
        }
    }

    /// `project.dataset.table`
    pub fn qualified_name(&self) -> String {
        let r = &self.table_reference;
        format!("{}.{}.{}", r.project_id, r.dataset_id, r.table_id)
    }
}

/// Table as returned by the warehouse
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    /// `project:dataset.table`
    #[serde(default)]
    pub id: Option<String>,
    /// Table name
    pub table_reference: TableReference,
    /// `EXTERNAL`, `TABLE`, ...
    #[serde(default, rename = "type")]
    pub table_type: Option<String>,
    /// Milliseconds since the epoch, as a string
    #[serde(default)]
    pub creation_time: Option<String>,
}
