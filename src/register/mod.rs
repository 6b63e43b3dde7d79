//! Register step
//!
//! Creates a warehouse external table over the uploaded artifact.

mod client;
mod table;

pub use client::{warehouse_auth, WarehouseClient};
pub use table::{
    ExternalDataConfiguration, TableInfo, TableReference, TableResource, PARQUET_FORMAT,
};
