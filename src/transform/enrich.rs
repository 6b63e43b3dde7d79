//! Left join of the tabular frame against the category lookup

use super::category::CategoryLookup;
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::output::parse_int;
use tracing::info;

/// Join key column in the tabular frame
pub const CATEGORY_ID_COLUMN: &str = "categoryId";

/// Column appended by the join
pub const CATEGORY_COLUMN: &str = "category";

/// Append a `category` column holding the title for each row's `categoryId`
///
/// Every input row is kept, in order. Rows whose identifier is null,
/// unparsable or unknown get a null title.
pub fn enrich(mut frame: Frame, lookup: &CategoryLookup) -> Result<Frame> {
    let titles: Vec<Option<String>> = frame
        .column(CATEGORY_ID_COLUMN)?
        .into_iter()
        .map(|cell| {
            cell.and_then(|raw| parse_int(raw.trim()))
                .and_then(|id| lookup.get(id))
                .map(str::to_string)
        })
        .collect();

    if frame.has_column(CATEGORY_COLUMN) {
        return Err(Error::Other(format!(
            "Input already has a '{CATEGORY_COLUMN}' column"
        )));
    }

    let unmatched = titles.iter().filter(|t| t.is_none()).count();
    frame.add_column(CATEGORY_COLUMN, titles)?;

    info!(
        rows = frame.num_rows(),
        columns = frame.num_columns(),
        unmatched,
        "Merged records with categories"
    );
    Ok(frame)
}
