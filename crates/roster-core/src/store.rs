//! The store seam used by the entry operations.

use crate::record::Record;
use crate::schema::Field;
use crate::value::Value;

/// Position of a data row in the store, zero-based, header excluded.
pub type RowId = usize;

/// Tabular storage of roster rows.
///
/// Entry operations receive the store explicitly; nothing here is global.
pub trait RecordStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Append a full row and return its position.
    fn append(&mut self, record: &Record) -> Result<RowId, Self::Error>;

    /// Number of data rows.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All cells of one row in schema order.
    fn row(&self, id: RowId) -> Option<Vec<Value>>;

    /// Every row with its position, in order.
    fn rows(&self) -> Vec<(RowId, Vec<Value>)> {
        (0..self.len())
            .filter_map(|id| self.row(id).map(|cells| (id, cells)))
            .collect()
    }

    fn cell(&self, id: RowId, field: Field) -> Option<Value> {
        self.row(id).and_then(|cells| cells.get(field.index()).cloned())
    }

    /// Overwrite a single cell.
    fn set_cell(&mut self, id: RowId, field: Field, value: Value) -> Result<(), Self::Error>;

    /// First row whose company name equals `name`, ignoring case.
    ///
    /// Company names are not unique; later duplicates are never returned.
    fn find_by_company_name(&self, name: &str) -> Option<RowId> {
        let wanted = name.to_lowercase();
        (0..self.len()).find(|&id| {
            self.cell(id, Field::CompanyName)
                .is_some_and(|v| v.to_string().to_lowercase() == wanted)
        })
    }
}
