//! The roster sheet: rows held in memory, persisted as one Parquet file.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, Date32Array, Decimal128Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::datatypes::{DataType, Field as ArrowField, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use chrono::{Datelike, NaiveDate};
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use roster_core::schema::{INCOME_SCALE, arrow_type, headers, income_at_scale};
use roster_core::{Field, FieldKind, Record, RecordStore, RowId, Value, validate_field};
use rust_decimal::Decimal;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::StoreError;

/// Roster file used when none is configured.
pub const DEFAULT_FILE_NAME: &str = "Listado_Empresas_ARL_Automatizado.parquet";

const DECIMAL_PRECISION: u8 = 38;

/// `num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

static EMPTY: Value = Value::Empty;

/// All roster rows of one file.
///
/// Edits stay in memory until [`RosterSheet::save`]. Columns past the
/// fifteen roster columns are carried through as text.
#[derive(Debug)]
pub struct RosterSheet {
    path: PathBuf,
    file_header: Vec<String>,
    extra_columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RosterSheet {
    /// An empty sheet bound to `path`. Nothing is written until saved.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file_header: headers().into_iter().map(String::from).collect(),
            extra_columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Write a new file that holds only the header row.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let sheet = Self::new(path);
        sheet.save()?;
        info!(path = %sheet.path.display(), "created roster file");
        Ok(sheet)
    }

    /// Load every row of an existing file.
    ///
    /// Columns are matched to fields by position. A header that differs from
    /// the roster headers is logged; check [`RosterSheet::header_matches`].
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if !path.exists() {
            return Err(StoreError::NotFound(path));
        }

        let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(&path)?)?;
        let file_header: Vec<String> = builder
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        let extra_columns: Vec<String> = file_header.iter().skip(Field::COUNT).cloned().collect();
        let width = Field::COUNT + extra_columns.len();

        let mut rows = Vec::new();
        for batch in builder.build()? {
            let batch = batch?;
            let mut columns = batch
                .columns()
                .iter()
                .enumerate()
                .map(|(i, array)| column_values(Field::from_position(i + 1), array.as_ref()))
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .map(Vec::into_iter)
                .collect::<Vec<_>>();
            for _ in 0..batch.num_rows() {
                let mut row: Vec<Value> = columns
                    .iter_mut()
                    .map(|c| c.next().unwrap_or(Value::Empty))
                    .collect();
                row.resize(width, Value::Empty);
                rows.push(row);
            }
        }

        let sheet = Self {
            path,
            file_header,
            extra_columns,
            rows,
        };
        if !sheet.header_matches() {
            warn!(
                path = %sheet.path.display(),
                found = ?sheet.file_header,
                "roster header differs from the expected columns"
            );
        }
        info!(path = %sheet.path.display(), rows = sheet.rows.len(), "loaded roster file");
        Ok(sheet)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Column names as found in the file.
    pub fn header(&self) -> &[String] {
        &self.file_header
    }

    /// True when the file header is exactly the roster headers, in order.
    pub fn header_matches(&self) -> bool {
        self.file_header.iter().map(String::as_str).eq(headers())
    }

    /// Replace the file with the current rows.
    ///
    /// The sheet is written to a temporary file next to the target and renamed
    /// over it, so a failed save leaves the previous file untouched.
    pub fn save(&self) -> Result<(), StoreError> {
        let batch = self.to_batch()?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        let mut writer = ArrowWriter::try_new(tmp.as_file_mut(), batch.schema(), None)?;
        writer.write(&batch)?;
        writer.close()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;

        info!(path = %self.path.display(), rows = self.rows.len(), "saved roster file");
        Ok(())
    }

    fn width(&self) -> usize {
        Field::COUNT + self.extra_columns.len()
    }

    fn to_batch(&self) -> Result<RecordBatch, StoreError> {
        let mut fields = Vec::with_capacity(self.width());
        let mut arrays = Vec::with_capacity(self.width());

        for i in 0..self.width() {
            let (name, kind) = match Field::from_position(i + 1) {
                Some(field) => (field.header().to_string(), field.kind()),
                None => (self.extra_columns[i - Field::COUNT].clone(), FieldKind::Text),
            };
            let cells: Vec<&Value> = self
                .rows
                .iter()
                .map(|row| row.get(i).unwrap_or(&EMPTY))
                .collect();

            let array = column_array(kind, &cells)?;
            if array.data_type() != &arrow_type(kind) {
                warn!(column = %name, "column holds values of mixed kinds, saving as text");
            }
            fields.push(ArrowField::new(name, array.data_type().clone(), true));
            arrays.push(array);
        }

        Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
    }
}

impl RecordStore for RosterSheet {
    type Error = StoreError;

    fn append(&mut self, record: &Record) -> Result<RowId, StoreError> {
        let mut row = record.to_row();
        row.resize(self.width(), Value::Empty);
        self.rows.push(row);
        Ok(self.rows.len() - 1)
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn row(&self, id: RowId) -> Option<Vec<Value>> {
        self.rows
            .get(id)
            .map(|row| row.iter().take(Field::COUNT).cloned().collect())
    }

    fn set_cell(&mut self, id: RowId, field: Field, value: Value) -> Result<(), StoreError> {
        let row = self.rows.get_mut(id).ok_or(StoreError::RowOutOfRange(id))?;
        debug!(row = id, field = %field, value = %value, "cell updated");
        row[field.index()] = value;
        Ok(())
    }
}

// ── Arrow → cells ──

fn column_values(field: Option<Field>, array: &dyn Array) -> Result<Vec<Value>, StoreError> {
    (0..array.len()).map(|i| cell_value(field, array, i)).collect()
}

fn cell_value(field: Option<Field>, array: &dyn Array, i: usize) -> Result<Value, StoreError> {
    if array.is_null(i) {
        return Ok(Value::Empty);
    }

    let any = array.as_any();
    let typed = match array.data_type() {
        DataType::Date32 => any
            .downcast_ref::<Date32Array>()
            .and_then(|a| date_from_days(a.value(i)))
            .map(Value::Date),
        DataType::Decimal128(_, scale) => any
            .downcast_ref::<Decimal128Array>()
            .zip(u32::try_from(*scale).ok())
            .and_then(|(a, scale)| Decimal::try_from_i128_with_scale(a.value(i), scale).ok())
            .map(Value::Decimal),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| Value::Integer(a.value(i))),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| Value::Integer(i64::from(a.value(i)))),
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|a| text_value(field, a.value(i))),
        DataType::LargeUtf8 => any
            .downcast_ref::<LargeStringArray>()
            .map(|a| text_value(field, a.value(i))),
        _ => None,
    };

    match typed {
        Some(value) => Ok(value),
        None => Ok(text_value(field, &array_value_to_string(array, i)?)),
    }
}

/// Text cell, re-typed when it parses as its column's kind.
fn text_value(field: Option<Field>, s: &str) -> Value {
    if s.trim().is_empty() {
        return Value::Empty;
    }
    match field {
        Some(field) if field.kind() != FieldKind::Text => {
            validate_field(field, s).unwrap_or_else(|_| Value::text(s))
        }
        _ => Value::text(s),
    }
}

fn date_from_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

// ── cells → Arrow ──

/// Typed array for a column, or a text array when some cell does not fit the kind.
fn column_array(kind: FieldKind, cells: &[&Value]) -> Result<ArrayRef, StoreError> {
    let typed: Option<ArrayRef> = match kind {
        FieldKind::Date => collect_cells(cells, |v| match v {
            Value::Date(d) => Some(d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE),
            _ => None,
        })
        .map(|days| Arc::new(Date32Array::from(days)) as ArrayRef),
        FieldKind::Decimal => match collect_cells(cells, decimal_mantissa) {
            Some(mantissas) => Some(Arc::new(
                Decimal128Array::from(mantissas)
                    .with_precision_and_scale(DECIMAL_PRECISION, INCOME_SCALE)?,
            )),
            None => None,
        },
        FieldKind::Integer => collect_cells(cells, |v| match v {
            Value::Integer(i) => Some(*i),
            _ => None,
        })
        .map(|ints| Arc::new(Int64Array::from(ints)) as ArrayRef),
        FieldKind::Text => None,
    };

    Ok(typed.unwrap_or_else(|| {
        let text: Vec<Option<String>> = cells
            .iter()
            .map(|v| (!v.is_empty()).then(|| v.to_string()))
            .collect();
        Arc::new(StringArray::from(text))
    }))
}

/// Every cell through `convert`, blanks as nulls; `None` if any cell does not convert.
fn collect_cells<T>(
    cells: &[&Value],
    convert: impl Fn(&Value) -> Option<T>,
) -> Option<Vec<Option<T>>> {
    cells
        .iter()
        .map(|&v| if v.is_empty() { Some(None) } else { convert(v).map(Some) })
        .collect()
}

/// Mantissa at [`INCOME_SCALE`]; `None` for values the column cannot hold exactly.
fn decimal_mantissa(value: &Value) -> Option<i128> {
    let d = match value {
        Value::Decimal(d) => *d,
        Value::Integer(i) => Decimal::from(*i),
        _ => return None,
    };
    income_at_scale(d).map(|d| d.mantissa())
}
