//! Scripted console and in-memory store for driving entry operations in tests.

use std::collections::VecDeque;
use std::io;

use thiserror::Error;

use crate::console::Console;
use crate::record::Record;
use crate::schema::Field;
use crate::store::{RecordStore, RowId};
use crate::value::Value;

/// Replays queued input lines and records everything shown.
#[derive(Default)]
pub(crate) struct ScriptedConsole {
    input: VecDeque<String>,
    pub prompts: Vec<String>,
    pub output: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn remaining(&self) -> usize {
        self.input.len()
    }

    /// True when any output line contains `needle`.
    pub fn said(&self, needle: &str) -> bool {
        self.output.iter().any(|l| l.contains(needle))
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.input.pop_front())
    }

    fn say(&mut self, line: &str) {
        self.output.push(line.to_string());
    }
}

#[derive(Debug, Error)]
#[error("row {0} out of range")]
pub(crate) struct RowOutOfRange(RowId);

#[derive(Default)]
pub(crate) struct MemoryStore {
    pub rows: Vec<Vec<Value>>,
}

impl RecordStore for MemoryStore {
    type Error = RowOutOfRange;

    fn append(&mut self, record: &Record) -> Result<RowId, Self::Error> {
        self.rows.push(record.to_row());
        Ok(self.rows.len() - 1)
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn row(&self, id: RowId) -> Option<Vec<Value>> {
        self.rows.get(id).cloned()
    }

    fn set_cell(&mut self, id: RowId, field: Field, value: Value) -> Result<(), Self::Error> {
        let row = self.rows.get_mut(id).ok_or(RowOutOfRange(id))?;
        row[field.index()] = value;
        Ok(())
    }
}

/// Interactive answers for a complete NIT company, one per prompted field.
pub(crate) fn nit_answers(name: &str) -> Vec<String> {
    [
        "Persona Juridica",
        "24/06/2025",
        name,
        "nit",
        "900123456-7",
        "62090",
        "125000000",
        "Bolivar",
        "Cartagena",
        "Calle 1 # 2-3",
        "info@acme.co",
        "3101234567",
        "",
        "Ana Perez",
        "Riesgo I",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// A well-formed bulk line for a NIT company.
pub(crate) fn nit_line(name: &str) -> String {
    format!(
        "Persona Juridica|24/06/2025|{name}|NIT|900123456-7|62090|125000000|Bolivar|Cartagena|Calle 1 # 2-3|info@acme.co|3101234567||Ana Perez|Riesgo I"
    )
}

/// Assert the identification invariant over every stored row.
pub(crate) fn assert_id_invariant(store: &impl RecordStore) {
    for (id, row) in store.rows() {
        let id_type = &row[Field::IdType.index()];
        let number = &row[Field::IdNumber.index()];
        match id_type.as_text() {
            Some("NO NIT") => assert_eq!(number, &Value::text("N/A")),
            Some("NIT") => assert!(
                crate::consistency::supports_nit(number),
                "NIT row {id} with number {number:?}"
            ),
            other => panic!("row {id}: unexpected identification type {other:?}"),
        }
    }
}
