use std::collections::HashSet;

use crate::model::{Cell, Record};
use crate::table_parse::cell_text;

pub const RECORD_COLUMNS: [&str; 4] = ["SNo", "Name", "Email", "Title_and_Company"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

fn unique_header(cells: &[Cell]) -> Vec<String> {
    let mut seen = HashSet::new();
    cells
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            let base = match cell_text(cell).trim() {
                "" => format!("col_{}", index + 1),
                name => name.to_string(),
            };
            let mut name = base.clone();
            let mut suffix = 2;
            while !seen.insert(name.clone()) {
                name = format!("{base}_{suffix}");
                suffix += 1;
            }
            name
        })
        .collect()
}

impl Dataset {
    #[must_use]
    pub fn from_records(records: &[Record]) -> Self {
        let rows = records
            .iter()
            .map(|record| {
                vec![
                    record.serial.clone(),
                    record.name.clone(),
                    record.email.clone(),
                    record.remainder.clone(),
                ]
            })
            .collect();

        Self {
            header: RECORD_COLUMNS.iter().map(ToString::to_string).collect(),
            rows,
        }
    }

    #[must_use]
    pub fn from_positional(header: &[Cell], rows: &[Vec<Cell>]) -> Self {
        let header = unique_header(header);
        let width = header.len();
        let rows = rows
            .iter()
            .map(|row| {
                let mut values = row
                    .iter()
                    .take(width)
                    .map(|cell| cell_text(cell).to_string())
                    .collect::<Vec<_>>();
                values.resize(width, String::new());
                values
            })
            .collect();

        Self { header, rows }
    }

    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = Vec<(&str, &str)>> + '_ {
        self.rows.iter().map(|row| {
            self.header
                .iter()
                .map(String::as_str)
                .zip(row.iter().map(String::as_str))
                .collect()
        })
    }
}
