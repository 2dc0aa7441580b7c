use std::collections::HashMap;

use crate::model::{Cell, Row};

pub(crate) fn split_line_into_cells(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut pending_space = 0_usize;

    let mut flush = |current: &mut String| {
        let cell = current.trim();
        if !cell.is_empty() {
            cells.push(cell.to_string());
        }
        current.clear();
    };

    for ch in line.trim().chars() {
        match ch {
            '\t' => {
                flush(&mut current);
                pending_space = 0;
            }
            ch if ch.is_whitespace() => {
                pending_space += 1;
                if pending_space == 2 {
                    flush(&mut current);
                }
            }
            ch => {
                if pending_space == 1 {
                    current.push(' ');
                }
                pending_space = 0;
                current.push(ch);
            }
        }
    }
    flush(&mut current);

    cells
}

pub(crate) fn soft_split_line_into_cells(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

pub(crate) fn into_row(cells: Vec<String>) -> Row {
    cells
        .into_iter()
        .map(|cell| if cell.is_empty() { None } else { Some(cell) })
        .collect()
}

pub(crate) fn modal_width(rows: &[Row]) -> usize {
    let mut freq = HashMap::new();
    for width in rows.iter().map(Vec::len) {
        *freq.entry(width).or_insert(0_usize) += 1;
    }

    freq.into_iter()
        .max_by_key(|(width, count)| (*count, *width))
        .map_or(0, |(width, _)| width)
}

pub(crate) fn cell_text(cell: &Cell) -> &str {
    cell.as_deref().unwrap_or_default()
}
