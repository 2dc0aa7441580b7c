use tracing::debug;

use crate::model::{Grid, PageText, Row};
use crate::table_parse::{into_row, modal_width, soft_split_line_into_cells, split_line_into_cells};

pub(crate) const LOW_CONFIDENCE_THRESHOLD: f32 = 0.60;

#[allow(clippy::cast_precision_loss)]
fn grid_confidence(rows: &[Row]) -> f32 {
    if rows.is_empty() {
        return 0.0;
    }

    let modal = modal_width(rows);
    if modal == 0 {
        return 0.0;
    }

    let consistent =
        rows.iter().filter(|row| row.len() == modal).count() as f32 / rows.len() as f32;
    let widest = rows.iter().map(Vec::len).max().unwrap_or(modal);
    let narrowest = rows.iter().map(Vec::len).min().unwrap_or(modal);
    let uniformity = 1.0 - ((widest - narrowest) as f32 / widest as f32);

    (consistent * 0.75 + uniformity * 0.25).clamp(0.0, 1.0)
}

struct LineCells {
    cells: Vec<String>,
    hard: bool,
}

impl LineCells {
    fn has_digits(&self) -> bool {
        self.cells
            .iter()
            .any(|cell| cell.chars().any(|ch| ch.is_ascii_digit()))
    }
}

fn line_cells(line: &str, min_cols: usize) -> Option<LineCells> {
    let cells = split_line_into_cells(line);
    if cells.len() >= min_cols {
        return Some(LineCells { cells, hard: true });
    }

    let soft = LineCells {
        cells: soft_split_line_into_cells(line),
        hard: false,
    };
    let reads_like_sentence = line.trim_end().ends_with(['.', '!', '?']);

    (soft.cells.len() >= min_cols
        && !reads_like_sentence
        && (soft.has_digits() || soft.cells.len() <= 6))
        .then_some(soft)
}

fn is_caption(line: &LineCells, next: Option<&Option<LineCells>>) -> bool {
    !line.hard && !line.has_digits() && matches!(next, Some(Some(next)) if next.hard)
}

// A lone hard-split row only counts when the page has no larger table.
pub(crate) fn detect_grids_in_page(page: &PageText, min_cols: usize) -> Vec<Grid> {
    let min_cols = min_cols.max(2);
    let mut lines = page
        .text
        .lines()
        .map(|line| line_cells(line, min_cols))
        .peekable();

    let mut runs: Vec<Vec<LineCells>> = Vec::new();
    let mut current: Vec<LineCells> = Vec::new();
    while let Some(entry) = lines.next() {
        match entry {
            Some(cells) if current.is_empty() && is_caption(&cells, lines.peek()) => {}
            Some(cells) => current.push(cells),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    let has_table = runs.iter().any(|run| run.len() >= 2);
    let grids = runs
        .into_iter()
        .filter(|run| run.len() >= 2 || (!has_table && run[0].hard))
        .map(|run| {
            let rows = run
                .into_iter()
                .map(|line| into_row(line.cells))
                .collect::<Vec<Row>>();
            Grid {
                page: page.page_number,
                confidence: grid_confidence(&rows),
                rows,
            }
        })
        .collect::<Vec<_>>();

    debug!(
        page = page.page_number,
        grids = grids.len(),
        "detected table grids"
    );
    grids
}
