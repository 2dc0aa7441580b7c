use crate::dataset::Dataset;
use crate::error::ExtractError;
use crate::model::{RawPage, Row};
use crate::warning::{ExtractWarning, WarningCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub dataset: Dataset,
    pub table_count: usize,
}

// Only the first row overall is a header; a header repeated on a later page stays a data row.
pub fn reconcile_tables(
    pages: &[RawPage],
    warnings: &mut Vec<ExtractWarning>,
) -> Result<Reconciled, ExtractError> {
    let mut all_rows: Vec<(u32, &Row)> = Vec::new();
    let mut table_count = 0;

    for page in pages {
        for grid in page.grids.iter().filter(|grid| !grid.is_empty()) {
            table_count += 1;
            all_rows.extend(grid.rows.iter().map(|row| (page.page_number, row)));
        }
    }

    let Some(((_, header), data)) = all_rows.split_first() else {
        return Err(ExtractError::NoTablesFound);
    };

    for (page, row) in data.iter().filter(|(_, row)| row.len() != header.len()) {
        warnings.push(
            ExtractWarning::new(
                WarningCode::RaggedRow,
                format!(
                    "row has {} cell(s) but the header has {}; cells are aligned by position",
                    row.len(),
                    header.len()
                ),
            )
            .with_page(*page),
        );
    }

    let data = data.iter().map(|(_, row)| (*row).clone()).collect::<Vec<_>>();
    Ok(Reconciled {
        dataset: Dataset::from_positional(header, &data),
        table_count,
    })
}
