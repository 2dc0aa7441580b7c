use crate::table_detect::detect_grids_in_page;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
}

pub type Cell = Option<String>;

pub type Row = Vec<Cell>;

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub page: u32,
    pub rows: Vec<Row>,
    pub confidence: f32,
}

impl Grid {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawPage {
    pub page_number: u32,
    pub lines: Vec<String>,
    pub grids: Vec<Grid>,
}

impl RawPage {
    #[must_use]
    pub fn from_text(page: &PageText, min_cols: usize) -> Self {
        let lines = page
            .text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            page_number: page.page_number,
            lines,
            grids: detect_grids_in_page(page, min_cols),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub serial: String,
    pub name: String,
    pub email: String,
    pub remainder: String,
}
