mod common;

use std::borrow::Cow;
use std::process::Command;

use pdf_table_extract::{
    ExportFormat, ExtractError, ExtractOptions, ExtractWarningCode, RECORD_COLUMNS,
    export_pdf_bytes, export_pdf_file, extract_dataset, prepare,
};
use tempfile::tempdir;

const HR_REPORT: [&str; 4] = [
    "HR CONTACT LIST",
    "1 Jane Doe jane@x.com Engineer at Acme",
    "Corp HQ",
    "2 John Roe john@y.org Manager, Globex",
];

#[test]
fn record_mode_merges_wrapped_lines() {
    let pdf = common::build_pdf(&[HR_REPORT.to_vec()]);

    let extraction =
        extract_dataset(&pdf, &ExtractOptions::records()).expect("extraction should succeed");

    let dataset = extraction.dataset;
    assert_eq!(dataset.header(), RECORD_COLUMNS);
    assert_eq!(dataset.row_count(), 2, "rows: {:?}", dataset.rows());
    assert_eq!(dataset.rows()[0][1], "Jane Doe");
    assert_eq!(dataset.rows()[0][3], "Engineer at Acme Corp HQ");
    assert_eq!(dataset.rows()[1][2], "john@y.org");
}

#[test]
fn table_mode_merges_tables_from_multiple_pages() {
    let pdf = common::build_pdf(&[
        vec!["City  Pop  Rank", "Oslo  700  2", "Lima  9000  1"],
        vec!["Rome  2800  3", "Bern  140  4"],
    ]);

    let extraction =
        extract_dataset(&pdf, &ExtractOptions::tables()).expect("extraction should succeed");

    assert_eq!(extraction.dataset.header(), ["City", "Pop", "Rank"]);
    assert_eq!(
        extraction.dataset.rows(),
        [
            vec!["Oslo", "700", "2"],
            vec!["Lima", "9000", "1"],
            vec!["Rome", "2800", "3"],
            vec!["Bern", "140", "4"],
        ]
    );
    assert_eq!(extraction.report.table_count, 2);
    assert_eq!(extraction.report.page_count, 2);
}

#[test]
fn multi_page_documents_are_read_by_the_layout_reader() {
    let pdf = common::build_pdf(&[vec!["A  B", "1  2"], vec!["3  4", "5  6"]]);

    let extraction =
        extract_dataset(&pdf, &ExtractOptions::tables()).expect("extraction should succeed");

    assert_eq!(extraction.report.reader, "pdf-extract");
    assert!(
        extraction
            .report
            .warnings
            .iter()
            .all(|warning| warning.code != ExtractWarningCode::ReaderFallback),
        "{:?}",
        extraction.report.warnings
    );
    assert_eq!(
        extraction.dataset.rows(),
        [vec!["1", "2"], vec!["3", "4"], vec!["5", "6"]]
    );
}

#[test]
fn single_row_continuing_a_table_on_the_next_page_is_kept() {
    let pdf = common::build_pdf(&[vec!["A  B", "1  2"], vec!["3  4"]]);

    let extraction =
        extract_dataset(&pdf, &ExtractOptions::tables()).expect("extraction should succeed");

    assert_eq!(extraction.dataset.header(), ["A", "B"]);
    assert_eq!(extraction.dataset.rows(), [vec!["1", "2"], vec!["3", "4"]]);
    assert_eq!(extraction.report.table_count, 2);
}

#[test]
fn title_line_above_a_table_does_not_become_the_header() {
    let pdf = common::build_pdf(&[vec!["Staff Directory", "City  Pop", "Oslo  700"]]);

    let extraction =
        extract_dataset(&pdf, &ExtractOptions::tables()).expect("extraction should succeed");

    assert_eq!(extraction.dataset.header(), ["City", "Pop"]);
    assert_eq!(extraction.dataset.rows(), [vec!["Oslo", "700"]]);
}

#[test]
fn table_mode_without_tables_reports_no_tables() {
    let pdf = common::build_pdf(&[vec!["This is plain narrative text without columns."]]);

    let error = extract_dataset(&pdf, &ExtractOptions::tables()).expect_err("no tables");
    assert!(matches!(error, ExtractError::NoTablesFound), "{error:?}");
}

#[test]
fn page_selection_limits_the_pages_read() {
    let pdf = common::build_pdf(&[vec!["A  B", "1  2"], vec!["X  Y", "8  9"]]);
    let options = ExtractOptions {
        pages: Some("2".parse().expect("selection should parse")),
        ..ExtractOptions::tables()
    };

    let extraction = extract_dataset(&pdf, &options).expect("extraction should succeed");
    assert_eq!(extraction.dataset.header(), ["X", "Y"]);
    assert_eq!(extraction.report.page_count, 1);
}

#[test]
fn unreadable_bytes_fail_without_output() {
    let error = export_pdf_bytes(
        b"%PDF-1.7 truncated",
        &ExtractOptions::tables(),
        ExportFormat::Csv,
    )
    .expect_err("garbage should not parse");
    assert!(
        matches!(error, ExtractError::PdfLoad(_) | ExtractError::Decode(_)),
        "{error:?}"
    );
}

#[test]
fn unprotected_document_passes_through_the_gate() {
    let pdf = common::build_pdf(&[vec!["A  B", "1  2"]]);
    let prepared = prepare(&pdf, None).expect("plain PDF passes through");
    assert!(matches!(prepared, Cow::Borrowed(bytes) if bytes == pdf.as_slice()));
}

#[test]
fn protected_document_requires_the_right_password() {
    let pdf = common::protect(&common::build_pdf(&[vec!["A  B", "1  2"]]));

    let missing = extract_dataset(&pdf, &ExtractOptions::tables()).expect_err("password needed");
    assert!(matches!(missing, ExtractError::AuthenticationRequired), "{missing:?}");

    let options = ExtractOptions::tables().with_password(Some("not-it".to_string()));
    let wrong = extract_dataset(&pdf, &options).expect_err("password rejected");
    assert!(matches!(wrong, ExtractError::AuthenticationFailed), "{wrong:?}");
}

#[test]
fn protected_document_opens_with_the_correct_password() {
    let pdf = common::protect_with(&common::build_pdf(&[vec!["A  B", "1  2"]]), "s3cret");

    let missing = extract_dataset(&pdf, &ExtractOptions::tables()).expect_err("password needed");
    assert!(matches!(missing, ExtractError::AuthenticationRequired), "{missing:?}");

    let wrong = extract_dataset(
        &pdf,
        &ExtractOptions::tables().with_password(Some("guess".to_string())),
    )
    .expect_err("password rejected");
    assert!(matches!(wrong, ExtractError::AuthenticationFailed), "{wrong:?}");

    let options = ExtractOptions::tables().with_password(Some("s3cret".to_string()));
    let extraction = extract_dataset(&pdf, &options).expect("correct password decrypts");
    assert_eq!(extraction.dataset.header(), ["A", "B"]);
    assert_eq!(extraction.dataset.rows(), [vec!["1", "2"]]);
}

#[test]
fn csv_export_round_trips_through_a_reader() {
    let pdf = common::build_pdf(&[vec!["Name  Note", "Alice  says, hi", "Bob  ok"]]);

    let (bytes, report) = export_pdf_bytes(&pdf, &ExtractOptions::tables(), ExportFormat::Csv)
        .expect("export should succeed");

    let mut reader = csv::Reader::from_reader(bytes.as_slice());
    let rows = reader
        .records()
        .map(|record| {
            record
                .expect("valid record")
                .iter()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    assert_eq!(rows, vec![vec!["Alice", "says, hi"], vec!["Bob", "ok"]]);
    assert_eq!(report.row_count, 2);
}

#[test]
fn batch_export_writes_sibling_files() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("hr_list.pdf");
    common::create_test_pdf(&input, &[HR_REPORT.to_vec()]);

    let (paths, report) =
        export_pdf_file(&input, &ExtractOptions::records()).expect("export should succeed");

    assert_eq!(paths.csv, dir.path().join("hr_list.csv"));
    assert_eq!(paths.xlsx, dir.path().join("hr_list.xlsx"));
    let csv = std::fs::read_to_string(&paths.csv).expect("CSV should be readable");
    assert!(csv.starts_with("SNo,Name,Email,Title_and_Company"), "{csv:?}");
    assert!(csv.contains("Engineer at Acme Corp HQ"), "{csv:?}");
    assert!(std::fs::metadata(&paths.xlsx).expect("xlsx exists").len() > 0);
    assert_eq!(report.row_count, 2);
}

#[test]
fn cli_prints_both_output_paths() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("report.pdf");
    common::create_test_pdf(&input, &[HR_REPORT.to_vec()]);

    let output = Command::new(env!("CARGO_BIN_EXE_pdf2table"))
        .args(["records", "-i", &input.to_string_lossy()])
        .output()
        .expect("CLI should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&*dir.path().join("report.csv").to_string_lossy()), "{stdout}");
    assert!(stdout.contains(&*dir.path().join("report.xlsx").to_string_lossy()), "{stdout}");
}

#[test]
fn cli_fails_on_missing_input() {
    let dir = tempdir().expect("tempdir should be created");
    let status = Command::new(env!("CARGO_BIN_EXE_pdf2table"))
        .args(["tables", "-i", &dir.path().join("absent.pdf").to_string_lossy()])
        .status()
        .expect("CLI should run");

    assert_eq!(status.code(), Some(1));
}

#[test]
fn cli_error_names_the_io_cause_once() {
    let dir = tempdir().expect("tempdir should be created");
    let output = Command::new(env!("CARGO_BIN_EXE_pdf2table"))
        .args(["tables", "-i", &dir.path().join("absent.pdf").to_string_lossy()])
        .output()
        .expect("CLI should run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    let error_line = stderr
        .lines()
        .find(|line| line.starts_with("error:"))
        .expect("an error line is printed");
    assert_eq!(error_line.matches("I/O error").count(), 1, "{error_line}");
    assert_eq!(error_line.matches("(os error").count(), 1, "{error_line}");
}
