//! sheetscout - Keyword scanning and structured extraction for spreadsheet documents
//!
//! This crate locates keywords inside bounded regions of spreadsheets, detects where
//! a document's meaningful content ends, extracts header/table/summary sections, and
//! searches many files concurrently with cooperative cancellation.
//!
//! Supported inputs are spreadsheets (`xlsx`, `xlsm`, `xlsb`, `xls`, `ods`),
//! delimited text (`csv`) and plain text (`txt`).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use sheetscout::{KeywordSet, ScannerBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scanner = ScannerBuilder::new()
//!         .with_keywords(KeywordSet::parse("Product :;Brand :"))
//!         .build()?;
//!
//!     // Scan the first worksheet up to the boundary marker
//!     let result = scanner.scan_file(Path::new("quote.xlsx"))?;
//!     println!("{}", serde_json::to_string_pretty(&result)?);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Working with in-memory sheets
//!
//! ```rust
//! use sheetscout::{find_end_row, scan, KeywordSet, MatchMode, ScanRange, Sheet};
//!
//! # fn main() -> Result<(), sheetscout::SheetScoutError> {
//! let sheet = Sheet::from_rows(vec![
//!     vec!["Product :", "Widget"],
//!     vec!["Total", "150"],
//!     vec!["E. & O.E.", ""],
//! ]);
//!
//! let end_row = find_end_row(&sheet, &KeywordSet::parse("E. & O.E."), 1000);
//! assert_eq!(end_row, 2);
//!
//! let range = ScanRange::parse("A1", "B2")?;
//! let result = scan(&sheet, &KeywordSet::parse("total"), &range, MatchMode::Substring)?;
//! assert_eq!(result.get_a1("A2").unwrap()["total"], "Total");
//! # Ok(())
//! # }
//! ```
//!
//! # Searching a folder
//!
//! ```rust,no_run
//! use std::path::Path;
//! use sheetscout::{KeywordSet, MatchMode, ScannerBuilder, SearchEvent};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scanner = ScannerBuilder::new()
//!         .with_keywords(KeywordSet::parse("GST;Total"))
//!         .with_match_mode(MatchMode::ExactToken)
//!         .build()?;
//!
//!     scanner.search_folder(Path::new("quotes"), |event| match event {
//!         SearchEvent::MatchFound { file_name, matched_text, .. } => {
//!             println!("{}: {}", file_name, matched_text);
//!         }
//!         SearchEvent::Progress { current, total } => eprintln!("{}/{}", current, total),
//!         _ => {}
//!     })?;
//!
//!     Ok(())
//! }
//! ```

mod api;
mod boundary;
mod builder;
mod config;
mod discovery;
mod error;
mod extractor;
mod keywords;
mod output;
mod parser;
mod scanner;
mod search;
mod security;
mod types;

// 公開API
pub use api::{FileKind, MatchMode};
pub use boundary::{
    find_content_block, find_end_row, find_end_row_with_cancel, BoundaryConfig, ContentBlock,
    DEFAULT_BOUNDARY_MARKERS, DEFAULT_END_COLUMN, DEFAULT_ROW_CAP,
};
pub use builder::{Scanner, ScannerBuilder};
pub use config::SearchSettings;
pub use discovery::list_files;
pub use error::SheetScoutError;
pub use extractor::{
    extract, extract_delimited, DocumentContent, ExtractedDocument, FileInfo, RowRecord,
    StructuredContent, TIMESTAMP_FORMAT,
};
pub use keywords::KeywordSet;
pub use output::{JsonFormatter, JsonStyle, PreviewFormatter, PREVIEW_MAX_ROWS, PREVIEW_RULE_WIDTH};
pub use parser::load_sheet;
pub use scanner::{scan, scan_with_cancel, MatchResult};
pub use search::{
    CancellationToken, FileOutcome, FileSearcher, KeywordFileSearcher, SearchCoordinator,
    SearchEvent, SearchHandle, DEFAULT_FILE_TIMEOUT_SECS, DEFAULT_WORKERS, MAX_FRAGMENTS,
};
pub use types::{column_letters, column_number, CellAddress, CellValue, ScanRange, Sheet};
