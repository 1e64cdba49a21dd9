//! CLI Tool Example
//!
//! This example demonstrates how to build a command-line tool
//! using sheetscout for scanning, extracting and searching spreadsheet files.
//!
//! Set `RUST_LOG=sheetscout=debug` to see per-file progress.

use std::path::{Path, PathBuf};
use std::process;
use sheetscout::{
    FileOutcome, JsonFormatter, JsonStyle, KeywordSet, ScanRange, Scanner, ScannerBuilder,
    SearchEvent, SearchSettings, SheetScoutError,
};
use tracing_subscriber::EnvFilter;

const SETTINGS_FILE: &str = "sheetscout_settings.json";

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> <path> [options]", program);
    eprintln!("\nCommands:");
    eprintln!("  scan <file>        Scan a file for keywords (JSON output)");
    eprintln!("  extract <file>     Extract header/table/summary sections (JSON output)");
    eprintln!("  preview <file>     Show the first rows of a file");
    eprintln!("  search <folder>    Search every supported file in a folder");
    eprintln!("\nOptions:");
    eprintln!("  --keywords <list>  Keywords separated by ',' or ';'");
    eprintln!("  --exact            Match whole cell text (whole words in text files)");
    eprintln!("  --substring        Match keywords anywhere in the cell text");
    eprintln!("  --range <A1:T58>   Scan an explicit range instead of the detected region");
    eprintln!("  --markers <list>   Boundary markers (default: \"E. & O.E.;SUB-TOTAL\")");
    eprintln!("  --end-column <col> Last column to read (default: N)");
    eprintln!("  --max-rows <n>     Maximum rows to read (default: 1000)");
    eprintln!("  --compact          Single-line JSON output");
    eprintln!("  --save-settings    Persist the options to {}", SETTINGS_FILE);
    eprintln!("\nExamples:");
    eprintln!("  {} scan quote.xlsx --keywords \"Product :;Brand :\"", program);
    eprintln!("  {} extract quote.xlsx --end-column H", program);
    eprintln!("  {} search ./quotes --keywords \"GST,Total\" --exact", program);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        print_usage(&args[0]);
        process::exit(1);
    }

    if let Err(e) = run(&args[1], Path::new(&args[2]), &args[3..]) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Value of an option that requires an argument
fn option_value<'a>(args: &'a [String], i: usize) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value,
        None => {
            eprintln!("Error: {} requires a value", args[i]);
            process::exit(1);
        }
    }
}

fn run(command: &str, path: &Path, options: &[String]) -> Result<(), SheetScoutError> {
    let settings_path = PathBuf::from(SETTINGS_FILE);
    let mut settings = SearchSettings::load_or_default(&settings_path)?;

    let mut keywords = KeywordSet::default();
    let mut range = None;
    let mut style = JsonStyle::Pretty;
    let mut save_settings = false;

    let mut i = 0;
    while i < options.len() {
        match options[i].as_str() {
            "--keywords" => {
                keywords = KeywordSet::parse(option_value(options, i));
                i += 2;
            }
            "--exact" => {
                settings.exact_match = true;
                i += 1;
            }
            "--substring" => {
                settings.exact_match = false;
                i += 1;
            }
            "--range" => {
                let value = option_value(options, i);
                let (start, end) = value.split_once(':').ok_or_else(|| {
                    SheetScoutError::InvalidInput(format!("range must look like A1:T58: {}", value))
                })?;
                range = Some(ScanRange::parse(start, end)?);
                i += 2;
            }
            "--markers" => {
                settings.col_end_keywords = option_value(options, i).to_string();
                i += 2;
            }
            "--end-column" => {
                settings.row_end = option_value(options, i).to_string();
                i += 2;
            }
            "--max-rows" => {
                let value = option_value(options, i);
                settings.max_rows = value.parse().map_err(|_| {
                    SheetScoutError::InvalidInput(format!("invalid row count: {}", value))
                })?;
                i += 2;
            }
            "--compact" => {
                style = JsonStyle::Compact;
                i += 1;
            }
            "--save-settings" => {
                save_settings = true;
                i += 1;
            }
            other => {
                return Err(SheetScoutError::InvalidInput(format!(
                    "unknown option: {}",
                    other
                )));
            }
        }
    }

    settings.validate()?;
    if save_settings {
        if command == "search" {
            settings.last_folder = Some(path.display().to_string());
        }
        settings.save(&settings_path)?;
    }

    let mut builder = ScannerBuilder::new()
        .with_settings(&settings)
        .with_keywords(keywords);
    if let Some(range) = range {
        builder = builder.with_range(range);
    }
    let scanner = builder.build()?;
    let formatter = JsonFormatter::new(style);
    let mut stdout = std::io::stdout();

    match command {
        "scan" => formatter.render(&scanner.scan_file(path)?, &mut stdout),
        "extract" => formatter.render(&scanner.extract_file(path)?, &mut stdout),
        "preview" => {
            println!("{}", scanner.preview_file(path)?);
            Ok(())
        }
        "search" => search(&scanner, path),
        other => Err(SheetScoutError::InvalidInput(format!(
            "unknown command: {}",
            other
        ))),
    }
}

fn search(scanner: &Scanner, folder: &Path) -> Result<(), SheetScoutError> {
    println!(
        "Searching {} for [{}] ({:?})",
        folder.display(),
        scanner.keywords().join(", "),
        scanner.match_mode()
    );

    let mut found = 0;
    scanner.search_folder(folder, |event| match event {
        SearchEvent::FileProcessed {
            file_name, outcome, ..
        } => match outcome {
            FileOutcome::Failed(reason) => eprintln!("  {}: failed ({})", file_name, reason),
            FileOutcome::TimedOut => eprintln!("  {}: timed out", file_name),
            FileOutcome::Completed | FileOutcome::Abandoned => {}
        },
        SearchEvent::MatchFound {
            file_name,
            matched_text,
            ..
        } => {
            found += 1;
            println!("{}\t{}", file_name, matched_text);
        }
        SearchEvent::Progress { current, total } => {
            eprint!("\r  {}/{} files", current, total);
        }
        SearchEvent::BatchFinished => eprintln!(),
    })?;

    println!("{} file(s) matched", found);
    Ok(())
}
