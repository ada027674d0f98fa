use std::path::Path;

use atsmmi::{
    AtsDocument, BatchOutcome, Corrections, Entry, PageOptions, aggregate_entries,
    discover_documents, document_key, extract_batch, extract_document, selected_pages,
};
use tracing::warn;

use crate::cli::OutputFormat;
use crate::output::{render_entries, render_rows};
use crate::page_range::parse_page_range;

/// Extract one document, or the given pages of it.
pub fn run_single(
    input: &Path,
    pages: Option<&str>,
    format: OutputFormat,
    options: PageOptions,
) -> Result<(), i32> {
    if !input.exists() {
        eprintln!("Error: file not found: {}", input.display());
        return Err(1);
    }

    if format == OutputFormat::Rows {
        return print_rows(input, pages, options);
    }

    let page_indices = match pages {
        Some(range) => {
            let doc = open(input, options)?;
            Some(parse_page_range(range, doc.page_count()).map_err(|e| {
                eprintln!("Error: {e}");
                1
            })?)
        }
        None => None,
    };
    let entries = extract_document(
        input,
        page_indices.as_deref(),
        Corrections::builtin(),
        &options,
    )
    .map_err(|e| {
        eprintln!("Error: {}: {e}", input.display());
        1
    })?;
    emit(entries, format)
}

fn print_rows(input: &Path, pages: Option<&str>, options: PageOptions) -> Result<(), i32> {
    let doc = open(input, options)?;
    let page_indices = match pages {
        Some(range) => parse_page_range(range, doc.page_count()).map_err(|e| {
            eprintln!("Error: {e}");
            1
        })?,
        None => {
            let key = document_key(input).unwrap_or_default();
            selected_pages(doc.page_count(), &key, None, Corrections::builtin())
        }
    };
    let pages = page_indices
        .iter()
        .map(|&index| doc.page(index))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            eprintln!("Error: {}: {e}", input.display());
            1
        })?;
    print!("{}", render_rows(&pages));
    Ok(())
}

fn open(input: &Path, options: PageOptions) -> Result<AtsDocument, i32> {
    AtsDocument::open_file(input, Some(options)).map_err(|e| {
        eprintln!("Error: failed to open {}: {e}", input.display());
        1
    })
}

/// Extract every document in `dir`. All documents are attempted; the
/// command fails if any of them failed.
pub fn run_batch(dir: &Path, format: OutputFormat, options: PageOptions) -> Result<(), i32> {
    if format == OutputFormat::Rows {
        eprintln!("Error: --format rows requires --input");
        return Err(2);
    }

    let paths = discover_documents(dir).map_err(|e| {
        eprintln!("Error: cannot list {}: {e}", dir.display());
        1
    })?;
    if paths.is_empty() {
        warn!(dir = %dir.display(), "no documents found");
    }

    let BatchOutcome { entries, failures } =
        extract_batch(&paths, Corrections::builtin(), &options);
    emit(entries, format)?;

    if failures.is_empty() {
        return Ok(());
    }
    eprintln!("Failed to extract {} document(s):", failures.len());
    for failure in &failures {
        eprintln!("  {}: {}", failure.path.display(), failure.error);
    }
    Err(1)
}

fn emit(entries: Vec<Entry>, format: OutputFormat) -> Result<(), i32> {
    let table = aggregate_entries(entries, Corrections::builtin());
    let out = render_entries(&table.entries, format).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    print!("{out}");
    Ok(())
}
