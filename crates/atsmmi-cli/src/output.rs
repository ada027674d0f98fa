use atsmmi::{Entry, Page, render_lookup_fragment};

use crate::cli::OutputFormat;

/// Render the final entries in `format`.
///
/// `Rows` has no entry rendering; callers print pages with [`render_rows`].
pub fn render_entries(entries: &[Entry], format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Rust => Ok(render_lookup_fragment(entries)),
        OutputFormat::Json => serde_json::to_string_pretty(entries)
            .map(|json| json + "\n")
            .map_err(|e| format!("failed to serialize entries: {e}")),
        OutputFormat::Rows => Err("rows format renders pages, not entries".to_string()),
    }
}

/// Reconstructed rows of each page, one `|`-separated line per row.
pub fn render_rows(pages: &[Page]) -> String {
    let mut out = String::new();
    for page in pages {
        out.push_str(&format!("--- Page {} ---\n", page.index() + 1));
        for row in page.rows() {
            out.push_str(&row.contents().join(" | "));
            out.push('\n');
        }
    }
    out
}
