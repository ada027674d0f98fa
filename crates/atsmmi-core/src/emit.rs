//! Rendering of the generated MMI lookup source fragment.

use std::fmt::Write;

use crate::aggregate::Entry;

/// First line of every generated fragment.
pub const GENERATED_HEADER: &str = "// File generated by atsmmi. DO NOT EDIT";

/// Render a Rust `match` expression mapping `(profile, id)` to the MMI name.
///
/// The fragment evaluates to `Option<&'static str>` when `profile: &str` and
/// `id: u32` are in scope:
///
/// ```text
/// // File generated by atsmmi. DO NOT EDIT
/// match (profile, id) {
///   ("ABC", 7) => Some("MMI_FOO"),
///   _ => None
/// }
/// ```
///
/// Arms are written in the order given; callers pass the sorted output of
/// [`aggregate`](crate::aggregate::aggregate).
pub fn render_lookup_fragment(entries: &[Entry]) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "{GENERATED_HEADER}");
    let _ = writeln!(out, "match (profile, id) {{");
    for entry in entries {
        let _ = writeln!(
            out,
            "  ({:?}, {}) => Some({:?}),",
            entry.document_key, entry.id, entry.name
        );
    }
    let _ = writeln!(out, "  _ => None");
    let _ = writeln!(out, "}}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::corrections::Corrections;
    use crate::entries::{Candidate, assemble_from_cells};

    #[test]
    fn empty_table_still_has_fallback() {
        assert_eq!(
            render_lookup_fragment(&[]),
            "// File generated by atsmmi. DO NOT EDIT\nmatch (profile, id) {\n  _ => None\n}\n"
        );
    }

    #[test]
    fn rows_to_fragment() {
        let rows = vec![
            vec!["MMI_FOO".to_string(), "{7,%s,...}".to_string()],
            vec!["".to_string(), "{8,%s,...}".to_string()],
        ];
        let candidates = assemble_from_cells(rows);
        assert_eq!(
            candidates,
            vec![Candidate::new(7, "MMI_FOO"), Candidate::new(8, "")]
        );

        let agg = aggregate(
            Entry::from_candidates("ABC", candidates),
            Corrections::builtin(),
        );
        let fragment = render_lookup_fragment(&agg.entries);
        let lines: Vec<&str> = fragment.lines().collect();
        assert_eq!(
            lines,
            vec![
                GENERATED_HEADER,
                "match (profile, id) {",
                "  (\"ABC\", 7) => Some(\"MMI_FOO\"),",
                "  (\"ABC\", 8) => Some(\"\"),",
                "  _ => None",
                "}",
            ]
        );
    }

    #[test]
    fn names_are_escaped() {
        let fragment = render_lookup_fragment(&[Entry::new("X", 1, "a\"b")]);
        assert!(fragment.contains(r#"("X", 1) => Some("a\"b"),"#));
    }
}
