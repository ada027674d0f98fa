//! In-memory form of the generated lookup, and MMI prompt parsing.

use std::collections::HashMap;

use crate::aggregate::Entry;

/// `(profile, id) -> name` lookup over aggregated entries.
///
/// Behaves like the emitted `match` fragment: for a `(profile, id)` listed
/// more than once, the first entry wins.
#[derive(Debug, Clone, Default)]
pub struct MmiTable {
    names: HashMap<(String, u32), String>,
}

impl MmiTable {
    pub fn new(entries: &[Entry]) -> Self {
        let mut names = HashMap::with_capacity(entries.len());
        for entry in entries {
            names
                .entry((entry.document_key.clone(), entry.id))
                .or_insert_with(|| entry.name.clone());
        }
        Self { names }
    }

    /// The MMI name for an id of a profile.
    pub fn get(&self, profile: &str, id: u32) -> Option<&str> {
        self.names
            .get(&(profile.to_string(), id))
            .map(String::as_str)
    }

    /// The MMI name an interaction prompt refers to.
    ///
    /// Returns `None` when the prompt is malformed, its id is not numeric, or
    /// the table has no such MMI.
    pub fn resolve(&self, description: &str) -> Option<&str> {
        let prompt = parse_description(description)?;
        let id = prompt.id.parse().ok()?;
        self.get(prompt.profile, id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// The parts of an interaction prompt `{<id>,<test>,<profile>}<description>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MmiPrompt<'a> {
    /// MMI id, not necessarily numeric (e.g. `test_started`).
    pub id: &'a str,
    /// Test case name, trimmed.
    pub test: &'a str,
    /// Profile key, trimmed.
    pub profile: &'a str,
    /// Free text following the header; may be empty.
    pub description: &'a str,
}

/// Split an interaction prompt into its parts.
pub fn parse_description(description: &str) -> Option<MmiPrompt<'_>> {
    let (header, description) = description.strip_prefix('{')?.split_once('}')?;
    let (id, header) = header.split_once(',')?;
    let (test, profile) = header.split_once(',')?;
    Some(MmiPrompt {
        id,
        test: test.trim(),
        profile: profile.trim(),
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_with_description() {
        let prompt =
            parse_description("{1002,A2DP/SNK/AS/BV-01-I,A2DP}If necessary, take action ...")
                .unwrap();
        assert_eq!(
            prompt,
            MmiPrompt {
                id: "1002",
                test: "A2DP/SNK/AS/BV-01-I",
                profile: "A2DP",
                description: "If necessary, take action ...",
            }
        );
    }

    #[test]
    fn prompt_without_description() {
        let prompt = parse_description("{test_started, foo , bar}").unwrap();
        assert_eq!(prompt.id, "test_started");
        assert_eq!(prompt.test, "foo");
        assert_eq!(prompt.profile, "bar");
        assert_eq!(prompt.description, "");
    }

    #[test]
    fn malformed_prompts() {
        assert!(parse_description("1002,A,B}x").is_none());
        assert!(parse_description("{1002,A,B").is_none());
        assert!(parse_description("{1002}x").is_none());
    }

    #[test]
    fn table_lookup_and_resolve() {
        let table = MmiTable::new(&[
            Entry::new("A2DP", 1002, "TSC_AVDTP_mmi_iut_accept_connect"),
            Entry::new("GAP", 1, "MMI_ONE"),
            Entry::new("GAP", 1, "MMI_SHADOWED"),
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("GAP", 1), Some("MMI_ONE"));
        assert_eq!(table.get("GAP", 2), None);
        assert_eq!(
            table.resolve("{1002,A2DP/SNK/AS/BV-01-I,A2DP}Accept the connection"),
            Some("TSC_AVDTP_mmi_iut_accept_connect")
        );
        assert_eq!(table.resolve("{test_started,foo,A2DP}"), None);
        assert!(MmiTable::default().is_empty());
    }
}
