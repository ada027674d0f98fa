//! Static corrections for known errors in the ATS documents.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::aggregate::Entry;

/// MMIs whose id is wrong in the ATS documents.
const PATCHES: &[(&str, u32, &str, u32)] = &[
    ("ACS", 139, "MMI_WAIT_FOR_PROCEDURE_TIMEOUT", 140),
    ("ACP", 139, "MMI_WAIT_FOR_PROCEDURE_TIMEOUT", 140),
    ("BPP", 26, "TSC_MMI_confirm_print", 27),
];

/// MMIs listed twice in the ATS documents.
const FILTERS: &[(&str, u32, &str)] = &[
    ("AIOP", 49, "MMI_IUT_INITIATE_ACL_CONNECTION"),
    ("AIOS", 49, "MMI_IUT_INITIATE_ACL_CONNECTION"),
    ("BLP", 15, "MMI_TESTER_ENABLE_CONNECTION"),
    ("BLS", 15, "MMI_TESTER_ENABLE_CONNECTION"),
    ("CGMP", 15, "MMI_TESTER_ENABLE_CONNECTION"),
    ("CGMP", 49, "MMI_IUT_INITIATE_ACL_CONNECTION"),
    ("CGMS", 15, "MMI_TESTER_ENABLE_CONNECTION"),
    ("CGMS", 49, "MMI_IUT_INITIATE_ACL_CONNECTION"),
    ("CSIP", 15, "MMI_TESTER_ENABLE_CONNECTION"),
    ("CSIS", 15, "MMI_TESTER_ENABLE_CONNECTION"),
    ("ESLP", 109, "MMI_IUT_VERYFY_IGNORE_MSG"),
    ("ESLP", 110, "MMI_WAIT_FOR_PERIODIC_RESPONSE_PACKET"),
    ("ESLP", 15, "MMI_TESTER_ENABLE_CONNECTION"),
    ("ESLS", 109, "MMI_IUT_VERYFY_IGNORE_MSG"),
    ("ESLS", 110, "MMI_WAIT_FOR_PERIODIC_RESPONSE_PACKET"),
    ("ESLS", 15, "MMI_TESTER_ENABLE_CONNECTION"),
    ("ESP", 15, "MMI_TESTER_ENABLE_CONNECTION"),
    ("ESS", 15, "MMI_TESTER_ENABLE_CONNECTION"),
    ("GLP", 49, "MMI_IUT_INITIATE_ACL_CONNECTION"),
    ("GLS", 49, "MMI_IUT_INITIATE_ACL_CONNECTION"),
    ("HRP", 15, "MMI_TESTER_ENABLE_CONNECTION"),
    ("HRS", 15, "MMI_TESTER_ENABLE_CONNECTION"),
    ("L2CAP", 13, "TSC_MMI_iut_enable_connection"),
    ("L2CAP", 14, "TSC_MMI_iut_disable_connection"),
    ("L2CAP", 15, "TSC_MMI_tester_enable_connection"),
    ("L2CAP", 22, "TSC_A2MP_info_rsp_data_extended_features_mask"),
    ("MCP", 15, "MMI_TESTER_ENABLE_CONNECTION"),
    ("MCS", 15, "MMI_TESTER_ENABLE_CONNECTION"),
    ("MESH", 1000, "MMI_IUT_IN_GENERAL_DISCOVERABLE_MODE"),
    ("MESH", 1001, "MMI_IUT_INITIATE_CONNECTION_API"),
    ("MESH", 2000, "MMI_VERIFY_SECURE_ID"),
    ("MESH", 2001, "MMI_CONFIRM_PASSKEY"),
    ("MMDL", 1000, "MMI_IUT_IN_GENERAL_DISCOVERABLE_MODE"),
    ("MMDL", 1001, "MMI_IUT_INITIATE_CONNECTION_API"),
    ("MMDL", 2000, "MMI_VERIFY_SECURE_ID"),
    ("MMDL", 2001, "MMI_CONFIRM_PASSKEY"),
    ("OTP", 15, "MMI_TESTER_ENABLE_CONNECTION"),
    ("OTS", 15, "MMI_TESTER_ENABLE_CONNECTION"),
    ("PASP", 15, "MMI_TESTER_ENABLE_CONNECTION"),
    ("PASS", 15, "MMI_TESTER_ENABLE_CONNECTION"),
    ("RCP", 49, "MMI_IUT_INITIATE_ACL_CONNECTION"),
    ("RCS", 49, "MMI_IUT_INITIATE_ACL_CONNECTION"),
];

/// Documents whose last pages hold a malformed table with no MMI.
const TRAILING_PAGES: &[(&str, usize)] = &[("HCRP", 1)];

static BUILTIN: LazyLock<Corrections> = LazyLock::new(|| {
    Corrections::new(
        PATCHES
            .iter()
            .map(|&(key, id, name, fixed)| (Entry::new(key, id, name), fixed)),
        FILTERS.iter().map(|&(key, id, name)| Entry::new(key, id, name)),
        TRAILING_PAGES.iter().map(|&(key, n)| (key.to_string(), n)),
    )
});

/// Immutable correction tables applied by the aggregator.
///
/// Patches and filters match an extracted `(document_key, id, name)` triple
/// exactly, before any other correction is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corrections {
    patches: HashMap<Entry, u32>,
    filters: HashSet<Entry>,
    trailing_pages: HashMap<String, usize>,
}

impl Corrections {
    pub fn new(
        patches: impl IntoIterator<Item = (Entry, u32)>,
        filters: impl IntoIterator<Item = Entry>,
        trailing_pages: impl IntoIterator<Item = (String, usize)>,
    ) -> Self {
        Self {
            patches: patches.into_iter().collect(),
            filters: filters.into_iter().collect(),
            trailing_pages: trailing_pages.into_iter().collect(),
        }
    }

    /// The compiled-in corrections for the published ATS documents.
    pub fn builtin() -> &'static Corrections {
        &BUILTIN
    }

    /// Whether `entry` is a known duplicate to drop.
    pub fn is_filtered(&self, entry: &Entry) -> bool {
        self.filters.contains(entry)
    }

    /// The corrected id for `entry`, if it has a known wrong id.
    pub fn patched_id(&self, entry: &Entry) -> Option<u32> {
        self.patches.get(entry).copied()
    }

    /// Number of trailing pages to leave out when a whole document is read.
    pub fn trailing_pages_skipped(&self, document_key: &str) -> usize {
        self.trailing_pages.get(document_key).copied().unwrap_or(0)
    }

    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }

    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }
}
