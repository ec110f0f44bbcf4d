//! Choice records and compact path helpers.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::hash::Hasher;
use twox_hash::XxHash64;

use crate::data::ChoiceId;

/// Ordered choices for one run. Runs never exceed eight decisions, so this
/// stays on the stack.
pub type ChoicePath = SmallVec<[ChoiceId; 8]>;

/// One committed decision plus a snapshot of the state it produced.
///
/// The snapshot is for display. Recomputation always starts from the choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceRecord<S> {
    pub level_id: u8,
    pub choice: ChoiceId,
    pub state_after: S,
}

/// Stable fingerprint of a path, used to count distinct playthroughs.
#[must_use]
pub fn path_digest(choices: &[ChoiceId]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    for choice in choices {
        hasher.write_u8(b"AB"[choice.index()]);
    }
    hasher.write_usize(choices.len());
    hasher.finish()
}

/// `"ABBA"`-style rendering.
#[must_use]
pub fn path_label(choices: &[ChoiceId]) -> String {
    choices.iter().map(|choice| choice.as_char()).collect()
}

/// Parse a path label, ignoring separators such as `-`, `,` and spaces.
///
/// # Errors
///
/// Returns a message naming the first character that is not A or B.
pub fn parse_path(label: &str) -> Result<ChoicePath, String> {
    label
        .chars()
        .filter(|c| !matches!(c, '-' | ',' | ' '))
        .map(|c| {
            ChoiceId::from_char(c).ok_or_else(|| format!("'{c}' is not a choice in '{label}'"))
        })
        .collect()
}
