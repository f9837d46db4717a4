use crate::field::Field;
use crate::models::Trigger;
use tracing::warn;

/// A field's text and caret captured at the moment of an input event.
///
/// Offsets are counted in chars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditContext {
    pub text: String,
    pub cursor: usize,
}

impl EditContext {
    /// Returns `None` when the caret lies past the end of the text
    pub fn new(text: impl Into<String>, cursor: usize) -> Option<Self> {
        let text = text.into();
        if cursor > text.chars().count() {
            return None;
        }
        Some(Self { text, cursor })
    }

    pub fn capture<F: Field + ?Sized>(field: &F) -> Option<Self> {
        let text = field.value();
        let cursor = field.caret();
        let ctx = Self::new(text, cursor);
        if ctx.is_none() {
            warn!(cursor, "caret beyond end of field text, ignoring event");
        }
        ctx
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub shortcut: String,
    pub expansion: String,
    /// Char offset where the shortcut begins
    pub match_start: usize,
}

impl MatchResult {
    pub fn shortcut_len(&self) -> usize {
        self.shortcut.chars().count()
    }
}

/// Byte index of the `chars`-th char, saturating at the end of `text`
pub(crate) fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

/// Find the first trigger whose shortcut ends exactly at `cursor`.
///
/// Candidates are tried in table order and the scan stops at the first hit,
/// so an earlier short shortcut beats a later longer one.
pub fn find_match(text: &str, cursor: usize, triggers: &[Trigger]) -> Option<MatchResult> {
    if text.is_empty() || cursor == 0 {
        return None;
    }
    if cursor > text.chars().count() {
        return None;
    }

    let before_cursor = &text[..byte_offset(text, cursor)];

    triggers
        .iter()
        .find(|trigger| !trigger.shortcut.is_empty() && before_cursor.ends_with(&trigger.shortcut))
        .map(|trigger| MatchResult {
            shortcut: trigger.shortcut.clone(),
            expansion: trigger.expansion.clone(),
            match_start: cursor - trigger.shortcut_len(),
        })
}
