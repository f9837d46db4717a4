use crate::field::Field;
use crate::matcher::byte_offset;
use tracing::debug;

/// Text and caret produced by splicing an expansion into a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub new_text: String,
    pub new_cursor: usize,
}

/// Replace the shortcut ending at `cursor` with `resolved`.
///
/// Offsets are in chars. `cursor` is clamped to the end of the text, and the
/// replaced span starts at `match_start` but never reaches further back than
/// `shortcut_len` chars before the caret, nor past it. The new caret sits
/// right after the inserted text.
pub fn apply(
    full_text: &str,
    cursor: usize,
    match_start: usize,
    shortcut_len: usize,
    resolved: &str,
) -> Edit {
    let cursor = cursor.min(full_text.chars().count());
    let start = match_start
        .max(cursor.saturating_sub(shortcut_len))
        .min(cursor);

    let cursor_byte = byte_offset(full_text, cursor);
    let start_byte = byte_offset(full_text, start);

    let mut new_text =
        String::with_capacity(full_text.len() - (cursor_byte - start_byte) + resolved.len());
    new_text.push_str(&full_text[..start_byte]);
    new_text.push_str(resolved);
    new_text.push_str(&full_text[cursor_byte..]);

    Edit {
        new_text,
        new_cursor: start + resolved.chars().count(),
    }
}

/// Write `edit` into `field`, restore the caret, and notify observers.
///
/// The caret is set explicitly after the write since writing a value may
/// move it.
pub fn commit<F: Field + ?Sized>(field: &mut F, edit: &Edit) {
    field.set_value(edit.new_text.clone());
    field.set_caret(edit.new_cursor);
    field.notify_changed();
    debug!(cursor = edit.new_cursor, "committed edit to field");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldEvent, TextField};

    #[test]
    fn splices_expansion_over_shortcut() {
        let edit = apply("hi ;m", 5, 3, 2, "a@b.com");
        assert_eq!(edit.new_text, "hi a@b.com");
        assert_eq!(edit.new_cursor, 10);
    }

    #[test]
    fn keeps_text_after_cursor() {
        let edit = apply("a ;m tail", 4, 2, 2, "XY");
        assert_eq!(edit.new_text, "a XY tail");
        assert_eq!(edit.new_cursor, 4);
    }

    #[test]
    fn empty_expansion_removes_shortcut() {
        let edit = apply("x cb", 4, 2, 2, "");
        assert_eq!(edit.new_text, "x ");
        assert_eq!(edit.new_cursor, 2);
    }

    #[test]
    fn same_inputs_give_same_edit() {
        let first = apply("say ;hi!", 7, 4, 3, "hello");
        let second = apply("say ;hi!", 7, 4, 3, "hello");
        assert_eq!(first, second);
    }

    #[test]
    fn surrounding_text_is_preserved() {
        let full = "ünïcode ;sig and more";
        let (cursor, start, resolved) = (12, 8, "~ Ana");
        let edit = apply(full, cursor, start, 4, resolved);

        let chars: Vec<char> = edit.new_text.chars().collect();
        let prefix: String = chars[..start].iter().collect();
        let middle: String = chars[start..start + resolved.chars().count()].iter().collect();
        let suffix: String = chars[start + resolved.chars().count()..].iter().collect();

        assert_eq!(prefix, "ünïcode ");
        assert_eq!(middle, resolved);
        assert_eq!(suffix, " and more");
        assert_eq!(edit.new_cursor, start + resolved.chars().count());
    }

    #[test]
    fn inconsistent_offsets_are_clamped() {
        let edit = apply("abc", 3, 0, 2, "x");
        assert_eq!(edit.new_text, "ax");
        assert_eq!(edit.new_cursor, 2);

        let edit = apply("ab", 5, 3, 2, "x");
        assert_eq!(edit.new_text, "abx");
        assert_eq!(edit.new_cursor, 3);

        let edit = apply("abcd", 3, 0, 1, "");
        assert_eq!(edit.new_text, "abd");
        assert_eq!(edit.new_cursor, 2);
    }

    #[test]
    fn commit_sets_caret_after_write_and_notifies() {
        let mut field = TextField::new("hi ;m tail", 5);
        let edit = apply("hi ;m tail", 5, 3, 2, "a@b.com");

        commit(&mut field, &edit);

        assert_eq!(field.text(), "hi a@b.com tail");
        assert_eq!(field.caret(), 10);
        assert_eq!(field.events(), &[FieldEvent::Input, FieldEvent::Change]);
    }
}
