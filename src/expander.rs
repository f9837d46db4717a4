//! Per-event expansion pipeline.
//!
//! For one input event: capture the field's text and caret, look for a
//! shortcut ending at the caret, resolve the expansion's macros, splice the
//! result in and notify the field. At most one replacement happens per event.
//!
//! The clipboard read is the only suspension point. [`Expander::handle_serialized`]
//! holds the field's lock across it so a second event on the same field waits
//! for the first to finish and then sees the already-expanded text.

use crate::editor::{self, Edit};
use crate::field::Field;
use crate::macros::{ClipboardSource, MacroResolver};
use crate::matcher::{find_match, EditContext};
use crate::table::TriggerTable;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Outcome of a successful expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub shortcut: String,
    pub edit: Edit,
}

pub struct Expander<C> {
    table: Arc<TriggerTable>,
    resolver: MacroResolver<C>,
}

impl<C: ClipboardSource> Expander<C> {
    pub fn new(table: Arc<TriggerTable>, resolver: MacroResolver<C>) -> Self {
        Self { table, resolver }
    }

    pub fn resolver(&self) -> &MacroResolver<C> {
        &self.resolver
    }

    /// Handle one input event on `field`, expanding a shortcut if one ends at the caret
    pub async fn handle_input<F: Field + ?Sized>(&self, field: &mut F) -> Option<Expansion> {
        let kind = field.kind();
        if !kind.is_linear() {
            debug!(?kind, "unsupported field kind, skipping");
            return None;
        }

        let ctx = EditContext::capture(field)?;
        if ctx.text.is_empty() {
            return None;
        }

        let candidates = self.table.snapshot();
        let found = find_match(&ctx.text, ctx.cursor, &candidates)?;

        let resolved = self.resolver.resolve(&found.expansion).await;
        let edit = editor::apply(
            &ctx.text,
            ctx.cursor,
            found.match_start,
            found.shortcut_len(),
            &resolved,
        );
        editor::commit(field, &edit);

        info!(shortcut = %found.shortcut, cursor = edit.new_cursor, "expanded shortcut");
        Some(Expansion {
            shortcut: found.shortcut,
            edit,
        })
    }

    /// Like [`Expander::handle_input`], but holds `field`'s lock for the whole
    /// event so overlapping events on the same field run one after another.
    pub async fn handle_serialized<F: Field>(&self, field: &Mutex<F>) -> Option<Expansion> {
        let mut guard = field.lock().await;
        self.handle_input(&mut *guard).await
    }
}
