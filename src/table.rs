//! In-memory trigger table consulted on every keystroke.
//!
//! The table is an ordered list, not a map: when several shortcuts are a
//! suffix of the text before the caret, the one loaded first wins. Rebuilds
//! publish a whole new list through [`ArcSwap`], so a lookup always sees
//! either the old set or the new one.

use crate::models::Trigger;
use crate::store::TriggerSource;
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct TriggerTable {
    entries: ArcSwap<Vec<Trigger>>,
}

impl TriggerTable {
    pub fn new() -> Self {
        Self {
            entries: ArcSwap::from_pointee(Vec::new()),
        }
    }

    pub fn from_triggers(triggers: &[Trigger]) -> Self {
        let table = Self::new();
        table.rebuild(triggers);
        table
    }

    /// Replace the whole table with `triggers`.
    ///
    /// Empty shortcuts are dropped. A duplicated shortcut keeps the position
    /// of its first occurrence and the expansion of its last.
    pub fn rebuild(&self, triggers: &[Trigger]) {
        let mut entries: Vec<Trigger> = Vec::with_capacity(triggers.len());
        for trigger in triggers {
            if trigger.shortcut.is_empty() {
                continue;
            }
            match entries.iter_mut().find(|e| e.shortcut == trigger.shortcut) {
                Some(existing) => existing.expansion = trigger.expansion.clone(),
                None => entries.push(trigger.clone()),
            }
        }

        debug!(count = entries.len(), "rebuilt trigger table");
        self.entries.store(Arc::new(entries));
    }

    /// Current candidates in priority order. The returned snapshot is
    /// unaffected by later rebuilds.
    pub fn snapshot(&self) -> Arc<Vec<Trigger>> {
        self.entries.load_full()
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch the full list from `source` once and rebuild from it
    pub async fn load_from<S: TriggerSource + ?Sized>(&self, source: &S) -> crate::Result<()> {
        let triggers = source.get_all().await?;
        self.rebuild(&triggers);
        Ok(())
    }
}

impl Default for TriggerTable {
    fn default() -> Self {
        Self::new()
    }
}
