use crate::config::ensure_config_dir;
use crate::error::{AutofillError, Result};
use crate::models::{default_triggers, Trigger};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info};

pub type TriggerList = Arc<Vec<Trigger>>;

/// Read side of trigger persistence: the full list plus change notifications.
#[async_trait]
pub trait TriggerSource: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Trigger>>;

    /// Receiver that yields the full list after every change
    fn subscribe(&self) -> watch::Receiver<TriggerList>;
}

/// Triggers persisted as a pretty-printed JSON array.
#[derive(Debug)]
pub struct TriggerStore {
    path: PathBuf,
    triggers: Mutex<Vec<Trigger>>,
    changes: watch::Sender<TriggerList>,
}

#[derive(Deserialize)]
struct ImportedTrigger {
    shortcut: Option<String>,
    expansion: Option<String>,
}

impl TriggerStore {
    /// Open the store at `path`. A missing or empty file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let triggers = load_triggers(&path)?;
        info!(count = triggers.len(), path = %path.display(), "loaded triggers");
        Ok(Self::with_triggers(path, triggers))
    }

    /// Like [`TriggerStore::open`], but writes the default triggers when the
    /// file does not exist yet and `seed` is set.
    pub fn open_or_seed(path: impl Into<PathBuf>, seed: bool) -> Result<Self> {
        let path = path.into();
        if path.exists() || !seed {
            return Self::open(path);
        }

        let store = Self::with_triggers(path, default_triggers());
        store.save(store.lock().as_slice())?;
        info!(path = %store.path.display(), "seeded default triggers");
        Ok(store)
    }

    fn with_triggers(path: PathBuf, triggers: Vec<Trigger>) -> Self {
        let (changes, _) = watch::channel(Arc::new(triggers.clone()));
        Self {
            path,
            triggers: Mutex::new(triggers),
            changes,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Trigger>> {
        self.triggers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn list(&self) -> Vec<Trigger> {
        self.lock().clone()
    }

    /// Triggers whose shortcut or expansion contains `query`, ignoring case
    pub fn search(&self, query: &str) -> Vec<Trigger> {
        self.lock()
            .iter()
            .filter(|t| t.matches_query(query))
            .cloned()
            .collect()
    }

    pub fn find(&self, shortcut: &str) -> Option<Trigger> {
        self.lock().iter().find(|t| t.shortcut == shortcut).cloned()
    }

    /// Add a new trigger. The shortcut is trimmed; the expansion is kept verbatim.
    pub fn add(&self, shortcut: &str, expansion: String) -> Result<Trigger> {
        let shortcut = shortcut.trim();
        if shortcut.is_empty() || expansion.is_empty() {
            return Err(AutofillError::InvalidTrigger(
                "shortcut and expansion must both be filled in".to_string(),
            ));
        }

        let mut triggers = self.lock();
        if triggers.iter().any(|t| t.shortcut == shortcut) {
            return Err(AutofillError::DuplicateShortcut(shortcut.to_string()));
        }

        let trigger = Trigger::new(shortcut, expansion);
        triggers.push(trigger.clone());
        self.commit(&mut triggers, |triggers| {
            triggers.pop();
        })?;
        Ok(trigger)
    }

    /// Replace the expansion of an existing trigger
    pub fn update(&self, shortcut: &str, expansion: String) -> Result<Trigger> {
        if expansion.is_empty() {
            return Err(AutofillError::InvalidTrigger(
                "expansion must not be empty".to_string(),
            ));
        }

        let mut triggers = self.lock();
        let index = triggers
            .iter()
            .position(|t| t.shortcut == shortcut)
            .ok_or_else(|| AutofillError::ShortcutNotFound(shortcut.to_string()))?;

        let previous = std::mem::replace(&mut triggers[index].expansion, expansion);
        let updated = triggers[index].clone();
        self.commit(&mut triggers, |triggers| {
            triggers[index].expansion = previous;
        })?;
        Ok(updated)
    }

    /// Delete a trigger by shortcut
    pub fn delete(&self, shortcut: &str) -> Result<()> {
        let mut triggers = self.lock();
        let index = triggers
            .iter()
            .position(|t| t.shortcut == shortcut)
            .ok_or_else(|| AutofillError::ShortcutNotFound(shortcut.to_string()))?;

        let removed = triggers.remove(index);
        self.commit(&mut triggers, |triggers| {
            triggers.insert(index, removed);
        })
    }

    /// Import triggers from JSON text; see [`TriggerStore::import_value`]
    pub fn import_json(&self, json: &str) -> Result<usize> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| AutofillError::InvalidImport(format!("could not parse JSON: {}", e)))?;
        self.import_value(value)
    }

    /// Append the entries of a JSON array whose shortcut is not taken yet.
    ///
    /// Anything but an array is rejected outright. Entries that are not
    /// objects, lack a non-empty shortcut or expansion, or repeat a shortcut
    /// already present are skipped. Returns how many were added.
    pub fn import_value(&self, value: serde_json::Value) -> Result<usize> {
        let items = match value {
            serde_json::Value::Array(items) => items,
            _ => {
                return Err(AutofillError::InvalidImport(
                    "expected a JSON array of triggers".to_string(),
                ))
            }
        };

        let mut triggers = self.lock();
        let mut taken: HashSet<String> = triggers.iter().map(|t| t.shortcut.clone()).collect();
        let before = triggers.len();

        for item in items {
            let Ok(ImportedTrigger {
                shortcut: Some(shortcut),
                expansion: Some(expansion),
            }) = serde_json::from_value::<ImportedTrigger>(item)
            else {
                continue;
            };
            if shortcut.is_empty() || expansion.is_empty() || taken.contains(&shortcut) {
                debug!(%shortcut, "skipping import entry");
                continue;
            }
            taken.insert(shortcut.clone());
            triggers.push(Trigger::new(shortcut, expansion));
        }

        let added = triggers.len() - before;
        if added > 0 {
            self.commit(&mut triggers, |triggers| triggers.truncate(before))?;
        }
        info!(added, "imported triggers");
        Ok(added)
    }

    /// The full list as pretty-printed JSON
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&*self.lock())?)
    }

    pub fn export_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.export_json()?)?;
        info!(path = %path.display(), "exported triggers");
        Ok(())
    }

    /// Persist and publish `triggers`; on a failed write run `rollback` so
    /// memory keeps matching the file.
    fn commit(
        &self,
        triggers: &mut MutexGuard<'_, Vec<Trigger>>,
        rollback: impl FnOnce(&mut Vec<Trigger>),
    ) -> Result<()> {
        if let Err(err) = self.save(triggers.as_slice()) {
            rollback(&mut **triggers);
            return Err(err);
        }
        self.changes.send_replace(Arc::new(triggers.to_vec()));
        Ok(())
    }

    /// Write via a temp file and rename
    fn save(&self, triggers: &[Trigger]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_config_dir(parent)?;
        }

        let serialized = serde_json::to_string_pretty(triggers)?;
        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(serialized.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            AutofillError::Io(e)
        })?;

        debug!(count = triggers.len(), path = %self.path.display(), "saved triggers");
        Ok(())
    }
}

#[async_trait]
impl TriggerSource for TriggerStore {
    async fn get_all(&self) -> Result<Vec<Trigger>> {
        Ok(self.list())
    }

    fn subscribe(&self) -> watch::Receiver<TriggerList> {
        self.changes.subscribe()
    }
}

fn load_triggers(path: &Path) -> Result<Vec<Trigger>> {
    if !path.exists() {
        return Ok(vec![]);
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(vec![]);
    }

    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TriggerStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = TriggerStore::open(temp_dir.path().join("triggers.json")).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn add_list_update_delete() {
        let (store, _dir) = create_test_store();

        let added = store.add("  ;sig ", "Regards".to_string()).unwrap();
        assert_eq!(added.shortcut, ";sig");
        assert_eq!(store.list(), vec![Trigger::new(";sig", "Regards")]);

        store.update(";sig", "Cheers".to_string()).unwrap();
        assert_eq!(store.find(";sig").unwrap().expansion, "Cheers");

        store.delete(";sig").unwrap();
        assert!(store.list().is_empty());
    }

    #[test]
    fn add_rejects_duplicates_and_blanks() {
        let (store, _dir) = create_test_store();
        store.add(";m", "a@b.com".to_string()).unwrap();

        assert!(matches!(
            store.add(";m", "other".to_string()),
            Err(AutofillError::DuplicateShortcut(_))
        ));
        assert!(matches!(
            store.add("   ", "x".to_string()),
            Err(AutofillError::InvalidTrigger(_))
        ));
        assert!(matches!(
            store.add(";e", String::new()),
            Err(AutofillError::InvalidTrigger(_))
        ));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn missing_shortcut_is_reported() {
        let (store, _dir) = create_test_store();

        assert!(matches!(
            store.delete(";nope"),
            Err(AutofillError::ShortcutNotFound(_))
        ));
        assert!(matches!(
            store.update(";nope", "x".to_string()),
            Err(AutofillError::ShortcutNotFound(_))
        ));
    }

    #[test]
    fn changes_persist_across_reopen() {
        let (store, dir) = create_test_store();
        store.add(";a", "A".to_string()).unwrap();
        store.add(";b", "B".to_string()).unwrap();

        let reopened = TriggerStore::open(dir.path().join("triggers.json")).unwrap();
        assert_eq!(
            reopened.list(),
            vec![Trigger::new(";a", "A"), Trigger::new(";b", "B")]
        );
    }

    #[test]
    fn seeding_only_happens_for_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("triggers.json");

        let seeded = TriggerStore::open_or_seed(&path, true).unwrap();
        assert_eq!(seeded.list(), default_triggers());

        seeded.delete(";m").unwrap();
        let reopened = TriggerStore::open_or_seed(&path, true).unwrap();
        assert_eq!(reopened.list().len(), 2);

        let unseeded = TriggerStore::open_or_seed(dir.path().join("other.json"), false).unwrap();
        assert!(unseeded.list().is_empty());
    }

    #[test]
    fn search_is_case_insensitive() {
        let (store, _dir) = create_test_store();
        store.add(";m", "Mail@Example.com".to_string()).unwrap();
        store.add(";n", "John Doe".to_string()).unwrap();

        let found = store.search("example");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].shortcut, ";m");
        assert_eq!(store.search("").len(), 2);
    }

    #[test]
    fn import_skips_existing_and_invalid_entries() {
        let (store, _dir) = create_test_store();
        store.add(";m", "original".to_string()).unwrap();

        let added = store
            .import_json(
                r#"[
                    {"shortcut": ";m", "expansion": "replacement"},
                    {"shortcut": ";n", "expansion": "Jane"},
                    {"shortcut": ";n", "expansion": "second copy"},
                    {"shortcut": "", "expansion": "blank"},
                    {"expansion": "no shortcut"},
                    {"shortcut": ";x", "expansion": 5},
                    "not an object"
                ]"#,
            )
            .unwrap();

        assert_eq!(added, 1);
        assert_eq!(
            store.list(),
            vec![Trigger::new(";m", "original"), Trigger::new(";n", "Jane")]
        );
    }

    #[test]
    fn import_rejects_non_array() {
        let (store, _dir) = create_test_store();

        assert!(matches!(
            store.import_json(r#"{"shortcut": ";m"}"#),
            Err(AutofillError::InvalidImport(_))
        ));
        assert!(matches!(
            store.import_json("not json"),
            Err(AutofillError::InvalidImport(_))
        ));
    }

    #[test]
    fn export_round_trips_through_import() {
        let (store, dir) = create_test_store();
        store.add(";a", "A".to_string()).unwrap();
        store.add(";b", "B".to_string()).unwrap();

        let export_path = dir.path().join("autofill_triggers.json");
        store.export_to(&export_path).unwrap();
        let exported = fs::read_to_string(&export_path).unwrap();
        assert!(exported.contains("\n  {"));

        let other = TriggerStore::open(dir.path().join("other.json")).unwrap();
        assert_eq!(other.import_json(&exported).unwrap(), 2);
        assert_eq!(other.list(), store.list());
    }

    #[tokio::test]
    async fn subscribers_see_every_change() {
        let (store, _dir) = create_test_store();
        let mut rx = store.subscribe();
        assert!(rx.borrow_and_update().is_empty());

        store.add(";a", "A".to_string()).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);

        store.delete(";a").unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_empty());
    }
}
