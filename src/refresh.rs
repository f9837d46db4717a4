use crate::store::TriggerList;
use crate::table::TriggerTable;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Keep `table` in sync with a store's change notifications.
///
/// Rebuilds once from the current value, then after every change, until the
/// sending store is dropped.
pub fn spawn_refresh(
    table: Arc<TriggerTable>,
    mut changes: watch::Receiver<TriggerList>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let current = changes.borrow_and_update().clone();
        table.rebuild(&current);

        while changes.changed().await.is_ok() {
            let triggers = changes.borrow_and_update().clone();
            debug!(count = triggers.len(), "trigger store changed");
            table.rebuild(&triggers);
        }

        info!("trigger store closed, refresh stopped");
    })
}
