use std::collections::HashMap;

use tokio::sync::{Mutex, MutexGuard, RwLock};

use crate::model::{AccountSummary, Reel};

/// In-memory document store with the upsert semantics the engine expects
/// from its persistence collaborator: reels keyed by external id, summaries
/// keyed by account with create-or-replace writes.
#[derive(Default)]
pub struct MemoryStore {
  reels: RwLock<HashMap<String, Reel>>,
  summaries: RwLock<HashMap<String, AccountSummary>>,
  scan_guard: Mutex<()>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Serializes read-modify-write over a scan batch so two concurrent scans
  /// cannot overwrite each other's summary with a stale read.
  pub async fn lock_for_scan(&self) -> MutexGuard<'_, ()> {
    self.scan_guard.lock().await
  }

  pub async fn find_reel(&self, reel_id: &str) -> Option<Reel> {
    self.reels.read().await.get(reel_id).cloned()
  }

  pub async fn upsert_reel(&self, reel: Reel) {
    self.reels.write().await.insert(reel.reel_id.clone(), reel);
  }

  pub async fn delete_reel(&self, reel_id: &str) -> bool {
    self.reels.write().await.remove(reel_id).is_some()
  }

  pub async fn list_account_reels(&self, account_id: &str) -> Vec<Reel> {
    let mut reels: Vec<Reel> = self
      .reels
      .read()
      .await
      .values()
      .filter(|r| r.account_id == account_id)
      .cloned()
      .collect();
    reels.sort_by(|a, b| a.scanned_at.cmp(&b.scanned_at).then(a.reel_id.cmp(&b.reel_id)));
    reels
  }

  pub async fn upsert_summary(&self, summary: AccountSummary) {
    self
      .summaries
      .write()
      .await
      .insert(summary.account_id.clone(), summary);
  }

  pub async fn find_summary(&self, account_id: &str) -> Option<AccountSummary> {
    self.summaries.read().await.get(account_id).cloned()
  }
}
