use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::aggregate;
use crate::classifier::classify;
use crate::error::EngineError;
use crate::model::{AccountSummary, Reel};
use crate::quality::score_quality;
use crate::store::MemoryStore;
use crate::thresholds::EngineConfig;
use crate::viral::detect_viral;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanItem {
  pub reel_id: String,
  pub reel_url: String,
  pub view_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanItemError {
  pub reel_id: String,
  pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
  pub saved: usize,
  pub reels: Vec<Reel>,
  pub errors: Vec<ScanItemError>,
  pub summary: AccountSummary,
}

fn validate(item: &ScanItem) -> Result<(), String> {
  if item.reel_id.trim().is_empty() {
    return Err("missing reel_id".to_string());
  }
  if item.reel_url.trim().is_empty() {
    return Err("missing reel_url".to_string());
  }
  if item.view_count < 0 {
    return Err(format!("negative view_count {}", item.view_count));
  }
  Ok(())
}

/// Runs one scanned batch through the engine: find-or-create each reel,
/// rescore it against the owner's current reel set, then recompute and
/// upsert the account summary. Malformed items become per-item errors and
/// the batch keeps going.
pub async fn process_scan_batch(
  store: &MemoryStore,
  account_id: &str,
  items: &[ScanItem],
  now: DateTime<Utc>,
  cfg: &EngineConfig,
) -> Result<ScanReport, EngineError> {
  if items.is_empty() {
    return Err(EngineError::EmptyBatch);
  }

  let _guard = store.lock_for_scan().await;

  let mut saved = Vec::new();
  let mut errors = Vec::new();

  for item in items {
    if let Err(reason) = validate(item) {
      tracing::warn!(reel_id = %item.reel_id, reason = %reason, "skipping scan item");
      errors.push(ScanItemError {
        reel_id: item.reel_id.clone(),
        error: reason,
      });
      continue;
    }

    let mut reel = match store.find_reel(&item.reel_id).await {
      Some(existing) if existing.account_id != account_id => {
        errors.push(ScanItemError {
          reel_id: item.reel_id.clone(),
          error: "reel belongs to another account".to_string(),
        });
        continue;
      }
      Some(mut existing) => {
        existing.record_views(item.view_count, now);
        existing
      }
      None => {
        // Category is assigned once at creation, never re-derived.
        let category = classify(&item.reel_url, &item.reel_id);
        Reel::new(account_id, &item.reel_id, &item.reel_url, item.view_count, category, now)
      }
    };

    let mut owner_reels = store.list_account_reels(account_id).await;
    owner_reels.retain(|r| r.reel_id != reel.reel_id);
    owner_reels.push(reel.clone());

    reel.quality_score = score_quality(&reel, &owner_reels, now, &cfg.quality)?;
    let verdict = detect_viral(&reel, &owner_reels, &cfg.viral);
    reel.is_viral = verdict.is_viral;
    reel.viral_score = verdict.viral_score;

    tracing::debug!(
      reel_id = %reel.reel_id,
      quality = reel.quality_score,
      viral_score = reel.viral_score,
      is_viral = reel.is_viral,
      "scored reel"
    );

    store.upsert_reel(reel.clone()).await;
    saved.push(reel);
  }

  let owner_reels = store.list_account_reels(account_id).await;
  let summary = aggregate(account_id, &owner_reels, now, &cfg.consistency);
  store.upsert_summary(summary.clone()).await;

  tracing::info!(
    account_id,
    saved = saved.len(),
    errors = errors.len(),
    total_reels = summary.total_reels,
    "scan batch processed"
  );

  Ok(ScanReport {
    saved: saved.len(),
    reels: saved,
    errors,
    summary,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::Category;
  use chrono::TimeZone;

  fn t(hours: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(hours * 3600, 0).single().unwrap()
  }

  fn item(id: &str, url: &str, views: i64) -> ScanItem {
    ScanItem {
      reel_id: id.to_string(),
      reel_url: url.to_string(),
      view_count: views,
    }
  }

  #[tokio::test]
  async fn empty_batch_is_rejected() {
    let store = MemoryStore::new();
    let result = process_scan_batch(&store, "acct", &[], t(0), &EngineConfig::default()).await;
    assert!(matches!(result, Err(EngineError::EmptyBatch)));
  }

  #[tokio::test]
  async fn first_scan_creates_classified_and_scored_reels() {
    let store = MemoryStore::new();
    let items = vec![
      item("r1", "https://example.com/funny-cat", 1000),
      item("r2", "https://example.com/film-scene", 2000),
    ];

    let report = process_scan_batch(&store, "acct", &items, t(0), &EngineConfig::default())
      .await
      .unwrap();

    assert_eq!(report.saved, 2);
    assert!(report.errors.is_empty());
    assert_eq!(report.summary.total_reels, 2);
    assert_eq!(report.summary.total_views, 3000);

    let comedy = store.find_reel("r1").await.unwrap();
    assert_eq!(comedy.category, Category::Comedy);
    assert!(comedy.quality_score > 0);

    let movie = store.find_reel("r2").await.unwrap();
    assert_eq!(movie.category, Category::Movie);
  }

  #[tokio::test]
  async fn rescan_appends_history_and_keeps_identity() {
    let store = MemoryStore::new();
    let cfg = EngineConfig::default();

    process_scan_batch(&store, "acct", &[item("r1", "https://example.com/a", 100)], t(0), &cfg)
      .await
      .unwrap();
    process_scan_batch(&store, "acct", &[item("r1", "https://example.com/a", 900)], t(2), &cfg)
      .await
      .unwrap();

    let reel = store.find_reel("r1").await.unwrap();
    assert_eq!(reel.view_count, 900);
    assert_eq!(reel.view_history.len(), 2);
    assert_eq!(reel.scanned_at, t(0));
    assert_eq!(reel.last_updated, t(2));
  }

  #[tokio::test]
  async fn invalid_items_fail_individually_and_the_rest_proceed() {
    let store = MemoryStore::new();
    let items = vec![
      item("", "https://example.com/a", 100),
      item("r2", "", 100),
      item("r3", "https://example.com/c", -5),
      item("r4", "https://example.com/d", 100),
    ];

    let report = process_scan_batch(&store, "acct", &items, t(0), &EngineConfig::default())
      .await
      .unwrap();

    assert_eq!(report.saved, 1);
    assert_eq!(report.errors.len(), 3);
    assert!(store.find_reel("r4").await.is_some());
    assert_eq!(report.summary.total_reels, 1);
  }

  #[tokio::test]
  async fn a_reel_owned_elsewhere_is_a_per_item_error() {
    let store = MemoryStore::new();
    let cfg = EngineConfig::default();

    process_scan_batch(&store, "acct-a", &[item("r1", "https://example.com/a", 100)], t(0), &cfg)
      .await
      .unwrap();
    let report =
      process_scan_batch(&store, "acct-b", &[item("r1", "https://example.com/a", 900)], t(1), &cfg)
        .await
        .unwrap();

    assert_eq!(report.saved, 0);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].error, "reel belongs to another account");

    // The original owner's reel is untouched.
    let reel = store.find_reel("r1").await.unwrap();
    assert_eq!(reel.account_id, "acct-a");
    assert_eq!(reel.view_count, 100);
  }

  #[tokio::test]
  async fn outlier_reel_is_flagged_viral_during_scan() {
    let store = MemoryStore::new();
    let cfg = EngineConfig::default();

    let mut items: Vec<ScanItem> = (0..10)
      .map(|i| item(&format!("r{i}"), &format!("https://example.com/{i}"), 100))
      .collect();
    items.push(item("star", "https://example.com/star", 5000));

    let report = process_scan_batch(&store, "acct", &items, t(0), &cfg).await.unwrap();

    let star = store.find_reel("star").await.unwrap();
    assert!(star.is_viral);
    assert!(star.viral_score > 500);
    assert_eq!(report.summary.viral_reels, 1);
    assert_eq!(report.summary.viral_ratio, 9);
  }

  #[tokio::test]
  async fn summary_is_upserted_after_every_batch() {
    let store = MemoryStore::new();
    let cfg = EngineConfig::default();

    process_scan_batch(&store, "acct", &[item("r1", "https://example.com/a", 100)], t(0), &cfg)
      .await
      .unwrap();
    let first = store.find_summary("acct").await.unwrap();
    assert_eq!(first.total_reels, 1);

    process_scan_batch(&store, "acct", &[item("r2", "https://example.com/b", 300)], t(1), &cfg)
      .await
      .unwrap();
    let second = store.find_summary("acct").await.unwrap();
    assert_eq!(second.total_reels, 2);
    assert_eq!(second.average_views, 200);
  }
}
