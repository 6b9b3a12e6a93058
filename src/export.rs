use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::EngineError;
use crate::model::{AccountSummary, Category, Reel};

#[derive(Debug, Clone, Serialize)]
pub struct ExportedReel {
  pub reel_id: String,
  pub reel_url: String,
  pub view_count: i64,
  pub category: Category,
  pub quality_score: u8,
  pub is_viral: bool,
  pub viral_score: i64,
  pub scanned_at: DateTime<Utc>,
}

impl From<&Reel> for ExportedReel {
  fn from(reel: &Reel) -> Self {
    Self {
      reel_id: reel.reel_id.clone(),
      reel_url: reel.reel_url.clone(),
      view_count: reel.view_count,
      category: reel.category,
      quality_score: reel.quality_score,
      is_viral: reel.is_viral,
      viral_score: reel.viral_score,
      scanned_at: reel.scanned_at,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountExport {
  pub export_date: DateTime<Utc>,
  pub summary: Option<AccountSummary>,
  pub reels: Vec<ExportedReel>,
}

pub fn reels_to_csv(reels: &[Reel]) -> Result<String, EngineError> {
  let mut writer = csv::Writer::from_writer(Vec::new());
  writer.write_record([
    "Reel ID",
    "Reel URL",
    "Views",
    "Category",
    "Quality Score",
    "Is Viral",
    "Viral Score",
    "Scanned At",
  ])?;

  for reel in reels {
    writer.write_record([
      reel.reel_id.clone(),
      reel.reel_url.clone(),
      reel.view_count.to_string(),
      reel.category.to_string(),
      reel.quality_score.to_string(),
      reel.is_viral.to_string(),
      reel.viral_score.to_string(),
      reel.scanned_at.to_rfc3339(),
    ])?;
  }

  let bytes = writer
    .into_inner()
    .map_err(|e| EngineError::Export(e.to_string()))?;
  String::from_utf8(bytes).map_err(|e| EngineError::Export(e.to_string()))
}

pub fn account_export_json(
  summary: Option<&AccountSummary>,
  reels: &[Reel],
  now: DateTime<Utc>,
) -> Result<String, EngineError> {
  let export = AccountExport {
    export_date: now,
    summary: summary.cloned(),
    reels: reels.iter().map(ExportedReel::from).collect(),
  };
  Ok(serde_json::to_string_pretty(&export)?)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn t(hours: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(hours * 3600, 0).single().unwrap()
  }

  fn reel(id: &str, views: i64, category: Category) -> Reel {
    Reel::new("acct", id, &format!("https://example.com/r/{id}"), views, category, t(0))
  }

  #[test]
  fn csv_export_writes_header_and_one_row_per_reel() {
    let reels = vec![reel("r1", 100, Category::Comedy), reel("r2", 250, Category::TrendingAudio)];
    let csv = reels_to_csv(&reels).unwrap();
    let lines: Vec<&str> = csv.trim_end().lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Reel ID,Reel URL,Views"));
    assert!(lines[1].contains("r1"));
    assert!(lines[1].contains("Comedy"));
    assert!(lines[2].contains("Trending Audio"));
  }

  #[test]
  fn csv_export_of_nothing_is_just_the_header() {
    let csv = reels_to_csv(&[]).unwrap();
    assert_eq!(csv.trim_end().lines().count(), 1);
  }

  #[test]
  fn json_export_carries_date_summary_and_reels() {
    let reels = vec![reel("r1", 100, Category::Comedy)];
    let json = account_export_json(None, &reels, t(5)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value.get("export_date").is_some());
    assert!(value["summary"].is_null());
    assert_eq!(value["reels"].as_array().unwrap().len(), 1);
    assert_eq!(value["reels"][0]["category"], "Comedy");
  }
}
