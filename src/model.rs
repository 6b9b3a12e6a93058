use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
  Movie,
  Comedy,
  Motivation,
  #[serde(rename = "Trending Audio")]
  TrendingAudio,
  Other,
}

impl Category {
  pub const ALL: [Category; 5] = [
    Category::Movie,
    Category::Comedy,
    Category::Motivation,
    Category::TrendingAudio,
    Category::Other,
  ];
}

impl std::fmt::Display for Category {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Category::Movie => write!(f, "Movie"),
      Category::Comedy => write!(f, "Comedy"),
      Category::Motivation => write!(f, "Motivation"),
      Category::TrendingAudio => write!(f, "Trending Audio"),
      Category::Other => write!(f, "Other"),
    }
  }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ViewSnapshot {
  pub views: i64,
  pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reel {
  pub account_id: String,
  pub reel_id: String,
  pub reel_url: String,
  pub view_count: i64,
  pub category: Category,
  pub quality_score: u8,
  pub is_viral: bool,
  pub viral_score: i64,
  pub view_history: Vec<ViewSnapshot>,
  pub scanned_at: DateTime<Utc>,
  pub last_updated: DateTime<Utc>,
}

impl Reel {
  pub fn new(
    account_id: &str,
    reel_id: &str,
    reel_url: &str,
    view_count: i64,
    category: Category,
    now: DateTime<Utc>,
  ) -> Self {
    Self {
      account_id: account_id.to_string(),
      reel_id: reel_id.to_string(),
      reel_url: reel_url.to_string(),
      view_count,
      category,
      quality_score: 0,
      is_viral: false,
      viral_score: 0,
      view_history: vec![ViewSnapshot {
        views: view_count,
        timestamp: now,
      }],
      scanned_at: now,
      last_updated: now,
    }
  }

  /// Append a rescan snapshot. A decrease in views is accepted as data.
  pub fn record_views(&mut self, views: i64, now: DateTime<Utc>) {
    self.view_count = views;
    self.view_history.push(ViewSnapshot {
      views,
      timestamp: now,
    });
    self.last_updated = now;
  }

  /// History ordered by timestamp ascending. Source order is not trusted;
  /// every time-series computation goes through this.
  pub fn sorted_history(&self) -> Vec<ViewSnapshot> {
    let mut history = self.view_history.clone();
    history.sort_by_key(|snapshot| snapshot.timestamp);
    history
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
  #[serde(rename = "Movie")]
  pub movie: usize,
  #[serde(rename = "Comedy")]
  pub comedy: usize,
  #[serde(rename = "Motivation")]
  pub motivation: usize,
  #[serde(rename = "Trending Audio")]
  pub trending_audio: usize,
  #[serde(rename = "Other")]
  pub other: usize,
}

impl CategoryBreakdown {
  pub fn bump(&mut self, category: Category) {
    match category {
      Category::Movie => self.movie += 1,
      Category::Comedy => self.comedy += 1,
      Category::Motivation => self.motivation += 1,
      Category::TrendingAudio => self.trending_audio += 1,
      Category::Other => self.other += 1,
    }
  }

  pub fn count(&self, category: Category) -> usize {
    match category {
      Category::Movie => self.movie,
      Category::Comedy => self.comedy,
      Category::Motivation => self.motivation,
      Category::TrendingAudio => self.trending_audio,
      Category::Other => self.other,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
  pub account_id: String,
  pub total_reels: usize,
  pub total_views: i64,
  pub average_views: i64,
  pub highest_views: i64,
  pub lowest_views: i64,
  pub viral_reels: usize,
  pub viral_ratio: i64,
  pub growth_rate: i64,
  pub consistency_score: u8,
  pub category_breakdown: CategoryBreakdown,
  pub last_calculated: DateTime<Utc>,
  pub note: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn t(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap()
  }

  #[test]
  fn new_reel_seeds_history_with_creation_snapshot() {
    let reel = Reel::new("acct", "reel-1", "https://example.com/r/1", 500, Category::Other, t(0));
    assert_eq!(reel.view_history.len(), 1);
    assert_eq!(reel.view_history[0].views, 500);
    assert_eq!(reel.scanned_at, t(0));
  }

  #[test]
  fn record_views_appends_and_bumps_last_updated() {
    let mut reel = Reel::new("acct", "reel-1", "https://example.com/r/1", 500, Category::Other, t(0));
    reel.record_views(800, t(3600));
    reel.record_views(700, t(7200));
    assert_eq!(reel.view_count, 700);
    assert_eq!(reel.view_history.len(), 3);
    assert_eq!(reel.scanned_at, t(0));
    assert_eq!(reel.last_updated, t(7200));
  }

  #[test]
  fn sorted_history_orders_by_timestamp() {
    let mut reel = Reel::new("acct", "reel-1", "https://example.com/r/1", 100, Category::Other, t(7200));
    reel.view_history.push(ViewSnapshot {
      views: 50,
      timestamp: t(0),
    });
    let history = reel.sorted_history();
    assert_eq!(history[0].views, 50);
    assert_eq!(history[1].views, 100);
  }

  #[test]
  fn category_labels_match_canonical_names() {
    assert_eq!(Category::TrendingAudio.to_string(), "Trending Audio");
    let json = serde_json::to_string(&Category::TrendingAudio).unwrap();
    assert_eq!(json, "\"Trending Audio\"");
  }

  #[test]
  fn breakdown_bump_and_count_round_trip() {
    let mut breakdown = CategoryBreakdown::default();
    breakdown.bump(Category::Comedy);
    breakdown.bump(Category::Comedy);
    breakdown.bump(Category::TrendingAudio);
    assert_eq!(breakdown.count(Category::Comedy), 2);
    assert_eq!(breakdown.count(Category::TrendingAudio), 1);
    assert_eq!(breakdown.count(Category::Movie), 0);
  }
}
