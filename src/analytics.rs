use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::model::{AccountSummary, Category, CategoryBreakdown, Reel};
use crate::thresholds::{
  ConsistencyTiers, CONSISTENCY_SCORE_EXCELLENT, CONSISTENCY_SCORE_FAIR, CONSISTENCY_SCORE_GOOD,
  CONSISTENCY_SCORE_POOR, CONSISTENCY_SCORE_WEAK,
};

#[derive(Debug, Clone, Serialize)]
pub struct TopReel {
  pub reel_id: String,
  pub reel_url: String,
  pub view_count: i64,
  pub category: Category,
  pub quality_score: u8,
  pub is_viral: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GrowthPoint {
  pub date: NaiveDate,
  pub reels: usize,
  pub total_views: i64,
  pub avg_views: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
  First,
  Second,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonWinners {
  pub average_views: Side,
  pub viral_ratio: Side,
  pub consistency: Side,
  pub growth: Side,
}

fn round_ratio(numerator: f64, denominator: f64) -> i64 {
  (numerator / denominator * 100.0).round() as i64
}

/// Percent change from the oldest to the newest reel by first-seen time.
/// Fewer than two reels, or a zero baseline, reads as no growth.
pub fn growth_rate(reels: &[Reel]) -> i64 {
  if reels.len() < 2 {
    return 0;
  }

  let mut ordered: Vec<&Reel> = reels.iter().collect();
  ordered.sort_by_key(|r| r.scanned_at);

  let oldest_views = ordered[0].view_count;
  let newest_views = ordered[ordered.len() - 1].view_count;
  if oldest_views <= 0 {
    return 0;
  }

  round_ratio((newest_views - oldest_views) as f64, oldest_views as f64)
}

/// Coefficient-of-variation score over the account's view counts. Lower
/// variation maps to a higher score.
pub fn consistency_score(reels: &[Reel], tiers: &ConsistencyTiers) -> u8 {
  if reels.len() < tiers.min_reels {
    return tiers.default_score;
  }

  let views: Vec<f64> = reels.iter().map(|r| r.view_count as f64).collect();
  let avg = views.iter().sum::<f64>() / (views.len() as f64);
  if avg <= 0.0 {
    return tiers.default_score;
  }

  let variance = views
    .iter()
    .map(|v| {
      let diff = v - avg;
      diff * diff
    })
    .sum::<f64>()
    / (views.len() as f64);
  let cv = variance.sqrt() / avg * 100.0;

  if cv < tiers.cv_excellent {
    CONSISTENCY_SCORE_EXCELLENT
  } else if cv < tiers.cv_good {
    CONSISTENCY_SCORE_GOOD
  } else if cv < tiers.cv_fair {
    CONSISTENCY_SCORE_FAIR
  } else if cv < tiers.cv_weak {
    CONSISTENCY_SCORE_WEAK
  } else {
    CONSISTENCY_SCORE_POOR
  }
}

/// Full account rollup over the current reel set. Zero reels produces a
/// zero-valued summary with an explanatory note and no division.
pub fn aggregate(
  account_id: &str,
  reels: &[Reel],
  now: DateTime<Utc>,
  tiers: &ConsistencyTiers,
) -> AccountSummary {
  if reels.is_empty() {
    return AccountSummary {
      account_id: account_id.to_string(),
      total_reels: 0,
      total_views: 0,
      average_views: 0,
      highest_views: 0,
      lowest_views: 0,
      viral_reels: 0,
      viral_ratio: 0,
      growth_rate: 0,
      consistency_score: 0,
      category_breakdown: CategoryBreakdown::default(),
      last_calculated: now,
      note: Some("No reels scanned yet".to_string()),
    };
  }

  let total_reels = reels.len();
  let total_views: i64 = reels.iter().map(|r| r.view_count).sum();
  let average_views = ((total_views as f64) / (total_reels as f64)).round() as i64;
  let highest_views = reels.iter().map(|r| r.view_count).max().unwrap_or(0);
  let lowest_views = reels.iter().map(|r| r.view_count).min().unwrap_or(0);

  let viral_reels = reels.iter().filter(|r| r.is_viral).count();
  let viral_ratio = round_ratio(viral_reels as f64, total_reels as f64);

  let mut category_breakdown = CategoryBreakdown::default();
  for reel in reels {
    category_breakdown.bump(reel.category);
  }

  AccountSummary {
    account_id: account_id.to_string(),
    total_reels,
    total_views,
    average_views,
    highest_views,
    lowest_views,
    viral_reels,
    viral_ratio,
    growth_rate: growth_rate(reels),
    consistency_score: consistency_score(reels, tiers),
    category_breakdown,
    last_calculated: now,
    note: None,
  }
}

pub fn top_reels(reels: &[Reel], limit: usize) -> Vec<TopReel> {
  let mut ordered: Vec<&Reel> = reels.iter().collect();
  ordered.sort_by(|a, b| b.view_count.cmp(&a.view_count));

  ordered
    .into_iter()
    .take(limit)
    .map(|r| TopReel {
      reel_id: r.reel_id.clone(),
      reel_url: r.reel_url.clone(),
      view_count: r.view_count,
      category: r.category,
      quality_score: r.quality_score,
      is_viral: r.is_viral,
    })
    .collect()
}

/// Reels scanned within the trailing `days`, grouped per calendar day.
pub fn growth_timeline(reels: &[Reel], days: i64, now: DateTime<Utc>) -> Vec<GrowthPoint> {
  let cutoff = now - Duration::days(days);

  let mut by_day: BTreeMap<NaiveDate, (usize, i64)> = BTreeMap::new();
  for reel in reels {
    if reel.scanned_at < cutoff {
      continue;
    }
    let entry = by_day.entry(reel.scanned_at.date_naive()).or_insert((0, 0));
    entry.0 += 1;
    entry.1 += reel.view_count;
  }

  by_day
    .into_iter()
    .map(|(date, (count, total_views))| GrowthPoint {
      date,
      reels: count,
      total_views,
      avg_views: ((total_views as f64) / (count as f64)).round() as i64,
    })
    .collect()
}

/// Per-metric winner between two account summaries. Ties go to the second.
pub fn compare_summaries(first: &AccountSummary, second: &AccountSummary) -> ComparisonWinners {
  let pick = |a: i64, b: i64| if a > b { Side::First } else { Side::Second };

  ComparisonWinners {
    average_views: pick(first.average_views, second.average_views),
    viral_ratio: pick(first.viral_ratio, second.viral_ratio),
    consistency: pick(i64::from(first.consistency_score), i64::from(second.consistency_score)),
    growth: pick(first.growth_rate, second.growth_rate),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn t(hours: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(hours * 3600, 0).single().unwrap()
  }

  fn reel(id: &str, views: i64, scanned_at: DateTime<Utc>) -> Reel {
    Reel::new("acct", id, &format!("https://example.com/r/{id}"), views, Category::Other, scanned_at)
  }

  fn tiers() -> ConsistencyTiers {
    ConsistencyTiers::default()
  }

  #[test]
  fn aggregate_computes_average_and_extremes() {
    let reels = vec![reel("a", 100, t(0)), reel("b", 200, t(1)), reel("c", 300, t(2))];
    let summary = aggregate("acct", &reels, t(3), &tiers());
    assert_eq!(summary.total_reels, 3);
    assert_eq!(summary.total_views, 600);
    assert_eq!(summary.average_views, 200);
    assert_eq!(summary.highest_views, 300);
    assert_eq!(summary.lowest_views, 100);
    assert!(summary.note.is_none());
  }

  #[test]
  fn aggregate_with_no_reels_is_zeroed_with_a_note() {
    let summary = aggregate("acct", &[], t(0), &tiers());
    assert_eq!(summary.total_reels, 0);
    assert_eq!(summary.average_views, 0);
    assert_eq!(summary.viral_ratio, 0);
    assert_eq!(summary.note.as_deref(), Some("No reels scanned yet"));
  }

  #[test]
  fn aggregate_is_idempotent_up_to_last_calculated() {
    let reels = vec![reel("a", 100, t(0)), reel("b", 200, t(1)), reel("c", 300, t(2))];
    let first = aggregate("acct", &reels, t(3), &tiers());
    let second = aggregate("acct", &reels, t(9), &tiers());
    assert_eq!(first.total_views, second.total_views);
    assert_eq!(first.average_views, second.average_views);
    assert_eq!(first.growth_rate, second.growth_rate);
    assert_eq!(first.consistency_score, second.consistency_score);
    assert_eq!(first.category_breakdown, second.category_breakdown);
    assert_ne!(first.last_calculated, second.last_calculated);
  }

  #[test]
  fn growth_rate_spans_oldest_to_newest_by_scan_time() {
    // Deliberately out of order: newest first.
    let reels = vec![reel("new", 300, t(48)), reel("old", 100, t(0)), reel("mid", 50, t(24))];
    assert_eq!(growth_rate(&reels), 200);
  }

  #[test]
  fn growth_rate_guards_short_sets_and_zero_baselines() {
    assert_eq!(growth_rate(&[reel("only", 500, t(0))]), 0);
    let zero_base = vec![reel("old", 0, t(0)), reel("new", 500, t(1))];
    assert_eq!(growth_rate(&zero_base), 0);
  }

  #[test]
  fn consistency_defaults_below_three_reels() {
    let reels = vec![reel("a", 100, t(0)), reel("b", 200, t(1))];
    assert_eq!(consistency_score(&reels, &tiers()), 50);
  }

  #[test]
  fn uniform_views_score_perfect_consistency() {
    let reels = vec![reel("a", 100, t(0)), reel("b", 100, t(1)), reel("c", 100, t(2))];
    assert_eq!(consistency_score(&reels, &tiers()), 100);
  }

  #[test]
  fn scattered_views_score_poor_consistency() {
    let reels = vec![reel("a", 10, t(0)), reel("b", 1000, t(1)), reel("c", 50_000, t(2))];
    assert_eq!(consistency_score(&reels, &tiers()), 20);
  }

  #[test]
  fn breakdown_always_carries_all_five_categories() {
    let mut reels = vec![reel("a", 100, t(0))];
    reels[0].category = Category::Comedy;
    let summary = aggregate("acct", &reels, t(1), &tiers());
    let json = serde_json::to_value(&summary.category_breakdown).unwrap();
    for category in Category::ALL {
      let key = category.to_string();
      assert!(json.get(&key).is_some(), "missing key {key}");
    }
    assert_eq!(summary.category_breakdown.comedy, 1);
    assert_eq!(summary.category_breakdown.movie, 0);
  }

  #[test]
  fn top_reels_orders_by_views_and_respects_the_limit() {
    let reels = vec![reel("a", 100, t(0)), reel("b", 900, t(1)), reel("c", 500, t(2))];
    let top = top_reels(&reels, 2);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].reel_id, "b");
    assert_eq!(top[1].reel_id, "c");
  }

  #[test]
  fn growth_timeline_groups_per_day_inside_the_window() {
    let reels = vec![
      reel("a", 100, t(0)),
      reel("b", 300, t(1)),
      reel("c", 200, t(30)),
      reel("stale", 999, t(0) - Duration::days(30)),
    ];
    let timeline = growth_timeline(&reels, 7, t(31));
    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline[0].reels, 2);
    assert_eq!(timeline[0].total_views, 400);
    assert_eq!(timeline[0].avg_views, 200);
    assert_eq!(timeline[1].reels, 1);
    assert_eq!(timeline[1].total_views, 200);
  }

  #[test]
  fn comparison_picks_a_winner_per_metric() {
    let reels_a = vec![reel("a", 100, t(0)), reel("b", 400, t(1)), reel("c", 400, t(2))];
    let reels_b = vec![reel("x", 100, t(0)), reel("y", 100, t(1)), reel("z", 120, t(2))];
    let first = aggregate("one", &reels_a, t(3), &tiers());
    let second = aggregate("two", &reels_b, t(3), &tiers());

    let winners = compare_summaries(&first, &second);
    assert_eq!(winners.average_views, Side::First);
    assert_eq!(winners.growth, Side::First);
    assert_eq!(winners.consistency, Side::Second);
  }
}
