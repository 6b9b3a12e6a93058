use chrono::{DateTime, Duration, Utc};

use crate::error::EngineError;
use crate::model::Reel;
use crate::thresholds::{
  QualityTiers, CADENCE_POINTS_ACTIVE, CADENCE_POINTS_DAILY, CADENCE_POINTS_OCCASIONAL,
  CADENCE_POINTS_SPARSE, CONSISTENCY_POINTS_DEFAULT, CONSISTENCY_POINTS_LOOSE,
  CONSISTENCY_POINTS_STEADY, CONSISTENCY_POINTS_TIGHT, GROWTH_POINTS_EXPLOSIVE,
  GROWTH_POINTS_FLAT, GROWTH_POINTS_POSITIVE, GROWTH_POINTS_STRONG, VARIETY_POINTS_BROAD,
  VARIETY_POINTS_DUAL, VARIETY_POINTS_MIXED, VARIETY_POINTS_SINGLE,
};

fn mean(values: &[f64]) -> f64 {
  if values.is_empty() {
    return 0.0;
  }
  values.iter().sum::<f64>() / (values.len() as f64)
}

fn population_std_dev(values: &[f64], mean: f64) -> f64 {
  if values.is_empty() {
    return 0.0;
  }
  let variance = values
    .iter()
    .map(|v| {
      let diff = v - mean;
      diff * diff
    })
    .sum::<f64>()
    / (values.len() as f64);
  variance.sqrt()
}

fn growth_points(reel: &Reel, owner_reels: &[Reel], tiers: &QualityTiers) -> f64 {
  let view_counts: Vec<f64> = owner_reels.iter().map(|r| r.view_count as f64).collect();
  let avg = mean(&view_counts);
  if avg <= 0.0 {
    // Zero mean view count: no growth signal, lowest tier.
    return GROWTH_POINTS_FLAT;
  }

  let growth_pct = ((reel.view_count as f64) - avg) / avg * 100.0;
  if growth_pct > tiers.growth_explosive_pct {
    GROWTH_POINTS_EXPLOSIVE
  } else if growth_pct > tiers.growth_strong_pct {
    GROWTH_POINTS_STRONG
  } else if growth_pct > 0.0 {
    GROWTH_POINTS_POSITIVE
  } else {
    GROWTH_POINTS_FLAT
  }
}

fn consistency_points(reel: &Reel, tiers: &QualityTiers) -> f64 {
  let history = reel.sorted_history();
  if history.len() < 2 {
    return CONSISTENCY_POINTS_DEFAULT;
  }

  let deltas: Vec<f64> = history
    .windows(2)
    .map(|pair| (pair[1].views - pair[0].views) as f64)
    .collect();
  let avg_delta = mean(&deltas);
  let std_dev = population_std_dev(&deltas, avg_delta);

  if std_dev < avg_delta * tiers.consistency_tight_ratio {
    CONSISTENCY_POINTS_TIGHT
  } else if std_dev < avg_delta * tiers.consistency_steady_ratio {
    CONSISTENCY_POINTS_STEADY
  } else {
    CONSISTENCY_POINTS_LOOSE
  }
}

fn cadence_points(owner_reels: &[Reel], now: DateTime<Utc>, tiers: &QualityTiers) -> f64 {
  let window = Duration::days(tiers.cadence_window_days);
  let recent = owner_reels
    .iter()
    .filter(|r| now.signed_duration_since(r.scanned_at) <= window)
    .count();

  if recent >= tiers.cadence_daily {
    CADENCE_POINTS_DAILY
  } else if recent >= tiers.cadence_active {
    CADENCE_POINTS_ACTIVE
  } else if recent >= tiers.cadence_occasional {
    CADENCE_POINTS_OCCASIONAL
  } else {
    CADENCE_POINTS_SPARSE
  }
}

fn variety_points(owner_reels: &[Reel], tiers: &QualityTiers) -> f64 {
  let categories: std::collections::HashSet<_> = owner_reels.iter().map(|r| r.category).collect();

  if categories.len() >= tiers.variety_broad {
    VARIETY_POINTS_BROAD
  } else if categories.len() >= tiers.variety_mixed {
    VARIETY_POINTS_MIXED
  } else if categories.len() >= tiers.variety_dual {
    VARIETY_POINTS_DUAL
  } else {
    VARIETY_POINTS_SINGLE
  }
}

/// Composite 0-100 quality score for one reel against its owner's full reel
/// set. `owner_reels` must contain the reel itself; an empty set is the only
/// error case.
pub fn score_quality(
  reel: &Reel,
  owner_reels: &[Reel],
  now: DateTime<Utc>,
  tiers: &QualityTiers,
) -> Result<u8, EngineError> {
  if owner_reels.is_empty() {
    return Err(EngineError::InsufficientData("owner has no reels"));
  }

  let score = growth_points(reel, owner_reels, tiers)
    + consistency_points(reel, tiers)
    + cadence_points(owner_reels, now, tiers)
    + variety_points(owner_reels, tiers);

  Ok(score.round().min(100.0) as u8)
}
