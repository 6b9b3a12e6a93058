use serde::Serialize;

use crate::model::AccountSummary;
use crate::thresholds::{
  PricingTiers, BRAND_MATCH_CONSISTENCY_WEIGHT, BRAND_MATCH_REELS_POINTS,
  BRAND_MATCH_VIEWS_POINTS, BRAND_MATCH_VIRAL_WEIGHT,
};

#[derive(Debug, Clone, Serialize)]
pub struct PricingRecommendation {
  pub min_price: i64,
  pub max_price: i64,
  pub recommended_price: i64,
  pub currency: &'static str,
  pub base_cpm: f64,
}

fn views_tier_points(average_views: i64, tiers: &PricingTiers) -> f64 {
  if average_views > tiers.avg_views_top {
    BRAND_MATCH_VIEWS_POINTS[0]
  } else if average_views > tiers.avg_views_mid {
    BRAND_MATCH_VIEWS_POINTS[1]
  } else if average_views > tiers.avg_views_entry {
    BRAND_MATCH_VIEWS_POINTS[2]
  } else {
    BRAND_MATCH_VIEWS_POINTS[3]
  }
}

fn reels_tier_points(total_reels: usize, tiers: &PricingTiers) -> f64 {
  if total_reels > tiers.reels_large {
    BRAND_MATCH_REELS_POINTS[0]
  } else if total_reels > tiers.reels_medium {
    BRAND_MATCH_REELS_POINTS[1]
  } else if total_reels > tiers.reels_small {
    BRAND_MATCH_REELS_POINTS[2]
  } else {
    BRAND_MATCH_REELS_POINTS[3]
  }
}

fn base_cpm(average_views: i64, tiers: &PricingTiers) -> f64 {
  if average_views > tiers.avg_views_top {
    tiers.cpm_top
  } else if average_views > tiers.avg_views_mid {
    tiers.cpm_mid
  } else if average_views > tiers.avg_views_entry {
    tiers.cpm_entry
  } else {
    tiers.cpm_base
  }
}

/// 0-100 suitability score for brand collaborations, weighted across
/// consistency, viral ratio, reach, and catalog size.
// TODO: weight by target_audience once audience data lands in the summary.
pub fn brand_match_score(
  summary: &AccountSummary,
  _target_audience: &str,
  tiers: &PricingTiers,
) -> u8 {
  let score = (f64::from(summary.consistency_score) / 100.0) * BRAND_MATCH_CONSISTENCY_WEIGHT
    + ((summary.viral_ratio as f64) / 100.0) * BRAND_MATCH_VIRAL_WEIGHT
    + views_tier_points(summary.average_views, tiers)
    + reels_tier_points(summary.total_reels, tiers);

  score.round() as u8
}

/// CPM-based price band for influencer collaborations.
pub fn recommend_pricing(summary: &AccountSummary, tiers: &PricingTiers) -> PricingRecommendation {
  let cpm = base_cpm(summary.average_views, tiers);
  let quality_multiplier = f64::from(summary.consistency_score) / 100.0;
  let viral_bonus = if summary.viral_ratio > tiers.viral_bonus_ratio {
    tiers.viral_bonus_multiplier
  } else {
    1.0
  };

  let estimate = ((summary.average_views as f64) / 1000.0) * cpm * quality_multiplier * viral_bonus;

  PricingRecommendation {
    min_price: (estimate * 0.8).round() as i64,
    max_price: (estimate * 1.2).round() as i64,
    recommended_price: estimate.round() as i64,
    currency: "USD",
    base_cpm: cpm,
  }
}
