// Every tier boundary and point award lives here; nothing is re-literal at
// a call site.

/// Sub-score awards for the quality composite. The four maxima sum to 100.
pub const GROWTH_POINTS_EXPLOSIVE: f64 = 40.0;
pub const GROWTH_POINTS_STRONG: f64 = 30.0;
pub const GROWTH_POINTS_POSITIVE: f64 = 20.0;
pub const GROWTH_POINTS_FLAT: f64 = 10.0;

pub const CONSISTENCY_POINTS_TIGHT: f64 = 30.0;
pub const CONSISTENCY_POINTS_STEADY: f64 = 20.0;
pub const CONSISTENCY_POINTS_LOOSE: f64 = 10.0;
/// Awarded when the history has a single snapshot: neither zero nor full credit.
pub const CONSISTENCY_POINTS_DEFAULT: f64 = 15.0;

pub const CADENCE_POINTS_DAILY: f64 = 20.0;
pub const CADENCE_POINTS_ACTIVE: f64 = 15.0;
pub const CADENCE_POINTS_OCCASIONAL: f64 = 10.0;
pub const CADENCE_POINTS_SPARSE: f64 = 5.0;

pub const VARIETY_POINTS_BROAD: f64 = 10.0;
pub const VARIETY_POINTS_MIXED: f64 = 7.0;
pub const VARIETY_POINTS_DUAL: f64 = 5.0;
pub const VARIETY_POINTS_SINGLE: f64 = 2.0;

#[derive(Debug, Clone, Copy)]
pub struct QualityTiers {
  pub growth_explosive_pct: f64,
  pub growth_strong_pct: f64,
  pub consistency_tight_ratio: f64,
  pub consistency_steady_ratio: f64,
  pub cadence_window_days: i64,
  pub cadence_daily: usize,
  pub cadence_active: usize,
  pub cadence_occasional: usize,
  pub variety_broad: usize,
  pub variety_mixed: usize,
  pub variety_dual: usize,
}

impl Default for QualityTiers {
  fn default() -> Self {
    Self {
      growth_explosive_pct: 100.0,
      growth_strong_pct: 50.0,
      consistency_tight_ratio: 0.2,
      consistency_steady_ratio: 0.5,
      cadence_window_days: 7,
      cadence_daily: 7,
      cadence_active: 4,
      cadence_occasional: 2,
      variety_broad: 4,
      variety_mixed: 3,
      variety_dual: 2,
    }
  }
}

#[derive(Debug, Clone, Copy)]
pub struct ViralTiers {
  /// Views-per-hour boundaries, strict greater-than at every tier.
  pub mega_velocity: f64,
  pub high_velocity: f64,
  pub trending_velocity: f64,
  /// Owner-relative viral score boundaries (percent above account mean).
  pub mega_score: i64,
  pub exceptional_score: i64,
  pub alert_score: i64,
  pub high_performer_score: i64,
  pub spike_multiplier: f64,
  pub window_hours: i64,
}

impl Default for ViralTiers {
  fn default() -> Self {
    Self {
      mega_velocity: 1000.0,
      high_velocity: 500.0,
      trending_velocity: 100.0,
      mega_score: 500,
      exceptional_score: 300,
      alert_score: 200,
      high_performer_score: 100,
      spike_multiplier: 3.0,
      window_hours: 24,
    }
  }
}

/// Coefficient-of-variation boundaries for the account consistency score.
/// Lower CV maps to a higher score.
#[derive(Debug, Clone, Copy)]
pub struct ConsistencyTiers {
  pub cv_excellent: f64,
  pub cv_good: f64,
  pub cv_fair: f64,
  pub cv_weak: f64,
  pub min_reels: usize,
  pub default_score: u8,
}

impl Default for ConsistencyTiers {
  fn default() -> Self {
    Self {
      cv_excellent: 20.0,
      cv_good: 40.0,
      cv_fair: 60.0,
      cv_weak: 80.0,
      min_reels: 3,
      default_score: 50,
    }
  }
}

pub const CONSISTENCY_SCORE_EXCELLENT: u8 = 100;
pub const CONSISTENCY_SCORE_GOOD: u8 = 80;
pub const CONSISTENCY_SCORE_FAIR: u8 = 60;
pub const CONSISTENCY_SCORE_WEAK: u8 = 40;
pub const CONSISTENCY_SCORE_POOR: u8 = 20;

#[derive(Debug, Clone, Copy)]
pub struct PricingTiers {
  pub avg_views_top: i64,
  pub avg_views_mid: i64,
  pub avg_views_entry: i64,
  /// USD per thousand views at each average-views tier.
  pub cpm_top: f64,
  pub cpm_mid: f64,
  pub cpm_entry: f64,
  pub cpm_base: f64,
  pub viral_bonus_ratio: i64,
  pub viral_bonus_multiplier: f64,
  pub reels_large: usize,
  pub reels_medium: usize,
  pub reels_small: usize,
}

impl Default for PricingTiers {
  fn default() -> Self {
    Self {
      avg_views_top: 100_000,
      avg_views_mid: 50_000,
      avg_views_entry: 10_000,
      cpm_top: 10.0,
      cpm_mid: 8.0,
      cpm_entry: 6.0,
      cpm_base: 5.0,
      viral_bonus_ratio: 20,
      viral_bonus_multiplier: 1.5,
      reels_large: 50,
      reels_medium: 20,
      reels_small: 10,
    }
  }
}

pub const BRAND_MATCH_CONSISTENCY_WEIGHT: f64 = 30.0;
pub const BRAND_MATCH_VIRAL_WEIGHT: f64 = 25.0;
pub const BRAND_MATCH_VIEWS_POINTS: [f64; 4] = [25.0, 20.0, 15.0, 10.0];
pub const BRAND_MATCH_REELS_POINTS: [f64; 4] = [20.0, 15.0, 10.0, 5.0];

#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
  pub quality: QualityTiers,
  pub viral: ViralTiers,
  pub consistency: ConsistencyTiers,
  pub pricing: PricingTiers,
}
