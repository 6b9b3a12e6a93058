use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::model::Reel;
use crate::thresholds::ViralTiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViralLevel {
  MegaViral,
  HighViral,
  Trending,
}

impl std::fmt::Display for ViralLevel {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ViralLevel::MegaViral => write!(f, "MEGA_VIRAL"),
      ViralLevel::HighViral => write!(f, "HIGH_VIRAL"),
      ViralLevel::Trending => write!(f, "TRENDING"),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct ViralPotential {
  pub has_viral_potential: bool,
  pub level: Option<ViralLevel>,
  pub velocity: Option<f64>,
  pub message: String,
  pub projected_views_24h: Option<i64>,
}

impl ViralPotential {
  fn none(message: &str) -> Self {
    Self {
      has_viral_potential: false,
      level: None,
      velocity: None,
      message: message.to_string(),
      projected_views_24h: None,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct SpikeReport {
  pub has_spike: bool,
  pub spike_multiplier: Option<f64>,
  pub message: Option<String>,
}

impl SpikeReport {
  fn none() -> Self {
    Self {
      has_spike: false,
      spike_multiplier: None,
      message: None,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct ViralVerdict {
  pub is_viral: bool,
  pub viral_score: i64,
  pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertPriority {
  High,
  Medium,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViralAlert {
  pub reel_id: String,
  pub reel_url: String,
  pub current_views: i64,
  pub alert_type: String,
  pub message: String,
  pub velocity: Option<f64>,
  pub projected_views: Option<i64>,
  pub triggered_at: DateTime<Utc>,
  pub priority: AlertPriority,
}

fn round2(v: f64) -> f64 {
  (v * 100.0).round() / 100.0
}

/// Views-per-hour velocity over the trailing window, tiered into viral
/// severity levels. History is sorted before use; duplicate timestamps
/// collapse to zero velocity instead of dividing by zero.
pub fn check_viral_potential(
  reel: &Reel,
  window_hours: i64,
  now: DateTime<Utc>,
  tiers: &ViralTiers,
) -> ViralPotential {
  let history = reel.sorted_history();
  if history.len() < 2 {
    return ViralPotential::none("Insufficient data");
  }

  let cutoff = now - Duration::hours(window_hours);
  let recent: Vec<_> = history.iter().filter(|s| s.timestamp > cutoff).collect();
  if recent.len() < 2 {
    return ViralPotential::none("Not enough recent data");
  }

  let oldest = recent[0];
  let newest = recent[recent.len() - 1];
  let view_gain = (newest.views - oldest.views) as f64;
  let hours_elapsed =
    (newest.timestamp - oldest.timestamp).num_milliseconds() as f64 / (1000.0 * 60.0 * 60.0);

  let velocity = if hours_elapsed > 0.0 {
    view_gain / hours_elapsed
  } else {
    0.0
  };

  let projected = ((reel.view_count as f64) + velocity * 24.0).round() as i64;

  let (level, message) = if velocity > tiers.mega_velocity {
    (ViralLevel::MegaViral, "MEGA VIRAL! Explosive growth detected")
  } else if velocity > tiers.high_velocity {
    (ViralLevel::HighViral, "Going viral! Strong momentum")
  } else if velocity > tiers.trending_velocity {
    (ViralLevel::Trending, "Trending! Good growth rate")
  } else {
    return ViralPotential {
      has_viral_potential: false,
      level: None,
      velocity: Some(velocity),
      message: "Normal growth rate".to_string(),
      projected_views_24h: None,
    };
  };

  ViralPotential {
    has_viral_potential: true,
    level: Some(level),
    velocity: Some(velocity),
    message: message.to_string(),
    projected_views_24h: Some(projected),
  }
}

/// Flags a final interval whose view delta dwarfs the historical average
/// delta. A non-positive average change means no spike is determinable.
pub fn detect_spike(reel: &Reel, tiers: &ViralTiers) -> SpikeReport {
  let history = reel.sorted_history();
  if history.len() < 3 {
    return SpikeReport::none();
  }

  let deltas: Vec<f64> = history
    .windows(2)
    .map(|pair| (pair[1].views - pair[0].views) as f64)
    .collect();
  let avg_change = deltas.iter().sum::<f64>() / (deltas.len() as f64);
  let last_change = deltas[deltas.len() - 1];

  if avg_change <= 0.0 {
    return SpikeReport::none();
  }

  if last_change > avg_change * tiers.spike_multiplier {
    return SpikeReport {
      has_spike: true,
      spike_multiplier: Some(round2(last_change / avg_change)),
      message: Some(format!("Spike alert: {} new views", last_change as i64)),
    };
  }

  SpikeReport::none()
}

/// Owner-relative viral score and the boolean scan flag. Only scores above
/// the alert tier set `is_viral`; the lower tiers are messaging only.
pub fn detect_viral(reel: &Reel, owner_reels: &[Reel], tiers: &ViralTiers) -> ViralVerdict {
  let count = owner_reels.len();
  let avg = if count == 0 {
    0.0
  } else {
    owner_reels.iter().map(|r| r.view_count as f64).sum::<f64>() / (count as f64)
  };

  if avg <= 0.0 {
    return ViralVerdict {
      is_viral: false,
      viral_score: 0,
      message: "Below average".to_string(),
    };
  }

  let viral_score = (((reel.view_count as f64) - avg) / avg * 100.0).round() as i64;

  let (is_viral, message) = if viral_score > tiers.mega_score {
    (true, "MEGA VIRAL! This reel is exploding")
  } else if viral_score > tiers.exceptional_score {
    (true, "Going viral! Exceptional performance")
  } else if viral_score > tiers.alert_score {
    (true, "Viral alert! This reel is trending")
  } else if viral_score > tiers.high_performer_score {
    (false, "High performer, above average engagement")
  } else if viral_score > 0 {
    (false, "Good performance")
  } else {
    (false, "Below average")
  };

  ViralVerdict {
    is_viral,
    viral_score,
    message: message.to_string(),
  }
}

/// Notification payload for a reel that tripped the velocity tiers or the
/// spike detector.
pub fn generate_alert(reel: &Reel, potential: &ViralPotential, now: DateTime<Utc>) -> ViralAlert {
  let alert_type = potential
    .level
    .map(|level| level.to_string())
    .unwrap_or_else(|| "SPIKE".to_string());

  let priority = if potential.level == Some(ViralLevel::MegaViral) {
    AlertPriority::High
  } else {
    AlertPriority::Medium
  };

  ViralAlert {
    reel_id: reel.reel_id.clone(),
    reel_url: reel.reel_url.clone(),
    current_views: reel.view_count,
    alert_type,
    message: potential.message.clone(),
    velocity: potential.velocity,
    projected_views: potential.projected_views_24h,
    triggered_at: now,
    priority,
  }
}

/// Combined 0-100 momentum score blending the owner-relative view ratio with
/// the velocity signal.
pub fn viral_momentum(reel: &Reel, avg_views: f64, now: DateTime<Utc>, tiers: &ViralTiers) -> u8 {
  if avg_views <= 0.0 {
    return 0;
  }

  let view_ratio = (reel.view_count as f64) / avg_views;
  let check = check_viral_potential(reel, tiers.window_hours, now, tiers);
  let velocity_score = if check.has_viral_potential {
    check.velocity.unwrap_or(0.0) / 10.0
  } else {
    0.0
  };

  (view_ratio * 30.0 + velocity_score * 0.7).min(100.0).round() as u8
}
