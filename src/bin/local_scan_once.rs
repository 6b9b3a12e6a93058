use chrono::Utc;

use reel_radar_rust::error::EngineError;
use reel_radar_rust::pricing::{brand_match_score, recommend_pricing};
use reel_radar_rust::scan::{process_scan_batch, ScanItem};
use reel_radar_rust::store::MemoryStore;
use reel_radar_rust::thresholds::EngineConfig;
use reel_radar_rust::viral::{check_viral_potential, detect_spike, generate_alert};

fn parse_flag_value(args: &[String], flag: &str) -> Option<String> {
  args
    .iter()
    .position(|a| a == flag)
    .and_then(|idx| args.get(idx + 1))
    .cloned()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let args: Vec<String> = std::env::args().collect();

  let account_id = parse_flag_value(&args, "--account-id")
    .or_else(|| parse_flag_value(&args, "--account"))
    .unwrap_or_default();
  if account_id.trim().is_empty() {
    eprintln!("Missing required --account-id");
    eprintln!("Example: cargo run --bin local_scan_once -- --account-id creator-42 --input reels.json");
    return Ok(());
  }

  let input_path = parse_flag_value(&args, "--input").unwrap_or_default();
  if input_path.trim().is_empty() {
    eprintln!("Missing required --input (JSON array of {{reel_id, reel_url, view_count}})");
    return Ok(());
  }

  let window_hours = parse_flag_value(&args, "--window-hours")
    .and_then(|v| v.parse::<i64>().ok())
    .unwrap_or(24)
    .clamp(1, 24 * 30);

  let raw = std::fs::read_to_string(input_path.trim())?;
  let items: Vec<ScanItem> = serde_json::from_str(&raw)?;

  let store = MemoryStore::new();
  let cfg = EngineConfig::default();
  let now = Utc::now();

  let report = match process_scan_batch(&store, account_id.trim(), &items, now, &cfg).await {
    Ok(report) => report,
    Err(EngineError::EmptyBatch) => {
      eprintln!("Input file contains no scan items");
      return Ok(());
    }
    Err(err) => return Err(Box::new(err) as Box<dyn std::error::Error>),
  };

  println!(
    "ok=true account_id={} saved={} errors={}",
    account_id.trim(),
    report.saved,
    report.errors.len()
  );
  for item_error in &report.errors {
    println!("error reel_id={} reason={}", item_error.reel_id, item_error.error);
  }

  let summary = &report.summary;
  println!(
    "summary total_reels={} total_views={} average_views={} highest_views={} lowest_views={} viral_reels={} viral_ratio={} growth_rate={} consistency_score={}",
    summary.total_reels,
    summary.total_views,
    summary.average_views,
    summary.highest_views,
    summary.lowest_views,
    summary.viral_reels,
    summary.viral_ratio,
    summary.growth_rate,
    summary.consistency_score,
  );

  let brand_match = brand_match_score(summary, "general", &cfg.pricing);
  let pricing = recommend_pricing(summary, &cfg.pricing);
  println!(
    "agency brand_match={} min_price={} max_price={} recommended_price={} currency={} base_cpm={}",
    brand_match,
    pricing.min_price,
    pricing.max_price,
    pricing.recommended_price,
    pricing.currency,
    pricing.base_cpm,
  );

  for reel in &report.reels {
    let potential = check_viral_potential(reel, window_hours, now, &cfg.viral);
    let spike = detect_spike(reel, &cfg.viral);
    if potential.has_viral_potential {
      let alert = generate_alert(reel, &potential, now);
      println!(
        "alert reel_id={} type={} priority={:?} velocity={} projected_views_24h={} message={:?}",
        alert.reel_id,
        alert.alert_type,
        alert.priority,
        alert.velocity.map(|v| v.round() as i64).unwrap_or(0),
        alert.projected_views.unwrap_or(0),
        alert.message,
      );
    }
    if spike.has_spike {
      println!(
        "spike reel_id={} multiplier={} message={:?}",
        reel.reel_id,
        spike.spike_multiplier.unwrap_or(0.0),
        spike.message.unwrap_or_default(),
      );
    }
  }

  if let Some(sample) = report.reels.last() {
    println!(
      "sample reel_id={} views={} category={} quality={} viral_score={}",
      sample.reel_id, sample.view_count, sample.category, sample.quality_score, sample.viral_score
    );
  }

  Ok(())
}
