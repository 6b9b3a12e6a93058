use crate::model::Category;

const MOVIE_KEYWORDS: [&str; 5] = ["movie", "film", "cinema", "scene", "clip"];
const COMEDY_KEYWORDS: [&str; 5] = ["funny", "comedy", "laugh", "joke", "meme"];
const MOTIVATION_KEYWORDS: [&str; 5] = ["motivation", "inspire", "success", "mindset", "goals"];
const TRENDING_KEYWORDS: [&str; 4] = ["trending", "viral", "trend", "audio"];

/// Keyword classification over the URL and external id. Priority order is
/// fixed: Movie, then Comedy, then Motivation, then Trending Audio.
pub fn classify(reel_url: &str, reel_id: &str) -> Category {
  let combined = format!("{} {}", reel_url.to_lowercase(), reel_id.to_lowercase());

  let matches_any = |keywords: &[&str]| keywords.iter().any(|kw| combined.contains(kw));

  if matches_any(&MOVIE_KEYWORDS) {
    return Category::Movie;
  }
  if matches_any(&COMEDY_KEYWORDS) {
    return Category::Comedy;
  }
  if matches_any(&MOTIVATION_KEYWORDS) {
    return Category::Motivation;
  }
  if matches_any(&TRENDING_KEYWORDS) {
    return Category::TrendingAudio;
  }

  Category::Other
}
