/// Coarse band used for colouring scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Low,
    Fair,
    Good,
    Strong,
}

impl ScoreBand {
    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Low => "Low",
            ScoreBand::Fair => "Fair",
            ScoreBand::Good => "Good",
            ScoreBand::Strong => "Strong",
        }
    }
}

pub fn score_band(score: f64) -> ScoreBand {
    match score {
        s if s >= 80.0 => ScoreBand::Strong,
        s if s >= 60.0 => ScoreBand::Good,
        s if s >= 40.0 => ScoreBand::Fair,
        _ => ScoreBand::Low,
    }
}

/// Fraction of 0..=100 for gauges; out-of-range scores are clamped.
pub fn gauge_ratio(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    (score / 100.0).clamp(0.0, 1.0)
}

/// Render a score without a trailing `.0` for whole numbers.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{:.0}", score)
    } else {
        format!("{:.1}", score)
    }
}

/// Matched count, total listed, and coverage percentage. `None` when the service
/// listed no skills at all.
pub fn skill_coverage(matched: &[String], missing: &[String]) -> Option<(usize, usize, f64)> {
    let total = matched.len() + missing.len();
    if total == 0 {
        return None;
    }
    Some((
        matched.len(),
        total,
        matched.len() as f64 * 100.0 / total as f64,
    ))
}
