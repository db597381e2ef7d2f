//! Weighted threat level scoring.

use crate::domain::entities::analytics::{AdvancedMetrics, ThreatLevel};
use crate::domain::entities::security_alert::SecurityAlert;

const CRITICAL_THRESHOLD: u64 = 20;
const HIGH_THRESHOLD: u64 = 12;
const MEDIUM_THRESHOLD: u64 = 6;

/// Classify a window's overall threat level.
///
/// The score is a weighted sum of three inputs: each alert contributes
/// its severity weight, a low success rate adds a tiered penalty, and
/// the behavioral counters add capped contributions so that one noisy
/// signal cannot dominate. `metrics.threat_level` is the output slot
/// and is ignored here.
pub fn threat_level(
    alerts: &[SecurityAlert],
    success_rate: f64,
    metrics: &AdvancedMetrics,
) -> ThreatLevel {
    let mut score: u64 = alerts
        .iter()
        .map(|a| a.severity.score_weight() as u64)
        .sum();

    if success_rate < 50.0 {
        score += 8;
    } else if success_rate < 70.0 {
        score += 4;
    } else if success_rate < 85.0 {
        score += 2;
    }

    score += (metrics.bot_traffic / 10).min(5);
    score += (metrics.rapid_fire_attacks / 5).min(4);
    score += (metrics.timing_attack_attempts / 3).min(3);
    score += (metrics.geo_anomalies / 2).min(2);

    if score >= CRITICAL_THRESHOLD {
        ThreatLevel::Critical
    } else if score >= HIGH_THRESHOLD {
        ThreatLevel::High
    } else if score >= MEDIUM_THRESHOLD {
        ThreatLevel::Medium
    } else {
        ThreatLevel::Low
    }
}
