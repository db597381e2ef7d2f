//! Bot, timing-attack and geo-anomaly detection.

use serde::{Deserialize, Serialize};

/// User-agent fragments of known automation tooling.
const BOT_UA_SIGNATURES: &[&str] = &[
    "bot",
    "crawler",
    "spider",
    "scrapy",
    "curl",
    "wget",
    "python",
    "java/",
    "go-http",
    "okhttp",
    "headless",
    "phantomjs",
    "selenium",
    "puppeteer",
    "playwright",
];

/// Minimum samples before timing uniformity is judged.
const TIMING_ATTACK_MIN_SAMPLES: usize = 10;

/// Population standard deviation below which attempt timings count as
/// machine-uniform, in milliseconds.
const TIMING_ATTACK_STDDEV_MS: f64 = 5.0;

/// Previous sightings required before an IP prefix change counts as an
/// anomaly.
const GEO_ANOMALY_MIN_HISTORY: usize = 3;

/// Result of bot-traffic classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BotDetection {
    pub is_bot: bool,
    /// Heuristic confidence in [0, 1]
    pub confidence: f64,
}

/// Classify a request as bot traffic from its user agent and the
/// intervals between its verification attempts (milliseconds).
///
/// Confidence accumulates over independent signals: an automation
/// signature in the user agent, a missing / truncated / non-browser
/// agent string (real browsers identify with a `Mozilla/` prefix), and
/// machine-fast mean inter-request intervals.
pub fn detect_bot_traffic(user_agent: Option<&str>, request_timings: &[i64]) -> BotDetection {
    let mut confidence: f64 = 0.0;

    match user_agent.map(str::trim).filter(|ua| !ua.is_empty()) {
        Some(ua) => {
            let lowered = ua.to_lowercase();
            if BOT_UA_SIGNATURES.iter().any(|sig| lowered.contains(sig)) {
                confidence += 0.4;
            }
            if ua.len() < 10 || !ua.starts_with("Mozilla/") {
                confidence += 0.3;
            }
        }
        None => confidence += 0.3,
    }

    if request_timings.len() >= 3 {
        let mean = request_timings.iter().sum::<i64>() as f64 / request_timings.len() as f64;
        if mean > 0.0 && mean < 100.0 {
            confidence += 0.3;
            if mean < 10.0 {
                confidence += 0.4;
            }
        }
    }

    let confidence = confidence.min(1.0);
    BotDetection {
        is_bot: confidence >= 0.5,
        confidence,
    }
}

/// Detect suspiciously uniform attempt timings.
///
/// Human-driven retries scatter over seconds; an automated prober
/// produces near-constant intervals. Requires at least 10 samples so a
/// short burst of coincidentally similar timings does not trigger it.
pub fn detect_timing_attack(attempt_timings: &[i64]) -> bool {
    if attempt_timings.len() < TIMING_ATTACK_MIN_SAMPLES {
        return false;
    }

    let n = attempt_timings.len() as f64;
    let mean = attempt_timings.iter().sum::<i64>() as f64 / n;
    let variance = attempt_timings
        .iter()
        .map(|&t| {
            let d = t as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    variance.sqrt() < TIMING_ATTACK_STDDEV_MS
}

/// Detect a coarse network-location change for a subject.
///
/// `true` when the subject has enough history (3+ previous IPs) and the
/// current IP shares its first two dotted-decimal octets with none of
/// them. Deliberately crude: there is no geolocation source, only
/// prefix comparison.
pub fn detect_geo_anomaly(current_ip: &str, previous_ips: &[String]) -> bool {
    if previous_ips.len() < GEO_ANOMALY_MIN_HISTORY {
        return false;
    }

    let current_prefix = ip_prefix(current_ip);
    !previous_ips
        .iter()
        .any(|prev| ip_prefix(prev) == current_prefix)
}

/// First two dotted-decimal octets; the whole string when the address
/// has no such shape (IPv6, hostnames).
fn ip_prefix(ip: &str) -> String {
    let octets: Vec<&str> = ip.split('.').collect();
    if octets.len() == 4 {
        format!("{}.{}", octets[0], octets[1])
    } else {
        ip.to_string()
    }
}
