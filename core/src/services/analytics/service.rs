//! Analytics aggregation over persisted verification records.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Timelike;
use tracing::info;

use crate::domain::clock::Clock;
use crate::domain::entities::analytics::{
    AdvancedMetrics, AnalyticsSnapshot, FailedEmailEntry, IpActivityEntry, ThreatLevel, Timeframe,
    TrendMetrics, UserAgentCount,
};
use crate::domain::entities::security_alert::{AlertSeverity, AlertType, SecurityAlert};
use crate::domain::entities::verification_request::VerificationRequest;
use crate::errors::SecurityError;
use crate::repositories::VerificationRequestRepository;
use crate::services::email_rules::EmailRuleEngine;
use crate::services::threat::{detect_bot_traffic, detect_geo_anomaly, detect_timing_attack};

use super::scorer;

/// Failed attempts that raise a `repeated_failures` alert.
const REPEATED_FAILURES_HIGH: u32 = 8;
/// Failed attempts that escalate the alert to critical.
const REPEATED_FAILURES_CRITICAL: u32 = 15;
/// Requests without a single success that mark an IP suspicious.
const SUSPICIOUS_IP_REQUESTS: u64 = 20;
/// Failed attempts that count a record as a rapid-fire attack.
const RAPID_FIRE_FAILED_ATTEMPTS: u32 = 5;
/// User agents are truncated to this length before bucketing.
const USER_AGENT_TRUNCATE_LEN: usize = 50;
/// Entries kept in each top-N listing.
const TOP_N: usize = 10;

/// Recomputes an [`AnalyticsSnapshot`] from the verification records in
/// a reporting window.
pub struct AnalyticsService<R>
where
    R: VerificationRequestRepository,
{
    requests: Arc<R>,
    heuristics: Arc<EmailRuleEngine>,
    clock: Arc<dyn Clock>,
}

impl<R> AnalyticsService<R>
where
    R: VerificationRequestRepository,
{
    pub fn new(requests: Arc<R>, heuristics: Arc<EmailRuleEngine>, clock: Arc<dyn Clock>) -> Self {
        Self {
            requests,
            heuristics,
            clock,
        }
    }

    /// Aggregate the window's records into a snapshot.
    pub async fn generate_report(
        &self,
        timeframe: Timeframe,
    ) -> Result<AnalyticsSnapshot, SecurityError> {
        let now = self.clock.now();
        let since = now - timeframe.duration();
        let records = self.requests.find_created_since(since).await?;

        let total_requests = records.len() as u64;
        let successful_verifications = records.iter().filter(|r| r.verified).count() as u64;

        let mut ip_tallies: HashMap<&str, (u64, u64)> = HashMap::new();
        let mut email_failures: HashMap<&str, (u64, bool)> = HashMap::new();
        let mut unique_emails: HashSet<&str> = HashSet::new();
        let mut hourly_histogram = [0u64; 24];

        for record in &records {
            let tally = ip_tallies.entry(record.client_ip.as_str()).or_default();
            tally.0 += 1;
            if record.verified {
                tally.1 += 1;
            }

            let failures = email_failures.entry(record.email.as_str()).or_default();
            failures.0 += record.failed_attempts as u64;
            failures.1 |= record.verified;

            unique_emails.insert(record.email.as_str());

            hourly_histogram[record.created_at.hour() as usize] += 1;
        }

        let unique_ips = ip_tallies.len() as u64;

        let mut top_failed_emails: Vec<FailedEmailEntry> = email_failures
            .iter()
            .filter(|(_, (attempts, succeeded))| *attempts >= 3 && !succeeded)
            .map(|(email, (attempts, _))| FailedEmailEntry {
                email: email.to_string(),
                attempts: *attempts,
            })
            .collect();
        top_failed_emails.sort_by(|a, b| b.attempts.cmp(&a.attempts).then(a.email.cmp(&b.email)));
        top_failed_emails.truncate(TOP_N);

        let mut top_ips: Vec<IpActivityEntry> = ip_tallies
            .iter()
            .map(|(ip, (requests, successes))| IpActivityEntry {
                ip: ip.to_string(),
                requests: *requests,
                successes: *successes,
            })
            .collect();
        top_ips.sort_by(|a, b| b.requests.cmp(&a.requests).then(a.ip.cmp(&b.ip)));
        top_ips.truncate(TOP_N);

        let trends = Self::trends(&records, total_requests, successful_verifications, &hourly_histogram);
        let mut alerts = self.emit_alerts(&records, &ip_tallies, now);
        let mut advanced_metrics = Self::advanced_metrics(&records);

        advanced_metrics.threat_level =
            scorer::threat_level(&alerts, trends.success_rate, &advanced_metrics);

        alerts.sort_by(|a, b| b.severity.cmp(&a.severity));

        info!(
            timeframe = timeframe.as_str(),
            total_requests,
            alerts = alerts.len(),
            threat_level = advanced_metrics.threat_level.as_str(),
            event = "analytics_snapshot_generated",
            "Analytics snapshot generated"
        );

        Ok(AnalyticsSnapshot {
            timeframe,
            generated_at: now,
            total_requests,
            successful_verifications,
            unique_ips,
            unique_emails: unique_emails.len() as u64,
            top_failed_emails,
            top_ips,
            hourly_histogram,
            trends,
            alerts,
            advanced_metrics,
        })
    }

    fn trends(
        records: &[VerificationRequest],
        total: u64,
        successes: u64,
        histogram: &[u64; 24],
    ) -> TrendMetrics {
        let success_rate = if total == 0 {
            // No traffic is healthy traffic
            100.0
        } else {
            (successes as f64 / total as f64 * 10_000.0).round() / 100.0
        };

        let total_failed: u64 = records.iter().map(|r| r.failed_attempts as u64).sum();
        let average_attempts_per_verification = if successes == 0 {
            0.0
        } else {
            total_failed as f64 / successes as f64
        };

        let peak_hour = histogram
            .iter()
            .enumerate()
            .max_by_key(|(_, count)| **count)
            .map(|(hour, _)| hour as u8)
            .unwrap_or(0);

        TrendMetrics {
            success_rate,
            average_attempts_per_verification,
            peak_hour,
        }
    }

    fn emit_alerts(
        &self,
        records: &[VerificationRequest],
        ip_tallies: &HashMap<&str, (u64, u64)>,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Vec<SecurityAlert> {
        let mut alerts = Vec::new();

        for record in records {
            if record.failed_attempts >= REPEATED_FAILURES_HIGH {
                let severity = if record.failed_attempts >= REPEATED_FAILURES_CRITICAL {
                    AlertSeverity::Critical
                } else {
                    AlertSeverity::High
                };
                alerts.push(
                    SecurityAlert::new(
                        AlertType::RepeatedFailures,
                        severity,
                        format!(
                            "{} failed verification attempts without success",
                            record.failed_attempts
                        ),
                        now,
                    )
                    .with_email(record.email.clone())
                    .with_ip(record.client_ip.clone())
                    .with_count(record.failed_attempts as u64),
                );
            }

            let local = record.email.split('@').next().unwrap_or(&record.email);
            if self.heuristics.matches_statistical(local) {
                alerts.push(
                    SecurityAlert::new(
                        AlertType::FakeEmailPattern,
                        AlertSeverity::Medium,
                        "Email local-part matches a suspicious pattern",
                        now,
                    )
                    .with_email(record.email.clone())
                    .with_ip(record.client_ip.clone()),
                );
            }
        }

        for (ip, (requests, successes)) in ip_tallies {
            if *requests >= SUSPICIOUS_IP_REQUESTS && *successes == 0 {
                alerts.push(
                    SecurityAlert::new(
                        AlertType::SuspiciousIp,
                        AlertSeverity::High,
                        format!("{} verification requests without a single success", requests),
                        now,
                    )
                    .with_ip(ip.to_string())
                    .with_count(*requests),
                );
            }
        }

        alerts
    }

    fn advanced_metrics(records: &[VerificationRequest]) -> AdvancedMetrics {
        let mut bot_traffic = 0u64;
        let mut rapid_fire_attacks = 0u64;
        let mut timing_attack_attempts = 0u64;
        let mut geo_anomalies = 0u64;
        let mut user_agents: HashMap<String, u64> = HashMap::new();

        for record in records {
            let detection =
                detect_bot_traffic(record.user_agent.as_deref(), &record.attempt_timings);
            if detection.is_bot {
                bot_traffic += 1;
            }

            if let Some(ua) = &record.user_agent {
                let truncated: String = ua.chars().take(USER_AGENT_TRUNCATE_LEN).collect();
                *user_agents.entry(truncated).or_default() += 1;
            }

            if record.failed_attempts >= RAPID_FIRE_FAILED_ATTEMPTS {
                rapid_fire_attacks += 1;
            }

            if detect_timing_attack(&record.attempt_timings) {
                timing_attack_attempts += 1;
            }

            // History for an email is every earlier record in the window
            let previous_ips: Vec<String> = records
                .iter()
                .filter(|other| {
                    other.email == record.email && other.created_at < record.created_at
                })
                .map(|other| other.client_ip.clone())
                .collect();
            if detect_geo_anomaly(&record.client_ip, &previous_ips) {
                geo_anomalies += 1;
            }
        }

        let mut suspicious_user_agents: Vec<UserAgentCount> = user_agents
            .into_iter()
            .map(|(user_agent, count)| UserAgentCount { user_agent, count })
            .collect();
        suspicious_user_agents
            .sort_by(|a, b| b.count.cmp(&a.count).then(a.user_agent.cmp(&b.user_agent)));
        suspicious_user_agents.truncate(TOP_N);

        AdvancedMetrics {
            bot_traffic,
            suspicious_user_agents,
            rapid_fire_attacks,
            timing_attack_attempts,
            geo_anomalies,
            threat_level: ThreatLevel::Low,
        }
    }
}
