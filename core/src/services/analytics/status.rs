//! Traffic-light security status for monitoring consumers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::clock::Clock;
use crate::domain::entities::analytics::Timeframe;
use crate::domain::entities::security_alert::{AlertSeverity, AlertType, SecurityAlert};
use crate::repositories::VerificationRequestRepository;

use super::service::AnalyticsService;

/// Success rate below which an otherwise-quiet hour turns yellow.
const YELLOW_SUCCESS_RATE: f64 = 70.0;

/// Traffic-light status colors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusColor {
    Green,
    Yellow,
    Red,
}

impl StatusColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

/// Current security posture over the last hour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityStatus {
    pub status: StatusColor,
    pub alerts: Vec<SecurityAlert>,
    pub summary: String,
}

/// Derives a traffic-light status from a one-hour analytics snapshot.
pub struct SecurityStatusReporter<R>
where
    R: VerificationRequestRepository,
{
    analytics: AnalyticsService<R>,
    clock: Arc<dyn Clock>,
}

impl<R> SecurityStatusReporter<R>
where
    R: VerificationRequestRepository,
{
    pub fn new(analytics: AnalyticsService<R>, clock: Arc<dyn Clock>) -> Self {
        Self { analytics, clock }
    }

    /// Current status. Infallible by contract: an internal failure is
    /// reported as red with a synthetic critical alert, never as an
    /// error a monitoring consumer could mistake for "healthy".
    pub async fn get_status(&self) -> SecurityStatus {
        let snapshot = match self.analytics.generate_report(Timeframe::LastHour).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(
                    error = %e,
                    event = "security_status_failed",
                    "Status computation failed; reporting red"
                );
                let alert = SecurityAlert::new(
                    AlertType::MonitoringFailure,
                    AlertSeverity::Critical,
                    "Security monitoring is unavailable; treat the system as at risk.",
                    self.clock.now(),
                );
                return SecurityStatus {
                    status: StatusColor::Red,
                    alerts: vec![alert],
                    summary: "Security status could not be computed.".to_string(),
                };
            }
        };

        let has_critical = snapshot
            .alerts
            .iter()
            .any(|a| a.severity == AlertSeverity::Critical);
        let has_high = snapshot
            .alerts
            .iter()
            .any(|a| a.severity == AlertSeverity::High);

        let status = if has_critical {
            StatusColor::Red
        } else if has_high || snapshot.trends.success_rate < YELLOW_SUCCESS_RATE {
            StatusColor::Yellow
        } else {
            StatusColor::Green
        };

        let summary = format!(
            "{} requests in the last hour, {:.2}% success rate, {} alert(s), threat level {}",
            snapshot.total_requests,
            snapshot.trends.success_rate,
            snapshot.alerts.len(),
            snapshot.advanced_metrics.threat_level.as_str(),
        );

        SecurityStatus {
            status,
            alerts: snapshot.alerts,
            summary,
        }
    }
}
