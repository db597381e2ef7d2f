//! Verification code lifecycle service.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::domain::clock::Clock;
use crate::domain::entities::security_event::hash_email;
use crate::domain::entities::verification_request::{VerificationRequest, CODE_LENGTH};
use crate::errors::{DeliveryFailureKind, SecurityError};
use crate::repositories::{
    AccountDirectory, SecurityEventRepository, VerificationRequestRepository,
};
use crate::services::email_rules::EmailRuleEngine;
use crate::services::event_log::SecurityEventLog;
use crate::services::rate_limit::{RateLimiter, RateLimiterStore};

use super::config::VerificationServiceConfig;
use super::traits::{DeliveryError, EmailSenderTrait};
use super::types::RequestCodeOutcome;

/// Overall shape check, applied before any heuristic. Heuristics only
/// see addresses that at least look like addresses.
static EMAIL_SHAPE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9._%+\-]*@[a-z0-9.\-]+\.[a-z]{2,}$").unwrap());

/// Manages verification requests end to end.
///
/// Generic over its persistence, delivery and counter-store seams so
/// tests run fully in memory and production wires in real adapters.
pub struct VerificationManager<R, D, M, L, E>
where
    R: VerificationRequestRepository,
    D: AccountDirectory,
    M: EmailSenderTrait,
    L: RateLimiterStore,
    E: SecurityEventRepository + 'static,
{
    requests: Arc<R>,
    accounts: Arc<D>,
    mailer: Arc<M>,
    rate_limiter: RateLimiter<L>,
    event_log: SecurityEventLog<E>,
    heuristics: Arc<EmailRuleEngine>,
    clock: Arc<dyn Clock>,
    config: VerificationServiceConfig,
}

impl<R, D, M, L, E> VerificationManager<R, D, M, L, E>
where
    R: VerificationRequestRepository,
    D: AccountDirectory,
    M: EmailSenderTrait,
    L: RateLimiterStore,
    E: SecurityEventRepository + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        requests: Arc<R>,
        accounts: Arc<D>,
        mailer: Arc<M>,
        rate_limiter: RateLimiter<L>,
        event_log: SecurityEventLog<E>,
        heuristics: Arc<EmailRuleEngine>,
        clock: Arc<dyn Clock>,
        config: VerificationServiceConfig,
    ) -> Self {
        Self {
            requests,
            accounts,
            mailer,
            rate_limiter,
            event_log,
            heuristics,
            clock,
            config,
        }
    }

    /// Issue a verification code and email it.
    ///
    /// Applies, in order: field validation, rate limiting, email shape
    /// and domain checks, fraud heuristics and a registered-account
    /// check. On delivery failure the freshly stored request is rolled
    /// back so a retry is not misread as a resend.
    pub async fn request_code(
        &self,
        email: &str,
        name: &str,
        client_ip: &str,
        user_agent: Option<String>,
    ) -> Result<RequestCodeOutcome, SecurityError> {
        let now = self.clock.now();

        if self.config.cleanup_before_request {
            // Best effort; a failed sweep must not block the request.
            if let Err(e) = self.requests.delete_expired(now).await {
                warn!(
                    event = "verification_cleanup_failed",
                    error = %e,
                    "Expired-request sweep failed"
                );
            }
        }

        let email = email.trim().to_lowercase();
        let name = name.trim().to_string();
        if email.is_empty() {
            return Err(SecurityError::Validation {
                message: "Email address is required.".to_string(),
            });
        }
        if name.is_empty() {
            return Err(SecurityError::Validation {
                message: "Name is required.".to_string(),
            });
        }

        if let Some(violation) = self
            .rate_limiter
            .check_verification_request(client_ip, &email, now)
        {
            self.event_log
                .record_rate_limit_hit(&email, client_ip, &violation.reason)
                .await;
            return Err(SecurityError::RateLimited {
                reason: violation.reason,
                retry_after_seconds: violation.retry_after_seconds,
            });
        }

        if !EMAIL_SHAPE_REGEX.is_match(&email) {
            return Err(SecurityError::Validation {
                message: "Please enter a valid email address.".to_string(),
            });
        }
        if !self.domain_allowed(&email) {
            return Err(SecurityError::Validation {
                message: "This email domain is not supported for signup.".to_string(),
            });
        }

        if let Some(rule) = self.heuristics.rejection_rule(&email) {
            warn!(
                email_hash = %hash_email(&email),
                rule = rule.name,
                event = "email_heuristic_rejected",
                "Email rejected by fraud heuristic"
            );
            self.event_log
                .record_suspicious(&email, client_ip, rule.name)
                .await;
            return Err(SecurityError::HeuristicRejected);
        }

        if self.accounts.email_registered(&email).await? {
            return Err(SecurityError::Validation {
                message: "An account with this email already exists. Please sign in instead."
                    .to_string(),
            });
        }

        let request = VerificationRequest::new_with_expiration(
            email.clone(),
            name,
            client_ip,
            now,
            self.config.code_expiration_minutes,
        )
        .with_user_agent(user_agent.clone());

        let superseded = self.requests.supersede(&request).await?;
        if superseded > 0 {
            info!(
                email_hash = %hash_email(&email),
                superseded,
                event = "verification_request_superseded",
                "Prior verification request replaced"
            );
        }

        let message_id = match self
            .mailer
            .send_verification_code(&email, &request.name, &request.code)
            .await
        {
            Ok(message_id) => message_id,
            Err(e) => {
                // Roll back so the stored state never claims a code the
                // user cannot have received.
                if let Err(rollback) = self.requests.delete_by_email(&email).await {
                    warn!(
                        email_hash = %hash_email(&email),
                        error = %rollback,
                        event = "verification_rollback_failed",
                        "Failed to roll back request after delivery failure"
                    );
                }
                let kind = match &e {
                    DeliveryError::Permanent(_) => DeliveryFailureKind::Permanent,
                    DeliveryError::Transient(_) => DeliveryFailureKind::Transient,
                };
                return Err(SecurityError::DeliveryFailed {
                    kind,
                    message: e.to_string(),
                });
            }
        };

        self.event_log
            .record_request(&email, client_ip, user_agent)
            .await;
        info!(
            email_hash = %hash_email(&email),
            message_id = %message_id,
            event = "verification_code_sent",
            "Verification code issued"
        );

        Ok(RequestCodeOutcome {
            email,
            expires_in_minutes: self.config.code_expiration_minutes,
            message_id,
        })
    }

    /// Check a submitted code against the active request for an email.
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<(), SecurityError> {
        let email = email.trim().to_lowercase();
        let code = code.trim();

        if code.len() != CODE_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(SecurityError::Validation {
                message: format!("Verification code must be {} digits.", CODE_LENGTH),
            });
        }

        let now = self.clock.now();
        let mut request = self
            .requests
            .find_by_email(&email)
            .await?
            .ok_or(SecurityError::NotFound)?;

        // An already-verified record is spent; treat it like a missing one.
        if request.verified {
            return Err(SecurityError::NotFound);
        }
        if request.is_expired(now) {
            return Err(SecurityError::Expired);
        }

        if request.matches_code(code) {
            request.mark_verified(now);
            self.requests.update(&request).await?;
            self.event_log.record_success(&email, request.attempts).await;
            info!(
                email_hash = %hash_email(&email),
                attempts = request.attempts,
                event = "verification_succeeded",
                "Email ownership verified"
            );
            Ok(())
        } else {
            request.record_failed_attempt(now);
            self.requests.update(&request).await?;
            self.event_log
                .record_failure(&email, request.failed_attempts)
                .await;
            warn!(
                email_hash = %hash_email(&email),
                failed_attempts = request.failed_attempts,
                event = "verification_code_mismatch",
                "Submitted code did not match"
            );
            Err(SecurityError::CodeMismatch)
        }
    }

    /// Sweep expired requests. Returns the number removed.
    pub async fn cleanup_expired(&self) -> Result<u64, SecurityError> {
        let removed = self.requests.delete_expired(self.clock.now()).await?;
        if removed > 0 {
            info!(
                removed,
                event = "verification_cleanup",
                "Removed expired verification requests"
            );
        }
        Ok(removed)
    }

    fn domain_allowed(&self, email: &str) -> bool {
        if self.config.allowed_email_domains.is_empty() {
            return true;
        }
        match email.rsplit('@').next() {
            Some(domain) => self
                .config
                .allowed_email_domains
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(domain)),
            None => false,
        }
    }
}
