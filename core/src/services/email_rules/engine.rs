//! Ordered rule engine for fake-email detection.

use once_cell::sync::Lazy;
use regex::Regex;

/// Local-parts seen verbatim on abusive signups.
const BLOCKLIST: &[&str] = &["kunj24", "test123", "fake123", "asdf", "qwerty", "demo1"];

/// Name+digit families tied to previously observed abuse runs.
static NAMED_FAMILY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(kunj|jainil|harsh|meet)\d+$").unwrap());

/// Obvious throwaway tokens, optionally followed by digits.
static GENERIC_TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(test|fake|dummy|temp|sample|example|admin|null|spam)\d*$").unwrap());

// Statistically suspicious shapes
static SHORT_NAME_DIGITS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{1,4}\d{3,}$").unwrap());
static NAME_DIGITS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]+\d{3,}$").unwrap());
static SINGLE_LETTER_DIGITS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]\d+$").unwrap());
static LEADING_DIGITS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[a-z].*$").unwrap());
static GENERIC_USER_DIGITS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(user|guest|visitor)\d+$").unwrap());
static DOTTED_NAME_DIGITS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]+\.[a-z]+\d{3,}$").unwrap());

/// Where a rule sits in the chain; the statistical subset also feeds
/// the analytics pipeline's fake-email alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCategory {
    Blocklist,
    NamedFamily,
    GenericToken,
    Statistical,
    Structural,
}

enum Matcher {
    Exact(&'static [&'static str]),
    Pattern(&'static Lazy<Regex>),
    Predicate(fn(&str) -> bool),
}

/// One named rejection rule over a lowercased local-part.
pub struct EmailRule {
    pub name: &'static str,
    pub category: RuleCategory,
    matcher: Matcher,
}

impl EmailRule {
    fn matches(&self, local: &str) -> bool {
        match &self.matcher {
            Matcher::Exact(list) => list.contains(&local),
            Matcher::Pattern(regex) => regex.is_match(local),
            Matcher::Predicate(pred) => pred(local),
        }
    }
}

fn too_short(local: &str) -> bool {
    local.chars().count() < 3
}

fn all_numeric(local: &str) -> bool {
    !local.is_empty() && local.chars().all(|c| c.is_ascii_digit())
}

fn default_rules() -> Vec<EmailRule> {
    use Matcher::*;
    use RuleCategory::*;
    vec![
        EmailRule { name: "blocklist", category: Blocklist, matcher: Exact(BLOCKLIST) },
        EmailRule { name: "named_family", category: NamedFamily, matcher: Pattern(&NAMED_FAMILY_REGEX) },
        EmailRule { name: "generic_token", category: GenericToken, matcher: Pattern(&GENERIC_TOKEN_REGEX) },
        EmailRule { name: "short_name_digits", category: Statistical, matcher: Pattern(&SHORT_NAME_DIGITS_REGEX) },
        EmailRule { name: "name_digits", category: Statistical, matcher: Pattern(&NAME_DIGITS_REGEX) },
        EmailRule { name: "single_letter_digits", category: Statistical, matcher: Pattern(&SINGLE_LETTER_DIGITS_REGEX) },
        EmailRule { name: "leading_digits", category: Statistical, matcher: Pattern(&LEADING_DIGITS_REGEX) },
        EmailRule { name: "generic_user_digits", category: Statistical, matcher: Pattern(&GENERIC_USER_DIGITS_REGEX) },
        EmailRule { name: "dotted_name_digits", category: Statistical, matcher: Pattern(&DOTTED_NAME_DIGITS_REGEX) },
        EmailRule { name: "local_too_short", category: Structural, matcher: Predicate(too_short) },
        EmailRule { name: "local_all_numeric", category: Structural, matcher: Predicate(all_numeric) },
    ]
}

/// Ordered rule chain; the first matching rule rejects the address.
///
/// Rules are data, not code: deployments can swap in a different rule
/// list without touching the evaluation logic.
pub struct EmailRuleEngine {
    rules: Vec<EmailRule>,
}

impl EmailRuleEngine {
    pub fn new(rules: Vec<EmailRule>) -> Self {
        Self { rules }
    }

    /// Lowercased local-part of an address.
    fn local_part(email: &str) -> String {
        email
            .split('@')
            .next()
            .unwrap_or(email)
            .trim()
            .to_lowercase()
    }

    /// `true` if the address passes every rule.
    pub fn verify_candidate(&self, email: &str) -> bool {
        self.rejection_rule(email).is_none()
    }

    /// The first rule the address trips, if any.
    pub fn rejection_rule(&self, email: &str) -> Option<&EmailRule> {
        let local = Self::local_part(email);
        self.rules.iter().find(|rule| rule.matches(&local))
    }

    /// Whether the local-part matches the statistically suspicious
    /// subset of rules. Used by analytics for fake-email alerts.
    pub fn matches_statistical(&self, local: &str) -> bool {
        let local = local.trim().to_lowercase();
        self.rules
            .iter()
            .filter(|rule| rule.category == RuleCategory::Statistical)
            .any(|rule| rule.matches(&local))
    }
}

impl Default for EmailRuleEngine {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> EmailRuleEngine {
        EmailRuleEngine::default()
    }

    #[test]
    fn test_accepts_plausible_addresses() {
        let engine = engine();
        for email in [
            "john.doe@gmail.com",
            "sarah.connor@gmail.com",
            "priya.sharma@gmail.com",
            "mike@gmail.com",
            "alexander@gmail.com",
            "jd99@gmail.com", // two digits only
        ] {
            assert!(engine.verify_candidate(email), "{} should pass", email);
        }
    }

    #[test]
    fn test_rejects_known_abuse_families() {
        let engine = engine();
        assert!(!engine.verify_candidate("kunj24@gmail.com"));
        assert_eq!(
            engine.rejection_rule("kunj24@gmail.com").unwrap().name,
            "blocklist"
        );
        assert_eq!(
            engine.rejection_rule("kunj99@gmail.com").unwrap().name,
            "named_family"
        );
        assert_eq!(
            engine.rejection_rule("meet42@gmail.com").unwrap().name,
            "named_family"
        );
    }

    #[test]
    fn test_rejects_generic_tokens() {
        let engine = engine();
        for email in [
            "test@gmail.com",
            "test7@gmail.com",
            "fake@gmail.com",
            "dummy12@gmail.com",
            "admin@gmail.com",
            "spam2024@gmail.com",
        ] {
            assert!(!engine.verify_candidate(email), "{} should be rejected", email);
        }
    }

    #[test]
    fn test_rejects_statistical_shapes() {
        let engine = engine();
        let cases = [
            ("raj123@gmail.com", "short_name_digits"),
            ("anything123@gmail.com", "name_digits"),
            ("x1@gmail.com", "single_letter_digits"),
            ("123abc@gmail.com", "leading_digits"),
            ("user42@gmail.com", "generic_user_digits"),
            ("john.doe123@gmail.com", "dotted_name_digits"),
        ];
        for (email, rule) in cases {
            let hit = engine.rejection_rule(email).unwrap_or_else(|| {
                panic!("{} should be rejected", email)
            });
            assert_eq!(hit.name, rule, "{}", email);
        }
    }

    #[test]
    fn test_rejects_structural_shapes() {
        let engine = engine();
        assert_eq!(
            engine.rejection_rule("ab@gmail.com").unwrap().name,
            "local_too_short"
        );
        assert_eq!(
            engine.rejection_rule("12345@gmail.com").unwrap().name,
            "local_all_numeric"
        );
    }

    #[test]
    fn test_local_part_matching_is_case_insensitive() {
        let engine = engine();
        assert!(!engine.verify_candidate("KUNJ24@Gmail.com"));
        assert!(!engine.verify_candidate("Test@gmail.com"));
        assert!(engine.verify_candidate("John.Doe@Gmail.com"));
    }

    #[test]
    fn test_statistical_subset() {
        let engine = engine();
        assert!(engine.matches_statistical("raj123"));
        assert!(engine.matches_statistical("user42"));
        assert!(!engine.matches_statistical("john.doe"));
        // Blocklist and generic tokens are not part of the statistical subset
        assert!(!engine.matches_statistical("kunj24"));
        assert!(!engine.matches_statistical("test"));
    }
}
