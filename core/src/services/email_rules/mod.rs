//! Heuristic fraud filtering of email addresses.
//!
//! A best-effort abuse filter, not mailbox verification: it rejects
//! local-parts that match patterns of previously observed fake signups
//! without ever contacting a mail server. Real but odd-looking
//! addresses can be rejected and fake-but-plausible ones accepted;
//! the rule set errs toward catching the throwaway patterns that
//! flooded the signup flow.

mod engine;

pub use engine::{EmailRule, EmailRuleEngine, RuleCategory};
