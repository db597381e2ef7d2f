//! Outbound mail delivery implementations.

mod mock_mailer;

pub use mock_mailer::{MailerFailureMode, MockMailer};
