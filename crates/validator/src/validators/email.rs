//! Email address check.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::foundation::{CheckContext, Validate, ValidationError, ValidationResult};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
    )
    .unwrap()
});

/// Validates an email address.
///
/// Checks run in order and stop at the first failure:
///
/// 1. exactly one `@`
/// 2. no `..` anywhere
/// 3. address syntax (dotted domain required)
/// 4. the domain accepts mail, per [`MailExchangeLookup`]
/// 5. for username fields, the address is not taken, per [`UsernameLookup`]
///
/// A lookup that fails outright is treated as a negative answer and logged.
///
/// [`MailExchangeLookup`]: crate::collaborators::MailExchangeLookup
/// [`UsernameLookup`]: crate::collaborators::UsernameLookup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Email {
    is_username: bool,
}

impl Email {
    pub fn new(is_username: bool) -> Self {
        Self { is_username }
    }

    /// Whether the address doubles as a username.
    pub fn is_username(&self) -> bool {
        self.is_username
    }
}

impl Validate for Email {
    fn validate(&self, input: &Value, ctx: &CheckContext<'_>) -> ValidationResult<()> {
        let Some(address) = input.as_str() else {
            return Err(invalid(ctx.label));
        };

        if address.matches('@').count() > 1 {
            return Err(ValidationError::new(
                "multiple_at_signs",
                "Email address contains multiple '@' symbols.",
            ));
        }
        if address.contains("..") {
            return Err(ValidationError::new(
                "consecutive_dots",
                "Email address contains consecutive dots.",
            ));
        }
        if !EMAIL_REGEX.is_match(address) {
            return Err(invalid(ctx.label));
        }

        let domain = address.rsplit_once('@').map_or("", |(_, domain)| domain);
        let accepts_mail = ctx
            .collaborators
            .mail_exchange
            .has_mail_exchange(domain)
            .unwrap_or_else(|error| {
                warn!(domain, %error, "mail exchange lookup failed");
                false
            });
        if !accepts_mail {
            return Err(ValidationError::new(
                "invalid_domain",
                "The domain of the email address is invalid.",
            )
            .with_param("domain", domain));
        }

        if self.is_username {
            let taken = ctx
                .collaborators
                .usernames
                .username_exists(address)
                .unwrap_or_else(|error| {
                    warn!(%error, "username lookup failed");
                    true
                });
            if taken {
                return Err(ValidationError::new(
                    "username_taken",
                    "Username already exists. Please choose a different one.",
                ));
            }
        }

        Ok(())
    }
}

fn invalid(label: &str) -> ValidationError {
    ValidationError::new(
        "invalid_email",
        format!("{label} must be a valid email address."),
    )
}
