//! Injectable blocking lookups.
//!
//! Rules never touch the network or the filesystem directly. Email domain
//! checks, username uniqueness and uploaded-file reads go through the traits
//! below so the engine stays deterministic under test. None of them impose a
//! timeout; implementations that talk to the outside world should apply their
//! own.
//!
//! Plain closures implement each trait:
//!
//! ```
//! use formguard_validator::collaborators::{Collaborators, LookupError};
//!
//! let collaborators = Collaborators::default()
//!     .with_mail_exchange(|domain: &str| Ok::<_, LookupError>(domain.ends_with(".com")))
//!     .with_usernames(|name: &str| Ok::<_, LookupError>(name == "taken@example.com"));
//!
//! assert!(collaborators.mail_exchange.has_mail_exchange("example.com").unwrap());
//! ```

use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// A lookup could not produce an answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("lookup failed: {0}")]
pub struct LookupError(pub String);

// ============================================================================
// TRAITS
// ============================================================================

/// Answers whether a mail domain publishes an MX record.
pub trait MailExchangeLookup: Send + Sync {
    /// `Ok(true)` when `domain` can receive mail.
    fn has_mail_exchange(&self, domain: &str) -> Result<bool, LookupError>;
}

/// Answers whether a username is already taken.
pub trait UsernameLookup: Send + Sync {
    /// `Ok(true)` when `username` belongs to an existing account.
    fn username_exists(&self, username: &str) -> Result<bool, LookupError>;
}

/// Reads the content of an uploaded file.
pub trait FileReader: Send + Sync {
    /// Returns the full file content.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

impl<F> MailExchangeLookup for F
where
    F: Fn(&str) -> Result<bool, LookupError> + Send + Sync,
{
    fn has_mail_exchange(&self, domain: &str) -> Result<bool, LookupError> {
        self(domain)
    }
}

impl<F> UsernameLookup for F
where
    F: Fn(&str) -> Result<bool, LookupError> + Send + Sync,
{
    fn username_exists(&self, username: &str) -> Result<bool, LookupError> {
        self(username)
    }
}

impl<F> FileReader for F
where
    F: Fn(&Path) -> io::Result<Vec<u8>> + Send + Sync,
{
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self(path)
    }
}

// ============================================================================
// DEFAULTS
// ============================================================================

/// Treats every domain as able to receive mail. Performs no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllDomains;

impl MailExchangeLookup for AcceptAllDomains {
    fn has_mail_exchange(&self, _domain: &str) -> Result<bool, LookupError> {
        Ok(true)
    }
}

/// Reports every username as free.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRegisteredUsernames;

impl UsernameLookup for NoRegisteredUsernames {
    fn username_exists(&self, _username: &str) -> Result<bool, LookupError> {
        Ok(false)
    }
}

/// Reads uploaded files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileReader;

impl FileReader for FsFileReader {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

// ============================================================================
// BUNDLE
// ============================================================================

/// The set of collaborators handed to every check.
#[derive(Clone)]
pub struct Collaborators {
    /// MX record lookup for email domains.
    pub mail_exchange: Arc<dyn MailExchangeLookup>,
    /// Existing-username lookup for username email fields.
    pub usernames: Arc<dyn UsernameLookup>,
    /// Uploaded file content reader.
    pub files: Arc<dyn FileReader>,
}

impl Collaborators {
    /// Replaces the MX lookup.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_mail_exchange(mut self, lookup: impl MailExchangeLookup + 'static) -> Self {
        self.mail_exchange = Arc::new(lookup);
        self
    }

    /// Replaces the username lookup.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_usernames(mut self, lookup: impl UsernameLookup + 'static) -> Self {
        self.usernames = Arc::new(lookup);
        self
    }

    /// Replaces the file reader.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_files(mut self, reader: impl FileReader + 'static) -> Self {
        self.files = Arc::new(reader);
        self
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            mail_exchange: Arc::new(AcceptAllDomains),
            usernames: Arc::new(NoRegisteredUsernames),
            files: Arc::new(FsFileReader),
        }
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
