//! Marker for personal data that must not reach logs verbatim
//!
//! Actor emails and display names travel through the engine and are useful in
//! errors shown to the user, but log sinks only ever see the redacted form.

use std::fmt;

/// Wrapper that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use vinflow_core_types::Sensitive;
///
/// let email = Sensitive::new("coordinator@branch.example".to_string());
/// assert_eq!(format!("{}", email), "c***@branch.example");
/// assert_eq!(format!("{:?}", email), "***REDACTED***");
/// assert_eq!(email.expose(), "coordinator@branch.example");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying value
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***REDACTED***")
    }
}

/// Display keeps the first character and the mail domain so operators can
/// still tell actors apart in logs.
impl<T: AsRef<str>> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = self.0.as_ref();
        let first = raw.chars().next();
        match (first, raw.split_once('@')) {
            (Some(c), Some((_, domain))) => write!(f, "{}***@{}", c, domain),
            (Some(c), None) => write!(f, "{}***", c),
            (None, _) => f.write_str("***"),
        }
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}
