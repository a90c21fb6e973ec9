use serde::{Deserialize, Serialize};

/// Identity of a person as supplied by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable identifier from the identity provider
    pub uid: String,
    pub email: String,
    /// Display name (may be empty)
    pub name: String,
}

impl Identity {
    pub fn new(uid: impl Into<String>, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            name: name.into(),
        }
    }

    /// Whether this caller is the person named by the stored `record`
    ///
    /// The uid is authoritative and a caller without one matches nothing.
    /// Only a record written without a uid falls back to a case-insensitive
    /// email comparison.
    pub fn same_person(&self, record: &Identity) -> bool {
        if self.uid.is_empty() {
            return false;
        }
        if !record.uid.is_empty() {
            return self.uid == record.uid;
        }
        !self.email.is_empty() && self.email.eq_ignore_ascii_case(&record.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_person_by_uid() {
        let a = Identity::new("u1", "a@example.com", "A");
        let b = Identity::new("u1", "other@example.com", "B");
        assert!(a.same_person(&b));
    }

    #[test]
    fn test_different_uid_same_email_is_different_person() {
        let a = Identity::new("u1", "a@example.com", "A");
        let b = Identity::new("u2", "a@example.com", "A");
        assert!(!a.same_person(&b));
    }

    #[test]
    fn test_email_fallback_when_uid_missing() {
        let caller = Identity::new("u9", "ops@example.com", "");
        let legacy = Identity::new("", "Ops@Example.com", "");
        assert!(caller.same_person(&legacy));

        let nobody = Identity::new("u9", "", "");
        assert!(!nobody.same_person(&Identity::new("", "", "")));
    }

    #[test]
    fn test_caller_without_uid_never_matches_by_email() {
        let caller = Identity::new("", "ops@example.com", "");
        assert!(!caller.same_person(&Identity::new("u9", "ops@example.com", "")));
        assert!(!caller.same_person(&Identity::new("", "ops@example.com", "")));
    }
}
