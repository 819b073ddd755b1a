use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;
use zeroize::Zeroize;

static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("identifier pattern is valid")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} must look like xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx")]
    Malformed { field: &'static str },
}

/// Check the 8-4-4-4-12 hex group shape, ignoring case
pub fn is_valid_identifier(s: &str) -> bool {
    UUID_PATTERN.is_match(s)
}

/// A UUID-shaped credential, lowercased on construction
#[derive(Clone, PartialEq, Eq)]
pub struct Identifier(String);

impl Identifier {
    /// Parse user input for the field named `field` (used in error text)
    pub fn parse(input: &str, field: &'static str) -> Result<Self, IdentifierError> {
        if input.is_empty() {
            return Err(IdentifierError::Missing { field });
        }
        if !is_valid_identifier(input) {
            return Err(IdentifierError::Malformed { field });
        }
        Ok(Self(input.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only the first group, enough to tell accounts apart in logs
        let head = self.0.split('-').next().unwrap_or_default();
        write!(f, "Identifier({head}-...)")
    }
}

impl Drop for Identifier {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Credentials for one deploy attempt, dropped once the attempt finishes
#[derive(Debug, Clone)]
pub struct DeploymentCredentials {
    pub account_id: Identifier,
    pub access_key: Option<Identifier>,
}

impl DeploymentCredentials {
    pub fn new(account_id: Identifier, access_key: Option<Identifier>) -> Self {
        Self {
            account_id,
            access_key,
        }
    }

    /// Validate raw form input, ignoring surrounding whitespace. An empty
    /// access key means "not provided" unless `require_access_key` is set.
    pub fn from_input(
        account_id: &str,
        access_key: &str,
        require_access_key: bool,
    ) -> Result<Self, IdentifierError> {
        let account_id = Identifier::parse(account_id.trim(), "Account ID")?;
        let access_key = match access_key.trim() {
            "" if !require_access_key => None,
            key => Some(Identifier::parse(key, "Access key")?),
        };
        Ok(Self::new(account_id, access_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_canonical_form_in_any_case() {
        assert!(is_valid_identifier("11111111-1111-1111-1111-111111111111"));
        assert!(is_valid_identifier("ABCDEF01-abcd-ABCD-0123-456789abcdef"));
    }

    #[test]
    fn rejects_other_shapes() {
        for bad in [
            "",
            "11111111111111111111111111111111",
            "11111111-1111-1111-1111-11111111111",
            "11111111-1111-1111-1111-1111111111111",
            "g1111111-1111-1111-1111-111111111111",
            " 11111111-1111-1111-1111-111111111111",
            "{11111111-1111-1111-1111-111111111111}",
            "11111111-1111-1111-1111-111111111111\n",
        ] {
            assert!(!is_valid_identifier(bad), "accepted {bad:?}");
        }
    }

    #[test]
    fn parse_normalizes_to_lowercase() {
        let id = Identifier::parse("ABCDEF01-ABCD-ABCD-ABCD-ABCDEF012345", "Account ID").unwrap();
        assert_eq!(id.as_str(), "abcdef01-abcd-abcd-abcd-abcdef012345");
    }

    #[test]
    fn debug_does_not_leak_full_value() {
        let id = Identifier::parse("deadbeef-1111-1111-1111-111111111111", "Access key").unwrap();
        assert_eq!(format!("{id:?}"), "Identifier(deadbeef-...)");
    }

    #[test]
    fn form_input_is_trimmed_before_validation() {
        let padded = " 11111111-1111-1111-1111-111111111111\n";
        assert!(!is_valid_identifier(padded));

        let creds = DeploymentCredentials::from_input(padded, "  ", false).unwrap();
        assert_eq!(creds.account_id.as_str(), "11111111-1111-1111-1111-111111111111");
        assert!(creds.access_key.is_none());
    }

    #[test]
    fn optional_access_key() {
        let creds =
            DeploymentCredentials::from_input("11111111-1111-1111-1111-111111111111", "", false)
                .unwrap();
        assert!(creds.access_key.is_none());

        let err = DeploymentCredentials::from_input("11111111-1111-1111-1111-111111111111", "", true)
            .unwrap_err();
        assert_eq!(err, IdentifierError::Missing { field: "Access key" });

        let err = DeploymentCredentials::from_input("nope", "", false).unwrap_err();
        assert_eq!(err, IdentifierError::Malformed { field: "Account ID" });
    }
}
