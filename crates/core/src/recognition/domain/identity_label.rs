use std::fmt;

use crate::shared::constants::UNKNOWN_LABEL;

/// Display name of the person currently in view, or `"Unknown"`.
///
/// Never empty: every constructor maps an empty name to Unknown.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IdentityLabel(String);

impl IdentityLabel {
    pub fn unknown() -> Self {
        Self(UNKNOWN_LABEL.to_string())
    }

    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            Self::unknown()
        } else {
            Self(name)
        }
    }

    /// Builds a display label from a collection's external identifier,
    /// e.g. `Jane_Doe` becomes `Jane Doe`.
    pub fn from_external_id(external_id: &str) -> Self {
        Self::new(external_id.replace('_', " "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_LABEL
    }
}

impl Default for IdentityLabel {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for IdentityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
