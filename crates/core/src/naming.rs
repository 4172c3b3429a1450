//! Resource naming.
//!
//! Every bucket and user the broker manages is named `prefix ++ id`. The
//! prefix keeps broker-managed resources apart from anything else living in
//! the same namespace, and lets every operation derive the remote name from
//! the external id without a lookup table.

/// Maps external ids to prefixed remote resource names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceNamer {
    prefix: String,
}

impl ResourceNamer {
    /// Create a namer for the given deployment prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Remote name for an external id.
    pub fn prefix(&self, id: &str) -> String {
        format!("{}{}", self.prefix, id)
    }

    /// External id for a remote name, or `None` if the name lies outside the
    /// broker's namespace.
    pub fn unprefix<'a>(&self, name: &'a str) -> Option<&'a str> {
        name.strip_prefix(self.prefix.as_str())
    }

    /// Whether a remote name belongs to the broker.
    pub fn is_managed(&self, name: &str) -> bool {
        name.starts_with(self.prefix.as_str())
    }
}
