//! Remote-storage connector selection.
//!
//! The connector itself lives outside this crate. What lives here is the pure
//! mapping from a path's scheme to the connector variant able to serve it.

use std::fmt;

/// Scheme served over TLS
pub const SCHEME_SECURE: &str = "adls://";

/// Scheme served in plain text
pub const SCHEME_INSECURE: &str = "adl://";

/// Connector variants, one per supported scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorKind {
    Secure,
    Insecure,
}

impl ConnectorKind {
    /// Resolve the connector for `path`, or `None` if its scheme is unsupported
    pub fn from_path(path: &str) -> Option<Self> {
        if path.starts_with(SCHEME_SECURE) {
            Some(ConnectorKind::Secure)
        } else if path.starts_with(SCHEME_INSECURE) {
            Some(ConnectorKind::Insecure)
        } else {
            None
        }
    }

    pub fn scheme(&self) -> &'static str {
        match self {
            ConnectorKind::Secure => SCHEME_SECURE,
            ConnectorKind::Insecure => SCHEME_INSECURE,
        }
    }

    pub fn is_secure(&self) -> bool {
        matches!(self, ConnectorKind::Secure)
    }
}

impl fmt::Display for ConnectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme().trim_end_matches("://"))
    }
}

/// True when some connector can serve `path`
pub fn supports_path(path: &str) -> bool {
    ConnectorKind::from_path(path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_schemes() {
        assert_eq!(
            ConnectorKind::from_path("adls://account/dir/file"),
            Some(ConnectorKind::Secure)
        );
        assert_eq!(
            ConnectorKind::from_path("adl://account/dir/file"),
            Some(ConnectorKind::Insecure)
        );
        assert!(ConnectorKind::Secure.is_secure());
        assert!(!ConnectorKind::Insecure.is_secure());
    }

    #[test]
    fn test_rejects_other_paths() {
        for path in ["", "s3://bucket/key", "/local/path", "adl:/missing-slash", "ADL://upper"] {
            assert!(!supports_path(path), "{} should be unsupported", path);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ConnectorKind::Secure.to_string(), "adls");
        assert_eq!(ConnectorKind::Insecure.to_string(), "adl");
    }
}
