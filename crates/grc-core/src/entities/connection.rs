use serde::{Deserialize, Serialize};

/// Where and how to reach one tenant's GRC instance.
///
/// Supplied by the session-management collaborator; the engine never
/// establishes or refreshes sessions itself.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    /// Base address of the target system (e.g. `https://grc.example.com`).
    pub base_url: String,
    /// Session credential embedded in the authorization header.
    pub session_token: String,
    /// Instance identifier of the target system.
    pub instance_id: String,
}

impl ConnectionDescriptor {
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        session_token: impl Into<String>,
        instance_id: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            session_token: session_token.into(),
            instance_id: instance_id.into(),
        }
    }

    /// Value of the `Authorization` header for this session.
    #[must_use]
    pub fn authorization(&self) -> String {
        format!("Archer session-id={}", self.session_token)
    }

    /// Build an absolute URL from the base address and path segments.
    ///
    /// Leading and trailing slashes on each part are normalized so callers
    /// can pass configured prefixes as-is.
    #[must_use]
    pub fn url(&self, parts: &[&str]) -> String {
        let mut url = self.base_url.trim_end_matches('/').to_string();
        for part in parts {
            let part = part.trim_matches('/');
            if part.is_empty() {
                continue;
            }
            url.push('/');
            url.push_str(part);
        }
        url
    }
}

// The session token never shows up in logs.
impl std::fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("base_url", &self.base_url)
            .field("session_token", &"<redacted>")
            .field("instance_id", &self.instance_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_segments() {
        let conn = ConnectionDescriptor::new("https://grc.example.com/", "tok", "50000");
        assert_eq!(
            conn.url(&["/contentapi/", "Risks"]),
            "https://grc.example.com/contentapi/Risks"
        );
        assert_eq!(conn.url(&["contentapi", ""]), "https://grc.example.com/contentapi");
    }

    #[test]
    fn authorization_embeds_session_token() {
        let conn = ConnectionDescriptor::new("https://grc.example.com", "abc123", "50000");
        assert_eq!(conn.authorization(), "Archer session-id=abc123");
    }

    #[test]
    fn debug_redacts_token() {
        let conn = ConnectionDescriptor::new("https://grc.example.com", "secret-token", "1");
        let rendered = format!("{conn:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }
}
