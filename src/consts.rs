/// Base URL of a local development backend.
pub const LOCAL_API_URL: &str = "http://127.0.0.1:8080/api/v1";

/// Backend location the client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseUrl {
    /// Local development server (`http://127.0.0.1:8080/api/v1`).
    Local,
    /// Any other deployment, given as a full `http(s)://.../api/v1` base.
    Custom(String),
}

impl BaseUrl {
    /// Base URL for REST endpoints.
    pub fn rest_url(&self) -> String {
        match self {
            BaseUrl::Local => LOCAL_API_URL.to_string(),
            BaseUrl::Custom(url) => url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL for the WebSocket endpoint, derived by swapping the scheme.
    pub fn ws_url(&self) -> String {
        let rest = self.rest_url();
        if let Some(rest) = rest.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = rest.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            rest
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_url_scheme_swap() {
        assert_eq!(BaseUrl::Local.ws_url(), "ws://127.0.0.1:8080/api/v1");
        assert_eq!(
            BaseUrl::Custom("https://example.com/api/v1".to_string()).ws_url(),
            "wss://example.com/api/v1"
        );
    }

    #[test]
    fn test_custom_url_trailing_slash() {
        let base = BaseUrl::Custom("https://example.com/api/v1/".to_string());
        assert_eq!(base.rest_url(), "https://example.com/api/v1");
    }
}
