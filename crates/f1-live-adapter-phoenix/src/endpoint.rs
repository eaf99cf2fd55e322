//! Socket endpoint resolution.

use crate::subscriber::SubscriberError;
use f1_live_proto::PROTOCOL_VSN;
use url::Url;

/// Transport path segment appended to the socket endpoint.
const TRANSPORT_SEGMENT: &str = "websocket";

/// Resolve a socket endpoint into the websocket URL to dial.
///
/// `http`/`https` endpoints are mapped to `ws`/`wss`. The transport segment
/// and `vsn` parameter are appended the way the Phoenix JS client does.
///
/// # Errors
///
/// Returns error if the endpoint is not a URL, has no host, or uses a scheme
/// other than `ws`, `wss`, `http` or `https`.
pub fn socket_url(endpoint: &str, params: &[(String, String)]) -> Result<Url, SubscriberError> {
    let mut url = Url::parse(endpoint)
        .map_err(|e| SubscriberError::InvalidUrl(format!("{endpoint}: {e}")))?;

    let scheme = match url.scheme() {
        "ws" | "http" => "ws",
        "wss" | "https" => "wss",
        scheme => {
            return Err(SubscriberError::InvalidUrl(format!(
                "{endpoint}: unsupported scheme '{scheme}'"
            )));
        }
    };
    if url.scheme() != scheme {
        url.set_scheme(scheme)
            .map_err(|()| SubscriberError::InvalidUrl(format!("{endpoint}: cannot use {scheme}")))?;
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(SubscriberError::InvalidUrl(format!(
            "{endpoint}: missing host"
        )));
    }

    let path = url.path().trim_end_matches('/').to_string();
    if !path.ends_with(&format!("/{TRANSPORT_SEGMENT}")) {
        url.set_path(&format!("{path}/{TRANSPORT_SEGMENT}"));
    }

    {
        let mut query = url.query_pairs_mut();
        for (key, value) in params {
            query.append_pair(key, value);
        }
        query.append_pair("vsn", PROTOCOL_VSN);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn socket_url_appends_transport_and_vsn() {
        let url = socket_url("ws://localhost:4000/socket", &[]).unwrap();
        assert_eq!(url.as_str(), "ws://localhost:4000/socket/websocket?vsn=2.0.0");
    }

    #[test]
    fn socket_url_maps_http_schemes() {
        let url = socket_url("https://timing.example.com/socket/", &[]).unwrap();
        assert_eq!(
            url.as_str(),
            "wss://timing.example.com/socket/websocket?vsn=2.0.0"
        );

        let url = socket_url("http://127.0.0.1:4000/socket", &[]).unwrap();
        assert_eq!(url.scheme(), "ws");
    }

    #[test]
    fn socket_url_keeps_existing_transport_segment() {
        let url = socket_url("ws://localhost:4000/socket/websocket", &[]).unwrap();
        assert_eq!(url.path(), "/socket/websocket");
    }

    #[test]
    fn socket_url_adds_params_before_vsn() {
        let params = vec![("token".to_string(), "abc 123".to_string())];
        let url = socket_url("ws://localhost:4000/socket", &params).unwrap();
        assert_eq!(url.query(), Some("token=abc+123&vsn=2.0.0"));
    }

    #[test]
    fn socket_url_rejects_bad_input() {
        assert!(matches!(
            socket_url("tcp://localhost:1883", &[]),
            Err(SubscriberError::InvalidUrl(_))
        ));
        assert!(matches!(
            socket_url("localhost:4000/socket", &[]),
            Err(SubscriberError::InvalidUrl(_))
        ));
    }
}
