use std::time::{Duration, Instant};

use hub_config::LarkConfig;
use tokio_util::sync::CancellationToken;

use crate::authorize::authorization_url;
use crate::callback::{CallbackOutcome, CallbackParams, complete_login};
use crate::error::AuthError;
use crate::provider::IdentityProvider;
use crate::state::SessionStore;

/// Poll interval of the blocking listener, so cancellation is noticed.
const RECV_TICK: Duration = Duration::from_millis(250);

/// Where the local listener binds and which path it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackAddress {
    pub bind: String,
    pub path: String,
}

impl CallbackAddress {
    /// Split an `http://host[:port]/path` redirect URI.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::BrowserFlowFailed` for non-http URIs.
    pub fn parse(redirect_uri: &str) -> Result<Self, AuthError> {
        let rest = redirect_uri.strip_prefix("http://").ok_or_else(|| {
            AuthError::BrowserFlowFailed(format!(
                "redirect uri must start with http:// to be served locally: {redirect_uri}"
            ))
        })?;
        let (authority, path) = rest
            .find('/')
            .map_or((rest, "/"), |idx| (&rest[..idx], &rest[idx..]));
        if authority.is_empty() {
            return Err(AuthError::BrowserFlowFailed(format!(
                "redirect uri has no host: {redirect_uri}"
            )));
        }
        let bind = if authority.contains(':') {
            authority.to_string()
        } else {
            format!("{authority}:80")
        };
        let path = path.split('?').next().unwrap_or("/").to_string();
        Ok(Self { bind, path })
    }
}

/// Execute the browser-based Lark login.
///
/// 1. Bind `tiny_http` on the redirect URI's host and port
/// 2. Store a fresh CSRF state and open the browser at the consent page
/// 3. Wait for the redirect (in `spawn_blocking`, `tiny_http::recv` blocks)
/// 4. Run the callback sequence and answer the browser with the outcome
/// 5. Persist the session on success
///
/// Returns `Ok(None)` when `cancel` fires before an outcome is reached.
///
/// # Errors
///
/// Returns `AuthError::BrowserFlowFailed` if the listener cannot bind or the
/// callback times out, and `AuthError::TokenStoreError` if the session cannot
/// be saved. Denials and provider failures are reported as outcomes.
pub async fn login<P: IdentityProvider>(
    config: &LarkConfig,
    provider: &P,
    cancel: &CancellationToken,
) -> Result<Option<CallbackOutcome>, AuthError> {
    let address = CallbackAddress::parse(&config.redirect_uri)?;
    let server = tiny_http::Server::http(&address.bind).map_err(|e| {
        AuthError::BrowserFlowFailed(format!("failed to bind {}: {e}", address.bind))
    })?;

    let sessions = SessionStore::new();
    let state = sessions.begin_authorization()?;
    let url = authorization_url(config, &state);

    eprintln!("Opening browser to: {url}");
    if let Err(error) = open::that(&url) {
        eprintln!("Failed to open browser: {error}");
        eprintln!("Open the URL above manually, then return here.");
    }

    let timeout = Duration::from_secs(config.callback_timeout_secs);
    let watch = cancel.clone();
    let path = address.path.clone();
    let received = tokio::task::spawn_blocking(move || {
        let request = wait_for_callback(&server, timeout, &path, &watch)?;
        Ok::<_, AuthError>(request.map(|request| (server, request)))
    })
    .await
    .map_err(|e| AuthError::BrowserFlowFailed(format!("spawn_blocking join: {e}")))??;

    let Some((_server, request)) = received else {
        tracing::info!("login cancelled while waiting for the browser");
        return Ok(None);
    };

    let query = request.url().split_once('?').map_or("", |(_, q)| q);
    let params = CallbackParams::from_query(query);
    let outcome = complete_login(&params, &sessions, provider, cancel).await;

    respond_html(request, &callback_page(outcome.as_ref()));

    if let Some(CallbackOutcome::Success(session)) = &outcome {
        crate::token_store::store(session)?;
    }
    Ok(outcome)
}

/// Block until a request for `path` arrives, answering anything else with 204.
///
/// Returns `Ok(None)` if `cancel` fires first.
pub(crate) fn wait_for_callback(
    server: &tiny_http::Server,
    timeout: Duration,
    path: &str,
    cancel: &CancellationToken,
) -> Result<Option<tiny_http::Request>, AuthError> {
    let deadline = Instant::now() + timeout;

    loop {
        if cancel.is_cancelled() {
            return Ok(None);
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(AuthError::BrowserFlowFailed(format!(
                "browser callback timed out after {}s",
                timeout.as_secs()
            )));
        }

        let request = match server.recv_timeout(remaining.min(RECV_TICK)) {
            Ok(Some(req)) => req,
            Ok(None) => continue,
            Err(e) => {
                return Err(AuthError::BrowserFlowFailed(format!("recv error: {e}")));
            }
        };

        let request_path = request.url().split('?').next().unwrap_or_default();
        if request_path != path {
            tracing::debug!(url = request.url(), "ignoring non-callback request");
            let _ = request.respond(tiny_http::Response::from_string("").with_status_code(204));
            continue;
        }
        return Ok(Some(request));
    }
}

fn respond_html(request: tiny_http::Request, body: &str) {
    let mut response = tiny_http::Response::from_string(body);
    if let Ok(header) = tiny_http::Header::from_bytes("Content-Type", "text/html; charset=utf-8") {
        response = response.with_header(header);
    }
    if let Err(error) = request.respond(response) {
        tracing::warn!(%error, "failed to answer the browser");
    }
}

fn callback_page(outcome: Option<&CallbackOutcome>) -> String {
    let (title, detail) = match outcome {
        Some(outcome @ CallbackOutcome::Success(_)) => (
            "Login successful",
            format!("{} You can close this tab.", outcome.message()),
        ),
        Some(outcome) => (
            "Login failed",
            format!(
                "{} Return to the terminal and run <code>linkhub auth login</code> to try again.",
                escape_html(&outcome.message())
            ),
        ),
        None => ("Login cancelled", "You can close this tab.".to_string()),
    };
    format!("<html><body><h1>{title}</h1><p>{detail}</p></body></html>")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpStream;

    fn get(addr: std::net::SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).expect("connect");
        write!(stream, "GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .expect("write");
        let mut response = String::new();
        let _ = stream.read_to_string(&mut response);
        response
    }

    #[test]
    fn parses_default_redirect() {
        let address = CallbackAddress::parse("http://localhost:3000/auth/callback").unwrap();
        assert_eq!(address.bind, "localhost:3000");
        assert_eq!(address.path, "/auth/callback");
    }

    #[test]
    fn redirect_without_port_or_path() {
        let address = CallbackAddress::parse("http://127.0.0.1").unwrap();
        assert_eq!(address.bind, "127.0.0.1:80");
        assert_eq!(address.path, "/");
    }

    #[test]
    fn https_redirect_cannot_be_served() {
        assert!(CallbackAddress::parse("https://hub.example.com/cb").is_err());
        assert!(CallbackAddress::parse("http:///cb").is_err());
    }

    #[test]
    fn failure_page_escapes_provider_text() {
        let outcome = CallbackOutcome::Failed(AuthError::AuthorizationFailed("<script>".into()));
        let page = callback_page(Some(&outcome));
        assert!(page.contains("Login failed"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn listener_skips_unrelated_paths() {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("bind");
        let addr = server.server_addr().to_ip().expect("ip addr");
        let client = std::thread::spawn(move || {
            let favicon = get(addr, "/favicon.ico");
            let _ = get(addr, "/auth/callback?code=abc&state=s1");
            favicon
        });

        let cancel = CancellationToken::new();
        let request = wait_for_callback(&server, Duration::from_secs(5), "/auth/callback", &cancel)
            .expect("no error")
            .expect("a callback request");
        assert_eq!(request.url(), "/auth/callback?code=abc&state=s1");
        respond_html(request, "ok");

        let favicon = client.join().expect("client thread");
        assert!(favicon.starts_with("HTTP/1.1 204"));
    }

    #[test]
    fn cancelled_listener_returns_none() {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("bind");
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = wait_for_callback(&server, Duration::from_secs(5), "/cb", &cancel).unwrap();
        assert!(result.is_none());
    }
}
