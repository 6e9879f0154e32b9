use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use http::request::Request;
use http::uri::PathAndQuery;
use http::{Method, Uri};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client as HyperClient;
use hyper_util::rt::TokioExecutor;
use openssl::hash::MessageDigest;
use openssl::ssl::{SslConnector, SslMethod, SslVerifyMode};
use openssl::x509::{self, X509};

use crate::auth::AuthenticationKind;
use crate::connector::HttpsConnector;
use crate::{EncodedRequest, Error, HttpApiClient, HttpApiResponse, ParameterSet, Ticket, Token};

#[allow(clippy::type_complexity)]
type ResponseFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpApiResponse, Error>> + Send + 'a>>;

#[derive(Default)]
pub enum TlsOptions {
    /// Default TLS verification.
    #[default]
    Verify,

    /// Insecure: ignore invalid certificates.
    Insecure,

    /// Expect a specific certificate fingerprint (sha256).
    Fingerprint(Vec<u8>),

    /// Verify with a specific PEM formatted CA.
    CaCert(X509),
}

impl TlsOptions {
    /// Parse a fingerprint in the `aa:bb:cc:...` form shown by the Proxmox VE GUI.
    pub fn parse_fingerprint(fingerprint: &str) -> Result<Self, Error> {
        let digits: String = fingerprint
            .chars()
            .filter(|c| !matches!(c, ':' | ' '))
            .collect();

        if digits.len() != 64 {
            return Err(Error::Other("invalid certificate fingerprint length"));
        }

        let fp = (0..digits.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&digits[i..(i + 2)], 16))
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|err| Error::internal("invalid certificate fingerprint", err))?;

        Ok(TlsOptions::Fingerprint(fp))
    }
}

/// Options for the underlying HTTP client.
#[derive(Clone, Debug, Default)]
pub struct HttpOptions {
    /// `User-Agent` header value
    pub user_agent: Option<String>,
    /// TCP keepalive time in seconds, defaults to 7200
    pub tcp_keepalive: Option<u32>,
    /// Time allowed to establish the TCP connection.
    pub connect_timeout: Option<Duration>,
    /// Time allowed for a whole request including reading the response body.
    pub timeout: Option<Duration>,
}

/// A Proxmox VE API client base backed by a `hyper` client.
///
/// The client is meant to be shared, wrap it in an [`Arc`] or pass references around. All
/// requests are independent of each other and may run concurrently.
pub struct Client {
    api_url: Uri,
    auth: Mutex<Option<Arc<AuthenticationKind>>>,
    client: HyperClient<HttpsConnector, Full<Bytes>>,
    options: HttpOptions,
}

impl Client {
    pub const DEFAULT_USER_AGENT_STRING: &'static str =
        concat!("proxmox-client/", env!("CARGO_PKG_VERSION"));

    /// Create a new client instance which will connect to the provided endpoint with default TLS
    /// verification.
    pub fn new(api_url: Uri) -> Result<Self, Error> {
        Self::with_options(api_url, TlsOptions::default(), HttpOptions::default())
    }

    /// Create a new client instance which will connect to the provided endpoint.
    pub fn with_options(
        api_url: Uri,
        tls_options: TlsOptions,
        http_options: HttpOptions,
    ) -> Result<Self, Error> {
        let mut connector = SslConnector::builder(SslMethod::tls_client())
            .map_err(|err| Error::internal("failed to create ssl connector builder", err))?;

        match tls_options {
            TlsOptions::Verify => (),
            TlsOptions::Insecure => connector.set_verify(SslVerifyMode::NONE),
            TlsOptions::Fingerprint(expected_fingerprint) => {
                connector.set_verify_callback(SslVerifyMode::PEER, move |valid, chain| {
                    if valid {
                        return true;
                    }
                    verify_fingerprint(chain, &expected_fingerprint)
                });
            }
            TlsOptions::CaCert(ca) => {
                let mut store = openssl::x509::store::X509StoreBuilder::new().map_err(|err| {
                    Error::internal("failed to create certificate store builder", err)
                })?;
                store
                    .add_cert(ca)
                    .map_err(|err| Error::internal("failed to build certificate store", err))?;
                connector.set_cert_store(store.build());
            }
        }

        let mut http = HttpConnector::new();
        http.set_keepalive(Some(Duration::from_secs(
            http_options.tcp_keepalive.unwrap_or(7200).into(),
        )));
        http.set_connect_timeout(http_options.connect_timeout);

        let https = HttpsConnector::with_connector(http, connector.build());
        let client = HyperClient::builder(TokioExecutor::new()).build(https);

        Ok(Self {
            api_url,
            auth: Mutex::new(None),
            client,
            options: http_options,
        })
    }

    /// Get a reference to the current authentication information.
    pub fn authentication(&self) -> Option<Arc<AuthenticationKind>> {
        self.auth.lock().unwrap().clone()
    }

    /// Replace the authentication information with an API token.
    pub fn use_api_token(&self, token: Token) {
        *self.auth.lock().unwrap() = Some(Arc::new(token.into()));
    }

    /// Replace the authentication information with an already acquired ticket.
    pub fn use_ticket(&self, ticket: Ticket) {
        *self.auth.lock().unwrap() = Some(Arc::new(ticket.into()));
    }

    /// Drop the current authentication information.
    pub fn logout(&self) {
        self.auth.lock().unwrap().take();
    }

    /// Get the currently used API url.
    pub fn api_url(&self) -> &Uri {
        &self.api_url
    }

    /// Assert that we are authenticated and return the `AuthenticationKind`.
    /// Otherwise returns `Error::Unauthorized`.
    pub fn login_auth(&self) -> Result<Arc<AuthenticationKind>, Error> {
        self.auth.lock().unwrap().clone().ok_or(Error::Unauthorized)
    }

    /// Build a URI relative to the current API endpoint.
    fn build_uri(&self, path_and_query: &str) -> Result<Uri, Error> {
        let parts = self.api_url.clone().into_parts();
        let mut builder = http::uri::Builder::new();
        if let Some(scheme) = parts.scheme {
            builder = builder.scheme(scheme);
        }
        if let Some(authority) = parts.authority {
            builder = builder.authority(authority)
        }
        builder
            .path_and_query(
                path_and_query
                    .parse::<PathAndQuery>()
                    .map_err(|err| Error::internal("failed to parse uri", err))?,
            )
            .build()
            .map_err(|err| Error::internal("failed to build Uri", err))
    }

    /// Perform an *authenticated* HTTP request, honoring the configured timeout.
    async fn authenticated_request(
        &self,
        auth: &AuthenticationKind,
        method: Method,
        uri: Uri,
        form_body: Option<String>,
    ) -> Result<HttpApiResponse, Error> {
        log::debug!("{method} {}", uri.path());

        let user_agent = self
            .options
            .user_agent
            .as_deref()
            .unwrap_or(Self::DEFAULT_USER_AGENT_STRING);

        let mut request = auth
            .set_auth_headers(Request::builder().method(method).uri(uri))
            .header(http::header::USER_AGENT, user_agent)
            .header(http::header::ACCEPT, "application/json");

        let body = match form_body {
            Some(body) => {
                request = request.header(
                    http::header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                );
                Full::new(Bytes::from(body))
            }
            None => Full::new(Bytes::new()),
        };

        let request = request
            .body(body)
            .map_err(|err| Error::internal("failed to build request", err))?;

        let response = match self.options.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.send(request))
                .await
                .map_err(|_| Error::Timeout)??,
            None => self.send(request).await?,
        };

        response.check_status()
    }

    async fn send(&self, request: Request<Full<Bytes>>) -> Result<HttpApiResponse, Error> {
        let response = self.client.request(request).await.map_err(Error::client)?;

        let (parts, body) = response.into_parts();
        log::debug!("response status {}", parts.status);

        let body = body.collect().await.map_err(Error::client)?.to_bytes();

        let reason = parts
            .extensions
            .get::<hyper::ext::ReasonPhrase>()
            .and_then(|reason| std::str::from_utf8(reason.as_bytes()).ok())
            .map(str::to_string);

        let content_type = parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(HttpApiResponse {
            status: parts.status.as_u16(),
            reason,
            content_type,
            body: body.to_vec(),
        })
    }
}

impl HttpApiClient for Client {
    type ResponseFuture<'a> = ResponseFuture<'a>;

    fn request<'a>(
        &'a self,
        method: Method,
        path: &'a str,
        params: &'a ParameterSet,
    ) -> Self::ResponseFuture<'a> {
        Box::pin(async move {
            let auth = self.login_auth()?;
            let encoded = EncodedRequest::new(&method, path, params);
            let uri = self.build_uri(&encoded.path_and_query)?;
            self.authenticated_request(&auth, method, uri, encoded.form_body)
                .await
        })
    }
}

fn verify_fingerprint(chain: &x509::X509StoreContextRef, expected_fingerprint: &[u8]) -> bool {
    // only the leaf certificate is pinned
    if chain.error_depth() > 0 {
        return true;
    }

    let Some(cert) = chain.current_cert() else {
        log::error!("no certificate in chain?");
        return false;
    };

    let fp = match cert.digest(MessageDigest::sha256()) {
        Err(err) => {
            log::error!("error calculating certificate fingerprint: {err}");
            return false;
        }
        Ok(fp) => fp,
    };

    if expected_fingerprint != fp.as_ref() {
        log::error!("bad fingerprint: {}", fp_string(&fp));
        log::error!("expected fingerprint: {}", fp_string(expected_fingerprint));
        return false;
    }

    true
}

fn fp_string(fp: &[u8]) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    for b in fp {
        if !out.is_empty() {
            out.push(':');
        }
        let _ = write!(out, "{b:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_parsing() {
        let fp = "0A:1B:2C:3D:4E:5F:60:71:82:93:A4:B5:C6:D7:E8:F9:0A:1B:2C:3D:4E:5F:60:71:82:93:A4:B5:C6:D7:E8:F9";
        match TlsOptions::parse_fingerprint(fp).unwrap() {
            TlsOptions::Fingerprint(bytes) => {
                assert_eq!(bytes.len(), 32);
                assert_eq!(bytes[0], 0x0a);
                assert_eq!(bytes[31], 0xf9);
                assert_eq!(fp_string(&bytes), fp.to_lowercase());
            }
            _ => panic!("expected a fingerprint"),
        }

        assert!(TlsOptions::parse_fingerprint("0A:1B").is_err());
        assert!(TlsOptions::parse_fingerprint(&"zz".repeat(32)).is_err());
    }

    #[tokio::test]
    async fn requests_require_authentication() {
        let client = Client::new("https://localhost:8006".parse().unwrap()).unwrap();
        let err = client
            .get("/api2/json/version", &ParameterSet::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized));

        client.use_api_token(Token::pve("root@pam!test", "secret"));
        assert!(client.authentication().is_some());
        client.logout();
        assert!(client.login_auth().is_err());
    }
}
