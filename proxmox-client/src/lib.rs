#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Base client for the Proxmox VE API.
//!
//! This crate contains the pieces every generated API call funnels through:
//!
//! * [`ParameterSet`] and [`IndexedFamily`] to marshal typed arguments into the flat wire
//!   format,
//! * the [`HttpApiClient`] trait which dispatches one request given a [`Verb`] (or HTTP
//!   method), a path and a parameter set,
//! * [`HttpApiResponse`] / [`ApiResponseData`] to decode the `data` envelope of responses,
//! * with the `hyper-client` feature, a [`Client`] implementing the trait on top of `hyper`.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;

use http::{Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;

mod error;
pub use error::{Error, ErrorKind};

mod indexed;
pub use indexed::IndexedFamily;

mod params;
pub use params::ParameterSet;

mod verb;
pub use verb::{params_in_body, EncodedRequest, Verb};

pub(crate) mod auth;
pub use auth::{AuthenticationKind, InvalidToken, Ticket, Token, CSRF_HEADER_NAME};

#[cfg(feature = "hyper-client")]
mod client;
#[cfg(feature = "hyper-client")]
pub use client::{Client, HttpOptions, TlsOptions};

#[cfg(feature = "hyper-client")]
mod connector;

/// HTTP client backend trait. This should be implemented for a HTTP client capable of making
/// *authenticated* API requests to the Proxmox VE HTTP API.
///
/// Implementations perform exactly one round trip per call and must be usable from multiple call
/// sites at once, the generated API layer hands out the same client to all of them.
pub trait HttpApiClient {
    /// An API call should return a status code and the raw body.
    type ResponseFuture<'a>: Future<Output = Result<HttpApiResponse, Error>> + 'a
    where
        Self: 'a;

    /// An *authenticated* asynchronous request with a path (no hostname) and a set of
    /// parameters.
    ///
    /// Parameters are placed in the query string for `GET` and `DELETE`, and sent as a form
    /// encoded body for `POST` and `PUT`, see [`EncodedRequest`].
    fn request<'a>(
        &'a self,
        method: Method,
        path: &'a str,
        params: &'a ParameterSet,
    ) -> Self::ResponseFuture<'a>;

    /// Dispatch via a verb alias.
    fn call<'a>(
        &'a self,
        verb: Verb,
        path: &'a str,
        params: &'a ParameterSet,
    ) -> Self::ResponseFuture<'a> {
        self.request(verb.method(), path, params)
    }

    /// Calls `self.request` with `Method::GET`.
    fn get<'a>(&'a self, path: &'a str, params: &'a ParameterSet) -> Self::ResponseFuture<'a> {
        self.request(Method::GET, path, params)
    }

    /// Calls `self.request` with `Method::POST`.
    fn post<'a>(&'a self, path: &'a str, params: &'a ParameterSet) -> Self::ResponseFuture<'a> {
        self.request(Method::POST, path, params)
    }

    /// Calls `self.request` with `Method::PUT`.
    fn put<'a>(&'a self, path: &'a str, params: &'a ParameterSet) -> Self::ResponseFuture<'a> {
        self.request(Method::PUT, path, params)
    }

    /// Calls `self.request` with `Method::DELETE`.
    fn delete<'a>(&'a self, path: &'a str, params: &'a ParameterSet) -> Self::ResponseFuture<'a> {
        self.request(Method::DELETE, path, params)
    }
}

/// A response from the HTTP API as required by the [`HttpApiClient`] trait.
#[derive(Clone, Debug)]
pub struct HttpApiResponse {
    pub status: u16,
    /// The reason phrase of the status line if it differs from the canonical one. The API
    /// server puts its error messages there.
    pub reason: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpApiResponse {
    /// Turn a non-success status into an [`Error::Api`], using whatever error information the
    /// remote provided.
    pub fn check_status(self) -> Result<Self, Error> {
        let status = StatusCode::from_u16(self.status)
            .map_err(|err| Error::bad_api("api returned an invalid status code", err))?;

        if status.is_success() {
            return Ok(self);
        }

        let payload = serde_json::from_slice::<RawApiResponse<Value>>(&self.body).ok();

        let message = payload
            .as_ref()
            .and_then(|raw| raw.message.clone())
            .or(self.reason)
            .or_else(|| {
                let text = String::from_utf8_lossy(&self.body);
                let text = text.trim();
                (payload.is_none() && !text.is_empty()).then(|| text.to_string())
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("no message provided")
                    .to_string()
            });

        let errors = payload.map(|raw| raw.errors).unwrap_or_default();

        log::warn!("api request failed with status {status}: {message}");

        Err(Error::Api {
            status,
            message,
            errors,
        })
    }

    /// Expect a JSON response carrying a `data` member.
    pub fn expect_json<T>(self) -> Result<ApiResponseData<T>, Error>
    where
        T: for<'de> Deserialize<'de>,
    {
        let this = self.check_status()?;
        this.assert_json_content_type()?;

        serde_json::from_slice::<RawApiResponse<T>>(&this.body)
            .map_err(|err| Error::bad_api("failed to parse api response", err))?
            .check()
    }

    fn assert_json_content_type(&self) -> Result<(), Error> {
        match self
            .content_type
            .as_deref()
            .and_then(|v| v.split(';').next())
            .map(str::trim)
        {
            Some("application/json") => Ok(()),
            Some(other) => Err(Error::BadApi(
                format!("expected json body, got {other}"),
                None,
            )),
            None => Err(Error::BadApi(
                "expected json body, but no Content-Type was sent".to_string(),
                None,
            )),
        }
    }

    /// Expect that the API call did *not* return any data in the `data` field.
    pub fn nodata(self) -> Result<(), Error> {
        let this = self.check_status()?;

        let response = serde_json::from_slice::<RawApiResponse<Value>>(&this.body)
            .map_err(|err| Error::bad_api("unexpected api response", err))?;

        match response.data {
            None | Some(Value::Null) => {
                response.check_success()?;
                Ok(())
            }
            Some(_) => Err(Error::UnexpectedData),
        }
    }
}

/// API responses can have additional *attributes* added to their data.
#[derive(Clone, Debug)]
pub struct ApiResponseData<T> {
    pub attribs: HashMap<String, Value>,
    pub data: T,
}

#[derive(Deserialize)]
struct RawApiResponse<T> {
    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_u16")]
    status: Option<u16>,
    message: Option<String>,
    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_bool")]
    success: Option<bool>,
    data: Option<T>,

    #[serde(default)]
    errors: BTreeMap<String, String>,

    #[serde(default, flatten)]
    attribs: HashMap<String, Value>,
}

impl<T> RawApiResponse<T>
where
    T: for<'de> Deserialize<'de>,
{
    /// The `extjs` formatter reports errors with status 200 and `success: 0`.
    fn check_success(mut self) -> Result<Self, Error> {
        if self.success != Some(false) {
            return Ok(self);
        }

        let status = self
            .status
            .and_then(|status| StatusCode::from_u16(status).ok())
            .unwrap_or(StatusCode::BAD_REQUEST);
        let message = self
            .message
            .take()
            .unwrap_or_else(|| "no message provided".to_string());

        Err(Error::Api {
            status,
            message,
            errors: std::mem::take(&mut self.errors),
        })
    }

    fn check(self) -> Result<ApiResponseData<T>, Error> {
        let this = self.check_success()?;

        // RawApiResponse has no data, but this also happens for Value::Null, and T
        // might be deserializeable from that, so try here again
        let data = match this.data {
            Some(data) => data,
            None => serde_json::from_value(Value::Null)
                .map_err(|_| Error::BadApi("api returned no data".to_string(), None))?,
        };

        Ok(ApiResponseData {
            data,
            attribs: this.attribs,
        })
    }
}

impl<C> HttpApiClient for &C
where
    C: HttpApiClient,
{
    type ResponseFuture<'a>
        = C::ResponseFuture<'a>
    where
        Self: 'a;

    fn request<'a>(
        &'a self,
        method: Method,
        path: &'a str,
        params: &'a ParameterSet,
    ) -> Self::ResponseFuture<'a> {
        C::request(self, method, path, params)
    }
}

impl<C> HttpApiClient for std::sync::Arc<C>
where
    C: HttpApiClient,
{
    type ResponseFuture<'a>
        = C::ResponseFuture<'a>
    where
        Self: 'a;

    fn request<'a>(
        &'a self,
        method: Method,
        path: &'a str,
        params: &'a ParameterSet,
    ) -> Self::ResponseFuture<'a> {
        C::request(self, method, path, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_response(status: u16, body: &str) -> HttpApiResponse {
        HttpApiResponse {
            status,
            reason: None,
            content_type: Some("application/json;charset=UTF-8".to_string()),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn data_envelope() {
        let response = json_response(200, r#"{"data":[{"vmid":100},{"vmid":101}],"total":2}"#);
        let data = response.expect_json::<Value>().unwrap();
        assert_eq!(data.data, serde_json::json!([{"vmid":100},{"vmid":101}]));
        assert_eq!(data.attribs["total"], 2);
    }

    #[test]
    fn null_data() {
        let response = json_response(200, r#"{"data":null}"#);
        assert!(response.clone().nodata().is_ok());
        let data = response.expect_json::<Option<String>>().unwrap();
        assert_eq!(data.data, None);

        let response = json_response(200, r#"{"data":null}"#);
        let err = response.expect_json::<Vec<String>>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);

        let response = json_response(200, r#"{"data":"UPID:pve1:0000:..."}"#);
        assert!(matches!(response.nodata(), Err(Error::UnexpectedData)));
    }

    #[test]
    fn rejection_with_parameter_errors() {
        let mut response = json_response(
            400,
            r#"{"data":null,"errors":{"memory":"value must have a minimum value of 16"}}"#,
        );
        response.reason = Some("Parameter verification failed.".to_string());

        match response.expect_json::<Value>() {
            Err(Error::Api {
                status,
                message,
                errors,
            }) => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "Parameter verification failed.");
                assert_eq!(errors["memory"], "value must have a minimum value of 16");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn rejection_without_json() {
        let response = HttpApiResponse {
            status: 403,
            reason: None,
            content_type: Some("text/plain".to_string()),
            body: b"Permission check failed".to_vec(),
        };
        let err = response.expect_json::<Value>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Rejected);
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
        assert!(err.to_string().contains("Permission check failed"));

        let response = HttpApiResponse {
            status: 501,
            reason: None,
            content_type: None,
            body: Vec::new(),
        };
        match response.nodata() {
            Err(Error::Api { message, .. }) => assert_eq!(message, "Not Implemented"),
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn extjs_failure() {
        let response = json_response(
            200,
            r#"{"success":0,"status":403,"message":"Permission check failed","data":null}"#,
        );
        let err = response.expect_json::<Value>().unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));

        let response = json_response(200, r#"{"success":1,"data":{"release":"8.2"}}"#);
        assert!(response.expect_json::<Value>().is_ok());
    }

    #[test]
    fn decode_failures() {
        let response = json_response(200, r#"{"data": [1, 2"#);
        let err = response.expect_json::<Value>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);

        let response = HttpApiResponse {
            status: 200,
            reason: None,
            content_type: Some("text/html".to_string()),
            body: b"<html></html>".to_vec(),
        };
        let err = response.expect_json::<Value>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.to_string(), "expected json body, got text/html");
    }
}
