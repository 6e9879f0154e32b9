use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt::{self, Display};

use http::StatusCode;

type BoxedError = Box<dyn StdError + Send + Sync + 'static>;

/// Coarse classification of an [`Error`].
///
/// Callers usually only need to know whether the remote could not be reached, refused the
/// request, or answered with something this client could not make sense of.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The request never got a response (connection, DNS, TLS, timeout).
    Transport,
    /// The remote answered with a non-success status.
    Rejected,
    /// The remote accepted the request but its response could not be decoded.
    Decode,
    /// The request could not be built or sent because of local state.
    Local,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Transport => "transport error",
            ErrorKind::Rejected => "request rejected",
            ErrorKind::Decode => "bad api response",
            ErrorKind::Local => "client error",
        })
    }
}

/// Errors produced by the request dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Tried to make an API call without a ticket or token set.
    #[error("not logged in")]
    Unauthorized,

    /// The underlying HTTP client failed (connection refused, DNS, TLS, protocol errors).
    #[error("http client error: {0}")]
    Client(#[source] BoxedError),

    /// The request did not complete within the configured time.
    #[error("request timed out")]
    Timeout,

    /// The API responded with an error status.
    #[error("api error (status = {status}): {message}")]
    Api {
        status: StatusCode,
        message: String,
        /// Per-parameter error messages, if the remote supplied them.
        errors: BTreeMap<String, String>,
    },

    /// The API returned something unexpected.
    #[error("{0}")]
    BadApi(String, #[source] Option<BoxedError>),

    /// The API call was expected to not return any data, but it did.
    #[error("api unexpectedly returned data")]
    UnexpectedData,

    /// A resource path template referenced an identifier that was not provided.
    #[error("missing value for path parameter '{0}'")]
    PathParameter(String),

    /// An internal error occurred while building or sending a request.
    #[error("{0}")]
    Internal(&'static str, #[source] BoxedError),

    /// Other errors.
    #[error("{0}")]
    Other(&'static str),
}

impl Error {
    pub(crate) fn internal<E>(context: &'static str, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Internal(context, Box::new(err))
    }

    pub(crate) fn client<E>(err: E) -> Self
    where
        E: Into<BoxedError>,
    {
        Self::Client(err.into())
    }

    /// A rejection without per-parameter details.
    pub fn api<T: Display>(status: StatusCode, msg: T) -> Self {
        Self::Api {
            status,
            message: msg.to_string(),
            errors: BTreeMap::new(),
        }
    }

    pub fn bad_api<T, E>(msg: T, err: E) -> Self
    where
        T: Display,
        E: StdError + Send + Sync + 'static,
    {
        Self::BadApi(msg.to_string(), Some(Box::new(err)))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Client(_) | Error::Timeout => ErrorKind::Transport,
            Error::Api { .. } => ErrorKind::Rejected,
            Error::BadApi(..) | Error::UnexpectedData => ErrorKind::Decode,
            Error::Unauthorized
            | Error::PathParameter(_)
            | Error::Internal(..)
            | Error::Other(_) => ErrorKind::Local,
        }
    }

    /// The HTTP status of a rejected request.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether repeating the very same request later might succeed.
    ///
    /// This client never retries on its own, this is purely informational for callers.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Client(_) | Error::Timeout => true,
            Error::Api { status, .. } => matches!(
                *status,
                StatusCode::REQUEST_TIMEOUT
                    | StatusCode::TOO_MANY_REQUESTS
                    | StatusCode::BAD_GATEWAY
                    | StatusCode::SERVICE_UNAVAILABLE
                    | StatusCode::GATEWAY_TIMEOUT
            ),
            _ => false,
        }
    }
}
