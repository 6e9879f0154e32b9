use std::fmt;

use http::Method;

use crate::ParameterSet;

/// The verb aliases used by the generated API layer.
///
/// The mapping to HTTP methods is fixed:
///
/// | alias    | method   | parameters   |
/// |----------|----------|--------------|
/// | `Get`    | `GET`    | query string |
/// | `Create` | `POST`   | request body |
/// | `Set`    | `PUT`    | request body |
/// | `Delete` | `DELETE` | query string |
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Verb {
    Get,
    Create,
    Set,
    Delete,
}

impl Verb {
    pub fn method(self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Create => Method::POST,
            Verb::Set => Method::PUT,
            Verb::Delete => Method::DELETE,
        }
    }
}

impl From<Verb> for Method {
    fn from(verb: Verb) -> Method {
        verb.method()
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Verb::Get => "Get",
            Verb::Create => "Create",
            Verb::Set => "Set",
            Verb::Delete => "Delete",
        })
    }
}

/// Whether a request with this method carries its parameters in the body rather than in the
/// query string.
pub fn params_in_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT
}

/// A request's path and parameters, placed according to its method.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncodedRequest {
    /// The path including the query string, if any.
    pub path_and_query: String,

    /// The form encoded body, `None` if there is nothing to send.
    pub form_body: Option<String>,
}

impl EncodedRequest {
    pub fn new(method: &Method, path: &str, params: &ParameterSet) -> Self {
        if params.is_empty() {
            return Self {
                path_and_query: path.to_string(),
                form_body: None,
            };
        }

        if params_in_body(method) {
            Self {
                path_and_query: path.to_string(),
                form_body: Some(params.to_form_body()),
            }
        } else {
            Self {
                path_and_query: format!("{path}{}", params.to_query_string()),
                form_body: None,
            }
        }
    }
}
