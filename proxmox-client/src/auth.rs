use std::fmt;
use std::str::FromStr;

/// The header name for the CSRF prevention token.
pub const CSRF_HEADER_NAME: &str = "CSRFPreventionToken";

/// How the client is logged in to the remote.
pub enum AuthenticationKind {
    /// With an API Ticket.
    Ticket(Ticket),

    /// With a token.
    Token(Token),
}

impl AuthenticationKind {
    pub fn set_auth_headers(&self, request: http::request::Builder) -> http::request::Builder {
        match self {
            AuthenticationKind::Ticket(auth) => auth.set_auth_headers(request),
            AuthenticationKind::Token(auth) => auth.set_auth_headers(request),
        }
    }

    pub fn userid(&self) -> &str {
        match self {
            AuthenticationKind::Ticket(auth) => &auth.userid,
            AuthenticationKind::Token(auth) => &auth.userid,
        }
    }
}

impl From<Ticket> for AuthenticationKind {
    fn from(auth: Ticket) -> Self {
        Self::Ticket(auth)
    }
}

impl From<Token> for AuthenticationKind {
    fn from(auth: Token) -> Self {
        Self::Token(auth)
    }
}

/// A ticket obtained elsewhere, e.g. from a previous `/access/ticket` call.
///
/// Acquiring and renewing tickets is not handled by this crate.
#[derive(Clone)]
pub struct Ticket {
    /// The user the ticket belongs to.
    pub userid: String,

    /// The ticket data as returned by the API.
    pub ticket: String,

    /// The CSRF prevention token returned along with the ticket.
    pub csrf_token: String,
}

impl Ticket {
    /// Get the cookie in the form `PVEAuthCookie=<ticket>`.
    pub fn cookie(&self) -> String {
        format!("PVEAuthCookie={}", self.ticket)
    }

    pub fn set_auth_headers(&self, request: http::request::Builder) -> http::request::Builder {
        request
            .header(http::header::COOKIE, self.cookie())
            .header(CSRF_HEADER_NAME, &self.csrf_token)
    }
}

impl fmt::Debug for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Ticket")
            .field("userid", &self.userid)
            .finish_non_exhaustive()
    }
}

/// Data used to log in with a token.
#[derive(Clone)]
pub struct Token {
    /// The userid including the token name (`user@realm!name`).
    pub userid: String,

    /// The api token's value.
    pub value: String,
}

impl Token {
    /// A Proxmox VE API token.
    pub fn pve(userid: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            userid: userid.into(),
            value: value.into(),
        }
    }

    /// The `Authorization` header value, `PVEAPIToken=user@realm!name=secret`.
    pub fn header_value(&self) -> String {
        format!("PVEAPIToken={}={}", self.userid, self.value)
    }

    pub fn set_auth_headers(&self, request: http::request::Builder) -> http::request::Builder {
        request.header(http::header::AUTHORIZATION, self.header_value())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Token")
            .field("userid", &self.userid)
            .finish_non_exhaustive()
    }
}

/// Failed to parse a token in the `user@realm!name=secret` form.
#[derive(Clone, Copy, Debug, thiserror::Error)]
#[error("invalid api token, expected 'user@realm!name=secret'")]
pub struct InvalidToken;

impl FromStr for Token {
    type Err = InvalidToken;

    /// Parse a PVE API token. A leading `PVEAPIToken=` is accepted and ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix("PVEAPIToken=").unwrap_or(s);

        let (userid, value) = s.split_once('=').ok_or(InvalidToken)?;
        let (user, name) = userid.split_once('!').ok_or(InvalidToken)?;
        if value.is_empty() || name.is_empty() || !user.contains('@') {
            return Err(InvalidToken);
        }

        Ok(Self::pve(userid, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_header() {
        let token: Token = "root@pam!automation=1fa0c2f4-0a7b-4e2d-9c7e-3f5b6a2d9e10"
            .parse()
            .unwrap();
        assert_eq!(token.userid, "root@pam!automation");
        assert_eq!(
            token.header_value(),
            "PVEAPIToken=root@pam!automation=1fa0c2f4-0a7b-4e2d-9c7e-3f5b6a2d9e10"
        );

        let token: Token = "PVEAPIToken=api@pve!ro=secret".parse().unwrap();
        assert_eq!(token.userid, "api@pve!ro");
        assert_eq!(token.value, "secret");
        assert_eq!(token.header_value(), "PVEAPIToken=api@pve!ro=secret");
        assert!(!format!("{token:?}").contains("secret"));
    }

    #[test]
    fn invalid_tokens() {
        assert!("root@pam=secret".parse::<Token>().is_err());
        assert!("root@pam!name".parse::<Token>().is_err());
        assert!("root@pam!name=".parse::<Token>().is_err());
        assert!("root!name=secret".parse::<Token>().is_err());
    }

    #[test]
    fn ticket_headers() {
        let ticket = Ticket {
            userid: "root@pam".to_string(),
            ticket: "PVE:root@pam:66F0A1B2::c2lnbmF0dXJl".to_string(),
            csrf_token: "66F0A1B2:Y3NyZg".to_string(),
        };

        let request = ticket
            .set_auth_headers(http::Request::builder().uri("/api2/json/version"))
            .body(())
            .unwrap();

        assert_eq!(
            request.headers()[http::header::COOKIE],
            "PVEAuthCookie=PVE:root@pam:66F0A1B2::c2lnbmF0dXJl"
        );
        assert_eq!(request.headers()[CSRF_HEADER_NAME], "66F0A1B2:Y3NyZg");
        assert!(!format!("{ticket:?}").contains("c2lnbmF0dXJl"));
    }
}
