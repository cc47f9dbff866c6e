//! Session state passed between carrier calls.
//!
//! A [`Session`] is an owned value: operations that change it return a new
//! one, so a failed call leaves the caller's session exactly as it was.

use std::fmt;

/// Bearer token issued by `/LoginUser`. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token(<redacted, {} chars>)", self.0.len())
    }
}

/// Waybill (AWB) barcode returned by `/Awbs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WaybillId(String);

impl WaybillId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the id can be used as a file stem without leaving the
    /// output directory: no separators, no `..`, not absolute.
    pub fn is_plain_file_stem(&self) -> bool {
        let id = self.0.as_str();
        !id.is_empty() && !id.contains("..") && !id.contains(['/', '\\', ':', '\0'])
    }

    /// File name the label for this waybill is saved under.
    pub fn label_file_name(&self) -> String {
        format!("{}.pdf", self.0)
    }
}

impl fmt::Display for WaybillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Unauthenticated,
    Authenticated {
        token: Token,
    },
    WaybillCreated {
        token: Token,
        waybill_id: WaybillId,
    },
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&Token> {
        match self {
            Self::Unauthenticated => None,
            Self::Authenticated { token } | Self::WaybillCreated { token, .. } => Some(token),
        }
    }

    pub fn waybill_id(&self) -> Option<&WaybillId> {
        match self {
            Self::WaybillCreated { waybill_id, .. } => Some(waybill_id),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Replace the token, keeping any waybill already created.
    pub fn with_token(&self, token: Token) -> Self {
        match self.waybill_id() {
            Some(waybill_id) => Self::WaybillCreated {
                token,
                waybill_id: waybill_id.clone(),
            },
            None => Self::Authenticated { token },
        }
    }

    /// Record a newly created waybill. `None` when there is no token, which
    /// cannot happen for a session that just created one.
    pub fn with_waybill(&self, waybill_id: WaybillId) -> Option<Self> {
        let token = self.token()?.clone();
        Some(Self::WaybillCreated { token, waybill_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert!(session.with_waybill(WaybillId::new("AWB1")).is_none());

        let session = session.with_token(Token::new("tok123"));
        assert_eq!(session.token().map(Token::as_str), Some("tok123"));
        assert!(session.waybill_id().is_none());

        let session = session.with_waybill(WaybillId::new("AWB1")).unwrap();
        assert_eq!(session.waybill_id().map(WaybillId::as_str), Some("AWB1"));

        // Re-login keeps the waybill
        let session = session.with_token(Token::new("tok456"));
        assert_eq!(session.token().map(Token::as_str), Some("tok456"));
        assert_eq!(session.waybill_id().map(WaybillId::as_str), Some("AWB1"));
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let session = Session::new().with_token(Token::new("secret-token"));
        let debug = format!("{:?}", session);
        assert!(!debug.contains("secret-token"), "token leaked: {}", debug);
        assert!(debug.contains("12 chars"));
    }

    #[test]
    fn test_label_file_name() {
        assert_eq!(WaybillId::new("AWB1").label_file_name(), "AWB1.pdf");
    }

    #[test]
    fn test_plain_file_stem() {
        assert!(WaybillId::new("AWB1").is_plain_file_stem());
        assert!(WaybillId::new("1074300411").is_plain_file_stem());

        for id in ["", "..", "../escaped", "a/b", "/tmp/x", "a\\b", "C:x", "x..y"] {
            assert!(!WaybillId::new(id).is_plain_file_stem(), "accepted {:?}", id);
        }
    }
}
