//! Session types: who the visitor is, and how the account button shows it.

use std::fmt;

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The authentication state for the current page lifetime.
///
/// ```text
///   Guest ──(login)──→ Authenticated { identity }
///     ↑                        │
///     └────────(logout)────────┘
/// ```
///
/// An identity exists only while authenticated, so a guest can never
/// carry a stale identity from an earlier login. The field is private:
/// the only way in is through [`guest`](Self::guest) and
/// [`authenticated`](Self::authenticated).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    identity: Option<String>,
}

impl Session {
    /// A signed-out session.
    pub const fn guest() -> Self {
        Self { identity: None }
    }

    /// A session signed in as `identity` (an email address in the demo).
    ///
    /// A blank identity can't be restored from storage, so it doesn't
    /// authenticate here either: the result is a guest.
    pub fn authenticated(identity: impl Into<String>) -> Self {
        let identity = identity.into();
        if identity.trim().is_empty() {
            return Self::guest();
        }
        Self {
            identity: Some(identity),
        }
    }

    /// Returns `true` when signed in.
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// The signed-in identity, or `None` for a guest.
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.identity {
            None => write!(f, "guest"),
            Some(identity) => write!(f, "{identity}"),
        }
    }
}

// ---------------------------------------------------------------------------
// AccountLabel
// ---------------------------------------------------------------------------

/// What the account button shows for a given session.
///
/// | Session        | text      | title (tooltip)                |
/// |----------------|-----------|--------------------------------|
/// | Guest          | `Log in`  | none                           |
/// | Authenticated  | `Account` | identity up to the first `@`   |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountLabel {
    /// Button text.
    pub text: &'static str,
    /// Tooltip; removed entirely for guests.
    pub title: Option<String>,
}

impl AccountLabel {
    /// Button text while signed out.
    pub const GUEST_TEXT: &'static str = "Log in";
    /// Button text while signed in.
    pub const ACCOUNT_TEXT: &'static str = "Account";

    /// Computes the label for `session`.
    pub fn for_session(session: &Session) -> Self {
        match session.identity() {
            None => Self {
                text: Self::GUEST_TEXT,
                title: None,
            },
            Some(identity) => Self {
                text: Self::ACCOUNT_TEXT,
                title: Some(short_identity(identity).to_owned()),
            },
        }
    }
}

/// The portion of an identity before the first `@`.
///
/// `"a@b.com"` → `"a"`. An identity without `@` is returned whole.
pub(crate) fn short_identity(identity: &str) -> &str {
    identity.split('@').next().unwrap_or(identity)
}
