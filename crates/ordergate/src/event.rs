//! Page events: everything that can happen to the page from outside.

use ordergate_protocol::ElementId;

/// A key the page reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    /// Any other key, by its `KeyboardEvent.key` name.
    Other(String),
}

impl Key {
    /// Maps a `KeyboardEvent.key` value to a [`Key`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            other => Self::Other(other.to_string()),
        }
    }

    /// Enter and Space activate a focused control.
    pub fn is_activation(&self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// One input to the page loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// A click. `path` is the target followed by its ancestors, innermost
    /// first.
    Click {
        target: ElementId,
        path: Vec<ElementId>,
    },
    /// A key press on the focused element.
    KeyDown { target: ElementId, key: Key },
    /// A form submission carrying the identity field's value.
    Submit { form: ElementId, identity: String },
    /// A raw message posted from another browsing context.
    Message(Vec<u8>),
}

impl PageEvent {
    /// A click on `target` with no known ancestors.
    pub fn click(target: impl Into<ElementId>) -> Self {
        let target = target.into();
        Self::Click {
            path: vec![target.clone()],
            target,
        }
    }

    /// A click on `target` nested inside `ancestors` (innermost first).
    pub fn click_within<I, A>(target: impl Into<ElementId>, ancestors: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<ElementId>,
    {
        let target = target.into();
        let mut path = vec![target.clone()];
        path.extend(ancestors.into_iter().map(Into::into));
        Self::Click { target, path }
    }

    /// A key press.
    pub fn key(target: impl Into<ElementId>, key: Key) -> Self {
        Self::KeyDown {
            target: target.into(),
            key,
        }
    }

    /// A form submission.
    pub fn submit(form: impl Into<ElementId>, identity: impl Into<String>) -> Self {
        Self::Submit {
            form: form.into(),
            identity: identity.into(),
        }
    }

    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Click { .. } => "click",
            Self::KeyDown { .. } => "keydown",
            Self::Submit { .. } => "submit",
            Self::Message(_) => "message",
        }
    }
}
