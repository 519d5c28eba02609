//! Feedback surfaces for ordergate.
//!
//! Two ways of telling the visitor something:
//!
//! - [`ModalGate`]: a blocking overlay that takes focus until dismissed
//!   (the login dialog, the "not implemented yet" notice).
//! - [`ToastNotifier`]: a transient message that slides in and retracts
//!   on its own.
//!
//! # Key types
//!
//! - [`ModalGate`]: open/close with explicit focus hand-off
//! - [`ToastNotifier`]: show/hide with cancellable auto-dismiss
//! - [`ToastTimer`]: the two deferred steps of a toast's life
//! - [`ToastConfig`]: how long a toast stays up

mod config;
mod modal;
mod toast;

pub use config::{DEFAULT_TOAST_DURATION, ToastConfig};
pub use modal::ModalGate;
pub use toast::{
    EXIT_GRACE, ToastElements, ToastNotifier, ToastState, ToastTimer,
    VISIBLE_CLASS,
};
