//! Transport, request state machine and convenience verbs.

pub(crate) mod core;
pub(crate) mod execute;
pub(crate) mod form;
pub(crate) mod transport;
pub(crate) mod verbs;
