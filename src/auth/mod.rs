//! Authenticated identity and capability checks
//!
//! The crate does not authenticate anyone: the embedding API layer hands each
//! operation an [`Identity`] (user id, role, owned service points) produced by
//! its own session machinery. Operations authorise themselves once, up front,
//! against the closed [`Capability`] set instead of comparing role strings
//! inline.

mod capability;
mod identity;

pub use capability::Capability;
pub use identity::{Identity, Role};
