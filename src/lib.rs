//! Queue management core for walk-in service points
//!
//! Models the queues at bank counters, government service desks and hospital
//! reception points: visitors join a service point's queue, staff call and
//! dismiss them, and every transition keeps positions dense and fans out
//! notifications. The crate is the embeddable core; transports (HTTP,
//! websockets, SMTP) plug in at the seams in [`notifications`].
//!
//! Entry points for embedders are the global services in [`core::services`].

pub mod auth;
pub mod core;
pub mod notifications;
pub mod queue;
pub mod registry;
pub mod store;
