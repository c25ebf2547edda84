//! Service Point Registry
//!
//! Owns service point lifecycle (active/inactive) and which staff member may
//! act on which queue. Deactivation is the only mutation that cascades into
//! the queue state machine, and that cascade is driven by
//! [`QueueEngine::close_point`](crate::queue::QueueEngine::close_point) so the
//! registry itself never touches entries.

mod point;
#[allow(clippy::module_inception)]
mod registry;

pub mod api;

pub use point::{PointConfig, ServicePoint};
pub use registry::ServicePointRegistry;
