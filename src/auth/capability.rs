//! The closed set of capabilities an operation may demand

/// Everything an operation is allowed to ask about an identity
///
/// Kept deliberately small: a role maps onto a subset of these once, and
/// every operation performs exactly one `require` call at its entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Join a queue at an active service point
    Join,
    /// Create, close and purge self-owned service points
    ManageOwnServicePoints,
    /// Call the next waiting customer at a self-owned service point
    CallNextOwn,
    /// Dismiss a called customer at a self-owned service point
    DismissOwn,
    /// Read the entry history summary for self-owned service points
    ViewOwnAnalytics,
}
