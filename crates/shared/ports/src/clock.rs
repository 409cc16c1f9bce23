use coinvault_core::Timestamp;

/// Source of `last_updated` stamps and report times
///
/// Injected so reconciliation can be tested against a fixed instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    /// Label used in startup logs
    fn name(&self) -> &str {
        "Clock"
    }
}
