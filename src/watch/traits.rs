use async_trait::async_trait;

use crate::common::errors::Result;
use crate::common::types::Snapshot;

/// Predicate over a snapshot
///
/// The engine may call `check` any number of times and throw the answer
/// away, so implementations must be pure: no I/O, no logging of results,
/// no interior mutation that changes later answers.
///
/// A snapshot that lacks the data a condition needs is not an error; the
/// condition simply does not hold.
///
/// Closures `Fn(&Snapshot) -> bool` are conditions too, which keeps
/// one-off rules short:
///
/// ```ignore
/// factory.create(id, action, |s: &Snapshot| s.instrument("BTC_USD").is_some()).await;
/// ```
pub trait Condition: Send + Sync {
    fn check(&self, snapshot: &Snapshot) -> bool;
}

impl<F> Condition for F
where
    F: Fn(&Snapshot) -> bool + Send + Sync,
{
    fn check(&self, snapshot: &Snapshot) -> bool {
        self(snapshot)
    }
}

/// Side effect run once when a watch's condition holds
///
/// This is the only place a watch is allowed to do I/O. A failure is
/// reported by the engine but never retried, and the watch is retired
/// either way.
#[async_trait]
pub trait Action: Send + Sync {
    async fn perform(&self, snapshot: &Snapshot) -> Result<()>;
}

/// Boxed condition for dynamic dispatch
pub type BoxedCondition = Box<dyn Condition>;

/// Boxed action for dynamic dispatch
pub type BoxedAction = Box<dyn Action>;
