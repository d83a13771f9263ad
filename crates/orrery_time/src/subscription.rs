//! Subscriber registry behind the time channel.
//!
//! Callbacks are held as `Rc` so a delivery pass can snapshot the list and
//! release the registry borrow before invoking anything; a callback is
//! therefore free to subscribe, unsubscribe, or read the authority while it
//! runs.

use std::any::Any;
use std::cell::RefCell;
use std::error::Error;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::{Rc, Weak};

use tracing::warn;

/// What a time callback reports back. An `Err` (or a panic) is logged and
/// counted but never stops delivery to the remaining subscribers.
pub type SubscriberResult = Result<(), Box<dyn Error>>;

pub(crate) type Callback = Rc<dyn Fn(f64) -> SubscriberResult>;

#[derive(Default)]
pub(crate) struct SubscriberRegistry {
    next_id: u64,
    entries: Vec<(u64, Callback)>,
}

impl SubscriberRegistry {
    pub(crate) fn insert(&mut self, callback: Callback) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    pub(crate) fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Registration-ordered copy of the current callbacks.
    fn snapshot(&self) -> Vec<(u64, Callback)> {
        self.entries.clone()
    }
}

/// Outcome of one notification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct DeliveryReport {
    pub delivered: usize,
    pub failed: usize,
    /// The pass ended early because a newer epoch was committed.
    pub superseded: bool,
}

/// Invoke a single callback, logging a failure. A panic is contained here
/// and counts as a failure.
pub(crate) fn invoke(id: u64, callback: &Callback, julian_date: f64) -> bool {
    match catch_unwind(AssertUnwindSafe(|| callback(julian_date))) {
        Ok(Ok(())) => true,
        Ok(Err(err)) => {
            warn!(subscriber = id, julian_date, error = %err, "time subscriber failed");
            false
        }
        Err(payload) => {
            warn!(
                subscriber = id,
                julian_date,
                panic = panic_message(payload.as_ref()),
                "time subscriber panicked"
            );
            false
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        *msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Deliver `julian_date` to every subscriber in registration order.
///
/// A subscriber removed mid-pass (by an earlier callback) is skipped. The
/// pass stops as soon as `superseded` reports a newer epoch.
pub(crate) fn deliver(
    registry: &RefCell<SubscriberRegistry>,
    julian_date: f64,
    superseded: impl Fn() -> bool,
) -> DeliveryReport {
    let snapshot = registry.borrow().snapshot();
    let mut report = DeliveryReport::default();
    for (id, callback) in &snapshot {
        if superseded() {
            report.superseded = true;
            break;
        }
        if !registry.borrow().contains(*id) {
            continue;
        }
        if invoke(*id, callback, julian_date) {
            report.delivered += 1;
        } else {
            report.failed += 1;
        }
    }
    report
}

/// Handle returned by [`crate::TimeAuthority::subscribe`].
///
/// Dropping the handle does not unsubscribe; call [`Subscription::unsubscribe`].
#[must_use = "keep the handle to be able to unsubscribe"]
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<SubscriberRegistry>>,
}

impl Subscription {
    pub(crate) fn new(id: u64, registry: &Rc<RefCell<SubscriberRegistry>>) -> Self {
        Self {
            id,
            registry: Rc::downgrade(registry),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Stop future deliveries. Returns `true` only on the call that actually
    /// removed the subscriber; repeated calls are no-ops.
    pub fn unsubscribe(&self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => registry.borrow_mut().remove(self.id),
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.borrow().contains(self.id))
    }
}
