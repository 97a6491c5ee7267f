//! Polling observer for the OS light/dark preference.
//!
//! There is no push channel for appearance changes on most desktops, so the
//! observer samples an [`AppearanceSource`] on a coarse timer and publishes a
//! `color_scheme_changed(is_dark)` notification when its [`EdgeRule`] fires.
//! The timer itself belongs to the UI toolkit (see `ui::poll`); everything
//! here runs on the UI thread.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::infrastructure::platform::{AppearanceSource, SystemAppearance};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// How a fresh sample is compared against the last published value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EdgeRule {
    /// Fires when the sample *equals* the last published value and then
    /// publishes its negation. Correct only for sources that report the
    /// inverse (light) flag, like the raw `AppsUseLightTheme` registry value.
    ToggleOnMatch,
    /// Fires when the sample differs from the last published value and
    /// publishes the sample.
    #[default]
    OnChange,
}

impl EdgeRule {
    /// The value to publish when `sample` is an edge, `None` otherwise.
    pub fn evaluate(self, sample: bool, last_published: bool) -> Option<bool> {
        match self {
            Self::ToggleOnMatch => (sample == last_published).then_some(!sample),
            Self::OnChange => (sample != last_published).then_some(sample),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(bool)>;

pub struct ThemeObserver {
    source: Box<dyn AppearanceSource>,
    edge_rule: Cell<EdgeRule>,
    interval: Duration,
    last_published: Cell<bool>,
    last_known: Cell<bool>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
    /// Ids taken out of `subscribers` while a notification is in flight.
    dispatching: RefCell<Vec<SubscriptionId>>,
    removed: RefCell<Vec<SubscriptionId>>,
    notifying: Cell<bool>,
    /// Values published from inside a callback, delivered in order once the
    /// running round ends.
    pending: RefCell<VecDeque<bool>>,
    next_id: Cell<u64>,
}

impl ThemeObserver {
    pub fn new(source: Box<dyn AppearanceSource>) -> Self {
        Self {
            source,
            edge_rule: Cell::new(EdgeRule::default()),
            interval: DEFAULT_POLL_INTERVAL,
            last_published: Cell::new(false),
            last_known: Cell::new(false),
            subscribers: RefCell::new(Vec::new()),
            dispatching: RefCell::new(Vec::new()),
            removed: RefCell::new(Vec::new()),
            notifying: Cell::new(false),
            pending: RefCell::new(VecDeque::new()),
            next_id: Cell::new(0),
        }
    }

    /// Observer backed by the running desktop's appearance setting.
    pub fn system() -> Self {
        Self::new(Box::new(SystemAppearance::new()))
    }

    pub fn with_edge_rule(self, rule: EdgeRule) -> Self {
        self.edge_rule.set(rule);
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn edge_rule(&self) -> EdgeRule {
        self.edge_rule.get()
    }

    pub fn set_edge_rule(&self, rule: EdgeRule) {
        self.edge_rule.set(rule);
    }

    /// False when `ToggleOnMatch` is paired with a source reporting the dark
    /// flag; that pairing publishes inverted values.
    pub fn edge_rule_fits_source(&self) -> bool {
        match self.edge_rule.get() {
            EdgeRule::ToggleOnMatch => self.source.reports_light_flag(),
            EdgeRule::OnChange => !self.source.reports_light_flag(),
        }
    }

    /// Last value announced to subscribers, valid as of the last tick.
    pub fn is_dark(&self) -> bool {
        self.last_published.get()
    }

    /// Read the OS flag now. Falls back to the last successful sample
    /// (initially light) when the platform cannot be queried.
    pub fn sample(&self) -> bool {
        match self.source.is_dark() {
            Ok(is_dark) => {
                self.last_known.set(is_dark);
                is_dark
            }
            Err(e) => {
                tracing::trace!("appearance query failed, keeping last known value: {}", e);
                self.last_known.get()
            }
        }
    }

    /// One timer step. Returns the published value when subscribers were
    /// notified.
    pub fn tick(&self) -> Option<bool> {
        let sample = self.sample();
        let published = self
            .edge_rule
            .get()
            .evaluate(sample, self.last_published.get())?;

        self.last_published.set(published);
        tracing::debug!(is_dark = published, "system color scheme changed");
        self.notify(published);
        Some(published)
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: FnMut(bool) + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscribers.borrow_mut().push((id, Box::new(callback)));
        id
    }

    /// Returns false when `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        if let Some(pos) = subscribers.iter().position(|(sid, _)| *sid == id) {
            subscribers.remove(pos);
            return true;
        }
        drop(subscribers);

        let in_flight = self.dispatching.borrow().contains(&id);
        let mut removed = self.removed.borrow_mut();
        if in_flight && !removed.contains(&id) {
            removed.push(id);
            return true;
        }
        false
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len() + self.dispatching.borrow().len()
            - self.removed.borrow().len()
    }

    /// Deliver `is_dark` to every subscriber, synchronously and in
    /// subscription order. Callbacks may subscribe or unsubscribe.
    ///
    /// A notification raised from inside a callback (directly or through
    /// `tick`) is queued and delivered after the current round completes.
    pub fn notify(&self, is_dark: bool) {
        if self.notifying.get() {
            self.pending.borrow_mut().push_back(is_dark);
            return;
        }

        self.notifying.set(true);
        let mut next = Some(is_dark);
        while let Some(value) = next {
            self.dispatch(value);
            next = self.pending.borrow_mut().pop_front();
        }
        self.notifying.set(false);
    }

    fn dispatch(&self, is_dark: bool) {
        let mut active = std::mem::take(&mut *self.subscribers.borrow_mut());
        *self.dispatching.borrow_mut() = active.iter().map(|(id, _)| *id).collect();

        for (id, callback) in active.iter_mut() {
            if self.removed.borrow().contains(id) {
                continue;
            }
            callback(is_dark);
        }

        self.dispatching.borrow_mut().clear();
        let removed = std::mem::take(&mut *self.removed.borrow_mut());
        let mut subscribers = self.subscribers.borrow_mut();
        active.append(&mut subscribers);
        active.retain(|(id, _)| !removed.contains(id));
        *subscribers = active;
    }
}
