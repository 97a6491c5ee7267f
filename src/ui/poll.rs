use std::rc::Rc;

use fltk::app;

use crate::app::services::observer::ThemeObserver;

/// Drives `ThemeObserver::tick` from the FLTK event loop.
///
/// The timeout only holds a weak reference; once the observer is gone the
/// timer stops rescheduling itself. Dropping the `PollTimer` removes it.
pub struct PollTimer {
    handle: app::TimeoutHandle,
}

impl PollTimer {
    pub fn start(observer: &Rc<ThemeObserver>) -> Self {
        let interval = observer.interval().as_secs_f64();
        let weak = Rc::downgrade(observer);
        let handle = app::add_timeout3(interval, move |handle| {
            if let Some(observer) = weak.upgrade() {
                observer.tick();
                app::repeat_timeout3(interval, handle);
            }
        });
        tracing::debug!(interval_secs = interval, "appearance polling started");
        Self { handle }
    }

    pub fn is_running(&self) -> bool {
        app::has_timeout3(self.handle)
    }

    pub fn stop(self) {}
}

impl Drop for PollTimer {
    fn drop(&mut self) {
        if app::has_timeout3(self.handle) {
            app::remove_timeout3(self.handle);
            tracing::debug!("appearance polling stopped");
        }
    }
}
