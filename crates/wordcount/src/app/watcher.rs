//! Observing selection changes on a page.

use std::time::Duration;

use tracing::{debug, trace};

use crate::app::platform::WatcherHost;
use crate::domain::model::{SelectionChange, SelectionSnapshot, Trigger};
use crate::infra::config::Config;

/// Delay before re-checking the selection after a pointer press.
pub const DEFAULT_RECHECK_DELAY: Duration = Duration::from_millis(20);

/// Start/stop capability of a selection observer.
pub trait Lifecycle {
    fn start(&mut self);

    fn stop(&mut self);

    fn is_listening(&self) -> bool;

    fn toggle(&mut self) {
        if self.is_listening() {
            self.stop();
        } else {
            self.start();
        }
    }
}

/// Watches a page for selection changes and emits a [`SelectionChange`] to the
/// host whenever the observed selection meaningfully differs from the last one.
///
/// Browsers offer no reliable "selection changed" event, so the watcher
/// re-evaluates on pointer, key and scroll activity and suppresses repeats by
/// snapshot equality.
#[derive(Debug)]
pub struct SelectionWatcher<H> {
    host: H,
    recheck_delay: Duration,
    is_listening: bool,
    last_snapshot: Option<SelectionSnapshot>,
}

impl<H: WatcherHost> SelectionWatcher<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            recheck_delay: DEFAULT_RECHECK_DELAY,
            is_listening: false,
            last_snapshot: None,
        }
    }

    /// Initialize from the layered application configuration.
    pub fn from_config(host: H, config: &Config) -> Self {
        Self::new(host).with_recheck_delay(config.watcher.recheck_delay())
    }

    pub fn with_recheck_delay(mut self, delay: Duration) -> Self {
        self.recheck_delay = delay;
        self
    }

    pub fn recheck_delay(&self) -> Duration {
        self.recheck_delay
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The snapshot most recently emitted while listening.
    pub fn last_snapshot(&self) -> Option<&SelectionSnapshot> {
        self.last_snapshot.as_ref()
    }

    /// Evaluate the selection in response to `trigger`.
    ///
    /// Does nothing while stopped. A deferred re-check that outlives `stop()`
    /// lands here and is discarded by that check.
    pub fn handle(&mut self, trigger: Trigger) {
        if !self.is_listening {
            trace!(%trigger, "ignoring trigger while stopped");
            return;
        }

        let current = SelectionSnapshot::capture(&self.host);
        match current {
            Some(snapshot) if !snapshot.is_equal(self.last_snapshot.as_ref()) => {
                debug!(
                    %trigger,
                    words = snapshot.word_count(),
                    characters = snapshot.character_count(),
                    "selection changed"
                );
                self.last_snapshot = Some(snapshot.clone());
                self.host.emit(SelectionChange::selected(snapshot));
            }
            None if self.last_snapshot.is_some() => {
                debug!(%trigger, "selection cleared");
                self.last_snapshot = None;
                self.host.emit(SelectionChange::cleared());
            }
            _ => trace!(%trigger, "selection unchanged"),
        }

        if trigger.schedules_recheck() {
            self.host.schedule(self.recheck_delay, Trigger::Recheck);
        }
    }
}

impl<H: WatcherHost> Lifecycle for SelectionWatcher<H> {
    fn start(&mut self) {
        if self.is_listening {
            return;
        }

        for trigger in Trigger::ALL {
            self.host.subscribe(trigger);
        }
        self.is_listening = true;
        debug!("selection watcher started");

        self.handle(Trigger::Recheck);
    }

    fn stop(&mut self) {
        if !self.is_listening {
            return;
        }

        self.host.emit(SelectionChange::cleared());
        self.last_snapshot = None;

        for trigger in Trigger::ALL {
            self.host.unsubscribe(trigger);
        }
        self.is_listening = false;
        debug!("selection watcher stopped");
    }

    fn is_listening(&self) -> bool {
        self.is_listening
    }
}
