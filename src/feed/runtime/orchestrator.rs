use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::feed::api::{ApiResponse, FeedApi, PushSource};
use crate::feed::engine::types::{EngineCommand, EngineEvent, FeedView};
use crate::feed::engine::FeedEngine;

/// Runtime tuning for a feed view.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Fixed interval for the full-snapshot staleness backstop.
    pub refresh_interval: Duration,
    /// Idle sleep between polls when nothing is pending.
    pub idle_sleep: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(30),
            idle_sleep: Duration::from_millis(5),
        }
    }
}

/// Deactivation handle, usable from outside the run loop.
#[derive(Clone)]
pub struct FeedHandle {
    stop: Arc<AtomicBool>,
}

impl FeedHandle {
    pub fn deactivate(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        !self.stop.load(Ordering::SeqCst)
    }
}

pub type SubscriptionId = u64;

type Subscriber = Box<dyn FnMut(&FeedView) + Send>;

/// **FeedOrchestrator**
///
/// This component acts as the **Imperative Shell** around the reconciliation
/// engine. It has three main responsibilities:
/// 1. **Poll the IO seams** (push source, data API facade, refresh timer).
/// 2. **Drive the Logic Core** (`FeedEngine`) by feeding it events.
/// 3. **Execute Side Effects** (fetches) emitted by the engine and notify
///    subscribers once per state transition.
///
/// It runs on one thread and never blocks on the network; both IO seams are
/// non-blocking poll surfaces backed by background tasks.
pub struct FeedOrchestrator<A, P> {
    /// The functional core that makes decisions.
    engine: FeedEngine,

    /// Data API facade (snapshot, catalog, targeted refresh).
    api: A,

    /// Exclusively-owned push connection for this feed view.
    push: P,

    config: FeedConfig,

    /// Observers invoked once per state transition.
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: SubscriptionId,
    notified_revision: u64,

    stop: Arc<AtomicBool>,

    /// Start time for logging relative timestamps.
    t0: Instant,
}

impl<A, P> FeedOrchestrator<A, P>
where
    A: FeedApi,
    P: PushSource,
{
    pub fn new(api: A, push: P, config: FeedConfig) -> Self {
        Self {
            engine: FeedEngine::new(),
            api,
            push,
            config,
            subscribers: Vec::new(),
            next_subscription: 0,
            notified_revision: 0,
            stop: Arc::new(AtomicBool::new(false)),
            t0: Instant::now(),
        }
    }

    /// Handle for deactivating the feed view from another thread.
    pub fn handle(&self) -> FeedHandle {
        FeedHandle {
            stop: self.stop.clone(),
        }
    }

    /// Registers an observer invoked once per state transition.
    ///
    /// Callers are responsible for unsubscribing on teardown.
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&FeedView) + Send + 'static,
    {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    /// Current presentation-facing view.
    pub fn view(&self) -> FeedView {
        self.engine.view()
    }

    /// Activates the engine and services the feed until deactivated.
    ///
    /// Deactivation closes the push channel and cancels the refresh timer;
    /// in-flight fetches are not cancelled, but the engine discards their
    /// late results.
    pub fn run(mut self) {
        self.info("activating feed view");
        self.process_engine(EngineEvent::Activated);
        let mut last_refresh = Instant::now();

        loop {
            if self.stop.load(Ordering::SeqCst) {
                break;
            }

            let mut progressed = false;

            if let Some(event) = self.push.poll_event() {
                self.trace(&format!("push event: {event:?}"));
                self.process_engine(EngineEvent::Push(event));
                progressed = true;
            }

            if let Some(response) = self.api.poll_response() {
                self.process_engine(Self::response_event(response));
                progressed = true;
            }

            if last_refresh.elapsed() >= self.config.refresh_interval {
                last_refresh = Instant::now();
                self.process_engine(EngineEvent::RefreshDue);
                progressed = true;
            }

            if !progressed {
                // Avoid busy-waiting between polls.
                std::thread::sleep(self.config.idle_sleep);
            }
        }

        self.info("deactivating feed view");
        self.process_engine(EngineEvent::Deactivated);
        self.push.close();
    }

    /// Feeds an event into the engine, executes all resulting commands, and
    /// notifies subscribers if the view changed.
    pub fn process_engine(&mut self, event: EngineEvent) {
        self.trace(&format!("engine.handle_event({event:?})"));

        // PURE LOGIC STEP: the engine decides what to do.
        let cmds = self.engine.handle_event(event);

        // SIDE EFFECT STEP: the shell executes the commands.
        for cmd in cmds {
            self.execute_command(cmd);
        }

        self.notify_if_changed();
    }

    fn response_event(response: ApiResponse) -> EngineEvent {
        match response {
            ApiResponse::Snapshot(Ok(posts)) => EngineEvent::SnapshotLoaded(posts),
            ApiResponse::Snapshot(Err(error)) => EngineEvent::SnapshotFailed(error),
            ApiResponse::Hobbies(Ok(hobbies)) => EngineEvent::HobbiesLoaded(hobbies),
            ApiResponse::Hobbies(Err(error)) => EngineEvent::HobbiesFailed(error),
            ApiResponse::Post {
                result: Ok(post), ..
            } => EngineEvent::PostRefreshed(post),
            ApiResponse::Post {
                id,
                result: Err(error),
            } => EngineEvent::PostRefreshFailed { id, error },
        }
    }

    fn execute_command(&mut self, cmd: EngineCommand) {
        self.trace(&format!("{:>8}us cmd: {:?}", self.t0.elapsed().as_micros(), cmd));
        match cmd {
            EngineCommand::FetchSnapshot => self.api.request_snapshot(),
            EngineCommand::FetchHobbies => self.api.request_hobbies(),
            EngineCommand::FetchPost(id) => self.api.request_post(id),
        }
    }

    fn notify_if_changed(&mut self) {
        let revision = self.engine.revision();
        if revision == self.notified_revision {
            return;
        }
        self.notified_revision = revision;

        let view = self.engine.view();
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&view);
        }
    }

    /// Drains all pending events from both seams. STRICTLY FOR TESTING.
    #[cfg(test)]
    pub fn run_until_idle(&mut self) {
        let mut sanity = 0;
        loop {
            let mut progressed = false;

            if let Some(event) = self.push.poll_event() {
                self.process_engine(EngineEvent::Push(event));
                progressed = true;
            }
            if let Some(response) = self.api.poll_response() {
                self.process_engine(Self::response_event(response));
                progressed = true;
            }

            if !progressed {
                break;
            }
            sanity += 1;
            if sanity > 100 {
                log::warn!("[DRIVER] run_until_idle exceeded 100 iterations, breaking");
                break;
            }
        }
    }

    fn info(&self, msg: &str) {
        log::info!("[DRIVER] {:>8}us: {}", self.t0.elapsed().as_micros(), msg);
    }

    fn trace(&self, msg: &str) {
        log::trace!("[DRIVER] {:>8}us: {}", self.t0.elapsed().as_micros(), msg);
    }
}

// Helper methods for testing interaction
#[cfg(test)]
impl<A, P> FeedOrchestrator<A, P> {
    pub fn api_ref(&self) -> &A {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut A {
        &mut self.api
    }

    pub fn push_mut(&mut self) -> &mut P {
        &mut self.push
    }
}
