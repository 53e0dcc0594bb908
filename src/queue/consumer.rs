//! Worker-pool consumer
//!
//! A [`Consumer`] owns an unbounded FIFO queue and a set of OS worker
//! threads. Items committed from any thread are handed, one at a time and in
//! queue order, to the bound hook set. Start and stop are serialized by a
//! lifecycle lock; the queue and the stopped/forced flags live behind a
//! separate data lock so commit traffic never waits on a lifecycle transition
//! beyond the flag flip.

use crate::core::sync::{handle_mutex_poison, handle_rwlock_read, handle_rwlock_write};
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::events::{ConsumerEvent, ConsumerEventType, EventSink, NoopEventSink};
use crate::queue::handler::{Binding, Callbacks, ConsumerHandler};
use crate::queue::worker;
use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread::{self, JoinHandle};

const DEFAULT_NAME: &str = "consumer";

type UserData = Arc<dyn Any + Send + Sync>;

/// Queue contents and stop flags, guarded by the data lock
pub(crate) struct State<T> {
    pub(crate) queue: VecDeque<T>,
    pub(crate) stopped: bool,
    pub(crate) forced: bool,
}

pub(crate) struct Shared<T> {
    pub(crate) name: String,
    pub(crate) state: Mutex<State<T>>,
    pub(crate) available: Condvar,
    pub(crate) binding: Binding<T>,
    sink: Arc<dyn EventSink>,
    user_data: RwLock<Option<UserData>>,
}

impl<T> Shared<T> {
    pub(crate) fn lock_state(&self) -> QueueResult<MutexGuard<'_, State<T>>> {
        handle_mutex_poison(self.state.lock(), |message| QueueError::Poisoned { message })
    }

    /// Deliver an event; a panicking sink is logged and otherwise ignored
    pub(crate) fn emit(&self, event_type: ConsumerEventType) {
        let event = ConsumerEvent::new(event_type, self.name.as_str());
        if panic::catch_unwind(AssertUnwindSafe(|| self.sink.emit(&event))).is_err() {
            log::error!("[{}] event sink panicked on {:?}", self.name, event.event_type);
        }
    }
}

/// Cloneable view of a consumer
///
/// Hooks receive a handle, and producers on other threads can hold one to
/// commit items. A handle cannot start or stop the consumer.
pub struct ConsumerHandle<T> {
    pub(crate) shared: Arc<Shared<T>>,
}

impl<T> Clone for ConsumerHandle<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> ConsumerHandle<T> {
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// True between a successful start and the beginning of the next stop
    pub fn has_started(&self) -> bool {
        self.shared
            .lock_state()
            .map(|state| !state.stopped)
            .unwrap_or(false)
    }

    /// Queue an item for consumption
    ///
    /// Fails with [`QueueError::NotRunning`] (dropping the item) unless the
    /// consumer is running. Never blocks beyond the data lock.
    pub fn commit(&self, item: T) -> QueueResult<()> {
        {
            let mut state = self.shared.lock_state()?;
            if state.stopped {
                return Err(QueueError::NotRunning);
            }
            state.queue.push_back(item);
        }
        self.shared.available.notify_one();
        Ok(())
    }

    /// Number of items waiting for a worker
    pub fn pending(&self) -> usize {
        self.shared
            .lock_state()
            .map(|state| state.queue.len())
            .unwrap_or(0)
    }

    /// Attach opaque user data, replacing any previous value
    pub fn set_user_data<U: Any + Send + Sync>(&self, data: U) -> QueueResult<()> {
        let mut slot = handle_rwlock_write(self.shared.user_data.write(), |message| {
            QueueError::Poisoned { message }
        })?;
        *slot = Some(Arc::new(data));
        Ok(())
    }

    pub fn clear_user_data(&self) -> QueueResult<()> {
        let mut slot = handle_rwlock_write(self.shared.user_data.write(), |message| {
            QueueError::Poisoned { message }
        })?;
        *slot = None;
        Ok(())
    }

    /// Attached user data, if present and of type `U`
    pub fn user_data<U: Any + Send + Sync>(&self) -> Option<Arc<U>> {
        let slot = handle_rwlock_read(self.shared.user_data.read(), |message| {
            QueueError::Poisoned { message }
        })
        .ok()?;
        slot.clone().and_then(|data| data.downcast::<U>().ok())
    }
}

impl<T> fmt::Debug for ConsumerHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerHandle")
            .field("name", &self.shared.name)
            .field("binding", &self.shared.binding)
            .finish()
    }
}

/// Builder for [`Consumer`]
pub struct ConsumerBuilder<T> {
    binding: Binding<T>,
    name: String,
    sink: Arc<dyn EventSink>,
    user_data: Option<UserData>,
}

impl<T: Send + 'static> ConsumerBuilder<T> {
    /// Name used for worker threads (`<name>-<index>`) and events
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn user_data<U: Any + Send + Sync>(mut self, data: U) -> Self {
        self.user_data = Some(Arc::new(data));
        self
    }

    pub fn build(self) -> Consumer<T> {
        let shared = Shared {
            name: self.name,
            state: Mutex::new(State {
                queue: VecDeque::new(),
                stopped: true,
                forced: false,
            }),
            available: Condvar::new(),
            binding: self.binding,
            sink: self.sink,
            user_data: RwLock::new(self.user_data),
        };
        Consumer {
            handle: ConsumerHandle {
                shared: Arc::new(shared),
            },
            workers: Mutex::new(Vec::new()),
        }
    }
}

/// Single-queue, multi-worker consumer
///
/// # Example
///
/// ```rust
/// use consumer_pool::queue::{Callbacks, Consumer};
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let consumer = Consumer::with_callbacks(Callbacks::new().on_consume(move |_, item: &String| {
///     sink.lock().unwrap().push(item.clone());
///     Ok(())
/// }));
///
/// consumer.start(1).unwrap();
/// for item in ["a", "b", "c"] {
///     consumer.commit(item.to_string()).unwrap();
/// }
/// consumer.stop(false).unwrap();
/// assert_eq!(*seen.lock().unwrap(), vec!["a", "b", "c"]);
/// ```
pub struct Consumer<T: Send + 'static> {
    handle: ConsumerHandle<T>,
    /// Lifecycle lock; non-empty exactly while running
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl<T: Send + 'static> Consumer<T> {
    pub fn builder(binding: impl Into<Binding<T>>) -> ConsumerBuilder<T> {
        ConsumerBuilder {
            binding: binding.into(),
            name: DEFAULT_NAME.to_string(),
            sink: Arc::new(NoopEventSink),
            user_data: None,
        }
    }

    pub fn new(binding: impl Into<Binding<T>>) -> Self {
        Self::builder(binding).build()
    }

    pub fn with_handler<H>(handler: Arc<H>) -> Self
    where
        H: ConsumerHandler<T> + 'static,
    {
        Self::new(handler)
    }

    pub fn with_callbacks(callbacks: Callbacks<T>) -> Self {
        Self::new(callbacks)
    }

    pub fn handle(&self) -> ConsumerHandle<T> {
        self.handle.clone()
    }

    pub fn name(&self) -> &str {
        self.handle.name()
    }

    pub fn has_started(&self) -> bool {
        self.handle.has_started()
    }

    pub fn commit(&self, item: T) -> QueueResult<()> {
        self.handle.commit(item)
    }

    pub fn pending(&self) -> usize {
        self.handle.pending()
    }

    pub fn set_user_data<U: Any + Send + Sync>(&self, data: U) -> QueueResult<()> {
        self.handle.set_user_data(data)
    }

    pub fn clear_user_data(&self) -> QueueResult<()> {
        self.handle.clear_user_data()
    }

    pub fn user_data<U: Any + Send + Sync>(&self) -> Option<Arc<U>> {
        self.handle.user_data()
    }

    /// Number of live worker threads
    pub fn worker_count(&self) -> usize {
        self.lock_workers().map(|workers| workers.len()).unwrap_or(0)
    }

    /// Start `workers` worker threads
    ///
    /// Returns `Ok` without doing anything if already running. Otherwise runs
    /// the start hook on this thread and, if it succeeds, spawns the workers.
    /// The instance stays stopped on every error.
    pub fn start(&self, workers: usize) -> QueueResult<()> {
        if workers == 0 {
            return Err(QueueError::ZeroWorkers);
        }

        let mut running = self.lock_workers()?;
        if !running.is_empty() {
            log::debug!("[{}] start ignored, already running", self.name());
            return Ok(());
        }

        let shared = &self.handle.shared;
        if !shared.binding.can_consume() {
            log::error!("[{}] cannot start without a consume hook", self.name());
            return Err(QueueError::MissingConsumeHook);
        }

        if let Err(source) = shared.binding.start(&self.handle) {
            log::warn!("[{}] start hook failed: {}", self.name(), source);
            return Err(QueueError::StartHookFailed { source });
        }

        let recommended = recommended_max_workers();
        if workers > recommended {
            log::warn!(
                "[{}] {} workers requested, more than the recommended {}",
                self.name(),
                workers,
                recommended
            );
        }

        {
            let mut state = shared.lock_state()?;
            state.stopped = false;
            state.forced = false;
        }

        for index in 0..workers {
            let handle = self.handle.clone();
            let spawned = thread::Builder::new()
                .name(format!("{}-{}", shared.name, index))
                .spawn(move || worker::run(handle, index));
            match spawned {
                Ok(join_handle) => running.push(join_handle),
                Err(source) => {
                    log::error!(
                        "[{}] failed to spawn worker {}: {}",
                        self.name(),
                        index,
                        source
                    );
                    self.shutdown(&mut running, true);
                    if let Err(e) = shared.binding.stop(&self.handle, true) {
                        log::warn!(
                            "[{}] stop hook failed after aborted start: {}",
                            self.name(),
                            e
                        );
                    }
                    return Err(QueueError::SpawnFailed { index, source });
                }
            }
        }

        shared.emit(ConsumerEventType::Started { workers });
        Ok(())
    }

    /// Stop the consumer
    ///
    /// With `forced == false` the workers drain everything already queued
    /// before exiting, so this may block for as long as the backlog takes.
    /// With `forced == true` workers exit as soon as they see the signal and
    /// the backlog is discarded. Returns `Ok` without doing anything if
    /// already stopped. The stop hook runs after every worker has joined; its
    /// failure is reported as [`QueueError::StopHookFailed`] but the consumer
    /// is stopped regardless.
    pub fn stop(&self, forced: bool) -> QueueResult<()> {
        let mut running = self.lock_workers()?;
        if running.is_empty() {
            return Ok(());
        }

        let discarded = self.shutdown(&mut running, forced);
        if discarded > 0 {
            log::debug!(
                "[{}] discarded {} pending item(s) on forced stop",
                self.name(),
                discarded
            );
        }
        self.handle
            .shared
            .emit(ConsumerEventType::Stopped { forced, discarded });

        match self.handle.shared.binding.stop(&self.handle, forced) {
            Ok(()) => {
                log::debug!("[{}] stopped (forced: {})", self.name(), forced);
                Ok(())
            }
            Err(source) => {
                log::warn!("[{}] stop hook failed: {}", self.name(), source);
                Err(QueueError::StopHookFailed { forced, source })
            }
        }
    }

    /// Signal, join and clear every worker; returns the discarded item count.
    ///
    /// Recovers a poisoned data lock: the flags and queue stay consistent
    /// under any panic, and the workers must be joined regardless.
    fn shutdown(&self, running: &mut Vec<JoinHandle<()>>, forced: bool) -> usize {
        let shared = &self.handle.shared;
        {
            let mut state = shared.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.stopped = true;
            state.forced = forced;
        }
        shared.available.notify_all();

        for worker in running.drain(..) {
            let thread_name = worker.thread().name().unwrap_or("<unnamed>").to_string();
            if worker.join().is_err() {
                log::error!("[{}] worker thread {} panicked", self.name(), thread_name);
            }
        }

        let mut state = shared.state.lock().unwrap_or_else(PoisonError::into_inner);
        let discarded = state.queue.len();
        state.queue.clear();
        discarded
    }

    fn lock_workers(&self) -> QueueResult<MutexGuard<'_, Vec<JoinHandle<()>>>> {
        handle_mutex_poison(self.workers.lock(), |message| QueueError::Poisoned { message })
    }
}

impl<T: Send + 'static> Drop for Consumer<T> {
    fn drop(&mut self) {
        if let Err(e) = self.stop(true) {
            log::debug!("[{}] implicit stop on drop: {}", self.name(), e);
        }
    }
}

impl<T: Send + 'static> fmt::Debug for Consumer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("name", &self.name())
            .field("running", &self.has_started())
            .field("pending", &self.pending())
            .finish()
    }
}

/// Upper bound on useful workers: twice the core count plus two
pub fn recommended_max_workers() -> usize {
    let cores = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    cores * 2 + 2
}
