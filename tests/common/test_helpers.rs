//! Handlers and polling helpers shared by the integration tests

use consumer_pool::queue::api::{ConsumerHandle, ConsumerHandler, HookResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

/// Records every consumed item and counts hook calls
#[derive(Default)]
pub struct Collector {
    pub items: Mutex<Vec<String>>,
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    pub delay: Option<Duration>,
}

impl Collector {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn items(&self) -> Vec<String> {
        self.items.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }
}

impl ConsumerHandler<String> for Collector {
    fn on_start(&self, _consumer: &ConsumerHandle<String>) -> HookResult {
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn on_consume(&self, _consumer: &ConsumerHandle<String>, item: &String) -> HookResult {
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        self.items.lock().unwrap().push(item.clone());
        Ok(())
    }

    fn on_stop(&self, _consumer: &ConsumerHandle<String>, _forced: bool) -> HookResult {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Poll `condition` until it holds or `timeout` elapses
pub fn wait_until(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}
