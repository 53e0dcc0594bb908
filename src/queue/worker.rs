//! Worker loop run by every consumer thread

use crate::core::sync::handle_mutex_poison;
use crate::queue::consumer::ConsumerHandle;
use crate::queue::error::QueueError;
use crate::queue::events::{ConsumerEventType, WorkerExit};
use crate::queue::handler::panic_message;
use std::panic::{self, AssertUnwindSafe};

/// Consume items until a stop is observed.
///
/// Exits once stopped and either forced or the queue is empty, so a graceful
/// stop drains the backlog while a forced stop leaves it behind.
pub(crate) fn run<T: Send + 'static>(consumer: ConsumerHandle<T>, index: usize) {
    let shared = &consumer.shared;
    shared.emit(ConsumerEventType::WorkerStarted { worker: index });

    let reason = loop {
        let item = {
            let guard = match shared.lock_state() {
                Ok(guard) => guard,
                Err(e) => {
                    log::error!("[{}] worker {}: {}", shared.name, index, e);
                    break WorkerExit::Poisoned;
                }
            };
            let waited = shared
                .available
                .wait_while(guard, |state| !state.stopped && state.queue.is_empty());
            let mut state = match handle_mutex_poison(waited, |message| QueueError::Poisoned {
                message,
            }) {
                Ok(state) => state,
                Err(e) => {
                    log::error!("[{}] worker {}: {}", shared.name, index, e);
                    break WorkerExit::Poisoned;
                }
            };

            if state.stopped && (state.forced || state.queue.is_empty()) {
                if state.forced && !state.queue.is_empty() {
                    break WorkerExit::Forced;
                }
                break WorkerExit::Drained;
            }

            match state.queue.pop_front() {
                Some(item) => item,
                None => continue,
            }
        };

        let ok = consume(&consumer, index, &item);
        shared.emit(ConsumerEventType::Consumed { worker: index, ok });
    };

    shared.emit(ConsumerEventType::WorkerExited {
        worker: index,
        reason,
    });
}

/// Run the consume hook; a panic counts as a failed consume.
fn consume<T>(consumer: &ConsumerHandle<T>, index: usize, item: &T) -> bool {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        consumer.shared.binding.consume(consumer, item)
    }));
    match outcome {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            log::warn!(
                "[{}] worker {} failed to consume an item: {}",
                consumer.name(),
                index,
                e
            );
            false
        }
        Err(payload) => {
            log::error!(
                "[{}] worker {} consume hook panicked: {}",
                consumer.name(),
                index,
                panic_message(payload.as_ref())
            );
            false
        }
    }
}
