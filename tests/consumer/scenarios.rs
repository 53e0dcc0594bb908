//! Lifecycle scenarios through the public queue API

use crate::common::test_helpers::{wait_until, Collector};
use consumer_pool::queue::api::{
    Callbacks, Consumer, ConsumerEvent, ConsumerEventType, EventSink, HookError, QueueError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Default)]
struct Events(Mutex<Vec<ConsumerEventType>>);

impl EventSink for Events {
    fn emit(&self, event: &ConsumerEvent) {
        self.0.lock().unwrap().push(event.event_type.clone());
    }
}

#[test]
fn test_single_worker_preserves_commit_order() {
    let collector = Arc::new(Collector::default());
    let consumer = Consumer::with_handler(collector.clone());

    consumer.start(1).unwrap();
    for item in ["a", "b", "c"] {
        consumer.commit(item.to_string()).unwrap();
    }
    consumer.stop(false).unwrap();

    assert_eq!(collector.items(), vec!["a", "b", "c"]);
    assert_eq!(collector.starts.load(Ordering::SeqCst), 1);
    assert_eq!(collector.stops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_zero_workers_leaves_consumer_stopped() {
    let collector = Arc::new(Collector::default());
    let consumer = Consumer::with_handler(collector.clone());

    assert!(matches!(consumer.start(0), Err(QueueError::ZeroWorkers)));
    assert!(!consumer.has_started());
    assert_eq!(collector.starts.load(Ordering::SeqCst), 0);
    assert!(matches!(
        consumer.commit("x".to_string()),
        Err(QueueError::NotRunning)
    ));
}

#[test]
fn test_forced_stop_abandons_backlog() {
    let collector = Arc::new(Collector::with_delay(Duration::from_millis(100)));
    let consumer = Consumer::with_handler(collector.clone());

    consumer.start(1).unwrap();
    for n in 0..100 {
        consumer.commit(format!("item {}", n)).unwrap();
    }

    let started = Instant::now();
    consumer.stop(true).unwrap();

    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(collector.len() < 10, "consumed {}", collector.len());
    assert_eq!(consumer.pending(), 0);
    assert_eq!(collector.stops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_commit_after_stop_rejected() {
    let collector = Arc::new(Collector::default());
    let consumer = Consumer::with_handler(collector.clone());

    consumer.start(2).unwrap();
    consumer.stop(false).unwrap();

    assert!(matches!(
        consumer.commit("late".to_string()),
        Err(QueueError::NotRunning)
    ));
    assert!(collector.items().is_empty());
}

#[test]
fn test_concurrent_starts_run_start_hook_once() {
    let collector = Arc::new(Collector::default());
    let consumer = Arc::new(Consumer::with_handler(collector.clone()));
    let barrier = Arc::new(Barrier::new(4));

    let callers: Vec<_> = (1..=4)
        .map(|workers| {
            let consumer = consumer.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                consumer.start(workers)
            })
        })
        .collect();
    for caller in callers {
        caller.join().unwrap().unwrap();
    }

    assert!(consumer.has_started());
    assert_eq!(collector.starts.load(Ordering::SeqCst), 1);
    assert!((1..=4).contains(&consumer.worker_count()));

    consumer.stop(false).unwrap();
    assert_eq!(consumer.worker_count(), 0);
}

#[test]
fn test_callbacks_binding_with_multiple_workers() {
    let consumed = Arc::new(AtomicUsize::new(0));
    let counter = consumed.clone();
    let callbacks = Callbacks::new().on_consume(move |_consumer, _item: &u64| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    let consumer = Consumer::with_callbacks(callbacks);

    consumer.start(4).unwrap();
    for n in 0..1000u64 {
        consumer.commit(n).unwrap();
    }
    consumer.stop(false).unwrap();

    assert_eq!(consumed.load(Ordering::SeqCst), 1000);
}

#[test]
fn test_start_hook_failure_reported() {
    let callbacks = Callbacks::new()
        .on_start(|_consumer| Err(HookError::new("resource unavailable")))
        .on_consume(|_consumer, _item: &String| Ok(()));
    let consumer = Consumer::with_callbacks(callbacks);

    match consumer.start(1) {
        Err(QueueError::StartHookFailed { source }) => {
            assert_eq!(source.message(), "resource unavailable");
        }
        other => panic!("expected start hook failure, got {:?}", other),
    }
    assert!(!consumer.has_started());
}

#[test]
fn test_builder_name_and_events() {
    let events = Arc::new(Events::default());
    let collector = Arc::new(Collector::default());
    let consumer = Consumer::builder(collector.clone())
        .name("ingest")
        .event_sink(events.clone())
        .user_data(42u32)
        .build();

    assert_eq!(consumer.name(), "ingest");
    assert_eq!(consumer.user_data::<u32>().as_deref(), Some(&42));

    consumer.start(2).unwrap();
    consumer.commit("one".to_string()).unwrap();
    assert!(wait_until(Duration::from_secs(2), || collector.len() == 1));
    consumer.stop(false).unwrap();

    let recorded = events.0.lock().unwrap().clone();
    assert!(recorded.contains(&ConsumerEventType::Started { workers: 2 }));
    assert_eq!(
        recorded.last(),
        Some(&ConsumerEventType::Stopped {
            forced: false,
            discarded: 0
        })
    );
    let consumed = recorded
        .iter()
        .filter(|e| matches!(e, ConsumerEventType::Consumed { ok: true, .. }))
        .count();
    assert_eq!(consumed, 1);
}

#[test]
fn test_handle_commits_from_other_threads() {
    let collector = Arc::new(Collector::default());
    let consumer = Consumer::with_handler(collector.clone());
    consumer.start(2).unwrap();

    let producers: Vec<_> = (0..4)
        .map(|p| {
            let handle = consumer.handle();
            thread::spawn(move || {
                for n in 0..50 {
                    handle.commit(format!("{}-{}", p, n)).unwrap();
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }
    consumer.stop(false).unwrap();

    assert_eq!(collector.len(), 200);
}
