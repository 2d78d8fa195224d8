// tests/event_bus.rs

mod common;
use crate::common::{init_tracing, EventLog};

use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use sniffer::errors::SnifferError;
use sniffer::events::{EventBus, EventKind, KindSet, ScanEvent};

type TestResult = Result<(), Box<dyn Error>>;

fn created(path: &str) -> ScanEvent {
    ScanEvent::for_path(EventKind::Created, path, None)
}

#[test]
fn observers_fire_in_registration_order() -> TestResult {
    init_tracing();
    let log = EventLog::new();
    let mut bus = EventBus::new();

    bus.observe(EventKind::Created, log.labelled("A"))?;
    bus.observe(EventKind::Created, log.labelled("B"))?;
    bus.observe(EventKind::Created, log.labelled("C"))?;

    bus.trigger(&created("/p/a.rs"))?;
    bus.trigger(&created("/p/b.rs"))?;

    assert_eq!(log.labels(), vec!["A", "B", "C", "A", "B", "C"]);
    Ok(())
}

#[test]
fn one_registration_covers_several_kinds() -> TestResult {
    let log = EventLog::new();
    let mut bus = EventBus::new();

    let id = bus.observe([EventKind::Created, EventKind::Deleted], log.observer())?;

    bus.trigger(&created("/p/a.rs"))?;
    bus.trigger(&ScanEvent::for_path(EventKind::Modified, "/p/a.rs", None))?;
    bus.trigger(&ScanEvent::for_path(EventKind::Deleted, "/p/a.rs", None))?;
    assert_eq!(log.kinds(), vec![EventKind::Created, EventKind::Deleted]);

    bus.unobserve([EventKind::Created, EventKind::Deleted], id)?;
    assert_eq!(bus.observer_count(EventKind::Created), 0);
    assert_eq!(bus.observer_count(EventKind::Deleted), 0);
    Ok(())
}

#[test]
fn unobserve_only_removes_the_given_observer() -> TestResult {
    let log = EventLog::new();
    let mut bus = EventBus::new();

    bus.observe(EventKind::Modified, log.labelled("keep"))?;
    let drop_id = bus.observe(EventKind::Modified, log.labelled("drop"))?;
    bus.unobserve(EventKind::Modified, drop_id)?;

    bus.trigger(&ScanEvent::for_path(EventKind::Modified, "/p/a.rs", None))?;
    assert_eq!(log.labels(), vec!["keep"]);
    Ok(())
}

#[test]
fn unobserve_unknown_observer_fails_without_removing_anything() -> TestResult {
    let mut bus = EventBus::new();
    let id = bus.observe(EventKind::Created, |_: &ScanEvent| Ok(()))?;

    // Attached to `created` only, so asking for `deleted` too must fail.
    let err = bus
        .unobserve([EventKind::Created, EventKind::Deleted], id)
        .unwrap_err();
    assert!(matches!(
        err,
        SnifferError::ObserverNotFound {
            kind: EventKind::Deleted,
            ..
        }
    ));
    assert_eq!(bus.observer_count(EventKind::Created), 1);
    Ok(())
}

#[test]
fn unknown_event_names_are_rejected() {
    let mut bus = EventBus::new();
    let err = bus
        .observe_named(&["created", "renamed"], |_: &ScanEvent| Ok(()))
        .unwrap_err();
    assert!(matches!(err, SnifferError::InvalidEventKind(ref name) if name == "renamed"));
    assert_eq!(bus.observer_count(EventKind::Created), 0);
}

#[test]
fn empty_kind_set_is_rejected() {
    let mut bus = EventBus::new();
    let err = bus
        .observe(KindSet::default(), |_: &ScanEvent| Ok(()))
        .unwrap_err();
    assert!(matches!(err, SnifferError::InvalidEventKind(_)));
}

#[test]
fn named_kinds_parse_case_insensitively() -> TestResult {
    let kinds = KindSet::parse(&["Created", " MODIFIED ", "init", "created"])?;
    assert_eq!(
        kinds.iter().collect::<Vec<_>>(),
        vec![EventKind::Created, EventKind::Modified, EventKind::Init]
    );
    assert_eq!("deleted".parse::<EventKind>()?, EventKind::Deleted);
    Ok(())
}

#[test]
fn failing_observer_aborts_the_dispatch() -> TestResult {
    let log = EventLog::new();
    let mut bus = EventBus::new();
    let after = Arc::new(AtomicUsize::new(0));

    bus.observe(EventKind::Created, log.labelled("A"))?;
    bus.observe(EventKind::Created, |_: &ScanEvent| {
        Err(anyhow::anyhow!("runner blew up"))
    })?;
    {
        let after = Arc::clone(&after);
        bus.observe(EventKind::Created, move |_: &ScanEvent| {
            after.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })?;
    }

    let err = bus.trigger(&created("/p/a.rs")).unwrap_err();
    match err {
        SnifferError::ObserverFailed { kind, source } => {
            assert_eq!(kind, EventKind::Created);
            assert!(source.to_string().contains("runner blew up"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(log.labels(), vec!["A"]);
    assert_eq!(after.load(Ordering::SeqCst), 0);
    Ok(())
}

#[test]
fn init_events_carry_no_path() -> TestResult {
    let log = EventLog::new();
    let mut bus = EventBus::new();
    bus.observe(EventKind::ALL, log.observer())?;

    bus.trigger(&ScanEvent::init(None))?;

    let events = log.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EventKind::Init);
    assert!(events[0].path().is_none());
    assert!(!EventKind::Init.has_path());
    Ok(())
}

#[test]
fn dispatch_without_observers_is_a_no_op() -> TestResult {
    let bus = EventBus::new();
    bus.trigger(&created("/p/a.rs"))?;
    Ok(())
}
