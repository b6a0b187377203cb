use super::*;
use std::time::Instant;
use warden_core::event::ExternalPhase;
use warden_core::job::JobName;

fn event(job: &str, phase: ExternalPhase) -> Event {
    Event::new(JobName::new(job).unwrap(), phase, Instant::now())
}

#[tokio::test]
async fn subscriber_receives_published_events_in_order() {
    let mut bus = EventBus::new();
    let (_id, mut rx) = bus.subscribe(None);

    bus.publish(event("a", ExternalPhase::Running));
    bus.publish(event("a", ExternalPhase::Stopped));

    assert_eq!(rx.recv().await.unwrap().phase, ExternalPhase::Running);
    assert_eq!(rx.recv().await.unwrap().phase, ExternalPhase::Stopped);
}

#[tokio::test]
async fn filtered_subscriber_only_sees_its_job() {
    let mut bus = EventBus::new();
    let (_id, mut rx) = bus.subscribe(Some(JobName::new("a").unwrap()));

    bus.publish(event("b", ExternalPhase::Running));
    bus.publish(event("a", ExternalPhase::Running));

    assert_eq!(rx.recv().await.unwrap().job.as_str(), "a");
}

#[tokio::test]
async fn unsubscribe_is_idempotent_and_stops_delivery() {
    let mut bus = EventBus::new();
    let (id, mut rx) = bus.subscribe(None);
    bus.unsubscribe(id);
    bus.unsubscribe(id);

    bus.publish(event("a", ExternalPhase::Running));

    assert!(rx.recv().await.is_none());
    assert_eq!(bus.subscriber_count(), 0);
}

#[tokio::test]
async fn slow_subscriber_is_disconnected_without_blocking_others() {
    let mut bus = EventBus::new();
    let (_slow_id, slow_rx) = bus.subscribe(None);
    let (_fast_id, mut fast_rx) = bus.subscribe(None);

    for _ in 0..=HIGH_WATER_MARK {
        bus.publish(event("a", ExternalPhase::Running));
    }

    assert_eq!(bus.subscriber_count(), 1);
    for _ in 0..HIGH_WATER_MARK {
        assert!(fast_rx.recv().await.is_some());
    }
    drop(slow_rx);
}
