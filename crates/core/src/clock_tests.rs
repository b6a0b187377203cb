use super::*;

#[test]
fn fake_clock_advances() {
    let clock = FakeClock::new();
    let t0 = clock.now();
    clock.advance(Duration::from_secs(5));
    assert_eq!(clock.now(), t0 + Duration::from_secs(5));
}

#[test]
fn fake_clock_set_overrides_advance() {
    let clock = FakeClock::new();
    let target = clock.now() + Duration::from_secs(100);
    clock.set(target);
    assert_eq!(clock.now(), target);
}

#[test]
fn system_clock_is_monotonic() {
    let clock = SystemClock;
    let a = clock.now();
    let b = clock.now();
    assert!(b >= a);
}
