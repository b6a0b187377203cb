use super::*;
use yare::parameterized;

#[test]
fn restart_disabled_never_respawns() {
    let now = Instant::now();
    assert_eq!(RestartThrottle::on_exit(false, None, now), Decision::DoNotRespawn);
    assert_eq!(RestartThrottle::on_exit(false, Some(now), now), Decision::DoNotRespawn);
}

#[test]
fn first_crash_respawns_immediately() {
    let now = Instant::now();
    assert_eq!(RestartThrottle::on_exit(true, None, now), Decision::RespawnImmediately);
}

#[parameterized(
    just_under_window = { Duration::from_millis(4_999) },
    exactly_at_window = { Duration::from_secs(5) },
)]
fn crash_within_rapid_window_defers(elapsed: Duration) {
    let t0 = Instant::now();
    let now = t0 + elapsed;
    let decision = RestartThrottle::on_exit(true, Some(t0), now);
    assert_eq!(decision, Decision::Defer(now + COOLDOWN));
}

#[test]
fn crash_just_outside_rapid_window_respawns_immediately() {
    let t0 = Instant::now();
    let now = t0 + RAPID_WINDOW + Duration::from_millis(1);
    assert_eq!(RestartThrottle::on_exit(true, Some(t0), now), Decision::RespawnImmediately);
}
