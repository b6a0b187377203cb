use super::*;
use nix::sys::wait::waitpid;
use nix::unistd::Pid;
use std::time::Instant;
use warden_core::clock::FakeClock;

fn job(name: &str, command: &str, restart: bool) -> JobConfig {
    JobConfig::builder(JobName::new(name).unwrap(), command).restart(restart).build()
}

fn one_job_dispatcher(name: &str, command: &str, restart: bool) -> Dispatcher<FakeClock> {
    let mut jobs = HashMap::new();
    let config = job(name, command, restart);
    jobs.insert(config.name.clone(), config);
    Dispatcher::new(jobs, FakeClock::new())
}

fn reap_all(dispatcher: &mut Dispatcher<FakeClock>) {
    let pids: Vec<u32> = dispatcher.live_pids.keys().copied().collect();
    for pid in pids {
        let _ = waitpid(Pid::from_raw(pid as i32), None);
        dispatcher.handle_child_exited(pid, 0);
    }
}

#[tokio::test]
async fn start_unknown_job_returns_unknown_job_error() {
    let mut dispatcher = one_job_dispatcher("svc", "exit 0", false);
    let response = dispatcher.start("nope");
    assert_eq!(response, Response::Err(ErrorCode::UnknownJob));
}

#[tokio::test]
async fn start_twice_returns_already_running() {
    let mut dispatcher = one_job_dispatcher("svc", "sleep 5", false);
    assert_eq!(dispatcher.start("svc"), Response::Ok(None));
    assert_eq!(dispatcher.start("svc"), Response::Err(ErrorCode::AlreadyRunning));
    reap_all(&mut dispatcher);
}

#[tokio::test]
async fn stop_already_stopped_returns_already_stopped() {
    let mut dispatcher = one_job_dispatcher("svc", "exit 0", false);
    assert_eq!(dispatcher.stop("svc"), Response::Err(ErrorCode::AlreadyStopped));
}

#[tokio::test]
async fn status_reports_running_then_stopped_after_reap() {
    let mut dispatcher = one_job_dispatcher("svc", "exit 0", false);
    dispatcher.start("svc");
    assert_eq!(dispatcher.status("svc"), Response::Ok(Some(Payload::Phase("RUNNING".into()))));

    reap_all(&mut dispatcher);

    assert_eq!(dispatcher.status("svc"), Response::Ok(Some(Payload::Phase("STOPPED".into()))));
}

#[tokio::test]
async fn list_jobs_is_sorted_by_name() {
    let mut jobs = HashMap::new();
    for name in ["zeta", "alpha", "mid"] {
        let config = job(name, "exit 0", false);
        jobs.insert(config.name.clone(), config);
    }
    let dispatcher = Dispatcher::new(jobs, FakeClock::new());
    let Response::Ok(Some(Payload::Jobs(entries))) = dispatcher.list_jobs() else {
        panic!("expected a job list payload");
    };
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "mid", "zeta"]);
}

#[tokio::test]
async fn wait_resolves_on_next_transition() {
    let mut dispatcher = one_job_dispatcher("svc", "exit 0", false);
    let (tx, rx) = tokio::sync::oneshot::channel();
    dispatcher.wait("svc".to_string(), tx);

    dispatcher.start("svc");
    assert!(rx.try_recv().is_err(), "wait must not resolve on the RUNNING transition before reap");

    reap_all(&mut dispatcher);
    assert_eq!(rx.await.unwrap(), Response::Ok(None));
}

#[tokio::test]
async fn wait_on_unknown_job_replies_immediately() {
    let mut dispatcher = one_job_dispatcher("svc", "exit 0", false);
    let (tx, rx) = tokio::sync::oneshot::channel();
    dispatcher.wait("nope".to_string(), tx);
    assert_eq!(rx.await.unwrap(), Response::Err(ErrorCode::UnknownJob));
}

#[tokio::test]
async fn terminate_with_no_running_jobs_completes_on_next_tick() {
    let mut dispatcher = one_job_dispatcher("svc", "exit 0", false);
    let (tx, rx) = tokio::sync::oneshot::channel();
    dispatcher.begin_shutdown(tx);

    let outcome = dispatcher.tick(Instant::now());

    assert_eq!(outcome, Outcome::ShuttingDown);
    assert_eq!(rx.await.unwrap(), Response::Ok(None));
}

#[tokio::test]
async fn stale_reap_does_not_touch_a_job_that_already_restarted() {
    let mut dispatcher = one_job_dispatcher("svc", "exit 0", true);
    dispatcher.start("svc");
    let first_pid = *dispatcher.live_pids.keys().next().unwrap();
    let _ = waitpid(Pid::from_raw(first_pid as i32), None);
    dispatcher.handle_child_exited(first_pid, 1);
    reap_all(&mut dispatcher);

    dispatcher.handle_child_exited(first_pid, 1);

    assert_eq!(dispatcher.status("svc"), Response::Ok(Some(Payload::Phase("STOPPED".into()))));
}
