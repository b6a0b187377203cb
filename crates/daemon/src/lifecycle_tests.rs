use super::*;

fn write_config(dir: &tempfile::TempDir) -> PathBuf {
    let config_path = dir.path().join("warden.toml");
    let contents = format!(
        r#"
working_dir = "{dir}"
control_socket = "{dir}/control.sock"
event_socket = "{dir}/event.sock"
lock_file = "{dir}/warden.lock"
log_file = "{dir}/warden.log"
"#,
        dir = dir.path().display()
    );
    std::fs::write(&config_path, contents).unwrap();
    config_path
}

#[test]
fn second_start_fails_while_first_holds_the_lock() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir);

    let first = DaemonState::start(&config_path).unwrap();
    let second = DaemonState::start(&config_path);

    assert!(matches!(second, Err(LifecycleError::AlreadyRunning { .. })));
    drop(first);
}

#[test]
fn lock_is_released_after_drop_and_files_removed() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir);

    let state = DaemonState::start(&config_path).unwrap();
    let lock_path = state.config.lock_file.clone();
    drop(state);

    assert!(!lock_path.exists());
    // A fresh start should now succeed.
    let state = DaemonState::start(&config_path).unwrap();
    drop(state);
}

#[test]
fn shutdown_removes_socket_files() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir);
    let state = DaemonState::start(&config_path).unwrap();
    std::fs::write(&state.config.control_socket, b"").unwrap();
    std::fs::write(&state.config.event_socket, b"").unwrap();

    state.shutdown();

    assert!(!state.config.control_socket.exists());
    assert!(!state.config.event_socket.exists());
}
