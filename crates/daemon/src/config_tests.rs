use super::*;

const SAMPLE: &str = r#"
working_dir = "/var/lib/warden"
control_socket = "/var/run/warden/control.sock"
event_socket = "/var/run/warden/event.sock"
lock_file = "/var/run/warden/warden.lock"
log_file = "/var/log/warden/warden.log"
log_level = "debug"

[[job]]
name = "true-job"
command = "/bin/true"

[[job]]
name = "loop-fail"
command = "/bin/false"
autostart = true
restart = true
"#;

#[test]
fn parses_sample_config() {
    let config = DaemonConfig::parse(SAMPLE, Path::new("test.toml")).unwrap();
    assert_eq!(config.working_dir, PathBuf::from("/var/lib/warden"));
    assert_eq!(config.log_level, LogLevel::Debug);
    let jobs = config.job_table();
    assert_eq!(jobs.len(), 2);
    assert!(jobs.contains_key(JobName::new("true-job").unwrap().as_str()));
    let loop_fail = &jobs[JobName::new("loop-fail").unwrap().as_str()];
    assert!(loop_fail.autostart);
    assert!(loop_fail.restart);
}

#[test]
fn defaults_log_level_to_info_when_absent() {
    let text = SAMPLE.replace("log_level = \"debug\"\n", "");
    let config = DaemonConfig::parse(&text, Path::new("test.toml")).unwrap();
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn rejects_duplicate_job_names() {
    let text = format!("{SAMPLE}\n[[job]]\nname = \"true-job\"\ncommand = \"/bin/true\"\n");
    let result = DaemonConfig::parse(&text, Path::new("test.toml"));
    assert!(matches!(result, Err(ConfigError::DuplicateJob(name)) if name == "true-job"));
}

#[test]
fn rejects_malformed_toml() {
    let result = DaemonConfig::parse("not valid toml =====", Path::new("test.toml"));
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}
