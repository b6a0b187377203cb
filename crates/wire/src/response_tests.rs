use super::*;
use yare::parameterized;

#[test]
fn ok_with_no_payload_serializes_without_payload_field() {
    let json = serde_json::to_string(&Response::Ok(None)).unwrap();
    assert_eq!(json, r#"{"ok":true}"#);
}

#[test]
fn ok_with_phase_payload_round_trips() {
    let response = Response::Ok(Some(Payload::Phase("RUNNING".into())));
    let json = serde_json::to_string(&response).unwrap();
    let parsed: Response = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, response);
}

#[test]
fn ok_with_job_list_payload_round_trips() {
    let response = Response::Ok(Some(Payload::Jobs(vec![
        JobStatusEntry { name: "a".into(), status: "RUNNING".into() },
        JobStatusEntry { name: "b".into(), status: "STOPPED".into() },
    ])));
    let json = serde_json::to_string(&response).unwrap();
    let parsed: Response = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, response);
}

#[parameterized(
    unknown_job = { ErrorCode::UnknownJob, r#""UNKNOWN_JOB""# },
    already_running = { ErrorCode::AlreadyRunning, r#""ALREADY_RUNNING""# },
    already_stopped = { ErrorCode::AlreadyStopped, r#""ALREADY_STOPPED""# },
    spawn_failed = { ErrorCode::SpawnFailed, r#""SPAWN_FAILED""# },
    bad_request = { ErrorCode::BadRequest, r#""BAD_REQUEST""# },
)]
fn error_codes_match_documented_wire_strings(code: ErrorCode, expected_json: &str) {
    assert_eq!(serde_json::to_string(&code).unwrap(), expected_json);
}

#[test]
fn err_response_serializes_with_error_field_and_no_payload() {
    let json = serde_json::to_string(&Response::Err(ErrorCode::UnknownJob)).unwrap();
    assert_eq!(json, r#"{"ok":false,"error":"UNKNOWN_JOB"}"#);
}

#[test]
fn rejects_ok_true_with_error_set() {
    let malformed = r#"{"ok":true,"error":"UNKNOWN_JOB"}"#;
    let result: Result<Response, _> = serde_json::from_str(malformed);
    assert!(result.is_err());
}

#[test]
fn rejects_ok_false_with_no_error() {
    let malformed = r#"{"ok":false}"#;
    let result: Result<Response, _> = serde_json::from_str(malformed);
    assert!(result.is_err());
}
