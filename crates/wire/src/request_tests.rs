use super::*;
use yare::parameterized;

#[parameterized(
    start = { r#"{"command":"start","job":"svc"}"#, Request::Start { job: "svc".into() } },
    stop = { r#"{"command":"stop","job":"svc"}"#, Request::Stop { job: "svc".into() } },
    status = { r#"{"command":"status","job":"svc"}"#, Request::Status { job: "svc".into() } },
    list_jobs = { r#"{"command":"list-jobs"}"#, Request::ListJobs },
    wait = { r#"{"command":"wait","job":"svc"}"#, Request::Wait { job: "svc".into() } },
    terminate = { r#"{"command":"terminate"}"#, Request::Terminate },
)]
fn parses_documented_wire_shape(json: &str, expected: Request) {
    let parsed: Request = serde_json::from_str(json).unwrap();
    assert_eq!(parsed, expected);
}

#[test]
fn round_trips_through_serialize_then_parse() {
    let requests = vec![
        Request::Start { job: "svc".into() },
        Request::Stop { job: "svc".into() },
        Request::Status { job: "svc".into() },
        Request::ListJobs,
        Request::Wait { job: "svc".into() },
        Request::Terminate,
    ];
    for request in requests {
        let json = serde_json::to_string(&request).unwrap();
        let parsed: Request = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, request);
    }
}

#[test]
fn rejects_unknown_command() {
    let result: Result<Request, _> = serde_json::from_str(r#"{"command":"nope"}"#);
    assert!(result.is_err());
}
