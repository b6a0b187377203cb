use super::*;
use crate::response::Response;

#[test]
fn encode_returns_json_without_newline() {
    let response = Response::Ok(None);
    let encoded = encode(&response).expect("encode failed");
    let json_str = std::str::from_utf8(&encoded).expect("should be valid utf-8");
    assert!(json_str.starts_with('{'), "should be a JSON object: {json_str}");
    assert!(!json_str.ends_with('\n'));
}

#[tokio::test]
async fn read_write_message_roundtrip() {
    let response = Response::Ok(None);

    let mut buffer = Vec::new();
    write_message(&mut buffer, &response).await.expect("write failed");
    assert!(buffer.ends_with(b"\n"));

    let mut cursor = std::io::Cursor::new(buffer);
    let line = read_message(&mut cursor).await.expect("read failed").expect("expected a message");
    let decoded: Response = decode(&line).expect("decode failed");
    assert_eq!(decoded, response);
}

#[tokio::test]
async fn read_message_returns_none_on_clean_eof() {
    let mut cursor = std::io::Cursor::new(Vec::new());
    let result = read_message(&mut cursor).await.expect("read failed");
    assert_eq!(result, None);
}

#[tokio::test]
async fn read_message_strips_trailing_newline() {
    let mut cursor = std::io::Cursor::new(b"{\"ok\":true}\n".to_vec());
    let line = read_message(&mut cursor).await.expect("read failed").expect("expected a message");
    assert_eq!(line, b"{\"ok\":true}");
}

#[tokio::test]
async fn two_messages_on_one_stream_are_read_independently() {
    let mut buffer = Vec::new();
    write_message(&mut buffer, &Response::Ok(None)).await.unwrap();
    write_message(&mut buffer, &Response::Err(crate::response::ErrorCode::UnknownJob))
        .await
        .unwrap();

    let mut cursor = std::io::Cursor::new(buffer);
    let first = read_message(&mut cursor).await.unwrap().unwrap();
    let second = read_message(&mut cursor).await.unwrap().unwrap();
    assert_eq!(decode::<Response>(&first).unwrap(), Response::Ok(None));
    assert_eq!(
        decode::<Response>(&second).unwrap(),
        Response::Err(crate::response::ErrorCode::UnknownJob)
    );
}
