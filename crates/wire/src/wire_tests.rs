// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire format tests: length-prefix framing and JSON encoding.

use super::*;
use vg_core::{Code, JobId};

#[test]
fn encode_returns_json_without_length_prefix() {
    let encoded = encode(&Response::Ok).expect("encode failed");
    let json_str = std::str::from_utf8(&encoded).expect("should be valid UTF-8");
    assert_eq!(json_str, r#"{"type":"Ok"}"#);
}

#[tokio::test]
async fn write_message_adds_length_prefix() {
    let data = b"test data";

    let mut buffer = Vec::new();
    write_message(&mut buffer, data).await.expect("write failed");

    let len = u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]) as usize;
    assert_eq!(len, data.len());
    assert_eq!(&buffer[4..], data);
}

#[tokio::test]
async fn read_message_on_empty_input_is_connection_closed() {
    let mut cursor = std::io::Cursor::new(Vec::<u8>::new());
    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::ConnectionClosed));
}

#[tokio::test]
async fn read_message_rejects_oversized_prefix() {
    let len = (MAX_MESSAGE_SIZE as u32) + 1;
    let mut cursor = std::io::Cursor::new(len.to_be_bytes().to_vec());
    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::MessageTooLarge { .. }));
}

#[tokio::test]
async fn frames_are_read_back_in_order() {
    let mut buffer = Vec::new();
    write_frame(&mut buffer, &Request::CancelJob { job_id: JobId::from_string("job-1") })
        .await
        .unwrap();
    write_frame(&mut buffer, &Request::RunnerJobStream).await.unwrap();

    let mut cursor = std::io::Cursor::new(buffer);
    let first: Request = read_frame(&mut cursor).await.unwrap();
    let second: Request = read_frame(&mut cursor).await.unwrap();
    assert_eq!(first, Request::CancelJob { job_id: JobId::from_string("job-1") });
    assert_eq!(second, Request::RunnerJobStream);
}

#[tokio::test(start_paused = true)]
async fn read_request_times_out_on_silent_peer() {
    let (_client, mut server) = tokio::io::duplex(64);
    let err = read_request(&mut server, Duration::from_millis(100)).await.unwrap_err();
    assert!(matches!(err, ProtocolError::Timeout));
}

#[yare::parameterized(
    closed  = { ProtocolError::ConnectionClosed, Code::Unavailable },
    timeout = { ProtocolError::Timeout, Code::DeadlineExceeded },
    large   = { ProtocolError::MessageTooLarge { size: 2, max: 1 }, Code::Internal },
)]
fn protocol_errors_map_to_status(err: ProtocolError, code: Code) {
    assert_eq!(Status::from(err).code, code);
}
