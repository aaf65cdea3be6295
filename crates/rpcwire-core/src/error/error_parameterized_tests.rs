#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

// ============================================================================
// Reserved code table
// ============================================================================

#[test_case(ErrorCode::ParseError, -32700, "Parse error")]
#[test_case(ErrorCode::InvalidRequest, -32600, "Invalid Request")]
#[test_case(ErrorCode::MethodNotFound, -32601, "Method not found")]
#[test_case(ErrorCode::InvalidParams, -32602, "Invalid params")]
#[test_case(ErrorCode::InternalError, -32603, "Internal error")]
fn ErrorCode___variant___maps_to_reserved_integer(code: ErrorCode, expected: i64, message: &str) {
    assert_eq!(code.code(), expected);
    assert_eq!(code.message(), message);
    assert_eq!(ErrorCode::from_code(expected), Some(code));
}

#[test_case(0)]
#[test_case(-32000)]
#[test_case(-32604)]
fn ErrorCode___from_code___unreserved_returns_none(code: i64) {
    assert_eq!(ErrorCode::from_code(code), None);
}

// ============================================================================
// ProtocolError to reserved code
// ============================================================================

#[test_case(ProtocolError::Parse("x".into()), ErrorCode::ParseError)]
#[test_case(ProtocolError::InvalidRequest("x".into()), ErrorCode::InvalidRequest)]
#[test_case(ProtocolError::InvalidParams("x".into()), ErrorCode::InvalidParams)]
#[test_case(ProtocolError::ConflictingOutcome, ErrorCode::InvalidRequest)]
fn ProtocolError___variant___maps_to_error_code(err: ProtocolError, expected: ErrorCode) {
    assert_eq!(err.error_code(), expected);
    assert_eq!(err.to_rpc_error().code, expected.code());
}
