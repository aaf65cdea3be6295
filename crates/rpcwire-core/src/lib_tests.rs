#![allow(non_snake_case)]

use super::*;

#[test]
fn LogLevel___ordering___trace_less_than_error() {
    assert!(LogLevel::Trace < LogLevel::Error);
}

#[test]
fn LogLevel___ordering___error_less_than_off() {
    assert!(LogLevel::Error < LogLevel::Off);
}

#[test]
fn LogLevel___from_u8___2_returns_info() {
    assert_eq!(LogLevel::from_u8(2), LogLevel::Info);
}

#[test]
fn LogLevel___from_u8___out_of_range_returns_off() {
    assert_eq!(LogLevel::from_u8(200), LogLevel::Off);
}

#[test]
fn LogLevel___from_str___accepts_mixed_case() {
    let level: LogLevel = "WaRn".parse().unwrap();

    assert_eq!(level, LogLevel::Warn);
}

#[test]
fn LogLevel___from_str___rejects_unknown_name() {
    let result = "loud".parse::<LogLevel>();

    assert!(result.is_err());
}

#[test]
fn LogLevel___as_filter___is_lowercase_directive() {
    assert_eq!(LogLevel::Debug.as_filter(), "debug");
}

#[test]
fn LogLevel___display___is_uppercase() {
    assert_eq!(LogLevel::Trace.to_string(), "TRACE");
}
