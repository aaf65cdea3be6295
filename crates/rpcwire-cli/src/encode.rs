//! `rpcwire encode` - print one framed request

use anyhow::{Context, Result};
use rpcwire::{Id, Message, Params, Request, encode};

/// Build a request from command-line arguments and frame it
///
/// Without `id` the request is a notification. An id that parses as an
/// integer is sent as a number, anything else as a string.
pub fn render(
    method: &str,
    params: Option<&str>,
    id: Option<&str>,
    separator: &str,
) -> Result<String> {
    let params = params.map(parse_params).transpose()?;
    let request = Request::new(method, params, id.map(parse_id));
    let bytes = encode(&Message::from(request), separator)?;
    Ok(String::from_utf8(bytes)?)
}

pub fn run(method: &str, params: Option<&str>, id: Option<&str>, separator: &str) -> Result<()> {
    print!("{}", render(method, params, id, separator)?);
    Ok(())
}

fn parse_params(text: &str) -> Result<Params> {
    let value: serde_json::Value =
        serde_json::from_str(text).context("--params must be valid JSON")?;
    Params::try_from(value).context("--params must be a JSON array or object")
}

fn parse_id(text: &str) -> Id {
    match text.parse::<i64>() {
        Ok(number) => Id::Number(number),
        Err(_) => Id::String(text.to_string()),
    }
}
