//! `rpcwire serve` - JSON-RPC peer over stdin/stdout

use anyhow::Result;
use futures::StreamExt;
use rpcwire::{
    CodecError, FramedSink, MessageSink, MethodError, MethodResult, Params, PendingTable, Router,
    RpcConfig, Runner, SeparatorCodec,
};
use serde_json::{Value, json};
use std::sync::{Arc, Weak};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::FramedRead;
use tracing::{debug, error, info};

/// Runner preloaded with the built-in methods
///
/// - `ping` returns `"pong"`
/// - `echo` returns its params (or `null`)
/// - `sum` adds an array of numbers
/// - `methods` lists every registered method
pub fn builtin_runner(config: &RpcConfig) -> Arc<Runner> {
    let runner = Arc::new(Runner::from_config(config));

    runner.register("ping", |_params| async { Ok::<_, MethodError>(json!("pong")) });
    runner.register("echo", |params: Option<Params>| async move {
        Ok::<_, MethodError>(params.map(Params::into_value).unwrap_or(Value::Null))
    });
    runner.register("sum", sum);

    let weak: Weak<Runner> = Arc::downgrade(&runner);
    runner.register("methods", move |_params| {
        let names = weak.upgrade().map(|runner| runner.names()).unwrap_or_default();
        async move { Ok::<_, MethodError>(json!(names)) }
    });

    runner
}

async fn sum(params: Option<Params>) -> MethodResult {
    let items = match params {
        Some(Params::Array(items)) => items,
        Some(Params::Object(_)) => {
            return Err(MethodError::invalid_params("sum expects an array of numbers"));
        }
        None => Vec::new(),
    };

    if let Some(total) = items
        .iter()
        .map(Value::as_i64)
        .try_fold(0i64, |acc, n| acc.checked_add(n?))
    {
        return Ok(json!(total));
    }

    let mut total = 0.0;
    for item in &items {
        match item.as_f64() {
            Some(n) => total += n,
            None => return Err(MethodError::invalid_params(format!("not a number: {item}"))),
        }
    }
    Ok(json!(total))
}

/// Serve requests read from `reader`, writing replies to `writer`
///
/// Malformed frames are answered with an error response and skipped. The
/// loop ends at end of input, or on a read failure or oversized frame.
pub async fn serve_stream<R, W>(reader: R, writer: W, config: &RpcConfig) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let runner = builtin_runner(config);
    let table = Arc::new(PendingTable::new());
    let router = Router::auto(runner, table.clone());
    let sink = FramedSink::new(writer, SeparatorCodec::from_config(config));
    let mut frames = FramedRead::new(reader, SeparatorCodec::from_config(config));

    info!(separator = %config.separator, "serving");
    while let Some(frame) = frames.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(CodecError::FrameTooLarge { size, limit }) => {
                error!(size, limit, "frame too large, closing");
                break;
            }
            Err(err) => return Err(err.into()),
        };
        if let Some(reply) = router.dispatch_frame(frame).await {
            sink.send(reply).await?;
        }
    }

    let abandoned = table.cancel_all();
    debug!(abandoned, "input closed");
    Ok(())
}

pub async fn run(config: &RpcConfig) -> Result<()> {
    serve_stream(tokio::io::stdin(), tokio::io::stdout(), config).await
}
