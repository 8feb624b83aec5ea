use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;

use function_sdk::rpc::ServerStreamingCall;
use function_sdk::stream::ResponseStream;
use function_sdk::{Error, Result};

/// A call that replays a fixed script of receive results.
struct ScriptedCall {
    script: VecDeque<Result<u32>>,
    receives: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
    fail_close: bool,
}

impl ScriptedCall {
    fn new(script: Vec<Result<u32>>) -> Self {
        Self {
            script: script.into(),
            receives: Arc::new(AtomicUsize::new(0)),
            closes: Arc::new(AtomicUsize::new(0)),
            fail_close: false,
        }
    }

    fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }
}

#[async_trait]
impl ServerStreamingCall<u32> for ScriptedCall {
    async fn receive(&mut self) -> Option<Result<u32>> {
        self.receives.fetch_add(1, Ordering::SeqCst);
        self.script.pop_front()
    }

    async fn close(&mut self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "teardown failed",
            )));
        }
        Ok(())
    }
}

fn io_error(message: &str) -> Error {
    Error::Io(io::Error::new(io::ErrorKind::ConnectionReset, message))
}

#[tokio::test]
async fn test_read_projects_each_message() -> Result<()> {
    let call = ScriptedCall::new(vec![Ok(1), Ok(2), Ok(3)]);
    let mut stream = ResponseStream::new(call, |n: u32| format!("#{}", n));

    assert!(!stream.is_closed());
    assert_eq!(stream.read().await?.as_deref(), Some("#1"));
    assert_eq!(stream.read().await?.as_deref(), Some("#2"));
    assert_eq!(stream.read().await?.as_deref(), Some("#3"));
    assert!(!stream.is_closed());
    assert_eq!(stream.read().await?, None);
    assert!(stream.is_closed());
    Ok(())
}

#[tokio::test]
async fn test_reads_after_exhaustion_stay_at_end() -> Result<()> {
    let call = ScriptedCall::new(vec![Ok(7)]);
    let receives = call.receives.clone();
    let mut stream = ResponseStream::new(call, |n: u32| n * 2);

    assert_eq!(stream.read().await?, Some(14));
    for _ in 0..5 {
        assert_eq!(stream.read().await?, None);
        assert!(stream.is_closed());
    }
    // Once closed, the underlying call is not touched again.
    assert_eq!(receives.load(Ordering::SeqCst), 2);
    Ok(())
}

#[tokio::test]
async fn test_close_suppresses_remaining_messages() -> Result<()> {
    let call = ScriptedCall::new(vec![Ok(1), Ok(2), Ok(3)]);
    let closes = call.closes.clone();
    let mut stream = ResponseStream::new(call, |n: u32| n);

    assert_eq!(stream.read().await?, Some(1));
    stream.close().await?;
    assert!(stream.is_closed());
    assert_eq!(closes.load(Ordering::SeqCst), 1);

    for _ in 0..3 {
        assert_eq!(stream.read().await?, None);
    }
    Ok(())
}

#[tokio::test]
async fn test_close_twice_is_safe() -> Result<()> {
    let call = ScriptedCall::new(vec![Ok(1)]);
    let mut stream = ResponseStream::new(call, |n: u32| n);

    stream.close().await?;
    assert!(stream.is_closed());
    stream.close().await?;
    assert!(stream.is_closed());
    assert_eq!(stream.read().await?, None);
    Ok(())
}

#[tokio::test]
async fn test_close_error_still_closes() {
    let call = ScriptedCall::new(vec![Ok(1), Ok(2)]).failing_close();
    let mut stream = ResponseStream::new(call, |n: u32| n);

    let result = stream.close().await;
    assert!(matches!(result, Err(Error::Io(ref e)) if e.kind() == io::ErrorKind::BrokenPipe));
    assert!(stream.is_closed());
    assert!(matches!(stream.read().await, Ok(None)));
}

#[tokio::test]
async fn test_read_error_closes_stream() {
    let call = ScriptedCall::new(vec![Ok(1), Err(io_error("reset")), Ok(2)]);
    let mut stream = ResponseStream::new(call, |n: u32| n);

    assert!(matches!(stream.read().await, Ok(Some(1))));
    assert!(matches!(stream.read().await, Err(Error::Io(_))));
    assert!(stream.is_closed());
    // Messages after the failure are never delivered.
    assert!(matches!(stream.read().await, Ok(None)));
}

#[tokio::test]
async fn test_is_closed_is_pure() -> Result<()> {
    let call = ScriptedCall::new(Vec::new());
    let receives = call.receives.clone();
    let mut stream = ResponseStream::new(call, |n: u32| n);

    // The underlying call is already exhausted, but nothing has observed it yet.
    assert!(!stream.is_closed());
    assert!(!stream.is_closed());
    assert_eq!(receives.load(Ordering::SeqCst), 0);

    assert_eq!(stream.read().await?, None);
    assert!(stream.is_closed());
    Ok(())
}

#[tokio::test]
async fn test_into_stream() {
    let call = ScriptedCall::new(vec![Ok(1), Ok(2), Ok(3)]);
    let stream = ResponseStream::new(call, |n: u32| n.to_string());

    let items = stream
        .into_stream()
        .map(|item| item.unwrap_or_default())
        .collect::<Vec<_>>()
        .await;
    assert_eq!(items, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_into_stream_ends_after_error() {
    let call = ScriptedCall::new(vec![Ok(1), Err(io_error("reset")), Ok(2)]);
    let stream = ResponseStream::new(call, |n: u32| n);

    let items = stream.into_stream().collect::<Vec<_>>().await;
    assert_eq!(items.len(), 2);
    assert!(matches!(items[0], Ok(1)));
    assert!(matches!(items[1], Err(Error::Io(_))));
}
