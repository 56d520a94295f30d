//! Streamed request bodies that can be replayed on retry.
//!
//! The inbound body is never collected up front. Each attempt streams it;
//! chunks pulled from the client are kept as reference-counted `Bytes`
//! handles (the same allocations that were sent), so a retry first replays
//! what was already streamed and then continues from the unread remainder.

use std::io;
use std::sync::Arc;

use axum::body::{Body, BodyDataStream, Bytes};
use futures::{stream, Stream, StreamExt};
use tokio::sync::Mutex;

struct Shared {
    source: Option<BodyDataStream>,
    chunks: Vec<Bytes>,
    failure: Option<String>,
}

#[derive(Clone)]
pub struct ReplayableBody {
    shared: Arc<Mutex<Shared>>,
}

impl ReplayableBody {
    pub fn new(body: Body) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                source: Some(body.into_data_stream()),
                chunks: Vec::new(),
                failure: None,
            })),
        }
    }

    /// A fresh stream over the whole body, for one attempt.
    pub fn stream(&self) -> impl Stream<Item = Result<Bytes, io::Error>> + Send + 'static {
        let start = Some((Arc::clone(&self.shared), 0usize));

        stream::unfold(start, |state| async move {
            let (shared, index) = state?;
            let mut guard = Arc::clone(&shared).lock_owned().await;

            if let Some(chunk) = guard.chunks.get(index).cloned() {
                return Some((Ok(chunk), Some((shared, index + 1))));
            }
            if let Some(reason) = guard.failure.clone() {
                return Some((Err(io::Error::other(reason)), None));
            }

            let source = guard.source.as_mut()?;
            let next = source.next().await;
            match next {
                Some(Ok(chunk)) => {
                    guard.chunks.push(chunk.clone());
                    Some((Ok(chunk), Some((shared, index + 1))))
                }
                Some(Err(err)) => {
                    let reason = format!("inbound body failed: {err}");
                    guard.source = None;
                    guard.failure = Some(reason.clone());
                    Some((Err(io::Error::other(reason)), None))
                }
                None => {
                    guard.source = None;
                    None
                }
            }
        })
    }

    /// Why the inbound body failed, once it has. Sticky: every later replay
    /// fails the same way.
    pub async fn failure(&self) -> Option<String> {
        self.shared.lock().await.failure.clone()
    }

    pub fn into_reqwest(&self) -> reqwest::Body {
        reqwest::Body::wrap_stream(self.stream())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunked(parts: &[&'static str]) -> Body {
        let chunks: Vec<Result<Bytes, io::Error>> =
            parts.iter().map(|p| Ok(Bytes::from_static(p.as_bytes()))).collect();
        Body::from_stream(stream::iter(chunks))
    }

    async fn collect(body: &ReplayableBody) -> Vec<u8> {
        let mut out = Vec::new();
        let mut s = Box::pin(body.stream());
        while let Some(chunk) = s.next().await {
            out.extend_from_slice(&chunk.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn second_attempt_replays_the_full_body() {
        let body = ReplayableBody::new(chunked(&["{\"name\":", "\"Acme\"", "}"]));

        assert_eq!(collect(&body).await, b"{\"name\":\"Acme\"}");
        assert_eq!(collect(&body).await, b"{\"name\":\"Acme\"}");
    }

    #[tokio::test]
    async fn partially_streamed_body_continues_from_the_remainder() {
        let body = ReplayableBody::new(chunked(&["a", "b", "c"]));

        // First attempt is abandoned after one chunk (e.g. the backend
        // answered 503 before reading the rest).
        {
            let mut first = Box::pin(body.stream());
            assert_eq!(first.next().await.unwrap().unwrap(), Bytes::from_static(b"a"));
        }

        assert_eq!(collect(&body).await, b"abc");
    }

    #[tokio::test]
    async fn client_failure_is_sticky() {
        let parts: Vec<Result<Bytes, io::Error>> = vec![
            Ok(Bytes::from_static(b"a")),
            Err(io::Error::other("client went away")),
        ];
        let body = ReplayableBody::new(Body::from_stream(stream::iter(parts)));
        assert_eq!(body.failure().await, None);

        for _ in 0..2 {
            let mut s = Box::pin(body.stream());
            assert!(s.next().await.unwrap().is_ok());
            assert!(s.next().await.unwrap().is_err());
            assert!(s.next().await.is_none());
        }
        assert!(body.failure().await.is_some_and(|r| r.contains("client went away")));
    }

    #[tokio::test]
    async fn empty_body_streams_nothing() {
        let body = ReplayableBody::new(Body::empty());
        assert!(collect(&body).await.is_empty());
    }
}
