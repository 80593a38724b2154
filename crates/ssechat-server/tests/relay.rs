//! End-to-end tests of the relay over a loopback socket with scripted
//! completion sources.
use std::{
    net::SocketAddr,
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    task::{Context, Poll},
    time::Duration,
};

use futures_util::{Stream, StreamExt, stream};
use ssechat_core::{CompletionPrompt, CompletionSource, DeltaEvent, RelayError, Result};
use ssechat_server::{
    RelayOptions,
    routes::{AppState, router},
};
use tokio::net::TcpListener;

type BoxDeltas = Pin<Box<dyn Stream<Item = Result<DeltaEvent>> + Send + 'static>>;

#[derive(Clone, Copy)]
enum Step {
    Delta(&'static str),
    Fail,
}

/// Replays the same script for every prompt.
struct Scripted(Vec<Step>);

impl CompletionSource for Scripted {
    type Deltas = BoxDeltas;

    fn stream_completion(&self, _prompt: CompletionPrompt) -> Self::Deltas {
        let items: Vec<Result<DeltaEvent>> = self
            .0
            .iter()
            .map(|step| match step {
                Step::Delta(text) => Ok(DeltaEvent { text: (*text).into() }),
                Step::Fail => Err(RelayError::Backend("upstream reset".into())),
            })
            .collect();
        stream::iter(items).boxed()
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Streams the prompt back one character per delta.
struct Echo;

impl CompletionSource for Echo {
    type Deltas = BoxDeltas;

    fn stream_completion(&self, prompt: CompletionPrompt) -> Self::Deltas {
        let items: Vec<Result<DeltaEvent>> = prompt
            .as_str()
            .chars()
            .map(|c| Ok(DeltaEvent { text: c.to_string() }))
            .collect();
        stream::iter(items)
            .then(|item| async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                item
            })
            .boxed()
    }

    fn name(&self) -> &'static str {
        "echo"
    }
}

/// Yields one delta and then never finishes; flips `dropped` once the
/// stream is released.
struct Hanging {
    dropped: Arc<AtomicBool>,
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

struct Guarded {
    inner: BoxDeltas,
    _flag: DropFlag,
}

impl Stream for Guarded {
    type Item = Result<DeltaEvent>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl CompletionSource for Hanging {
    type Deltas = BoxDeltas;

    fn stream_completion(&self, _prompt: CompletionPrompt) -> Self::Deltas {
        let inner = stream::iter(vec![Ok(DeltaEvent { text: "H".into() })])
            .chain(stream::pending())
            .boxed();
        Box::pin(Guarded {
            inner,
            _flag: DropFlag(Arc::clone(&self.dropped)),
        })
    }

    fn name(&self) -> &'static str {
        "hanging"
    }
}

async fn serve<S: CompletionSource + 'static>(state: AppState<S>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    addr
}

fn chat_url(addr: SocketAddr, query: &str) -> String {
    format!("http://{addr}/api/chat?query={query}")
}

#[tokio::test]
async fn relays_each_delta_as_a_quoted_data_frame() {
    let addr = serve(AppState::new(Scripted(vec![Step::Delta("H"), Step::Delta("i")]))).await;

    let resp = reqwest::get(chat_url(addr, "hello")).await.unwrap();

    assert_eq!(resp.status(), 200);
    let content_type = resp.headers()["content-type"].to_str().unwrap().to_owned();
    assert!(content_type.starts_with("text/event-stream"), "{content_type}");
    assert_eq!(resp.text().await.unwrap(), "data: \"H\"\n\ndata: \"i\"\n\n");
}

#[tokio::test]
async fn empty_completion_closes_without_frames() {
    let addr = serve(AppState::new(Scripted(vec![]))).await;

    let resp = reqwest::get(chat_url(addr, "hello")).await.unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "");
}

#[tokio::test]
async fn source_failure_closes_after_the_deltas_already_sent() {
    let addr = serve(AppState::new(Scripted(vec![
        Step::Delta("par"),
        Step::Fail,
        Step::Delta("never"),
    ])))
    .await;

    let body = reqwest::get(chat_url(addr, "hello"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert_eq!(body, "data: \"par\"\n\n");
}

#[tokio::test]
async fn terminal_events_are_named_and_opt_in() {
    let options = RelayOptions {
        terminal_events: true,
        ..RelayOptions::default()
    };

    let addr = serve(AppState::new(Scripted(vec![Step::Delta("ok")])).with_relay_options(options.clone())).await;
    let body = reqwest::get(chat_url(addr, "hello"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.starts_with("data: \"ok\"\n\n"), "{body}");
    assert!(body.contains("event: done\n"), "{body}");
    assert!(body.contains("data: [DONE]\n"), "{body}");

    let addr = serve(AppState::new(Scripted(vec![Step::Fail])).with_relay_options(options)).await;
    let body = reqwest::get(chat_url(addr, "hello"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("event: error\n"), "{body}");
    assert!(body.contains("data: completion backend failed\n"), "{body}");
    assert!(!body.contains("upstream reset"), "internal detail leaked: {body}");
}

#[tokio::test]
async fn line_breaks_inside_a_delta_use_multi_line_data() {
    let addr = serve(AppState::new(Scripted(vec![Step::Delta("a\r\nb")]))).await;

    let body = reqwest::get(chat_url(addr, "hello"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert_eq!(body, "data: \"a\ndata: b\"\n\n");
}

#[tokio::test]
async fn blank_or_missing_query_is_rejected() {
    let addr = serve(AppState::new(Scripted(vec![Step::Delta("x")]))).await;

    let blank = reqwest::get(chat_url(addr, "%20%20")).await.unwrap();
    assert_eq!(blank.status(), 400);

    let missing = reqwest::get(format!("http://{addr}/api/chat")).await.unwrap();
    assert_eq!(missing.status(), 400);
}

#[tokio::test]
async fn any_origin_may_read_the_stream() {
    let addr = serve(AppState::new(Scripted(vec![Step::Delta("x")]))).await;

    let resp = reqwest::Client::new()
        .get(chat_url(addr, "hello"))
        .header("origin", "https://widget.example")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn health_probe_answers_ok() {
    let addr = serve(AppState::new(Scripted(vec![]))).await;

    let resp = reqwest::get(format!("http://{addr}/healthz")).await.unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn client_disconnect_releases_the_completion_stream() {
    let dropped = Arc::new(AtomicBool::new(false));
    let state = AppState::new(Hanging {
        dropped: Arc::clone(&dropped),
    })
    .with_keep_alive(Some(Duration::from_millis(20)));
    let addr = serve(state).await;

    let resp = reqwest::get(chat_url(addr, "hello")).await.unwrap();
    let mut body = resp.bytes_stream();
    let first = body.next().await.unwrap().unwrap();
    assert!(String::from_utf8_lossy(&first).contains("data: \"H\""));
    assert!(!dropped.load(Ordering::SeqCst));

    drop(body);

    tokio::time::timeout(Duration::from_secs(5), async {
        while !dropped.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("completion stream was not dropped after disconnect");
}

#[tokio::test]
async fn concurrent_sessions_do_not_interleave() {
    let addr = serve(AppState::new(Echo)).await;

    let (left, right) = tokio::join!(
        async {
            reqwest::get(chat_url(addr, "abc"))
                .await
                .unwrap()
                .text()
                .await
                .unwrap()
        },
        async {
            reqwest::get(chat_url(addr, "xyz"))
                .await
                .unwrap()
                .text()
                .await
                .unwrap()
        },
    );

    assert_eq!(left, "data: \"a\"\n\ndata: \"b\"\n\ndata: \"c\"\n\n");
    assert_eq!(right, "data: \"x\"\n\ndata: \"y\"\n\ndata: \"z\"\n\n");
}
