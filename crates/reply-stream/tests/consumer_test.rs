//! Stream consumption: accumulation, extraction, cancellation and failures.

use std::io;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use reply_core::ReplyError;
use reply_stream::{consume, StreamOutcome, GENERIC_STREAM_ERROR};
use tokio_util::sync::CancellationToken;

fn chunks(parts: &[&'static str]) -> impl futures::Stream<Item = io::Result<&'static str>> + Unpin {
    stream::iter(parts.iter().map(|p| Ok(*p)).collect::<Vec<_>>())
}

async fn completed(parts: &[&'static str]) -> (String, Vec<String>) {
    match consume(chunks(parts), &CancellationToken::new()).await.unwrap() {
        StreamOutcome::Completed { text, replies } => {
            (text, replies.into_iter().map(|r| r.text).collect())
        }
        StreamOutcome::Cancelled => panic!("unexpected cancellation"),
    }
}

#[tokio::test]
async fn test_deltas_accumulate_and_replies_extracted() {
    let parts = [
        "data: {\"type\":\"text\",\"content\":\"Hel\"}\n",
        "data: {\"type\":\"text\",\"content\":\"lo\"}\n",
        "data: {\"type\":\"text\",\"content\":\"[\\\"A\\\",\\\"B\\\",\\\"C\\\"]\"}\n",
        "data: [DONE]\n",
    ];
    let outcome = consume(chunks(&parts), &CancellationToken::new()).await.unwrap();
    let StreamOutcome::Completed { text, replies } = outcome else {
        panic!("expected completion");
    };
    assert_eq!(text, r#"Hello["A","B","C"]"#);
    let summary: Vec<(usize, &str)> = replies.iter().map(|r| (r.index, r.text.as_str())).collect();
    assert_eq!(summary, vec![(0, "A"), (1, "B"), (2, "C")]);
}

#[tokio::test]
async fn test_content_event_replaces() {
    let (text, replies) = completed(&[
        "data: {\"type\":\"content\",\"content\":\"x\"}\n\n",
        "data: {\"type\":\"content\",\"content\":\"y\"}\n\n",
    ])
    .await;
    assert_eq!(text, "y");
    assert!(replies.is_empty());
}

#[tokio::test]
async fn test_line_split_across_chunks() {
    let (text, _) = completed(&[
        "data: {\"type\":\"te",
        "xt\",\"content\":\"split\"}\n",
        "data: {\"type\":\"text\",\"content\":\"!\"}",
    ])
    .await;
    assert_eq!(text, "split!");
}

#[tokio::test]
async fn test_raw_payload_appended_and_broken_object_skipped() {
    let (text, _) = completed(&[
        "data: raw words\n",
        "data: {\"type\":\"text\",\"content\n",
        "data: {\"type\":\"text\",\"content\":\" ok\"}\n",
    ])
    .await;
    assert_eq!(text, "raw words ok");
}

#[tokio::test]
async fn test_more_than_three_replies_truncated() {
    let (_, replies) = completed(&[
        "data: {\"type\":\"content\",\"content\":\"[\\\"1\\\",\\\"2\\\",\\\"3\\\",\\\"4\\\"]\"}\n",
    ])
    .await;
    assert_eq!(replies, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_unparseable_text_yields_no_replies() {
    let (text, replies) = completed(&["data: {\"type\":\"text\",\"content\":\"Sorry, I can't\"}\n"]).await;
    assert_eq!(text, "Sorry, I can't");
    assert!(replies.is_empty());
}

#[tokio::test]
async fn test_error_event_surfaces_message() {
    let err = consume(
        chunks(&[
            "data: {\"type\":\"text\",\"content\":\"[\\\"A\\\"]\"}\n",
            "data: {\"type\":\"error\",\"error\":\"Rate limit exceeded\"}\n",
        ]),
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ReplyError::Upstream(ref m) if m == "Rate limit exceeded"));
    assert_eq!(err.to_string(), "Rate limit exceeded");
}

#[tokio::test]
async fn test_error_event_without_message_uses_generic() {
    let err = consume(chunks(&["data: {\"type\":\"error\"}\n"]), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), GENERIC_STREAM_ERROR);
}

#[tokio::test]
async fn test_read_failure_is_transport_error() {
    let body = stream::iter(vec![
        Ok("data: {\"type\":\"text\",\"content\":\"a\"}\n"),
        Err(io::Error::other("connection reset")),
    ]);
    let err = consume(body, &CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, ReplyError::Transport(ref m) if m.contains("connection reset")));
}

#[tokio::test]
async fn test_cancel_mid_stream_is_silent_and_empty() {
    let body = chunks(&["data: {\"type\":\"text\",\"content\":\"[\\\"A\\\",\\\"B\\\"]\"}\n"])
        .chain(stream::pending());
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });
    let outcome = consume(body, &token).await.unwrap();
    assert_eq!(outcome, StreamOutcome::Cancelled);
}

#[tokio::test]
async fn test_cancelled_before_start_reads_nothing() {
    let token = CancellationToken::new();
    token.cancel();
    let outcome = consume(chunks(&["data: {\"type\":\"error\"}\n"]), &token)
        .await
        .unwrap();
    assert_eq!(outcome, StreamOutcome::Cancelled);
}
