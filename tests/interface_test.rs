//! End-to-end behaviour of `LlmInterface` over a stub adapter.

mod support;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use support::{StubAdapter, stub_interface, stub_registry};
use unillm::{
    CallOptions, ChatMessage, ChatResponse, Conversation, InterfaceOptions, LlmError,
    LlmInterface, ManualClock, MessagePolicy, MessageRole, ResponseCache, collect_text,
};

const FIFTY_CHARS: &str = "Gravity pulls masses toward each other, always....";

#[tokio::test]
async fn prompt_round_trip_returns_adapter_text() {
    assert_eq!(FIFTY_CHARS.len(), 50);
    let stub = Arc::new(StubAdapter::replying(FIFTY_CHARS));
    let llm = stub_interface(stub.clone());

    let response = llm
        .send_message(
            "stub",
            "Explain gravity",
            CallOptions::new().with_max_tokens(100),
            InterfaceOptions::new(),
        )
        .await
        .unwrap();

    assert_eq!(response, ChatResponse::Text(FIFTY_CHARS.to_string()));
    assert_eq!(stub.calls(), 1);

    let sent = stub.last_request().unwrap();
    assert_eq!(sent.model(), "stub-default");
    assert_eq!(sent.max_tokens(), 100);
    assert_eq!(sent.messages(), &[ChatMessage::user("Explain gravity")]);
}

#[tokio::test]
async fn cache_hit_skips_the_adapter() {
    let stub = Arc::new(StubAdapter::replying("cached answer"));
    let llm = stub_interface(stub.clone());

    let first = llm
        .send_message("stub", "hi", CallOptions::new(), 60_u64)
        .await
        .unwrap();
    let second = llm
        .send_message("stub", "hi", CallOptions::new(), 60_u64)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(stub.calls(), 1);
    assert_eq!(llm.cache().len().await, 1);
}

#[tokio::test]
async fn different_options_are_different_cache_entries() {
    let stub = Arc::new(StubAdapter::replying("answer"));
    let llm = stub_interface(stub.clone());

    llm.send_message("stub", "hi", CallOptions::new(), 60_u64)
        .await
        .unwrap();
    llm.send_message("stub", "hi", CallOptions::new().with_temperature(0.1), 60_u64)
        .await
        .unwrap();

    assert_eq!(stub.calls(), 2);
}

#[tokio::test]
async fn expired_entry_triggers_a_fresh_call() {
    let clock = Arc::new(ManualClock::new());
    let stub = Arc::new(StubAdapter::replying("answer"));
    let llm = stub_interface(stub.clone())
        .with_cache(ResponseCache::new().with_clock(clock.clone()));

    llm.send_message("stub", "hi", CallOptions::new(), 60_u64)
        .await
        .unwrap();

    clock.advance(Duration::from_secs(60));
    llm.send_message("stub", "hi", CallOptions::new(), 60_u64)
        .await
        .unwrap();
    assert_eq!(stub.calls(), 1, "entry is still live at exactly the TTL");

    clock.advance(Duration::from_secs(1));
    llm.send_message("stub", "hi", CallOptions::new(), 60_u64)
        .await
        .unwrap();
    assert_eq!(stub.calls(), 2);
}

#[tokio::test]
async fn unbounded_ttl_is_cached_forever() {
    let clock = Arc::new(ManualClock::new());
    let stub = Arc::new(StubAdapter::replying("forever"));
    let llm = stub_interface(stub.clone())
        .with_cache(ResponseCache::new().with_clock(clock.clone()));

    let first = llm
        .send_message("stub", "hi", CallOptions::new(), u64::MAX)
        .await
        .unwrap();
    clock.advance(Duration::from_secs(10 * 365 * 24 * 3600));
    let second = llm
        .send_message("stub", "hi", CallOptions::new(), u64::MAX)
        .await
        .unwrap();

    assert_eq!(first.text(), Some("forever"));
    assert_eq!(first, second);
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn caching_is_off_without_a_timeout() {
    let stub = Arc::new(StubAdapter::replying("answer"));
    let llm = stub_interface(stub.clone());

    for _ in 0..3 {
        llm.send_message("stub", "hi", CallOptions::new(), InterfaceOptions::new())
            .await
            .unwrap();
    }
    assert_eq!(stub.calls(), 3);
    assert!(llm.cache().is_empty().await);
}

#[tokio::test]
async fn cache_is_shared_between_clones() {
    let stub = Arc::new(StubAdapter::replying("answer"));
    let llm = stub_interface(stub.clone());
    let other = llm.clone();

    llm.send_message("stub", "hi", CallOptions::new(), 60_u64)
        .await
        .unwrap();
    other
        .send_message("stub", "hi", CallOptions::new(), 60_u64)
        .await
        .unwrap();
    assert_eq!(stub.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn transient_failures_are_retried() {
    let stub = Arc::new(
        StubAdapter::replying("finally").failing_first(2, LlmError::api_error(503, "busy")),
    );
    let llm = stub_interface(stub.clone());

    let response = llm
        .send_message(
            "stub",
            "hi",
            CallOptions::new(),
            InterfaceOptions::new().with_retry_attempts(2),
        )
        .await
        .unwrap();

    assert_eq!(response.text(), Some("finally"));
    assert_eq!(stub.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_surface_the_last_error() {
    let stub = Arc::new(
        StubAdapter::replying("never").failing_first(u32::MAX, LlmError::api_error(500, "down")),
    );
    let llm = stub_interface(stub.clone());

    let err = llm
        .send_message(
            "stub",
            "hi",
            CallOptions::new(),
            InterfaceOptions::new().with_retry_attempts(3),
        )
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    assert_eq!(stub.calls(), 4);
}

#[tokio::test]
async fn failures_are_not_cached() {
    let stub = Arc::new(
        StubAdapter::replying("ok").failing_first(1, LlmError::HttpError("reset".into())),
    );
    let llm = stub_interface(stub.clone());

    assert!(
        llm.send_message("stub", "hi", CallOptions::new(), 60_u64)
            .await
            .is_err()
    );
    let response = llm
        .send_message("stub", "hi", CallOptions::new(), 60_u64)
        .await
        .unwrap();

    assert_eq!(response.text(), Some("ok"));
    assert_eq!(stub.calls(), 2);
}

#[tokio::test]
async fn configuration_errors_are_not_retried() {
    let stub = Arc::new(
        StubAdapter::replying("ok")
            .failing_first(1, LlmError::ConfigurationError("bad base url".into())),
    );
    let llm = stub_interface(stub.clone());

    let err = llm
        .send_message(
            "stub",
            "hi",
            CallOptions::new(),
            InterfaceOptions::new().with_retry_attempts(5),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::ConfigurationError(_)));
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn unknown_provider_fails_before_any_call() {
    let stub = Arc::new(StubAdapter::replying("ok"));
    let llm = stub_interface(stub.clone());

    let err = llm
        .send_message(
            "nonexistent",
            "hi",
            CallOptions::new(),
            InterfaceOptions::new().with_retry_attempts(3),
        )
        .await
        .unwrap_err();

    match err {
        LlmError::ConfigurationError(message) => {
            assert!(message.contains("nonexistent"));
            assert!(message.contains("stub"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn invalid_options_are_rejected_before_any_call() {
    let stub = Arc::new(StubAdapter::replying("ok"));
    let llm = stub_interface(stub.clone());

    let err = llm
        .send_message(
            "stub",
            "hi",
            CallOptions::new().with_temperature(7.5),
            InterfaceOptions::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::InvalidParameter(_)));
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn json_object_output_is_parsed() {
    let stub = Arc::new(StubAdapter::replying("[1, 2, 3]"));
    let llm = stub_interface(stub.clone());

    let response = llm
        .send_message("stub", "primes?", CallOptions::new().json_object(), 60_u64)
        .await
        .unwrap();

    assert_eq!(response.structured(), Some(&json!([1, 2, 3])));
}

#[tokio::test]
async fn unparseable_json_output_is_absent_and_uncached() {
    let stub = Arc::new(StubAdapter::replying("Sure! Here is some JSON: {oops"));
    let llm = stub_interface(stub.clone());

    for _ in 0..2 {
        let response = llm
            .send_message("stub", "json please", CallOptions::new().json_object(), 60_u64)
            .await
            .unwrap();
        assert_eq!(response, ChatResponse::Structured(None));
    }
    assert_eq!(stub.calls(), 2);
}

#[tokio::test]
async fn empty_text_is_not_cached() {
    let stub = Arc::new(StubAdapter::replying(""));
    let llm = stub_interface(stub.clone());

    llm.send_message("stub", "hi", CallOptions::new(), 60_u64)
        .await
        .unwrap();
    llm.send_message("stub", "hi", CallOptions::new(), 60_u64)
        .await
        .unwrap();
    assert_eq!(stub.calls(), 2);
}

#[tokio::test]
async fn conversation_model_pin_wins_over_options() {
    let stub = Arc::new(StubAdapter::replying("ok"));
    let llm = stub_interface(stub.clone());

    let conversation = Conversation::new(vec![ChatMessage::user("hi")]).with_model("large");
    llm.send_message(
        "stub",
        conversation,
        CallOptions::new().with_model("explicit-model"),
        InterfaceOptions::new(),
    )
    .await
    .unwrap();

    assert_eq!(stub.last_request().unwrap().model(), "stub-large");
}

#[tokio::test]
async fn strict_adapters_receive_alternating_turns() {
    let stub = Arc::new(StubAdapter::replying("ok").with_policy(MessagePolicy::strict()));
    let llm = stub_interface(stub.clone());

    let conversation = Conversation::new(vec![
        ChatMessage::system("Answer in French."),
        ChatMessage::user("hi"),
        ChatMessage::assistant("salut"),
        ChatMessage::user("again"),
    ]);
    llm.send_message("stub", conversation, CallOptions::new(), InterfaceOptions::new())
        .await
        .unwrap();

    let sent = stub.last_request().unwrap();
    let roles: Vec<MessageRole> = sent.messages().iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        [
            MessageRole::User,
            MessageRole::Assistant,
            MessageRole::User,
            MessageRole::Assistant,
            MessageRole::User,
        ]
    );
    assert_eq!(sent.messages()[0].content, "Hello");
}

#[tokio::test]
async fn empty_conversation_is_invalid_input() {
    let stub = Arc::new(StubAdapter::replying("ok"));
    let llm = stub_interface(stub.clone());

    let err = llm
        .send_message("stub", Vec::<ChatMessage>::new(), CallOptions::new(), InterfaceOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::InvalidInput(_)));
}

#[tokio::test]
async fn streaming_yields_deltas_and_bypasses_the_cache() {
    let stub = Arc::new(StubAdapter::replying("one two three"));
    let llm = stub_interface(stub.clone());

    for _ in 0..2 {
        let stream = llm
            .stream_message("stub", "count", CallOptions::new(), 60_u64)
            .await
            .unwrap();
        assert_eq!(collect_text(stream).await.unwrap(), "one two three");
    }
    assert_eq!(stub.calls(), 2);
    assert!(llm.cache().is_empty().await);
}

#[tokio::test]
async fn config_accessors_read_the_registry_table() {
    let llm = LlmInterface::new(stub_registry(Arc::new(StubAdapter::replying("ok"))));

    assert_eq!(
        llm.model_by_alias("stub", "large").as_deref(),
        Some("stub-large")
    );
    assert_eq!(
        llm.config_value("stub", "model.default"),
        Some(json!("stub-default"))
    );
    assert_eq!(llm.provider_names(), vec!["stub"]);
    assert_eq!(llm.model_by_alias("missing", "default"), None);
}
