
use chrono::{Duration, Utc};
use mock_transport::MockTransport;
use std::time::Duration as StdDuration;
use url::Url;
use vta_client::{
  AskOutcome, AssistantClient, Endpoints, Feedback, ResilientClient, RetryPolicy, Session,
  RATE_LIMIT_MESSAGE,
};

fn test_endpoints() -> Endpoints {
  Endpoints {
    answer_url: "https://assistant.test/answer".to_string(),
    feedback_url: "https://assistant.test/feedback".to_string(),
  }
}

/// Client over a scripted transport with backoff turned off so retry tests
/// run instantly.
fn test_client(transport: MockTransport) -> AssistantClient<MockTransport> {
  AssistantClient::with_transport(transport, &test_endpoints())
    .unwrap()
    .with_policy(RetryPolicy::default().with_backoff(StdDuration::ZERO))
}

/// Session with one answered question a moment ago: mean interval far below
/// the ten-second floor, so the limiter denies the next question.
fn throttled_session() -> Session {
  let mut session = Session::new();
  session.query_count = 1;
  session.started_at = Utc::now() - Duration::seconds(1);
  session
}

#[tokio::test]
async fn test_answered_question_increments_the_counter() {
  let transport = MockTransport::new();
  transport.push_reply(200, r#"{"answer": "Indexes trade write cost for read speed."}"#);

  let client = test_client(transport);
  let mut session = Session::new();

  match client.generate_answer(&mut session, "why use an index?").await {
    AskOutcome::Answered(answer) => {
      assert_eq!(answer.text, "Indexes trade write cost for read speed.");
      assert!(!answer.error);
      assert!(answer.evidence.is_empty());
    }
    other => panic!("expected an answer, got {other:?}"),
  }

  assert_eq!(session.query_count, 1);
}

#[tokio::test]
async fn test_rate_limited_question_makes_no_requests() {
  let transport = MockTransport::new();
  let log = transport.log();

  let client = test_client(transport);
  let mut session = throttled_session();

  match client.generate_answer(&mut session, "one more?").await {
    AskOutcome::RateLimited { message } => assert_eq!(message, RATE_LIMIT_MESSAGE),
    other => panic!("expected a rate-limit denial, got {other:?}"),
  }

  assert_eq!(log.count(), 0);
  assert_eq!(session.query_count, 1);
}

#[tokio::test]
async fn test_server_errors_exhaust_the_attempt_budget() {
  let transport = MockTransport::new();
  for _ in 0..3 {
    transport.push_reply(500, "internal error");
  }
  let log = transport.log();

  let client = test_client(transport);
  let mut session = Session::new();

  let outcome = client.generate_answer(&mut session, "anyone home?").await;
  assert!(matches!(outcome, AskOutcome::ServerUnavailable));
  assert_eq!(log.count(), 3);
  assert_eq!(session.query_count, 0);
}

#[tokio::test]
async fn test_transport_failure_then_success_recovers() {
  let transport = MockTransport::new();
  transport.push_failure("connection reset");
  transport.push_reply(200, r#"{"answer": "Recovered."}"#);
  let log = transport.log();

  let client = test_client(transport);
  let mut session = Session::new();

  let outcome = client.generate_answer(&mut session, "still there?").await;
  assert!(matches!(outcome, AskOutcome::Answered(_)));
  assert_eq!(log.count(), 2);
  assert_eq!(session.query_count, 1);
}

#[tokio::test]
async fn test_client_errors_fail_without_retry() {
  let transport = MockTransport::new();
  transport.push_reply(404, "no such route");
  let log = transport.log();

  let client = test_client(transport);
  let mut session = Session::new();

  let outcome = client.generate_answer(&mut session, "hello?").await;
  assert!(matches!(outcome, AskOutcome::ServerUnavailable));
  assert_eq!(log.count(), 1);
  assert_eq!(session.query_count, 0);
}

#[tokio::test]
async fn test_reply_without_answer_field_is_unavailable() {
  let transport = MockTransport::new();
  transport.push_reply(200, "{}");

  let client = test_client(transport);
  let mut session = Session::new();

  let outcome = client.generate_answer(&mut session, "what is normalization?").await;
  assert!(matches!(outcome, AskOutcome::ServerUnavailable));
  assert_eq!(session.query_count, 0);
}

#[tokio::test]
async fn test_remote_error_answer_propagates_verbatim() {
  let transport = MockTransport::new();
  transport.push_reply(200, r#"{"answer": "I cannot answer that question.", "error": true}"#);

  let client = test_client(transport);
  let mut session = Session::new();

  match client.generate_answer(&mut session, "off-topic?").await {
    AskOutcome::Answered(answer) => {
      assert!(answer.error);
      assert_eq!(answer.text, "I cannot answer that question.");
    }
    other => panic!("expected a flagged answer, got {other:?}"),
  }

  assert_eq!(session.query_count, 1);
}

#[tokio::test]
async fn test_question_and_user_id_ride_the_query_string() {
  let transport = MockTransport::new();
  transport.push_reply(200, r#"{"answer": "ok"}"#);
  let log = transport.log();

  let client = test_client(transport);
  let mut session = Session::new();

  client.generate_answer(&mut session, "what is a join").await;

  let urls = log.urls();
  assert_eq!(urls.len(), 1);
  assert!(urls[0].starts_with("https://assistant.test/answer?"));
  assert!(urls[0].contains("question=what+is+a+join"));
  assert!(urls[0].contains(&format!("user_id={}", session.user_id)));
}

#[tokio::test]
async fn test_evidence_rides_along_with_the_answer() {
  let transport = MockTransport::new();
  transport.push_reply(
    200,
    r#"{
      "answer": "See the lecture on indexing.",
      "result": {
        "selected_documents": [
          {"score": 0.9, "metadata": {"video": "lec04", "start": 120.0}},
          {"score": 0.7, "metadata": {"video": "lec05", "start": 30.5}}
        ]
      }
    }"#,
  );

  let client = test_client(transport);
  let mut session = Session::new();

  match client.generate_answer(&mut session, "where is this covered?").await {
    AskOutcome::Answered(answer) => {
      assert_eq!(answer.evidence.len(), 2);
      assert_eq!(answer.evidence[0].metadata.video, "lec04");
    }
    other => panic!("expected an answer, got {other:?}"),
  }
}

#[tokio::test]
async fn test_feedback_always_carries_the_user_id() {
  let transport = MockTransport::new();
  transport.push_reply(200, "stored");
  let log = transport.log();

  let client = test_client(transport);
  let session = Session::new();

  let sent = client.register_feedback(&session, &Feedback::approved("q", "a")).await;
  assert!(sent);

  let urls = log.urls();
  assert_eq!(urls.len(), 1);
  assert!(urls[0].starts_with("https://assistant.test/feedback?"));
  assert!(urls[0].contains("approved=True"));
  assert!(urls[0].contains(&format!("user_id={}", session.user_id)));
}

#[tokio::test]
async fn test_improved_feedback_sends_the_replacement_text() {
  let transport = MockTransport::new();
  transport.push_reply(200, "stored");
  let log = transport.log();

  let client = test_client(transport);
  let session = Session::new();

  client.register_feedback(&session, &Feedback::improved("q", "a", "a clearer answer")).await;

  let urls = log.urls();
  assert!(urls[0].contains("improved=a+clearer+answer"));
  assert!(!urls[0].contains("approved="));
}

#[tokio::test]
async fn test_feedback_failure_is_absorbed_not_raised() {
  let transport = MockTransport::new();
  for _ in 0..3 {
    transport.push_reply(500, "write failed");
  }
  let log = transport.log();

  let client = test_client(transport);
  let session = Session::new();

  let sent = client.register_feedback(&session, &Feedback::approved("q", "a")).await;
  assert!(!sent);
  assert_eq!(log.count(), 3);
}

#[tokio::test]
async fn test_login_returns_the_endpoint_pair() {
  let transport = MockTransport::new();
  transport.push_reply(
    200,
    r#"{"answer_url": "https://assistant.test/answer", "feedback_url": "https://assistant.test/feedback"}"#,
  );
  let log = transport.log();

  let http = ResilientClient::new(transport);
  let login_url = Url::parse("https://assistant.test/login").unwrap();

  let endpoints = vta_client::login(&http, &login_url, "hunter2").await.unwrap();
  assert_eq!(endpoints.answer_url, "https://assistant.test/answer");
  assert_eq!(endpoints.feedback_url, "https://assistant.test/feedback");
  assert!(log.urls()[0].contains("password=hunter2"));
}

#[tokio::test]
async fn test_login_rejection_surfaces_the_message() {
  let transport = MockTransport::new();
  transport.push_reply(200, r#"{"error": "wrong password"}"#);

  let http = ResilientClient::new(transport);
  let login_url = Url::parse("https://assistant.test/login").unwrap();

  let error = vta_client::login(&http, &login_url, "guess").await.unwrap_err();
  assert!(error.to_string().contains("wrong password"));
}
