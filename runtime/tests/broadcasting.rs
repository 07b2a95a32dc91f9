//! Integration tests for Store action broadcasting
//!
//! Callers correlate a command with its response by waiting on the broadcast
//! channel for an action carrying the same request id.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use std::time::Duration;
use todosync_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use todosync_runtime::{Store, StoreConfig, StoreError};

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum TestAction {
    /// Ask the "service" to store `value` after `delay_ms`
    Request { id: u64, value: u32, delay_ms: u64 },
    /// The service accepted the request
    Stored { id: u64, value: u32 },
    /// The service rejected the request
    Rejected { id: u64 },
    /// Local change, no effect
    Bump,
}

impl TestAction {
    const fn response_id(&self) -> Option<u64> {
        match self {
            Self::Stored { id, .. } | Self::Rejected { id } => Some(*id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct TestState {
    stored: Vec<u32>,
    pending: Vec<u64>,
    bumps: u32,
}

#[derive(Clone)]
struct TestEnvironment;

#[derive(Clone)]
struct TestReducer;

impl Reducer for TestReducer {
    type State = TestState;
    type Action = TestAction;
    type Environment = TestEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TestAction::Request { id, value, delay_ms } => {
                state.pending.push(id);
                smallvec![Effect::future(async move {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    if value == 0 {
                        Some(TestAction::Rejected { id })
                    } else {
                        Some(TestAction::Stored { id, value })
                    }
                })]
            },
            TestAction::Stored { id, value } => {
                state.pending.retain(|p| *p != id);
                state.stored.push(value);
                SmallVec::new()
            },
            TestAction::Rejected { id } => {
                state.pending.retain(|p| *p != id);
                SmallVec::new()
            },
            TestAction::Bump => {
                state.bumps += 1;
                SmallVec::new()
            },
        }
    }
}

fn store() -> Store<TestState, TestAction, TestEnvironment, TestReducer> {
    Store::new(TestState::default(), TestReducer, TestEnvironment)
}

fn request(id: u64, value: u32, delay_ms: u64) -> TestAction {
    TestAction::Request { id, value, delay_ms }
}

// ============================================================================
// Tests
// ============================================================================

/// The response is already applied when the waiter wakes up
#[tokio::test]
async fn test_response_is_applied_before_broadcast() {
    let store = store();

    let response = store
        .send_and_wait_for(
            request(1, 7, 0),
            |action| action.response_id() == Some(1),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

    assert_eq!(response, TestAction::Stored { id: 1, value: 7 });
    let state = store.state(Clone::clone).await;
    assert_eq!(state.stored, vec![7]);
    assert!(state.pending.is_empty());
}

/// Concurrent waiters each get their own response, whatever the order
#[tokio::test]
async fn test_concurrent_requests_are_correlated() {
    let store = store();

    let slow = store.send_and_wait_for(
        request(1, 10, 40),
        |action| action.response_id() == Some(1),
        Duration::from_secs(1),
    );
    let fast = store.send_and_wait_for(
        request(2, 0, 0),
        |action| action.response_id() == Some(2),
        Duration::from_secs(1),
    );

    let (slow, fast) = tokio::join!(slow, fast);

    assert_eq!(slow.unwrap(), TestAction::Stored { id: 1, value: 10 });
    assert_eq!(fast.unwrap(), TestAction::Rejected { id: 2 });
    assert_eq!(store.state(|s| s.stored.clone()).await, vec![10]);
}

/// Waiting gives up after the timeout, but the effect still completes
#[tokio::test]
async fn test_wait_timeout_does_not_cancel_effect() {
    let store = store();

    let result = store
        .send_and_wait_for(
            request(1, 3, 50),
            |action| action.response_id() == Some(1),
            Duration::from_millis(5),
        )
        .await;
    assert!(matches!(result, Err(StoreError::Timeout)));

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(store.state(|s| s.stored.clone()).await, vec![3]);
}

/// Only effect-produced actions are broadcast
#[tokio::test]
async fn test_subscribers_see_effect_actions_only() {
    let store = store();
    let mut rx = store.subscribe_actions();

    store.send(TestAction::Bump).await.unwrap();
    let mut handle = store.send(request(5, 1, 0)).await.unwrap();
    handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

    let received = rx.recv().await.unwrap();
    assert_eq!(received, TestAction::Stored { id: 5, value: 1 });
    assert!(rx.try_recv().is_err());
}

/// Multiple subscribers each receive every broadcast
#[tokio::test]
async fn test_multiple_subscribers() {
    let store = Store::with_config(
        TestState::default(),
        TestReducer,
        TestEnvironment,
        &StoreConfig::default().with_broadcast_capacity(8),
    );
    let mut first = store.subscribe_actions();
    let mut second = store.subscribe_actions();

    let mut handle = store.send(request(9, 2, 0)).await.unwrap();
    handle.wait().await;

    assert_eq!(first.recv().await.unwrap(), TestAction::Stored { id: 9, value: 2 });
    assert_eq!(second.recv().await.unwrap(), TestAction::Stored { id: 9, value: 2 });
}

/// Waiting after shutdown fails fast instead of timing out
#[tokio::test]
async fn test_wait_after_shutdown_is_rejected() {
    let store = store();
    store.shutdown(Duration::from_secs(1)).await.unwrap();

    let result = store
        .send_and_wait_for(request(1, 1, 0), |_| true, Duration::from_secs(1))
        .await;
    assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
}
