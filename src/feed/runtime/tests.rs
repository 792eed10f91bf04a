use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::feed::engine::types::{EngineEvent, FeedPhase};
use crate::feed::mock_client::{MockFeedApi, MockPushSource};
use crate::feed::push::envelope::PushEvent;
use crate::feed::runtime::{FeedConfig, FeedOrchestrator};
use crate::feed::types::{Post, PostId, ReactionKind, UserId};

// --- Helpers ---

fn fake_post(label: &str) -> Post {
    Post {
        id: PostId(Uuid::new_v4()),
        user_id: UserId(Uuid::new_v4()),
        content: format!("post {label}"),
        image_url: None,
        hobby_id: None,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        expires_at: Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap(),
        name: format!("user-{label}"),
        profile_pic_url: None,
        reaction_counts: HashMap::new(),
        comment_count: 0,
        comments: None,
    }
}

fn orchestrator(
    api: MockFeedApi,
    push: MockPushSource,
) -> FeedOrchestrator<MockFeedApi, MockPushSource> {
    FeedOrchestrator::new(api, push, FeedConfig::default())
}

// --- Tests ---

#[test]
fn bootstrap_reaches_ready() {
    let p1 = fake_post("1");
    let mut api = MockFeedApi::new();
    api.seed_snapshot(Ok(vec![p1.clone()]));

    let mut orch = orchestrator(api, MockPushSource::new());
    orch.process_engine(EngineEvent::Activated);
    orch.run_until_idle();

    let view = orch.view();
    assert_eq!(view.phase, FeedPhase::Ready);
    assert_eq!(view.posts.len(), 1);
    assert_eq!(view.posts[0].id, p1.id);
    assert_eq!(*orch.api_ref().snapshot_requests.lock().unwrap(), 1);
}

#[test]
fn bootstrap_stays_loading_until_snapshot_resolves() {
    // Nothing seeded: the snapshot request hangs forever.
    let mut orch = orchestrator(MockFeedApi::new(), MockPushSource::new());
    orch.process_engine(EngineEvent::Activated);
    orch.run_until_idle();

    let view = orch.view();
    assert_eq!(view.phase, FeedPhase::Loading);
    assert!(view.error.is_none());
}

#[test]
fn push_notification_drives_targeted_refresh_through_the_api() {
    let p1 = fake_post("1");
    let p2 = fake_post("2");
    let mut refreshed = p2.clone();
    refreshed.reaction_counts.insert(ReactionKind::Love, 9);

    let mut api = MockFeedApi::new();
    api.seed_snapshot(Ok(vec![p1.clone(), p2.clone()]));
    api.seed_post(p2.id, Ok(refreshed));

    let mut push = MockPushSource::new();
    push.push(PushEvent::NewReaction { post_id: p2.id });

    let mut orch = orchestrator(api, push);
    orch.process_engine(EngineEvent::Activated);
    orch.run_until_idle();

    let view = orch.view();
    assert_eq!(view.posts.len(), 2);
    assert_eq!(view.posts[1].reaction_counts.get(&ReactionKind::Love), Some(&9));
    assert_eq!(
        orch.api_ref().post_requests.lock().unwrap().as_slice(),
        &[p2.id]
    );
}

#[test]
fn pushed_post_is_prepended_through_the_pump() {
    let p1 = fake_post("1");
    let p3 = fake_post("3");

    let mut api = MockFeedApi::new();
    api.seed_snapshot(Ok(vec![p1.clone()]));

    let mut orch = orchestrator(api, MockPushSource::new());
    orch.process_engine(EngineEvent::Activated);
    orch.run_until_idle();

    orch.push_mut().push(PushEvent::NewPost(p3.clone()));
    orch.run_until_idle();

    let ids: Vec<PostId> = orch.view().posts.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![p3.id, p1.id]);
}

#[test]
fn subscribers_are_notified_once_per_transition() {
    let phases: Arc<Mutex<Vec<FeedPhase>>> = Arc::new(Mutex::new(Vec::new()));
    let seen = phases.clone();

    let mut api = MockFeedApi::new();
    api.seed_snapshot(Ok(vec![fake_post("1")]));

    let mut orch = orchestrator(api, MockPushSource::new());
    orch.subscribe(move |view| seen.lock().unwrap().push(view.phase));

    orch.process_engine(EngineEvent::Activated);
    orch.run_until_idle();

    // One notification for entering Loading, one for the snapshot landing.
    assert_eq!(*phases.lock().unwrap(), vec![FeedPhase::Loading, FeedPhase::Ready]);
}

#[test]
fn unsubscribed_observer_is_not_called_again() {
    let calls: Arc<Mutex<usize>> = Arc::new(Mutex::new(0));
    let seen = calls.clone();

    let mut api = MockFeedApi::new();
    api.seed_snapshot(Ok(vec![]));
    api.seed_snapshot(Ok(vec![fake_post("1")]));

    let mut orch = orchestrator(api, MockPushSource::new());
    let id = orch.subscribe(move |_| *seen.lock().unwrap() += 1);

    orch.process_engine(EngineEvent::Activated);
    orch.run_until_idle();
    let calls_before = *calls.lock().unwrap();

    orch.unsubscribe(id);
    orch.process_engine(EngineEvent::RefreshDue);
    orch.run_until_idle();

    assert_eq!(*calls.lock().unwrap(), calls_before);
}

#[test]
fn refresh_due_replaces_the_collection_wholesale() {
    let p1 = fake_post("1");
    let p2 = fake_post("2");

    let mut api = MockFeedApi::new();
    api.seed_snapshot(Ok(vec![p1.clone()]));
    api.seed_snapshot(Ok(vec![p2.clone()]));

    let mut orch = orchestrator(api, MockPushSource::new());
    orch.process_engine(EngineEvent::Activated);
    orch.run_until_idle();

    orch.process_engine(EngineEvent::RefreshDue);
    orch.run_until_idle();

    let ids: Vec<PostId> = orch.view().posts.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![p2.id], "old entries are not merged back in");
    assert_eq!(*orch.api_ref().snapshot_requests.lock().unwrap(), 2);
}

#[test]
fn failed_targeted_refresh_surfaces_nothing_to_observers() {
    let p1 = fake_post("1");

    let mut api = MockFeedApi::new();
    api.seed_snapshot(Ok(vec![p1.clone()]));
    api.seed_post(
        p1.id,
        Err(crate::feed::error::ApiError::NotFound(p1.id.to_string())),
    );

    let mut orch = orchestrator(api, MockPushSource::new());
    orch.process_engine(EngineEvent::Activated);
    orch.run_until_idle();
    let revision_before = orch.view().revision;

    orch.push_mut().push(PushEvent::NewComment { post_id: p1.id });
    orch.run_until_idle();

    let view = orch.view();
    assert_eq!(view.phase, FeedPhase::Ready);
    assert!(view.error.is_none());
    assert_eq!(view.revision, revision_before, "no notification for a no-op");
}

#[test]
fn deactivation_closes_the_push_channel() {
    let mut api = MockFeedApi::new();
    api.seed_snapshot(Ok(vec![]));

    let push = MockPushSource::new();
    let close_calls = push.close_calls.clone();

    let orch = orchestrator(api, push);
    let handle = orch.handle();

    // Stop before servicing: run() must still activate, then deactivate
    // cleanly and release the channel.
    handle.deactivate();
    orch.run();

    assert_eq!(*close_calls.lock().unwrap(), 1);
    assert!(!handle.is_active());
}
