use crate::feed::engine::state::{EngineState, Lifecycle};
use crate::feed::engine::types::EngineCommand;
use crate::feed::error::ApiError;
use crate::feed::push::envelope::PushEvent;
use crate::feed::types::{Hobby, Post, PostId};

pub fn on_activated(state: &mut EngineState) -> Vec<EngineCommand> {
    if state.lifecycle != Lifecycle::Uninitialized {
        log::debug!("[ENGINE] activate ignored in {:?}", state.lifecycle);
        return Vec::new();
    }

    log::info!("[ENGINE] activating: requesting snapshot + hobby catalog");
    state.lifecycle = Lifecycle::Loading;
    state.touch();

    vec![EngineCommand::FetchSnapshot, EngineCommand::FetchHobbies]
}

pub fn on_snapshot_loaded(state: &mut EngineState, posts: Vec<Post>) -> Vec<EngineCommand> {
    match state.lifecycle {
        Lifecycle::Loading | Lifecycle::Ready | Lifecycle::Error => {
            log::info!("[ENGINE] snapshot applied: {} posts", posts.len());
            // Wholesale replacement: displayed order after a snapshot is
            // exactly the server order, never a client-side merge.
            state.posts = posts;
            state.error = None;
            state.lifecycle = Lifecycle::Ready;
            state.touch();
        }
        _ => log::debug!("[ENGINE] snapshot discarded in {:?}", state.lifecycle),
    }
    Vec::new()
}

pub fn on_snapshot_failed(state: &mut EngineState, error: &ApiError) -> Vec<EngineCommand> {
    match state.lifecycle {
        // Initial fetch: blocking condition for the presentation layer.
        Lifecycle::Loading => {
            log::warn!("[ENGINE] initial snapshot failed: {error}");
            state.error = Some(error.to_string());
            state.lifecycle = Lifecycle::Error;
            state.touch();
        }
        // Scheduled re-fetch: keep last-known-good, diagnostic only.
        Lifecycle::Ready => {
            log::warn!("[ENGINE] scheduled snapshot failed (keeping current feed): {error}");
        }
        _ => {}
    }
    Vec::new()
}

pub fn on_refresh_due(state: &mut EngineState) -> Vec<EngineCommand> {
    if state.lifecycle == Lifecycle::Ready {
        log::debug!("[ENGINE] staleness backstop: requesting snapshot");
        vec![EngineCommand::FetchSnapshot]
    } else {
        Vec::new()
    }
}

pub fn on_push(state: &mut EngineState, event: PushEvent) -> Vec<EngineCommand> {
    if state.lifecycle != Lifecycle::Ready {
        log::debug!("[ENGINE] push event dropped in {:?}", state.lifecycle);
        return Vec::new();
    }

    match event {
        PushEvent::NewPost(post) => {
            // Upstream delivers each post id at most once; genuinely-new
            // posts only, so no dedup against ids already present.
            log::debug!("[ENGINE] new_post {} prepended", post.id);
            state.posts.insert(0, post);
            state.touch();
            Vec::new()
        }
        PushEvent::NewComment { post_id } | PushEvent::NewReaction { post_id } => {
            // Payload carries no content; re-fetch and replace in place.
            log::debug!("[ENGINE] activity on {post_id}: targeted refresh");
            vec![EngineCommand::FetchPost(post_id)]
        }
        PushEvent::DeletePost { post_id } => {
            let before = state.posts.len();
            state.posts.retain(|p| p.id != post_id);
            if state.posts.len() != before {
                log::debug!("[ENGINE] delete_post {post_id} removed");
                state.touch();
            }
            // Absence is not an error; redelivery is a no-op.
            Vec::new()
        }
    }
}

pub fn on_post_refreshed(state: &mut EngineState, post: Post) -> Vec<EngineCommand> {
    if state.lifecycle != Lifecycle::Ready {
        log::debug!("[ENGINE] refresh result dropped in {:?}", state.lifecycle);
        return Vec::new();
    }

    // Replace in place, preserving position. A post deleted in the meantime
    // is not reinstated.
    if let Some(slot) = state.posts.iter_mut().find(|p| p.id == post.id) {
        log::debug!("[ENGINE] post {} refreshed in place", post.id);
        *slot = post;
        state.touch();
    } else {
        log::debug!("[ENGINE] refreshed post {} no longer in feed", post.id);
    }
    Vec::new()
}

pub fn on_post_refresh_failed(_: &EngineState, id: PostId, error: &ApiError) -> Vec<EngineCommand> {
    // Non-fatal: the entry keeps its last-known-good content.
    log::warn!("[ENGINE] targeted refresh of {id} failed: {error}");
    Vec::new()
}

pub fn on_hobbies_loaded(state: &mut EngineState, hobbies: Vec<Hobby>) -> Vec<EngineCommand> {
    if state.lifecycle == Lifecycle::Closed {
        return Vec::new();
    }

    log::debug!("[ENGINE] hobby catalog loaded: {} entries", hobbies.len());
    state.hobby_names = hobbies.into_iter().map(|h| (h.id, h.name)).collect();
    state.touch();
    Vec::new()
}

pub fn on_hobbies_failed(_: &EngineState, error: &ApiError) -> Vec<EngineCommand> {
    // Display-only lookup; posts still render with fallback names.
    log::warn!("[ENGINE] hobby catalog fetch failed: {error}");
    Vec::new()
}

pub fn on_deactivated(state: &mut EngineState) -> Vec<EngineCommand> {
    if state.lifecycle == Lifecycle::Closed {
        return Vec::new();
    }

    log::info!("[ENGINE] closed; discarding {} posts", state.posts.len());
    state.lifecycle = Lifecycle::Closed;
    state.posts.clear();
    state.error = None;
    state.touch();
    Vec::new()
}
