use serde::Deserialize;
use serde_json::Value;

use crate::feed::types::{Post, PostId};

/// Typed push event, decoded from the `{type, data}` wire envelope.
#[derive(Debug, Clone)]
pub enum PushEvent {
    /// Full record of a genuinely new post.
    NewPost(Post),
    /// Activity reference only; the payload carries no content and the
    /// consumer must re-fetch the post.
    NewComment { post_id: PostId },
    NewReaction { post_id: PostId },
    DeletePost { post_id: PostId },
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    data: Value,
}

#[derive(Deserialize)]
struct PostRef {
    post_id: PostId,
}

/// Decodes one wire message.
///
/// `Ok(None)` means the event kind is unrecognized and must be ignored
/// (forward-compatibility policy).
pub fn decode(raw: &str) -> Result<Option<PushEvent>, serde_json::Error> {
    let envelope: Envelope = serde_json::from_str(raw)?;
    let event = match envelope.kind.as_str() {
        "new_post" => PushEvent::NewPost(serde_json::from_value(envelope.data)?),
        "new_comment" => {
            let r: PostRef = serde_json::from_value(envelope.data)?;
            PushEvent::NewComment { post_id: r.post_id }
        }
        "new_reaction" => {
            let r: PostRef = serde_json::from_value(envelope.data)?;
            PushEvent::NewReaction { post_id: r.post_id }
        }
        "delete_post" => {
            let r: PostRef = serde_json::from_value(envelope.data)?;
            PushEvent::DeletePost { post_id: r.post_id }
        }
        _ => return Ok(None),
    };
    Ok(Some(event))
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST_JSON: &str = r#"{
        "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
        "user_id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
        "content": "first climb of the season",
        "image_url": null,
        "hobby_id": null,
        "created_at": "2024-05-01T12:00:00Z",
        "expires_at": "2024-05-02T12:00:00Z",
        "name": "ada",
        "profile_pic_url": null,
        "reaction_counts": {"like": 2},
        "comment_count": 1,
        "comments": null
    }"#;

    #[test]
    fn decodes_new_post_with_full_record() {
        let raw = format!(r#"{{"type":"new_post","data":{POST_JSON}}}"#);
        let event = decode(&raw).unwrap().unwrap();
        match event {
            PushEvent::NewPost(post) => {
                assert_eq!(post.name, "ada");
                assert_eq!(post.comment_count, 1);
                assert_eq!(
                    post.reaction_counts.get(&crate::feed::types::ReactionKind::Like),
                    Some(&2)
                );
            }
            other => panic!("expected new_post, got {other:?}"),
        }
    }

    #[test]
    fn decodes_reference_only_events() {
        let raw = r#"{"type":"new_comment","data":{"post_id":"7c9e6679-7425-40de-944b-e07fc1f90ae7"}}"#;
        assert!(matches!(
            decode(raw).unwrap().unwrap(),
            PushEvent::NewComment { .. }
        ));

        let raw = r#"{"type":"new_reaction","data":{"post_id":"7c9e6679-7425-40de-944b-e07fc1f90ae7"}}"#;
        assert!(matches!(
            decode(raw).unwrap().unwrap(),
            PushEvent::NewReaction { .. }
        ));

        let raw = r#"{"type":"delete_post","data":{"post_id":"7c9e6679-7425-40de-944b-e07fc1f90ae7"}}"#;
        assert!(matches!(
            decode(raw).unwrap().unwrap(),
            PushEvent::DeletePost { .. }
        ));
    }

    #[test]
    fn unknown_kind_is_ignored() {
        let raw = r#"{"type":"rsvp_update","data":{"event_id":"x"}}"#;
        assert!(decode(raw).unwrap().is_none());
    }

    #[test]
    fn malformed_message_is_an_error() {
        assert!(decode("not json").is_err());
        // Known kind with a payload missing its reference is an error, not
        // an ignorable unknown.
        assert!(decode(r#"{"type":"new_comment","data":{}}"#).is_err());
    }
}
