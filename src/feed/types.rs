use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable, opaque post identity. Identical across snapshot and push
/// representations of the same post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PostId(pub Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommentId(pub Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HobbyId(pub Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for HobbyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Closed set of response tags applicable to a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Love,
    Fire,
    Laugh,
    Sad,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 5] = [
        ReactionKind::Like,
        ReactionKind::Love,
        ReactionKind::Fire,
        ReactionKind::Laugh,
        ReactionKind::Sad,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Like => "like",
            ReactionKind::Love => "love",
            ReactionKind::Fire => "fire",
            ReactionKind::Laugh => "laugh",
            ReactionKind::Sad => "sad",
        }
    }

    /// Terminal label used by the demo UI.
    pub fn emoji(&self) -> &'static str {
        match self {
            ReactionKind::Like => "👍",
            ReactionKind::Love => "❤️",
            ReactionKind::Fire => "🔥",
            ReactionKind::Laugh => "😂",
            ReactionKind::Sad => "😢",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(ReactionKind::Like),
            "love" => Ok(ReactionKind::Love),
            "fire" => Ok(ReactionKind::Fire),
            "laugh" => Ok(ReactionKind::Laugh),
            "sad" => Ok(ReactionKind::Sad),
            other => Err(format!("unknown reaction kind: {other}")),
        }
    }
}

/// Fixed hobby taxonomy used by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HobbyCategory {
    Sports,
    Entertainment,
    Education,
    Games,
    Arts,
    Technology,
    Outdoors,
    Music,
    Food,
    Travel,
    Fitness,
    Crafts,
    Science,
    Wellness,
    Community,
    Other,
}

impl HobbyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            HobbyCategory::Sports => "sports",
            HobbyCategory::Entertainment => "entertainment",
            HobbyCategory::Education => "education",
            HobbyCategory::Games => "games",
            HobbyCategory::Arts => "arts",
            HobbyCategory::Technology => "technology",
            HobbyCategory::Outdoors => "outdoors",
            HobbyCategory::Music => "music",
            HobbyCategory::Food => "food",
            HobbyCategory::Travel => "travel",
            HobbyCategory::Fitness => "fitness",
            HobbyCategory::Crafts => "crafts",
            HobbyCategory::Science => "science",
            HobbyCategory::Wellness => "wellness",
            HobbyCategory::Community => "community",
            HobbyCategory::Other => "other",
        }
    }
}

impl fmt::Display for HobbyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A comment on a post, scoped to its parent. Append-only on the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_name: String,
    pub profile_pic_url: Option<String>,
}

/// One feed entry.
///
/// The id never changes after creation. Reaction counts and the comment list
/// mutate only by replacement of the whole record; there is no field-level
/// patching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub user_id: UserId,
    pub content: String,
    pub image_url: Option<String>,
    pub hobby_id: Option<HobbyId>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Author display name.
    pub name: String,
    pub profile_pic_url: Option<String>,
    #[serde(default)]
    pub reaction_counts: HashMap<ReactionKind, u32>,
    pub comment_count: u32,
    #[serde(default)]
    pub comments: Option<Vec<Comment>>,
}

/// Catalog entry resolving a post's hobby tag to a display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hobby {
    pub id: HobbyId,
    pub name: String,
    pub category: HobbyCategory,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaction_kind_round_trips_through_strings() {
        for kind in ReactionKind::ALL {
            let parsed: ReactionKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("golf-clap".parse::<ReactionKind>().is_err());
    }

    #[test]
    fn reaction_counts_use_lowercase_keys_on_the_wire() {
        let mut counts = HashMap::new();
        counts.insert(ReactionKind::Fire, 3u32);
        let encoded = serde_json::to_string(&counts).unwrap();
        assert_eq!(encoded, r#"{"fire":3}"#);

        let decoded: HashMap<ReactionKind, u32> = serde_json::from_str(r#"{"like":1,"sad":2}"#).unwrap();
        assert_eq!(decoded.get(&ReactionKind::Like), Some(&1));
        assert_eq!(decoded.get(&ReactionKind::Sad), Some(&2));
    }

    #[test]
    fn hobby_category_decodes_catalog_values() {
        let decoded: Vec<HobbyCategory> =
            serde_json::from_str(r#"["sports","technology","wellness","other"]"#).unwrap();
        assert_eq!(
            decoded,
            vec![
                HobbyCategory::Sports,
                HobbyCategory::Technology,
                HobbyCategory::Wellness,
                HobbyCategory::Other,
            ]
        );
    }
}
