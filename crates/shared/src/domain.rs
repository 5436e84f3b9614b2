use serde::{Deserialize, Serialize};

/// A suggested track as returned by the backend. Rendered verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Recommendation {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        uri: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            uri: uri.into(),
            song_id: None,
            genre: None,
            popularity: None,
            score: None,
        }
    }

    pub fn has_listen_link(&self) -> bool {
        !self.uri.trim().is_empty()
    }
}

/// Row shape of the backend's persisted recommendation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecommendation {
    pub song_id: i64,
    pub score: f64,
}

/// Tags registered from this client, in the order they were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserSet {
    tags: Vec<String>,
}

impl UserSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the tag was already present.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|existing| existing == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_set_ignores_duplicate_inserts_and_keeps_order() {
        let mut users = UserSet::new();
        assert!(users.insert("alice"));
        assert!(users.insert("bob"));
        assert!(!users.insert("alice"));

        assert_eq!(users.len(), 2);
        assert_eq!(users.iter().collect::<Vec<_>>(), vec!["alice", "bob"]);
    }

    #[test]
    fn recommendation_tolerates_backend_rows_without_uri() {
        let rec: Recommendation = serde_json::from_value(serde_json::json!({
            "song_id": 12,
            "title": "Quiet Song",
            "artist": "Nobody",
            "genre": null,
            "popularity": 4,
            "score": 4.0
        }))
        .expect("decode");

        assert_eq!(rec.uri, "");
        assert!(!rec.has_listen_link());
        assert_eq!(rec.song_id, Some(12));
        assert_eq!(rec.popularity, Some(4));
    }
}
