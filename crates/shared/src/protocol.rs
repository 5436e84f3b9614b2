use serde::{Deserialize, Serialize};

use crate::domain::Recommendation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub tag: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(default)]
    pub recommendations: Option<Vec<Recommendation>>,
}

impl RecommendationsResponse {
    pub fn into_list(self) -> Vec<Recommendation> {
        self.recommendations.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshOptions {
    pub top_n: u32,
    pub pop_cutoff: u32,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            top_n: 20,
            pop_cutoff: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshRecommendationsResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub recs: Option<Vec<Recommendation>>,
}

impl RefreshRecommendationsResponse {
    pub fn into_list(self) -> Vec<Recommendation> {
        self.recs.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CachedRecommendationsQuery {
    pub limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_null_recommendations_decode_to_empty_list() {
        let missing: RecommendationsResponse =
            serde_json::from_str("{}").expect("decode missing");
        let null: RecommendationsResponse =
            serde_json::from_str(r#"{"recommendations": null}"#).expect("decode null");

        assert!(missing.into_list().is_empty());
        assert!(null.into_list().is_empty());
    }

    #[test]
    fn create_user_request_serializes_tag_field() {
        let body = serde_json::to_value(CreateUserRequest {
            tag: "alice".to_string(),
        })
        .expect("encode");
        assert_eq!(body, serde_json::json!({ "tag": "alice" }));
    }
}
