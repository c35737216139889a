use serde::Serialize;

use crate::learning::{TopicSuggestion, VideoLink};

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct VideoRecommendations {
    pub topic: String,
    pub videos: Vec<VideoLink>,
    pub count: usize,
}

impl VideoRecommendations {
    pub fn new(topic: String, videos: Vec<VideoLink>) -> Self {
        Self {
            count: videos.len(),
            topic,
            videos,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct NextTopicsResponse {
    pub recommendations: Vec<TopicSuggestion>,
}
