use std::sync::Arc;

use matching_engine::MatchingEngine;

use crate::fanout::FeedHub;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MatchingEngine>,
    pub feed: Arc<FeedHub>,
}

impl AppState {
    pub fn new(engine: Arc<MatchingEngine>, feed: Arc<FeedHub>) -> Self {
        Self { engine, feed }
    }
}
