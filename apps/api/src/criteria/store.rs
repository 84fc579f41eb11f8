//! In-memory store of extracted criteria sets.
//!
//! Every extraction gets its own id, so a scoring call that passes its
//! `criteria_id` is never affected by a concurrent extraction. Callers that
//! pass nothing get the most recently stored set (last write wins).
//! The oldest sets are evicted once `capacity` is reached.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct CriteriaSet {
    pub id: Uuid,
    pub criteria: Vec<String>,
    pub backend: String,
    pub source: Option<String>,
    pub extracted_at: DateTime<Utc>,
}

pub struct CriteriaStore {
    capacity: usize,
    sets: RwLock<VecDeque<CriteriaSet>>,
}

impl CriteriaStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            sets: RwLock::new(VecDeque::new()),
        }
    }

    /// Stores a new set and returns it.
    pub async fn insert(
        &self,
        criteria: Vec<String>,
        backend: &str,
        source: Option<String>,
    ) -> CriteriaSet {
        let set = CriteriaSet {
            id: Uuid::new_v4(),
            criteria,
            backend: backend.to_string(),
            source,
            extracted_at: Utc::now(),
        };

        let mut sets = self.sets.write().await;
        while sets.len() >= self.capacity {
            sets.pop_front();
        }
        sets.push_back(set.clone());
        set
    }

    pub async fn get(&self, id: Uuid) -> Option<CriteriaSet> {
        self.sets.read().await.iter().find(|s| s.id == id).cloned()
    }

    pub async fn latest(&self) -> Option<CriteriaSet> {
        self.sets.read().await.back().cloned()
    }

    pub async fn len(&self) -> usize {
        self.sets.read().await.len()
    }
}
