use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::core::store::{PostStore, RequestStore};
use crate::error::Error;
use crate::models::post::{Insert as PostInsert, Query as PostQuery, Update as PostUpdate, VolunteerPost};
use crate::models::request::{Insert as RequestInsert, Query as RequestQuery, RequestStatus, VolunteerRequest};

/// In-memory implementation of both stores. Clones share the same state,
/// like clones of a connection pool.
#[derive(Clone, Default)]
pub struct MemoryStore {
    posts: Arc<Mutex<HashMap<String, VolunteerPost>>>,
    requests: Arc<Mutex<HashMap<String, VolunteerRequest>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PostStore for MemoryStore {
    async fn insert(&self, data: PostInsert) -> Result<String, Error> {
        let id = Uuid::new_v4().to_string();
        let post = VolunteerPost {
            id: id.clone(),
            thumbnail: data.thumbnail,
            title: data.title,
            description: data.description,
            category: data.category,
            location: data.location,
            volunteers_needed: data.volunteers_needed,
            deadline: data.deadline,
            organizer_name: data.organizer_name,
            organizer_email: data.organizer_email,
            created_at: Utc::now(),
        };
        self.posts.lock().await.insert(id.clone(), post);
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<VolunteerPost, Error> {
        self.posts
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound("post", id.to_string()))
    }

    async fn query(&self, param: &PostQuery) -> Result<Vec<VolunteerPost>, Error> {
        let posts = self.posts.lock().await;
        let mut found: Vec<VolunteerPost> = posts
            .values()
            .filter(|p| param.organizer_email.as_deref().map_or(true, |e| p.organizer_email == e))
            .filter(|p| param.category.as_deref().map_or(true, |c| p.category == c))
            .filter(|p| {
                param.search.as_deref().map_or(true, |s| {
                    let s = s.to_lowercase();
                    p.title.to_lowercase().contains(&s) || p.description.to_lowercase().contains(&s)
                })
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.deadline.cmp(&b.deadline));
        Ok(found)
    }

    async fn update(&self, id: &str, data: PostUpdate) -> Result<(), Error> {
        let mut posts = self.posts.lock().await;
        let post = posts.get_mut(id).ok_or_else(|| Error::NotFound("post", id.to_string()))?;
        post.thumbnail = data.thumbnail;
        post.title = data.title;
        post.description = data.description;
        post.category = data.category;
        post.location = data.location;
        post.volunteers_needed = data.volunteers_needed;
        post.deadline = data.deadline;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        self.posts
            .lock()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound("post", id.to_string()))
    }

    async fn decrement_capacity(&self, id: &str, guard_positive: bool) -> Result<bool, Error> {
        let mut posts = self.posts.lock().await;
        let post = posts.get_mut(id).ok_or_else(|| Error::NotFound("post", id.to_string()))?;
        if guard_positive && post.volunteers_needed <= 0 {
            return Ok(false);
        }
        post.volunteers_needed -= 1;
        Ok(true)
    }

    async fn increment_capacity(&self, id: &str) -> Result<(), Error> {
        let mut posts = self.posts.lock().await;
        let post = posts.get_mut(id).ok_or_else(|| Error::NotFound("post", id.to_string()))?;
        post.volunteers_needed += 1;
        Ok(())
    }
}

impl RequestStore for MemoryStore {
    async fn insert(&self, data: RequestInsert) -> Result<VolunteerRequest, Error> {
        let id = Uuid::new_v4().to_string();
        let request = VolunteerRequest {
            id: id.clone(),
            post_id: data.post_id,
            volunteer_name: data.volunteer_name,
            volunteer_email: data.volunteer_email,
            suggestion: data.suggestion,
            status: data.status,
        };
        self.requests.lock().await.insert(id, request.clone());
        Ok(request)
    }

    async fn get(&self, id: &str) -> Result<VolunteerRequest, Error> {
        self.requests
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound("request", id.to_string()))
    }

    async fn query(&self, param: &RequestQuery) -> Result<Vec<VolunteerRequest>, Error> {
        let requests = self.requests.lock().await;
        Ok(requests
            .values()
            .filter(|r| param.post_id.as_deref().map_or(true, |p| r.post_id == p))
            .filter(|r| param.volunteer_email.as_deref().map_or(true, |e| r.volunteer_email == e))
            .cloned()
            .collect())
    }

    async fn update_status(&self, id: &str, to: RequestStatus, expected: RequestStatus) -> Result<bool, Error> {
        let mut requests = self.requests.lock().await;
        let request = requests
            .get_mut(id)
            .ok_or_else(|| Error::NotFound("request", id.to_string()))?;
        if request.status != expected {
            return Ok(false);
        }
        request.status = to;
        Ok(true)
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        self.requests
            .lock()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound("request", id.to_string()))
    }
}
