use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use log::{error, info, warn};
use serde::Deserialize;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::timeout;

use crate::config::Config;
use crate::core::store::{PostStore, RequestStore};
use crate::error::Error;
use crate::models::principal::Principal;
use crate::models::request::{Insert as RequestInsert, Query as RequestQuery, RequestStatus, VolunteerRequest};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCreate {
    pub post_id: String,
    pub suggestion: String,
}

/// Enforces the volunteer-request state machine and keeps the parent post's
/// `volunteers_needed` counter consistent with approvals.
pub struct RequestLifecycleManager<P, R> {
    posts: P,
    requests: R,
    config: Config,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<P, R> RequestLifecycleManager<P, R>
where
    P: PostStore,
    R: RequestStore,
{
    pub fn new(posts: P, requests: R, config: Config) -> Self {
        RequestLifecycleManager {
            posts,
            requests,
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    // Mutations of the same request id must not overlap.
    async fn serialize_on(&self, request_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .lock()
            .await
            .entry(request_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    // A store call that outlives the deadline has an unknown effect; it is
    // reported as Timeout, never assumed to have failed.
    async fn with_timeout<T>(&self, fut: impl Future<Output = Result<T, Error>>) -> Result<T, Error> {
        match timeout(self.config.store_timeout, fut).await {
            Ok(res) => res,
            Err(_) => Err(Error::Timeout(self.config.store_timeout)),
        }
    }

    /// Submits a new request against a post; the request starts out pending.
    pub async fn create(&self, principal: &Principal, data: RequestCreate) -> Result<VolunteerRequest, Error> {
        if data.suggestion.chars().count() < self.config.min_suggestion_len {
            return Err(Error::Validation(format!(
                "suggestion must be at least {} characters long",
                self.config.min_suggestion_len
            )));
        }
        let post = self.with_timeout(self.posts.get(&data.post_id)).await?;
        if principal.email == post.organizer_email {
            return Err(Error::Policy("organizers cannot volunteer for their own post".into()));
        }
        if post.deadline < Utc::now().date_naive() {
            return Err(Error::Policy(format!("the deadline of post {} has passed", post.id)));
        }
        if post.volunteers_needed <= 0 {
            return Err(Error::Policy(format!("no more volunteers needed for post {}", post.id)));
        }
        let request = self
            .with_timeout(self.requests.insert(RequestInsert {
                post_id: post.id.clone(),
                volunteer_name: principal.name.clone(),
                volunteer_email: principal.email.clone(),
                suggestion: data.suggestion,
                status: RequestStatus::Pending,
            }))
            .await?;
        info!("request {} created against post {} by {}", request.id, post.id, principal.email);
        Ok(request)
    }

    /// Approves a pending request and takes one capacity slot on the parent
    /// post. The status flip lands first; if the guarded decrement then
    /// fails, the flip is rolled back.
    pub async fn approve(&self, principal: &Principal, request_id: &str) -> Result<VolunteerRequest, Error> {
        let _guard = self.serialize_on(request_id).await;
        let request = self.with_timeout(self.requests.get(request_id)).await?;
        let post = self.with_timeout(self.posts.get(&request.post_id)).await?;
        if principal.email != post.organizer_email {
            return Err(Error::Policy("only the organizer of the post may approve a request".into()));
        }
        if request.status != RequestStatus::Pending {
            return Err(Error::State(format!("request {} is already {}", request.id, request.status)));
        }
        if post.volunteers_needed <= 0 {
            return Err(Error::Capacity(post.id));
        }
        let flipped = self
            .with_timeout(self.requests.update_status(request_id, RequestStatus::Approved, RequestStatus::Pending))
            .await?;
        if !flipped {
            return Err(Error::State(format!("request {} left the pending state concurrently", request.id)));
        }
        match self.with_timeout(self.posts.decrement_capacity(&post.id, true)).await {
            Ok(true) => {
                info!("request {} approved, post {} capacity decremented", request.id, post.id);
                Ok(VolunteerRequest {
                    status: RequestStatus::Approved,
                    ..request
                })
            }
            Ok(false) => {
                warn!("post {} ran out of capacity while approving request {}", post.id, request.id);
                self.revert_approval(request_id, Error::Capacity(post.id)).await
            }
            Err(e) => self.revert_approval(request_id, e).await,
        }
    }

    // The decrement failed after the status flip landed; revert the flip so
    // the request is not left approved without a capacity slot taken.
    async fn revert_approval(&self, request_id: &str, cause: Error) -> Result<VolunteerRequest, Error> {
        match self
            .with_timeout(self.requests.update_status(request_id, RequestStatus::Pending, RequestStatus::Approved))
            .await
        {
            Ok(true) => Err(cause),
            Ok(false) => {
                let msg = format!(
                    "request {} changed state while its approval was being rolled back (original failure: {})",
                    request_id, cause
                );
                error!("{}", msg);
                Err(Error::Compensation(msg))
            }
            Err(e) => {
                let msg = format!(
                    "request {} is marked approved but no capacity slot was taken: {} (original failure: {})",
                    request_id, e, cause
                );
                error!("{}", msg);
                Err(Error::Compensation(msg))
            }
        }
    }

    /// Rejects a pending request; capacity is untouched.
    pub async fn reject(&self, principal: &Principal, request_id: &str) -> Result<VolunteerRequest, Error> {
        let _guard = self.serialize_on(request_id).await;
        let request = self.with_timeout(self.requests.get(request_id)).await?;
        let post = self.with_timeout(self.posts.get(&request.post_id)).await?;
        if principal.email != post.organizer_email {
            return Err(Error::Policy("only the organizer of the post may reject a request".into()));
        }
        if request.status != RequestStatus::Pending {
            return Err(Error::State(format!("request {} is already {}", request.id, request.status)));
        }
        let flipped = self
            .with_timeout(self.requests.update_status(request_id, RequestStatus::Rejected, RequestStatus::Pending))
            .await?;
        if !flipped {
            return Err(Error::State(format!("request {} left the pending state concurrently", request.id)));
        }
        info!("request {} rejected by {}", request.id, principal.email);
        Ok(VolunteerRequest {
            status: RequestStatus::Rejected,
            ..request
        })
    }

    /// Withdraws the caller's own pending request. The record is removed
    /// outright; there is no tombstone status.
    pub async fn cancel(&self, principal: &Principal, request_id: &str) -> Result<(), Error> {
        let _guard = self.serialize_on(request_id).await;
        let request = self.with_timeout(self.requests.get(request_id)).await?;
        if principal.email != request.volunteer_email {
            return Err(Error::Policy("only the requesting volunteer may cancel a request".into()));
        }
        if request.status != RequestStatus::Pending {
            return Err(Error::State(format!(
                "request {} is already {} and can no longer be cancelled",
                request.id, request.status
            )));
        }
        self.with_timeout(self.requests.delete(request_id)).await?;
        info!("request {} cancelled by {}", request_id, principal.email);
        Ok(())
    }

    /// Lists the requests submitted against one of the organizer's posts.
    pub async fn requests_for_post(&self, principal: &Principal, post_id: &str) -> Result<Vec<VolunteerRequest>, Error> {
        let post = self.with_timeout(self.posts.get(post_id)).await?;
        if principal.email != post.organizer_email {
            return Err(Error::Policy("only the organizer may list the requests against a post".into()));
        }
        self.with_timeout(self.requests.query(&RequestQuery {
            post_id: Some(post.id),
            ..Default::default()
        }))
        .await
    }

    /// Lists the caller's own requests.
    pub async fn requests_by_volunteer(&self, principal: &Principal) -> Result<Vec<VolunteerRequest>, Error> {
        self.with_timeout(self.requests.query(&RequestQuery {
            volunteer_email: Some(principal.email.clone()),
            ..Default::default()
        }))
        .await
    }
}
