use crate::error::Error;
use crate::models::post::{Insert as PostInsert, Query as PostQuery, Update as PostUpdate, VolunteerPost};
use crate::models::request::{Insert as RequestInsert, Query as RequestQuery, RequestStatus, VolunteerRequest};

pub trait PostStore {
    async fn insert(&self, data: PostInsert) -> Result<String, Error>;
    async fn get(&self, id: &str) -> Result<VolunteerPost, Error>;
    async fn query(&self, param: &PostQuery) -> Result<Vec<VolunteerPost>, Error>;
    async fn update(&self, id: &str, data: PostUpdate) -> Result<(), Error>;
    async fn delete(&self, id: &str) -> Result<(), Error>;
    /// Decrements `volunteers_needed` by one. With `guard_positive` set the
    /// decrement applies only while the counter is positive; the return value
    /// reports whether a row was actually updated.
    async fn decrement_capacity(&self, id: &str, guard_positive: bool) -> Result<bool, Error>;
    async fn increment_capacity(&self, id: &str) -> Result<(), Error>;
}

pub trait RequestStore {
    async fn insert(&self, data: RequestInsert) -> Result<VolunteerRequest, Error>;
    async fn get(&self, id: &str) -> Result<VolunteerRequest, Error>;
    async fn query(&self, param: &RequestQuery) -> Result<Vec<VolunteerRequest>, Error>;
    /// Flips the status only when the stored status still equals `expected`;
    /// the return value reports whether the guarded update applied.
    async fn update_status(&self, id: &str, to: RequestStatus, expected: RequestStatus) -> Result<bool, Error>;
    async fn delete(&self, id: &str) -> Result<(), Error>;
}
