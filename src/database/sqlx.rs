use sqlx::{query, query_as, PgPool, QueryBuilder};
use uuid::Uuid;

use crate::core::store::{PostStore, RequestStore};
use crate::error::Error;
use crate::models::post::{Insert as PostInsert, Query as PostQuery, Update as PostUpdate, VolunteerPost};
use crate::models::request::{Insert as RequestInsert, Query as RequestQuery, RequestStatus, VolunteerRequest};

/// PostgreSQL implementation of both stores; see migrations/schema.sql for
/// the backing tables.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PostStore for PgStore {
    async fn insert(&self, data: PostInsert) -> Result<String, Error> {
        let id = Uuid::new_v4().to_string();
        query(
            "INSERT INTO volunteer_posts (id, thumbnail, title, description, category, location, volunteers_needed, deadline, organizer_name, organizer_email)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(&id)
        .bind(data.thumbnail)
        .bind(data.title)
        .bind(data.description)
        .bind(data.category)
        .bind(data.location)
        .bind(data.volunteers_needed)
        .bind(data.deadline)
        .bind(data.organizer_name)
        .bind(data.organizer_email)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<VolunteerPost, Error> {
        query_as("SELECT * FROM volunteer_posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("post", id.to_string()))
    }

    async fn query(&self, param: &PostQuery) -> Result<Vec<VolunteerPost>, Error> {
        let mut stmt = QueryBuilder::new("SELECT * FROM volunteer_posts WHERE 1 = 1");
        if let Some(email) = &param.organizer_email {
            stmt.push(" AND organizer_email = ").push_bind(email);
        }
        if let Some(category) = &param.category {
            stmt.push(" AND category = ").push_bind(category);
        }
        if let Some(search) = &param.search {
            let pattern = format!("%{}%", search);
            stmt.push(" AND (title ILIKE ").push_bind(pattern.clone());
            stmt.push(" OR description ILIKE ").push_bind(pattern);
            stmt.push(")");
        }
        stmt.push(" ORDER BY deadline");
        let posts = stmt.build_query_as().fetch_all(&self.pool).await?;
        Ok(posts)
    }

    async fn update(&self, id: &str, data: PostUpdate) -> Result<(), Error> {
        query(
            "UPDATE volunteer_posts
            SET thumbnail = $1, title = $2, description = $3, category = $4, location = $5, volunteers_needed = $6, deadline = $7
            WHERE id = $8",
        )
        .bind(data.thumbnail)
        .bind(data.title)
        .bind(data.description)
        .bind(data.category)
        .bind(data.location)
        .bind(data.volunteers_needed)
        .bind(data.deadline)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        let res = query("DELETE FROM volunteer_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("post", id.to_string()));
        }
        Ok(())
    }

    async fn decrement_capacity(&self, id: &str, guard_positive: bool) -> Result<bool, Error> {
        // The WHERE clause is the compare-and-decrement; concurrent approvals
        // racing for the last slot are decided here.
        let stmt = if guard_positive {
            "UPDATE volunteer_posts SET volunteers_needed = volunteers_needed - 1 WHERE id = $1 AND volunteers_needed > 0"
        } else {
            "UPDATE volunteer_posts SET volunteers_needed = volunteers_needed - 1 WHERE id = $1"
        };
        let res = query(stmt).bind(id).execute(&self.pool).await?;
        Ok(res.rows_affected() == 1)
    }

    async fn increment_capacity(&self, id: &str) -> Result<(), Error> {
        query("UPDATE volunteer_posts SET volunteers_needed = volunteers_needed + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

impl RequestStore for PgStore {
    async fn insert(&self, data: RequestInsert) -> Result<VolunteerRequest, Error> {
        let id = Uuid::new_v4().to_string();
        let request = query_as(
            "INSERT INTO volunteer_requests (id, post_id, volunteer_name, volunteer_email, suggestion, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *",
        )
        .bind(&id)
        .bind(data.post_id)
        .bind(data.volunteer_name)
        .bind(data.volunteer_email)
        .bind(data.suggestion)
        .bind(data.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(request)
    }

    async fn get(&self, id: &str) -> Result<VolunteerRequest, Error> {
        query_as("SELECT * FROM volunteer_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("request", id.to_string()))
    }

    async fn query(&self, param: &RequestQuery) -> Result<Vec<VolunteerRequest>, Error> {
        let mut stmt = QueryBuilder::new("SELECT * FROM volunteer_requests WHERE 1 = 1");
        if let Some(post_id) = &param.post_id {
            stmt.push(" AND post_id = ").push_bind(post_id);
        }
        if let Some(email) = &param.volunteer_email {
            stmt.push(" AND volunteer_email = ").push_bind(email);
        }
        let requests = stmt.build_query_as().fetch_all(&self.pool).await?;
        Ok(requests)
    }

    async fn update_status(&self, id: &str, to: RequestStatus, expected: RequestStatus) -> Result<bool, Error> {
        let res = query("UPDATE volunteer_requests SET status = $1 WHERE id = $2 AND status = $3")
            .bind(to)
            .bind(id)
            .bind(expected)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        let res = query("DELETE FROM volunteer_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("request", id.to_string()));
        }
        Ok(())
    }
}
