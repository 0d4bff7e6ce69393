use chrono::{NaiveDate, Utc};
use log::info;
use serde::Deserialize;

use crate::core::store::PostStore;
use crate::error::Error;
use crate::models::post::{Insert, Query, Update, VolunteerPost, CATEGORIES};
use crate::models::principal::Principal;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Create {
    pub thumbnail: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub volunteers_needed: i32,
    pub deadline: NaiveDate,
}

fn check_fields(
    thumbnail: &str,
    title: &str,
    description: &str,
    category: &str,
    location: &str,
    volunteers_needed: i32,
    deadline: NaiveDate,
) -> Result<(), Error> {
    if thumbnail.trim().is_empty() {
        return Err(Error::Validation("thumbnail URL is required".into()));
    }
    if title.chars().count() < 5 {
        return Err(Error::Validation("title must be at least 5 characters long".into()));
    }
    if description.chars().count() < 50 {
        return Err(Error::Validation("description must be at least 50 characters long".into()));
    }
    if !CATEGORIES.contains(&category) {
        return Err(Error::Validation(format!("unknown category: {}", category)));
    }
    if location.chars().count() < 5 {
        return Err(Error::Validation("location must be at least 5 characters long".into()));
    }
    if volunteers_needed < 1 {
        return Err(Error::Validation("at least 1 volunteer is required".into()));
    }
    if deadline < Utc::now().date_naive() {
        return Err(Error::Validation("deadline cannot be in the past".into()));
    }
    Ok(())
}

pub async fn create_post<P>(store: &P, principal: &Principal, data: Create) -> Result<String, Error>
where
    P: PostStore,
{
    check_fields(
        &data.thumbnail,
        &data.title,
        &data.description,
        &data.category,
        &data.location,
        data.volunteers_needed,
        data.deadline,
    )?;
    let id = store
        .insert(Insert {
            thumbnail: data.thumbnail,
            title: data.title,
            description: data.description,
            category: data.category,
            location: data.location,
            volunteers_needed: data.volunteers_needed,
            deadline: data.deadline,
            organizer_name: principal.name.clone(),
            organizer_email: principal.email.clone(),
        })
        .await?;
    info!("post {} created by {}", id, principal.email);
    Ok(id)
}

pub async fn update_post<P>(store: &P, principal: &Principal, id: &str, data: Update) -> Result<(), Error>
where
    P: PostStore,
{
    let post = store.get(id).await?;
    if post.organizer_email != principal.email {
        return Err(Error::Policy("only the organizer may update this post".into()));
    }
    check_fields(
        &data.thumbnail,
        &data.title,
        &data.description,
        &data.category,
        &data.location,
        data.volunteers_needed,
        data.deadline,
    )?;
    store.update(id, data).await
}

pub async fn delete_post<P>(store: &P, principal: &Principal, id: &str) -> Result<(), Error>
where
    P: PostStore,
{
    let post = store.get(id).await?;
    if post.organizer_email != principal.email {
        return Err(Error::Policy("only the organizer may delete this post".into()));
    }
    store.delete(id).await
}

pub async fn browse_posts<P>(store: &P, query: Query) -> Result<Vec<VolunteerPost>, Error>
where
    P: PostStore,
{
    store.query(&query).await
}

pub async fn get_post<P>(store: &P, id: &str) -> Result<VolunteerPost, Error>
where
    P: PostStore,
{
    store.get(id).await
}

#[cfg(test)]
mod tests {
    use chrono::Duration as ChronoDuration;

    use super::*;
    use crate::stores::memory::MemoryStore;

    fn organizer() -> Principal {
        Principal {
            name: "Maya Organizer".into(),
            email: "maya@example.com".into(),
        }
    }

    fn stranger() -> Principal {
        Principal {
            name: "Sam Stranger".into(),
            email: "sam@example.com".into(),
        }
    }

    fn creation() -> Create {
        Create {
            thumbnail: "https://example.com/tutoring.jpg".into(),
            title: "After-school tutoring".into(),
            description: "Weekly tutoring sessions for primary-school students, covering reading and basic maths."
                .into(),
            category: "Education".into(),
            location: "Riverside Community Center".into(),
            volunteers_needed: 4,
            deadline: Utc::now().date_naive() + ChronoDuration::days(30),
        }
    }

    fn update_from(data: Create) -> Update {
        Update {
            thumbnail: data.thumbnail,
            title: data.title,
            description: data.description,
            category: data.category,
            location: data.location,
            volunteers_needed: data.volunteers_needed,
            deadline: data.deadline,
        }
    }

    #[tokio::test]
    async fn create_post_records_the_organizer() {
        let store = MemoryStore::new();
        let id = create_post(&store, &organizer(), creation()).await.unwrap();
        let post = get_post(&store, &id).await.unwrap();
        assert_eq!(post.organizer_name, organizer().name);
        assert_eq!(post.organizer_email, organizer().email);
        assert_eq!(post.volunteers_needed, 4);
    }

    #[tokio::test]
    async fn create_post_validates_the_form_fields() {
        let store = MemoryStore::new();
        let cases = [
            Create {
                title: "Shrt".into(),
                ..creation()
            },
            Create {
                description: "too short".into(),
                ..creation()
            },
            Create {
                category: "Knitting".into(),
                ..creation()
            },
            Create {
                location: "Here".into(),
                ..creation()
            },
            Create {
                volunteers_needed: 0,
                ..creation()
            },
            Create {
                thumbnail: "  ".into(),
                ..creation()
            },
            Create {
                deadline: Utc::now().date_naive() - ChronoDuration::days(1),
                ..creation()
            },
        ];
        for case in cases {
            let err = create_post(&store, &organizer(), case).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
        assert!(browse_posts(&store, Query::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_and_delete_are_organizer_only() {
        let store = MemoryStore::new();
        let id = create_post(&store, &organizer(), creation()).await.unwrap();
        let err = update_post(&store, &stranger(), &id, update_from(creation()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Policy(_)));
        let err = delete_post(&store, &stranger(), &id).await.unwrap_err();
        assert!(matches!(err, Error::Policy(_)));

        let mut changed = update_from(creation());
        changed.title = "After-school tutoring (autumn term)".into();
        changed.volunteers_needed = 6;
        update_post(&store, &organizer(), &id, changed).await.unwrap();
        let post = get_post(&store, &id).await.unwrap();
        assert_eq!(post.title, "After-school tutoring (autumn term)");
        assert_eq!(post.volunteers_needed, 6);

        delete_post(&store, &organizer(), &id).await.unwrap();
        let err = get_post(&store, &id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound("post", _)));
    }

    #[tokio::test]
    async fn browse_posts_applies_the_filters() {
        let store = MemoryStore::new();
        create_post(&store, &organizer(), creation()).await.unwrap();
        create_post(
            &store,
            &organizer(),
            Create {
                title: "River cleanup day".into(),
                description:
                    "Help clear litter from the riverbank before the spring floods arrive, equipment provided."
                        .into(),
                category: "Environmental".into(),
                ..creation()
            },
        )
        .await
        .unwrap();
        create_post(
            &store,
            &stranger(),
            Create {
                title: "Food bank sorting shift".into(),
                description:
                    "Sort and shelve donated food items at the downtown food bank over the weekend rush."
                        .into(),
                category: "Social Service".into(),
                ..creation()
            },
        )
        .await
        .unwrap();

        let by_category = browse_posts(
            &store,
            Query {
                category: Some("Environmental".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].title, "River cleanup day");

        let by_search = browse_posts(
            &store,
            Query {
                search: Some("tutoring".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_search.len(), 1);

        let mine = browse_posts(
            &store,
            Query {
                organizer_email: Some(organizer().email),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(mine.len(), 2);
    }
}
