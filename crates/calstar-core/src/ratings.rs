//! Average ratings for professors and courses.
//!
//! Both aggregates are arithmetic means of `overall_rating` over a collection
//! of reviews, and both are `0.0` when the collection is empty. A course's
//! average is taken once over the reviews of all its offerings combined, so
//! an offering with many reviews weighs more than one with few.
//!
//! The reviews come from a [`ReviewSource`]. [`StoredReviews`] reads them from
//! the `reviews` table; tests and other callers can supply their own.

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::error::CalstarError;
use crate::models::{course_offering, professor, review};
use crate::repo::offerings::{self, OfferingFilter};
use crate::repo::reviews::{self, ReviewFilter};
use crate::repo::{courses, professors};

/// Anything carrying an overall rating.
pub trait Rated {
    fn overall_rating(&self) -> f64;
}

impl Rated for review::Model {
    fn overall_rating(&self) -> f64 {
        f64::from(self.overall_rating)
    }
}

/// Supplies the review collections the aggregates are computed from.
#[async_trait]
pub trait ReviewSource: Sync {
    type Review: Rated + Send;

    async fn reviews_for_professor(
        &self,
        professor_id: i32,
    ) -> Result<Vec<Self::Review>, CalstarError>;

    async fn reviews_for_offering(
        &self,
        course_offering_id: i32,
    ) -> Result<Vec<Self::Review>, CalstarError>;
}

/// Arithmetic mean of the ratings; `0.0` for an empty slice.
pub fn mean_rating<R: Rated>(reviews: &[R]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let total: f64 = reviews.iter().map(Rated::overall_rating).sum();
    total / reviews.len() as f64
}

pub async fn professor_average_rating<S>(
    source: &S,
    professor: &professor::Model,
) -> Result<f64, CalstarError>
where
    S: ReviewSource + ?Sized,
{
    let reviews = source.reviews_for_professor(professor.id).await?;
    Ok(mean_rating(&reviews))
}

/// Mean over the reviews of every offering in `offerings`, pooled together.
pub async fn course_average_rating<S>(
    source: &S,
    offerings: &[course_offering::Model],
) -> Result<f64, CalstarError>
where
    S: ReviewSource + ?Sized,
{
    let mut pooled = Vec::new();
    for offering in offerings {
        pooled.extend(source.reviews_for_offering(offering.id).await?);
    }
    Ok(mean_rating(&pooled))
}

/// Reviews read from the `reviews` table over any connection or transaction.
pub struct StoredReviews<'a, C>(pub &'a C);

#[async_trait]
impl<'a, C> ReviewSource for StoredReviews<'a, C>
where
    C: ConnectionTrait,
{
    type Review = review::Model;

    async fn reviews_for_professor(
        &self,
        professor_id: i32,
    ) -> Result<Vec<review::Model>, CalstarError> {
        let filter = ReviewFilter {
            professor_id: Some(professor_id),
            ..Default::default()
        };
        reviews::list(self.0, filter).await
    }

    async fn reviews_for_offering(
        &self,
        course_offering_id: i32,
    ) -> Result<Vec<review::Model>, CalstarError> {
        let filter = ReviewFilter {
            course_offering_id: Some(course_offering_id),
            ..Default::default()
        };
        reviews::list(self.0, filter).await
    }
}

/// Average rating of the professor with `id`, from stored reviews.
pub async fn professor_rating(db: &DatabaseConnection, id: i32) -> Result<f64, CalstarError> {
    let txn = db.begin().await?;
    let professor = professors::get(&txn, id).await?;
    let rating = professor_average_rating(&StoredReviews(&txn), &professor).await?;
    txn.commit().await?;
    tracing::debug!(professor_id = id, rating, "professor rating computed");
    Ok(rating)
}

/// Average rating of the course with `id`. Offerings and their reviews are
/// read in one transaction.
pub async fn course_rating(db: &DatabaseConnection, id: i32) -> Result<f64, CalstarError> {
    let txn = db.begin().await?;
    let course = courses::get(&txn, id).await?;
    let offerings = offerings::list(&txn, OfferingFilter::for_course(course.id)).await?;
    let rating = course_average_rating(&StoredReviews(&txn), &offerings).await?;
    txn.commit().await?;
    tracing::debug!(course_id = id, offerings = offerings.len(), rating, "course rating computed");
    Ok(rating)
}
