//! Review endpoints

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::Review;
use crate::state::AppState;
use crate::util;

use super::ApiResult;

/// POST /reviews body
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub name: Option<String>,
    pub rating: Option<u8>,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateReviewResponse {
    pub success: bool,
    pub review: Review,
}

/// GET /reviews
pub async fn list_reviews(State(state): State<AppState>) -> Json<Vec<Review>> {
    Json(state.store.read(|doc| doc.reviews.clone()).await)
}

/// POST /reviews
pub async fn create_review(
    State(state): State<AppState>,
    Json(req): Json<CreateReviewRequest>,
) -> ApiResult<CreateReviewResponse> {
    let rating = req
        .rating
        .ok_or_else(|| AppError::Validation("rating is required".into()))?;
    if !(1..=5).contains(&rating) {
        return Err(AppError::Validation(format!(
            "rating must be between 1 and 5, got {rating}"
        )));
    }
    let comment = req.comment.as_deref().map(str::trim).unwrap_or_default();
    if comment.is_empty() {
        return Err(AppError::Validation("comment must not be empty".into()));
    }

    let review = Review {
        id: util::next_id(),
        name: req
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "Anonymous".to_string()),
        rating,
        comment: comment.to_string(),
        created_at: util::now_millis(),
    };
    let review = state
        .store
        .mutate(move |doc| {
            doc.reviews.push(review.clone());
            review
        })
        .await;

    Ok(Json(CreateReviewResponse {
        success: true,
        review,
    }))
}
