use serde::Deserialize;

use crate::error::ApiError;
use crate::models::{NewIngredient, Nutrient};

/// `POST /api/posts` body as it arrives on the wire.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct CreateIngredientRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub benefits: Option<String>,
    pub nutrients: Option<Vec<Nutrient>>,
    pub image_url: Option<String>,
    pub category: Option<String>,
}

impl CreateIngredientRequest {
    pub(crate) fn validate(self) -> Result<NewIngredient, ApiError> {
        let title = match self.title {
            Some(title) if !title.trim().is_empty() => title,
            _ => return Err(ApiError::BadRequest("title is required".to_string())),
        };

        let new = NewIngredient {
            title,
            description: self.description,
            benefits: self.benefits,
            nutrients: self.nutrients.unwrap_or_default(),
            image_url: self.image_url,
            category: self.category,
        };

        if !new.has_known_category() {
            log::warn!(
                "storing {:?} with unrecognised category {:?}",
                new.title,
                new.category
            );
        }
        Ok(new)
    }
}
