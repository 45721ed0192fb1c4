use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::schema::posts;

/// Categories the client offers. The store accepts any string.
pub(crate) const KNOWN_CATEGORIES: [&str; 4] = ["fruit", "vegetable", "meat", "resource"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Nutrient {
    pub name: String,
    pub amount: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Ingredient {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub benefits: Option<String>,
    pub nutrients: Vec<Nutrient>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

impl Ingredient {
    pub(crate) fn category_str(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }
}

/// Field values for a record that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct NewIngredient {
    pub title: String,
    pub description: Option<String>,
    pub benefits: Option<String>,
    pub nutrients: Vec<Nutrient>,
    pub image_url: Option<String>,
    pub category: Option<String>,
}

impl NewIngredient {
    pub(crate) fn has_known_category(&self) -> bool {
        match self.category.as_deref() {
            Some(category) => KNOWN_CATEGORIES.contains(&category),
            None => false,
        }
    }
}

// column order must match schema::posts; created_at is nullable in databases
// written before this service
#[derive(Debug, Queryable)]
pub(crate) struct IngredientRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub benefits: Option<String>,
    pub nutrients: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

impl IngredientRow {
    pub(crate) fn into_ingredient(self) -> Result<Ingredient, serde_json::Error> {
        Ok(Ingredient {
            nutrients: decode_nutrients(self.nutrients.as_deref())?,
            id: self.id,
            title: self.title,
            description: self.description,
            benefits: self.benefits,
            image_url: self.image_url,
            category: self.category,
            created_at: self.created_at,
        })
    }
}

#[derive(Insertable)]
#[table_name = "posts"]
pub(crate) struct NewIngredientRow<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub benefits: Option<&'a str>,
    pub nutrients: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub category: Option<&'a str>,
}

/// Nutrients live in one text column as a JSON array.
pub(crate) fn encode_nutrients(nutrients: &[Nutrient]) -> Result<String, serde_json::Error> {
    serde_json::to_string(nutrients)
}

/// NULL and JSON `null` both decode to an empty list.
pub(crate) fn decode_nutrients(raw: Option<&str>) -> Result<Vec<Nutrient>, serde_json::Error> {
    match raw {
        None => Ok(Vec::new()),
        Some(text) => Ok(serde_json::from_str::<Option<Vec<Nutrient>>>(text)?.unwrap_or_default()),
    }
}
