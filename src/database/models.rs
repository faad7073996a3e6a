// Copyright 2023 Remi Bernotavicius

use crate::taxonomy::Dimension;
use derive_more::Display;
use diesel::associations::{Associations, Identifiable};
use diesel::deserialize::Queryable;
use diesel::expression::Selectable;
use diesel::prelude::Insertable;
use diesel_derive_enum::DbEnum;
use diesel_derive_newtype::DieselNewType;
use serde::{Deserialize, Serialize};

/// Snapshot-assigned recipe identity. Stable across seed/regenerate cycles,
/// unlike the auto-increment ids of the child tables.
#[derive(DieselNewType, Debug, Display, Hash, PartialEq, Eq, Clone)]
pub struct RecipeId(pub String);

#[derive(DieselNewType, Debug, Display, Hash, PartialEq, Eq, Clone)]
pub struct CategoryId(pub String);

/// Row identity of a stored ingredient. Two rows with equal (name, amount)
/// in different recipes still carry distinct `IngredientRowId`s.
#[derive(DieselNewType, Debug, Display, Hash, PartialEq, Eq, Copy, Clone)]
pub struct IngredientRowId(pub i32);

#[derive(DieselNewType, Debug, Display, Hash, PartialEq, Eq, Copy, Clone)]
pub struct InstructionRowId(pub i32);

/// Stored verbatim, both in the `recipes.difficulty` column and in the JSON
/// snapshot.
#[derive(
    Debug, Display, Hash, Copy, Clone, PartialEq, Eq, DbEnum, Serialize, Deserialize,
)]
#[DbValueStyle = "verbatim"]
pub enum Difficulty {
    #[display("Easy")]
    Easy,
    #[display("Medium")]
    Medium,
    #[display("Hard")]
    Hard,
}

#[derive(Queryable, Selectable, Identifiable, Insertable, Debug, PartialEq, Clone)]
#[diesel(table_name = crate::database::schema::recipes)]
pub struct RecipeRow {
    pub id: RecipeId,
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub description: String,
    pub story: Option<String>,
    pub image: String,
    pub category: String,
    pub cuisine: String,
    pub continent: String,
    pub meal_type: String,
    pub country: String,
    pub prep_time: String,
    pub cook_time: Option<String>,
    pub total_time: Option<String>,
    pub rating: f32,
    pub rating_count: Option<i32>,
    pub review_count: Option<i32>,
    pub difficulty: Difficulty,
    pub servings: i32,
    pub total_calories: i32,
}

#[derive(Associations, Queryable, Selectable, Identifiable, Debug, PartialEq, Clone)]
#[diesel(belongs_to(RecipeRow, foreign_key = recipe_id))]
#[diesel(table_name = crate::database::schema::ingredients)]
pub struct IngredientRow {
    pub id: IngredientRowId,
    pub recipe_id: RecipeId,
    pub name: String,
    pub amount: String,
    pub calories: i32,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
    pub saturated_fat: Option<String>,
    pub cholesterol: Option<String>,
    pub fiber: Option<String>,
    pub sugar: Option<String>,
    pub sodium: Option<String>,
    pub vitamin_d: Option<String>,
    pub calcium: Option<String>,
    pub iron: Option<String>,
    pub potassium: Option<String>,
}

#[derive(Insertable, Clone)]
#[diesel(table_name = crate::database::schema::ingredients)]
pub struct NewIngredientRow {
    pub recipe_id: RecipeId,
    pub name: String,
    pub amount: String,
    pub calories: i32,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
    pub saturated_fat: Option<String>,
    pub cholesterol: Option<String>,
    pub fiber: Option<String>,
    pub sugar: Option<String>,
    pub sodium: Option<String>,
    pub vitamin_d: Option<String>,
    pub calcium: Option<String>,
    pub iron: Option<String>,
    pub potassium: Option<String>,
}

#[derive(Associations, Queryable, Selectable, Identifiable, Debug, PartialEq, Clone)]
#[diesel(belongs_to(RecipeRow, foreign_key = recipe_id))]
#[diesel(table_name = crate::database::schema::instructions)]
pub struct InstructionRow {
    pub id: InstructionRowId,
    pub recipe_id: RecipeId,
    pub step: i32,
    pub title: String,
    pub text: String,
    pub detailed: Option<String>,
}

#[derive(Insertable, Clone)]
#[diesel(table_name = crate::database::schema::instructions)]
pub struct NewInstructionRow {
    pub recipe_id: RecipeId,
    pub step: i32,
    pub title: String,
    pub text: String,
    pub detailed: Option<String>,
}

#[derive(Insertable, Clone)]
#[diesel(table_name = crate::database::schema::recipe_dietary)]
pub struct NewDietaryRow {
    pub recipe_id: RecipeId,
    pub dietary_restriction: String,
}

#[derive(Insertable, Clone)]
#[diesel(table_name = crate::database::schema::recipe_audience)]
pub struct NewAudienceRow {
    pub recipe_id: RecipeId,
    pub audience: String,
}

#[derive(Insertable, Clone)]
#[diesel(table_name = crate::database::schema::recipe_extra)]
pub struct NewExtraRow {
    pub recipe_id: RecipeId,
    pub content: String,
}

#[derive(Queryable, Selectable, Identifiable, Insertable, Debug, PartialEq, Clone)]
#[diesel(table_name = crate::database::schema::categories)]
pub struct CategoryRow {
    pub id: CategoryId,
    pub slug: String,
    pub title: String,
    pub image: String,
    pub kind: Dimension,
}
