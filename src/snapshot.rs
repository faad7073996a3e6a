// Copyright 2023 Remi Bernotavicius

//! Canonical shapes of the JSON snapshot (`recipes.json`, `categories.json`).
//! The snapshot is the source of truth; the relational store is derived from
//! it and regenerated back into it. Field names on disk are camelCase.

use crate::database::models::Difficulty;
use crate::taxonomy::Dimension;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{fmt, fs, io};

#[derive(Debug)]
pub enum SnapshotError {
    Read { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    Encode { source: serde_json::Error },
    Write { path: PathBuf, source: io::Error },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read snapshot {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "malformed snapshot {}: {source}", path.display())
            }
            Self::Encode { source } => write!(f, "failed to encode snapshot: {source}"),
            Self::Write { path, source } => {
                write!(f, "failed to write snapshot {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for SnapshotError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    pub amount: String,
    pub calories: i32,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturated_fat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cholesterol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vitamin_d: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calcium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iron: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potassium: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub step: i32,
    pub title: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub description: String,
    pub image: String,
    pub category: String,
    pub cuisine: String,
    pub continent: String,
    #[serde(default)]
    pub dietary: Vec<String>,
    pub meal_type: String,
    #[serde(default)]
    pub audience: Vec<String>,
    pub country: String,
    pub prep_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<String>,
    pub rating: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_count: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<i32>,
    pub difficulty: Difficulty,
    pub servings: i32,
    pub ingredients: Vec<Ingredient>,
    pub total_calories: i32,
    pub instructions: Vec<Instruction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub image: String,
    #[serde(rename = "type")]
    pub kind: Dimension,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SnapshotError> {
    let contents = fs::read_to_string(path).map_err(|source| SnapshotError::Read {
        path: path.into(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| SnapshotError::Parse {
        path: path.into(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SnapshotError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|source| SnapshotError::Encode { source })?;
    fs::write(path, json).map_err(|source| SnapshotError::Write {
        path: path.into(),
        source,
    })
}

pub fn load_recipes(path: impl AsRef<Path>) -> Result<Vec<Recipe>, SnapshotError> {
    read_json(path.as_ref())
}

pub fn load_categories(path: impl AsRef<Path>) -> Result<Vec<Category>, SnapshotError> {
    read_json(path.as_ref())
}

pub fn write_recipes(path: impl AsRef<Path>, recipes: &[Recipe]) -> Result<(), SnapshotError> {
    write_json(path.as_ref(), &recipes)
}

pub fn write_categories(
    path: impl AsRef<Path>,
    categories: &[Category],
) -> Result<(), SnapshotError> {
    write_json(path.as_ref(), &categories)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn ingredient(name: &str, amount: &str) -> Ingredient {
        Ingredient {
            name: name.into(),
            amount: amount.into(),
            calories: 25,
            protein: "1g".into(),
            carbs: "4g".into(),
            fat: "0g".into(),
            saturated_fat: None,
            cholesterol: None,
            fiber: None,
            sugar: None,
            sodium: None,
            vitamin_d: None,
            calcium: None,
            iron: None,
            potassium: None,
        }
    }

    pub fn instruction(step: i32, title: &str) -> Instruction {
        Instruction {
            step,
            title: title.into(),
            text: format!("{title} thoroughly."),
            detailed: None,
        }
    }

    pub fn recipe(id: &str, slug: &str) -> Recipe {
        Recipe {
            id: id.into(),
            slug: slug.into(),
            title: slug.replace('-', " "),
            summary: None,
            description: format!("A test entry for {slug}."),
            image: format!("/images/{slug}.jpg"),
            category: "Dinner".into(),
            cuisine: "Italian".into(),
            continent: "Europe".into(),
            dietary: vec![],
            meal_type: "Dinner".into(),
            audience: vec![],
            country: "Italy".into(),
            prep_time: "15 mins".into(),
            cook_time: None,
            total_time: None,
            rating: 4.5,
            rating_count: None,
            review_count: None,
            difficulty: Difficulty::Easy,
            servings: 2,
            ingredients: vec![ingredient("Salt", "1 tsp")],
            total_calories: 250,
            instructions: vec![instruction(1, "Prep")],
            story: None,
            extra: vec![],
        }
    }

    pub fn category(id: &str, title: &str, kind: Dimension) -> Category {
        Category {
            id: id.into(),
            slug: title.to_lowercase().replace(' ', "-"),
            title: title.into(),
            image: "/images/category.jpg".into(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipe_parses_camel_case_fields() {
        let json = r#"{
            "id": "1",
            "slug": "garlic-butter-shrimp",
            "title": "Garlic Butter Shrimp",
            "description": "Quick shrimp.",
            "image": "/images/shrimp.jpg",
            "category": "Dinner",
            "cuisine": "Italian",
            "continent": "Europe",
            "dietary": ["Gluten-Free"],
            "mealType": "Dinner",
            "audience": ["Kids"],
            "country": "Italy",
            "prepTime": "1 hr 15 mins",
            "rating": 4.8,
            "difficulty": "Easy",
            "servings": 4,
            "ingredients": [{
                "name": "Shrimp",
                "amount": "1 lb",
                "calories": 240,
                "protein": "46g",
                "carbs": "2g",
                "fat": "3g",
                "saturatedFat": "1g",
                "vitaminD": "0mcg"
            }],
            "totalCalories": 520,
            "instructions": [{"step": 1, "title": "Sear", "text": "Sear the shrimp."}]
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.meal_type, "Dinner");
        assert_eq!(recipe.prep_time, "1 hr 15 mins");
        assert_eq!(recipe.difficulty, Difficulty::Easy);
        assert_eq!(
            recipe.ingredients[0].saturated_fat.as_deref(),
            Some("1g")
        );
        assert_eq!(recipe.ingredients[0].vitamin_d.as_deref(), Some("0mcg"));
        // Optional fields absent from the file default to empty.
        assert_eq!(recipe.cook_time, None);
        assert!(recipe.extra.is_empty());
    }

    #[test]
    fn recipe_round_trips_through_json() {
        let mut recipe = fixtures::recipe("9", "overnight-oats");
        recipe.dietary = vec!["Vegetarian".into()];
        recipe.extra = vec!["Keeps for three days.".into()];
        recipe.instructions[0].detailed = Some("Use rolled oats, not steel cut.".into());

        let json = serde_json::to_string_pretty(&recipe).unwrap();
        assert!(json.contains("\"mealType\""));
        assert!(json.contains("\"prepTime\""));
        let parsed: Recipe = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, recipe);
    }

    #[test]
    fn category_type_field_maps_to_dimension() {
        let json = r#"{
            "id": "c1",
            "slug": "breakfast",
            "title": "Breakfast",
            "image": "/images/breakfast.jpg",
            "type": "mealType"
        }"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.kind, Dimension::MealType);
        let json = serde_json::to_string(&category).unwrap();
        assert!(json.contains("\"type\":\"mealType\""));
    }

    #[test]
    fn missing_required_field_is_a_parse_error() {
        let dir = std::env::temp_dir();
        let path = dir.join("recipe_directory_bad_snapshot.json");
        std::fs::write(&path, r#"[{"id": "1", "slug": "incomplete"}]"#).unwrap();
        let err = load_recipes(&path).unwrap_err();
        assert!(matches!(err, SnapshotError::Parse { .. }));
        std::fs::remove_file(&path).unwrap();
    }
}
