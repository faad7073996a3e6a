// Copyright 2023 Remi Bernotavicius

//! Destructive rebuild of the relational store from a snapshot. A seed cycle
//! runs inside a single transaction; each recipe additionally gets its own
//! savepoint, so one bad record is dropped whole without poisoning the rest
//! of the batch.

use crate::database;
use crate::database::models::{
    NewAudienceRow, NewDietaryRow, NewExtraRow, NewIngredientRow, NewInstructionRow, RecipeId,
    RecipeRow,
};
use crate::snapshot;
use diesel::prelude::Connection as _;
use diesel::RunQueryDsl as _;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

/// Within-recipe identity of an ingredient. Entries sharing a name but not
/// an amount ("Salt" 1 tsp vs "Salt" 2 tsp) are distinct.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct IngredientKey {
    pub name: String,
    pub amount: String,
}

impl IngredientKey {
    pub fn new(name: &str, amount: &str) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
        }
    }
}

impl fmt::Display for IngredientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self.name, self.amount)
    }
}

/// Collapses duplicates by key: the first occurrence keeps its position, the
/// last occurrence's fields win.
pub fn dedup_last_wins<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: Hash + Eq + Clone,
    F: Fn(&T) -> K,
{
    let mut order = Vec::new();
    let mut by_key: HashMap<K, T> = HashMap::new();
    for item in items {
        let k = key(&item);
        if !by_key.contains_key(&k) {
            order.push(k.clone());
        }
        by_key.insert(k, item);
    }
    order.into_iter().filter_map(|k| by_key.remove(&k)).collect()
}

/// Set semantics for tag lists: first occurrence wins, order preserved.
pub fn dedup_tags(tags: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.iter()
        .filter(|tag| seen.insert(tag.as_str()))
        .cloned()
        .collect()
}

#[derive(Debug)]
pub struct SkippedRecord {
    pub id: String,
    pub slug: String,
    pub error: diesel::result::Error,
}

#[derive(Debug, Default)]
pub struct SeedSummary {
    pub categories: usize,
    pub recipes: usize,
    pub ingredients: usize,
    pub instructions: usize,
    pub dietary: usize,
    pub audience: usize,
    pub extra: usize,
    pub skipped: Vec<SkippedRecord>,
}

impl fmt::Display for SeedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "seeded {} categories", self.categories)?;
        writeln!(f, "seeded {} recipes", self.recipes)?;
        writeln!(f, "  {} ingredient rows", self.ingredients)?;
        writeln!(f, "  {} instruction rows", self.instructions)?;
        writeln!(f, "  {} dietary rows", self.dietary)?;
        writeln!(f, "  {} audience rows", self.audience)?;
        writeln!(f, "  {} extra rows", self.extra)?;
        write!(f, "skipped {} records", self.skipped.len())?;
        for skipped in &self.skipped {
            write!(f, "\n  {} ({}): {}", skipped.slug, skipped.id, skipped.error)?;
        }
        Ok(())
    }
}

struct RecipeCounts {
    ingredients: usize,
    instructions: usize,
    dietary: usize,
    audience: usize,
    extra: usize,
}

/// Replaces the entire store contents with the given snapshot. Commits only
/// if the cycle as a whole succeeds; individual bad records are logged,
/// counted in [`SeedSummary::skipped`], and left out.
pub fn seed(
    conn: &mut database::Connection,
    recipes: &[snapshot::Recipe],
    categories: &[snapshot::Category],
) -> Result<SeedSummary, diesel::result::Error> {
    conn.transaction(|conn| {
        clear_store(conn)?;

        let mut summary = SeedSummary::default();
        for category in categories {
            match insert_category(conn, category) {
                Ok(()) => summary.categories += 1,
                Err(error) => {
                    log::error!("skipping category {:?}: {error}", category.slug);
                    summary.skipped.push(SkippedRecord {
                        id: category.id.clone(),
                        slug: category.slug.clone(),
                        error,
                    });
                }
            }
        }

        for recipe in recipes {
            match conn.transaction(|conn| insert_recipe(conn, recipe)) {
                Ok(counts) => {
                    summary.recipes += 1;
                    summary.ingredients += counts.ingredients;
                    summary.instructions += counts.instructions;
                    summary.dietary += counts.dietary;
                    summary.audience += counts.audience;
                    summary.extra += counts.extra;
                }
                Err(error) => {
                    log::error!("skipping recipe {:?}: {error}", recipe.slug);
                    summary.skipped.push(SkippedRecord {
                        id: recipe.id.clone(),
                        slug: recipe.slug.clone(),
                        error,
                    });
                }
            }
        }

        Ok(summary)
    })
}

fn clear_store(conn: &mut database::Connection) -> Result<(), diesel::result::Error> {
    use diesel::delete;

    // Children before parents, so the deletes never trip the foreign keys.
    delete(database::schema::ingredients::dsl::ingredients).execute(conn)?;
    delete(database::schema::instructions::dsl::instructions).execute(conn)?;
    delete(database::schema::recipe_dietary::dsl::recipe_dietary).execute(conn)?;
    delete(database::schema::recipe_audience::dsl::recipe_audience).execute(conn)?;
    delete(database::schema::recipe_extra::dsl::recipe_extra).execute(conn)?;
    delete(database::schema::recipes::dsl::recipes).execute(conn)?;
    delete(database::schema::categories::dsl::categories).execute(conn)?;

    // sqlite_sequence only exists once an AUTOINCREMENT row has been written,
    // so a fresh store has nothing to reset.
    if let Err(error) = diesel::sql_query(
        "DELETE FROM sqlite_sequence WHERE name IN \
         ('ingredients', 'instructions', 'recipe_dietary', 'recipe_audience', 'recipe_extra')",
    )
    .execute(conn)
    {
        log::debug!("auto-increment reset skipped: {error}");
    }

    Ok(())
}

fn insert_category(
    conn: &mut database::Connection,
    category: &snapshot::Category,
) -> Result<(), diesel::result::Error> {
    use crate::database::models::{CategoryId, CategoryRow};

    diesel::insert_into(database::schema::categories::dsl::categories)
        .values(CategoryRow {
            id: CategoryId(category.id.clone()),
            slug: category.slug.clone(),
            title: category.title.clone(),
            image: category.image.clone(),
            kind: category.kind,
        })
        .execute(conn)?;
    Ok(())
}

fn insert_recipe(
    conn: &mut database::Connection,
    recipe: &snapshot::Recipe,
) -> Result<RecipeCounts, diesel::result::Error> {
    let recipe_id = RecipeId(recipe.id.clone());

    diesel::insert_into(database::schema::recipes::dsl::recipes)
        .values(scalar_row(recipe))
        .execute(conn)?;

    let deduped_ingredients = dedup_last_wins(recipe.ingredients.iter().collect(), |ing| {
        IngredientKey::new(&ing.name, &ing.amount)
    });
    for ingredient in &deduped_ingredients {
        diesel::insert_into(database::schema::ingredients::dsl::ingredients)
            .values(ingredient_row(&recipe_id, ingredient))
            .execute(conn)?;
    }

    let deduped_instructions =
        dedup_last_wins(recipe.instructions.iter().collect(), |inst| inst.step);
    for instruction in &deduped_instructions {
        diesel::insert_into(database::schema::instructions::dsl::instructions)
            .values(NewInstructionRow {
                recipe_id: recipe_id.clone(),
                step: instruction.step,
                title: instruction.title.clone(),
                text: instruction.text.clone(),
                detailed: instruction.detailed.clone(),
            })
            .execute(conn)?;
    }

    let dietary = dedup_tags(&recipe.dietary);
    for tag in &dietary {
        diesel::insert_into(database::schema::recipe_dietary::dsl::recipe_dietary)
            .values(NewDietaryRow {
                recipe_id: recipe_id.clone(),
                dietary_restriction: tag.clone(),
            })
            .execute(conn)?;
    }

    let audience = dedup_tags(&recipe.audience);
    for tag in &audience {
        diesel::insert_into(database::schema::recipe_audience::dsl::recipe_audience)
            .values(NewAudienceRow {
                recipe_id: recipe_id.clone(),
                audience: tag.clone(),
            })
            .execute(conn)?;
    }

    let extra = dedup_tags(&recipe.extra);
    for note in &extra {
        diesel::insert_into(database::schema::recipe_extra::dsl::recipe_extra)
            .values(NewExtraRow {
                recipe_id: recipe_id.clone(),
                content: note.clone(),
            })
            .execute(conn)?;
    }

    Ok(RecipeCounts {
        ingredients: deduped_ingredients.len(),
        instructions: deduped_instructions.len(),
        dietary: dietary.len(),
        audience: audience.len(),
        extra: extra.len(),
    })
}

fn scalar_row(recipe: &snapshot::Recipe) -> RecipeRow {
    RecipeRow {
        id: RecipeId(recipe.id.clone()),
        slug: recipe.slug.clone(),
        title: recipe.title.clone(),
        summary: recipe.summary.clone(),
        description: recipe.description.clone(),
        story: recipe.story.clone(),
        image: recipe.image.clone(),
        category: recipe.category.clone(),
        cuisine: recipe.cuisine.clone(),
        continent: recipe.continent.clone(),
        meal_type: recipe.meal_type.clone(),
        country: recipe.country.clone(),
        prep_time: recipe.prep_time.clone(),
        cook_time: recipe.cook_time.clone(),
        total_time: recipe.total_time.clone(),
        rating: recipe.rating,
        rating_count: recipe.rating_count,
        review_count: recipe.review_count,
        difficulty: recipe.difficulty,
        servings: recipe.servings,
        total_calories: recipe.total_calories,
    }
}

fn ingredient_row(recipe_id: &RecipeId, ingredient: &snapshot::Ingredient) -> NewIngredientRow {
    NewIngredientRow {
        recipe_id: recipe_id.clone(),
        name: ingredient.name.clone(),
        amount: ingredient.amount.clone(),
        calories: ingredient.calories,
        protein: ingredient.protein.clone(),
        carbs: ingredient.carbs.clone(),
        fat: ingredient.fat.clone(),
        saturated_fat: ingredient.saturated_fat.clone(),
        cholesterol: ingredient.cholesterol.clone(),
        fiber: ingredient.fiber.clone(),
        sugar: ingredient.sugar.clone(),
        sodium: ingredient.sodium.clone(),
        vitamin_d: ingredient.vitamin_d.clone(),
        calcium: ingredient.calcium.clone(),
        iron: ingredient.iron.clone(),
        potassium: ingredient.potassium.clone(),
    }
}
