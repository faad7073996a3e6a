// Copyright 2023 Remi Bernotavicius

//! In-memory grouping of the recipe collection by classification dimension,
//! for the browse pages. Grouping never touches the relational store; it
//! works on the snapshot directly.

use crate::snapshot::{Category, Recipe};
use derive_more::Display;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use strum::EnumIter;

/// Bucket for recipes whose scalar dimension value is empty.
pub const SCALAR_FALLBACK: &str = "Other";
/// Bucket for recipes carrying no tag on a multi-valued dimension.
pub const TAG_FALLBACK: &str = "Regular";

/// The six classification axes. Serialized (and stored in the
/// `categories.type` column) as the camelCase names the snapshot uses.
#[derive(
    Debug,
    Display,
    Hash,
    Copy,
    Clone,
    PartialEq,
    Eq,
    EnumIter,
    DbEnum,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[DbValueStyle = "camelCase"]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    #[display("cuisine")]
    Cuisine,
    #[display("continent")]
    Continent,
    #[display("dietary")]
    Dietary,
    #[display("mealType")]
    MealType,
    #[display("audience")]
    Audience,
    #[display("country")]
    Country,
}

impl Dimension {
    pub fn iter() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }

    fn scalar_value<'a>(&self, recipe: &'a Recipe) -> Option<&'a str> {
        match self {
            Self::Cuisine => Some(&recipe.cuisine),
            Self::Continent => Some(&recipe.continent),
            Self::MealType => Some(&recipe.meal_type),
            Self::Country => Some(&recipe.country),
            Self::Dietary | Self::Audience => None,
        }
    }

    fn tag_values<'a>(&self, recipe: &'a Recipe) -> Option<&'a [String]> {
        match self {
            Self::Dietary => Some(&recipe.dietary),
            Self::Audience => Some(&recipe.audience),
            _ => None,
        }
    }

    /// Typed matcher for this dimension: case-insensitive equality for
    /// scalar axes, case-insensitive containment for tag axes.
    pub fn matches(&self, recipe: &Recipe, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        match self.tag_values(recipe) {
            Some(tags) => tags.iter().any(|tag| tag.to_lowercase().contains(&needle)),
            None => self
                .scalar_value(recipe)
                .is_some_and(|value| value.to_lowercase() == needle),
        }
    }

    /// Group keys one recipe contributes to under this dimension. A recipe
    /// holding several tags lands in one group per tag; repeats of the same
    /// tag within a recipe count once.
    fn group_keys(&self, recipe: &Recipe) -> Vec<String> {
        match self.tag_values(recipe) {
            Some([]) => vec![TAG_FALLBACK.into()],
            Some(tags) => {
                let mut seen = HashSet::new();
                tags.iter()
                    .filter(|tag| seen.insert(tag.as_str()))
                    .cloned()
                    .collect()
            }
            None => match self.scalar_value(recipe) {
                Some(value) if !value.is_empty() => vec![value.into()],
                _ => vec![SCALAR_FALLBACK.into()],
            },
        }
    }
}

/// Groups recipes by one dimension. The `BTreeMap` keeps group keys in the
/// lexicographic order the display layer expects; within a group, snapshot
/// order is preserved.
pub fn group_recipes<'a>(
    recipes: &'a [Recipe],
    dimension: Dimension,
) -> BTreeMap<String, Vec<&'a Recipe>> {
    let mut groups: BTreeMap<String, Vec<&'a Recipe>> = BTreeMap::new();
    for recipe in recipes {
        for key in dimension.group_keys(recipe) {
            groups.entry(key).or_default().push(recipe);
        }
    }
    groups
}

/// Category-to-recipe association used by the browse pages. The recipe's own
/// `category` field is consulted first, so any category can match through
/// it; otherwise the matcher of the category's declared dimension decides.
pub fn category_matches(category: &Category, recipe: &Recipe) -> bool {
    recipe.category.to_lowercase() == category.title.to_lowercase()
        || category.kind.matches(recipe, &category.title)
}

pub fn recipes_for_category<'a>(recipes: &'a [Recipe], category: &Category) -> Vec<&'a Recipe> {
    recipes
        .iter()
        .filter(|recipe| category_matches(category, recipe))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::fixtures::{category, recipe};
    use maplit::btreemap;

    fn slugs(groups: &BTreeMap<String, Vec<&Recipe>>) -> BTreeMap<String, Vec<String>> {
        groups
            .iter()
            .map(|(key, members)| {
                (
                    key.clone(),
                    members.iter().map(|r| r.slug.clone()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn scalar_dimension_groups_each_recipe_once() {
        let mut carbonara = recipe("1", "carbonara");
        carbonara.cuisine = "Italian".into();
        let mut tacos = recipe("2", "tacos");
        tacos.cuisine = "Mexican".into();
        let mut risotto = recipe("3", "risotto");
        risotto.cuisine = "Italian".into();
        let mut stew = recipe("4", "stew");
        stew.cuisine = String::new();

        let recipes = vec![carbonara, tacos, risotto, stew];
        let groups = group_recipes(&recipes, Dimension::Cuisine);

        assert_eq!(
            slugs(&groups),
            btreemap! {
                "Italian".to_string() => vec!["carbonara".to_string(), "risotto".to_string()],
                "Mexican".to_string() => vec!["tacos".to_string()],
                SCALAR_FALLBACK.to_string() => vec!["stew".to_string()],
            }
        );
    }

    #[test]
    fn dietary_dimension_groups_once_per_tag() {
        let mut curry = recipe("1", "curry");
        curry.dietary = vec!["Vegan".into(), "Gluten-Free".into()];
        let mut roast = recipe("2", "roast");
        roast.dietary = vec![];

        let recipes = vec![curry, roast];
        let groups = group_recipes(&recipes, Dimension::Dietary);

        assert_eq!(
            slugs(&groups),
            btreemap! {
                "Gluten-Free".to_string() => vec!["curry".to_string()],
                "Vegan".to_string() => vec!["curry".to_string()],
                TAG_FALLBACK.to_string() => vec!["roast".to_string()],
            }
        );
    }

    #[test]
    fn repeated_tag_within_a_recipe_counts_once() {
        let mut oats = recipe("1", "oats");
        oats.dietary = vec!["Vegetarian".into(), "Vegetarian".into()];

        let recipes = vec![oats];
        let groups = group_recipes(&recipes, Dimension::Dietary);
        assert_eq!(groups["Vegetarian"].len(), 1);
    }

    #[test]
    fn group_keys_come_out_sorted() {
        let mut a = recipe("1", "a");
        a.country = "Mexico".into();
        let mut b = recipe("2", "b");
        b.country = "India".into();
        let mut c = recipe("3", "c");
        c.country = "Zimbabwe".into();

        let recipes = vec![a, b, c];
        let groups = group_recipes(&recipes, Dimension::Country);
        let keys: Vec<_> = groups.keys().cloned().collect();
        assert_eq!(keys, vec!["India", "Mexico", "Zimbabwe"]);
    }

    #[test]
    fn scalar_category_matches_case_insensitively() {
        let italian = category("c1", "ITALIAN", Dimension::Cuisine);
        let mut carbonara = recipe("1", "carbonara");
        carbonara.cuisine = "Italian".into();
        let mut tacos = recipe("2", "tacos");
        tacos.cuisine = "Mexican".into();

        let recipes = vec![carbonara, tacos];
        let matched = recipes_for_category(&recipes, &italian);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].slug, "carbonara");
    }

    #[test]
    fn tag_category_matches_by_containment() {
        let kids = category("c2", "Kids", Dimension::Audience);
        let mut pancakes = recipe("1", "pancakes");
        pancakes.audience = vec!["Kids Favorites".into()];
        pancakes.category = "Breakfast".into();

        let recipes = vec![pancakes];
        assert_eq!(recipes_for_category(&recipes, &kids).len(), 1);
    }

    #[test]
    fn recipe_category_field_matches_before_the_typed_matcher() {
        // The declared dimension does not match, the category field does.
        let dinner = category("c3", "Dinner", Dimension::MealType);
        let mut stew = recipe("1", "stew");
        stew.category = "Dinner".into();
        stew.meal_type = "Supper".into();

        let recipes = vec![stew];
        assert_eq!(recipes_for_category(&recipes, &dinner).len(), 1);
    }

    #[test]
    fn unmatched_category_yields_an_empty_group() {
        let thai = category("c4", "Thai", Dimension::Cuisine);
        let recipes = vec![recipe("1", "carbonara")];
        assert!(recipes_for_category(&recipes, &thai).is_empty());
    }
}
