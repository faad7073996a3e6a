// Copyright 2023 Remi Bernotavicius

//! Read-only audit of the relational store. Each check produces a value
//! carrying its verdict and the evidence behind it, so tests can assert on
//! them directly; the `Display` impl renders the console report.

use crate::database;
use crate::database::models::{IngredientRowId, InstructionRowId, RecipeId};
use crate::seed::IngredientKey;
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

#[derive(Debug)]
pub struct RecipeRows {
    pub slug: String,
    pub rows: usize,
}

/// Row-identity distinctness for one child table: every stored row must
/// carry its own id, even when two rows hold identical data.
#[derive(Debug)]
pub struct DistinctnessCheck {
    pub entity: &'static str,
    pub total_rows: usize,
    pub distinct_ids: usize,
    pub per_recipe: Vec<RecipeRows>,
}

impl DistinctnessCheck {
    pub fn passed(&self) -> bool {
        self.total_rows == self.distinct_ids
    }
}

/// Seeder postcondition: within one recipe no two ingredient rows share a
/// (name, amount) key and no two instruction rows share a step.
#[derive(Debug)]
pub struct DedupCheck {
    pub duplicate_ingredients: Vec<(String, IngredientKey)>,
    pub duplicate_steps: Vec<(String, i32)>,
}

impl DedupCheck {
    pub fn passed(&self) -> bool {
        self.duplicate_ingredients.is_empty() && self.duplicate_steps.is_empty()
    }
}

#[derive(Debug)]
pub struct Occurrence {
    pub row_id: i32,
    pub recipe_slug: String,
}

/// A name appearing in more than one recipe, with the stored rows backing
/// each occurrence.
#[derive(Debug)]
pub struct SharedName {
    pub name: String,
    pub occurrences: Vec<Occurrence>,
}

impl SharedName {
    pub fn passed(&self) -> bool {
        let ids: HashSet<i32> = self.occurrences.iter().map(|o| o.row_id).collect();
        ids.len() == self.occurrences.len()
    }
}

#[derive(Debug)]
pub struct ReuseReport {
    pub ingredient_names: Vec<SharedName>,
    pub instruction_titles: Vec<SharedName>,
}

impl ReuseReport {
    pub fn passed(&self) -> bool {
        self.ingredient_names.iter().all(SharedName::passed)
            && self.instruction_titles.iter().all(SharedName::passed)
    }
}

#[derive(Debug)]
pub struct SpotHit {
    pub row_id: i32,
    pub name: String,
    pub amount: String,
    pub recipe_slug: String,
}

/// Concrete evidence of non-sharing: every stored occurrence of a common
/// ingredient, with its owning recipe and row id.
#[derive(Debug)]
pub struct SpotCheck {
    pub needle: String,
    pub hits: Vec<SpotHit>,
}

#[derive(Debug)]
pub struct IntegrityReport {
    pub ingredients: DistinctnessCheck,
    pub instructions: DistinctnessCheck,
    pub dedup: DedupCheck,
    pub reuse: ReuseReport,
    pub spot_check: SpotCheck,
}

impl IntegrityReport {
    pub fn passed(&self) -> bool {
        self.ingredients.passed()
            && self.instructions.passed()
            && self.dedup.passed()
            && self.reuse.passed()
    }
}

fn verdict(passed: bool) -> &'static str {
    if passed {
        "PASS"
    } else {
        "FAIL"
    }
}

impl fmt::Display for IntegrityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for check in [&self.ingredients, &self.instructions] {
            writeln!(
                f,
                "{} rows: {} total, {} distinct ids [{}]",
                check.entity,
                check.total_rows,
                check.distinct_ids,
                verdict(check.passed())
            )?;
            for per_recipe in &check.per_recipe {
                writeln!(f, "  {}: {} rows", per_recipe.slug, per_recipe.rows)?;
            }
        }

        writeln!(
            f,
            "within-recipe key uniqueness [{}]",
            verdict(self.dedup.passed())
        )?;
        for (slug, key) in &self.dedup.duplicate_ingredients {
            writeln!(f, "  {slug}: duplicate ingredient {key}")?;
        }
        for (slug, step) in &self.dedup.duplicate_steps {
            writeln!(f, "  {slug}: duplicate step {step}")?;
        }

        writeln!(f, "names used by more than one recipe:")?;
        if self.reuse.ingredient_names.is_empty() && self.reuse.instruction_titles.is_empty() {
            writeln!(f, "  none")?;
        }
        for (label, entries) in [
            ("ingredient", &self.reuse.ingredient_names),
            ("instruction title", &self.reuse.instruction_titles),
        ] {
            for entry in entries {
                let rows: Vec<String> = entry
                    .occurrences
                    .iter()
                    .map(|o| format!("row {} in {}", o.row_id, o.recipe_slug))
                    .collect();
                writeln!(
                    f,
                    "  {label} {:?}: {} [{}]",
                    entry.name,
                    rows.join(", "),
                    verdict(entry.passed())
                )?;
            }
        }

        writeln!(f, "ingredient rows matching {:?}:", self.spot_check.needle)?;
        if self.spot_check.hits.is_empty() {
            writeln!(f, "  none")?;
        }
        for hit in &self.spot_check.hits {
            writeln!(
                f,
                "  row {} {:?} ({}) in {}",
                hit.row_id, hit.name, hit.amount, hit.recipe_slug
            )?;
        }

        write!(f, "integrity: {}", verdict(self.passed()))
    }
}

/// Runs every check against the store. Never mutates anything.
pub fn audit(
    conn: &mut database::Connection,
    spot_needle: &str,
) -> Result<IntegrityReport, diesel::result::Error> {
    let slug_by_recipe: HashMap<String, String> = {
        use database::schema::recipes::dsl::*;
        recipes
            .select((id, slug))
            .load::<(RecipeId, String)>(conn)?
            .into_iter()
            .map(|(recipe, s)| (recipe.0, s))
            .collect()
    };
    let slug_of = |recipe: &RecipeId| -> String {
        slug_by_recipe
            .get(&recipe.0)
            .cloned()
            .unwrap_or_else(|| recipe.0.clone())
    };

    let ingredient_cells: Vec<(IngredientRowId, RecipeId, String, String)> = {
        use database::schema::ingredients::dsl::*;
        ingredients
            .order(id.asc())
            .select((id, recipe_id, name, amount))
            .load(conn)?
    };
    let instruction_cells: Vec<(InstructionRowId, RecipeId, i32, String)> = {
        use database::schema::instructions::dsl::*;
        instructions
            .order(id.asc())
            .select((id, recipe_id, step, title))
            .load(conn)?
    };

    let ingredients = distinctness(
        "ingredient",
        ingredient_cells
            .iter()
            .map(|(row_id, recipe, ..)| (row_id.0, slug_of(recipe))),
    );
    let instructions = distinctness(
        "instruction",
        instruction_cells
            .iter()
            .map(|(row_id, recipe, ..)| (row_id.0, slug_of(recipe))),
    );

    let mut seen_keys = HashSet::new();
    let mut duplicate_ingredients = vec![];
    for (_, recipe, name, amount) in &ingredient_cells {
        let key = IngredientKey::new(name, amount);
        if !seen_keys.insert((recipe.0.clone(), key.clone())) {
            duplicate_ingredients.push((slug_of(recipe), key));
        }
    }
    let mut seen_steps = HashSet::new();
    let mut duplicate_steps = vec![];
    for (_, recipe, step, _) in &instruction_cells {
        if !seen_steps.insert((recipe.0.clone(), *step)) {
            duplicate_steps.push((slug_of(recipe), *step));
        }
    }

    let reuse = ReuseReport {
        ingredient_names: shared_names(
            ingredient_cells
                .iter()
                .map(|(row_id, recipe, name, _)| (row_id.0, recipe, name.as_str()))
                .collect(),
            &slug_of,
        ),
        instruction_titles: shared_names(
            instruction_cells
                .iter()
                .map(|(row_id, recipe, _, title)| (row_id.0, recipe, title.as_str()))
                .collect(),
            &slug_of,
        ),
    };

    let needle = spot_needle.to_lowercase();
    let hits = ingredient_cells
        .iter()
        .filter(|(_, _, name, _)| name.to_lowercase().contains(&needle))
        .map(|(row_id, recipe, name, amount)| SpotHit {
            row_id: row_id.0,
            name: name.clone(),
            amount: amount.clone(),
            recipe_slug: slug_of(recipe),
        })
        .collect();

    Ok(IntegrityReport {
        ingredients,
        instructions,
        dedup: DedupCheck {
            duplicate_ingredients,
            duplicate_steps,
        },
        reuse,
        spot_check: SpotCheck {
            needle: spot_needle.to_string(),
            hits,
        },
    })
}

fn distinctness(
    entity: &'static str,
    cells: impl Iterator<Item = (i32, String)>,
) -> DistinctnessCheck {
    let mut ids = HashSet::new();
    let mut per_recipe: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_rows = 0;
    for (row_id, slug) in cells {
        total_rows += 1;
        ids.insert(row_id);
        *per_recipe.entry(slug).or_default() += 1;
    }
    DistinctnessCheck {
        entity,
        total_rows,
        distinct_ids: ids.len(),
        per_recipe: per_recipe
            .into_iter()
            .map(|(slug, rows)| RecipeRows { slug, rows })
            .collect(),
    }
}

fn shared_names(
    cells: Vec<(i32, &RecipeId, &str)>,
    slug_of: &dyn Fn(&RecipeId) -> String,
) -> Vec<SharedName> {
    let mut by_name: BTreeMap<&str, Vec<(i32, &RecipeId)>> = BTreeMap::new();
    for (row_id, recipe, name) in cells {
        by_name.entry(name).or_default().push((row_id, recipe));
    }
    by_name
        .into_iter()
        .filter(|(_, occurrences)| {
            let recipes: HashSet<&str> = occurrences
                .iter()
                .map(|(_, recipe)| recipe.0.as_str())
                .collect();
            recipes.len() > 1
        })
        .map(|(name, occurrences)| SharedName {
            name: name.to_string(),
            occurrences: occurrences
                .into_iter()
                .map(|(row_id, recipe)| Occurrence {
                    row_id,
                    recipe_slug: slug_of(recipe),
                })
                .collect(),
        })
        .collect()
}
