// Copyright 2023 Remi Bernotavicius

use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

mod database;
mod duration;
mod regenerate;
mod seed;
mod snapshot;
mod taxonomy;
mod verify;

type Error = Box<dyn std::error::Error + Send + Sync + 'static>;
type Result<T> = std::result::Result<T, Error>;

#[derive(Parser, Debug)]
struct Args {
    /// Path to the SQLite store. Defaults to the per-user data directory.
    #[arg(long)]
    database: Option<PathBuf>,
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rebuild the relational store from a JSON snapshot.
    Seed {
        recipes: PathBuf,
        categories: PathBuf,
    },
    /// Reconstruct the JSON snapshot from the relational store.
    Regenerate { out_dir: PathBuf },
    /// Audit referential correctness of the store.
    Verify {
        /// Ingredient name substring printed with every stored occurrence.
        #[arg(long, default_value = "salt")]
        spot_check: String,
    },
    /// Print the taxonomy grouping of a snapshot, all dimensions by default.
    Groups {
        recipes: PathBuf,
        /// Categories file; when given, the recipes each category matches
        /// are printed as well.
        #[arg(long)]
        categories: Option<PathBuf>,
        #[arg(long, value_enum)]
        dimension: Option<taxonomy::Dimension>,
    },
    /// Print each recipe's timing fields as ISO-8601 durations.
    Durations { recipes: PathBuf },
}

/// This is where the database lives on-disk. On Linux it should be like:
/// `~/.local/share/recipe_directory/`
fn data_path() -> Result<PathBuf> {
    let dirs = directories::BaseDirs::new().expect("failed to get user home directory");
    let path = dirs.data_dir().join("recipe_directory");
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

fn main() -> Result<()> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()?;

    let args = Args::parse();
    let database_path = match args.database {
        Some(path) => path,
        None => data_path()?.join("recipes.sqlite"),
    };

    match args.commands {
        Commands::Seed {
            recipes,
            categories,
        } => {
            // Both snapshot files must parse before the store is touched.
            let recipes = snapshot::load_recipes(recipes)?;
            let categories = snapshot::load_categories(categories)?;
            let mut conn = database::establish_connection(database_path)?;
            let summary = seed::seed(&mut conn, &recipes, &categories)?;
            println!("{summary}");
        }
        Commands::Regenerate { out_dir } => {
            let mut conn = database::establish_connection(database_path)?;
            let regenerated = regenerate::regenerate(&mut conn)?;
            std::fs::create_dir_all(&out_dir)?;
            snapshot::write_recipes(out_dir.join("recipes.json"), &regenerated.recipes)?;
            snapshot::write_categories(out_dir.join("categories.json"), &regenerated.categories)?;
            println!(
                "wrote {} recipes and {} categories to {}",
                regenerated.recipes.len(),
                regenerated.categories.len(),
                out_dir.display()
            );
            for failure in &regenerated.failures {
                log::warn!("{failure}");
            }
        }
        Commands::Verify { spot_check } => {
            let mut conn = database::establish_connection(database_path)?;
            let report = verify::audit(&mut conn, &spot_check)?;
            println!("{report}");
            if !report.passed() {
                std::process::exit(1);
            }
        }
        Commands::Groups {
            recipes,
            categories,
            dimension,
        } => {
            let recipes = snapshot::load_recipes(recipes)?;
            let categories = match categories {
                Some(path) => snapshot::load_categories(path)?,
                None => vec![],
            };
            let dimensions: Vec<_> = match dimension {
                Some(dimension) => vec![dimension],
                None => taxonomy::Dimension::iter().collect(),
            };
            for dimension in dimensions {
                println!("[{dimension}]");
                for (key, members) in taxonomy::group_recipes(&recipes, dimension) {
                    println!("{key} ({} recipes)", members.len());
                    for recipe in members {
                        println!("  {}", recipe.title);
                    }
                }
                for category in categories.iter().filter(|c| c.kind == dimension) {
                    let matched = taxonomy::recipes_for_category(&recipes, category);
                    println!("category {:?} ({} recipes)", category.title, matched.len());
                    for recipe in matched {
                        println!("  {}", recipe.title);
                    }
                }
                println!();
            }
        }
        Commands::Durations { recipes } => {
            let recipes = snapshot::load_recipes(recipes)?;
            for recipe in &recipes {
                let prep = duration::to_iso8601(&recipe.prep_time).unwrap_or_else(|| "-".into());
                let cook = recipe
                    .cook_time
                    .as_deref()
                    .and_then(duration::to_iso8601)
                    .unwrap_or_else(|| "-".into());
                let total = recipe
                    .total_time
                    .as_deref()
                    .and_then(duration::to_iso8601)
                    .unwrap_or_else(|| "-".into());
                println!("{}: prep {prep} cook {cook} total {total}", recipe.slug);
            }
        }
    }
    Ok(())
}
