// Copyright 2023 Remi Bernotavicius

//! Schema declaration for the relational store. The store is a derived
//! projection of the JSON snapshot, rebuildable at any time, so there is no
//! migration history; every table is created with `IF NOT EXISTS` and each
//! statement runs independently of its siblings.

use super::Connection;
use diesel::RunQueryDsl as _;

pub const TABLES: &[(&str, &str)] = &[
    (
        "recipes",
        "CREATE TABLE IF NOT EXISTS recipes (
            id TEXT PRIMARY KEY,
            slug TEXT UNIQUE NOT NULL,
            title TEXT NOT NULL,
            summary TEXT,
            description TEXT NOT NULL,
            story TEXT,
            image TEXT NOT NULL,
            category TEXT NOT NULL,
            cuisine TEXT NOT NULL,
            continent TEXT NOT NULL,
            meal_type TEXT NOT NULL,
            country TEXT NOT NULL,
            prep_time TEXT NOT NULL,
            cook_time TEXT,
            total_time TEXT,
            rating REAL NOT NULL,
            rating_count INTEGER,
            review_count INTEGER,
            difficulty TEXT NOT NULL,
            servings INTEGER NOT NULL,
            total_calories INTEGER NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
    ),
    (
        "ingredients",
        "CREATE TABLE IF NOT EXISTS ingredients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id TEXT NOT NULL,
            name TEXT NOT NULL,
            amount TEXT NOT NULL,
            calories INTEGER NOT NULL,
            protein TEXT NOT NULL,
            carbs TEXT NOT NULL,
            fat TEXT NOT NULL,
            saturated_fat TEXT,
            cholesterol TEXT,
            fiber TEXT,
            sugar TEXT,
            sodium TEXT,
            vitamin_d TEXT,
            calcium TEXT,
            iron TEXT,
            potassium TEXT,
            FOREIGN KEY (recipe_id) REFERENCES recipes(id) ON DELETE CASCADE
        )",
    ),
    (
        "instructions",
        "CREATE TABLE IF NOT EXISTS instructions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id TEXT NOT NULL,
            step INTEGER NOT NULL,
            title TEXT NOT NULL,
            text TEXT NOT NULL,
            detailed TEXT,
            FOREIGN KEY (recipe_id) REFERENCES recipes(id) ON DELETE CASCADE
        )",
    ),
    (
        "recipe_dietary",
        "CREATE TABLE IF NOT EXISTS recipe_dietary (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id TEXT NOT NULL,
            dietary_restriction TEXT NOT NULL,
            FOREIGN KEY (recipe_id) REFERENCES recipes(id) ON DELETE CASCADE
        )",
    ),
    (
        "recipe_audience",
        "CREATE TABLE IF NOT EXISTS recipe_audience (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id TEXT NOT NULL,
            audience TEXT NOT NULL,
            FOREIGN KEY (recipe_id) REFERENCES recipes(id) ON DELETE CASCADE
        )",
    ),
    (
        "recipe_extra",
        "CREATE TABLE IF NOT EXISTS recipe_extra (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id TEXT NOT NULL,
            content TEXT NOT NULL,
            FOREIGN KEY (recipe_id) REFERENCES recipes(id) ON DELETE CASCADE
        )",
    ),
    (
        "categories",
        "CREATE TABLE IF NOT EXISTS categories (
            id TEXT PRIMARY KEY,
            slug TEXT UNIQUE NOT NULL,
            title TEXT NOT NULL,
            image TEXT NOT NULL,
            type TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
    ),
];

/// Creates every managed table. A failure is logged and collected but does
/// not stop the remaining tables from being created.
pub fn create_tables(conn: &mut Connection) -> Vec<(&'static str, diesel::result::Error)> {
    let mut failures = vec![];
    for (table, ddl) in TABLES {
        match diesel::sql_query(*ddl).execute(conn) {
            Ok(_) => log::debug!("table {table} ready"),
            Err(error) => {
                log::error!("failed to create table {table}: {error}");
                failures.push((*table, error));
            }
        }
    }
    failures
}
