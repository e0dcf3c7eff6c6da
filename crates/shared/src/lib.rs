mod command;
pub mod meal;
pub mod mealplan;
pub mod person;
pub mod rating;
pub mod shopping;

pub use command::*;

#[derive(Clone)]
pub struct State {
    pub read_db: sqlx::SqlitePool,
    pub write_db: sqlx::SqlitePool,
}

impl State {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self {
            read_db: pool.clone(),
            write_db: pool,
        }
    }
}

/// Generates a new identity; ULIDs sort by creation time.
pub fn new_id() -> String {
    ulid::Ulid::new().to_string()
}
