use mealplanner_shared::State;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use std::{path::PathBuf, str::FromStr};

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<State> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    mealplanner_db::migrator()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;

    Ok(State::new(pool))
}

#[allow(dead_code)]
pub async fn insert_person(state: &State, id: &str, name: &str) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO person (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(&state.write_db)
        .await?;

    Ok(())
}
