use std::ops::Deref;

use mealplanner_db::table::{Meal, MealRating, Person};
use mealplanner_shared::rating::Rating;
use sea_query::{Expr, ExprTrait, OnConflict, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use sqlx::SqliteConnection;
use time::OffsetDateTime;
use validator::Validate;

use super::query::{self, DATE_FORMAT, find_rating};

#[derive(Clone)]
pub struct RatingCommand(pub mealplanner_shared::State);

impl Deref for RatingCommand {
    type Target = mealplanner_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Validate, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RatingInput {
    #[validate(length(min = 1))]
    pub meal_id: String,
    #[validate(length(min = 1))]
    pub person_id: String,
    /// Clamped to 1..=5 when stored.
    pub rating: i64,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub comment: Option<String>,
}

#[derive(Validate, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RatingUpdate {
    pub rating: i64,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub comment: Option<String>,
}

fn today() -> anyhow::Result<String> {
    Ok(OffsetDateTime::now_utc().date().format(DATE_FORMAT)?)
}

fn clean_comment(comment: Option<String>) -> Option<String> {
    comment
        .map(|comment| comment.trim().to_owned())
        .filter(|comment| !comment.is_empty())
}

impl RatingCommand {
    /// Records how a person rated a meal. Rating the same meal again replaces
    /// the earlier rating.
    #[tracing::instrument(skip(self))]
    pub async fn rate(&self, input: RatingInput) -> mealplanner_shared::Result<Rating> {
        input.validate()?;

        let mut tx = self.write_db.begin().await?;
        if !exists(&mut tx, Meal::Table, Meal::Id, &input.meal_id).await? {
            mealplanner_shared::not_found!("meal {}", input.meal_id);
        }
        if !exists(&mut tx, Person::Table, Person::Id, &input.person_id).await? {
            mealplanner_shared::not_found!("person {}", input.person_id);
        }

        let statement = sea_query::Query::insert()
            .into_table(MealRating::Table)
            .columns([
                MealRating::Id,
                MealRating::MealId,
                MealRating::PersonId,
                MealRating::Rating,
                MealRating::Comment,
                MealRating::RatedDate,
            ])
            .values_panic([
                mealplanner_shared::new_id().into(),
                input.meal_id.to_owned().into(),
                input.person_id.to_owned().into(),
                i64::from(super::clamp_rating(input.rating)).into(),
                clean_comment(input.comment).into(),
                today()?.into(),
            ])
            .on_conflict(
                OnConflict::columns([MealRating::MealId, MealRating::PersonId])
                    .update_columns([
                        MealRating::Rating,
                        MealRating::Comment,
                        MealRating::RatedDate,
                    ])
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        let rating = find_rating(
            &mut tx,
            query::by_meal_and_person(&input.meal_id, &input.person_id),
        )
        .await?;
        tx.commit().await?;

        let Some(rating) = rating else {
            mealplanner_shared::bail!("rating for meal {} could not be saved", input.meal_id);
        };

        tracing::info!(rating_id = %rating.id, meal_id = %rating.meal_id, "meal rated");

        Ok(rating)
    }

    #[tracing::instrument(skip(self))]
    pub async fn update(
        &self,
        id: impl Into<String> + std::fmt::Debug,
        input: RatingUpdate,
    ) -> mealplanner_shared::Result<Rating> {
        input.validate()?;
        let id = id.into();

        let mut tx = self.write_db.begin().await?;
        let statement = sea_query::Query::update()
            .table(MealRating::Table)
            .value(MealRating::Rating, i64::from(super::clamp_rating(input.rating)))
            .value(MealRating::Comment, clean_comment(input.comment))
            .value(MealRating::RatedDate, today()?)
            .and_where(Expr::col(MealRating::Id).eq(&id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        if result.rows_affected() == 0 {
            mealplanner_shared::not_found!("rating {id}");
        }

        let rating = find_rating(&mut tx, query::by_id(&id)).await?;
        tx.commit().await?;

        match rating {
            Some(rating) => Ok(rating),
            None => mealplanner_shared::not_found!("rating {id}"),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(
        &self,
        id: impl Into<String> + std::fmt::Debug,
    ) -> mealplanner_shared::Result<()> {
        let id = id.into();
        let statement = sea_query::Query::delete()
            .from_table(MealRating::Table)
            .and_where(Expr::col(MealRating::Id).eq(&id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        if result.rows_affected() == 0 {
            mealplanner_shared::not_found!("rating {id}");
        }

        tracing::info!(rating_id = %id, "rating deleted");

        Ok(())
    }
}

async fn exists<T, C>(
    conn: &mut SqliteConnection,
    table: T,
    id_column: C,
    id: &str,
) -> mealplanner_shared::Result<bool>
where
    T: sea_query::IntoTableRef,
    C: sea_query::IntoColumnRef + Clone,
{
    let statement = sea_query::Query::select()
        .column(id_column.clone())
        .from(table)
        .and_where(Expr::col(id_column).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_with(&sql, values).fetch_optional(conn).await?;

    Ok(row.is_some())
}
