use std::ops::Deref;

use mealplanner_db::table::MealRating;
use mealplanner_shared::rating::Rating;
use sea_query::{Expr, ExprTrait, Order, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, prelude::FromRow};

pub(crate) const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'_>] =
    time::macros::format_description!("[year]-[month]-[day]");

#[derive(Clone)]
pub struct RatingQuery(pub mealplanner_shared::State);

impl Deref for RatingQuery {
    type Target = mealplanner_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(FromRow)]
pub struct RatingRow {
    pub id: String,
    pub meal_id: String,
    pub person_id: String,
    pub rating: i64,
    pub comment: Option<String>,
    pub rated_date: String,
}

impl TryFrom<RatingRow> for Rating {
    type Error = anyhow::Error;

    fn try_from(row: RatingRow) -> Result<Self, Self::Error> {
        let rated_date = time::Date::parse(&row.rated_date, DATE_FORMAT)?;

        Ok(Self {
            id: row.id,
            meal_id: row.meal_id,
            person_id: row.person_id,
            rating: super::clamp_rating(row.rating),
            comment: row.comment,
            rated_date,
        })
    }
}

fn select_ratings() -> SelectStatement {
    sea_query::Query::select()
        .columns([
            MealRating::Id,
            MealRating::MealId,
            MealRating::PersonId,
            MealRating::Rating,
            MealRating::Comment,
            MealRating::RatedDate,
        ])
        .from(MealRating::Table)
        .order_by(MealRating::RatedDate, Order::Desc)
        .order_by(MealRating::Id, Order::Desc)
        .to_owned()
}

pub(crate) async fn find_rating(
    conn: &mut SqliteConnection,
    mut statement: SelectStatement,
) -> anyhow::Result<Option<Rating>> {
    let (sql, values) = statement.limit(1).build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, RatingRow, _>(&sql, values)
        .fetch_optional(conn)
        .await?;

    row.map(Rating::try_from).transpose()
}

pub(crate) fn by_id(id: &str) -> SelectStatement {
    select_ratings()
        .and_where(Expr::col(MealRating::Id).eq(id))
        .to_owned()
}

pub(crate) fn by_meal_and_person(meal_id: &str, person_id: &str) -> SelectStatement {
    select_ratings()
        .and_where(Expr::col(MealRating::MealId).eq(meal_id))
        .and_where(Expr::col(MealRating::PersonId).eq(person_id))
        .to_owned()
}

impl RatingQuery {
    pub async fn find(&self, id: impl Into<String>) -> anyhow::Result<Option<Rating>> {
        let id = id.into();
        let mut conn = self.read_db.acquire().await?;

        find_rating(&mut conn, by_id(&id)).await
    }

    /// Ratings of a meal, newest first, one per person.
    pub async fn for_meal(&self, meal_id: impl Into<String>) -> anyhow::Result<Vec<Rating>> {
        let meal_id = meal_id.into();
        let statement = select_ratings()
            .and_where(Expr::col(MealRating::MealId).eq(&meal_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, RatingRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        let ratings = rows
            .into_iter()
            .map(Rating::try_from)
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(super::latest_per_person(ratings))
    }

    pub async fn average(&self, meal_id: impl Into<String>) -> anyhow::Result<Option<f64>> {
        let ratings = self.for_meal(meal_id).await?;

        Ok(super::average_rating(&ratings))
    }
}
