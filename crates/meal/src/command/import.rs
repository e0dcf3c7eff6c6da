use serde::Serialize;
use validator::Validate;

use super::{MealInput, insert_meal};
use crate::catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
}

impl super::Command {
    /// Inserts every meal whose title is not already in the catalog. The
    /// batch is rejected as a whole when one of its meals is invalid.
    #[tracing::instrument(skip_all, fields(count = inputs.len()))]
    pub async fn import(&self, inputs: Vec<MealInput>) -> mealplanner_shared::Result<ImportResult> {
        let inputs = inputs
            .into_iter()
            .map(MealInput::normalize)
            .collect::<Vec<_>>();

        for input in inputs.iter() {
            input.validate()?;
        }

        let existing = self.query().titles().await?;
        let plan = catalog::plan_import(existing.iter().map(String::as_str), inputs, |input| {
            input.title.as_str()
        });

        let mut tx = self.write_db.begin().await?;
        for input in plan.to_insert.iter() {
            let meal = input.clone().into_meal(mealplanner_shared::new_id());
            insert_meal(&mut tx, &meal).await?;
        }
        tx.commit().await?;

        let result = ImportResult {
            imported: plan.to_insert.len(),
            skipped: plan.skipped,
        };

        tracing::info!(
            imported = result.imported,
            skipped = result.skipped,
            "meals imported"
        );

        Ok(result)
    }
}
