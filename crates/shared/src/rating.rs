use serde::{Deserialize, Serialize};
use time::Date;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: String,
    pub meal_id: String,
    pub person_id: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    pub rated_date: Date,
}
