use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Effort {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Quantity as it was entered: either a number or free text such as `"1 1/2"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Amount(f64),
    Text(String),
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Self::Amount(value)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<Quantity>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub unit: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: impl Into<Option<f64>>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into().map(Quantity::Amount),
            unit: unit.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub prep_time_minutes: Option<u32>,
    #[serde(default)]
    pub cook_time_minutes: Option<u32>,
    #[serde(default)]
    pub effort: Effort,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Meal {
    /// Trims ingredient names and drops the ones left empty.
    pub fn sanitize_ingredients(&mut self) {
        self.ingredients = sanitize_ingredients(std::mem::take(&mut self.ingredients));
    }
}

pub fn sanitize_ingredients(ingredients: Vec<Ingredient>) -> Vec<Ingredient> {
    ingredients
        .into_iter()
        .filter_map(|mut ingredient| {
            let name = ingredient.name.trim();
            if name.is_empty() {
                return None;
            }

            ingredient.name = name.to_owned();
            ingredient.unit = ingredient.unit.trim().to_owned();
            Some(ingredient)
        })
        .collect()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
