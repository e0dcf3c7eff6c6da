use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    pub name: String,
    pub total_quantity: f64,
    /// `total_quantity` as shown to people: whole numbers without decimals,
    /// anything else rounded to one decimal.
    #[serde(default)]
    pub display_quantity: String,
    pub unit: String,
}
