use mealplanner_shared::person::Person;
use serde::Deserialize;
use validator::Validate;

#[derive(Validate, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PersonInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub eating_preferences: Option<String>,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub cooking_preferences: Option<String>,
}

fn blank_as_none(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

impl PersonInput {
    pub fn normalize(self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            eating_preferences: blank_as_none(self.eating_preferences),
            cooking_preferences: blank_as_none(self.cooking_preferences),
        }
    }

    pub fn into_person(self, id: impl Into<String>) -> Person {
        Person {
            id: id.into(),
            name: self.name,
            eating_preferences: self.eating_preferences,
            cooking_preferences: self.cooking_preferences,
        }
    }
}
