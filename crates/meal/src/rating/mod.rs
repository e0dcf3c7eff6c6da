use std::collections::HashMap;

use mealplanner_shared::rating::Rating;

cfg_if::cfg_if! {
    if #[cfg(feature = "full")] {
        mod command;
        mod query;

        pub use command::*;
        pub use query::*;
    }
}

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

pub fn clamp_rating(value: i64) -> u8 {
    value.clamp(MIN_RATING.into(), MAX_RATING.into()) as u8
}

/// Mean of all ratings, `None` when there are none.
pub fn average_rating(ratings: &[Rating]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }

    let total = ratings.iter().map(|r| f64::from(r.rating)).sum::<f64>();

    Some(total / ratings.len() as f64)
}

/// Most recent rating of each person, in the order people first appear.
pub fn latest_per_person(ratings: Vec<Rating>) -> Vec<Rating> {
    let mut latest: Vec<Rating> = vec![];
    let mut index: HashMap<String, usize> = HashMap::new();

    for rating in ratings {
        match index.get(&rating.person_id) {
            Some(&position) => {
                let current = &latest[position];
                if (rating.rated_date, &rating.id) > (current.rated_date, &current.id) {
                    latest[position] = rating;
                }
            }
            None => {
                index.insert(rating.person_id.to_owned(), latest.len());
                latest.push(rating);
            }
        }
    }

    latest
}
