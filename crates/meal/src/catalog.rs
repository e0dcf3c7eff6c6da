use std::collections::HashSet;

/// Case-insensitive substring match on a meal title. A blank search matches
/// everything.
pub fn matches_search(title: &str, search: &str) -> bool {
    let search = search.trim();

    search.is_empty() || title.to_lowercase().contains(&search.to_lowercase())
}

#[derive(Debug)]
pub struct ImportPlan<T> {
    pub to_insert: Vec<T>,
    pub skipped: usize,
}

/// Splits `incoming` into meals to insert and meals skipped because their
/// title (ignoring case) already exists or appeared earlier in the batch.
pub fn plan_import<'a, T>(
    existing_titles: impl IntoIterator<Item = &'a str>,
    incoming: Vec<T>,
    title: impl Fn(&T) -> &str,
) -> ImportPlan<T> {
    let mut seen = existing_titles
        .into_iter()
        .map(|title| title.trim().to_lowercase())
        .collect::<HashSet<_>>();

    let mut to_insert = vec![];
    let mut skipped = 0;

    for meal in incoming {
        if seen.insert(title(&meal).trim().to_lowercase()) {
            to_insert.push(meal);
        } else {
            skipped += 1;
        }
    }

    ImportPlan { to_insert, skipped }
}
