use axum::http::StatusCode;
use serde_json::{Value, json};
use temp_dir::TempDir;

mod helpers;

fn meal_ids(entries: &Value) -> Vec<String> {
    entries
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .map(|entry| entry["mealId"].as_str().unwrap_or_default().to_owned())
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_week_plan_and_entries() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup_app(&dir).await?;

    let (_, soup) = helpers::post(&app, "/api/meals", json!({"title": "Soup"})).await?;
    let (_, salad) = helpers::post(&app, "/api/meals", json!({"title": "Salad"})).await?;
    let soup = helpers::id(&soup);
    let salad = helpers::id(&salad);

    let (status, plan) = helpers::get(&app, "/api/meal-plans/week?date=2025-02-12").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["weekStartDate"], "2025-02-08");
    let plan_id = helpers::id(&plan);

    let (_, again) = helpers::get(&app, "/api/meal-plans/week?date=2025-02-14").await?;
    assert_eq!(helpers::id(&again), plan_id);

    let entries_uri = format!("/api/meal-plans/{plan_id}/entries");
    let (status, first) = helpers::post(
        &app,
        &entries_uri,
        json!({"dayOfWeek": "MONDAY", "mealId": soup, "mealType": "DINNER"}),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["displayOrder"], 0);

    let (_, second) = helpers::post(
        &app,
        &entries_uri,
        json!({"dayOfWeek": "MONDAY", "mealId": salad, "displayOrder": 0}),
    )
    .await?;
    assert_eq!(second["displayOrder"], 0);

    let (_, summary) = helpers::get(
        &app,
        "/api/meal-plans/summary?startDate=2025-02-10&endDate=2025-02-10",
    )
    .await?;
    let monday = &summary[0];
    assert_eq!(monday["dayOfWeek"], "MONDAY");
    assert_eq!(monday["entries"][0]["mealTitle"], "Salad");
    assert_eq!(monday["entries"][1]["mealTitle"], "Soup");
    assert_eq!(meal_ids(&monday["entries"]), vec![salad.to_owned(), soup.to_owned()]);

    let (status, moved) = helpers::put(
        &app,
        &format!("/api/meal-plans/entries/{}", helpers::id(&second)),
        json!({"dayOfWeek": "FRIDAY"}),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["dayOfWeek"], "FRIDAY");

    let (_, plan) = helpers::get(&app, &format!("/api/meal-plans/{plan_id}")).await?;
    let entries = plan["entries"].as_array().cloned().unwrap_or_default();
    assert_eq!(entries.len(), 2);
    for entry in entries {
        assert_eq!(entry["displayOrder"], 0);
    }

    let (status, _) = helpers::delete(
        &app,
        &format!("/api/meal-plans/entries/{}", helpers::id(&first)),
    )
    .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = helpers::delete(
        &app,
        &format!("/api/meal-plans/entries/{}", helpers::id(&first)),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_notes_and_summary_labels() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup_app(&dir).await?;

    let (_, plan) = helpers::get(&app, "/api/meal-plans/week?date=2025-02-08").await?;
    let plan_id = helpers::id(&plan);

    let (status, plan) = helpers::put(
        &app,
        &format!("/api/meal-plans/{plan_id}/notes"),
        json!({"dayNotes": {"MONDAY": "Soccer practice", "TUESDAY": "  "}}),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["dayNotes"], json!({"MONDAY": "Soccer practice"}));

    let (status, days) = helpers::get(
        &app,
        "/api/meal-plans/summary?startDate=2025-02-08&endDate=2025-02-15",
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let days = days.as_array().cloned().unwrap_or_default();
    assert_eq!(days.len(), 8);
    assert_eq!(days[0]["dayOfWeek"], "SATURDAY");
    assert_eq!(days[0]["date"], "2025-02-08");
    assert_eq!(days[2]["notes"], "Soccer practice");
    assert_eq!(days[3]["notes"], Value::Null);
    assert_eq!(days[7]["planId"], Value::Null);

    let (status, body) = helpers::get(
        &app,
        "/api/meal-plans/summary?startDate=2025-02-15&endDate=2025-02-08",
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    Ok(())
}

#[tokio::test]
async fn test_shopping_lists() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup_app(&dir).await?;

    let (_, pancakes) = helpers::post(
        &app,
        "/api/meals",
        json!({
            "title": "Pancakes",
            "ingredients": [
                {"name": "milk", "quantity": 1, "unit": "cup"},
                {"name": "Flour", "quantity": 200, "unit": "g"},
                {"name": "Sugar", "quantity": "1/3", "unit": "cup"}
            ]
        }),
    )
    .await?;
    let pancakes = helpers::id(&pancakes);

    let (_, plan) = helpers::get(&app, "/api/meal-plans/week?date=2025-02-08").await?;
    let plan_id = helpers::id(&plan);
    for day in ["SATURDAY", "SUNDAY"] {
        helpers::post(
            &app,
            &format!("/api/meal-plans/{plan_id}/entries"),
            json!({"dayOfWeek": day, "mealId": pancakes}),
        )
        .await?;
    }

    let (status, items) =
        helpers::get(&app, &format!("/api/meal-plans/{plan_id}/shopping-list")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        items[0],
        json!({"name": "milk", "totalQuantity": 2.0, "displayQuantity": "2", "unit": "cup"})
    );
    assert_eq!(
        items[1],
        json!({"name": "Flour", "totalQuantity": 400.0, "displayQuantity": "400", "unit": "g"})
    );
    assert_eq!(items[2]["name"], "Sugar");
    assert_eq!(items[2]["displayQuantity"], "0.7");

    let (_, sorted) = helpers::get(
        &app,
        "/api/meal-plans/shopping-list?startDate=2025-02-08&endDate=2025-02-08&sort=name",
    )
    .await?;
    assert_eq!(
        sorted,
        json!([
            {"name": "Flour", "totalQuantity": 200.0, "displayQuantity": "200", "unit": "g"},
            {"name": "milk", "totalQuantity": 1.0, "displayQuantity": "1", "unit": "cup"},
            {"name": "Sugar", "totalQuantity": 1.0 / 3.0, "displayQuantity": "0.3", "unit": "cup"}
        ])
    );

    let (status, _) = helpers::get(
        &app,
        &format!("/api/meal-plans/{plan_id}/shopping-list?sort=price"),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = helpers::get(&app, "/api/meal-plans/missing/shopping-list").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}
