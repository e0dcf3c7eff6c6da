#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use mealplanner::{AppState, router};
use serde_json::Value;
use sqlx_migrator::{Migrate, Plan};
use temp_dir::TempDir;
use time::Weekday;
use tower::ServiceExt;

/// Router over a freshly migrated database inside `dir`.
pub async fn setup_app(dir: &TempDir) -> anyhow::Result<Router> {
    let url = format!("sqlite:{}", dir.child("db.sqlite3").display());

    let write_db = mealplanner::db::create_write_pool(&url).await?;
    let mut conn = write_db.acquire().await?;
    mealplanner_db::migrator()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;
    drop(conn);

    let read_db = mealplanner::db::create_read_pool(&url, 2).await?;

    Ok(router(AppState {
        state: mealplanner_shared::State { read_db, write_db },
        week_anchor: Weekday::Saturday,
    }))
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => request.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, value))
}

pub async fn get(app: &Router, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> anyhow::Result<(StatusCode, Value)> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> anyhow::Result<(StatusCode, Value)> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
    send(app, Method::DELETE, uri, None).await
}

/// Id field of a created resource.
pub fn id(value: &Value) -> String {
    value["id"].as_str().unwrap_or_default().to_owned()
}
