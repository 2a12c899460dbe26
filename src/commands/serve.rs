use std::collections::HashMap;
use std::net::SocketAddr;

use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::controllers::paste;
use crate::db::Database;
use crate::html;
use crate::types::api::{CreatePaste, CreatedPaste, PasteData};
use crate::{ApiError, App};

/// The usage page served at the root.
const USAGE_PAGE: &str = include_str!("../../assets/usage.txt");

pub async fn run(app: App) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], app.config.port));

    let app = Router::new()
        .route("/", get(index).post(create_paste))
        .route("/health", get(health))
        .route("/:id", get(get_paste).delete(delete_paste))
        .route("/:id/view", get(view_paste))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(app.config.limits.max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .route_layer(NormalizePathLayer::trim_trailing_slash())
        .with_state(app);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

async fn index() -> &'static str {
    USAGE_PAGE
}

async fn health(State(mut db): State<Database>) -> impl IntoResponse {
    match db.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(err) => {
            warn!("health check failed: {err}");
            (StatusCode::SERVICE_UNAVAILABLE, "fail")
        }
    }
}

async fn create_paste(
    State(mut app): State<App>,
    Json(body): Json<CreatePaste>,
) -> crate::ApiResult<impl IntoResponse> {
    let paste = paste::create(
        &mut app,
        &body.content,
        body.ttl_seconds,
        body.max_views,
        Utc::now(),
    )
    .await?;

    let path = format!("/{id}", id = paste.id);
    let url = format!("{base_url}{path}", base_url = app.config.base_url);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, path)],
        Json(CreatedPaste {
            id: paste.id,
            url,
            delete_key: paste.delete_key,
        }),
    ))
}

async fn get_paste(
    State(mut app): State<App>,
    Path(id): Path<String>,
) -> crate::ApiResult<Json<PasteData>> {
    let data = paste::access(&mut app, &id, Utc::now()).await?;
    Ok(Json(data))
}

async fn view_paste(
    State(mut app): State<App>,
    Path(id): Path<String>,
) -> crate::ApiResult<Html<String>> {
    let data = paste::access(&mut app, &id, Utc::now()).await?;
    Ok(Html(html::paste_page(&id, &data)))
}

async fn delete_paste(
    State(mut app): State<App>,
    Query(params): Query<HashMap<String, String>>,
    Path(id): Path<String>,
) -> crate::ApiResult<impl IntoResponse> {
    let delete_key = params
        .get("delete_key")
        .ok_or_else(|| ApiError::MissingDeleteKey)?;

    paste::delete(&mut app, &id, delete_key).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Limits};

    async fn test_app() -> App {
        App {
            config: Config {
                base_url: "http://localhost:8080".to_owned(),
                port: 8080,
                database: crate::config::Database {
                    url: "sqlite::memory:".to_owned(),
                },
                limits: Limits {
                    max_body_size: 1024 * 1024,
                },
            },
            database: Database::in_memory().await,
        }
    }

    #[tokio::test]
    async fn create_answers_201_with_location() {
        let app = test_app().await;

        let body = CreatePaste {
            content: "hello".to_owned(),
            ttl_seconds: None,
            max_views: None,
        };
        let response = create_paste(State(app), Json(body))
            .await
            .unwrap()
            .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.headers().contains_key(header::LOCATION));
    }

    #[tokio::test]
    async fn missing_paste_answers_404() {
        let app = test_app().await;

        let response = get_paste(State(app), Path("missing0".to_owned()))
            .await
            .unwrap_err()
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = test_app().await;

        let response = health(State(app.database)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
