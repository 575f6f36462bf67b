use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde::Serialize;

use crate::services::fal::COST_PER_IMAGE;
use crate::AppState;

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub provider: String,
    pub model: String,
    pub model_configured: bool,
    pub cost_per_image: f64,
    pub timestamp: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health and upstream configuration", body = HealthResponse)
    ),
    tag = "General"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        provider: "fal.ai".to_string(),
        model: state.fal.model.clone(),
        model_configured: state.fal.is_configured(),
        cost_per_image: COST_PER_IMAGE,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Welcome page HTML", content_type = "text/html")
    ),
    tag = "General"
)]
pub async fn root() -> Html<&'static str> {
    Html(r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <meta name="viewport" content="width=device-width, initial-scale=1.0">
            <title>EstatePhotoKit</title>
            <style>
                body {
                    margin: 0;
                    min-height: 100vh;
                    display: grid;
                    place-items: center;
                    font-family: 'Segoe UI', Helvetica, sans-serif;
                    background: linear-gradient(160deg, #1d2b3a, #33475b);
                    color: #eef2f6;
                }
                main { text-align: center; padding: 2rem; }
                h1 { margin-bottom: 0.4rem; font-weight: 600; }
                p.tagline { color: #9fb3c8; margin-top: 0; }
                ul {
                    list-style: none;
                    padding: 0;
                    color: #bcccdc;
                    font-size: 0.95rem;
                }
                li { margin: 0.3rem 0; }
                a.docs {
                    display: inline-block;
                    margin-top: 1.5rem;
                    padding: 0.7rem 1.6rem;
                    background-color: #2f855a;
                    color: white;
                    text-decoration: none;
                    border-radius: 6px;
                    font-weight: 600;
                }
                a.docs:hover { background-color: #276749; }
            </style>
        </head>
        <body>
            <main>
                <h1>EstatePhotoKit</h1>
                <p class="tagline">AI photo editing for real estate listings</p>
                <ul>
                    <li>Virtual staging, lighting, declutter and repair prompts</li>
                    <li>Projects and galleries per workspace</li>
                    <li>Monthly edit quotas per plan</li>
                </ul>
                <a class="docs" href="/swagger-ui/">Explore API Docs</a>
            </main>
        </body>
        </html>
    "#)
}
