use axum::{extract::Query, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::prompts::{by_category, PromptCategory, PromptTemplate, REAL_ESTATE_PROMPTS};

#[derive(Deserialize, IntoParams)]
pub struct PromptsQuery {
    /// Filter to one category; unknown names yield an empty list
    category: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PromptItem {
    id: String,
    label: String,
    prompt: String,
    category: PromptCategory,
}

impl From<&PromptTemplate> for PromptItem {
    fn from(template: &PromptTemplate) -> Self {
        PromptItem {
            id: template.id.to_string(),
            label: template.label.to_string(),
            prompt: template.prompt.to_string(),
            category: template.category,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PromptsResponse {
    categories: Vec<PromptCategory>,
    prompts: Vec<PromptItem>,
}

#[utoipa::path(
    get,
    path = "/prompts",
    params(
        PromptsQuery
    ),
    responses(
        (status = 200, description = "Prompt catalog, optionally filtered by category", body = PromptsResponse)
    ),
    tag = "Prompts"
)]
pub async fn list_prompts(Query(query): Query<PromptsQuery>) -> Json<PromptsResponse> {
    let prompts: Vec<PromptItem> = match query.category.as_deref() {
        None => REAL_ESTATE_PROMPTS.iter().map(PromptItem::from).collect(),
        Some(raw) => match PromptCategory::parse(raw) {
            Some(category) => by_category(category)
                .into_iter()
                .map(PromptItem::from)
                .collect(),
            None => Vec::new(),
        },
    };

    Json(PromptsResponse {
        categories: PromptCategory::ALL.to_vec(),
        prompts,
    })
}
