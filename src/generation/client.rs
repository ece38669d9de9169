//! Generation client: one provider round trip per batch, parsed into icon records.
//! Retry belongs to the scheduler; this layer only classifies failures.

use crate::error::ClientError;
use crate::provider::{ChatMessage, CompletionOptions, ModelProviderClient};
use crate::types::{IconRecord, PackMetadata};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Per-call ceiling that keeps responses under the service's output limit.
pub const MAX_ICONS_PER_CALL: usize = 25;

const SYSTEM_INSTRUCTION: &str = "\
You are a senior icon designer producing a complete, consistent icon pack for a theme.

Design requirements:
- Style: minimal, modern line icons
- Grid: 48x48 (viewBox=\"0 0 48 48\")
- Stroke: 2px for every icon, fill=\"none\", stroke-linecap=\"round\", stroke-linejoin=\"round\"
- Corner radius: 2px
- Geometry: clean circles, rectangles, and controlled Bezier curves
- No shading, gradients, or text labels
- Output only inner SVG elements, never the <svg> wrapper

Always answer with a single valid JSON object.";

/// Position of a batch within its plan, used to steer the prompt toward variety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchContext {
    pub batch_index: usize,
    pub total_batches: usize,
}

impl BatchContext {
    pub fn single() -> Self {
        Self {
            batch_index: 0,
            total_batches: 1,
        }
    }
}

/// Parsed result of one generation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedIcons {
    pub metadata: Option<PackMetadata>,
    pub icons: Vec<IconRecord>,
}

/// Issues exactly one network call for `count` icons on `theme`.
#[allow(async_fn_in_trait)]
pub trait IconClient: Send + Sync {
    async fn generate(
        &self,
        theme: &str,
        count: usize,
        context: BatchContext,
    ) -> Result<GeneratedIcons, ClientError>;
}

impl<C: IconClient> IconClient for &C {
    async fn generate(
        &self,
        theme: &str,
        count: usize,
        context: BatchContext,
    ) -> Result<GeneratedIcons, ClientError> {
        (**self).generate(theme, count, context).await
    }
}

/// Icon client backed by an LLM provider.
pub struct ProviderIconClient {
    provider: Arc<dyn ModelProviderClient>,
    options: CompletionOptions,
}

impl ProviderIconClient {
    pub fn new(provider: Arc<dyn ModelProviderClient>, options: CompletionOptions) -> Self {
        Self { provider, options }
    }

    fn build_prompt(theme: &str, count: usize, context: BatchContext) -> String {
        let variety = if context.total_batches > 1 {
            format!(
                "This is batch {} of {}. Make these icons distinct and cover different aspects of the theme.\n",
                context.batch_index + 1,
                context.total_batches
            )
        } else {
            String::new()
        };

        format!(
            "Create an icon pack for the theme: \"{theme}\".\n\
             {variety}\n\
             Requirements:\n\
             1. Generate exactly {count} distinct icons.\n\
             2. Group them into logical categories (e.g. General, Actions, Objects).\n\
             3. 'svgPath' holds SVG elements such as <path d=\"...\" />, <circle ... />, <rect ... /> that fit a 48x48 viewBox, without the <svg> tag.\n\
             4. Keep descriptions short so the whole response fits the output limit.\n\n\
             Respond with JSON matching:\n\
             {{\"packName\": \"string\", \"description\": \"string\", \"categories\": [{{\"name\": \"string\", \"icons\": [{{\"name\": \"string\", \"description\": \"string\", \"svgPath\": \"string\"}}]}}]}}"
        )
    }
}

impl IconClient for ProviderIconClient {
    async fn generate(
        &self,
        theme: &str,
        count: usize,
        context: BatchContext,
    ) -> Result<GeneratedIcons, ClientError> {
        if count == 0 || count > MAX_ICONS_PER_CALL {
            return Err(ClientError::InvalidCount {
                count,
                max: MAX_ICONS_PER_CALL,
            });
        }

        let messages = vec![
            ChatMessage::system(SYSTEM_INSTRUCTION),
            ChatMessage::user(Self::build_prompt(theme, count, context)),
        ];

        let start = Instant::now();
        debug!(
            provider = self.provider.provider_name(),
            model = self.provider.model_name(),
            batch_index = context.batch_index,
            count,
            "Provider request sent"
        );
        let response = self.provider.complete(messages, self.options.clone()).await?;
        let generated = parse_icon_response(&response.content)?;
        info!(
            provider = self.provider.provider_name(),
            batch_index = context.batch_index,
            requested = count,
            returned = generated.icons.len(),
            duration_ms = start.elapsed().as_millis(),
            finish_reason = response.finish_reason.as_deref().unwrap_or("unknown"),
            "Provider response parsed"
        );
        Ok(generated)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackPayload {
    pack_name: Option<String>,
    description: Option<String>,
    categories: Option<Vec<CategoryPayload>>,
    icons: Option<Vec<IconPayload>>,
}

#[derive(Deserialize)]
struct CategoryPayload {
    name: Option<String>,
    #[serde(default)]
    icons: Vec<IconPayload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IconPayload {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(alias = "vectorBody", alias = "svg")]
    svg_path: String,
}

impl IconPayload {
    fn into_record(self, group: Option<&str>) -> Option<IconRecord> {
        let body = strip_svg_wrapper(&self.svg_path);
        if body.is_empty() {
            return None;
        }
        Some(IconRecord {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            vector_body: body.to_string(),
            group: group
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        })
    }
}

/// Remove markdown code fences some models wrap around JSON.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .trim()
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Keep only the inner markup if a model returned a full `<svg>` document.
fn strip_svg_wrapper(body: &str) -> &str {
    let trimmed = body.trim();
    if !trimmed.starts_with("<svg") {
        return trimmed;
    }
    match (trimmed.find('>'), trimmed.rfind("</svg>")) {
        (Some(open_end), Some(close)) if open_end < close => trimmed[open_end + 1..close].trim(),
        _ => trimmed,
    }
}

/// Parse a service payload into icons.
///
/// Accepts the categorized pack object, an object with a flat `icons` array, or
/// a bare array of icons. The count is taken as returned, but a payload with no
/// usable icon is an [`ClientError::EmptyResponse`].
pub fn parse_icon_response(content: &str) -> Result<GeneratedIcons, ClientError> {
    let cleaned = strip_code_fences(content);
    if cleaned.is_empty() {
        return Err(ClientError::EmptyResponse);
    }

    let value: serde_json::Value = serde_json::from_str(cleaned)
        .map_err(|e| ClientError::ParseError(format!("Response is not valid JSON: {}", e)))?;

    if value.is_array() {
        let icons: Vec<IconPayload> = serde_json::from_value(value)
            .map_err(|e| ClientError::ParseError(format!("Invalid icon array: {}", e)))?;
        let icons: Vec<IconRecord> = icons
            .into_iter()
            .filter_map(|icon| icon.into_record(None))
            .collect();
        if icons.is_empty() {
            return Err(ClientError::EmptyResponse);
        }
        return Ok(GeneratedIcons {
            metadata: None,
            icons,
        });
    }

    let payload: PackPayload = serde_json::from_value(value)
        .map_err(|e| ClientError::ParseError(format!("Invalid icon pack object: {}", e)))?;

    let mut icons = Vec::new();
    match (payload.categories, payload.icons) {
        (None, None) => {
            return Err(ClientError::ParseError(
                "Response has neither 'categories' nor 'icons'".to_string(),
            ))
        }
        (categories, flat) => {
            for category in categories.unwrap_or_default() {
                let group = category.name;
                icons.extend(
                    category
                        .icons
                        .into_iter()
                        .filter_map(|icon| icon.into_record(group.as_deref())),
                );
            }
            icons.extend(
                flat.unwrap_or_default()
                    .into_iter()
                    .filter_map(|icon| icon.into_record(None)),
            );
        }
    }

    if icons.is_empty() {
        return Err(ClientError::EmptyResponse);
    }

    let metadata = payload
        .pack_name
        .filter(|name| !name.trim().is_empty())
        .map(|pack_name| PackMetadata {
            pack_name: pack_name.trim().to_string(),
            description: payload.description.unwrap_or_default().trim().to_string(),
        });

    Ok(GeneratedIcons { metadata, icons })
}
