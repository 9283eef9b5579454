use super::NutritionBackend;
use crate::config::Config;
use crate::error::{MealScanError, Result};
use crate::scanner::MealImage;
use async_trait::async_trait;
use mealscan_common::{
    parse_detect_response, parse_nutrition_response, parse_solution_response, DetectResponse,
    MealSlot, NutritionResponse,
};
use reqwest::{multipart, Client, Response, Url};
use serde_json::Value;
use std::time::Duration;

const STEP_DETECT: &str = "이미지 분석";
const STEP_RECIPE: &str = "레시피 정보";
const STEP_NUTRITION: &str = "영양 요약 정보";

/// reqwest 기반 백엔드 클라이언트
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_base_url(),
            Duration::from_secs(config.timeout_seconds.max(1)),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `/getFoodRecipe/{foodName}` (음식 이름은 경로 세그먼트로 인코딩)
    pub fn recipe_url(&self, food_name: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| MealScanError::Config(format!("잘못된 API 주소 {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| MealScanError::Config(format!("잘못된 API 주소: {}", self.base_url)))?
            .pop_if_empty()
            .push("getFoodRecipe")
            .push(food_name);
        Ok(url)
    }
}

/// 2xx가 아니면 해당 단계의 실패로 처리
async fn read_body(response: Response, step: &'static str, slot: MealSlot) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(MealScanError::ApiCall {
            step,
            slot,
            message: format!("HTTP {} {}", status, body.trim()),
        });
    }
    Ok(response.text().await?)
}

#[async_trait]
impl NutritionBackend for HttpBackend {
    async fn detect_food(&self, slot: MealSlot, image: &MealImage) -> Result<DetectResponse> {
        tracing::debug!(slot = slot.key(), file = %image.file_name, bytes = image.jpeg.len(), "image-detect");

        let part = multipart::Part::bytes(image.jpeg.clone())
            .file_name(image.file_name.clone())
            .mime_str(image.mime_type())?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/vision/image-detect"))
            .query(&[("when", slot.key())])
            .multipart(form)
            .send()
            .await?;

        let body = read_body(response, STEP_DETECT, slot).await?;
        Ok(parse_detect_response(&body)?)
    }

    async fn fetch_recipe(&self, slot: MealSlot, food_name: &str) -> Result<Value> {
        let url = self.recipe_url(food_name)?;
        tracing::debug!(slot = slot.key(), %url, "getFoodRecipe");

        let response = self.client.get(url).send().await?;
        let body = read_body(response, STEP_RECIPE, slot).await?;
        serde_json::from_str(&body)
            .map_err(|e| MealScanError::ApiParse(format!("레시피 응답 ({}): {}", food_name, e)))
    }

    async fn summarize_nutrition(&self, slot: MealSlot, recipe: &Value) -> Result<NutritionResponse> {
        tracing::debug!(slot = slot.key(), "summary-recipe");

        let response = self
            .client
            .post(self.url("/nutrition/summary-recipe"))
            .json(recipe)
            .send()
            .await?;

        let body = read_body(response, STEP_NUTRITION, slot).await?;
        Ok(parse_nutrition_response(&body)?)
    }

    async fn request_solution(&self, nutrition_text: &str) -> Result<String> {
        tracing::debug!(chars = nutrition_text.chars().count(), "solution");

        let response = self
            .client
            .post(self.url("/nutrition/solution"))
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(nutrition_text.to_string())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(MealScanError::AdviceRequest(format!("HTTP {}", status)));
        }
        Ok(parse_solution_response(&body)?)
    }
}
