//! 영양 분석 백엔드 연동
//!
//! 끼니 하나당 호출 순서:
//! 1. 음식 인식 (`/vision/image-detect`)
//! 2. 레시피 조회 (`/getFoodRecipe/{foodName}`)
//! 3. 영양 요약 (`/nutrition/summary-recipe`)
//!
//! 결과 화면이 만들어진 뒤 솔루션(`/nutrition/solution`)을 따로 요청한다.

mod http;

pub use http::HttpBackend;

use crate::error::Result;
use crate::scanner::MealImage;
use async_trait::async_trait;
use mealscan_common::{DetectResponse, MealSlot, NutritionResponse};
use serde_json::Value;

#[async_trait]
pub trait NutritionBackend: Send + Sync {
    /// 사진에서 음식 이름을 인식
    async fn detect_food(&self, slot: MealSlot, image: &MealImage) -> Result<DetectResponse>;

    /// 음식 이름으로 레시피(JSON)를 조회. 응답은 그대로 영양 요약에 넘긴다.
    async fn fetch_recipe(&self, slot: MealSlot, food_name: &str) -> Result<Value>;

    async fn summarize_nutrition(&self, slot: MealSlot, recipe: &Value) -> Result<NutritionResponse>;

    /// 영양 정보 텍스트를 보내고 조언 문구를 받는다
    async fn request_solution(&self, nutrition_text: &str) -> Result<String>;
}
