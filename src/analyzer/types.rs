use mealscan_common::{Advice, MealInput, MealSlot, NutritionResponse, ViewModel};
use serde::{Deserialize, Serialize};

/// 끼니 하나의 백엔드 분석 결과 (인식 → 레시피 → 영양 요약)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAnalysis {
    #[serde(default)]
    pub food_name: String,
    #[serde(default)]
    pub nutrition: NutritionResponse,
}

impl SlotAnalysis {
    /// 세 끼 모드 입력으로 변환
    pub fn to_meal_input(&self, image_ref: Option<String>) -> MealInput {
        MealInput {
            food_name: Some(self.food_name.clone()).filter(|n| !n.trim().is_empty()),
            image_ref,
            kcal: Some(self.nutrition.calorie),
            carb_grams: Some(self.nutrition.carbohydrate),
            protein_grams: Some(self.nutrition.protein),
            fat_grams: self.nutrition.fat,
        }
    }
}

/// 결과 JSON 파일 (`--output`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub view_model: ViewModel,
    pub advice: Advice,
    #[serde(default)]
    pub created_at: String,
}

impl AnalysisReport {
    pub fn new(view_model: ViewModel, advice: Advice) -> Self {
        Self {
            view_model,
            advice,
            created_at: chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
        }
    }

    pub fn meal(&self, slot: MealSlot) -> &mealscan_common::MealSummary {
        self.view_model.meal(slot)
    }
}
