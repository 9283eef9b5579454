//! 조언 API로 보내는 영양 정보 텍스트
//!
//! 이 문자열은 그대로 요청 본문이 되므로 형식을 바꾸지 말 것.

use crate::types::{MealNutrition, MealSummary, UploadMode, ViewModel};

/// 식사가 없는 슬롯 표시
pub const NO_MEAL_MARKER: &str = "식사 없음";

/// 모드별 영양 정보 텍스트 생성
///
/// - 세 끼: 아침/점심/저녁 한 줄씩, 개행으로 연결
/// - 한 끼: 선택한 끼니 한 줄
pub fn nutrition_text(view_model: &ViewModel) -> String {
    match view_model.mode {
        UploadMode::ThreeMeals => view_model
            .meals
            .iter()
            .map(three_meals_line)
            .collect::<Vec<_>>()
            .join("\n"),
        UploadMode::SingleMeal => {
            let meal = view_model
                .focus
                .map(|slot| view_model.meal(slot))
                .or_else(|| view_model.meals.iter().find(|m| m.has_data))
                .unwrap_or(&view_model.meals[0]);
            single_meal_line(meal)
        }
    }
}

fn three_meals_line(meal: &MealSummary) -> String {
    match meal.macro_grams() {
        Some(grams) => format!(
            "{}: {} 탄수화물 {:.1}g, 단백질 {:.1}g, 지방 {:.1}g",
            meal.when, meal.food_name, grams.carb, grams.protein, grams.fat
        ),
        None => format!("{}: {}", meal.when, NO_MEAL_MARKER),
    }
}

fn single_meal_line(meal: &MealSummary) -> String {
    match (&meal.nutrition, meal.kcal) {
        (Some(MealNutrition::Percent(percent)), Some(kcal)) => format!(
            "{}: {} 총 {:.1}kcal, 탄수화물 {}%, 단백질 {}%, 지방 {}%",
            meal.when, meal.food_name, kcal, percent.carb, percent.protein, percent.fat
        ),
        _ => format!("{}: {}", meal.when, NO_MEAL_MARKER),
    }
}
