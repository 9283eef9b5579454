//! 결과 화면 뷰 모델 생성
//!
//! 한 끼 모드(비율 → 퍼센트)와 세 끼 모드(그램)를 하나의
//! `ViewModel { summary, meals[3] }`로 정리한다. 순수 함수이며 I/O 없음.

use crate::ratio::{derive_fat_ratio, non_negative};
use crate::types::{
    DailySummary, MacroGrams, MacroPercent, MealInput, MealNutrition, MealSlot, MealSummary,
    SingleMealPayload, ThreeMealsPayload, UploadMode, UploadPayload, ViewModel,
};

/// 데이터가 없는 끼니에 표시하는 문구
pub const PLACEHOLDER_FOOD_NAME: &str = "식사를 하지 않았어요.";

pub const KCAL_PER_GRAM_CARB: f64 = 4.0;
pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// 모드에 따라 뷰 모델을 생성
pub fn build(payload: &UploadPayload) -> ViewModel {
    match payload {
        UploadPayload::SingleMeal(single) => build_single_meal(single),
        UploadPayload::ThreeMeals(three) => build_three_meals(three),
    }
}

/// 한 끼 모드
///
/// `total_kcal`이 0 이하이면 모든 끼니가 빈 상태이고 summary는 `None`.
pub fn build_single_meal(payload: &SingleMealPayload) -> ViewModel {
    let mut meals = placeholders();
    let slot = payload.meal_label;

    if !(payload.total_kcal.is_finite() && payload.total_kcal > 0.0) {
        return ViewModel {
            mode: UploadMode::SingleMeal,
            focus: Some(slot),
            summary: DailySummary::None,
            meals,
        };
    }

    let percent = payload.percentages();
    meals[slot.index()] = MealSummary {
        slot,
        when: slot.label().to_string(),
        has_data: true,
        food_name: resolve_food_name(slot, payload.food_name.as_deref()),
        image_ref: payload.image_ref.clone(),
        kcal: Some(payload.total_kcal),
        nutrition: Some(MealNutrition::Percent(percent)),
    };

    ViewModel {
        mode: UploadMode::SingleMeal,
        focus: Some(slot),
        summary: DailySummary::Percent {
            total_kcal: payload.total_kcal,
            carb_percent: percent.carb,
            protein_percent: percent.protein,
            fat_percent: percent.fat,
        },
        meals,
    }
}

/// 세 끼 모드
///
/// 입력이 없는 슬롯만 빈 상태가 된다. 0kcal 식사도 데이터로 취급한다.
pub fn build_three_meals(payload: &ThreeMealsPayload) -> ViewModel {
    let mut meals = placeholders();
    let mut totals = MacroGrams::default();
    let mut total_kcal = 0.0;
    let mut any_data = false;

    for slot in MealSlot::ALL {
        let Some(input) = payload.get(slot) else {
            continue;
        };

        let grams = input.macro_grams();
        let kcal = non_negative(input.kcal.unwrap_or(0.0));

        total_kcal += kcal;
        totals.carb += grams.carb;
        totals.protein += grams.protein;
        totals.fat += grams.fat;
        any_data = true;

        meals[slot.index()] = MealSummary {
            slot,
            when: slot.label().to_string(),
            has_data: true,
            food_name: resolve_food_name(slot, input.food_name.as_deref()),
            image_ref: input.image_ref.clone(),
            kcal: Some(kcal),
            nutrition: Some(MealNutrition::Grams(grams)),
        };
    }

    let summary = if any_data {
        DailySummary::Gram {
            total_kcal,
            total_carb: totals.carb,
            total_protein: totals.protein,
            total_fat: totals.fat,
        }
    } else {
        DailySummary::None
    };

    ViewModel {
        mode: UploadMode::ThreeMeals,
        focus: None,
        summary,
        meals,
    }
}

/// 빈 끼니 3개 (아침 → 점심 → 저녁)
pub fn placeholders() -> [MealSummary; 3] {
    MealSlot::ALL.map(placeholder)
}

pub fn placeholder(slot: MealSlot) -> MealSummary {
    MealSummary {
        slot,
        when: slot.label().to_string(),
        has_data: false,
        food_name: PLACEHOLDER_FOOD_NAME.to_string(),
        image_ref: None,
        kcal: None,
        nutrition: None,
    }
}

/// 인식된 음식 이름이 없으면 "<라벨>에 드신 음식"
pub fn fallback_food_name(slot: MealSlot) -> String {
    format!("{}에 드신 음식", slot.label())
}

fn resolve_food_name(slot: MealSlot, food_name: Option<&str>) -> String {
    match food_name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => fallback_food_name(slot),
    }
}

impl SingleMealPayload {
    /// 지방 비율 (없으면 나머지로 계산, 최소 0)
    pub fn resolved_fat_ratio(&self) -> f64 {
        derive_fat_ratio(self.carb_ratio, self.protein_ratio, self.fat_ratio)
    }

    /// 영양소별 독립 반올림. 합계 보정 없음.
    pub fn percentages(&self) -> MacroPercent {
        MacroPercent {
            carb: to_percent(self.carb_ratio),
            protein: to_percent(self.protein_ratio),
            fat: to_percent(self.resolved_fat_ratio()),
        }
    }

    /// 비율과 총 칼로리에서 환산한 그램 값 (4/4/9 kcal/g)
    pub fn gram_equivalents(&self) -> MacroGrams {
        let kcal = non_negative(self.total_kcal);
        MacroGrams {
            carb: kcal * self.carb_ratio / KCAL_PER_GRAM_CARB,
            protein: kcal * self.protein_ratio / KCAL_PER_GRAM_PROTEIN,
            fat: kcal * self.resolved_fat_ratio() / KCAL_PER_GRAM_FAT,
        }
    }
}

impl MealSummary {
    /// 그램 값. 한 끼 모드(퍼센트) 끼니는 kcal과 퍼센트에서 4/4/9로 환산한다.
    pub fn gram_equivalents(&self) -> Option<MacroGrams> {
        match (self.nutrition.as_ref()?, self.kcal?) {
            (MealNutrition::Grams(grams), _) => Some(*grams),
            (MealNutrition::Percent(percent), kcal) => Some(
                SingleMealPayload {
                    meal_label: self.slot,
                    food_name: None,
                    image_ref: None,
                    total_kcal: kcal,
                    carb_ratio: percent.carb as f64 / 100.0,
                    protein_ratio: percent.protein as f64 / 100.0,
                    fat_ratio: Some(percent.fat as f64 / 100.0),
                }
                .gram_equivalents(),
            ),
        }
    }
}

impl MealInput {
    /// 누락된 그램 값은 0
    pub fn macro_grams(&self) -> MacroGrams {
        MacroGrams {
            carb: non_negative(self.carb_grams.unwrap_or(0.0)),
            protein: non_negative(self.protein_grams.unwrap_or(0.0)),
            fat: non_negative(self.fat_grams.unwrap_or(0.0)),
        }
    }
}

fn to_percent(ratio: f64) -> i32 {
    if ratio.is_finite() {
        (ratio * 100.0).round() as i32
    } else {
        0
    }
}
