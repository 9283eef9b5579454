//! 영양 분석 결과의 타입 정의
//!
//! CLI와 리포트 출력에서 공유하는 타입:
//! - MealSlot: 아침/점심/저녁 고정 슬롯
//! - SingleMealPayload / ThreeMealsPayload: 업로드 흐름에서 넘어오는 원시 데이터
//! - MealSummary / DailySummary / ViewModel: 결과 화면용 뷰 모델

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 끼니 슬롯 (항상 아침 → 점심 → 저녁 순서)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    #[serde(alias = "breakfast")]
    Morning,
    Lunch,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 3] = [MealSlot::Morning, MealSlot::Lunch, MealSlot::Dinner];

    /// 백엔드 `when` 파라미터 값
    pub fn key(&self) -> &'static str {
        match self {
            MealSlot::Morning => "morning",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
        }
    }

    /// 화면 표시용 라벨
    pub fn label(&self) -> &'static str {
        match self {
            MealSlot::Morning => "아침",
            MealSlot::Lunch => "점심",
            MealSlot::Dinner => "저녁",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            MealSlot::Morning => 0,
            MealSlot::Lunch => 1,
            MealSlot::Dinner => 2,
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for MealSlot {
    type Err = Error;

    /// 키(`morning`), 구 키(`breakfast`), 라벨(`아침`) 모두 허용
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "morning" | "breakfast" | "아침" => Ok(MealSlot::Morning),
            "lunch" | "점심" => Ok(MealSlot::Lunch),
            "dinner" | "저녁" => Ok(MealSlot::Dinner),
            other => Err(Error::InvalidInput(format!(
                "알 수 없는 식사 시간: {}. morning, lunch, dinner 중 하나를 사용하세요",
                other
            ))),
        }
    }
}

/// 3대 영양소 그램 값
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroGrams {
    pub carb: f64,
    pub protein: f64,
    pub fat: f64,
}

impl MacroGrams {
    pub fn new(carb: f64, protein: f64, fat: f64) -> Self {
        Self { carb, protein, fat }
    }

    pub fn total(&self) -> f64 {
        self.carb + self.protein + self.fat
    }
}

/// 3대 영양소 비율(%), 영양소별로 독립 반올림된 정수
///
/// 합계가 정확히 100이 되도록 보정하지 않는다 (99~101 가능).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroPercent {
    pub carb: i32,
    pub protein: i32,
    pub fat: i32,
}

impl MacroPercent {
    pub fn new(carb: i32, protein: i32, fat: i32) -> Self {
        Self { carb, protein, fat }
    }

    pub fn sum(&self) -> i32 {
        self.carb + self.protein + self.fat
    }
}

/// 끼니 하나의 영양 정보. 업로드 모드에 따라 둘 중 하나만 존재한다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MealNutrition {
    /// 세 끼 모드: 백엔드가 준 그램 값
    Grams(MacroGrams),
    /// 한 끼 모드: 비율에서 계산한 퍼센트
    Percent(MacroPercent),
}

/// 결과 화면의 끼니 행
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSummary {
    pub slot: MealSlot,
    pub when: String,
    pub has_data: bool,
    pub food_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kcal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<MealNutrition>,
}

impl MealSummary {
    pub fn macro_grams(&self) -> Option<&MacroGrams> {
        match &self.nutrition {
            Some(MealNutrition::Grams(grams)) => Some(grams),
            _ => None,
        }
    }

    pub fn macro_percent(&self) -> Option<&MacroPercent> {
        match &self.nutrition {
            Some(MealNutrition::Percent(percent)) => Some(percent),
            _ => None,
        }
    }
}

/// 하루 합계. `kind`가 어떤 필드가 의미 있는지를 결정한다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DailySummary {
    /// 데이터가 있는 끼니가 하나도 없음
    None,
    #[serde(rename_all = "camelCase")]
    Percent {
        total_kcal: f64,
        carb_percent: i32,
        protein_percent: i32,
        fat_percent: i32,
    },
    #[serde(rename_all = "camelCase")]
    Gram {
        total_kcal: f64,
        total_carb: f64,
        total_protein: f64,
        total_fat: f64,
    },
}

impl DailySummary {
    pub fn kind(&self) -> &'static str {
        match self {
            DailySummary::None => "none",
            DailySummary::Percent { .. } => "percent",
            DailySummary::Gram { .. } => "gram",
        }
    }

    pub fn total_kcal(&self) -> f64 {
        match self {
            DailySummary::None => 0.0,
            DailySummary::Percent { total_kcal, .. } | DailySummary::Gram { total_kcal, .. } => {
                *total_kcal
            }
        }
    }
}

/// 업로드 모드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UploadMode {
    SingleMeal,
    ThreeMeals,
}

/// 결과 화면 뷰 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub mode: UploadMode,
    /// 한 끼 모드에서 사용자가 고른 끼니
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<MealSlot>,
    pub summary: DailySummary,
    pub meals: [MealSummary; 3],
}

impl ViewModel {
    pub fn meal(&self, slot: MealSlot) -> &MealSummary {
        &self.meals[slot.index()]
    }
}

/// 한 끼 업로드 결과 (비율 기반)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleMealPayload {
    pub meal_label: MealSlot,
    #[serde(default)]
    pub food_name: Option<String>,
    #[serde(default)]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub total_kcal: f64,
    #[serde(default)]
    pub carb_ratio: f64,
    #[serde(default)]
    pub protein_ratio: f64,
    #[serde(default)]
    pub fat_ratio: Option<f64>,
}

/// 세 끼 모드의 슬롯 하나 (그램 기반)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MealInput {
    pub food_name: Option<String>,
    pub image_ref: Option<String>,
    pub kcal: Option<f64>,
    pub carb_grams: Option<f64>,
    pub protein_grams: Option<f64>,
    pub fat_grams: Option<f64>,
}

/// 세 끼 업로드 결과
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThreeMealsPayload {
    #[serde(alias = "breakfast")]
    pub morning: Option<MealInput>,
    pub lunch: Option<MealInput>,
    pub dinner: Option<MealInput>,
}

impl ThreeMealsPayload {
    pub fn get(&self, slot: MealSlot) -> Option<&MealInput> {
        match slot {
            MealSlot::Morning => self.morning.as_ref(),
            MealSlot::Lunch => self.lunch.as_ref(),
            MealSlot::Dinner => self.dinner.as_ref(),
        }
    }

    pub fn set(&mut self, slot: MealSlot, input: MealInput) {
        let target = match slot {
            MealSlot::Morning => &mut self.morning,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::Dinner => &mut self.dinner,
        };
        *target = Some(input);
    }

    pub fn is_empty(&self) -> bool {
        MealSlot::ALL.iter().all(|slot| self.get(*slot).is_none())
    }
}

/// 업로드 흐름이 결과 화면에 넘기는 데이터 (모드 + 페이로드)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "payload", rename_all = "camelCase")]
pub enum UploadPayload {
    SingleMeal(SingleMealPayload),
    ThreeMeals(ThreeMealsPayload),
}

impl UploadPayload {
    pub fn mode(&self) -> UploadMode {
        match self {
            UploadPayload::SingleMeal(_) => UploadMode::SingleMeal,
            UploadPayload::ThreeMeals(_) => UploadMode::ThreeMeals,
        }
    }
}
