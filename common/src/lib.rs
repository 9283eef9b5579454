//! MealScan Common Library
//!
//! 식사 사진 분석 결과를 결과 화면/리포트용 뷰 모델로 정리하는 순수 로직

pub mod types;
pub mod error;
pub mod ratio;
pub mod builder;
pub mod ring;
pub mod text;
pub mod advice;
pub mod parser;
pub mod export;

pub use types::{
    DailySummary, MacroGrams, MacroPercent, MealInput, MealNutrition, MealSlot, MealSummary,
    SingleMealPayload, ThreeMealsPayload, UploadMode, UploadPayload, ViewModel,
};
pub use error::{Error, Result};
pub use ratio::{ratios_from_grams, MacroRatios};
pub use builder::{build, build_single_meal, build_three_meals, PLACEHOLDER_FOOD_NAME};
pub use ring::{arc_segments, ArcSegment, MacroKind, RingChart, RING_RADIUS};
pub use text::{nutrition_text, NO_MEAL_MARKER};
pub use advice::{default_advice, Advice, AdviceSource};
pub use parser::{
    extract_json, parse_detect_response, parse_nutrition_response, parse_solution_response,
    DetectResponse, NutritionResponse,
};
