//! 그램 값 → 영양소 비율 변환 (한 끼 업로드 단계)

use serde::{Deserialize, Serialize};

/// 한 끼 모드에서 결과 화면으로 넘기는 비율 (0.0 ~ 1.0)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroRatios {
    pub carb_ratio: f64,
    pub protein_ratio: f64,
    /// 백엔드가 지방 값을 주지 않으면 None (결과 화면에서 나머지로 계산)
    pub fat_ratio: Option<f64>,
}

/// 그램 합계 기준 비율을 계산
///
/// 합계가 0이면 1로 나누어 모든 비율이 0이 된다 (에러가 아님).
pub fn ratios_from_grams(carb: f64, protein: f64, fat: Option<f64>) -> MacroRatios {
    let carb = non_negative(carb);
    let protein = non_negative(protein);
    let fat = fat.map(non_negative);

    let total = carb + protein + fat.unwrap_or(0.0);
    let denominator = if total == 0.0 { 1.0 } else { total };

    MacroRatios {
        carb_ratio: carb / denominator,
        protein_ratio: protein / denominator,
        fat_ratio: fat.map(|f| f / denominator),
    }
}

/// 지방 비율이 없으면 `1 - 탄수화물 - 단백질`, 음수는 0으로 내림
pub fn derive_fat_ratio(carb_ratio: f64, protein_ratio: f64, fat_ratio: Option<f64>) -> f64 {
    match fat_ratio {
        Some(fat) => fat,
        None => (1.0 - carb_ratio - protein_ratio).max(0.0),
    }
}

/// 유한하지 않거나 음수면 0
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
