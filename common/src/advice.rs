//! AI 건강 솔루션 문구
//!
//! 원격 조언이 실패하거나 아직 도착하지 않았을 때 `DailySummary`만으로
//! 기본 문구를 만든다.

use crate::builder::{KCAL_PER_GRAM_CARB, KCAL_PER_GRAM_FAT, KCAL_PER_GRAM_PROTEIN};
use crate::ring::MacroKind;
use crate::types::DailySummary;
use serde::{Deserialize, Serialize};

/// 에너지 비율 권장 범위 (%)
const CARB_RANGE: (f64, f64) = (55.0, 65.0);
const PROTEIN_RANGE: (f64, f64) = (7.0, 20.0);
const FAT_RANGE: (f64, f64) = (15.0, 30.0);

pub const NO_DATA_ADVICE: &str = "분석할 식사 정보가 없어요. 식사 사진을 업로드해 주세요.";
const BALANCED_ADVICE: &str = "탄수화물, 단백질, 지방의 균형이 잘 맞아요. 지금처럼 유지해 보세요.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdviceSource {
    Remote,
    Fallback,
}

/// 결과 화면에 표시하는 조언. 뷰 모델과는 별도로 보관한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advice {
    pub text: String,
    pub source: AdviceSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Advice {
    pub fn remote(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: AdviceSource::Remote,
            error: None,
        }
    }

    /// 기본 문구 (원격 요청을 하지 않은 경우 error는 None)
    pub fn fallback(summary: &DailySummary, error: Option<String>) -> Self {
        Self {
            text: default_advice(summary),
            source: AdviceSource::Fallback,
            error,
        }
    }
}

/// 하루 요약에서 기본 조언 문구를 생성
pub fn default_advice(summary: &DailySummary) -> String {
    let shares = match energy_shares(summary) {
        Some(shares) => shares,
        None => return NO_DATA_ADVICE.to_string(),
    };

    let mut high = Vec::new();
    let mut low = Vec::new();
    for (kind, share) in MacroKind::DRAW_ORDER.iter().zip(shares) {
        let (min, max) = match kind {
            MacroKind::Carb => CARB_RANGE,
            MacroKind::Protein => PROTEIN_RANGE,
            MacroKind::Fat => FAT_RANGE,
        };
        if share > max {
            high.push(kind.label());
        } else if share < min {
            low.push(kind.label());
        }
    }

    let mut sentences = vec![format!("오늘은 총 {:.0}kcal를 드셨어요.", summary.total_kcal())];
    if !high.is_empty() {
        sentences.push(format!("{} 비율이 다소 높아요.", high.join("과 ")));
    }
    if !low.is_empty() {
        sentences.push(format!(
            "내일은 {}이 풍부한 식단을 추가해 보는 것을 추천합니다.",
            low.join("과 ")
        ));
    }
    if high.is_empty() && low.is_empty() {
        sentences.push(BALANCED_ADVICE.to_string());
    }

    sentences.join(" ")
}

/// 탄수화물/단백질/지방의 에너지 비율(%)
///
/// 데이터가 없거나 에너지 합이 0이면 None
fn energy_shares(summary: &DailySummary) -> Option<[f64; 3]> {
    match summary {
        DailySummary::None => None,
        DailySummary::Percent { carb_percent, protein_percent, fat_percent, .. } => {
            let total = (carb_percent + protein_percent + fat_percent) as f64;
            if total <= 0.0 {
                return None;
            }
            Some([
                *carb_percent as f64,
                *protein_percent as f64,
                *fat_percent as f64,
            ])
        }
        DailySummary::Gram { total_carb, total_protein, total_fat, .. } => {
            let energy = [
                total_carb * KCAL_PER_GRAM_CARB,
                total_protein * KCAL_PER_GRAM_PROTEIN,
                total_fat * KCAL_PER_GRAM_FAT,
            ];
            let total: f64 = energy.iter().sum();
            if total <= 0.0 {
                return None;
            }
            Some(energy.map(|e| e / total * 100.0))
        }
    }
}
