//! 영양소 링 차트 기하 계산
//!
//! 퍼센트를 원호 길이로 바꾸고, 탄수화물 → 단백질 → 지방 순서로
//! 이어 붙인다. 렌더러는 `arc_length` / `arc_offset`만 사용하면 된다.

use crate::ratio::non_negative;
use crate::types::{MacroPercent, MealNutrition, MealSummary};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// 기본 링 반지름
pub const RING_RADIUS: f64 = 40.0;

/// 링 차트의 색상 슬롯 (그리는 순서 고정)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MacroKind {
    Carb,
    Protein,
    Fat,
}

impl MacroKind {
    pub const DRAW_ORDER: [MacroKind; 3] = [MacroKind::Carb, MacroKind::Protein, MacroKind::Fat];

    pub fn label(&self) -> &'static str {
        match self {
            MacroKind::Carb => "탄수화물",
            MacroKind::Protein => "단백질",
            MacroKind::Fat => "지방",
        }
    }

    /// 차트 색상 (RGB, 0.0~1.0)
    pub fn color(&self) -> (f32, f32, f32) {
        match self {
            MacroKind::Carb => (0.98, 0.73, 0.25),
            MacroKind::Protein => (0.36, 0.72, 0.36),
            MacroKind::Fat => (0.93, 0.42, 0.35),
        }
    }
}

/// 원호 하나
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcSegment {
    pub color_slot: MacroKind,
    pub percent: f64,
    pub arc_length: f64,
    /// 앞선 원호 길이 합의 음수 (시작 위치)
    pub arc_offset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RingChart {
    pub radius: f64,
    /// 반올림하지 않은 값
    pub carb_percent: f64,
    pub protein_percent: f64,
    pub fat_percent: f64,
    pub segments: [ArcSegment; 3],
}

/// 세 값의 합이 0이면 `None` (그릴 것이 없음)
pub fn arc_segments(carb: f64, protein: f64, fat: f64) -> Option<RingChart> {
    arc_segments_with_radius(carb, protein, fat, RING_RADIUS)
}

pub fn arc_segments_with_radius(carb: f64, protein: f64, fat: f64, radius: f64) -> Option<RingChart> {
    let values = [non_negative(carb), non_negative(protein), non_negative(fat)];
    let sum: f64 = values.iter().sum();
    if sum == 0.0 {
        return None;
    }

    let percents = values.map(|v| v / sum * 100.0);
    let circumference = 2.0 * PI * radius;

    let mut cumulative = 0.0;
    let segments = [0, 1, 2].map(|i| {
        let arc_length = percents[i] / 100.0 * circumference;
        let segment = ArcSegment {
            color_slot: MacroKind::DRAW_ORDER[i],
            percent: percents[i],
            arc_length,
            arc_offset: -cumulative,
        };
        cumulative += arc_length;
        segment
    });

    Some(RingChart {
        radius,
        carb_percent: percents[0],
        protein_percent: percents[1],
        fat_percent: percents[2],
        segments,
    })
}

impl RingChart {
    pub fn circumference(&self) -> f64 {
        2.0 * PI * self.radius
    }

    /// 표시용 라벨: 영양소별 독립 반올림, 합계 보정 없음
    pub fn rounded_labels(&self) -> MacroPercent {
        MacroPercent {
            carb: self.carb_percent.round() as i32,
            protein: self.protein_percent.round() as i32,
            fat: self.fat_percent.round() as i32,
        }
    }

    /// 원호를 꺾은선으로 샘플링 (12시 방향에서 시계 방향, y축 위쪽)
    ///
    /// # Arguments
    /// * `segment` - 그릴 원호
    /// * `center` - 원의 중심 좌표
    /// * `radius` - 그릴 때의 반지름 (차트 반지름과 다를 수 있음)
    /// * `steps` - 분할 수 (최소 1)
    pub fn arc_points(
        &self,
        segment: &ArcSegment,
        center: (f64, f64),
        radius: f64,
        steps: usize,
    ) -> Vec<(f64, f64)> {
        let steps = steps.max(1);
        let start = -segment.arc_offset / self.radius;
        let sweep = segment.arc_length / self.radius;

        (0..=steps)
            .map(|i| {
                let angle = start + sweep * (i as f64 / steps as f64);
                (center.0 + radius * angle.sin(), center.1 + radius * angle.cos())
            })
            .collect()
    }
}

impl MealSummary {
    /// 끼니의 링 차트 (데이터가 없거나 모두 0이면 None)
    pub fn ring_chart(&self) -> Option<RingChart> {
        match self.nutrition.as_ref()? {
            MealNutrition::Grams(grams) => arc_segments(grams.carb, grams.protein, grams.fat),
            MealNutrition::Percent(percent) => arc_segments(
                percent.carb as f64,
                percent.protein as f64,
                percent.fat as f64,
            ),
        }
    }
}
