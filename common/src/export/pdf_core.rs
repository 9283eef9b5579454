//! PDF 리포트 레이아웃 계산 (mm 단위)
//!
//! 실제 그리기는 CLI 쪽(printpdf)에서 하고, 여기서는 좌표와 표시 문구만 만든다.

use crate::ring::MacroKind;
use crate::types::{DailySummary, MealNutrition, MealSlot, MealSummary};

/// 리포트 문구 언어. 한글 폰트가 없으면 Latin을 사용한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLocale {
    Korean,
    Latin,
}

impl ReportLocale {
    pub fn slot_label(&self, slot: MealSlot) -> &'static str {
        match (self, slot) {
            (ReportLocale::Korean, slot) => slot.label(),
            (ReportLocale::Latin, MealSlot::Morning) => "Morning",
            (ReportLocale::Latin, MealSlot::Lunch) => "Lunch",
            (ReportLocale::Latin, MealSlot::Dinner) => "Dinner",
        }
    }

    pub fn macro_label(&self, kind: MacroKind) -> &'static str {
        match (self, kind) {
            (ReportLocale::Korean, kind) => kind.label(),
            (ReportLocale::Latin, MacroKind::Carb) => "Carb",
            (ReportLocale::Latin, MacroKind::Protein) => "Protein",
            (ReportLocale::Latin, MacroKind::Fat) => "Fat",
        }
    }

    pub fn advice_heading(&self) -> &'static str {
        match self {
            ReportLocale::Korean => "AI 건강 솔루션",
            ReportLocale::Latin => "AI Health Advice",
        }
    }

    /// 폰트로 표시할 수 없는 문자를 치환
    pub fn display_text(&self, text: &str) -> String {
        match self {
            ReportLocale::Korean => text.to_string(),
            ReportLocale::Latin => text
                .chars()
                .map(|c| if c.is_ascii() { c } else { '?' })
                .collect(),
        }
    }
}

/// A4 세로 리포트 레이아웃
#[derive(Debug, Clone)]
pub struct ReportLayout {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub header_height_mm: f32,
    pub summary_height_mm: f32,
    pub meal_row_height_mm: f32,
    pub ring_radius_mm: f32,
    pub advice_height_mm: f32,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self::a4()
    }
}

impl ReportLayout {
    pub fn a4() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 15.0,
            header_height_mm: 22.0,
            summary_height_mm: 38.0,
            meal_row_height_mm: 52.0,
            ring_radius_mm: 16.0,
            advice_height_mm: 40.0,
        }
    }

    /// 요약 박스 상단 Y (PDF 좌표, 아래가 0)
    pub fn summary_top_mm(&self) -> f32 {
        self.page_height_mm - self.margin_mm - self.header_height_mm
    }

    /// 끼니 행 상단 Y
    pub fn meal_row_top_mm(&self, slot: MealSlot) -> f32 {
        self.summary_top_mm()
            - self.summary_height_mm
            - slot.index() as f32 * self.meal_row_height_mm
    }

    /// 끼니 행 링 차트 중심
    pub fn meal_ring_center_mm(&self, slot: MealSlot) -> (f32, f32) {
        let top = self.meal_row_top_mm(slot);
        (
            self.page_width_mm - self.margin_mm - self.ring_radius_mm - 30.0,
            top - self.meal_row_height_mm / 2.0,
        )
    }

    pub fn advice_top_mm(&self) -> f32 {
        self.meal_row_top_mm(MealSlot::Dinner) - self.meal_row_height_mm - 4.0
    }

    pub fn text_x_mm(&self) -> f32 {
        self.margin_mm + 4.0
    }

    pub fn content_width_mm(&self) -> f32 {
        self.page_width_mm - self.margin_mm * 2.0
    }
}

/// 요약 박스 문구 (제목 줄, 상세 줄)
pub fn summary_lines(summary: &DailySummary, locale: ReportLocale) -> (String, String) {
    match (summary, locale) {
        (DailySummary::None, ReportLocale::Korean) => (
            "아직 기록된 식사가 없어요".to_string(),
            "식사 사진을 업로드하면 영양 정보를 분석해 드립니다".to_string(),
        ),
        (DailySummary::None, ReportLocale::Latin) => (
            "No meals recorded yet".to_string(),
            "Upload a meal photo to analyze nutrition".to_string(),
        ),
        (
            DailySummary::Gram { total_kcal, total_carb, total_protein, total_fat },
            ReportLocale::Korean,
        ) => (
            format!("오늘 하루 총 {:.0}kcal 먹었어요", total_kcal),
            format!(
                "단백질은 {:.0}g, 탄수화물은 {:.0}g, 지방은 {:.0}g 섭취했어요",
                total_protein, total_carb, total_fat
            ),
        ),
        (
            DailySummary::Gram { total_kcal, total_carb, total_protein, total_fat },
            ReportLocale::Latin,
        ) => (
            format!("Total {:.0} kcal today", total_kcal),
            format!(
                "Protein {:.0} g / Carb {:.0} g / Fat {:.0} g",
                total_protein, total_carb, total_fat
            ),
        ),
        (
            DailySummary::Percent { total_kcal, carb_percent, protein_percent, fat_percent },
            ReportLocale::Korean,
        ) => (
            format!("오늘 하루 총 {:.0}kcal 먹었어요", total_kcal),
            format!(
                "탄수화물 {}%, 단백질 {}%, 지방 {}% 비율로 섭취했어요",
                carb_percent, protein_percent, fat_percent
            ),
        ),
        (
            DailySummary::Percent { total_kcal, carb_percent, protein_percent, fat_percent },
            ReportLocale::Latin,
        ) => (
            format!("Total {:.0} kcal today", total_kcal),
            format!(
                "Carb {}% / Protein {}% / Fat {}%",
                carb_percent, protein_percent, fat_percent
            ),
        ),
    }
}

/// 끼니 행 문구: 라벨, 음식 이름, 상세
pub fn meal_lines(meal: &MealSummary, locale: ReportLocale) -> [String; 3] {
    let label = locale.slot_label(meal.slot).to_string();
    let food_name = locale.display_text(&meal.food_name);

    let detail = match (&meal.nutrition, meal.kcal) {
        (Some(MealNutrition::Grams(grams)), Some(kcal)) => format!(
            "{:.0}kcal | {} {:.1}g / {} {:.1}g / {} {:.1}g",
            kcal,
            locale.macro_label(MacroKind::Carb),
            grams.carb,
            locale.macro_label(MacroKind::Protein),
            grams.protein,
            locale.macro_label(MacroKind::Fat),
            grams.fat
        ),
        (Some(MealNutrition::Percent(percent)), Some(kcal)) => {
            let grams = meal.gram_equivalents().unwrap_or_default();
            format!(
                "{:.0}kcal | {} {}% ({:.1}g) / {} {}% ({:.1}g) / {} {}% ({:.1}g)",
                kcal,
                locale.macro_label(MacroKind::Carb),
                percent.carb,
                grams.carb,
                locale.macro_label(MacroKind::Protein),
                percent.protein,
                grams.protein,
                locale.macro_label(MacroKind::Fat),
                percent.fat,
                grams.fat
            )
        }
        _ => "-".to_string(),
    };

    [label, food_name, locale.display_text(&detail)]
}

/// 조언 본문을 한 줄 최대 글자 수로 나눈다 (문자 단위)
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}
