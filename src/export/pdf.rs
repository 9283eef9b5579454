use crate::analyzer::AnalysisReport;
use crate::error::{MealScanError, Result};
use mealscan_common::export::pdf_core::{
    meal_lines, summary_lines, wrap_text, ReportLayout, ReportLocale,
};
use mealscan_common::{MacroKind, MealSlot, MealSummary};
use printpdf::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

const RING_THICKNESS_PT: f32 = 9.0;
const EMPTY_RING_GRAY: f32 = 0.85;

#[derive(Debug, Clone, Default)]
pub struct PdfOptions {
    pub title: String,
    /// 한글 TTF. 없으면 기본 폰트 + 영문 라벨
    pub font_path: Option<PathBuf>,
}

/// 결과 리포트 PDF 생성 (A4 한 장)
pub fn generate_pdf(report: &AnalysisReport, output_path: &Path, options: &PdfOptions) -> Result<()> {
    let layout = ReportLayout::a4();
    let (doc, page1, layer1) = PdfDocument::new(
        options.title.as_str(),
        Mm(layout.page_width_mm),
        Mm(layout.page_height_mm),
        "Layer 1",
    );
    let layer = doc.get_page(page1).get_layer(layer1);

    let (font, locale) = match &options.font_path {
        Some(path) => {
            let file = File::open(path)
                .map_err(|_| MealScanError::FileNotFound(path.display().to_string()))?;
            let font = doc
                .add_external_font(file)
                .map_err(|e| MealScanError::PdfGeneration(format!("폰트 추가 오류: {:?}", e)))?;
            (font, ReportLocale::Korean)
        }
        None => {
            let font = doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| MealScanError::PdfGeneration(format!("폰트 추가 오류: {:?}", e)))?;
            (font, ReportLocale::Latin)
        }
    };

    draw_header(&layer, &font, &layout, locale, &options.title, &report.created_at);
    draw_summary(&layer, &font, &layout, locale, report);
    for slot in MealSlot::ALL {
        draw_meal_row(&layer, &font, &layout, locale, report.meal(slot));
    }
    draw_advice(&layer, &font, &layout, locale, report);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(output_path)?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| MealScanError::PdfGeneration(format!("PDF 저장 오류: {:?}", e)))?;

    Ok(())
}

fn draw_header(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    layout: &ReportLayout,
    locale: ReportLocale,
    title: &str,
    created_at: &str,
) {
    let title = match locale {
        ReportLocale::Latin if !title.is_ascii() => "MealScan Report".to_string(),
        _ => title.to_string(),
    };
    let top = layout.page_height_mm - layout.margin_mm;

    set_fill_gray(layer, 0.0);
    layer.use_text(title, 18.0, Mm(layout.margin_mm), Mm(top - 8.0), font);
    if !created_at.is_empty() {
        set_fill_gray(layer, 0.4);
        layer.use_text(created_at, 9.0, Mm(layout.margin_mm), Mm(top - 15.0), font);
    }
}

fn draw_summary(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    layout: &ReportLayout,
    locale: ReportLocale,
    report: &AnalysisReport,
) {
    let top = layout.summary_top_mm();
    let bottom = top - layout.summary_height_mm + 6.0;
    draw_box(layer, layout.margin_mm, bottom, layout.content_width_mm(), top - bottom);

    let (headline, detail) = summary_lines(&report.view_model.summary, locale);
    set_fill_gray(layer, 0.0);
    layer.use_text(headline, 14.0, Mm(layout.text_x_mm()), Mm(top - 12.0), font);
    set_fill_gray(layer, 0.25);
    layer.use_text(detail, 10.0, Mm(layout.text_x_mm()), Mm(top - 22.0), font);
}

fn draw_meal_row(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    layout: &ReportLayout,
    locale: ReportLocale,
    meal: &MealSummary,
) {
    let top = layout.meal_row_top_mm(meal.slot);
    let [label, food_name, detail] = meal_lines(meal, locale);

    set_fill_gray(layer, 0.0);
    layer.use_text(label, 13.0, Mm(layout.text_x_mm()), Mm(top - 10.0), font);
    set_fill_gray(layer, if meal.has_data { 0.1 } else { 0.5 });
    layer.use_text(food_name, 11.0, Mm(layout.text_x_mm()), Mm(top - 19.0), font);
    set_fill_gray(layer, 0.35);
    layer.use_text(detail, 9.0, Mm(layout.text_x_mm()), Mm(top - 27.0), font);

    let (cx, cy) = layout.meal_ring_center_mm(meal.slot);
    let radius = layout.ring_radius_mm;

    layer.set_outline_thickness(RING_THICKNESS_PT);
    match meal.ring_chart() {
        Some(chart) => {
            for segment in chart.segments.iter().filter(|s| s.arc_length > 0.0) {
                let steps = ((segment.percent / 100.0) * 72.0).ceil().max(2.0) as usize;
                let points = chart.arc_points(segment, (cx as f64, cy as f64), radius as f64, steps);
                let (r, g, b) = segment.color_slot.color();
                layer.set_outline_color(Color::Rgb(Rgb::new(r, g, b, None)));
                layer.add_line(polyline(&points, false));
            }

            let labels = chart.rounded_labels();
            let legend = [
                (MacroKind::Carb, labels.carb),
                (MacroKind::Protein, labels.protein),
                (MacroKind::Fat, labels.fat),
            ];
            for (i, (kind, percent)) in legend.iter().enumerate() {
                let (r, g, b) = kind.color();
                layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
                layer.use_text(
                    format!("{} {}%", locale.macro_label(*kind), percent),
                    8.0,
                    Mm(cx + radius + 6.0),
                    Mm(cy + 5.0 - i as f32 * 5.0),
                    font,
                );
            }
        }
        None => {
            // 빈 링
            let circle: Vec<(f64, f64)> = (0..=72)
                .map(|i| {
                    let angle = i as f64 / 72.0 * std::f64::consts::TAU;
                    (cx as f64 + radius as f64 * angle.sin(), cy as f64 + radius as f64 * angle.cos())
                })
                .collect();
            layer.set_outline_color(Color::Greyscale(Greyscale::new(EMPTY_RING_GRAY, None)));
            layer.add_line(polyline(&circle, true));
        }
    }
    layer.set_outline_thickness(1.0);
}

fn draw_advice(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    layout: &ReportLayout,
    locale: ReportLocale,
    report: &AnalysisReport,
) {
    let top = layout.advice_top_mm();
    draw_box(
        layer,
        layout.margin_mm,
        top - layout.advice_height_mm,
        layout.content_width_mm(),
        layout.advice_height_mm,
    );

    set_fill_gray(layer, 0.0);
    layer.use_text(locale.advice_heading(), 12.0, Mm(layout.text_x_mm()), Mm(top - 9.0), font);

    let max_chars = match locale {
        ReportLocale::Korean => 42,
        ReportLocale::Latin => 90,
    };
    let mut y = top - 17.0;
    set_fill_gray(layer, 0.15);
    for line in wrap_text(&locale.display_text(&report.advice.text), max_chars).into_iter().take(4) {
        layer.use_text(line, 10.0, Mm(layout.text_x_mm()), Mm(y), font);
        y -= 5.5;
    }

    if let Some(error) = &report.advice.error {
        set_fill_color(layer, (0.8, 0.2, 0.2));
        let note = wrap_text(&locale.display_text(error), max_chars + 10)
            .into_iter()
            .next()
            .unwrap_or_default();
        layer.use_text(note, 8.0, Mm(layout.text_x_mm()), Mm(y - 1.0), font);
    }
}

fn polyline(points: &[(f64, f64)], is_closed: bool) -> Line {
    Line {
        points: points
            .iter()
            .map(|(x, y)| (Point::new(Mm(*x as f32), Mm(*y as f32)), false))
            .collect(),
        is_closed,
    }
}

fn draw_box(layer: &PdfLayerReference, x: f32, y: f32, width: f32, height: f32) {
    let corners = [
        (x as f64, y as f64),
        ((x + width) as f64, y as f64),
        ((x + width) as f64, (y + height) as f64),
        (x as f64, (y + height) as f64),
    ];
    layer.set_outline_color(Color::Greyscale(Greyscale::new(0.75, None)));
    layer.set_outline_thickness(0.8);
    layer.add_line(polyline(&corners, true));
}

fn set_fill_gray(layer: &PdfLayerReference, gray: f32) {
    layer.set_fill_color(Color::Greyscale(Greyscale::new(gray, None)));
}

fn set_fill_color(layer: &PdfLayerReference, (r, g, b): (f32, f32, f32)) {
    layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
}
