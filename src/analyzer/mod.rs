pub mod cache;
mod types;

pub use cache::CacheFile;
pub use types::{AnalysisReport, SlotAnalysis};

use crate::api::NutritionBackend;
use crate::error::{MealScanError, Result};
use crate::scanner::MealImage;
use futures::future::try_join_all;
use mealscan_common::{
    nutrition_text, ratios_from_grams, Advice, DailySummary, MealSlot, SingleMealPayload,
    ThreeMealsPayload, ViewModel,
};

/// 끼니 하나 분석: 음식 인식 → 레시피 조회 → 영양 요약
///
/// 음식 이름을 인식하지 못하면 레시피를 조회하지 않고 영양 값 0으로 둔다.
pub async fn analyze_slot<B>(backend: &B, slot: MealSlot, image: &MealImage) -> Result<SlotAnalysis>
where
    B: NutritionBackend + ?Sized,
{
    let detect = backend.detect_food(slot, image).await?;
    let food_name = detect.food_name.trim().to_string();

    if food_name.is_empty() {
        tracing::warn!(slot = slot.key(), "음식을 인식하지 못했습니다");
        return Ok(SlotAnalysis::default());
    }

    let recipe = backend.fetch_recipe(slot, &food_name).await?;
    let nutrition = backend.summarize_nutrition(slot, &recipe).await?;
    tracing::debug!(slot = slot.key(), food = %food_name, kcal = nutrition.calorie, "slot analyzed");

    Ok(SlotAnalysis { food_name, nutrition })
}

/// 한 끼 모드: 그램 값을 비율로 바꿔 결과 화면에 넘긴다
pub fn single_meal_payload(slot: MealSlot, analysis: &SlotAnalysis, image_ref: Option<String>) -> SingleMealPayload {
    let nutrition = &analysis.nutrition;
    let ratios = ratios_from_grams(nutrition.carbohydrate, nutrition.protein, nutrition.fat);

    SingleMealPayload {
        meal_label: slot,
        food_name: Some(analysis.food_name.clone()).filter(|n| !n.is_empty()),
        image_ref,
        total_kcal: nutrition.calorie,
        carb_ratio: ratios.carb_ratio,
        protein_ratio: ratios.protein_ratio,
        fat_ratio: ratios.fat_ratio,
    }
}

pub async fn analyze_single_meal<B>(
    backend: &B,
    slot: MealSlot,
    image: &MealImage,
    cache: Option<&mut CacheFile>,
) -> Result<SingleMealPayload>
where
    B: NutritionBackend + ?Sized,
{
    let images = [(slot, image.clone())];
    let mut results = analyze_slots(backend, &images, cache).await?;
    let (slot, analysis) = results.remove(0);
    Ok(single_meal_payload(slot, &analysis, Some(image.path.display().to_string())))
}

/// 세 끼 모드
///
/// 업로드된 끼니마다 작업을 동시에 실행하고 모두 끝난 뒤 합친다.
/// 하나라도 실패하면 나머지는 취소되고 전체가 실패한다 (부분 결과 없음).
pub async fn analyze_three_meals<B>(
    backend: &B,
    images: &[(MealSlot, MealImage)],
    cache: Option<&mut CacheFile>,
) -> Result<ThreeMealsPayload>
where
    B: NutritionBackend + ?Sized,
{
    if images.is_empty() {
        return Err(MealScanError::NoMealImages);
    }

    let results = analyze_slots(backend, images, cache).await?;

    let mut payload = ThreeMealsPayload::default();
    for (slot, analysis) in results {
        let image_ref = images
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, img)| img.path.display().to_string());
        payload.set(slot, analysis.to_meal_input(image_ref));
    }
    Ok(payload)
}

/// 캐시에 없는 끼니만 백엔드에 요청한다. 결과는 입력 순서를 유지.
async fn analyze_slots<B>(
    backend: &B,
    images: &[(MealSlot, MealImage)],
    mut cache: Option<&mut CacheFile>,
) -> Result<Vec<(MealSlot, SlotAnalysis)>>
where
    B: NutritionBackend + ?Sized,
{
    let keys: Vec<String> = images
        .iter()
        .map(|(slot, img)| cache::cache_key(*slot, &img.original))
        .collect();

    let mut results: Vec<Option<SlotAnalysis>> = keys
        .iter()
        .map(|key| cache.as_deref().and_then(|c| c.get(key)).cloned())
        .collect();

    let pending: Vec<usize> = (0..images.len()).filter(|i| results[*i].is_none()).collect();
    if pending.len() < images.len() {
        tracing::info!(cached = images.len() - pending.len(), "캐시 사용");
    }

    let tasks = pending.iter().map(|&i| {
        let (slot, image) = &images[i];
        async move { analyze_slot(backend, *slot, image).await.map(|a| (i, a)) }
    });
    let fresh = try_join_all(tasks).await?;

    for (i, analysis) in fresh {
        if let Some(cache) = cache.as_deref_mut() {
            let (_, image) = &images[i];
            cache.insert(
                keys[i].clone(),
                image.file_name.clone(),
                image.original.len() as u64,
                analysis.clone(),
            );
        }
        results[i] = Some(analysis);
    }

    Ok(images
        .iter()
        .zip(results)
        .map(|((slot, _), result)| (*slot, result.unwrap_or_default()))
        .collect())
}

/// 결과 화면용 조언 요청
///
/// 실패해도 에러를 올리지 않고 기본 문구와 오류 메모를 돌려준다.
/// 분석할 식사가 없으면 요청하지 않는다.
pub async fn fetch_advice<B>(backend: &B, view_model: &ViewModel) -> Advice
where
    B: NutritionBackend + ?Sized,
{
    if matches!(view_model.summary, DailySummary::None) {
        return Advice::fallback(&view_model.summary, None);
    }

    let text = nutrition_text(view_model);
    match backend.request_solution(&text).await {
        Ok(solution) if !solution.trim().is_empty() => Advice::remote(solution.trim()),
        Ok(_) => Advice::fallback(
            &view_model.summary,
            Some("AI 솔루션 응답이 비어 있어 기본 안내를 표시합니다".to_string()),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "AI 솔루션 요청 실패, 기본 안내 사용");
            Advice::fallback(
                &view_model.summary,
                Some(format!("AI 솔루션을 불러오지 못해 기본 안내를 표시합니다: {}", e)),
            )
        }
    }
}
