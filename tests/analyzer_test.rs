//! 업로드 흐름 통합 테스트
//!
//! 네트워크 없이 모의 백엔드로 끼니별 분석, 캐시, 솔루션 대체 문구를 검증

use async_trait::async_trait;
use mealscan::analyzer::{self, CacheFile};
use mealscan::api::NutritionBackend;
use mealscan::error::{MealScanError, Result};
use mealscan::scanner::MealImage;
use mealscan_common::{
    build, parse_detect_response, AdviceSource, DailySummary, DetectResponse, MealSlot,
    NutritionResponse, UploadMode, UploadPayload,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

struct MockBackend {
    foods: HashMap<MealSlot, (&'static str, NutritionResponse)>,
    delays: HashMap<MealSlot, u64>,
    /// 끼니별 인식 응답 본문 (있으면 파서를 거친다)
    detect_bodies: HashMap<MealSlot, &'static str>,
    fail_slot: Option<MealSlot>,
    solution: std::result::Result<String, String>,
    detect_calls: AtomicUsize,
    summarized: Mutex<Vec<MealSlot>>,
    solution_requests: Mutex<Vec<String>>,
}

impl MockBackend {
    fn new() -> Self {
        let mut foods = HashMap::new();
        foods.insert(MealSlot::Morning, ("토스트", nutrition(300.0, 40.0, 10.0, Some(12.0))));
        foods.insert(MealSlot::Lunch, ("비빔밥", nutrition(600.0, 90.0, 20.0, Some(15.0))));
        foods.insert(MealSlot::Dinner, ("된장찌개", nutrition(400.0, 30.0, 25.0, Some(18.0))));
        Self {
            foods,
            delays: HashMap::new(),
            detect_bodies: HashMap::new(),
            fail_slot: None,
            solution: Ok("채소를 조금 더 드셔 보세요.".to_string()),
            detect_calls: AtomicUsize::new(0),
            summarized: Mutex::new(Vec::new()),
            solution_requests: Mutex::new(Vec::new()),
        }
    }

    fn summarized(&self) -> Vec<MealSlot> {
        self.summarized.lock().unwrap().clone()
    }
}

fn nutrition(calorie: f64, carbohydrate: f64, protein: f64, fat: Option<f64>) -> NutritionResponse {
    NutritionResponse {
        calorie,
        carbohydrate,
        protein,
        fat,
    }
}

#[async_trait]
impl NutritionBackend for MockBackend {
    async fn detect_food(&self, slot: MealSlot, _image: &MealImage) -> Result<DetectResponse> {
        self.detect_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_slot == Some(slot) {
            return Err(MealScanError::ApiCall {
                step: "이미지 분석",
                slot,
                message: "HTTP 500".to_string(),
            });
        }
        if let Some(ms) = self.delays.get(&slot) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
        if let Some(body) = self.detect_bodies.get(&slot) {
            return Ok(parse_detect_response(body)?);
        }
        Ok(DetectResponse {
            food_name: self.foods[&slot].0.to_string(),
            prediction: None,
            when: Some(slot.key().to_string()),
        })
    }

    async fn fetch_recipe(&self, slot: MealSlot, food_name: &str) -> Result<Value> {
        Ok(json!({ "slot": slot.key(), "foodName": food_name }))
    }

    async fn summarize_nutrition(&self, slot: MealSlot, recipe: &Value) -> Result<NutritionResponse> {
        assert_eq!(recipe["slot"], slot.key());
        self.summarized.lock().unwrap().push(slot);
        Ok(self.foods[&slot].1.clone())
    }

    async fn request_solution(&self, nutrition_text: &str) -> Result<String> {
        self.solution_requests.lock().unwrap().push(nutrition_text.to_string());
        self.solution
            .clone()
            .map_err(MealScanError::AdviceRequest)
    }
}

fn meal_image(name: &str) -> MealImage {
    MealImage {
        path: PathBuf::from(name),
        file_name: name.to_string(),
        original: name.as_bytes().to_vec(),
        jpeg: Vec::new(),
        width: 1,
        height: 1,
    }
}

// ========================================
// 한 끼 모드
// ========================================

#[tokio::test]
async fn test_single_meal_ratios_from_grams() {
    let backend = MockBackend::new();
    let payload = analyzer::analyze_single_meal(&backend, MealSlot::Lunch, &meal_image("lunch.jpg"), None)
        .await
        .unwrap();

    assert_eq!(payload.meal_label, MealSlot::Lunch);
    assert_eq!(payload.food_name.as_deref(), Some("비빔밥"));
    assert_eq!(payload.total_kcal, 600.0);
    let total = 90.0 + 20.0 + 15.0;
    assert!((payload.carb_ratio - 90.0 / total).abs() < 1e-9);
    assert!((payload.protein_ratio - 20.0 / total).abs() < 1e-9);
    assert!((payload.fat_ratio.unwrap() - 15.0 / total).abs() < 1e-9);

    let vm = build(&UploadPayload::SingleMeal(payload));
    assert_eq!(vm.mode, UploadMode::SingleMeal);
    assert_eq!(vm.focus, Some(MealSlot::Lunch));
    assert!(vm.meal(MealSlot::Lunch).has_data);
    assert!(!vm.meal(MealSlot::Morning).has_data);
}

#[tokio::test]
async fn test_single_meal_zero_grams_guarded() {
    let mut backend = MockBackend::new();
    backend
        .foods
        .insert(MealSlot::Dinner, ("물", nutrition(0.0, 0.0, 0.0, None)));

    let payload = analyzer::analyze_single_meal(&backend, MealSlot::Dinner, &meal_image("d.jpg"), None)
        .await
        .unwrap();
    assert_eq!(payload.carb_ratio, 0.0);
    assert_eq!(payload.protein_ratio, 0.0);

    let vm = build(&UploadPayload::SingleMeal(payload));
    assert!(!vm.meal(MealSlot::Dinner).has_data);
    assert_eq!(vm.summary, DailySummary::None);
}

// ========================================
// 세 끼 모드
// ========================================

#[tokio::test]
async fn test_three_meals_attach_results_by_slot() {
    let mut backend = MockBackend::new();
    // 아침이 가장 늦게 끝나도 결과는 아침 슬롯에 붙어야 한다
    backend.delays.insert(MealSlot::Morning, 60);
    backend.delays.insert(MealSlot::Lunch, 30);

    let images = vec![
        (MealSlot::Morning, meal_image("m.jpg")),
        (MealSlot::Lunch, meal_image("l.jpg")),
        (MealSlot::Dinner, meal_image("d.jpg")),
    ];
    let payload = analyzer::analyze_three_meals(&backend, &images, None).await.unwrap();

    assert_eq!(payload.get(MealSlot::Morning).unwrap().food_name.as_deref(), Some("토스트"));
    assert_eq!(payload.get(MealSlot::Lunch).unwrap().food_name.as_deref(), Some("비빔밥"));
    assert_eq!(payload.get(MealSlot::Dinner).unwrap().food_name.as_deref(), Some("된장찌개"));
    assert_eq!(payload.get(MealSlot::Dinner).unwrap().image_ref.as_deref(), Some("d.jpg"));

    // 완료 순서는 지연 시간 순
    assert_eq!(
        backend.summarized(),
        vec![MealSlot::Dinner, MealSlot::Lunch, MealSlot::Morning]
    );

    let vm = build(&UploadPayload::ThreeMeals(payload));
    match vm.summary {
        DailySummary::Gram { total_kcal, total_carb, .. } => {
            assert_eq!(total_kcal, 1300.0);
            assert_eq!(total_carb, 160.0);
        }
        other => panic!("Gram 요약이어야 합니다: {:?}", other),
    }
}

#[tokio::test]
async fn test_three_meals_partial_upload() {
    let backend = MockBackend::new();
    let images = vec![(MealSlot::Dinner, meal_image("d.jpg"))];
    let payload = analyzer::analyze_three_meals(&backend, &images, None).await.unwrap();

    assert!(payload.get(MealSlot::Morning).is_none());
    assert!(payload.get(MealSlot::Lunch).is_none());
    assert!(payload.get(MealSlot::Dinner).is_some());
    assert_eq!(backend.detect_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_three_meals_requires_an_image() {
    let backend = MockBackend::new();
    let result = analyzer::analyze_three_meals(&backend, &[], None).await;
    assert!(matches!(result, Err(MealScanError::NoMealImages)));
    assert_eq!(backend.detect_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_three_meals_abort_on_failure() {
    let mut backend = MockBackend::new();
    backend.fail_slot = Some(MealSlot::Lunch);
    backend.delays.insert(MealSlot::Morning, 200);
    backend.delays.insert(MealSlot::Dinner, 200);

    let images = vec![
        (MealSlot::Morning, meal_image("m.jpg")),
        (MealSlot::Lunch, meal_image("l.jpg")),
        (MealSlot::Dinner, meal_image("d.jpg")),
    ];
    let err = analyzer::analyze_three_meals(&backend, &images, None)
        .await
        .unwrap_err();

    match &err {
        MealScanError::ApiCall { slot, .. } => assert_eq!(*slot, MealSlot::Lunch),
        other => panic!("ApiCall 에러여야 합니다: {:?}", other),
    }
    assert!(err.to_string().contains("점심"));
    // 다른 끼니는 취소되어 영양 요약까지 가지 않는다
    assert!(backend.summarized().is_empty());
}

#[tokio::test]
async fn test_unrecognized_food_is_zero_data() {
    let mut backend = MockBackend::new();
    backend
        .foods
        .insert(MealSlot::Morning, ("  ", nutrition(999.0, 1.0, 1.0, None)));

    let images = vec![(MealSlot::Morning, meal_image("m.jpg"))];
    let payload = analyzer::analyze_three_meals(&backend, &images, None).await.unwrap();
    let input = payload.get(MealSlot::Morning).unwrap();
    assert!(input.food_name.is_none());
    assert_eq!(input.kcal, Some(0.0));
    assert!(backend.summarized().is_empty());

    // 세 끼 모드에서는 업로드된 끼니라면 0kcal도 데이터
    let vm = build(&UploadPayload::ThreeMeals(payload));
    let morning = vm.meal(MealSlot::Morning);
    assert!(morning.has_data);
    assert_eq!(morning.food_name, "아침에 드신 음식");
    assert_eq!(morning.kcal, Some(0.0));
}

#[tokio::test]
async fn test_null_food_name_falls_back_to_slot_name() {
    let mut backend = MockBackend::new();
    backend
        .detect_bodies
        .insert(MealSlot::Morning, r#"{"foodName": null, "prediction": 0.1}"#);

    let images = vec![
        (MealSlot::Morning, meal_image("m.jpg")),
        (MealSlot::Lunch, meal_image("l.jpg")),
    ];
    let payload = analyzer::analyze_three_meals(&backend, &images, None).await.unwrap();
    assert!(payload.get(MealSlot::Morning).unwrap().food_name.is_none());
    assert_eq!(backend.summarized(), vec![MealSlot::Lunch]);

    let vm = build(&UploadPayload::ThreeMeals(payload));
    assert_eq!(vm.meal(MealSlot::Morning).food_name, "아침에 드신 음식");
    assert_eq!(vm.meal(MealSlot::Lunch).food_name, "비빔밥");
}

#[tokio::test]
async fn test_single_meal_null_food_name_is_not_an_error() {
    let mut backend = MockBackend::new();
    backend
        .detect_bodies
        .insert(MealSlot::Morning, r#"{"foodName": null}"#);

    let payload = analyzer::analyze_single_meal(&backend, MealSlot::Morning, &meal_image("m.jpg"), None)
        .await
        .unwrap();
    assert!(payload.food_name.is_none());
    assert_eq!(payload.total_kcal, 0.0);
}

// ========================================
// 캐시
// ========================================

#[tokio::test]
async fn test_cache_skips_backend_calls() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let backend = MockBackend::new();
    let images = vec![
        (MealSlot::Morning, meal_image("m.jpg")),
        (MealSlot::Dinner, meal_image("d.jpg")),
    ];

    let mut cache = CacheFile::load(dir.path());
    let first = analyzer::analyze_three_meals(&backend, &images, Some(&mut cache))
        .await
        .unwrap();
    assert_eq!(cache.len(), 2);
    cache.save(dir.path()).expect("캐시 저장 실패");
    assert_eq!(backend.detect_calls.load(Ordering::SeqCst), 2);

    let mut reloaded = CacheFile::load(dir.path());
    let second = analyzer::analyze_three_meals(&backend, &images, Some(&mut reloaded))
        .await
        .unwrap();
    assert_eq!(backend.detect_calls.load(Ordering::SeqCst), 2);
    assert_eq!(first, second);

    // 새 끼니만 요청
    let more = vec![
        (MealSlot::Morning, meal_image("m.jpg")),
        (MealSlot::Lunch, meal_image("l.jpg")),
    ];
    analyzer::analyze_three_meals(&backend, &more, Some(&mut reloaded))
        .await
        .unwrap();
    assert_eq!(backend.detect_calls.load(Ordering::SeqCst), 3);
    assert_eq!(reloaded.len(), 3);
}

// ========================================
// AI 솔루션
// ========================================

#[tokio::test]
async fn test_fetch_advice_remote() {
    let backend = MockBackend::new();
    let images = vec![(MealSlot::Lunch, meal_image("l.jpg"))];
    let payload = analyzer::analyze_three_meals(&backend, &images, None).await.unwrap();
    let vm = build(&UploadPayload::ThreeMeals(payload));

    let advice = analyzer::fetch_advice(&backend, &vm).await;
    assert_eq!(advice.source, AdviceSource::Remote);
    assert_eq!(advice.text, "채소를 조금 더 드셔 보세요.");
    assert!(advice.error.is_none());

    let requests = backend.solution_requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].contains("점심: 비빔밥"));
    assert!(requests[0].contains("아침: 식사 없음"));
}

#[tokio::test]
async fn test_fetch_advice_failure_uses_fallback_with_note() {
    let mut backend = MockBackend::new();
    backend.solution = Err("timeout".to_string());
    let images = vec![(MealSlot::Lunch, meal_image("l.jpg"))];
    let payload = analyzer::analyze_three_meals(&backend, &images, None).await.unwrap();
    let vm = build(&UploadPayload::ThreeMeals(payload));

    let advice = analyzer::fetch_advice(&backend, &vm).await;
    assert_eq!(advice.source, AdviceSource::Fallback);
    assert!(advice.text.contains("600kcal"));
    assert!(advice.error.as_deref().unwrap().contains("timeout"));
}

#[tokio::test]
async fn test_fetch_advice_skipped_without_data() {
    let backend = MockBackend::new();
    let vm = build(&UploadPayload::ThreeMeals(Default::default()));

    let advice = analyzer::fetch_advice(&backend, &vm).await;
    assert_eq!(advice.source, AdviceSource::Fallback);
    assert!(advice.error.is_none());
    assert!(backend.solution_requests.lock().unwrap().is_empty());
}
