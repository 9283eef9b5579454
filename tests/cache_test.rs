//! 캐시 기능 테스트
//!
//! 분석 결과 캐시의 저장/읽기/초기화를 검증

use mealscan::analyzer::cache::{cache_key, CacheFile};
use mealscan::analyzer::SlotAnalysis;
use mealscan_common::{MealSlot, NutritionResponse};
use tempfile::tempdir;

fn analysis(food_name: &str) -> SlotAnalysis {
    SlotAnalysis {
        food_name: food_name.to_string(),
        nutrition: NutritionResponse {
            calorie: 520.0,
            carbohydrate: 70.0,
            protein: 22.0,
            fat: Some(14.0),
        },
    }
}

/// 빈 캐시
#[test]
fn test_cache_file_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let cache = CacheFile::load(dir.path());

    assert_eq!(cache.len(), 0);
    assert!(cache.is_empty());
}

/// 저장 후 다시 읽기
#[test]
fn test_cache_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");

    let mut cache = CacheFile::load(dir.path());
    let key = cache_key(MealSlot::Lunch, b"lunch-photo");
    cache.insert(key.clone(), "lunch.jpg".to_string(), 1024, analysis("김치볶음밥"));
    cache.save(dir.path()).expect("캐시 저장 실패");

    assert!(CacheFile::cache_path(dir.path()).exists());

    let loaded = CacheFile::load(dir.path());
    assert_eq!(loaded.len(), 1);
    let cached = loaded.get(&key).expect("캐시 항목이 없음");
    assert_eq!(cached.food_name, "김치볶음밥");
    assert_eq!(cached.nutrition.fat, Some(14.0));

    // 같은 사진이라도 끼니가 다르면 다른 항목
    assert!(loaded.get(&cache_key(MealSlot::Dinner, b"lunch-photo")).is_none());
}

/// 깨진 캐시 파일은 빈 캐시로
#[test]
fn test_cache_broken_file_resets() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(CacheFile::cache_path(dir.path()), "{ not json").unwrap();

    let cache = CacheFile::load(dir.path());
    assert!(cache.is_empty());
}

/// 버전이 다르면 빈 캐시로
#[test]
fn test_cache_version_mismatch_resets() {
    let dir = tempdir().expect("Failed to create temp dir");
    let content = serde_json::json!({
        "version": 999,
        "entries": {
            "lunch:abc": {
                "file_name": "lunch.jpg",
                "file_size": 10,
                "result": { "foodName": "라면", "nutrition": { "calorie": 500 } }
            }
        }
    });
    std::fs::write(CacheFile::cache_path(dir.path()), content.to_string()).unwrap();

    let cache = CacheFile::load(dir.path());
    assert!(cache.is_empty());
}

/// 캐시 삭제
#[test]
fn test_cache_clear() {
    let dir = tempdir().expect("Failed to create temp dir");

    assert!(!CacheFile::clear(dir.path()).unwrap());

    let mut cache = CacheFile::default();
    cache.insert("morning:x".to_string(), "m.jpg".to_string(), 1, analysis("토스트"));
    cache.save(dir.path()).unwrap();

    assert!(CacheFile::clear(dir.path()).unwrap());
    assert!(!CacheFile::cache_path(dir.path()).exists());
}
