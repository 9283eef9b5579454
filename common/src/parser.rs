//! 백엔드 응답 파서
//!
//! 음식 인식 / 영양 요약 / 솔루션 API의 응답을 파싱한다.
//! 숫자 필드는 느슨하게 읽는다: 숫자, 숫자 문자열("12.5", "12.5g"),
//! null/누락은 0.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 음식 인식 응답 (`/vision/image-detect`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectResponse {
    /// null이면 빈 문자열 (인식 실패로 취급)
    #[serde(deserialize_with = "lenient_string")]
    pub food_name: String,
    pub prediction: Option<Value>,
    pub when: Option<String>,
}

/// 영양 요약 응답 (`/nutrition/summary-recipe`), 단위는 kcal / g
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NutritionResponse {
    #[serde(deserialize_with = "lenient_f64", alias = "kcal")]
    pub calorie: f64,
    #[serde(deserialize_with = "lenient_f64", alias = "carb")]
    pub carbohydrate: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub protein: f64,
    /// 지방 값은 백엔드에 따라 없을 수 있다
    #[serde(deserialize_with = "lenient_opt_f64")]
    pub fat: Option<f64>,
}

/// 응답 문자열에서 JSON 객체 부분을 추출
///
/// 추출 우선순위:
/// 1. ```json ... ``` 블록
/// 2. 처음 `{` 부터 마지막 `}` 까지
///
/// # Examples
/// ```
/// use mealscan_common::extract_json;
///
/// let json = extract_json("result: {\"foodName\": \"김밥\"}").unwrap();
/// assert!(json.starts_with('{'));
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7;
        if let Some(end_offset) = response[start..].find("```") {
            return Ok(response[start..start + end_offset].trim());
        }
    }

    if let (Some(start), Some(end)) = (response.find('{'), response.rfind('}')) {
        if end > start {
            return Ok(&response[start..=end]);
        }
    }

    Err(Error::Parse("응답에서 JSON을 찾을 수 없습니다".into()))
}

pub fn parse_detect_response(response: &str) -> Result<DetectResponse> {
    let json_str = extract_json(response)?;
    serde_json::from_str(json_str)
        .map_err(|e| Error::Parse(format!("음식 인식 응답 파싱 오류: {}", e)))
}

pub fn parse_nutrition_response(response: &str) -> Result<NutritionResponse> {
    let json_str = extract_json(response)?;
    serde_json::from_str(json_str)
        .map_err(|e| Error::Parse(format!("영양 요약 응답 파싱 오류: {}", e)))
}

/// 솔루션 응답: `{solution}` / `{message}` / `{result}` JSON, JSON 문자열, 또는 일반 텍스트
pub fn parse_solution_response(response: &str) -> Result<String> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(Error::Parse("솔루션 응답이 비어 있습니다".into()));
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(text)) => Ok(text),
        Ok(Value::Object(map)) => ["solution", "message", "result", "text"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .ok_or_else(|| Error::Parse("솔루션 응답에 텍스트 필드가 없습니다".into())),
        _ => Ok(trimmed.to_string()),
    }
}

/// JSON 값에서 숫자를 느슨하게 읽는다 (읽을 수 없으면 None)
pub fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_leading_number(s),
        _ => None,
    }
}

/// "12.5g", " 300 kcal" 같은 문자열의 앞쪽 숫자
fn parse_leading_number(s: &str) -> Option<f64> {
    let s = s.trim();
    let end = s
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && (*c == '-' || *c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_number(&value).unwrap_or(0.0))
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn lenient_opt_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_number(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // =============================================
    // JSON 추출
    // =============================================

    #[test]
    fn test_extract_json_with_block() {
        let response = "분석 결과:\n```json\n{\"foodName\": \"라면\"}\n```\n끝";
        assert_eq!(extract_json(response).unwrap(), "{\"foodName\": \"라면\"}");
    }

    #[test]
    fn test_extract_json_raw_object() {
        let response = r#"{"calorie": 500}"#;
        assert_eq!(extract_json(response).unwrap(), response);
    }

    #[test]
    fn test_extract_json_not_found() {
        assert!(matches!(extract_json("no json here"), Err(Error::Parse(_))));
    }

    // =============================================
    // 응답 파싱
    // =============================================

    #[test]
    fn test_parse_detect_response() {
        let detect = parse_detect_response(
            r#"{"foodName": "불고기", "prediction": 0.92, "when": "lunch"}"#,
        )
        .unwrap();
        assert_eq!(detect.food_name, "불고기");
        assert_eq!(detect.when.as_deref(), Some("lunch"));
    }

    #[test]
    fn test_parse_detect_response_null_food_name() {
        let detect = parse_detect_response(r#"{"foodName": null, "prediction": 0.1}"#).unwrap();
        assert_eq!(detect.food_name, "");

        let detect = parse_detect_response(r#"{"prediction": 0.1, "when": "morning"}"#).unwrap();
        assert_eq!(detect.food_name, "");
    }

    #[test]
    fn test_parse_detect_response_missing_food_name() {
        let detect = parse_detect_response(r#"{"prediction": null}"#).unwrap();
        assert!(detect.food_name.is_empty());
    }

    #[test]
    fn test_parse_nutrition_response_lenient_numbers() {
        let nutrition = parse_nutrition_response(
            r#"{"calorie": "650.5kcal", "carbohydrate": 80, "protein": "25g"}"#,
        )
        .unwrap();
        assert_eq!(nutrition.calorie, 650.5);
        assert_eq!(nutrition.carbohydrate, 80.0);
        assert_eq!(nutrition.protein, 25.0);
        assert_eq!(nutrition.fat, None);
    }

    #[test]
    fn test_parse_nutrition_response_non_numeric_is_zero() {
        let nutrition =
            parse_nutrition_response(r#"{"calorie": "N/A", "carbohydrate": null, "fat": 12}"#)
                .unwrap();
        assert_eq!(nutrition.calorie, 0.0);
        assert_eq!(nutrition.carbohydrate, 0.0);
        assert_eq!(nutrition.protein, 0.0);
        assert_eq!(nutrition.fat, Some(12.0));
    }

    #[test]
    fn test_parse_solution_response_variants() {
        assert_eq!(
            parse_solution_response(r#"{"solution": "물을 더 드세요"}"#).unwrap(),
            "물을 더 드세요"
        );
        assert_eq!(
            parse_solution_response(r#"{"message": "좋아요"}"#).unwrap(),
            "좋아요"
        );
        assert_eq!(parse_solution_response("\"문자열 응답\"").unwrap(), "문자열 응답");
        assert_eq!(parse_solution_response("  일반 텍스트  ").unwrap(), "일반 텍스트");
        assert!(parse_solution_response("   ").is_err());
        assert!(parse_solution_response(r#"{"other": 1}"#).is_err());
    }

    #[test]
    fn test_lenient_number() {
        assert_eq!(lenient_number(&json!(3)), Some(3.0));
        assert_eq!(lenient_number(&json!(" 12.5 g")), Some(12.5));
        assert_eq!(lenient_number(&json!("-4")), Some(-4.0));
        assert_eq!(lenient_number(&json!("abc")), None);
        assert_eq!(lenient_number(&json!(true)), None);
        assert_eq!(lenient_number(&Value::Null), None);
    }
}
