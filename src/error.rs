use mealscan_common::MealSlot;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MealScanError {
    #[error("설정 오류: {0}")]
    Config(String),

    #[error("파일을 찾을 수 없습니다: {0}")]
    FileNotFound(String),

    #[error("지원하지 않는 이미지 형식입니다: {0} (JPG, PNG, WEBP만 가능)")]
    UnsupportedImage(String),

    #[error("이미지 읽기 오류: {0}")]
    ImageLoad(String),

    #[error("최소 1개 이상의 끼니 사진을 업로드해 주세요")]
    NoMealImages,

    #[error("{step} 요청 실패 ({slot}): {message}")]
    ApiCall {
        step: &'static str,
        slot: MealSlot,
        message: String,
    },

    #[error("AI 솔루션 요청 실패: {0}")]
    AdviceRequest(String),

    #[error("API 응답 파싱 실패: {0}")]
    ApiParse(String),

    #[error("HTTP 오류: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON 파싱 오류: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO 오류: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF 생성 오류: {0}")]
    PdfGeneration(String),

    #[error(transparent)]
    Common(#[from] mealscan_common::Error),
}

pub type Result<T> = std::result::Result<T, MealScanError>;
