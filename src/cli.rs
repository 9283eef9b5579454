use clap::{Args, Parser, Subcommand};
use mealscan_common::MealSlot;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mealscan")]
#[command(about = "한끼스캔: 식사 사진 AI 영양 분석 및 리포트 생성 도구", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 상세 로그 출력
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// 분석 명령 공통 옵션
#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// 결과 JSON 파일 (기본: mymeal_result.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// PDF 리포트도 생성
    #[arg(long)]
    pub pdf: Option<PathBuf>,

    /// AI 솔루션 요청 생략 (기본 안내 사용)
    #[arg(long)]
    pub no_advice: bool,

    /// 캐시 사용 (같은 사진 재분석 생략)
    #[arg(long)]
    pub use_cache: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 한 끼 분석
    One {
        /// 식사 사진
        #[arg(required = true)]
        image: PathBuf,

        /// 끼니 (morning/lunch/dinner, 아침/점심/저녁)
        #[arg(short, long, required = true)]
        when: MealSlot,

        #[command(flatten)]
        options: AnalyzeOptions,
    },

    /// 하루 세 끼 분석 (최소 한 끼)
    Three {
        /// 아침 사진
        #[arg(long, alias = "breakfast")]
        morning: Option<PathBuf>,

        /// 점심 사진
        #[arg(long)]
        lunch: Option<PathBuf>,

        /// 저녁 사진
        #[arg(long)]
        dinner: Option<PathBuf>,

        #[command(flatten)]
        options: AnalyzeOptions,
    },

    /// 결과 JSON에서 PDF 생성
    Export {
        /// 결과 JSON 파일
        #[arg(required = true)]
        input: PathBuf,

        /// 출력 파일/디렉터리
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 리포트 제목 (기본: 설정값)
        #[arg(short, long)]
        title: Option<String>,
    },

    /// 결과 JSON의 영양 정보 텍스트 출력
    Text {
        #[arg(required = true)]
        input: PathBuf,
    },

    /// 설정 표시/변경
    Config {
        /// 백엔드 API 주소
        #[arg(long)]
        set_api_url: Option<String>,

        /// PDF용 한글 TTF 폰트
        #[arg(long)]
        set_font: Option<PathBuf>,

        /// 설정 표시
        #[arg(long)]
        show: bool,
    },

    /// 캐시 관리
    Cache {
        /// 캐시 삭제
        #[arg(long)]
        clear: bool,

        /// 대상 폴더 (생략 시 현재 폴더)
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// 캐시 정보 표시
        #[arg(long)]
        info: bool,
    },
}

impl Commands {
    /// `three` 명령의 사진을 끼니 순서대로
    pub fn meal_images(
        morning: Option<PathBuf>,
        lunch: Option<PathBuf>,
        dinner: Option<PathBuf>,
    ) -> Vec<(MealSlot, PathBuf)> {
        MealSlot::ALL
            .into_iter()
            .zip([morning, lunch, dinner])
            .filter_map(|(slot, path)| path.map(|p| (slot, p)))
            .collect()
    }
}
