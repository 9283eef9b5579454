use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mealscan::{analyzer, api, cli, config, error, export, scanner};
use mealscan_common::{build, nutrition_text, Advice, MealSlot, UploadMode, UploadPayload};
use cli::{AnalyzeOptions, Cli, Commands};
use config::Config;
use error::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_OUTPUT: &str = "mymeal_result.json";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::One { image, when, options } => {
            println!("🍽️  mealscan - 한 끼 분석\n");
            run_analysis(&config, UploadMode::SingleMeal, vec![(when, image)], options).await?;
        }

        Commands::Three { morning, lunch, dinner, options } => {
            println!("🍽️  mealscan - 하루 세 끼 분석\n");
            let images = Commands::meal_images(morning, lunch, dinner);
            if images.is_empty() {
                return Err(error::MealScanError::NoMealImages);
            }
            run_analysis(&config, UploadMode::ThreeMeals, images, options).await?;
        }

        Commands::Export { input, output, title } => {
            println!("📄 mealscan - PDF 생성\n");
            let report = export::load_report(&input)?;
            let title = title.unwrap_or_else(|| config.report_title.clone());
            let output = output.unwrap_or_else(|| input.with_extension("pdf"));
            let pdf_path = export::output_path_for_pdf(&output, &title);
            write_pdf(&config, &report, &pdf_path, title)?;
            println!("\n✅ 생성 완료");
        }

        Commands::Text { input } => {
            let report = export::load_report(&input)?;
            println!("{}", nutrition_text(&report.view_model));
        }

        Commands::Config { set_api_url, set_font, show } => {
            let mut config = config;

            if let Some(url) = set_api_url {
                config.set_api_base_url(url)?;
                println!("✔ API 주소를 설정했습니다");
            }

            if let Some(font) = set_font {
                config.set_font_path(font)?;
                println!("✔ PDF 폰트를 설정했습니다");
            }

            if show {
                println!("설정:");
                println!("  API 주소: {}", config.api_base_url());
                println!("  타임아웃: {}초", config.timeout_seconds);
                println!("  최대 이미지 크기: {}px", config.max_image_size);
                println!(
                    "  PDF 폰트: {}",
                    config
                        .font_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "미설정 (영문 라벨)".to_string())
                );
                println!("  리포트 제목: {}", config.report_title);
            }
        }

        Commands::Cache { clear, folder, info } => {
            let target = folder.unwrap_or_else(|| PathBuf::from("."));
            let cache_path = analyzer::CacheFile::cache_path(&target);

            if info || !clear {
                if cache_path.exists() {
                    let cache = analyzer::CacheFile::load(&target);
                    println!("캐시 정보:");
                    println!("  경로: {}", cache_path.display());
                    println!("  항목 수: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  크기: {} bytes", meta.len());
                    }
                } else {
                    println!("캐시 파일이 없습니다: {}", cache_path.display());
                }
            }

            if clear {
                match analyzer::CacheFile::clear(&target) {
                    Ok(true) => println!("✔ 캐시를 삭제했습니다: {}", cache_path.display()),
                    Ok(false) => println!("캐시 파일이 없습니다"),
                    Err(e) => println!("캐시 삭제 오류: {}", e),
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "mealscan=debug" } else { "mealscan=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// 사진 읽기 → 끼니별 분석 → 결과 화면 구성 → AI 솔루션 → 저장
async fn run_analysis(
    config: &Config,
    mode: UploadMode,
    paths: Vec<(MealSlot, PathBuf)>,
    options: AnalyzeOptions,
) -> Result<()> {
    // 1. 사진 읽기
    println!("[1/4] 사진을 읽는 중...");
    let mut images = Vec::with_capacity(paths.len());
    for (slot, path) in &paths {
        let image = scanner::load_meal_image(path, config.max_image_size)?;
        tracing::debug!(slot = slot.key(), width = image.width, height = image.height, "image loaded");
        images.push((*slot, image));
    }
    println!("✔ {}장의 사진\n", images.len());

    // 2. AI 분석
    let backend = api::HttpBackend::from_config(config)?;
    let cache_folder = cache_folder_for(&paths);
    let mut cache = options.use_cache.then(|| analyzer::CacheFile::load(&cache_folder));

    println!(
        "[2/4] AI 분석 중... ({}){}",
        backend.base_url(),
        if options.use_cache { " (캐시 사용)" } else { "" }
    );
    let spinner = spinner("음식 인식 → 레시피 → 영양 요약");

    let payload = match mode {
        UploadMode::SingleMeal => {
            let (slot, image) = &images[0];
            analyzer::analyze_single_meal(&backend, *slot, image, cache.as_mut())
                .await
                .map(UploadPayload::SingleMeal)
        }
        UploadMode::ThreeMeals => analyzer::analyze_three_meals(&backend, &images, cache.as_mut())
            .await
            .map(UploadPayload::ThreeMeals),
    };
    spinner.finish_and_clear();

    let payload = match payload {
        Ok(payload) => payload,
        Err(e) => {
            println!("❌ AI 분석 중 오류가 발생했습니다");
            return Err(e);
        }
    };

    if let Some(cache) = &cache {
        if let Err(e) = cache.save(&cache_folder) {
            tracing::warn!(error = %e, "캐시 저장 실패");
        }
    }
    println!("✔ 분석 완료\n");

    // 3. 결과 화면 구성
    println!("[3/4] 결과 정리 중...");
    let view_model = build(&payload);
    println!("{}\n", nutrition_text(&view_model));

    // 4. AI 솔루션
    let advice = if options.no_advice {
        Advice::fallback(&view_model.summary, None)
    } else {
        println!("[4/4] AI 솔루션 요청 중...");
        let spinner = self::spinner("솔루션 생성 중");
        let advice = analyzer::fetch_advice(&backend, &view_model).await;
        spinner.finish_and_clear();
        advice
    };
    println!("💡 {}", advice.text);
    if let Some(note) = &advice.error {
        println!("⚠ {}", note);
    }

    let report = analyzer::AnalysisReport::new(view_model, advice);
    let output = options.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    export::save_report(&report, &output)?;
    println!("\n✔ 결과 저장: {}", output.display());

    if let Some(pdf) = options.pdf {
        let pdf_path = export::output_path_for_pdf(&pdf, &config.report_title);
        write_pdf(config, &report, &pdf_path, config.report_title.clone())?;
    }

    println!("\n✅ 완료");
    Ok(())
}

fn write_pdf(config: &Config, report: &analyzer::AnalysisReport, path: &Path, title: String) -> Result<()> {
    if config.font_path.is_none() {
        println!("- 한글 폰트 미설정: 영문 라벨로 출력합니다 (mealscan config --set-font)");
    }
    let options = export::pdf::PdfOptions {
        title,
        font_path: config.font_path.clone(),
    };
    export::pdf::generate_pdf(report, path, &options)?;
    println!("✔ PDF 저장: {}", path.display());
    Ok(())
}

/// 캐시는 첫 번째 사진의 폴더에 둔다
fn cache_folder_for(paths: &[(MealSlot, PathBuf)]) -> PathBuf {
    paths
        .first()
        .and_then(|(_, p)| p.parent())
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
