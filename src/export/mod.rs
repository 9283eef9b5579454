pub mod pdf;

use crate::analyzer::AnalysisReport;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// 출력 경로가 디렉터리이거나 확장자가 없으면 `<dir>/<title>.pdf`
pub fn output_path_for_pdf(output: &Path, title: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.pdf", sanitize_file_name(title)))
    } else {
        output.to_path_buf()
    }
}

fn sanitize_file_name(title: &str) -> String {
    let name: String = title
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') { '_' } else { c })
        .collect();
    if name.trim().is_empty() {
        "mymeal_result".to_string()
    } else {
        name
    }
}

pub fn save_report(report: &AnalysisReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_report(path: &Path) -> Result<AnalysisReport> {
    if !path.exists() {
        return Err(crate::error::MealScanError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
