//! 분석 결과 캐시
//!
//! 사진 바이트의 SHA-256 + 끼니 키를 키로 백엔드 분석 결과를 저장하고,
//! 같은 사진의 재분석을 건너뛴다.

use super::types::SlotAnalysis;
use crate::error::Result;
use mealscan_common::MealSlot;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const CACHE_FILE_NAME: &str = ".mealscan-cache.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheFile {
    /// 버전 (호환성 확인용)
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub file_name: String,
    pub file_size: u64,
    pub result: SlotAnalysis,
}

impl CacheFile {
    const CURRENT_VERSION: u32 = 1;

    pub fn cache_path(folder: &Path) -> PathBuf {
        folder.join(CACHE_FILE_NAME)
    }

    /// 캐시 파일 읽기. 없거나 깨졌거나 버전이 다르면 빈 캐시.
    pub fn load(folder: &Path) -> Self {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Self::default();
        }

        let file = match File::open(&cache_path) {
            Ok(f) => f,
            Err(_) => return Self::default(),
        };

        match serde_json::from_reader::<_, CacheFile>(BufReader::new(file)) {
            Ok(cache) if cache.version == Self::CURRENT_VERSION => cache,
            Ok(cache) => {
                tracing::warn!(found = cache.version, "캐시 버전 불일치, 다시 생성합니다");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "캐시 파일을 읽을 수 없어 다시 생성합니다");
                Self::default()
            }
        }
    }

    pub fn save(&self, folder: &Path) -> Result<()> {
        let file = File::create(Self::cache_path(folder))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// 캐시 삭제. 파일이 없었으면 false.
    pub fn clear(folder: &Path) -> Result<bool> {
        let cache_path = Self::cache_path(folder);
        if cache_path.exists() {
            std::fs::remove_file(cache_path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn get(&self, key: &str) -> Option<&SlotAnalysis> {
        self.entries.get(key).map(|e| &e.result)
    }

    pub fn insert(&mut self, key: String, file_name: String, file_size: u64, result: SlotAnalysis) {
        self.entries.insert(key, CacheEntry {
            file_name,
            file_size,
            result,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CacheFile {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// 캐시 키: `<끼니>:<sha256>`
///
/// 인식 요청에 `when`이 포함되므로 같은 사진이라도 끼니가 다르면 다른 키.
pub fn cache_key(slot: MealSlot, bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{}:{}", slot.key(), hex::encode(digest))
}
