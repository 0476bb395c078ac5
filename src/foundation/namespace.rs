//! 네임스페이스 감지
//!
//! `composer.json`의 `autoload.psr-4` 매핑에서 애플리케이션 소스 루트(`app_path`)에
//! 해당하는 논리 네임스페이스를 찾습니다. 일치하는 매핑이 없으면 빈 값 대신
//! `ConfigurationError`를 돌려줍니다.
//!
//! ```json
//! { "autoload": { "psr-4": { "Shop\\": "app/", "Shop\\Tests\\": ["tests/", "features/"] } } }
//! ```

use std::path::{Component, Path, PathBuf};

use serde_json::Value;

use crate::core::errors::{AppError, AppResult, ErrorContext};

/// 매니페스트 바이트에서 `app_path`에 대응하는 네임스페이스를 찾습니다.
pub fn detect_namespace(manifest: &[u8], base_path: &Path, app_path: &Path) -> AppResult<String> {
    let manifest: Value =
        serde_json::from_slice(manifest).config_context("composer.json을 해석할 수 없습니다")?;

    let mappings = manifest
        .pointer("/autoload/psr-4")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            AppError::ConfigurationError("composer.json에 autoload.psr-4 항목이 없습니다".to_string())
        })?;

    let target = normalize(&absolute(base_path, app_path));

    for (namespace, paths) in mappings {
        let matched = candidate_paths(paths)
            .into_iter()
            .any(|path| normalize(&base_path.join(path)) == target);
        if matched {
            log::debug!("Detected namespace [{}] for {}", namespace, app_path.display());
            return Ok(namespace.clone());
        }
    }

    Err(AppError::ConfigurationError(format!(
        "{}에 대응하는 네임스페이스를 찾을 수 없습니다",
        app_path.display()
    )))
}

fn candidate_paths(value: &Value) -> Vec<&str> {
    match value {
        Value::String(path) => vec![path.as_str()],
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

fn absolute(base_path: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_path.join(path)
    }
}

/// 파일 시스템에 접근하지 않고 `.`과 `..`을 정리합니다.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
