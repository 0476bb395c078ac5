//! 파일 접근 협력자
//!
//! 부트스트랩 코드가 설정 파일을 읽을 때만 사용하는 좁은 인터페이스입니다.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub trait FileSource: Send + Sync {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

pub type SharedFileSource = Arc<dyn FileSource>;

/// 로컬 파일 시스템
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

impl FileSource for LocalFiles {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}

/// 메모리 내 파일 집합
#[derive(Debug, Clone, Default)]
pub struct MemoryFiles {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }
}

impl FileSource for MemoryFiles {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_files() {
        let files = MemoryFiles::new().with_file("/srv/composer.json", "{}");

        assert_eq!(files.read(Path::new("/srv/composer.json")).unwrap(), b"{}".to_vec());
        assert_eq!(
            files.read(Path::new("/srv/missing.json")).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn test_local_files_missing_path() {
        let result = LocalFiles.read(Path::new("/definitely/not/here/composer.json"));
        assert!(result.is_err());
    }
}
