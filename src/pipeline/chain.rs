//! 미들웨어 체인
//!
//! 순서가 있는 미들웨어 식별자 목록입니다. 같은 식별자가 다시 추가되면 버리고
//! 처음 위치를 유지하므로, 두 곳에서 등록된 미들웨어도 한 번만 실행됩니다.

use crate::utils::string_utils::clean_optional_string;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MiddlewareChain {
    entries: Vec<String>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// 식별자를 추가합니다. 이미 있거나 비어 있으면 `false`를 돌려줍니다.
    pub fn push(&mut self, identifier: &str) -> bool {
        let Some(identifier) = clean_optional_string(Some(identifier.to_string())) else {
            return false;
        };
        if self.contains(&identifier) {
            log::debug!("Dropping duplicate middleware [{}]", identifier);
            return false;
        }
        self.entries.push(identifier);
        true
    }

    pub fn extend<I, S>(&mut self, identifiers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for identifier in identifiers {
            self.push(identifier.as_ref());
        }
    }

    /// 두 체인을 이어 붙인 새 체인 (중복 제거 규칙 동일)
    pub fn merged(&self, other: &MiddlewareChain) -> MiddlewareChain {
        let mut merged = self.clone();
        merged.extend(other.iter());
        merged
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.iter().any(|entry| entry == identifier)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for MiddlewareChain {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut chain = MiddlewareChain::new();
        chain.extend(iter);
        chain
    }
}

impl IntoIterator for MiddlewareChain {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
