//! 목록 페이지네이션
//!
//! `?page=N` (1부터, 기본 1)과 `?page_size=M` (최대값으로 잘림)을 해석하고
//! `previous`/`next` 커서를 요청 경로 기준으로 만듭니다.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use testrack_core::config::ServerConfig;
use testrack_core::error::ResourceError;
use testrack_core::page::Page;

use crate::error::ApiError;
use crate::state::AppState;

/// 페이지 크기 설정
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageConfig {
    pub default_size: usize,
    pub max_size: usize,
}

impl PageConfig {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            default_size: config.page_size,
            max_size: config.max_page_size,
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::from_config(&ServerConfig::default())
    }
}

#[derive(Debug, Default, Deserialize)]
struct PageQuery {
    page: Option<usize>,
    page_size: Option<usize>,
}

/// 목록 요청의 페이지 선택
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paging {
    page: usize,
    page_size: usize,
    /// 클라이언트가 `page_size`를 지정했으면 커서에도 유지
    explicit_size: bool,
    path: String,
}

impl Paging {
    pub fn new(path: impl Into<String>, page: usize, page_size: usize) -> Self {
        Self {
            page,
            page_size,
            explicit_size: false,
            path: path.into(),
        }
    }

    fn from_query(path: &str, query: PageQuery, config: PageConfig) -> Self {
        let page_size = query
            .page_size
            .map(|size| size.min(config.max_size))
            .unwrap_or(config.default_size);
        Self {
            page: query.page.unwrap_or(1),
            page_size,
            explicit_size: query.page_size.is_some(),
            path: path.to_owned(),
        }
    }

    fn cursor(&self, page: usize) -> String {
        if self.explicit_size {
            format!("{}?page={page}&page_size={}", self.path, self.page_size)
        } else {
            format!("{}?page={page}", self.path)
        }
    }

    /// 전체 항목을 한 페이지 봉투로 자릅니다.
    pub fn paginate<T>(&self, items: Vec<T>) -> Result<Page<T>, ApiError> {
        Ok(Page::from_items(items, self.page, self.page_size, |n| {
            self.cursor(n)
        })?)
    }
}

impl FromRequestParts<AppState> for Paging {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PageQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ResourceError::malformed(rejection.body_text()))?;
        Ok(Self::from_query(parts.uri.path(), query, state.paging))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: PageConfig = PageConfig {
        default_size: 2,
        max_size: 3,
    };

    fn query(page: Option<usize>, page_size: Option<usize>) -> PageQuery {
        PageQuery { page, page_size }
    }

    #[test]
    fn defaults_to_first_page_and_configured_size() {
        let paging = Paging::from_query("/jobs/", PageQuery::default(), CONFIG);
        assert_eq!(paging, Paging::new("/jobs/", 1, 2));
    }

    #[test]
    fn page_size_is_capped() {
        let paging = Paging::from_query("/jobs/", query(None, Some(100)), CONFIG);
        assert_eq!(paging.page_size, 3);
    }

    #[test]
    fn cursors_point_at_request_path() {
        let paging = Paging::from_query("/linuxdistros/", query(Some(2), None), CONFIG);
        let page = paging.paginate(vec![1, 2, 3, 4, 5]).unwrap();
        assert_eq!(page.results, vec![3, 4]);
        assert_eq!(page.previous.as_deref(), Some("/linuxdistros/?page=1"));
        assert_eq!(page.next.as_deref(), Some("/linuxdistros/?page=3"));
    }

    #[test]
    fn explicit_size_is_kept_in_cursors() {
        let paging = Paging::from_query("/jobs/", query(Some(1), Some(1)), CONFIG);
        let page = paging.paginate(vec!["a", "b"]).unwrap();
        assert_eq!(page.next.as_deref(), Some("/jobs/?page=2&page_size=1"));
    }

    #[test]
    fn page_beyond_end_is_not_found() {
        let paging = Paging::from_query("/jobs/", query(Some(5), None), CONFIG);
        let err = paging.paginate(vec![1]).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Resource(ResourceError::NotFound { .. })
        ));
    }
}
