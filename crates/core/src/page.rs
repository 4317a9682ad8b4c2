//! 페이지 봉투: 모든 목록 엔드포인트의 공통 응답 형태
//!
//! ```text
//! {"count": 0, "results": [], "previous": null, "next": null}
//! ```
//!
//! 커서 문자열 형식은 호출자(API 계층)가 결정합니다.

use serde::{Deserialize, Serialize};

use crate::error::ResourceError;

/// 페이지 봉투
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// 전체 컬렉션 크기 (현재 페이지 크기가 아님)
    pub count: usize,
    pub results: Vec<T>,
    pub previous: Option<String>,
    pub next: Option<String>,
}

impl<T> Page<T> {
    /// 빈 봉투
    pub fn empty() -> Self {
        Self {
            count: 0,
            results: Vec::new(),
            previous: None,
            next: None,
        }
    }

    /// 전체 항목에서 한 페이지를 잘라냅니다.
    ///
    /// `page`는 1부터 시작합니다. 빈 컬렉션의 1페이지는 유효하며,
    /// 마지막 페이지를 넘어가면 `NotFound`를 반환합니다.
    pub fn from_items(
        items: Vec<T>,
        page: usize,
        page_size: usize,
        cursor: impl Fn(usize) -> String,
    ) -> Result<Self, ResourceError> {
        if page == 0 {
            return Err(ResourceError::malformed("page numbers start at 1"));
        }
        if page_size == 0 {
            return Err(ResourceError::malformed("page_size must be at least 1"));
        }

        let count = items.len();
        let last_page = count.div_ceil(page_size).max(1);
        if page > last_page {
            return Err(ResourceError::not_found("page", page.to_string()));
        }

        let start = (page - 1) * page_size;
        let results: Vec<T> = items.into_iter().skip(start).take(page_size).collect();

        Ok(Self {
            count,
            results,
            previous: (page > 1).then(|| cursor(page - 1)),
            next: (page < last_page).then(|| cursor(page + 1)),
        })
    }

    /// 결과 항목을 변환합니다 (커서와 개수는 유지).
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            results: self.results.into_iter().map(f).collect(),
            previous: self.previous,
            next: self.next,
        }
    }
}
