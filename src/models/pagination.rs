//! Limit/offset pagination with links to neighbouring pages
use models::QueryParams;

pub const LIMIT_PARAM: &str = "limit";
pub const OFFSET_PARAM: &str = "offset";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: i64,
    pub offset: i64,
}

impl PageRequest {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.max(1),
            offset: offset.max(0),
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Builds a page; links reuse `path` and `params` with shifted offsets
    pub fn new(results: Vec<T>, count: i64, request: PageRequest, path: &str, params: &QueryParams) -> Self {
        let link = |params: QueryParams| {
            let query = params.to_query_string();
            if query.is_empty() {
                path.to_string()
            } else {
                format!("{}?{}", path, query)
            }
        };
        let with_limit = params.with(LIMIT_PARAM, request.limit.to_string());

        let next = match request.offset.checked_add(request.limit) {
            Some(next_offset) if next_offset < count => Some(link(with_limit.with(OFFSET_PARAM, next_offset.to_string()))),
            _ => None,
        };

        let previous = if request.offset <= 0 {
            None
        } else if request.offset - request.limit <= 0 {
            let mut first = with_limit.clone();
            first.remove(OFFSET_PARAM);
            Some(link(first))
        } else {
            Some(link(with_limit.with(OFFSET_PARAM, (request.offset - request.limit).to_string())))
        };

        Self {
            count,
            next,
            previous,
            results,
        }
    }

    pub fn try_map<U, E, F>(self, f: F) -> Result<Page<U>, E>
    where
        F: FnMut(T) -> Result<U, E>,
    {
        Ok(Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect::<Result<Vec<U>, E>>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_links_only_forward() {
        let params = QueryParams::parse("cat=CAR");
        let page = Page::new(vec![1, 2, 3, 4, 5], 12, PageRequest::new(5, 0), "/api/search/", &params);
        assert_eq!(page.next, Some("/api/search/?cat=CAR&limit=5&offset=5".to_string()));
        assert_eq!(page.previous, None);
    }

    #[test]
    fn middle_and_last_pages() {
        let params = QueryParams::parse("limit=5&offset=5");
        let page = Page::new(vec![6, 7, 8, 9, 10], 12, PageRequest::new(5, 5), "/api/posts/", &params);
        assert_eq!(page.next, Some("/api/posts/?limit=5&offset=10".to_string()));
        assert_eq!(page.previous, Some("/api/posts/?limit=5".to_string()));

        let params = QueryParams::parse("limit=5&offset=10");
        let page = Page::new(vec![11, 12], 12, PageRequest::new(5, 10), "/api/posts/", &params);
        assert_eq!(page.next, None);
        assert_eq!(page.previous, Some("/api/posts/?limit=5&offset=5".to_string()));
    }

    #[test]
    fn offset_at_the_end_of_range_has_no_next_page() {
        let params = QueryParams::parse("offset=9223372036854775807");
        let page: Page<i32> = Page::new(vec![], 3, PageRequest::new(5, i64::max_value()), "/api/search/", &params);
        assert_eq!(page.next, None);
        assert_eq!(
            page.previous,
            Some(format!("/api/search/?limit=5&offset={}", i64::max_value() - 5))
        );
    }

    #[test]
    fn request_is_normalized() {
        assert_eq!(PageRequest::new(0, -3), PageRequest { limit: 1, offset: 0 });
    }
}
