use async_trait::async_trait;

use crate::domain::Page;
use crate::errors::NewsResult;

/// Loaded pages plus the position the consumer last looked at.
#[derive(Debug, Clone, Default)]
pub struct PagingState {
    pub pages: Vec<Page>,
    pub anchor_position: Option<usize>,
}

impl PagingState {
    /// Page containing `position`, or the last page when it lies past the end.
    pub fn closest_page_to_position(&self, position: usize) -> Option<&Page> {
        let mut start = 0;
        for page in &self.pages {
            let end = start + page.articles.len();
            if position < end {
                return Some(page);
            }
            start = end;
        }
        self.pages.last()
    }
}

/// One generation of a paged feed. A fresh instance is created for every
/// reload, so implementations may keep per-generation counters.
#[async_trait]
pub trait PagingSource: Send + Sync {
    /// Load the page identified by `key`; `None` means the first page.
    async fn load(&self, key: Option<u32>) -> NewsResult<Page>;

    /// Key to restart from so that the anchored item stays in view.
    fn refresh_key(&self, state: &PagingState) -> Option<u32> {
        let anchor = state.anchor_position?;
        let page = state.closest_page_to_position(anchor)?;
        page.prev_key
            .map(|key| key + 1)
            .or_else(|| page.next_key.map(|key| key - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Article;

    struct NoopSource;

    #[async_trait]
    impl PagingSource for NoopSource {
        async fn load(&self, _key: Option<u32>) -> NewsResult<Page> {
            Ok(Page::default())
        }
    }

    fn page(size: usize, prev_key: Option<u32>, next_key: Option<u32>) -> Page {
        Page {
            articles: (0..size)
                .map(|i| Article::new(format!("u{}", i), format!("t{}", i)))
                .collect(),
            prev_key,
            next_key,
        }
    }

    #[test]
    fn test_closest_page_to_position() {
        let state = PagingState {
            pages: vec![page(2, None, Some(2)), page(3, None, Some(3))],
            anchor_position: None,
        };

        assert_eq!(state.closest_page_to_position(1).unwrap().next_key, Some(2));
        assert_eq!(state.closest_page_to_position(2).unwrap().next_key, Some(3));
        assert_eq!(state.closest_page_to_position(99).unwrap().next_key, Some(3));
        assert!(PagingState::default().closest_page_to_position(0).is_none());
    }

    #[test]
    fn test_refresh_key_prefers_prev_key() {
        let state = PagingState {
            pages: vec![page(2, Some(4), Some(6))],
            anchor_position: Some(0),
        };
        assert_eq!(NoopSource.refresh_key(&state), Some(5));
    }

    #[test]
    fn test_refresh_key_falls_back_to_next_key() {
        let state = PagingState {
            pages: vec![page(10, None, Some(2)), page(10, None, Some(3))],
            anchor_position: Some(15),
        };
        assert_eq!(NoopSource.refresh_key(&state), Some(2));
    }

    #[test]
    fn test_refresh_key_without_keys_or_anchor() {
        let exhausted = PagingState {
            pages: vec![page(5, None, None)],
            anchor_position: Some(3),
        };
        assert_eq!(NoopSource.refresh_key(&exhausted), None);

        let unanchored = PagingState {
            pages: vec![page(5, None, Some(2))],
            anchor_position: None,
        };
        assert_eq!(NoopSource.refresh_key(&unanchored), None);
    }
}
