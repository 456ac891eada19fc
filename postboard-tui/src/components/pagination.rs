use postboard_types::Page;
use serde::de::DeserializeOwned;

use crate::api::{ApiResult, Backend};

/// A fetch handed out by [`PagedList`], tagged so late answers can be told apart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub seq: u64,
    pub pointer: String,
}

impl PageRequest {
    pub async fn perform<T, B>(&self, backend: &B) -> ApiResult<Page<T>>
    where
        T: DeserializeOwned + Send + 'static,
        B: Backend,
    {
        backend.fetch_page(&self.pointer).await
    }
}

/// Infinite-scroll list backed by the server's `next` pointers.
///
/// At most one fetch is outstanding at a time, and every fetch carries a
/// sequence number: a response whose number is not the latest one handed out
/// is dropped, so a reload can never be overwritten by a slow earlier page.
#[derive(Debug, Clone)]
pub struct PagedList<T> {
    page: Page<T>,
    loaded: bool,
    next_seq: u64,
    in_flight: Option<u64>,
    error: Option<String>,
}

impl<T> Default for PagedList<T> {
    fn default() -> Self {
        Self {
            page: Page::default(),
            loaded: false,
            next_seq: 0,
            in_flight: None,
            error: None,
        }
    }
}

impl<T> PagedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)load from the first page. Supersedes any fetch in flight.
    pub fn start(&mut self, pointer: impl Into<String>) -> PageRequest {
        self.page = Page::default();
        self.loaded = false;
        self.issue(pointer.into())
    }

    /// Request the following page when the end of the list is reached.
    ///
    /// Returns `None` before the first page arrived, after the last page, or
    /// while a fetch is already outstanding.
    pub fn request_next(&mut self) -> Option<PageRequest> {
        if !self.loaded || self.in_flight.is_some() {
            return None;
        }
        let pointer = self.page.next.clone()?;
        Some(self.issue(pointer))
    }

    /// A new fetch replaces whatever error the last one left behind
    fn issue(&mut self, pointer: String) -> PageRequest {
        self.error = None;
        self.next_seq += 1;
        self.in_flight = Some(self.next_seq);
        PageRequest {
            seq: self.next_seq,
            pointer,
        }
    }

    /// Apply a fetch result. Returns `false` when it was stale and ignored.
    pub fn apply(&mut self, seq: u64, result: ApiResult<Page<T>>) -> bool {
        if self.in_flight != Some(seq) {
            log::debug!(
                "Dropping stale page response {} (waiting for {:?})",
                seq,
                self.in_flight
            );
            return false;
        }
        self.in_flight = None;

        if result.is_ok() {
            self.error = None;
        }
        match result {
            Ok(page) if self.loaded => self.page.merge(page),
            Ok(page) => {
                self.page = page;
                self.loaded = true;
            }
            Err(e) => {
                log::warn!("Page fetch failed: {}", e);
                self.error = Some(e.user_message());
                // A failed first page still ends the loading state
                self.loaded = true;
            }
        }
        true
    }

    /// Same as [`apply`](Self::apply) but converts each item on the way in
    pub fn apply_with<U>(
        &mut self,
        seq: u64,
        result: ApiResult<Page<U>>,
        convert: impl FnMut(U) -> T,
    ) -> bool {
        self.apply(seq, result.map(|page| page.map(convert)))
    }

    pub fn items(&self) -> &[T] {
        &self.page.results
    }

    pub fn items_mut(&mut self) -> &mut [T] {
        &mut self.page.results
    }

    pub fn len(&self) -> usize {
        self.page.len()
    }

    pub fn is_empty(&self) -> bool {
        self.page.is_empty()
    }

    pub fn has_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn has_more(&self) -> bool {
        self.page.has_more()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn prepend(&mut self, item: T) {
        self.page.prepend(item);
    }

    pub fn remove_where(&mut self, pred: impl FnMut(&T) -> bool) -> usize {
        self.page.remove_where(pred)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;

    fn page(items: &[u32], next: Option<&str>) -> Page<u32> {
        Page::new(items.to_vec(), next.map(String::from))
    }

    #[test]
    fn test_pages_accumulate_in_order() {
        let mut list = PagedList::new();
        let first = list.start("/posts/");
        assert!(list.request_next().is_none());

        assert!(list.apply(first.seq, Ok(page(&[1, 2], Some("/posts/?page=2")))));
        let second = list.request_next().unwrap();
        assert_eq!(second.pointer, "/posts/?page=2");
        assert!(list.request_next().is_none());

        assert!(list.apply(second.seq, Ok(page(&[3], None))));
        assert_eq!(list.items(), &[1, 2, 3]);
        assert!(!list.has_more());
        assert!(list.request_next().is_none());
    }

    #[test]
    fn test_reload_drops_slow_earlier_response() {
        let mut list = PagedList::new();
        let first = list.start("/posts/");
        list.apply(first.seq, Ok(page(&[1], Some("/posts/?page=2"))));
        let next = list.request_next().unwrap();

        let reload = list.start("/posts/");
        assert!(!list.apply(next.seq, Ok(page(&[99], None))));
        assert!(list.apply(reload.seq, Ok(page(&[5, 6], None))));
        assert_eq!(list.items(), &[5, 6]);
    }

    #[test]
    fn test_failed_fetch_records_error() {
        let mut list: PagedList<u32> = PagedList::new();
        let first = list.start("/posts/");
        list.apply(first.seq, Err(ApiError::Api("Server error (500)".into())));

        assert!(list.has_loaded());
        assert!(list.error().is_some());
        assert!(!list.is_fetching());
    }

    #[test]
    fn test_retry_after_failed_next_page_clears_error() {
        let mut list = PagedList::new();
        let first = list.start("/posts/");
        list.apply(first.seq, Ok(page(&[1], Some("/posts/?page=2"))));

        let second = list.request_next().unwrap();
        list.apply(second.seq, Err(ApiError::Api("down".into())));
        assert!(list.error().is_some());
        assert!(list.has_more());

        let retry = list.request_next().unwrap();
        assert_eq!(retry.pointer, "/posts/?page=2");
        assert!(list.error().is_none());
        list.apply(retry.seq, Ok(page(&[2], None)));

        assert_eq!(list.items(), &[1, 2]);
        assert!(!list.has_more());
        assert_eq!(list.error(), None);
    }

    #[test]
    fn test_prepend_and_remove() {
        let mut list = PagedList::new();
        let first = list.start("/comments/?post=1");
        list.apply(first.seq, Ok(page(&[2, 3], None)));

        list.prepend(1);
        assert_eq!(list.items(), &[1, 2, 3]);
        assert_eq!(list.remove_where(|n| *n == 2), 1);
        assert_eq!(list.items(), &[1, 3]);
    }

    #[test]
    fn test_apply_with_converts_items() {
        let mut list: PagedList<String> = PagedList::new();
        let first = list.start("/x/");
        list.apply_with(first.seq, Ok(page(&[7], None)), |n| n.to_string());
        assert_eq!(list.items(), &["7".to_string()]);
    }
}
