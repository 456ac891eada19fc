use serde::{Deserialize, Serialize};

/// One page of a paginated list endpoint.
///
/// `next` is an opaque pointer to the following page; `None` means the end
/// of the result set has been reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: None,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, next: Option<String>) -> Self {
        Self {
            results,
            next,
            ..Default::default()
        }
    }

    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }

    /// Append the items of `following` and adopt its next pointer
    pub fn merge(&mut self, following: Page<T>) {
        self.results.extend(following.results);
        self.next = following.next;
        if following.count.is_some() {
            self.count = following.count;
        }
    }

    /// Convert every item, keeping the pointers
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }

    /// Insert an item at the head of the list (newest first)
    pub fn prepend(&mut self, item: T) {
        self.results.insert(0, item);
    }

    /// Remove every item matching `pred`, returning how many were removed
    pub fn remove_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.results.len();
        self.results.retain(|item| !pred(item));
        before - self.results.len()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
