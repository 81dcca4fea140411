use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A named ordering function `(T, T) -> i32`; only the sign of the result matters.
pub struct Comparator<T> {
    name: String,
    compare: Arc<dyn Fn(&T, &T) -> i32 + Send + Sync>,
}

impl<T> Comparator<T> {
    pub fn new<F>(name: impl Into<String>, compare: F) -> Self
    where
        F: Fn(&T, &T) -> i32 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            compare: Arc::new(compare),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn compare(&self, left: &T, right: &T) -> Ordering {
        (self.compare)(left, right).cmp(&0)
    }

    /// 反轉比較結果的正負號，排序本身仍然是 stable 的
    pub fn reversed(&self) -> Self
    where
        T: 'static,
    {
        let inner = Arc::clone(&self.compare);
        Self {
            name: format!("reversed({})", self.name),
            // 不直接取負號，避免 i32::MIN 溢位
            compare: Arc::new(move |left, right| inner(right, left)),
        }
    }
}

impl<T> Clone for Comparator<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            compare: Arc::clone(&self.compare),
        }
    }
}

impl<T> fmt::Debug for Comparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparator").field("name", &self.name).finish()
    }
}
