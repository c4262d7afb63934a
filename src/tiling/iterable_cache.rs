use std::cell::RefCell;

struct CacheState<T, I> {
    buffer: Vec<T>,
    source: I,
    exhausted: bool,
}

/// 지연 생성되는 수열을 한 번만 계산하고 여러 커서가 다시 읽게 하는 캐시
///
/// 버퍼는 덧붙이기만 한다. 어떤 커서가 버퍼 끝을 넘어 읽을 때만 원본을 한 칸
/// 진행한다. 스레드 사이에 공유하지 않는다.
pub struct IterableCache<T, I> {
    state: RefCell<CacheState<T, I>>,
}

impl<T: Clone, I: Iterator<Item = T>> IterableCache<T, I> {
    pub fn new(source: I) -> Self {
        IterableCache {
            state: RefCell::new(CacheState {
                buffer: Vec::new(),
                source,
                exhausted: false,
            }),
        }
    }

    /// `index` 번째 원소. 필요하면 원본을 그만큼 진행한다
    pub fn get(&self, index: usize) -> Option<T> {
        let mut state = self.state.borrow_mut();
        while state.buffer.len() <= index {
            if state.exhausted {
                return None;
            }
            match state.source.next() {
                Some(item) => state.buffer.push(item),
                None => {
                    state.exhausted = true;
                    return None;
                }
            }
        }
        state.buffer.get(index).cloned()
    }

    /// 지금까지 계산된 원소 수
    pub fn materialized_len(&self) -> usize {
        self.state.borrow().buffer.len()
    }

    /// 원본이 끝났는지
    pub fn is_exhausted(&self) -> bool {
        self.state.borrow().exhausted
    }

    /// 원본 수열을 들여다본다. 원본이 따로 모은 상태를 읽을 때 쓴다
    pub fn inspect_source<R>(&self, f: impl FnOnce(&I) -> R) -> R {
        f(&self.state.borrow().source)
    }

    /// 처음부터 읽는 새 커서
    pub fn iter(&self) -> Cursor<'_, T, I> {
        Cursor {
            cache: self,
            position: 0,
        }
    }
}

/// [`IterableCache`] 의 독립적인 읽기 위치
pub struct Cursor<'a, T, I> {
    cache: &'a IterableCache<T, I>,
    position: usize,
}

impl<T: Clone, I: Iterator<Item = T>> Iterator for Cursor<'_, T, I> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let item = self.cache.get(self.position)?;
        self.position += 1;
        Some(item)
    }
}

impl<'a, T: Clone, I: Iterator<Item = T>> IntoIterator for &'a IterableCache<T, I> {
    type Item = T;
    type IntoIter = Cursor<'a, T, I>;

    fn into_iter(self) -> Cursor<'a, T, I> {
        self.iter()
    }
}
