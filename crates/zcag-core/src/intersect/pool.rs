//! 相交测试用的临时坐标缓冲池
//!
//! 缓冲区通过 `ScratchPool::checkout` 借出，`ScratchBuffer` 被 drop 时
//! （包括 panic 展开）自动归还。池的容量有上限，超出部分直接释放。

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};

/// 每个缓冲区可容纳 6 个点
pub const SCRATCH_LEN: usize = 12;

pub type Scratch = [f64; SCRATCH_LEN];

#[derive(Debug)]
pub struct ScratchPool {
    free: Mutex<Vec<Box<Scratch>>>,
    capacity: usize,
}

impl ScratchPool {
    pub const fn new(capacity: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            capacity,
        }
    }

    /// 借出一个缓冲区
    pub fn checkout(&self) -> ScratchBuffer<'_> {
        let recycled = self
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        ScratchBuffer {
            pool: self,
            buffer: Some(recycled.unwrap_or_else(|| Box::new([0.0; SCRATCH_LEN]))),
        }
    }

    /// 当前空闲缓冲区数量
    pub fn available(&self) -> usize {
        self.free.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn release(&self, buffer: Box<Scratch>) {
        let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);
        if free.len() < self.capacity {
            free.push(buffer);
        }
    }
}

/// 借出的缓冲区，作用域结束时归还
#[derive(Debug)]
pub struct ScratchBuffer<'a> {
    pool: &'a ScratchPool,
    buffer: Option<Box<Scratch>>,
}

impl Deref for ScratchBuffer<'_> {
    type Target = Scratch;

    fn deref(&self) -> &Scratch {
        match &self.buffer {
            Some(buffer) => buffer,
            None => unreachable!("scratch buffer used after release"),
        }
    }
}

impl DerefMut for ScratchBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Scratch {
        match &mut self.buffer {
            Some(buffer) => buffer,
            None => unreachable!("scratch buffer used after release"),
        }
    }
}

impl Drop for ScratchBuffer<'_> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.pool.release(buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_returns_on_drop() {
        let pool = ScratchPool::new(4);
        {
            let mut a = pool.checkout();
            let b = pool.checkout();
            a[0] = 1.0;
            assert_eq!(b.len(), SCRATCH_LEN);
        }
        assert_eq!(pool.available(), 2);
        let c = pool.checkout();
        assert_eq!(pool.available(), 1);
        drop(c);
        assert_eq!(pool.available(), 2);
    }

    #[test]
    fn test_capacity_is_bounded() {
        let pool = ScratchPool::new(1);
        {
            let _a = pool.checkout();
            let _b = pool.checkout();
            let _c = pool.checkout();
        }
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn test_returned_on_panic() {
        let pool = ScratchPool::new(4);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _buffer = pool.checkout();
            panic!("boom");
        }));
        assert!(result.is_err());
        assert_eq!(pool.available(), 1);
    }
}
