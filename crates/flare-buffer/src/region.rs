use alloc::{boxed::Box, format, vec::Vec};
use bytes::Bytes;
use flare_core::{CoreError, ReadableBuffer, StorageHandle, error::codes};

/// `RegionBuffer` 是以 `bytes::Bytes` 为底座的只读缓冲实现。
///
/// # 设计初衷（Why）
/// - 流水线需要一个既能表达"可读区域恰好覆盖整个存储"（零拷贝移交的前提），
///   又能表达"区域带偏移或尾部空闲"（必须防御性复制）的缓冲形态；
/// - `Bytes` 的引用计数保证：存储被任何视图持有期间既不会回收也不会改写，
///   共享移交不会产生悬垂或竞争。
///
/// # 结构设计（How）
/// - `storage` 覆盖全部容量；可读区域为 `[read, limit)`；
/// - `split_to` 通过 `Bytes::slice` 拆出引用计数前缀，新缓冲自身为全窗口
///   （偏移为零、可读长度等于容量），下游可继续零拷贝消费；
/// - `backing_storage` 返回存储的共享句柄与当前读偏移，供提取阶段做移交判定。
///
/// # 契约说明（What）
/// - **不变量**：`read <= limit <= storage.len()` 恒成立；
/// - 越界的拆分、推进与复制统一返回 [`codes::BUFFER_OUT_OF_RANGE`]；
/// - `peek_into_slice` 继承默认实现：本类型的 `chunk` 即完整可读区域。
///
/// # 风险提示（Trade-offs）
/// - 不做池化与复用：缓冲生命周期完全交给引用计数，换取共享视图的安全性；
///   高频小分配场景应由上游批量切片摊薄成本。
#[derive(Clone, Debug)]
pub struct RegionBuffer {
    storage: Bytes,
    read: usize,
    limit: usize,
}

impl RegionBuffer {
    /// 构造全窗口缓冲：可读区域即整个存储。
    pub fn from_bytes(storage: Bytes) -> Self {
        let limit = storage.len();
        Self {
            storage,
            read: 0,
            limit,
        }
    }

    /// 从拥有所有权的字节向量构造全窗口缓冲。
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self::from_bytes(Bytes::from(bytes))
    }

    /// 构造带显式可读区域的缓冲，用于复现偏移或尾部空闲场景。
    ///
    /// # 契约说明
    /// - 要求 `read <= limit <= storage.len()`，否则返回
    ///   [`codes::BUFFER_OUT_OF_RANGE`]。
    pub fn with_region(storage: Bytes, read: usize, limit: usize) -> Result<Self, CoreError> {
        if read > limit || limit > storage.len() {
            return Err(CoreError::new(
                codes::BUFFER_OUT_OF_RANGE,
                format!(
                    "readable region [{}, {}) exceeds storage of {} bytes",
                    read,
                    limit,
                    storage.len()
                ),
            ));
        }
        Ok(Self {
            storage,
            read,
            limit,
        })
    }

    fn check_remaining(&self, len: usize, op: &'static str) -> Result<(), CoreError> {
        if len > self.remaining() {
            return Err(CoreError::new(
                codes::BUFFER_OUT_OF_RANGE,
                format!(
                    "{} of {} bytes exceeds remaining {}",
                    op,
                    len,
                    self.remaining()
                ),
            ));
        }
        Ok(())
    }
}

impl ReadableBuffer for RegionBuffer {
    fn capacity(&self) -> usize {
        self.storage.len()
    }

    fn remaining(&self) -> usize {
        self.limit - self.read
    }

    fn chunk(&self) -> &[u8] {
        &self.storage[self.read..self.limit]
    }

    fn split_to(&mut self, len: usize) -> Result<Box<dyn ReadableBuffer>, CoreError> {
        self.check_remaining(len, "split_to")?;
        let end = self.read + len;
        // 前缀以引用计数切片拆出，自身为全窗口，保持零拷贝资格。
        let prefix = Self::from_bytes(self.storage.slice(self.read..end));
        self.read = end;
        Ok(Box::new(prefix))
    }

    fn advance(&mut self, len: usize) -> Result<(), CoreError> {
        self.check_remaining(len, "advance")?;
        self.read += len;
        Ok(())
    }

    fn copy_into_slice(&mut self, dst: &mut [u8]) -> Result<(), CoreError> {
        self.check_remaining(dst.len(), "copy_into_slice")?;
        let end = self.read + dst.len();
        dst.copy_from_slice(&self.storage[self.read..end]);
        self.read = end;
        Ok(())
    }

    fn backing_storage(&self) -> Option<StorageHandle> {
        Some(StorageHandle::new(self.storage.clone(), self.read))
    }

    fn try_into_vec(self: Box<Self>) -> Result<Vec<u8>, CoreError> {
        Ok(self.chunk().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_window_reports_whole_storage() {
        let buf = RegionBuffer::from_vec(alloc::vec![1, 2, 3, 4, 5]);
        assert_eq!(buf.capacity(), 5);
        assert_eq!(buf.remaining(), 5);
        let handle = buf.backing_storage().expect("bytes storage is addressable");
        assert_eq!(handle.read_offset(), 0);
        assert_eq!(handle.storage().len(), buf.capacity());
    }

    #[test]
    fn with_region_rejects_out_of_bounds_window() {
        let storage = Bytes::from_static(&[0u8; 4]);
        let err = RegionBuffer::with_region(storage, 2, 6).expect_err("limit beyond storage");
        assert_eq!(err.code(), codes::BUFFER_OUT_OF_RANGE);
    }

    #[test]
    fn split_prefix_is_full_window_and_shares_storage() {
        let mut buf = RegionBuffer::from_vec(alloc::vec![1, 2, 3, 4]);
        let base_ptr = buf.chunk().as_ptr();

        let prefix = buf.split_to(2).expect("split within remaining");
        // 前缀与母体共享存储，且自身即全窗口。
        assert_eq!(prefix.chunk().as_ptr(), base_ptr);
        assert_eq!(prefix.remaining(), prefix.capacity());
        assert_eq!(prefix.chunk(), &[1, 2]);
        assert_eq!(buf.chunk(), &[3, 4]);
    }

    #[test]
    fn advance_moves_read_offset_into_handle() {
        let mut buf = RegionBuffer::from_vec(alloc::vec![9, 8, 7]);
        buf.advance(1).expect("advance within remaining");
        let handle = buf.backing_storage().expect("addressable");
        assert_eq!(handle.read_offset(), 1);
        assert_eq!(buf.chunk(), &[8, 7]);
    }
}
