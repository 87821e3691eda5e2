use crate::{CoreError, error::codes, sealed::Sealed};
use alloc::{boxed::Box, vec::Vec};
use bytes::Bytes;
use core::fmt;

/// `StorageHandle` 描述一块可直接寻址的底层存储。
///
/// # 设计背景（Why）
/// - 零拷贝复用要求调用方同时知道"底层存储"与"可读区域在其中的起点"，
///   两者缺一都无法安全判定是否可以直接移交存储；
/// - 传统接口把 `hasArray`、`arrayOffset`、`array` 拆成三个调用，偏移量仅在
///   前者为真时有效，契约靠约定维持。这里将三者合并为一个可选结构，
///   "偏移量仅在可寻址时存在"由类型系统保证。
///
/// # 契约说明（What）
/// - `storage` 必须覆盖缓冲的**全部容量**，而非仅可读区域；
/// - `read_offset` 为可读区域在 `storage` 中的起始下标；
/// - 句柄内部为引用计数视图，克隆即共享，不触发复制。
///
/// # 风险提示（Trade-offs）
/// - 持有句柄会延长底层存储的生命周期；若上游存在缓冲复用策略，
///   应在归还前确认所有句柄均已释放。
pub struct StorageHandle {
    storage: Bytes,
    read_offset: usize,
}

impl StorageHandle {
    /// 构造新的存储句柄。调用方需保证 `storage` 覆盖全部容量。
    pub fn new(storage: Bytes, read_offset: usize) -> Self {
        Self {
            storage,
            read_offset,
        }
    }

    /// 底层存储的共享视图。
    pub fn storage(&self) -> &Bytes {
        &self.storage
    }

    /// 可读区域在底层存储中的起始偏移。
    pub fn read_offset(&self) -> usize {
        self.read_offset
    }

    /// 消耗句柄并取出底层存储。
    pub fn into_storage(self) -> Bytes {
        self.storage
    }
}

impl fmt::Debug for StorageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 刻意不打印内容，避免日志泄漏载荷。
        f.debug_struct("StorageHandle")
            .field("len", &self.storage.len())
            .field("read_offset", &self.read_offset)
            .finish()
    }
}

/// `ReadableBuffer` 定义对象安全的只读缓冲契约。
///
/// # 设计背景（Why）
/// - **对标实践**：综合 Tokio `bytes::Buf`、Netty `ByteBuf`、Akka `ByteString` 的读取语义，
///   抽象出流水线各阶段通用的只读视图。
/// - **框架定位**：分帧、字节提取与业务层都需要统一的读取入口，避免在热路径中
///   反复做类型转换或复制。
/// - **零拷贝判定**：字节提取阶段需要在"直接移交存储"与"防御性复制"之间做决策，
///   因此契约额外暴露 `capacity` 与 `backing_storage` 两项能力。
///
/// # 逻辑解析（How）
/// - 按照"观察-拆分-推进"三段式设计：`chunk` 暴露当前可读块，`split_to` 拆出前缀，
///   `advance` 推进读指针；
/// - `peek_into_slice` 提供**不推进读指针**的绝对复制路径，保证观察式消费不改变缓冲状态；
/// - `backing_storage` 默认返回 `None`，即"存储不可直接寻址"；只有实现确认
///   底层为连续、可共享的存储时才应返回句柄。
///
/// # 契约说明（What）
/// - `split_to(len)`/`advance(len)` 要求 `len <= remaining()`，越界返回
///   [`codes::BUFFER_OUT_OF_RANGE`]；
/// - `capacity()` 返回底层存储总大小，与可读区域长度无关；
/// - `backing_storage()` 返回 `Some` 时，句柄的 `storage` 长度必须等于 `capacity()`，
///   `read_offset` 指向可读区域起点；
/// - 所有推进或拆分操作结束后，`remaining()` 必须准确反映剩余字节数。
///
/// # 设计考量（Trade-offs & Gotchas）
/// - **对象安全权衡**：放弃泛型化零成本抽象，换取 Handler 链的动态调度能力；
/// - **默认实现**：`peek_into_slice` 的默认实现假设 `chunk()` 覆盖整个可读区域；
///   分片式实现必须覆写该方法，否则长度充足的请求也可能被误判越界。
pub trait ReadableBuffer: Send + Sync + 'static + Sealed {
    /// 返回底层存储总容量（字节）。
    fn capacity(&self) -> usize;

    /// 返回剩余可读字节数。
    fn remaining(&self) -> usize;

    /// 返回当前可直接读取的连续字节块。
    fn chunk(&self) -> &[u8];

    /// 拆分出前 `len` 字节，返回新的缓冲区实例。
    fn split_to(&mut self, len: usize) -> Result<Box<dyn ReadableBuffer>, CoreError>;

    /// 将读指针前移 `len` 字节，丢弃对应数据。
    fn advance(&mut self, len: usize) -> Result<(), CoreError>;

    /// 将缓冲内容复制到 `dst` 并推进读指针，兼容传统基于切片的 API。
    fn copy_into_slice(&mut self, dst: &mut [u8]) -> Result<(), CoreError>;

    /// 从可读区域起点复制 `dst.len()` 字节，**不**推进读指针。
    ///
    /// 观察式消费（如字节提取）依赖此方法保证缓冲状态不被修改；
    /// 重复调用同一未变更缓冲必须得到相同内容。
    fn peek_into_slice(&self, dst: &mut [u8]) -> Result<(), CoreError> {
        let chunk = self.chunk();
        if dst.len() > chunk.len() {
            return Err(CoreError::new(
                codes::BUFFER_OUT_OF_RANGE,
                "peek_into_slice beyond contiguous readable region",
            ));
        }
        dst.copy_from_slice(&chunk[..dst.len()]);
        Ok(())
    }

    /// 返回可直接寻址的底层存储句柄；默认视为不可寻址。
    fn backing_storage(&self) -> Option<StorageHandle> {
        None
    }

    /// 尝试将剩余数据扁平化为 `Vec<u8>`，供一次性消费场景使用。
    fn try_into_vec(self: Box<Self>) -> Result<Vec<u8>, CoreError>;

    /// 判断缓冲区是否已读空。
    fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

/// 对象安全缓冲的惯用别名，Handler 链内部统一以该形态传递。
pub type ErasedBuf = dyn ReadableBuffer;
