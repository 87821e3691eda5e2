use alloc::{boxed::Box, vec, vec::Vec};
use core::{any::Any, fmt};

use bytes::Bytes;
use flare_buffer::RegionBuffer;
use flare_core::{
    CoreError, ErasedBuf, InboundHandler, OutboundHandler, ReadableBuffer, WriteSignal,
    buffer::PipelineMessage, pipeline::Context,
};

/// `ExtractedBytes` 是字节提取的带标签结果。
///
/// # 设计动机（Why）
/// - 零拷贝路径会让返回值与缓冲存储互为别名，复制路径则产生独立分配；
///   两种来源的生命周期含义不同，应当在类型上显式区分而非隐式混用；
/// - 内部统一使用引用计数只读视图（`bytes::Bytes`）：`Shared` 分支的存储
///   在视图存活期间不会被回收或改写，`Copied` 分支则完全独立。
///
/// # 契约说明（What）
/// - 两个分支对消费者语义等价：长度与内容都等于提取时刻缓冲的可读区域；
/// - 标签仅用于观测与断言（如零拷贝命中率统计、契约测试的同一性校验）。
#[derive(Clone)]
pub enum ExtractedBytes {
    /// 直接移交的底层存储，与来源缓冲共享同一块内存。
    Shared(Bytes),
    /// 防御性复制出的独立字节序列。
    Copied(Bytes),
}

impl ExtractedBytes {
    /// 以切片形态访问载荷。
    pub fn as_slice(&self) -> &[u8] {
        match self {
            ExtractedBytes::Shared(bytes) | ExtractedBytes::Copied(bytes) => bytes,
        }
    }

    /// 载荷长度（字节）。
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// 载荷是否为空。
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// 是否走了零拷贝移交路径。
    pub fn is_shared(&self) -> bool {
        matches!(self, ExtractedBytes::Shared(_))
    }

    /// 消耗标签，取出内部视图。
    pub fn into_bytes(self) -> Bytes {
        match self {
            ExtractedBytes::Shared(bytes) | ExtractedBytes::Copied(bytes) => bytes,
        }
    }
}

impl AsRef<[u8]> for ExtractedBytes {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl fmt::Debug for ExtractedBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 只打印路径与长度，避免日志泄漏载荷。
        let (variant, len) = match self {
            ExtractedBytes::Shared(bytes) => ("Shared", bytes.len()),
            ExtractedBytes::Copied(bytes) => ("Copied", bytes.len()),
        };
        f.debug_struct("ExtractedBytes")
            .field("path", &variant)
            .field("len", &len)
            .finish()
    }
}

/// 把缓冲的可读区域提取为一段连续字节。
///
/// # 教案级拆解
/// - **意图 (Why)**：这是整个阶段唯一的决策点。零拷贝移交只在一个精确条件下
///   安全：底层存储可直接寻址、可读区域起点为零、且可读长度等于总容量。
///   此时"存储即载荷"，共享句柄无法观察到可读区域之外的任何字节。
/// - **操作步骤 (How)**：
///   1. 询问缓冲是否暴露可寻址存储；
///   2. 命中"偏移为零且可读长度等于容量"时，直接移交存储句柄；
///   3. 其余情形（带偏移、带尾部空闲、或存储不可寻址）分配等长字节并
///      从可读区域起点复制。
/// - **契约 (What)**：
///   - 返回值长度恒等于调用时刻的 `remaining()`，内容逐字节等于可读区域；
///   - 过程不推进读指针、不修改缓冲内容；对同一未变更缓冲重复调用结果一致；
///   - 本函数不定义错误码，唯一的失败来源是缓冲复制调用本身。
/// - **风险提示 (Trade-offs)**：
///   - 判定条件刻意比"可读区域之前无字节"更严：尾部存在空闲容量时同样复制。
///     放宽该条件会让共享句柄携带可读区域之外的可寻址字节，下游可能读到
///     陈旧或异物数据；请保持原样，不要放宽。
pub fn extract_readable(buf: &ErasedBuf) -> Result<ExtractedBytes, CoreError> {
    let readable = buf.remaining();
    if let Some(handle) = buf.backing_storage()
        && handle.read_offset() == 0
        && readable == buf.capacity()
    {
        // 存储即载荷，移交引用计数句柄，不复制。
        return Ok(ExtractedBytes::Shared(handle.into_storage()));
    }

    let mut copied = vec![0u8; readable];
    buf.peek_into_slice(&mut copied)?;
    Ok(ExtractedBytes::Copied(Bytes::from(copied)))
}

/// `ByteArrayDecoder` 把入站缓冲消息转换为携带 [`ExtractedBytes`] 的业务消息。
///
/// # 行为概览（How）
/// - 缓冲消息：提取可读区域后以业务消息形态继续向后传播；
/// - 非缓冲消息：原样放行，异构链路中的业务对象不受影响；
/// - 提取失败：经由上下文沿入站方向传播异常，消息终止于本阶段。
///
/// # 契约说明（What）
/// - 本阶段无内部状态，可在多条链路间共享同一实例；
/// - 不修改来源缓冲的读指针与内容。
#[derive(Debug, Default)]
pub struct ByteArrayDecoder;

impl ByteArrayDecoder {
    /// 创建新的提取阶段实例。
    pub const fn new() -> Self {
        Self
    }

    /// 单条消息的纯转换入口，便于在链路之外直接复用。
    pub fn decode(&self, msg: PipelineMessage) -> Result<PipelineMessage, CoreError> {
        match msg {
            PipelineMessage::Buffer(buffer) => {
                let extracted = extract_readable(buffer.as_ref())?;
                Ok(PipelineMessage::user(extracted))
            }
            other => Ok(other),
        }
    }
}

impl InboundHandler for ByteArrayDecoder {
    fn name(&self) -> &str {
        "byte-array-decoder"
    }

    fn on_read(&self, ctx: &dyn Context, msg: PipelineMessage) {
        match self.decode(msg) {
            Ok(decoded) => ctx.forward_read(decoded),
            Err(error) => ctx.fire_exception_caught(error),
        }
    }
}

/// `ByteArrayEncoder` 是提取阶段的逆向阶段：把字节载荷包装回缓冲消息。
///
/// # 行为概览（How）
/// - 业务消息内容为 [`ExtractedBytes`]、[`Bytes`] 或 `Vec<u8>` 时，
///   包装为全窗口 [`RegionBuffer`] 继续沿出站链传播；
/// - 其余消息（含已经是缓冲形态的消息）原样放行。
///
/// # 契约说明（What）
/// - 包装产物可读区域即整个存储，下游分帧阶段可据此零拷贝消费；
/// - `ExtractedBytes`/`Bytes` 形态的载荷包装时不复制，`Vec<u8>` 仅做所有权转移。
#[derive(Debug, Default)]
pub struct ByteArrayEncoder;

impl ByteArrayEncoder {
    /// 创建新的包装阶段实例。
    pub const fn new() -> Self {
        Self
    }

    /// 单条消息的纯转换入口。
    pub fn encode(&self, msg: PipelineMessage) -> PipelineMessage {
        match msg {
            PipelineMessage::User(any) => wrap_byte_payload(any),
            other => other,
        }
    }
}

impl OutboundHandler for ByteArrayEncoder {
    fn name(&self) -> &str {
        "byte-array-encoder"
    }

    fn on_write(
        &self,
        ctx: &dyn Context,
        msg: PipelineMessage,
    ) -> Result<WriteSignal, CoreError> {
        ctx.forward_write(self.encode(msg))
    }
}

// 依次尝试三种字节载荷形态；全部失败则原样归还业务消息。
fn wrap_byte_payload(any: Box<dyn Any + Send + Sync>) -> PipelineMessage {
    let any = match any.downcast::<ExtractedBytes>() {
        Ok(extracted) => return buffer_message(extracted.into_bytes()),
        Err(any) => any,
    };
    let any = match any.downcast::<Bytes>() {
        Ok(bytes) => return buffer_message(*bytes),
        Err(any) => any,
    };
    match any.downcast::<Vec<u8>>() {
        Ok(bytes) => buffer_message(Bytes::from(*bytes)),
        Err(any) => PipelineMessage::User(any),
    }
}

fn buffer_message(bytes: Bytes) -> PipelineMessage {
    PipelineMessage::from_buffer(Box::new(RegionBuffer::from_bytes(bytes)))
}
