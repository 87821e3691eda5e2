use super::ReadableBuffer;
use alloc::boxed::Box;
use core::{any::Any, fmt};

/// `PipelineMessage` 统一承载网络层字节与业务层对象。
///
/// # 设计背景（Why）
/// - 借鉴 Netty `ChannelPipeline` 的复合消息模式：同一条 Handler 链上既有字节缓冲，
///   也有已经完成解码的业务对象，二者需要安全共存；
/// - 用封闭的两分支枚举取代运行时类型探测，各阶段通过穷尽匹配决定"加工"还是
///   "原样放行"，编译器保证不会遗漏分支。
///
/// # 逻辑解析（How）
/// - `Buffer` 变体封装 [`ReadableBuffer`]，承载传输层字节流，适配零拷贝策略；
/// - `User` 变体封装任意 `Send + Sync` 对象，对应业务语义，通过 `Any` 支持下转型。
///
/// # 契约说明（What）
/// - 创建 `User` 时调用方必须保证内部类型满足线程安全语义；
/// - 消费 `User` 前需进行类型判定并显式处理转换失败分支；
/// - 不处理某一变体的阶段应将消息**原样**转发，不得隐式丢弃。
///
/// # 设计考量（Trade-offs & Gotchas）
/// - **对象擦除**：相比泛型消息牺牲了一定编译期优化，但支持动态协议装配；
/// - **调试输出**：`Debug` 实现刻意隐藏内部细节，避免日志泄漏敏感载荷。
pub enum PipelineMessage {
    /// 传输层字节缓冲。
    Buffer(Box<dyn ReadableBuffer>),
    /// 业务层消息。
    User(Box<dyn Any + Send + Sync>),
}

impl PipelineMessage {
    /// 以缓冲形态构造消息。
    pub fn from_buffer(buffer: Box<dyn ReadableBuffer>) -> Self {
        PipelineMessage::Buffer(buffer)
    }

    /// 以业务对象形态构造消息。
    pub fn user<T: Any + Send + Sync>(value: T) -> Self {
        PipelineMessage::User(Box::new(value))
    }

    /// 判断当前消息是否为字节缓冲。
    pub fn is_buffer(&self) -> bool {
        matches!(self, PipelineMessage::Buffer(_))
    }
}

impl fmt::Debug for PipelineMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineMessage::Buffer(_) => {
                f.debug_tuple("Buffer").field(&"<erased-buffer>").finish()
            }
            PipelineMessage::User(_) => f.debug_tuple("User").field(&"<erased-user>").finish(),
        }
    }
}
