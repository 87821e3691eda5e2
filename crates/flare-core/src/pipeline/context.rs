use super::WriteSignal;
use crate::{CoreError, buffer::PipelineMessage};

/// Handler 访问事件流的统一入口。
///
/// # 设计背景（Why）
/// - 融合 Netty `ChannelHandlerContext` 与 Tower 中间件上下文的设计理念：
///   Handler 自身保持无状态，事件传播能力全部经由上下文提供，符合依赖倒置原则。
/// - 通过对象安全 Trait 支持动态装配 Handler，同时保留 `no_std` 可用性。
///
/// # 契约说明（What）
/// - `forward_read` 将消息交给链上的**下一个**入站 Handler；链尾消息交付应用层；
/// - `forward_write` 将消息交给出站方向的下一个 Handler，最终抵达传输端；
/// - `fire_exception_caught` 沿入站方向传播异常，交由后续 Handler 决定降级策略。
///
/// # 前置/后置条件（Contract）
/// - **前置**：仅应在事件回调内部使用上下文，不得缓存引用超出回调生命周期；
/// - **后置**：`forward_*` 为立即执行的同步调用，返回即表示下游 Handler 已处理完毕。
///
/// # 风险提示（Trade-offs）
/// - 转发即同步递归；链路过深或 Handler 内重计算会直接拉长调用栈与延迟。
pub trait Context: Send + Sync {
    /// 当前 Handler 注册时使用的名称，便于日志关联。
    fn handler_name(&self) -> &str;

    /// 继续向后传播读事件。
    fn forward_read(&self, msg: PipelineMessage);

    /// 沿出站方向传播写事件。
    fn forward_write(&self, msg: PipelineMessage) -> Result<WriteSignal, CoreError>;

    /// 沿入站方向传播异常。
    fn fire_exception_caught(&self, error: CoreError);
}
