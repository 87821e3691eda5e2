use super::{WriteSignal, context::Context};
use crate::{CoreError, buffer::PipelineMessage};

/// 入站事件处理合约，面向从传输层到业务层的正向数据流。
///
/// # 设计背景（Why）
/// - 对标 Netty `ChannelInboundHandler` 的回调拆分，使 Handler 能以细粒度响应事件；
/// - 生命周期回调提供默认空实现：分帧、字节提取这类单一职责阶段只需实现 `on_read`。
///
/// # 契约说明（What）
/// - 所有方法在链路调度线程同步调用，必须无阻塞；
/// - 不处理的消息应通过 `ctx.forward_read` **原样**转发，不得隐式丢弃；
/// - `on_exception_caught` 默认继续向后传播异常；若实现选择就地消化，
///   需确保不会掩盖需要关闭连接的协议违规。
///
/// # 风险提示（Trade-offs）
/// - 实现若持有内部状态（如分帧累积区），需自行保证并发安全，契约不提供 `&mut self`。
pub trait InboundHandler: Send + Sync + 'static {
    /// Handler 名称，默认匿名，便于链路观测。
    fn name(&self) -> &str {
        "inbound-handler"
    }

    /// 通道活跃时调用。
    fn on_channel_active(&self, _ctx: &dyn Context) {}

    /// 处理读到的消息。
    fn on_read(&self, ctx: &dyn Context, msg: PipelineMessage);

    /// 一批读取完成。
    fn on_read_complete(&self, _ctx: &dyn Context) {}

    /// 异常处理，默认沿链路继续传播。
    fn on_exception_caught(&self, ctx: &dyn Context, error: CoreError) {
        ctx.fire_exception_caught(error);
    }

    /// 通道不再活跃。
    fn on_channel_inactive(&self, _ctx: &dyn Context) {}
}

/// 出站事件处理合约，负责从业务层到传输层的逆向数据流。
///
/// # 设计背景（Why）
/// - 写链中通常包含编码、加长度前缀等步骤，需要按逆序组合处理；
/// - 对齐 Netty `ChannelOutboundHandler` 的写路径语义。
///
/// # 契约说明（What）
/// - `on_write` 必须遵循背压信号语义，将 [`WriteSignal`] 向上一层返回；
/// - 不处理的消息同样应原样 `ctx.forward_write`；
/// - `on_flush` 用于冲刷缓冲或触发批处理，默认空操作。
pub trait OutboundHandler: Send + Sync + 'static {
    /// Handler 名称，默认匿名。
    fn name(&self) -> &str {
        "outbound-handler"
    }

    /// 写入消息。
    fn on_write(
        &self,
        ctx: &dyn Context,
        msg: PipelineMessage,
    ) -> Result<WriteSignal, CoreError>;

    /// 刷新写缓冲。
    fn on_flush(&self, _ctx: &dyn Context) -> Result<(), CoreError> {
        Ok(())
    }
}
