//! 流水线契约模块。
//!
//! # 模块架构（Why）
//! - 借鉴 Netty `ChannelPipeline` 的责任链模式：入站事件自头向尾逐层加工
//!   （分帧、字节提取、业务分发），写事件自尾向头逆序组合（编码、加前缀）。
//! - 核心 crate 仅定义契约；具体的链路组装与调度由 `flare-pipeline` 提供，
//!   保证契约层在 `no_std + alloc` 环境同样可用。
//!
//! # 设计总览（How）
//! - [`context::Context`] 是 Handler 与链路交互的唯一入口，负责事件继续传播；
//! - [`handler`] 拆分入站与出站两类 Handler，生命周期回调提供默认空实现，
//!   让单一职责的编解码阶段只需实现一个方法；
//! - [`Pipeline`] 面向宿主（传输层或测试驱动），描述事件注入点。
//!
//! # 风险提示（Trade-offs）
//! - 所有回调均为同步调用，Handler 不得阻塞；耗时操作应移交宿主调度。

pub mod context;
pub mod handler;

pub use context::Context;
pub use handler::{InboundHandler, OutboundHandler};

use crate::{CoreError, buffer::PipelineMessage};

/// `WriteSignal` 表达写路径的背压反馈。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteSignal {
    /// 消息进入缓冲，尚待刷出。
    Accepted,
    /// 消息已经落盘或发送。
    AcceptedAndFlushed,
    /// 触发背压，调用方应重试或降速。
    BackpressureApplied,
}

/// `Pipeline` 负责组织 Handler 链路并广播事件。
///
/// # 契约说明（What）
/// - `fire_*` 方法均为非阻塞的同步广播；
/// - `fire_read` 将消息交给首个入站 Handler，链尾未被消费的消息属于应用层；
/// - `write` 将消息交给链尾出站 Handler，逆序穿过出站链后抵达传输端；
/// - `fire_exception_caught` 自首个 Handler 起传播异常，默认逐层向后转发。
///
/// # 风险提示（Trade-offs）
/// - 若实现内部采用锁保护链路状态，需避免在 Handler 回调持锁，防止重入死锁。
pub trait Pipeline: Send + Sync + 'static {
    /// 通道转为活跃态时触发。
    fn fire_channel_active(&self);

    /// 通道收到读取事件。
    fn fire_read(&self, msg: PipelineMessage);

    /// 一批读取完成。
    fn fire_read_complete(&self);

    /// 通道出现异常。
    fn fire_exception_caught(&self, error: CoreError);

    /// 通道变为非活跃状态。
    fn fire_channel_inactive(&self);

    /// 向出站链写入消息，返回背压信号。
    fn write(&self, msg: PipelineMessage) -> Result<WriteSignal, CoreError>;
}
