#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![allow(private_bounds)]

//! `flare-core`：字节提取流水线的核心契约。
//!
//! 本 crate 仅定义稳定接口：错误域、只读缓冲能力与 Handler 链契约；
//! 具体的缓冲实现（`flare-buffer`）、链路调度（`flare-pipeline`）与各编解码
//! 阶段（`flare-codec-*`）在各自 crate 中落地。
//!
//! # 内存分配依赖
//! 核心契约依赖 `alloc` 中的 `Box`、`Vec` 支撑对象安全与消息传递；
//! 纯 `no_std`（无分配器）环境暂不支持。

extern crate alloc;

mod sealed;

pub mod buffer;
pub mod error;
pub mod pipeline;

pub use buffer::{ErasedBuf, PipelineMessage, ReadableBuffer, StorageHandle};
pub use error::{CoreError, ErrorCause};
pub use pipeline::{Context, InboundHandler, OutboundHandler, Pipeline, WriteSignal};

use alloc::boxed::Box;
use core::fmt;

/// 框架内统一的结果别名，错误侧默认为 [`CoreError`]。
pub type Result<T, E = CoreError> = core::result::Result<T, E>;

/// 框架内所有错误必须实现的 `no_std` 基础 Trait。
///
/// # 设计背景（Why）
/// - `std::error::Error` 在 `no_std` 环境不可用，因此需要一个对象安全、
///   与平台无关的错误抽象来串联底层错误链。
///
/// # 逻辑解析（How）
/// - 约束实现者提供 `Debug` 与 `Display`，便于日志与可观测性收集；
/// - `source` 递归返回链路上的上游错误，与 `std::error::Error::source` 语义一致。
///
/// # 契约说明（What）
/// - 实现类型须为 `'static` 生命周期；需要跨线程时请使用 [`ErrorCause`] 别名；
/// - `source` 返回的引用生命周期受限于 `self`，防止悬垂引用。
pub trait Error: fmt::Debug + fmt::Display + crate::sealed::Sealed {
    /// 返回当前错误的上游来源。
    fn source(&self) -> Option<&(dyn Error + 'static)>;
}

impl<E> Error for Box<E>
where
    E: Error + ?Sized,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        (**self).source()
    }
}
