//! 缓冲区契约模块。
//!
//! # 模块架构（Why）
//! - 将只读缓冲能力与流水线消息桥接拆分为独立子模块，对齐 Netty、Tokio Bytes 等
//!   主流框架的职责分离实践。
//! - 通过统一的 [`ReadableBuffer`] 契约隐藏底层实现差异，让字节提取、分帧等阶段
//!   与具体内存策略解耦。
//!
//! # 设计总览（How）
//! - [`readable`] 定义对象安全的只读缓冲协议，除常规的"观察-拆分-推进"操作外，
//!   还暴露零拷贝判定所需的容量与底层存储能力；
//! - [`message`] 描述流水线消息体，支持字节缓冲与高层业务消息并存。
//!
//! # 命名共识（Consistency）
//! - 所有类型避免业务前缀，遵循 Rust 异步生态的惯用术语，便于与 Bytes 等生态互操作。

pub mod message;
pub mod readable;

pub use message::PipelineMessage;
pub use readable::{ErasedBuf, ReadableBuffer, StorageHandle};
