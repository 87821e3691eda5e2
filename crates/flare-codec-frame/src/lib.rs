#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

//! `flare-codec-frame` 提供基于 `u32` 大端长度前缀的分帧阶段。
//!
//! # 教案背景（Why）
//! - 面向字节流的传输层不保留消息边界：一次读取可能只含半条消息，也可能
//!   粘连多条。恢复边界是协议栈的第一个入站阶段；
//! - 长度前缀是最常见的边界编码：写侧在载荷前加 4 字节大端长度，
//!   读侧按长度切出完整帧。
//!
//! # 使用概览（How）
//! - 入站注册 [`LengthFieldFrameDecoder`]：碎片在内部累积区重组，
//!   每凑齐一条完整帧就向后传播一个全窗口缓冲；
//! - 出站注册 [`LengthFieldPrepender`]：缓冲消息被加上长度前缀后继续下行；
//! - 分帧产物为全窗口缓冲，下游的字节提取阶段可以走零拷贝路径。
//!
//! # 合约说明（What）
//! - 解码侧可配置单帧预算，超限帧触发 `protocol.budget_exceeded` 并清空累积区；
//! - 编码侧载荷长度超出 `u32` 表示范围时以同一错误码拒绝写入。

extern crate alloc;

mod length_field;

pub use crate::length_field::{LengthFieldFrameDecoder, LengthFieldPrepender};
