#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

//! `flare-pipeline` 提供 `flare-core` Handler 链契约的同步调度实现。
//!
//! # 教案背景（Why）
//! - 核心 crate 只定义 [`flare_core::Pipeline`] 与 Handler 契约；本 crate 给出
//!   单线程同步的责任链实现，面向嵌入宿主与契约测试；
//! - 入站事件自头向尾传播，写事件自尾向头逆序穿过出站链，与 Netty 的
//!   `ChannelPipeline` 方向约定一致。
//!
//! # 使用概览（How）
//! - 通过 [`ChainBuilder`] 按顺序注册入站/出站 Handler 并构建 [`ChannelPipeline`]；
//! - 宿主调用 `fire_read` 注入入站消息、`write` 注入写消息；
//! - 抵达链尾的入站消息、抵达链头的写消息与沿途异常分别进入三个汇聚队列，
//!   由 `take_inbound` / `take_outbound` / `take_errors` 取出。

extern crate alloc;

mod chain;

pub use crate::chain::{ChainBuilder, ChannelPipeline};
