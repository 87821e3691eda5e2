#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

//! `flare-buffer` 提供 `flare-core` 缓冲契约的引用计数实现。
//!
//! # 教案背景（Why）
//! - 核心 crate 只定义 [`flare_core::ReadableBuffer`] 契约；本 crate 以
//!   `bytes::Bytes` 为底座给出默认实现，供分帧与字节提取阶段直接使用；
//! - `Bytes` 的引用计数语义正是零拷贝移交所需的"共享而不可变"模型：
//!   存储在所有视图释放前不会被回收或改写。
//!
//! # 使用概览（How）
//! - [`RegionBuffer::from_bytes`] / [`RegionBuffer::from_vec`] 构造全窗口缓冲，
//!   可读区域即整个存储，满足零拷贝判定条件；
//! - [`RegionBuffer::with_region`] 构造带偏移或尾部空闲的视图，用于复现
//!   包裹大数组的场景；
//! - `split_to` 拆出的前缀同样是全窗口缓冲，下游阶段可继续零拷贝消费。

extern crate alloc;

mod region;

pub use crate::region::RegionBuffer;
