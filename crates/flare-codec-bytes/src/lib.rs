#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

//! `flare-codec-bytes` 提供缓冲与原始字节序列之间的双向流水线阶段。
//!
//! # 教案背景（Why）
//! - 长度分帧之后、业务代码之前，往往需要把缓冲抽象"落地"为一段连续字节：
//!   应用只关心载荷内容，不应耦合缓冲的容量、偏移与存储形态；
//! - 落地方式存在一个正确性敏感的优化点：底层存储可直接寻址且可读区域恰好
//!   覆盖全部容量时，可以直接移交存储（零拷贝）；其余情形必须防御性复制。
//!   本 crate 把这条判定收敛在唯一入口 [`extract_readable`] 中。
//!
//! # 使用概览（How）
//! - 入站注册 [`ByteArrayDecoder`]：缓冲消息被转换为携带 [`ExtractedBytes`]
//!   的业务消息，非缓冲消息原样放行；
//! - 出站注册 [`ByteArrayEncoder`]：携带字节的业务消息被包装回全窗口缓冲，
//!   交给下游的长度前缀阶段；
//! - 典型 TCP 协议栈的四段式装配：
//!   入站 `长度分帧 → 字节提取`，出站 `长度前缀 ← 字节包装`。
//!
//! # 合约说明（What）
//! - 提取结果的长度与内容恒等于调用时刻缓冲的可读区域，与所走路径无关；
//! - 提取过程不推进读指针、不修改缓冲内容，对同一未变更缓冲重复调用结果一致；
//! - 本阶段自身不定义错误码，缓冲访问失败原样向上传播。
//!
//! # 风险提示与后续（Trade-offs）
//! - 零拷贝路径使返回值与缓冲存储互为别名；[`ExtractedBytes`] 采用引用计数
//!   只读视图，存储在视图存活期间不会被回收或改写，代价是存储生命周期被延长；
//! - 判定条件刻意保守：尾部存在空闲容量时同样复制，避免通过共享句柄暴露
//!   可读区域之外的字节。

extern crate alloc;

mod byte_array;

pub use crate::byte_array::{ByteArrayDecoder, ByteArrayEncoder, ExtractedBytes, extract_readable};
