//! 内部 sealed 模块，用于控制外部扩展边界。
//!
//! # 设计背景（Why）
//! - `flare-core` 对外暴露可实现的缓冲契约，需要在 SemVer 框架下保留未来演进空间。
//! - 通过统一的 `Sealed` 标记，可以在不破坏公开 API 的前提下为 Trait 增加默认方法或强化约束。
//!
//! # 逻辑解析（How）
//! - 定义私有 Trait `Sealed`，并对所有类型提供 blanket 实现。
//! - 公开 Trait 通过 `: crate::sealed::Sealed` 间接依赖该标记；若未来需要收紧实现者集合，
//!   只需修改此处的 blanket 条件，公开签名保持不变。
//!
//! # 契约说明（What）
//! - `Sealed` 无需调用方显式实现；当前任意类型默认满足该约束。
//!
//! # 风险与考量（Trade-offs）
//! - Blanket 实现意味着当前并未真正限制实现者，这是为了兼容下游自定义缓冲；
//!   若未来收紧条件，需同步发布兼容性公告。
pub(crate) trait Sealed {}

impl<T: ?Sized> Sealed for T {}
