use crate::Error;
use alloc::{borrow::Cow, boxed::Box};
use core::fmt;

/// 稳定错误码命名空间。
///
/// # 设计背景（Why）
/// - 日志、指标与自动化治理都依赖机读的错误语义；若各模块各自拼接字符串，
///   聚合与告警规则将无法稳定匹配。
/// - 统一采用 `<域>.<语义>` 约定，便于跨 crate 复用同一套分类。
///
/// # 契约说明（What）
/// - 常量一经发布即视为稳定接口，重命名属于破坏性变更；
/// - 自定义扩展码应沿用同样的命名约定，并在各自文档中备案。
pub mod codes {
    /// 缓冲区访问越界：`split_to`、`advance` 或复制请求超出可读区域。
    pub const BUFFER_OUT_OF_RANGE: &str = "buffer.out_of_range";
    /// 帧长度超出配置上限，上层应拒绝该输入并考虑关闭连接。
    pub const PROTOCOL_BUDGET_EXCEEDED: &str = "protocol.budget_exceeded";
    /// 入站数据不符合协议分帧约定。
    pub const PROTOCOL_DECODE: &str = "protocol.decode";
}

/// 线程安全的底层原因容器。
pub type ErrorCause = Box<dyn Error + Send + Sync + 'static>;

/// `CoreError` 是框架各层共享的稳定错误形态。
///
/// # 设计背景（Why）
/// - 缓冲实现、分帧阶段与字节提取阶段产生的故障需要合流为统一的错误码，
///   以便上层 Handler 链按稳定语义执行降级或关闭策略。
/// - 框架兼容 `no_std + alloc` 场景，因此不依赖 `std::error::Error`，
///   而是复用 crate 内定义的轻量 [`Error`] 抽象。
///
/// # 逻辑解析（How）
/// - 结构体以 Builder 风格方法叠加底层原因，并通过 `source()` 暴露完整链路；
/// - 错误码 `code` 始终为 `'static` 字符串，承载稳定语义；`message` 面向排障人员。
///
/// # 契约说明（What）
/// - **前置条件**：调用方必须使用 [`codes`] 模块或遵循 `<域>.<语义>` 约定的自定义码值；
/// - **返回值**：构造函数返回拥有所有权的 `CoreError`，可安全跨线程移动；
/// - **后置条件**：除非显式调用 `with_cause`/`set_cause`，错误不包含底层原因。
///
/// # 设计取舍与风险（Trade-offs）
/// - 消息采用 `Cow<'static, str>`，静态文案零分配，动态描述仅一次堆分配；
/// - 结构体仅承载信息，不执行任何日志或指标上报，由调用方自行处理。
#[derive(Debug)]
pub struct CoreError {
    code: &'static str,
    message: Cow<'static, str>,
    cause: Option<ErrorCause>,
}

impl CoreError {
    /// 构造核心错误。
    ///
    /// ```rust
    /// use flare_core::CoreError;
    /// use flare_core::error::codes;
    ///
    /// let err = CoreError::new(codes::BUFFER_OUT_OF_RANGE, "advance beyond remaining");
    /// assert_eq!(err.code(), codes::BUFFER_OUT_OF_RANGE);
    /// assert!(err.cause().is_none());
    /// ```
    pub fn new(code: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code,
            message: message.into(),
            cause: None,
        }
    }

    /// 附带底层原因并返回新的核心错误。
    pub fn with_cause(mut self, cause: impl Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// 为现有错误设置底层原因。
    pub fn set_cause(&mut self, cause: impl Error + Send + Sync + 'static) {
        self.cause = Some(Box::new(cause));
    }

    /// 获取稳定错误码。
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// 获取面向排障人员的描述。
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 获取底层原因。
    pub fn cause(&self) -> Option<&ErrorCause> {
        self.cause.as_ref()
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for CoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_ref()
            .map(|boxed| boxed.as_ref() as &(dyn Error + 'static))
    }
}

// 保证错误可以在 Handler 链与宿主线程之间自由移动。
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CoreError>();
};
