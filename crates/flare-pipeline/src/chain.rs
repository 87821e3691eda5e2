use alloc::{
    boxed::Box,
    collections::VecDeque,
    string::String,
    vec::Vec,
};
use flare_core::{
    CoreError, InboundHandler, OutboundHandler, Pipeline, WriteSignal,
    buffer::PipelineMessage, pipeline::Context,
};
use spin::Mutex;

struct InboundEntry {
    name: String,
    handler: Box<dyn InboundHandler>,
}

struct OutboundEntry {
    name: String,
    handler: Box<dyn OutboundHandler>,
}

/// `ChainBuilder` 按注册顺序组装 Handler 链。
///
/// # 设计初衷（Why）
/// - 链路顺序是协议栈语义的一部分（分帧必须先于字节提取），
///   通过 Builder 固化顺序可避免运行期改链引入的竞态；
/// - 构建完成后 [`ChannelPipeline`] 不可再变更，调度路径无需加锁保护链结构。
///
/// # 使用方式（How）
/// - `add_inbound` / `add_outbound` 按期望的穿越顺序依次注册；
/// - 入站事件按注册顺序传播；写事件按出站注册顺序的**逆序**传播，
///   与 Netty `addLast` 的方向约定一致。
#[derive(Default)]
pub struct ChainBuilder {
    inbound: Vec<InboundEntry>,
    outbound: Vec<OutboundEntry>,
}

impl ChainBuilder {
    /// 创建空链构建器。
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加入站 Handler。
    pub fn add_inbound(
        mut self,
        name: impl Into<String>,
        handler: impl InboundHandler,
    ) -> Self {
        self.inbound.push(InboundEntry {
            name: name.into(),
            handler: Box::new(handler),
        });
        self
    }

    /// 追加出站 Handler。
    pub fn add_outbound(
        mut self,
        name: impl Into<String>,
        handler: impl OutboundHandler,
    ) -> Self {
        self.outbound.push(OutboundEntry {
            name: name.into(),
            handler: Box::new(handler),
        });
        self
    }

    /// 固化链路并产出可调度的流水线。
    pub fn build(self) -> ChannelPipeline {
        ChannelPipeline {
            inbound: self.inbound,
            outbound: self.outbound,
            inbox: Mutex::new(VecDeque::new()),
            outbox: Mutex::new(VecDeque::new()),
            errors: Mutex::new(Vec::new()),
        }
    }
}

/// `ChannelPipeline` 是 Handler 链的同步调度器。
///
/// # 结构设计（How）
/// - 链结构在构建后只读，调度过程不持有任何锁；
/// - 三个汇聚队列以自旋锁保护：链尾的入站消息（应用侧）、链头的写消息（传输侧）
///   与未被消化的异常，Handler 回调期间不会持有队列锁，重入转发不会死锁；
/// - 每次回调临时构造轻量上下文，上下文仅记录当前位置索引。
///
/// # 契约说明（What）
/// - 实现 [`flare_core::Pipeline`]；事件注入点均为同步调用，返回即传播完毕；
/// - Handler 未转发的消息即被丢弃，这是链路语义而非缺陷；
/// - `take_*` 系列方法一次性取空对应队列，供宿主或测试消费。
pub struct ChannelPipeline {
    inbound: Vec<InboundEntry>,
    outbound: Vec<OutboundEntry>,
    inbox: Mutex<VecDeque<PipelineMessage>>,
    outbox: Mutex<VecDeque<PipelineMessage>>,
    errors: Mutex<Vec<CoreError>>,
}

impl ChannelPipeline {
    /// 创建链构建器的便捷入口。
    pub fn builder() -> ChainBuilder {
        ChainBuilder::new()
    }

    /// 取出所有抵达链尾的入站消息。
    pub fn take_inbound(&self) -> Vec<PipelineMessage> {
        self.inbox.lock().drain(..).collect()
    }

    /// 取出所有抵达链头的写消息。
    pub fn take_outbound(&self) -> Vec<PipelineMessage> {
        self.outbox.lock().drain(..).collect()
    }

    /// 取出所有未被 Handler 消化的异常。
    pub fn take_errors(&self) -> Vec<CoreError> {
        let mut errors = self.errors.lock();
        core::mem::take(&mut *errors)
    }

    fn dispatch_read(&self, index: usize, msg: PipelineMessage) {
        match self.inbound.get(index) {
            Some(entry) => {
                let ctx = InboundCtx {
                    pipeline: self,
                    index,
                };
                entry.handler.on_read(&ctx, msg);
            }
            None => self.inbox.lock().push_back(msg),
        }
    }

    fn dispatch_exception(&self, index: usize, error: CoreError) {
        match self.inbound.get(index) {
            Some(entry) => {
                let ctx = InboundCtx {
                    pipeline: self,
                    index,
                };
                entry.handler.on_exception_caught(&ctx, error);
            }
            None => self.errors.lock().push(error),
        }
    }

    // `slot` 自出站链尾向链头递减；0 表示已抵达传输端汇聚队列。
    fn dispatch_write(
        &self,
        slot: usize,
        msg: PipelineMessage,
    ) -> Result<WriteSignal, CoreError> {
        if slot == 0 {
            self.outbox.lock().push_back(msg);
            return Ok(WriteSignal::Accepted);
        }
        let index = slot - 1;
        let entry = &self.outbound[index];
        let ctx = OutboundCtx {
            pipeline: self,
            index,
        };
        entry.handler.on_write(&ctx, msg)
    }
}

impl Pipeline for ChannelPipeline {
    fn fire_channel_active(&self) {
        for (index, entry) in self.inbound.iter().enumerate() {
            let ctx = InboundCtx {
                pipeline: self,
                index,
            };
            entry.handler.on_channel_active(&ctx);
        }
    }

    fn fire_read(&self, msg: PipelineMessage) {
        self.dispatch_read(0, msg);
    }

    fn fire_read_complete(&self) {
        for (index, entry) in self.inbound.iter().enumerate() {
            let ctx = InboundCtx {
                pipeline: self,
                index,
            };
            entry.handler.on_read_complete(&ctx);
        }
    }

    fn fire_exception_caught(&self, error: CoreError) {
        self.dispatch_exception(0, error);
    }

    fn fire_channel_inactive(&self) {
        for (index, entry) in self.inbound.iter().enumerate() {
            let ctx = InboundCtx {
                pipeline: self,
                index,
            };
            entry.handler.on_channel_inactive(&ctx);
        }
    }

    fn write(&self, msg: PipelineMessage) -> Result<WriteSignal, CoreError> {
        self.dispatch_write(self.outbound.len(), msg)
    }
}

struct InboundCtx<'a> {
    pipeline: &'a ChannelPipeline,
    index: usize,
}

impl Context for InboundCtx<'_> {
    fn handler_name(&self) -> &str {
        &self.pipeline.inbound[self.index].name
    }

    fn forward_read(&self, msg: PipelineMessage) {
        self.pipeline.dispatch_read(self.index + 1, msg);
    }

    fn forward_write(&self, msg: PipelineMessage) -> Result<WriteSignal, CoreError> {
        // 入站 Handler 发起的写从出站链尾进入，穿过完整出站链。
        self.pipeline
            .dispatch_write(self.pipeline.outbound.len(), msg)
    }

    fn fire_exception_caught(&self, error: CoreError) {
        self.pipeline.dispatch_exception(self.index + 1, error);
    }
}

struct OutboundCtx<'a> {
    pipeline: &'a ChannelPipeline,
    index: usize,
}

impl Context for OutboundCtx<'_> {
    fn handler_name(&self) -> &str {
        &self.pipeline.outbound[self.index].name
    }

    fn forward_read(&self, msg: PipelineMessage) {
        // 出站阶段回注的读事件从链头开始传播。
        self.pipeline.dispatch_read(0, msg);
    }

    fn forward_write(&self, msg: PipelineMessage) -> Result<WriteSignal, CoreError> {
        self.pipeline.dispatch_write(self.index, msg)
    }

    fn fire_exception_caught(&self, error: CoreError) {
        self.pipeline.dispatch_exception(0, error);
    }
}
