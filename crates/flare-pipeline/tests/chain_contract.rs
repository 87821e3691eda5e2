//! `ChannelPipeline` 的链路契约测试：传播方向、汇聚队列与异常路径。

use std::sync::{Arc, Mutex};

use flare_core::{
    CoreError, InboundHandler, OutboundHandler, Pipeline, WriteSignal,
    buffer::PipelineMessage, error::codes, pipeline::Context,
};
use flare_pipeline::ChannelPipeline;

fn user_u32(msg: PipelineMessage) -> u32 {
    match msg {
        PipelineMessage::User(any) => *any.downcast::<u32>().expect("u32 user message"),
        other => panic!("expected user message, got {:?}", other),
    }
}

/// 入站算术 Handler：先乘后加，用于验证传播顺序。
struct MulThenForward(u32);

impl InboundHandler for MulThenForward {
    fn on_read(&self, ctx: &dyn Context, msg: PipelineMessage) {
        let value = user_u32(msg);
        ctx.forward_read(PipelineMessage::user(value * self.0));
    }
}

struct AddThenForward(u32);

impl InboundHandler for AddThenForward {
    fn on_read(&self, ctx: &dyn Context, msg: PipelineMessage) {
        let value = user_u32(msg);
        ctx.forward_read(PipelineMessage::user(value + self.0));
    }
}

/// 出站 Handler：记录穿越顺序后继续转发。
struct TraceWrite {
    tag: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl OutboundHandler for TraceWrite {
    fn on_write(
        &self,
        ctx: &dyn Context,
        msg: PipelineMessage,
    ) -> Result<WriteSignal, CoreError> {
        self.log.lock().expect("log lock").push(self.tag);
        ctx.forward_write(msg)
    }
}

/// 把每条读消息转换为异常，验证默认异常传播落入汇聚队列。
struct FailOnRead;

impl InboundHandler for FailOnRead {
    fn on_read(&self, ctx: &dyn Context, _msg: PipelineMessage) {
        ctx.fire_exception_caught(CoreError::new(codes::PROTOCOL_DECODE, "poisoned frame"));
    }
}

/// 静默吞掉消息的 Handler，验证"不转发即丢弃"语义。
struct Swallow;

impl InboundHandler for Swallow {
    fn on_read(&self, _ctx: &dyn Context, _msg: PipelineMessage) {}
}

#[test]
fn empty_chain_delivers_to_application_queue() {
    let pipeline = ChannelPipeline::builder().build();
    pipeline.fire_read(PipelineMessage::user(7u32));
    let mut inbox = pipeline.take_inbound();
    assert_eq!(inbox.len(), 1);
    assert_eq!(user_u32(inbox.remove(0)), 7);
}

#[test]
fn inbound_handlers_run_head_to_tail() {
    // (5 * 3) + 4 = 19：若顺序颠倒结果会是 (5 + 4) * 3 = 27。
    let pipeline = ChannelPipeline::builder()
        .add_inbound("mul", MulThenForward(3))
        .add_inbound("add", AddThenForward(4))
        .build();
    pipeline.fire_read(PipelineMessage::user(5u32));
    let mut inbox = pipeline.take_inbound();
    assert_eq!(user_u32(inbox.remove(0)), 19);
}

#[test]
fn writes_traverse_outbound_chain_tail_to_head() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let pipeline = ChannelPipeline::builder()
        .add_outbound(
            "head",
            TraceWrite {
                tag: "head",
                log: Arc::clone(&log),
            },
        )
        .add_outbound(
            "tail",
            TraceWrite {
                tag: "tail",
                log: Arc::clone(&log),
            },
        )
        .build();

    let signal = pipeline
        .write(PipelineMessage::user(1u32))
        .expect("write succeeds");
    assert_eq!(signal, WriteSignal::Accepted);
    assert_eq!(*log.lock().expect("log lock"), vec!["tail", "head"]);
    assert_eq!(pipeline.take_outbound().len(), 1);
}

#[test]
fn unhandled_exception_reaches_error_queue() {
    let pipeline = ChannelPipeline::builder()
        .add_inbound("fail", FailOnRead)
        .add_inbound("pass", AddThenForward(0))
        .build();
    pipeline.fire_read(PipelineMessage::user(1u32));
    let errors = pipeline.take_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code(), codes::PROTOCOL_DECODE);
    assert!(pipeline.take_inbound().is_empty());
}

#[test]
fn swallowed_message_is_dropped() {
    let pipeline = ChannelPipeline::builder()
        .add_inbound("swallow", Swallow)
        .build();
    pipeline.fire_read(PipelineMessage::user(9u32));
    assert!(pipeline.take_inbound().is_empty());
    assert!(pipeline.take_errors().is_empty());
}
