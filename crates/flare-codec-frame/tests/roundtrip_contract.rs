//! 四段式协议栈的端到端契约：出站加帧与入站还原互为逆操作。

use bytes::Bytes;
use flare_buffer::RegionBuffer;
use flare_codec_bytes::{ByteArrayDecoder, ByteArrayEncoder, ExtractedBytes};
use flare_codec_frame::{LengthFieldFrameDecoder, LengthFieldPrepender};
use flare_core::{Pipeline, buffer::PipelineMessage, error::codes};
use flare_pipeline::ChannelPipeline;

/// 出站链：业务字节 → 包装为缓冲 → 加长度前缀 → 汇入出站队列。
fn outbound_pipeline() -> ChannelPipeline {
    // 写事件从链尾向链头穿越，后注册的 Handler 先执行。
    ChannelPipeline::builder()
        .add_outbound("prepend", LengthFieldPrepender::new())
        .add_outbound("wrap", ByteArrayEncoder::new())
        .build()
}

/// 入站链：线缆字节 → 分帧 → 字节提取 → 汇入应用队列。
fn inbound_pipeline(max_frame_len: usize) -> ChannelPipeline {
    ChannelPipeline::builder()
        .add_inbound(
            "frame",
            LengthFieldFrameDecoder::with_max_frame_len(max_frame_len),
        )
        .add_inbound("extract", ByteArrayDecoder::new())
        .build()
}

fn wire_bytes(pipeline: &ChannelPipeline) -> Vec<u8> {
    let mut outbox = pipeline.take_outbound();
    assert_eq!(outbox.len(), 1, "exactly one wire buffer expected");
    match outbox.remove(0) {
        PipelineMessage::Buffer(buffer) => buffer.try_into_vec().expect("flatten wire buffer"),
        other => panic!("expected buffer message, got {:?}", other),
    }
}

fn take_payloads(pipeline: &ChannelPipeline) -> Vec<ExtractedBytes> {
    pipeline
        .take_inbound()
        .into_iter()
        .map(|msg| match msg {
            PipelineMessage::User(any) => *any
                .downcast::<ExtractedBytes>()
                .expect("payload is extracted bytes"),
            other => panic!("expected user message, got {:?}", other),
        })
        .collect()
}

#[test]
fn outbound_bytes_survive_the_full_round_trip() {
    let outbound = outbound_pipeline();
    outbound
        .write(PipelineMessage::user(Bytes::from_static(b"flare round trip")))
        .expect("write succeeds");
    let wire = wire_bytes(&outbound);

    // 线缆字节被任意切碎后依旧还原出原始载荷。
    let inbound = inbound_pipeline(1024);
    for fragment in wire.chunks(3) {
        inbound.fire_read(PipelineMessage::from_buffer(Box::new(
            RegionBuffer::from_bytes(Bytes::copy_from_slice(fragment)),
        )));
    }

    let payloads = take_payloads(&inbound);
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].as_slice(), b"flare round trip");
    // 分帧产物是全窗口缓冲，提取阶段应当命中零拷贝路径。
    assert!(payloads[0].is_shared());
}

#[test]
fn multiple_messages_keep_their_boundaries() {
    let outbound = outbound_pipeline();
    for payload in [&b"alpha"[..], &b"beta"[..], &b"gamma"[..]] {
        outbound
            .write(PipelineMessage::user(Bytes::copy_from_slice(payload)))
            .expect("write succeeds");
    }
    let wire: Vec<u8> = outbound
        .take_outbound()
        .into_iter()
        .flat_map(|msg| match msg {
            PipelineMessage::Buffer(buffer) => {
                buffer.try_into_vec().expect("flatten wire buffer")
            }
            other => panic!("expected buffer message, got {:?}", other),
        })
        .collect();

    // 三条消息粘连成一次读取，边界仍由长度前缀恢复。
    let inbound = inbound_pipeline(1024);
    inbound.fire_read(PipelineMessage::from_buffer(Box::new(
        RegionBuffer::from_bytes(Bytes::from(wire)),
    )));

    let payloads = take_payloads(&inbound);
    let contents: Vec<&[u8]> = payloads.iter().map(|p| p.as_slice()).collect();
    assert_eq!(contents, vec![&b"alpha"[..], &b"beta"[..], &b"gamma"[..]]);
}

#[test]
fn valid_frame_before_violation_reaches_the_application() {
    // 同一次读取里合法帧在前、超预算帧在后：合法载荷照常抵达应用层，
    // 异常在其后上报，不连坐。
    let outbound = outbound_pipeline();
    outbound
        .write(PipelineMessage::user(Bytes::from_static(b"ok")))
        .expect("write succeeds");
    outbound
        .write(PipelineMessage::user(vec![0u8; 64]))
        .expect("write succeeds");
    let wire: Vec<u8> = outbound
        .take_outbound()
        .into_iter()
        .flat_map(|msg| match msg {
            PipelineMessage::Buffer(buffer) => {
                buffer.try_into_vec().expect("flatten wire buffer")
            }
            other => panic!("expected buffer message, got {:?}", other),
        })
        .collect();

    let inbound = inbound_pipeline(16);
    inbound.fire_read(PipelineMessage::from_buffer(Box::new(
        RegionBuffer::from_bytes(Bytes::from(wire)),
    )));

    let payloads = take_payloads(&inbound);
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].as_slice(), b"ok");
    let errors = inbound.take_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code(), codes::PROTOCOL_BUDGET_EXCEEDED);
}

#[test]
fn over_budget_frame_surfaces_protocol_error() {
    let outbound = outbound_pipeline();
    outbound
        .write(PipelineMessage::user(vec![0u8; 64]))
        .expect("write succeeds");
    let wire = wire_bytes(&outbound);

    let inbound = inbound_pipeline(16);
    inbound.fire_read(PipelineMessage::from_buffer(Box::new(
        RegionBuffer::from_bytes(Bytes::from(wire)),
    )));

    assert!(take_payloads(&inbound).is_empty());
    let errors = inbound.take_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code(), codes::PROTOCOL_BUDGET_EXCEEDED);
}
