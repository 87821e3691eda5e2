//! 字节提取/包装阶段在真实链路中的行为契约。

use bytes::Bytes;
use flare_buffer::RegionBuffer;
use flare_codec_bytes::{ByteArrayDecoder, ByteArrayEncoder, ExtractedBytes};
use flare_core::{Pipeline, buffer::PipelineMessage};
use flare_pipeline::ChannelPipeline;

fn take_extracted(pipeline: &ChannelPipeline) -> ExtractedBytes {
    let mut inbox = pipeline.take_inbound();
    assert_eq!(inbox.len(), 1, "exactly one message should reach the app");
    match inbox.remove(0) {
        PipelineMessage::User(any) => *any
            .downcast::<ExtractedBytes>()
            .expect("payload is extracted bytes"),
        other => panic!("expected user message, got {:?}", other),
    }
}

#[test]
fn decoder_delivers_shared_payload_for_full_window_buffers() {
    let pipeline = ChannelPipeline::builder()
        .add_inbound("extract", ByteArrayDecoder::new())
        .build();

    let buffer = RegionBuffer::from_vec(vec![10, 20, 30]);
    pipeline.fire_read(PipelineMessage::from_buffer(Box::new(buffer)));

    let extracted = take_extracted(&pipeline);
    assert!(extracted.is_shared());
    assert_eq!(extracted.as_slice(), &[10, 20, 30]);
}

#[test]
fn decoder_delivers_copied_payload_for_offset_regions() {
    let pipeline = ChannelPipeline::builder()
        .add_inbound("extract", ByteArrayDecoder::new())
        .build();

    let region = RegionBuffer::with_region(Bytes::from(vec![0, 0, 9, 8, 7, 6, 5, 0, 0, 0]), 2, 7)
        .expect("valid region");
    pipeline.fire_read(PipelineMessage::from_buffer(Box::new(region)));

    let extracted = take_extracted(&pipeline);
    assert!(!extracted.is_shared());
    assert_eq!(extracted.as_slice(), &[9, 8, 7, 6, 5]);
}

#[test]
fn decoder_forwards_foreign_messages_untouched() {
    #[derive(Debug, PartialEq)]
    struct Heartbeat(u8);

    let pipeline = ChannelPipeline::builder()
        .add_inbound("extract", ByteArrayDecoder::new())
        .build();
    pipeline.fire_read(PipelineMessage::user(Heartbeat(3)));

    let mut inbox = pipeline.take_inbound();
    match inbox.remove(0) {
        PipelineMessage::User(any) => {
            let heartbeat = any.downcast::<Heartbeat>().expect("heartbeat untouched");
            assert_eq!(*heartbeat, Heartbeat(3));
        }
        other => panic!("expected user message, got {:?}", other),
    }
}

#[test]
fn encoder_wraps_outbound_bytes_into_buffers() {
    let pipeline = ChannelPipeline::builder()
        .add_outbound("wrap", ByteArrayEncoder::new())
        .build();

    pipeline
        .write(PipelineMessage::user(Bytes::from_static(b"flare")))
        .expect("write succeeds");

    let mut outbox = pipeline.take_outbound();
    assert_eq!(outbox.len(), 1);
    match outbox.remove(0) {
        PipelineMessage::Buffer(buffer) => {
            assert_eq!(buffer.chunk(), b"flare");
            assert_eq!(buffer.remaining(), buffer.capacity());
        }
        other => panic!("expected buffer message, got {:?}", other),
    }
}
