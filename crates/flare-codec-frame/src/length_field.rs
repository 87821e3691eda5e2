use alloc::{boxed::Box, vec::Vec};

use bytes::BytesMut;
use flare_buffer::RegionBuffer;
use flare_core::{
    CoreError, ErasedBuf, InboundHandler, OutboundHandler, ReadableBuffer, WriteSignal,
    buffer::PipelineMessage,
    error::codes,
    pipeline::Context,
};
use spin::Mutex;

/// 长度字段固定为 4 字节大端 `u32`。
const LENGTH_FIELD_LEN: usize = 4;

/// `LengthFieldPrepender` 在出站缓冲前加上 4 字节大端长度前缀。
///
/// # 契约说明（What）
/// - 仅处理缓冲消息，前缀值为缓冲当前可读字节数；
/// - 载荷长度超出 `u32` 表示范围时返回 [`codes::PROTOCOL_BUDGET_EXCEEDED`]，
///   消息不再下行；
/// - 非缓冲消息原样转发，便于与字节包装阶段自由组合。
#[derive(Debug, Default)]
pub struct LengthFieldPrepender;

impl LengthFieldPrepender {
    /// 创建新的加前缀阶段实例。
    pub const fn new() -> Self {
        Self
    }

    fn prepend(&self, buffer: Box<ErasedBuf>) -> Result<PipelineMessage, CoreError> {
        let payload = buffer.try_into_vec()?;
        let length = u32::try_from(payload.len()).map_err(|_| {
            CoreError::new(
                codes::PROTOCOL_BUDGET_EXCEEDED,
                "payload length exceeds u32 length field",
            )
        })?;

        let mut framed = Vec::with_capacity(LENGTH_FIELD_LEN + payload.len());
        framed.extend_from_slice(&length.to_be_bytes());
        framed.extend_from_slice(&payload);
        Ok(PipelineMessage::from_buffer(Box::new(
            RegionBuffer::from_vec(framed),
        )))
    }
}

impl OutboundHandler for LengthFieldPrepender {
    fn name(&self) -> &str {
        "length-field-prepender"
    }

    fn on_write(
        &self,
        ctx: &dyn Context,
        msg: PipelineMessage,
    ) -> Result<WriteSignal, CoreError> {
        match msg {
            PipelineMessage::Buffer(buffer) => ctx.forward_write(self.prepend(buffer)?),
            other => ctx.forward_write(other),
        }
    }
}

/// `LengthFieldFrameDecoder` 把入站字节流按长度前缀切分为完整帧。
///
/// # 逻辑解析（How）
/// - 每条入站缓冲先整体并入累积区，再循环尝试切帧：
///   读到完整的"前缀 + 载荷"即拆出一帧向后传播，否则停下等待更多字节；
/// - 拆帧产物冻结为引用计数存储上的全窗口缓冲，不复制载荷；
/// - 帧的传播在释放累积区锁之后进行，下游阶段不会在持锁状态下执行。
///
/// # 契约说明（What）
/// - 单帧长度超过预算时触发 [`codes::PROTOCOL_BUDGET_EXCEEDED`] 并清空累积区：
///   长度前缀之后的字节已不可信，继续切分只会放大错位；
/// - 同一次读取中位于违规帧之前、已经切出的完整帧仍按序交付，异常在
///   帧交付之后才上报——合法数据不为后继的违规陪葬；
/// - 碎片顺序由调用方保证，本阶段只做重组不做排序；
/// - 非缓冲消息原样放行。
#[derive(Debug)]
pub struct LengthFieldFrameDecoder {
    max_frame_len: Option<usize>,
    accumulator: Mutex<BytesMut>,
}

impl LengthFieldFrameDecoder {
    /// 创建不限制单帧长度的分帧阶段。
    pub fn new() -> Self {
        Self {
            max_frame_len: None,
            accumulator: Mutex::new(BytesMut::new()),
        }
    }

    /// 创建带单帧预算的分帧阶段，超限帧触发协议异常。
    pub fn with_max_frame_len(max_frame_len: usize) -> Self {
        Self {
            max_frame_len: Some(max_frame_len),
            accumulator: Mutex::new(BytesMut::new()),
        }
    }

    /// 并入新到的字节并切出当前可完整交付的帧。
    ///
    /// 返回"已切出的帧 + 可选异常"：违规帧之前切出的完整帧必须交付，
    /// 因此异常不能以 `Err` 吞掉帧列表，而是与之并列返回。
    fn ingest(
        &self,
        mut buffer: Box<ErasedBuf>,
    ) -> (Vec<PipelineMessage>, Option<CoreError>) {
        let mut accumulator = self.accumulator.lock();
        let mut frames = Vec::new();
        while !buffer.is_empty() {
            let chunk_len = {
                let chunk = buffer.chunk();
                accumulator.extend_from_slice(chunk);
                chunk.len()
            };
            if let Err(error) = buffer.advance(chunk_len) {
                return (frames, Some(error));
            }
        }

        while accumulator.len() >= LENGTH_FIELD_LEN {
            let frame_len = u32::from_be_bytes([
                accumulator[0],
                accumulator[1],
                accumulator[2],
                accumulator[3],
            ]) as usize;

            if let Some(budget) = self.max_frame_len
                && frame_len > budget
            {
                accumulator.clear();
                return (
                    frames,
                    Some(CoreError::new(
                        codes::PROTOCOL_BUDGET_EXCEEDED,
                        "frame length exceeds configured budget",
                    )),
                );
            }

            if accumulator.len() < LENGTH_FIELD_LEN + frame_len {
                break;
            }

            let _prefix = accumulator.split_to(LENGTH_FIELD_LEN);
            let payload = accumulator.split_to(frame_len).freeze();
            frames.push(PipelineMessage::from_buffer(Box::new(
                RegionBuffer::from_bytes(payload),
            )));
        }
        (frames, None)
    }
}

impl Default for LengthFieldFrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl InboundHandler for LengthFieldFrameDecoder {
    fn name(&self) -> &str {
        "length-field-frame-decoder"
    }

    fn on_read(&self, ctx: &dyn Context, msg: PipelineMessage) {
        let buffer = match msg {
            PipelineMessage::Buffer(buffer) => buffer,
            other => {
                ctx.forward_read(other);
                return;
            }
        };

        // 先交付完整帧，再上报异常：违规只影响其后的字节。
        let (frames, error) = self.ingest(buffer);
        for frame in frames {
            ctx.forward_read(frame);
        }
        if let Some(error) = error {
            ctx.fire_exception_caught(error);
        }
    }
}
