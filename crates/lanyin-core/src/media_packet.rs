//! 媒体数据包.
//!
//! 待发送的一包已编码音频. 缓冲区前部预留头部空间, 编解码器头部
//! 通过 [`MediaPacket::prepend`] 写入负载之前, 不移动负载数据.

use bytes::{Bytes, BytesMut};

use crate::{A2dpError, A2dpResult};

/// 媒体数据包
#[derive(Debug, Clone)]
pub struct MediaPacket {
    /// 底层缓冲区 (头部空间 + 有效数据)
    buf: BytesMut,
    /// 有效数据起始偏移, 同时也是剩余头部空间
    offset: usize,
    /// 有效数据长度
    len: usize,
}

impl MediaPacket {
    /// 创建带头部空间的数据包, 负载复制到头部空间之后
    pub fn with_headroom(headroom: usize, payload: &[u8]) -> Self {
        let mut buf = BytesMut::zeroed(headroom + payload.len());
        buf[headroom..].copy_from_slice(payload);
        Self {
            buf,
            offset: headroom,
            len: payload.len(),
        }
    }

    /// 有效数据起始偏移
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 剩余头部空间
    pub fn headroom(&self) -> usize {
        self.offset
    }

    /// 有效数据长度 (字节)
    pub fn len(&self) -> usize {
        self.len
    }

    /// 是否没有有效数据
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 有效数据
    pub fn data(&self) -> &[u8] {
        &self.buf[self.offset..self.offset + self.len]
    }

    /// 在有效数据之前扩展 `n` 字节并返回这段可写区域
    ///
    /// 头部空间不足时返回 [`A2dpError::NoHeadroom`], 数据包保持不变.
    pub fn prepend(&mut self, n: usize) -> A2dpResult<&mut [u8]> {
        if n > self.offset {
            return Err(A2dpError::NoHeadroom {
                needed: n,
                available: self.offset,
            });
        }
        self.offset -= n;
        self.len += n;
        Ok(&mut self.buf[self.offset..self.offset + n])
    }

    /// 转换为不可变字节, 只保留有效数据
    pub fn freeze(self) -> Bytes {
        let end = self.offset + self.len;
        self.buf.freeze().slice(self.offset..end)
    }
}
