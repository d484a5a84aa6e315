//! 声道相关定义.
//!
//! 接收端 (sink) 播放轨道的声道类型沿用 Android 音频轨道的取值:
//! 单声道为 1, 立体声为 3 (左右两个声道位).

use std::fmt;

/// 接收端播放轨道的声道类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkChannelType {
    /// 单声道
    Mono,
    /// 立体声 (双声道模式也按立体声输出)
    Stereo,
}

impl SinkChannelType {
    /// 对外报告的整数值
    pub const fn as_u32(&self) -> u32 {
        match self {
            Self::Mono => 1,
            Self::Stereo => 3,
        }
    }
}

impl fmt::Display for SinkChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mono => write!(f, "mono"),
            Self::Stereo => write!(f, "stereo"),
        }
    }
}
