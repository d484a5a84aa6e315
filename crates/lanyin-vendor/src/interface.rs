//! 编码器/解码器接口句柄.
//!
//! 注册表只负责把能力缓冲区解析到对应的流式变换实现, 返回的句柄是
//! 不透明的静态描述, 实际的编解码调用在本 crate 之外进行.

use lanyin_core::VendorCodecKey;

/// 编码器接口句柄
#[derive(Debug, PartialEq, Eq)]
pub struct EncoderInterface {
    /// 编码器名称
    pub name: &'static str,
    /// 所属编解码器族的身份键
    pub key: VendorCodecKey,
}

/// 解码器接口句柄
#[derive(Debug, PartialEq, Eq)]
pub struct DecoderInterface {
    /// 解码器名称
    pub name: &'static str,
    /// 所属编解码器族的身份键
    pub key: VendorCodecKey,
}
