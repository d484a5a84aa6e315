//! 厂商编解码器注册表.
//!
//! 按身份键 `(vendor_id, codec_id)` 查找编解码器族. 注册表是一张编译期
//! 确定的静态表, 可以在 `const` 上下文中构造, 运行期没有注册步骤.

use lanyin_core::{A2dpResult, VendorCodecKey};

use crate::codec::VendorCodec;
use crate::codec_index::{CodecIndex, IndexOwner};
use crate::families;

/// 厂商编解码器注册表
#[derive(Clone, Copy)]
pub struct VendorCodecRegistry {
    /// 编解码器族表, 身份键互不重复
    families: &'static [&'static dyn VendorCodec],
}

impl VendorCodecRegistry {
    /// 使用给定的编解码器族表创建注册表
    pub const fn new(families: &'static [&'static dyn VendorCodec]) -> Self {
        Self { families }
    }

    /// 按 cargo feature 编译进来的全部内置编解码器族
    pub const fn builtin() -> Self {
        Self::new(families::BUILTIN)
    }

    /// 按身份键查找编解码器族
    ///
    /// 返回 `None` 表示未知的厂商编解码器, 这是正常结果.
    pub fn resolve(&self, key: VendorCodecKey) -> Option<&'static dyn VendorCodec> {
        self.families.iter().copied().find(|family| family.key() == key)
    }

    /// 从能力缓冲区读取身份键并查找编解码器族
    ///
    /// 缓冲区过短时返回 [`lanyin_core::A2dpError::TruncatedBuffer`].
    pub fn resolve_codec_info(
        &self,
        codec_info: &[u8],
    ) -> A2dpResult<Option<&'static dyn VendorCodec>> {
        let key = VendorCodecKey::from_codec_info(codec_info)?;
        Ok(self.resolve(key))
    }

    /// 已注册的编解码器族
    pub fn families(&self) -> &'static [&'static dyn VendorCodec] {
        self.families
    }

    /// 编解码器索引所属的编解码器族
    ///
    /// 标准编解码器, 未实现的索引, 以及所属族未编译进来的索引返回 `None`.
    pub fn family_for_index(&self, index: CodecIndex) -> Option<&'static dyn VendorCodec> {
        match index.owner() {
            IndexOwner::Vendor(key) => self.resolve(key),
            IndexOwner::Standard | IndexOwner::Unimplemented => None,
        }
    }
}

impl Default for VendorCodecRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for VendorCodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.families.iter().map(|family| family.name()))
            .finish()
    }
}
