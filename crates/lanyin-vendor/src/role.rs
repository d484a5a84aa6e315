//! 编解码器角色.
//!
//! 每个编解码器族显式声明自己支持的角色集合, 分发层统一查询,
//! 不从各操作的分支结构中推断.

use std::fmt;

use bitflags::bitflags;

/// 被评估能力所属的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// 本地源端
    LocalSource,
    /// 本地接收端
    LocalSink,
    /// 对端源端
    PeerSource,
    /// 对端接收端
    PeerSink,
}

impl Role {
    /// 全部角色
    pub const ALL: [Role; 4] = [
        Self::LocalSource,
        Self::LocalSink,
        Self::PeerSource,
        Self::PeerSink,
    ];

    /// 对应的单元素角色集合
    pub const fn as_set(&self) -> RoleSet {
        match self {
            Self::LocalSource => RoleSet::LOCAL_SOURCE,
            Self::LocalSink => RoleSet::LOCAL_SINK,
            Self::PeerSource => RoleSet::PEER_SOURCE,
            Self::PeerSink => RoleSet::PEER_SINK,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LocalSource => "local-source",
            Self::LocalSink => "local-sink",
            Self::PeerSource => "peer-source",
            Self::PeerSink => "peer-sink",
        };
        write!(f, "{name}")
    }
}

bitflags! {
    /// 角色集合
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RoleSet: u8 {
        /// 本地源端
        const LOCAL_SOURCE = 1 << 0;
        /// 本地接收端
        const LOCAL_SINK   = 1 << 1;
        /// 对端源端
        const PEER_SOURCE  = 1 << 2;
        /// 对端接收端
        const PEER_SINK    = 1 << 3;
    }
}

impl RoleSet {
    /// 仅作为源端参与协商: 本地源端, 对端接收端
    pub const SOURCE_ONLY: Self = Self::LOCAL_SOURCE.union(Self::PEER_SINK);

    /// 是否支持指定角色
    pub const fn supports(&self, role: Role) -> bool {
        self.contains(role.as_set())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_角色集合查询() {
        assert!(RoleSet::SOURCE_ONLY.supports(Role::LocalSource));
        assert!(RoleSet::SOURCE_ONLY.supports(Role::PeerSink));
        assert!(!RoleSet::SOURCE_ONLY.supports(Role::LocalSink));
        assert!(!RoleSet::SOURCE_ONLY.supports(Role::PeerSource));
        assert!(Role::ALL.iter().all(|r| RoleSet::all().supports(*r)));
    }
}
