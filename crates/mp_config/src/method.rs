// crates/mp_config/src/method.rs

//! 种子方法选择器
//!
//! 字符串区分大小写：`points`、`patch`、`backTrack`。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 种子方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SeedMethod {
    /// 显式坐标列表
    Points,
    /// patch 质心，方向自动判断（或由 `direction` 指定）
    Patch,
    /// 出口 patch 质心，反向追踪
    BackTrack,
}

impl SeedMethod {
    /// 全部方法
    pub const ALL: [SeedMethod; 3] = [Self::Points, Self::Patch, Self::BackTrack];

    /// 配置中的名称
    pub fn name(self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::Patch => "patch",
            Self::BackTrack => "backTrack",
        }
    }

    /// 是否需要 patch 名称
    #[inline]
    pub fn needs_patch(self) -> bool {
        !matches!(self, Self::Points)
    }
}

impl fmt::Display for SeedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SeedMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| ConfigError::UnknownMethod(s.to_string()))
    }
}

impl TryFrom<String> for SeedMethod {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SeedMethod> for String {
    fn from(method: SeedMethod) -> Self {
        method.name().to_string()
    }
}
