//! 計量單位

use serde::{Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// 採購／消耗數量的計量單位
///
/// 不認得的單位保留原文（`Other`），噸數換算時會沿用原本的值。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Uom {
    /// 公噸
    Mt,
    /// 公斤
    Kg,
    /// 件
    Units,
    /// 卷
    Roll,
    /// 個
    Nos,
    /// 不適用（數量與單重會被歸零）
    NotApplicable,
    /// 其他單位
    Other(String),
}

impl Uom {
    pub fn as_str(&self) -> &str {
        match self {
            Uom::Mt => "MT",
            Uom::Kg => "KG",
            Uom::Units => "Units",
            Uom::Roll => "Roll",
            Uom::Nos => "Nos",
            Uom::NotApplicable => "Not Applicable",
            Uom::Other(label) => label,
        }
    }

    /// 是否以「件數 × 單重」換算
    pub fn is_countable(&self) -> bool {
        matches!(self, Uom::Units | Uom::Nos | Uom::Roll)
    }
}

impl FromStr for Uom {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let uom = match trimmed.to_ascii_lowercase().as_str() {
            "mt" => Uom::Mt,
            "kg" => Uom::Kg,
            "units" => Uom::Units,
            "roll" => Uom::Roll,
            "nos" => Uom::Nos,
            "not applicable" => Uom::NotApplicable,
            _ => Uom::Other(trimmed.to_string()),
        };
        Ok(uom)
    }
}

impl fmt::Display for Uom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Uom {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
