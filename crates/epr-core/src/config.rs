//! 引擎配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::component::Category;
use crate::{EprError, Result};

/// 引擎配置（一個客戶的一個工廠）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// 客戶名稱（代碼前綴取前 3 字元）
    pub client_name: String,

    /// 工廠名稱（組件代碼前綴取前 4 字元）
    pub plant_name: String,

    /// 各類別再生料目標（百分比）
    pub category_targets: Vec<CategoryTarget>,

    /// 厚度下限規則
    pub thickness_policy: ThicknessPolicy,

    /// 流水號取得方式
    pub sequence_mode: SequenceMode,
}

impl EngineConfig {
    /// 創建新的引擎配置（預設法規目標）
    pub fn new(client_name: &str, plant_name: &str) -> Self {
        Self {
            client_name: client_name.to_string(),
            plant_name: plant_name.to_string(),
            ..Self::default()
        }
    }

    /// 從 JSON 載入並驗證
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置類別目標（覆蓋同類別的既有目標）
    pub fn with_category_target(mut self, category: Category, target_percent: Decimal) -> Self {
        self.category_targets.retain(|t| t.category != category);
        self.category_targets.push(CategoryTarget {
            category,
            target_percent,
        });
        self
    }

    /// 建構器模式：設置厚度規則
    pub fn with_thickness_policy(mut self, policy: ThicknessPolicy) -> Self {
        self.thickness_policy = policy;
        self
    }

    /// 建構器模式：設置流水號模式
    pub fn with_sequence_mode(mut self, mode: SequenceMode) -> Self {
        self.sequence_mode = mode;
        self
    }

    /// 查詢類別目標
    pub fn target_for(&self, category: &str) -> Option<Decimal> {
        self.category_targets
            .iter()
            .find(|t| t.category.as_ref() == category)
            .map(|t| t.target_percent)
    }

    /// 驗證配置
    pub fn validate(&self) -> Result<()> {
        for (i, target) in self.category_targets.iter().enumerate() {
            if target.target_percent < Decimal::ZERO || target.target_percent > Decimal::ONE_HUNDRED {
                return Err(EprError::InvalidConfig(format!(
                    "{} 的目標必須介於 0 到 100: {}",
                    target.category, target.target_percent
                )));
            }

            if self.category_targets[..i]
                .iter()
                .any(|t| t.category == target.category)
            {
                return Err(EprError::InvalidConfig(format!(
                    "{} 的目標重複設定",
                    target.category
                )));
            }
        }

        self.thickness_policy.validate()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            client_name: String::new(),
            plant_name: String::new(),
            category_targets: vec![
                CategoryTarget {
                    category: Category::CategoryI,
                    target_percent: Decimal::from(30),
                },
                CategoryTarget {
                    category: Category::CategoryII,
                    target_percent: Decimal::from(10),
                },
            ],
            thickness_policy: ThicknessPolicy::default(),
            sequence_mode: SequenceMode::Counter,
        }
    }
}

/// 類別再生料目標
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTarget {
    pub category: Category,
    /// 目標百分比（0–100）
    pub target_percent: Decimal,
}

/// 流水號取得方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SequenceMode {
    /// 每個前綴一個單調遞增計數器（首次使用時由既有代碼初始化）
    Counter,
    /// 每次掃描既有代碼取最大值 + 1（舊行為；同一輪建立多列可能重號）
    Rescan,
}

/// 厚度下限規則（微米，必須「大於」下限才合規）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThicknessPolicy {
    /// 沒有細分規則時的下限
    pub default_min_micron: Decimal,

    /// 第二類細分的下限（比對不分大小寫）
    pub category_ii_rules: Vec<ThicknessRule>,
}

impl ThicknessPolicy {
    /// 查詢下限；不適用的類別回傳 `None`
    pub fn min_thickness(&self, category: Option<Category>, category_ii_type: &str) -> Option<Decimal> {
        match category? {
            Category::CategoryII => {
                let kind = category_ii_type.trim();
                let min = self
                    .category_ii_rules
                    .iter()
                    .find(|r| r.category_ii_type.eq_ignore_ascii_case(kind))
                    .map(|r| r.min_micron)
                    .unwrap_or(self.default_min_micron);
                Some(min)
            }
            Category::CategoryI | Category::CategoryIII => Some(self.default_min_micron),
            Category::CategoryIV | Category::NotApplicable => None,
        }
    }

    fn validate(&self) -> Result<()> {
        let non_positive = self.default_min_micron <= Decimal::ZERO
            || self.category_ii_rules.iter().any(|r| r.min_micron <= Decimal::ZERO);
        if non_positive {
            return Err(EprError::InvalidConfig("厚度下限必須大於 0".to_string()));
        }
        Ok(())
    }
}

impl Default for ThicknessPolicy {
    fn default() -> Self {
        Self {
            default_min_micron: Decimal::from(50),
            category_ii_rules: vec![
                ThicknessRule::new("Carry Bags", Decimal::from(120)),
                ThicknessRule::new("Non Woven Carry Bags", Decimal::from(60)),
            ],
        }
    }
}

/// 第二類細分厚度規則
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThicknessRule {
    #[serde(rename = "categoryIIType")]
    pub category_ii_type: String,
    pub min_micron: Decimal,
}

impl ThicknessRule {
    pub fn new(category_ii_type: &str, min_micron: Decimal) -> Self {
        Self {
            category_ii_type: category_ii_type.to_string(),
            min_micron,
        }
    }
}
