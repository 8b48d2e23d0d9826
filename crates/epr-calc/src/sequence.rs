//! 前綴流水號計數器

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 可登記的最大流水號；超過的結尾數字不視為流水號
pub const MAX_SEQUENCE: u32 = 999_999_999;

/// 每個代碼前綴一個單調遞增的計數器
///
/// 與工作簿一起保存。首次遇到的前綴從 0 開始，
/// 載入既有資料時透過 [`SequenceCounter::observe_code`] 把既有代碼登記進來，
/// 之後只會往前走，同一前綴不會發出重複號碼。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceCounter {
    /// 前綴 → 已發出（或已觀察到）的最大號碼
    issued: BTreeMap<String, u32>,
}

impl SequenceCounter {
    /// 創建空的計數器
    pub fn new() -> Self {
        Self::default()
    }

    /// 取得前綴的下一個號碼
    pub fn next_sequence(&mut self, prefix: &str) -> u32 {
        let last = self.issued.entry(prefix.to_string()).or_insert(0);
        *last = last.saturating_add(1);
        tracing::debug!("前綴 {} 發出流水號 {}", prefix, *last);
        *last
    }

    /// 登記某前綴已存在的號碼（只會往上調，超過 [`MAX_SEQUENCE`] 的號碼忽略）
    pub fn observe(&mut self, prefix: &str, sequence: u32) {
        if sequence > MAX_SEQUENCE {
            tracing::warn!("前綴 {} 的流水號 {} 超出範圍，不登記", prefix, sequence);
            return;
        }
        let last = self.issued.entry(prefix.to_string()).or_insert(0);
        if sequence > *last {
            *last = sequence;
        }
    }

    /// 登記一個完整代碼：結尾的數字為號碼，其前為前綴
    ///
    /// 沒有結尾數字的代碼（或空字串、號碼超出範圍）不登記，回傳 `false`。
    pub fn observe_code(&mut self, code: &str) -> bool {
        match split_code(code) {
            Some((prefix, sequence)) => {
                self.observe(prefix, sequence);
                true
            }
            None => false,
        }
    }

    /// 目前前綴的最大號碼
    pub fn current(&self, prefix: &str) -> u32 {
        self.issued.get(prefix).copied().unwrap_or(0)
    }

    /// 已追蹤的前綴數量
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}

/// 把代碼拆成（前綴, 結尾號碼）
pub fn split_code(code: &str) -> Option<(&str, u32)> {
    let code = code.trim();
    let digits_start = code
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;

    let sequence = parse_sequence(&code[digits_start..])?;
    Some((&code[..digits_start], sequence))
}

/// 解析純數字流水號；超過 [`MAX_SEQUENCE`] 回傳 `None`
pub fn parse_sequence(digits: &str) -> Option<u32> {
    digits
        .parse::<u32>()
        .ok()
        .filter(|sequence| *sequence <= MAX_SEQUENCE)
}
