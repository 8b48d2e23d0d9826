//! 代碼指派（系統代碼、組件代碼、供應商代碼）
//!
//! 代碼格式為「前綴 + 三位數流水號」。指派新代碼前一定先查既有列：
//! 自然鍵相同就沿用既有代碼，不產生新號碼。

use epr_core::{ComponentRow, ProductRow, RowId};

use crate::sequence::parse_sequence;

/// 流水號最小寬度
pub const SEQUENCE_WIDTH: usize = 3;

/// 客戶名稱空白時的縮寫
pub const DEFAULT_CLIENT: &str = "UNK";

/// 工廠名稱空白時的縮寫
pub const DEFAULT_PLANT: &str = "PLT";

/// 供應商名稱空白時的縮寫
pub const DEFAULT_SUPPLIER: &str = "UNK";

/// 組件自然鍵 `(skuCode, componentDescription)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentKey {
    pub sku_code: String,
    pub component_description: String,
}

impl ComponentKey {
    pub fn new(sku_code: &str, component_description: &str) -> Self {
        Self {
            sku_code: sku_code.to_string(),
            component_description: component_description.to_string(),
        }
    }

    pub fn of_product(row: &ProductRow) -> Self {
        Self::new(&row.sku_code, &row.component_description)
    }

    pub fn of_component(row: &ComponentRow) -> Self {
        Self::new(&row.sku_code, &row.component_description)
    }

    fn matches(&self, sku_code: &str, component_description: &str) -> bool {
        self.sku_code == sku_code && self.component_description == component_description
    }
}

/// 代碼指派器
pub struct CodeAssigner;

impl CodeAssigner {
    /// 客戶縮寫：前 3 字元大寫
    pub fn client_abbrev(client_name: &str) -> String {
        abbreviate(client_name, 3, DEFAULT_CLIENT).to_uppercase()
    }

    /// 工廠縮寫：前 4 字元
    pub fn plant_abbrev(plant_name: &str) -> String {
        abbreviate(plant_name, 4, DEFAULT_PLANT)
    }

    /// 供應商縮寫：前 3 字元大寫
    pub fn supplier_abbrev(supplier_name: &str) -> String {
        abbreviate(supplier_name, 3, DEFAULT_SUPPLIER).to_uppercase()
    }

    /// 組件代碼前綴 `{客戶}/{工廠}/Com/`
    pub fn component_prefix(client_name: &str, plant_name: &str) -> String {
        format!(
            "{}/{}/Com/",
            Self::client_abbrev(client_name),
            Self::plant_abbrev(plant_name)
        )
    }

    /// 供應商代碼前綴 `{供應商}/{客戶}/`
    pub fn supplier_prefix(supplier_name: &str, client_name: &str) -> String {
        format!(
            "{}/{}/",
            Self::supplier_abbrev(supplier_name),
            Self::client_abbrev(client_name)
        )
    }

    /// 系統代碼前綴 `{客戶}/Com/`
    pub fn system_prefix(client_name: &str) -> String {
        format!("{}/Com/", Self::client_abbrev(client_name))
    }

    /// 組出代碼（流水號補零至三位）
    pub fn format_code(prefix: &str, sequence: u32) -> String {
        format!("{}{:0width$}", prefix, sequence, width = SEQUENCE_WIDTH)
    }

    /// 取出代碼在指定前綴下的流水號；前綴不符、結尾不是純數字或號碼超出範圍時回傳 `None`
    pub fn sequence_of(code: &str, prefix: &str) -> Option<u32> {
        let suffix = code.strip_prefix(prefix)?;
        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        parse_sequence(suffix)
    }

    /// 掃描既有代碼，取該前綴下的最大流水號（沒有則為 0）
    pub fn max_sequence<'a, I>(codes: I, prefix: &str) -> u32
    where
        I: IntoIterator<Item = &'a str>,
    {
        codes
            .into_iter()
            .filter_map(|code| Self::sequence_of(code, prefix))
            .max()
            .unwrap_or(0)
    }

    /// 依自然鍵查既有組件代碼（先查產品列，再查組件列）
    pub fn find_component_code<'a>(
        products: &'a [ProductRow],
        components: &'a [ComponentRow],
        key: &ComponentKey,
        exclude: Option<RowId>,
    ) -> Option<&'a str> {
        let from_products = products
            .iter()
            .filter(|row| Some(row.id) != exclude)
            .filter(|row| !row.component_code.is_empty())
            .find(|row| key.matches(&row.sku_code, &row.component_description))
            .map(|row| row.component_code.as_str());

        from_products.or_else(|| {
            components
                .iter()
                .filter(|row| Some(row.id) != exclude)
                .filter(|row| !row.component_code.is_empty())
                .find(|row| key.matches(&row.sku_code, &row.component_description))
                .map(|row| row.component_code.as_str())
        })
    }

    /// 依供應商名稱（不分大小寫）查既有供應商代碼
    pub fn find_supplier_code<'a>(
        products: &'a [ProductRow],
        supplier_name: &str,
        exclude: Option<RowId>,
    ) -> Option<&'a str> {
        products
            .iter()
            .filter(|row| Some(row.id) != exclude)
            .filter(|row| !row.supplier_code.is_empty())
            .find(|row| row.same_supplier(supplier_name))
            .map(|row| row.supplier_code.as_str())
    }

    /// 指派組件代碼：自然鍵已存在則沿用，否則掃描最大號 + 1
    pub fn assign_component_code(
        products: &[ProductRow],
        components: &[ComponentRow],
        client_name: &str,
        plant_name: &str,
        key: &ComponentKey,
    ) -> String {
        if let Some(code) = Self::find_component_code(products, components, key, None) {
            tracing::debug!("沿用組件代碼 {}（{:?}）", code, key);
            return code.to_string();
        }

        let prefix = Self::component_prefix(client_name, plant_name);
        let codes = products
            .iter()
            .map(|row| row.component_code.as_str())
            .chain(components.iter().map(|row| row.component_code.as_str()));
        let next = Self::max_sequence(codes, &prefix).saturating_add(1);

        Self::format_code(&prefix, next)
    }

    /// 指派供應商代碼：供應商已存在則沿用，否則掃描最大號 + 1
    pub fn assign_supplier_code(
        products: &[ProductRow],
        supplier_name: &str,
        client_name: &str,
    ) -> String {
        if let Some(code) = Self::find_supplier_code(products, supplier_name, None) {
            tracing::debug!("沿用供應商代碼 {}（{}）", code, supplier_name);
            return code.to_string();
        }

        let prefix = Self::supplier_prefix(supplier_name, client_name);
        let codes = products.iter().map(|row| row.supplier_code.as_str());
        let next = Self::max_sequence(codes, &prefix).saturating_add(1);

        Self::format_code(&prefix, next)
    }

    /// 指派系統代碼：掃描產品列的最大號 + 1
    pub fn assign_system_code(products: &[ProductRow], client_name: &str) -> String {
        let prefix = Self::system_prefix(client_name);
        let codes = products.iter().map(|row| row.system_code.as_str());
        let next = Self::max_sequence(codes, &prefix).saturating_add(1);

        Self::format_code(&prefix, next)
    }

    /// 為缺少系統代碼的舊資料補上代碼（依顯示順序），回傳補上的筆數
    pub fn backfill_system_codes(products: &mut [ProductRow], client_name: &str) -> usize {
        let prefix = Self::system_prefix(client_name);
        let mut last = Self::max_sequence(
            products.iter().map(|row| row.system_code.as_str()),
            &prefix,
        );
        let mut filled = 0;

        for row in products.iter_mut().filter(|row| row.system_code.trim().is_empty()) {
            last = last.saturating_add(1);
            row.system_code = Self::format_code(&prefix, last);
            filled += 1;
        }

        if filled > 0 {
            tracing::info!("補上 {} 筆系統代碼", filled);
        }

        filled
    }
}

/// 取前 n 個字元；空白時使用預設值
fn abbreviate(name: &str, len: usize, fallback: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return fallback.to_string();
    }
    trimmed.chars().take(len).collect()
}
