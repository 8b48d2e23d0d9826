//! 跨表連結
//!
//! 選定系統代碼或組件代碼時，從來源列帶入典型屬性。
//! 合併是非破壞性的：只填目標中空白的欄位；代碼本身一律覆蓋。

use epr_core::{
    Category, ComponentRow, MonthlyProcurementRow, ProductRow, RecycledUsageRow, Row, RowId,
    SupplierRow,
};

use crate::code_assign::ComponentKey;

/// 可跨表帶入的屬性
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkAttributes {
    pub component_code: String,
    pub component_description: String,
    pub supplier_name: String,
    pub polymer_type: String,
    pub component_polymer: String,
    pub category: Option<Category>,
}

impl LinkAttributes {
    /// 已填寫的屬性數量（選擇較完整來源用）
    pub fn populated(&self) -> usize {
        [
            &self.component_code,
            &self.component_description,
            &self.supplier_name,
            &self.polymer_type,
            &self.component_polymer,
        ]
        .iter()
        .filter(|value| !value.trim().is_empty())
        .count()
            + usize::from(self.category.is_some())
    }
}

impl From<&ProductRow> for LinkAttributes {
    fn from(row: &ProductRow) -> Self {
        Self {
            component_code: row.component_code.clone(),
            component_description: row.component_description.clone(),
            supplier_name: row.supplier_name.clone(),
            ..Self::default()
        }
    }
}

impl From<&ComponentRow> for LinkAttributes {
    fn from(row: &ComponentRow) -> Self {
        Self {
            component_code: row.component_code.clone(),
            component_description: row.component_description.clone(),
            supplier_name: row.supplier_name.clone(),
            polymer_type: row.polymer_type.clone(),
            component_polymer: row.component_polymer.clone(),
            category: row.category,
        }
    }
}

/// 連結的目標列
///
/// 聚合物與類別只有部分集合攜帶，預設實作回傳 `None`。
pub trait LinkTarget: Row {
    fn system_code_mut(&mut self) -> &mut String;

    fn component_code_mut(&mut self) -> &mut String;

    fn component_description_mut(&mut self) -> &mut String;

    fn supplier_name_mut(&mut self) -> &mut String;

    fn system_code(&self) -> &str;

    /// （聚合物類型, 組件聚合物）
    fn polymer_mut(&mut self) -> Option<(&mut String, &mut String)> {
        None
    }

    fn category_mut(&mut self) -> Option<&mut Option<Category>> {
        None
    }
}

macro_rules! link_target_fields {
    () => {
        fn system_code_mut(&mut self) -> &mut String {
            &mut self.system_code
        }

        fn component_code_mut(&mut self) -> &mut String {
            &mut self.component_code
        }

        fn component_description_mut(&mut self) -> &mut String {
            &mut self.component_description
        }

        fn supplier_name_mut(&mut self) -> &mut String {
            &mut self.supplier_name
        }

        fn system_code(&self) -> &str {
            &self.system_code
        }
    };
}

impl LinkTarget for SupplierRow {
    link_target_fields!();
}

impl LinkTarget for ComponentRow {
    link_target_fields!();

    fn polymer_mut(&mut self) -> Option<(&mut String, &mut String)> {
        Some((&mut self.polymer_type, &mut self.component_polymer))
    }

    fn category_mut(&mut self) -> Option<&mut Option<Category>> {
        Some(&mut self.category)
    }
}

impl LinkTarget for MonthlyProcurementRow {
    link_target_fields!();

    fn polymer_mut(&mut self) -> Option<(&mut String, &mut String)> {
        Some((&mut self.polymer_type, &mut self.component_polymer))
    }

    fn category_mut(&mut self) -> Option<&mut Option<Category>> {
        Some(&mut self.category)
    }
}

impl LinkTarget for RecycledUsageRow {
    link_target_fields!();

    fn category_mut(&mut self) -> Option<&mut Option<Category>> {
        Some(&mut self.category)
    }
}

/// 連結來源（工作簿中目前的資料）
#[derive(Debug, Clone, Copy)]
pub struct LinkSources<'a> {
    pub products: &'a [ProductRow],
    pub components: &'a [ComponentRow],
    pub suppliers: &'a [SupplierRow],
}

impl<'a> LinkSources<'a> {
    pub fn new(
        products: &'a [ProductRow],
        components: &'a [ComponentRow],
        suppliers: &'a [SupplierRow],
    ) -> Self {
        Self {
            products,
            components,
            suppliers,
        }
    }

    /// 系統代碼對應的來源屬性：產品列與組件列取較完整者，同分取產品列
    ///
    /// `exclude` 為正在編輯的列，不作為自己的來源。
    pub fn by_system_code(&self, system_code: &str, exclude: Option<RowId>) -> Option<LinkAttributes> {
        let code = system_code.trim();
        if code.is_empty() {
            return None;
        }

        let product = self
            .products
            .iter()
            .filter(|row| Some(row.id) != exclude)
            .find(|row| row.system_code == code)
            .map(LinkAttributes::from);
        let component = self
            .components
            .iter()
            .filter(|row| Some(row.id) != exclude)
            .find(|row| row.system_code == code)
            .map(LinkAttributes::from);

        match (product, component) {
            (Some(product), Some(component)) => {
                if component.populated() > product.populated() {
                    Some(component)
                } else {
                    Some(product)
                }
            }
            (product, component) => product.or(component),
        }
    }

    /// 組件代碼對應的來源屬性：先找組件列，再找產品列
    ///
    /// 供應商名稱優先採用同組件代碼、狀態為已登記的供應商列。
    pub fn by_component_code(
        &self,
        component_code: &str,
        exclude: Option<RowId>,
    ) -> Option<LinkAttributes> {
        let code = component_code.trim();
        if code.is_empty() {
            return None;
        }

        let mut attributes = self
            .components
            .iter()
            .filter(|row| Some(row.id) != exclude)
            .find(|row| row.component_code == code)
            .map(LinkAttributes::from)
            .or_else(|| {
                self.products
                    .iter()
                    .filter(|row| Some(row.id) != exclude)
                    .find(|row| row.component_code == code)
                    .map(LinkAttributes::from)
            })?;

        if let Some(registered) = self.registered_supplier(code, exclude) {
            attributes.supplier_name = registered.to_string();
        }

        Some(attributes)
    }

    fn registered_supplier(&self, component_code: &str, exclude: Option<RowId>) -> Option<&'a str> {
        self.suppliers
            .iter()
            .filter(|row| Some(row.id) != exclude)
            .filter(|row| row.component_code == component_code && row.is_registered())
            .map(|row| row.supplier_name.as_str())
            .find(|name| !name.trim().is_empty())
    }
}

/// 跨表連結器
pub struct CrossTableLinker;

impl CrossTableLinker {
    /// 依系統代碼帶入屬性
    ///
    /// 系統代碼與組件代碼一律覆蓋，其餘欄位只填空白。
    pub fn propagate_from_system_code<T: LinkTarget>(
        sources: &LinkSources<'_>,
        target: &T,
        system_code: &str,
    ) -> T {
        let mut linked = target.clone();
        *linked.system_code_mut() = system_code.to_string();

        match sources.by_system_code(system_code, Some(target.id())) {
            Some(attributes) => {
                tracing::debug!("依系統代碼 {} 帶入 {}", system_code, linked.reference());
                merge(&mut linked, &attributes);
            }
            None => tracing::debug!("系統代碼 {} 沒有來源列", system_code),
        }

        linked
    }

    /// 依組件代碼帶入屬性
    pub fn propagate_from_component_code<T: LinkTarget>(
        sources: &LinkSources<'_>,
        target: &T,
        component_code: &str,
    ) -> T {
        let mut linked = target.clone();
        *linked.component_code_mut() = component_code.to_string();

        if let Some(attributes) = sources.by_component_code(component_code, Some(target.id())) {
            tracing::debug!("依組件代碼 {} 帶入 {}", component_code, linked.reference());
            merge(&mut linked, &attributes);
        }

        linked
    }

    /// 重新連結所有參照某系統代碼的列，只回傳有變動的（索引, 新列）
    pub fn relink_dependents<T: LinkTarget>(
        sources: &LinkSources<'_>,
        rows: &[T],
        system_code: &str,
    ) -> Vec<(usize, T)> {
        if system_code.trim().is_empty() {
            return Vec::new();
        }

        rows.iter()
            .enumerate()
            .filter(|(_, row)| row.system_code() == system_code)
            .filter_map(|(index, row)| {
                let linked = Self::propagate_from_system_code(sources, row, system_code);
                (linked != *row).then_some((index, linked))
            })
            .collect()
    }

    /// 同自然鍵且由引擎指派的產品列共用編輯列的組件代碼，回傳被改動的列
    pub fn sync_component_siblings(products: &mut [ProductRow], edited: RowId) -> Vec<RowId> {
        let Some(source) = products.iter().find(|row| row.id == edited) else {
            return Vec::new();
        };
        if !source.assigns_component_code() || source.component_code.is_empty() {
            return Vec::new();
        }

        let key = ComponentKey::of_product(source);
        let code = source.component_code.clone();
        let mut touched = Vec::new();

        for row in products.iter_mut() {
            if row.id == edited || !row.assigns_component_code() {
                continue;
            }
            if row.same_component_key(&key.sku_code, &key.component_description)
                && row.component_code != code
            {
                row.component_code = code.clone();
                touched.push(row.id);
            }
        }

        touched
    }

    /// 同供應商且由引擎指派的產品列共用編輯列的供應商代碼，回傳被改動的列
    pub fn sync_supplier_siblings(products: &mut [ProductRow], edited: RowId) -> Vec<RowId> {
        let Some(source) = products.iter().find(|row| row.id == edited) else {
            return Vec::new();
        };
        if !source.assigns_supplier_code() || source.supplier_code.is_empty() {
            return Vec::new();
        }

        let supplier_name = source.supplier_name.clone();
        let code = source.supplier_code.clone();
        let mut touched = Vec::new();

        for row in products.iter_mut() {
            if row.id == edited || !row.assigns_supplier_code() {
                continue;
            }
            if row.same_supplier(&supplier_name) && row.supplier_code != code {
                row.supplier_code = code.clone();
                touched.push(row.id);
            }
        }

        touched
    }
}

fn merge<T: LinkTarget>(target: &mut T, attributes: &LinkAttributes) {
    if !attributes.component_code.is_empty() {
        *target.component_code_mut() = attributes.component_code.clone();
    }

    fill_if_empty(
        target.component_description_mut(),
        &attributes.component_description,
    );
    fill_if_empty(target.supplier_name_mut(), &attributes.supplier_name);

    if let Some((polymer_type, component_polymer)) = target.polymer_mut() {
        fill_if_empty(polymer_type, &attributes.polymer_type);
        fill_if_empty(component_polymer, &attributes.component_polymer);
    }

    if let Some(category) = target.category_mut() {
        if category.is_none() {
            *category = attributes.category;
        }
    }
}

fn fill_if_empty(field: &mut String, value: &str) {
    if field.trim().is_empty() && !value.is_empty() {
        *field = value.to_string();
    }
}
