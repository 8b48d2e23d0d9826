//! 工作簿與編輯事件
//!
//! 工作簿是所有集合、引擎配置與流水號計數器的快照。每個編輯事件都透過
//! [`Workbook::apply`] 處理完畢才接受下一個事件，並回傳新的快照；
//! 原快照不會被修改。處理順序為：代碼指派、衍生欄位重算、跨表連結，
//! 再生料使用列有變動時最後重算類別彙總。

use epr_core::{
    CategorySummaryRow, Collection, ComponentRow, EngineConfig, EprError, MonthlyProcurementRow,
    ProductRow, RecycledUsageRow, Result, Row, RowId, RowIssues, RowRef, SequenceMode,
    SupplierRow, YesNo,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::aggregate::CategoryAggregator;
use crate::code_assign::{CodeAssigner, ComponentKey};
use crate::derived::DerivedFieldCalculator;
use crate::linker::{CrossTableLinker, LinkSources};
use crate::sequence::SequenceCounter;
use crate::validate;

/// 編輯事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EditEvent {
    /// 新增空白列
    AddRow { collection: Collection },
    /// 寫入單一欄位（JSON 欄位名稱）
    SetField {
        row: RowRef,
        field: String,
        value: Value,
    },
    /// 欄位失焦（比例欄位改寫為三位小數的分數）
    BlurField { row: RowRef, field: String },
    /// 刪除資料列
    DeleteRow { row: RowRef },
}

/// 套用事件的結果
#[derive(Debug, Clone)]
pub struct Applied {
    /// 新快照
    pub workbook: Workbook,
    /// 受影響的資料列（含編輯列本身、同步的兄弟列與重新連結的相依列）
    pub touched: Vec<RowRef>,
    /// 新增的資料列
    pub created: Option<RowRef>,
    /// 刪除的資料列
    pub deleted: Option<RowRef>,
}

impl Applied {
    fn new(workbook: Workbook) -> Self {
        Self {
            workbook,
            touched: Vec::new(),
            created: None,
            deleted: None,
        }
    }

    fn touch(&mut self, row: RowRef) {
        if !self.touched.contains(&row) {
            self.touched.push(row);
        }
    }
}

/// 載入用的集合文件
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Collections {
    products: Vec<ProductRow>,
    suppliers: Vec<SupplierRow>,
    components: Vec<ComponentRow>,
    monthly_procurement: Vec<MonthlyProcurementRow>,
    recycled_usage: Vec<RecycledUsageRow>,
    sequences: Option<SequenceCounter>,
}

/// 工作簿快照
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workbook {
    pub config: EngineConfig,
    pub products: Vec<ProductRow>,
    pub suppliers: Vec<SupplierRow>,
    pub components: Vec<ComponentRow>,
    pub monthly_procurement: Vec<MonthlyProcurementRow>,
    pub recycled_usage: Vec<RecycledUsageRow>,
    /// 各代碼前綴的流水號
    pub sequences: SequenceCounter,
    /// 類別彙總（由再生料使用列計算）
    pub category_summary: Vec<CategorySummaryRow>,
}

impl Workbook {
    /// 創建空白工作簿
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// 建構器模式：設置產品列
    pub fn with_products(mut self, rows: Vec<ProductRow>) -> Self {
        self.products = rows;
        self
    }

    /// 建構器模式：設置供應商列
    pub fn with_suppliers(mut self, rows: Vec<SupplierRow>) -> Self {
        self.suppliers = rows;
        self
    }

    /// 建構器模式：設置組件列
    pub fn with_components(mut self, rows: Vec<ComponentRow>) -> Self {
        self.components = rows;
        self
    }

    /// 建構器模式：設置每月採購列
    pub fn with_monthly_procurement(mut self, rows: Vec<MonthlyProcurementRow>) -> Self {
        self.monthly_procurement = rows;
        self
    }

    /// 建構器模式：設置再生料使用列
    pub fn with_recycled_usage(mut self, rows: Vec<RecycledUsageRow>) -> Self {
        self.recycled_usage = rows;
        self
    }

    /// 整理載入的資料
    ///
    /// 補上缺少的系統代碼、把既有代碼登記進計數器、重算衍生欄位與類別彙總。
    pub fn reconcile(mut self) -> Self {
        CodeAssigner::backfill_system_codes(&mut self.products, &self.config.client_name);
        self.observe_all_codes();

        self.components = std::mem::take(&mut self.components)
            .into_iter()
            .map(DerivedFieldCalculator::recompute_component_row)
            .collect();
        self.monthly_procurement = std::mem::take(&mut self.monthly_procurement)
            .into_iter()
            .map(DerivedFieldCalculator::recompute_monthly_row)
            .collect();
        self.recycled_usage = std::mem::take(&mut self.recycled_usage)
            .into_iter()
            .map(DerivedFieldCalculator::recompute_recycled_usage_row)
            .collect();
        self.refresh_summary();

        tracing::info!(
            "載入工作簿: 產品 {} 筆, 供應商 {} 筆, 組件 {} 筆, 每月採購 {} 筆, 再生料使用 {} 筆",
            self.products.len(),
            self.suppliers.len(),
            self.components.len(),
            self.monthly_procurement.len(),
            self.recycled_usage.len()
        );

        self
    }

    /// 從 JSON 文件載入（各集合為 camelCase 陣列，缺少 ID 的列會配發新 ID）
    pub fn from_json(config: EngineConfig, json: &str) -> Result<Self> {
        config.validate()?;
        let collections: Collections = serde_json::from_str(json)?;

        let mut workbook = Self::new(config)
            .with_products(collections.products)
            .with_suppliers(collections.suppliers)
            .with_components(collections.components)
            .with_monthly_procurement(collections.monthly_procurement)
            .with_recycled_usage(collections.recycled_usage);
        if let Some(sequences) = collections.sequences {
            workbook.sequences = sequences;
        }

        Ok(workbook.reconcile())
    }

    /// 套用編輯事件，回傳新快照
    pub fn apply(&self, event: EditEvent) -> Result<Applied> {
        tracing::debug!("套用編輯事件: {:?}", event);

        let mut applied = Applied::new(self.clone());
        match event {
            EditEvent::AddRow { collection } => {
                let created = applied.workbook.add_row(collection);
                applied.touch(created);
                applied.created = Some(created);
            }
            EditEvent::SetField { row, field, value } => {
                applied.touch(row);
                let touched = applied.workbook.set_field(row, &field, value)?;
                for other in touched {
                    applied.touch(other);
                }
            }
            EditEvent::BlurField { row, field } => {
                applied.workbook.blur_field(row, &field)?;
                applied.touch(row);
            }
            EditEvent::DeleteRow { row } => {
                applied.workbook.delete_row(row)?;
                applied.deleted = Some(row);
            }
        }

        let usage_changed = applied
            .touched
            .iter()
            .chain(applied.deleted.iter())
            .any(|row| row.collection == Collection::RecycledUsage);
        if usage_changed {
            applied.workbook.refresh_summary();
        }

        Ok(applied)
    }

    /// 以保存過的 JSON 還原（或在 `None` 時移除）單一資料列
    pub fn restore_row(&self, row: RowRef, value: Option<Value>) -> Result<Applied> {
        let mut applied = Applied::new(self.clone());
        let workbook = &mut applied.workbook;

        match row.collection {
            Collection::Products => replace_row(&mut workbook.products, row.id, value)?,
            Collection::Suppliers => replace_row(&mut workbook.suppliers, row.id, value)?,
            Collection::Components => replace_row(&mut workbook.components, row.id, value)?,
            Collection::MonthlyProcurement => {
                replace_row(&mut workbook.monthly_procurement, row.id, value)?
            }
            Collection::RecycledUsage => {
                replace_row(&mut workbook.recycled_usage, row.id, value)?;
                workbook.refresh_summary();
            }
        }

        if workbook.contains(row) {
            applied.touch(row);
        } else {
            applied.deleted = Some(row);
        }

        Ok(applied)
    }

    pub fn product(&self, id: RowId) -> Option<&ProductRow> {
        self.products.iter().find(|row| row.id == id)
    }

    pub fn supplier(&self, id: RowId) -> Option<&SupplierRow> {
        self.suppliers.iter().find(|row| row.id == id)
    }

    pub fn component(&self, id: RowId) -> Option<&ComponentRow> {
        self.components.iter().find(|row| row.id == id)
    }

    pub fn monthly(&self, id: RowId) -> Option<&MonthlyProcurementRow> {
        self.monthly_procurement.iter().find(|row| row.id == id)
    }

    pub fn recycled(&self, id: RowId) -> Option<&RecycledUsageRow> {
        self.recycled_usage.iter().find(|row| row.id == id)
    }

    pub fn contains(&self, row: RowRef) -> bool {
        self.index_of(row).is_ok()
    }

    /// 集合中所有列的參照（依顯示順序）
    pub fn row_refs(&self, collection: Collection) -> Vec<RowRef> {
        match collection {
            Collection::Products => refs(&self.products),
            Collection::Suppliers => refs(&self.suppliers),
            Collection::Components => refs(&self.components),
            Collection::MonthlyProcurement => refs(&self.monthly_procurement),
            Collection::RecycledUsage => refs(&self.recycled_usage),
        }
    }

    /// 資料列的 JSON 表示
    pub fn row_value(&self, row: RowRef) -> Result<Value> {
        let index = self.index_of(row)?;
        let value = match row.collection {
            Collection::Products => serde_json::to_value(&self.products[index])?,
            Collection::Suppliers => serde_json::to_value(&self.suppliers[index])?,
            Collection::Components => serde_json::to_value(&self.components[index])?,
            Collection::MonthlyProcurement => {
                serde_json::to_value(&self.monthly_procurement[index])?
            }
            Collection::RecycledUsage => serde_json::to_value(&self.recycled_usage[index])?,
        };
        Ok(value)
    }

    /// 驗證單一資料列
    pub fn validate_row(&self, row: RowRef) -> Result<RowIssues> {
        let index = self.index_of(row)?;
        let issues = match row.collection {
            Collection::Products => validate::validate_product(&self.products[index], &self.products),
            Collection::Suppliers => validate::validate_supplier(&self.suppliers[index]),
            Collection::Components => validate::validate_component(
                &self.components[index],
                &self.components,
                &self.config.thickness_policy,
            ),
            Collection::MonthlyProcurement => {
                validate::validate_monthly(&self.monthly_procurement[index])
            }
            Collection::RecycledUsage => {
                validate::validate_recycled_usage(&self.recycled_usage[index])
            }
        };
        Ok(issues)
    }

    /// 驗證所有資料列，只回傳有問題的列
    pub fn validate_all(&self) -> Vec<RowIssues> {
        let products = self
            .products
            .iter()
            .map(|row| validate::validate_product(row, &self.products));
        let suppliers = self.suppliers.iter().map(validate::validate_supplier);
        let components = self.components.iter().map(|row| {
            validate::validate_component(row, &self.components, &self.config.thickness_policy)
        });
        let monthly = self.monthly_procurement.iter().map(validate::validate_monthly);
        let usage = self.recycled_usage.iter().map(validate::validate_recycled_usage);

        products
            .chain(suppliers)
            .chain(components)
            .chain(monthly)
            .chain(usage)
            .filter(|issues| !issues.is_empty())
            .collect()
    }

    fn index_of(&self, row: RowRef) -> Result<usize> {
        let index = match row.collection {
            Collection::Products => position(&self.products, row.id),
            Collection::Suppliers => position(&self.suppliers, row.id),
            Collection::Components => position(&self.components, row.id),
            Collection::MonthlyProcurement => position(&self.monthly_procurement, row.id),
            Collection::RecycledUsage => position(&self.recycled_usage, row.id),
        };
        index.ok_or(EprError::RowNotFound(row))
    }

    fn add_row(&mut self, collection: Collection) -> RowRef {
        let created = match collection {
            Collection::Products => {
                let prefix = CodeAssigner::system_prefix(&self.config.client_name);
                let scanned = CodeAssigner::max_sequence(
                    self.products.iter().map(|row| row.system_code.as_str()),
                    &prefix,
                );
                let system_code = self.next_code(&prefix, scanned);
                let row = ProductRow::new().with_system_code(&system_code);
                let reference = row.reference();
                self.products.push(row);
                reference
            }
            Collection::Suppliers => push_new(&mut self.suppliers),
            Collection::Components => push_new(&mut self.components),
            Collection::MonthlyProcurement => push_new(&mut self.monthly_procurement),
            Collection::RecycledUsage => push_new(&mut self.recycled_usage),
        };

        tracing::debug!("新增資料列 {}", created);
        created
    }

    fn delete_row(&mut self, row: RowRef) -> Result<()> {
        let index = self.index_of(row)?;
        match row.collection {
            Collection::Products => {
                self.products.remove(index);
            }
            Collection::Suppliers => {
                self.suppliers.remove(index);
            }
            Collection::Components => {
                self.components.remove(index);
            }
            Collection::MonthlyProcurement => {
                self.monthly_procurement.remove(index);
            }
            Collection::RecycledUsage => {
                self.recycled_usage.remove(index);
            }
        }

        tracing::debug!("刪除資料列 {}", row);
        Ok(())
    }

    fn blur_field(&mut self, row: RowRef, field: &str) -> Result<()> {
        let index = self.index_of(row)?;
        match (row.collection, field) {
            (Collection::MonthlyProcurement, "recycledPercent") => {
                let current = self.monthly_procurement[index].clone();
                self.monthly_procurement[index] =
                    DerivedFieldCalculator::commit_monthly_percent(current)?;
            }
            (Collection::RecycledUsage, "usedRecycledPercent") => {
                let current = self.recycled_usage[index].clone();
                self.recycled_usage[index] = DerivedFieldCalculator::commit_recycled_percent(current)?;
            }
            _ => {
                return Err(EprError::NotAPercentField {
                    field: field.to_string(),
                })
            }
        }
        Ok(())
    }

    /// 寫入欄位並執行連鎖規則，回傳編輯列以外受影響的列
    fn set_field(&mut self, row: RowRef, field: &str, value: Value) -> Result<Vec<RowRef>> {
        let index = self.index_of(row)?;

        match row.collection {
            Collection::Products => return self.set_product_field(index, field, value),
            Collection::Suppliers => {
                let mut edited = with_field(&self.suppliers[index], field, value)?;
                let sources = LinkSources::new(&self.products, &self.components, &self.suppliers);
                edited = match field {
                    "systemCode" => {
                        let code = edited.system_code.clone();
                        CrossTableLinker::propagate_from_system_code(&sources, &edited, &code)
                    }
                    "componentCode" => {
                        let code = edited.component_code.clone();
                        CrossTableLinker::propagate_from_component_code(&sources, &edited, &code)
                    }
                    _ => edited,
                };
                edited.clear_disabled_fields();
                self.suppliers[index] = edited;
            }
            Collection::Components => {
                let mut edited = with_field(&self.components[index], field, value)?;
                if field == "componentPolymer" {
                    edited.polymer_code = None;
                }
                if field == "systemCode" {
                    let sources =
                        LinkSources::new(&self.products, &self.components, &self.suppliers);
                    let code = edited.system_code.clone();
                    edited = CrossTableLinker::propagate_from_system_code(&sources, &edited, &code);
                }
                let edited = DerivedFieldCalculator::recompute_component_row(edited);
                self.sequences.observe_code(&edited.component_code);
                self.components[index] = edited;
            }
            Collection::MonthlyProcurement => {
                let mut edited = with_field(&self.monthly_procurement[index], field, value)?;
                if field == "systemCode" {
                    let sources =
                        LinkSources::new(&self.products, &self.components, &self.suppliers);
                    let code = edited.system_code.clone();
                    edited = CrossTableLinker::propagate_from_system_code(&sources, &edited, &code);
                }
                self.monthly_procurement[index] =
                    DerivedFieldCalculator::try_recompute_monthly_row(edited)?;
            }
            Collection::RecycledUsage => {
                let mut edited = with_field(&self.recycled_usage[index], field, value)?;
                let sources = LinkSources::new(&self.products, &self.components, &self.suppliers);
                edited = match field {
                    "systemCode" => {
                        let code = edited.system_code.clone();
                        CrossTableLinker::propagate_from_system_code(&sources, &edited, &code)
                    }
                    "componentCode" => {
                        let code = edited.component_code.clone();
                        CrossTableLinker::propagate_from_component_code(&sources, &edited, &code)
                    }
                    _ => edited,
                };
                self.recycled_usage[index] =
                    DerivedFieldCalculator::try_recompute_recycled_usage_row(edited)?;
            }
        }

        Ok(Vec::new())
    }

    fn set_product_field(&mut self, index: usize, field: &str, value: Value) -> Result<Vec<RowRef>> {
        let before = self.products[index].clone();
        self.products[index] = with_field(&before, field, value)?;

        match field {
            "generate" => {
                let row = &mut self.products[index];
                if row.assigns_component_code() {
                    if !before.assigns_component_code() {
                        self.refresh_component_code(index, true);
                    }
                } else if row.generate == Some(YesNo::Yes) {
                    row.component_code.clear();
                }
            }
            "generateSupplierCode" => {
                let row = &mut self.products[index];
                if row.assigns_supplier_code() {
                    if !before.assigns_supplier_code() {
                        self.refresh_supplier_code(index, true);
                    }
                } else if row.generate_supplier_code == Some(YesNo::Yes) {
                    row.supplier_code.clear();
                }
            }
            "skuCode" | "componentDescription" => self.refresh_component_code(index, false),
            "supplierName" => self.refresh_supplier_code(index, false),
            _ => {}
        }

        let edited = self.products[index].id;
        let mut touched: Vec<RowRef> = CrossTableLinker::sync_component_siblings(&mut self.products, edited)
            .into_iter()
            .chain(CrossTableLinker::sync_supplier_siblings(&mut self.products, edited))
            .map(|id| RowRef::new(Collection::Products, id))
            .collect();

        let row = &self.products[index];
        for code in [&row.system_code, &row.component_code, &row.supplier_code] {
            self.sequences.observe_code(code);
        }

        let system_code = row.system_code.clone();
        touched.extend(self.relink_dependents(&system_code));

        if !touched.is_empty() {
            tracing::debug!("產品列 {} 的編輯連動了 {} 筆資料列", edited, touched.len());
        }

        Ok(touched)
    }

    /// 重新指派組件代碼
    ///
    /// `force` 為真時（切換為引擎指派）一定執行沿用或產生；
    /// 否則只在目前沒有代碼、或代碼已被其他自然鍵使用時才產生新號碼。
    fn refresh_component_code(&mut self, index: usize, force: bool) {
        let row = &self.products[index];
        if !row.assigns_component_code() {
            return;
        }

        let key = ComponentKey::of_product(row);
        let id = row.id;
        let current = row.component_code.clone();

        let reused =
            CodeAssigner::find_component_code(&self.products, &self.components, &key, Some(id))
                .map(str::to_string);
        let code = match reused {
            Some(code) => code,
            None if !force && !current.is_empty() && !self.component_code_shared(&current, id, &key) => {
                return;
            }
            None => {
                let prefix = CodeAssigner::component_prefix(
                    &self.config.client_name,
                    &self.config.plant_name,
                );
                let codes = self
                    .products
                    .iter()
                    .map(|row| row.component_code.as_str())
                    .chain(self.components.iter().map(|row| row.component_code.as_str()));
                let scanned = CodeAssigner::max_sequence(codes, &prefix);
                self.next_code(&prefix, scanned)
            }
        };

        tracing::debug!("產品列 {} 的組件代碼: {}", id, code);
        self.products[index].component_code = code;
    }

    /// 重新指派供應商代碼（規則同組件代碼，自然鍵為供應商名稱）
    ///
    /// 供應商名稱改變使前綴不同時，一律改發新前綴下的代碼。
    fn refresh_supplier_code(&mut self, index: usize, force: bool) {
        let row = &self.products[index];
        if !row.assigns_supplier_code() {
            return;
        }

        let supplier_name = row.supplier_name.clone();
        let id = row.id;
        let current = row.supplier_code.clone();

        let prefix = CodeAssigner::supplier_prefix(&supplier_name, &self.config.client_name);
        let reused = CodeAssigner::find_supplier_code(&self.products, &supplier_name, Some(id))
            .map(str::to_string);
        let code = match reused {
            Some(code) => code,
            // 供應商改名後前綴不同，舊代碼不再保留
            None if !force
                && current.starts_with(&prefix)
                && !self.supplier_code_shared(&current, id, &supplier_name) =>
            {
                return;
            }
            None => {
                let scanned = CodeAssigner::max_sequence(
                    self.products.iter().map(|row| row.supplier_code.as_str()),
                    &prefix,
                );
                self.next_code(&prefix, scanned)
            }
        };

        tracing::debug!("產品列 {} 的供應商代碼: {}", id, code);
        self.products[index].supplier_code = code;
    }

    fn component_code_shared(&self, code: &str, id: RowId, key: &ComponentKey) -> bool {
        self.products.iter().any(|row| {
            row.id != id
                && row.component_code == code
                && !row.same_component_key(&key.sku_code, &key.component_description)
        })
    }

    fn supplier_code_shared(&self, code: &str, id: RowId, supplier_name: &str) -> bool {
        self.products
            .iter()
            .any(|row| row.id != id && row.supplier_code == code && !row.same_supplier(supplier_name))
    }

    /// 取得前綴的下一個代碼
    ///
    /// 計數器模式下先以掃描結果校正計數器，再往前推一號；
    /// 重新掃描模式直接使用掃描到的最大號 + 1。
    fn next_code(&mut self, prefix: &str, scanned_max: u32) -> String {
        let sequence = match self.config.sequence_mode {
            SequenceMode::Counter => {
                self.sequences.observe(prefix, scanned_max);
                self.sequences.next_sequence(prefix)
            }
            SequenceMode::Rescan => {
                let sequence = scanned_max.saturating_add(1);
                self.sequences.observe(prefix, sequence);
                sequence
            }
        };
        CodeAssigner::format_code(prefix, sequence)
    }

    /// 重新連結所有參照此系統代碼的相依列
    fn relink_dependents(&mut self, system_code: &str) -> Vec<RowRef> {
        let sources = LinkSources::new(&self.products, &self.components, &self.suppliers);
        let suppliers = CrossTableLinker::relink_dependents(&sources, &self.suppliers, system_code);
        let components =
            CrossTableLinker::relink_dependents(&sources, &self.components, system_code);
        let monthly =
            CrossTableLinker::relink_dependents(&sources, &self.monthly_procurement, system_code);
        let usage = CrossTableLinker::relink_dependents(&sources, &self.recycled_usage, system_code);

        let mut touched = Vec::new();
        for (index, row) in suppliers {
            touched.push(row.reference());
            self.suppliers[index] = row;
        }
        for (index, row) in components {
            touched.push(row.reference());
            self.components[index] = DerivedFieldCalculator::recompute_component_row(row);
        }
        for (index, row) in monthly {
            touched.push(row.reference());
            self.monthly_procurement[index] = row;
        }
        for (index, row) in usage {
            touched.push(row.reference());
            self.recycled_usage[index] = row;
        }
        touched
    }

    fn observe_all_codes(&mut self) {
        let product_codes = self
            .products
            .iter()
            .flat_map(|row| [&row.system_code, &row.component_code, &row.supplier_code]);
        let component_codes = self.components.iter().map(|row| &row.component_code);

        for code in product_codes.chain(component_codes) {
            self.sequences.observe_code(code);
        }
    }

    fn refresh_summary(&mut self) {
        self.category_summary = CategoryAggregator::summarize(&self.recycled_usage, &self.config);
    }
}

fn position<T: Row>(rows: &[T], id: RowId) -> Option<usize> {
    rows.iter().position(|row| row.id() == id)
}

fn refs<T: Row>(rows: &[T]) -> Vec<RowRef> {
    rows.iter().map(Row::reference).collect()
}

fn push_new<T: Row + Default>(rows: &mut Vec<T>) -> RowRef {
    let row = T::default();
    let reference = row.reference();
    rows.push(row);
    reference
}

/// 以 JSON 寫入單一欄位；未知欄位與無法解析的值都會被拒絕
fn with_field<T: Row>(row: &T, field: &str, value: Value) -> Result<T> {
    if field == "id" {
        return Err(EprError::InvalidValue {
            field: field.to_string(),
            reason: "資料列 ID 不可修改".to_string(),
        });
    }

    let Value::Object(mut object) = serde_json::to_value(row)? else {
        return Err(EprError::InvalidValue {
            field: field.to_string(),
            reason: "資料列不是 JSON 物件".to_string(),
        });
    };
    if !object.contains_key(field) {
        return Err(EprError::UnknownField {
            collection: T::COLLECTION,
            field: field.to_string(),
        });
    }

    object.insert(field.to_string(), value);
    serde_json::from_value(Value::Object(object)).map_err(|err| EprError::InvalidValue {
        field: field.to_string(),
        reason: err.to_string(),
    })
}

fn replace_row<T: Row>(rows: &mut Vec<T>, id: RowId, value: Option<Value>) -> Result<()> {
    let index = position(rows, id);
    match (value, index) {
        (Some(value), index) => {
            let restored: T = serde_json::from_value(value)?;
            if restored.id() != id {
                return Err(EprError::InvalidValue {
                    field: "id".to_string(),
                    reason: format!("{} 與 {} 不符", restored.id(), id),
                });
            }
            match index {
                Some(index) => rows[index] = restored,
                None => rows.push(restored),
            }
        }
        (None, Some(index)) => {
            rows.remove(index);
        }
        (None, None) => {}
    }
    Ok(())
}
