//! 採購資料輸入示例
//!
//! 模擬操作員逐欄輸入：新增產品列、產生代碼、建立採購列並保存。

use epr::calc::{EditEvent, Workbook};
use epr::core::{Collection, EngineConfig, RowRef};
use epr::store::{InMemoryStore, Persistence};
use serde_json::{json, Value};

fn set(workbook: &Workbook, row: RowRef, field: &str, value: Value) -> anyhow::Result<Workbook> {
    let applied = workbook.apply(EditEvent::SetField {
        row,
        field: field.to_string(),
        value,
    })?;
    Ok(applied.workbook)
}

fn add(workbook: &Workbook, collection: Collection) -> anyhow::Result<(Workbook, RowRef)> {
    let applied = workbook.apply(EditEvent::AddRow { collection })?;
    let row = applied
        .created
        .ok_or_else(|| anyhow::anyhow!("新增 {} 沒有回傳資料列", collection))?;
    Ok((applied.workbook, row))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== 採購資料輸入示例 ===\n");

    let mut persistence = Persistence::new(InMemoryStore::new());
    let workbook = persistence.load(EngineConfig::new("ABC Foods", "PLANT-1"))?;

    // 產品列：輸入 SKU 與組件後產生代碼
    let (workbook, product) = add(&workbook, Collection::Products)?;
    let workbook = set(&workbook, product, "skuCode", json!("SKU-100"))?;
    let workbook = set(&workbook, product, "skuDescription", json!("Mango Juice 1L"))?;
    let workbook = set(&workbook, product, "componentDescription", json!("Cap"))?;
    let workbook = set(&workbook, product, "supplierName", json!("Acme Plastics"))?;
    let workbook = set(&workbook, product, "generate", json!("No"))?;
    let workbook = set(&workbook, product, "generateSupplierCode", json!("No"))?;

    if let Some(row) = workbook.product(product.id) {
        println!("產品列:");
        println!("  系統代碼: {}", row.system_code);
        println!("  組件代碼: {}", row.component_code);
        println!("  供應商代碼: {}", row.supplier_code);
    }

    // 採購列：輸入系統代碼後自動帶入組件與供應商
    let (workbook, monthly) = add(&workbook, Collection::MonthlyProcurement)?;
    let workbook = set(&workbook, monthly, "systemCode", json!("ABC/Com/001"))?;
    let workbook = set(&workbook, monthly, "dateOfInvoice", json!("12-05-2024"))?;
    let workbook = set(&workbook, monthly, "uom", json!("Units"))?;
    let workbook = set(&workbook, monthly, "purchaseQty", json!("1000"))?;
    let workbook = set(&workbook, monthly, "perPieceWeightKg", json!("0.015"))?;
    let workbook = set(&workbook, monthly, "recycledPercent", json!("40"))?;
    let workbook = set(&workbook, monthly, "recycledRate", json!("50"))?;
    let workbook = workbook
        .apply(EditEvent::BlurField {
            row: monthly,
            field: "recycledPercent".to_string(),
        })?
        .workbook;

    if let Some(row) = workbook.monthly(monthly.id) {
        println!("\n採購列:");
        println!("  組件: {} {}", row.component_code, row.component_description);
        println!("  供應商: {}", row.supplier_name);
        println!("  期間: {} / {} / {}", row.month_name, row.quarter, row.half_year);
        println!("  採購量: {} MT", row.monthly_purchase_mt);
        println!("  再生料: {}（{} MT, 金額 {}）", row.recycled_percent, row.recycled_qty, row.recycled_qrt_amount);
    }

    let report = persistence.save_all(&workbook)?;
    println!("\n保存結果:");
    println!("  已保存: {} 筆", report.saved.len());
    for issues in &report.rejected {
        println!("  未通過驗證: {} ({})", issues.row, issues.message());
    }
    if let Some((row, err)) = &report.failed {
        println!("  保存失敗: {} ({})", row, err);
    }

    Ok(())
}
