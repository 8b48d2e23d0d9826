//! 集成測試

use std::collections::HashMap;

use epr::calc::{
    assess_thickness, CodeAssigner, ComplianceReport, ComponentKey, EditEvent, ThicknessVerdict,
    Workbook,
};
use epr::core::{
    Category, Collection, ComplianceStatus, ComponentRow, EngineConfig, ProductRow, RowRef,
};
use epr::store::{InMemoryStore, Persistence, RecordStore, RowFilter};
use rstest::rstest;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

fn config() -> EngineConfig {
    EngineConfig::new("ABC Foods", "PLANT-1")
}

fn set(workbook: &Workbook, row: RowRef, field: &str, value: Value) -> Workbook {
    workbook
        .apply(EditEvent::SetField {
            row,
            field: field.to_string(),
            value,
        })
        .unwrap()
        .workbook
}

fn add(workbook: &Workbook, collection: Collection) -> (Workbook, RowRef) {
    let applied = workbook.apply(EditEvent::AddRow { collection }).unwrap();
    let row = applied.created.unwrap();
    (applied.workbook, row)
}

#[test]
fn test_monthly_procurement_from_document() {
    // 場景：1000 件、每件 0.015 kg、再生料 40%、再生料單價 50
    let document = json!({
        "monthlyProcurement": [{
            "dateOfInvoice": "12-05-2024",
            "purchaseQty": "1000",
            "uom": "Units",
            "perPieceWeightKg": "0.015",
            "recycledPercent": "40",
            "recycledRate": "50",
            "virginRate": "80"
        }]
    });

    let workbook = Workbook::from_json(config(), &document.to_string()).unwrap();
    let row = &workbook.monthly_procurement[0];

    assert_eq!(row.monthly_purchase_mt, dec!(0.015));
    assert_eq!(row.recycled_qty, dec!(0.006));
    assert_eq!(row.recycled_qrt_amount.to_string(), "300.000");
    assert_eq!(row.virgin_qty, dec!(0.009));
    assert_eq!(row.virgin_qty_amount, dec!(720));
    assert_eq!(row.month_name, "May");
    assert_eq!(row.quarter, "Q1");
}

#[rstest]
#[case("Units", json!(1000), json!(0.015), dec!(0.015))]
#[case("Roll", json!(10), json!(25), dec!(0.25))]
#[case("KG", json!("2500"), json!(0), dec!(2.5))]
#[case("MT", json!("3.2"), json!(0), dec!(3.2))]
#[case("Not Applicable", json!(500), json!(0.2), dec!(0))]
fn test_monthly_tonnage_by_uom(
    #[case] uom: &str,
    #[case] qty: Value,
    #[case] per_piece: Value,
    #[case] expected_mt: rust_decimal::Decimal,
) {
    let (workbook, row) = add(&Workbook::new(config()), Collection::MonthlyProcurement);
    let workbook = set(&workbook, row, "purchaseQty", qty);
    let workbook = set(&workbook, row, "perPieceWeightKg", per_piece);
    let workbook = set(&workbook, row, "uom", json!(uom));

    let monthly = workbook.monthly(row.id).unwrap();
    assert_eq!(monthly.monthly_purchase_mt, expected_mt);
    if uom == "Not Applicable" {
        assert_eq!(monthly.purchase_qty, dec!(0));
        assert_eq!(monthly.per_piece_weight_kg, dec!(0));
    }
}

#[rstest]
#[case("Carry Bags", dec!(130), true)]
#[case("Carry Bags", dec!(100), false)]
// 等於下限不算合規
#[case("Carry Bags", dec!(120), false)]
#[case("Non Woven Carry Bags", dec!(61), true)]
fn test_carry_bag_thickness(
    #[case] category_ii_type: &str,
    #[case] micron: rust_decimal::Decimal,
    #[case] compliant: bool,
) {
    let policy = config().thickness_policy;
    let bag = ComponentRow::new()
        .with_category(Category::CategoryII)
        .with_category_ii_type(category_ii_type)
        .with_thickness(micron);

    let verdict = assess_thickness(&bag, &policy);
    assert_eq!(verdict.is_compliant(), compliant);
    if !compliant {
        assert!(matches!(verdict, ThicknessVerdict::BelowMinimum { actual, .. } if actual == micron));
    }
}

#[test]
fn test_fourth_component_code() {
    let existing: Vec<ProductRow> = (1..=3)
        .map(|i| {
            ProductRow::new()
                .with_sku(&format!("SKU-{}", i), "Juice")
                .with_component_description("Cap")
                .with_component_code(&format!("ABC/PLAN/Com/{:03}", i))
        })
        .collect();

    let code = CodeAssigner::assign_component_code(
        &existing,
        &[],
        "ABC Foods",
        "PLANT-1",
        &ComponentKey::new("SKU-4", "Cap"),
    );
    assert_eq!(code, "ABC/PLAN/Com/004");

    // 透過編輯事件產生，結果相同
    let workbook = Workbook::new(config()).with_products(existing).reconcile();
    let (workbook, row) = add(&workbook, Collection::Products);
    let workbook = set(&workbook, row, "skuCode", json!("SKU-4"));
    let workbook = set(&workbook, row, "componentDescription", json!("Cap"));
    let workbook = set(&workbook, row, "generate", json!("No"));
    assert_eq!(workbook.product(row.id).unwrap().component_code, "ABC/PLAN/Com/004");
    assert_eq!(workbook.product(row.id).unwrap().system_code, "ABC/Com/004");
}

#[test]
fn test_same_natural_key_shares_one_code() {
    let mut workbook = Workbook::new(config());
    let mut rows = Vec::new();
    for (sku, description) in [("SKU-1", "Cap"), ("SKU-1", "Cap"), ("SKU-1", "Label"), ("SKU-1", "Cap")] {
        let (next, row) = add(&workbook, Collection::Products);
        let next = set(&next, row, "skuCode", json!(sku));
        let next = set(&next, row, "componentDescription", json!(description));
        workbook = set(&next, row, "generate", json!("No"));
        rows.push(row);
    }

    // 把第一列改成新的自然鍵，其他 Cap 列維持原代碼
    let workbook = set(&workbook, rows[0], "componentDescription", json!("Lid"));

    let mut codes: HashMap<(String, String), Vec<String>> = HashMap::new();
    for product in &workbook.products {
        codes
            .entry((product.sku_code.clone(), product.component_description.clone()))
            .or_default()
            .push(product.component_code.clone());
    }

    assert_eq!(codes.len(), 3);
    for (key, group) in &codes {
        assert!(group.iter().all(|code| code == &group[0]), "{:?} 有多個代碼: {:?}", key, group);
    }
    let distinct: std::collections::HashSet<&String> = codes.values().map(|group| &group[0]).collect();
    assert_eq!(distinct.len(), 3);
}

#[test]
fn test_registered_supplier_name_wins() {
    let document = json!({
        "components": [{
            "systemCode": "ABC/Com/001",
            "componentCode": "ABC/PLAN/Com/001",
            "componentDescription": "Cap",
            "supplierName": "Old Supplier",
            "polymerType": "PP",
            "componentPolymer": "PP",
            "category": "Category I"
        }],
        "suppliers": [{
            "systemCode": "ABC/Com/001",
            "componentCode": "ABC/PLAN/Com/001",
            "supplierName": "Acme Plastics",
            "supplierStatus": "Registered",
            "eprCertificateNumber": "EPR-42"
        }]
    });
    let workbook = Workbook::from_json(config(), &document.to_string()).unwrap();

    let (workbook, usage) = add(&workbook, Collection::RecycledUsage);
    let workbook = set(&workbook, usage, "componentCode", json!("ABC/PLAN/Com/001"));

    let linked = workbook.recycled(usage.id).unwrap();
    assert_eq!(linked.supplier_name, "Acme Plastics");
    assert_eq!(linked.component_description, "Cap");
    assert_eq!(linked.category, Some(Category::CategoryI));
}

#[test]
fn test_category_summary_and_report() {
    let document = json!({
        "recycledUsage": [
            { "category": "Category I", "annualConsumption": "20", "uom": "MT", "usedRecycledPercent": "0.3" },
            { "category": "Category I", "annualConsumption": "60", "uom": "MT", "usedRecycledPercent": "0.4" }
        ]
    });
    let workbook = Workbook::from_json(config(), &document.to_string()).unwrap();

    let summary = &workbook.category_summary;
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].total_used_percent, dec!(0.007));
    assert_eq!(summary[0].total_used_qty_mt, dec!(30));
    assert_eq!(
        summary[0].status,
        ComplianceStatus::BelowTarget {
            target_percent: dec!(30)
        }
    );

    let report = ComplianceReport::build(&workbook);
    assert_eq!(report.categories_below_target(), 1);
}

#[test]
fn test_partial_save_then_retry() {
    let mut persistence = Persistence::new(InMemoryStore::new());
    let mut workbook = persistence.load(config()).unwrap();
    let mut rows = Vec::new();
    for name in ["Acme", "Beta", "Gamma"] {
        let (next, row) = add(&workbook, Collection::Suppliers);
        let next = set(&next, row, "systemCode", json!("ABC/Com/001"));
        let next = set(&next, row, "componentCode", json!("ABC/PLAN/Com/001"));
        let next = set(&next, row, "supplierName", json!(name));
        workbook = set(&next, row, "supplierStatus", json!("Unregistered"));
        rows.push(row);
    }

    persistence.store_mut().fail_on(rows[1].id);
    let report = persistence.save_all(&workbook).unwrap();
    assert_eq!(report.saved, vec![rows[0]]);
    assert_eq!(report.failed.as_ref().map(|(row, _)| *row), Some(rows[1]));
    assert_eq!(report.not_attempted, vec![rows[2]]);

    // 儲存端恢復後重試，只送出尚未保存的列
    persistence.store_mut().recover();
    let retry = persistence.save_all(&workbook).unwrap();
    assert_eq!(retry.saved, rows[1..].to_vec());
    assert!(retry.is_complete());
    assert_eq!(persistence.store().len(Collection::Suppliers), 3);

    let stored = persistence
        .store()
        .get(Collection::Suppliers, &RowFilter::all().field_eq("supplierName", "Acme"))
        .unwrap();
    assert_eq!(stored.len(), 1);

    // 重新載入後沒有需要保存的列
    let mut reloaded = Persistence::new(persistence.store().clone());
    let workbook = reloaded.load(config()).unwrap();
    assert_eq!(workbook.suppliers.len(), 3);
    assert!(reloaded.dirty_rows(&workbook).is_empty());
}

#[test]
fn test_cancel_restores_saved_and_drops_unsaved() {
    let mut persistence = Persistence::new(InMemoryStore::new());
    let workbook = persistence.load(config()).unwrap();

    let (workbook, saved) = add(&workbook, Collection::Components);
    let workbook = set(&workbook, saved, "componentDescription", json!("Cap"));
    assert!(persistence.save_row(&workbook, saved).unwrap().saved.is_empty());

    // 組件列缺少必填欄位，保存被擋下；補齊後再保存
    let workbook = set(&workbook, saved, "componentCode", json!("ABC/PLAN/Com/001"));
    let workbook = set(&workbook, saved, "systemCode", json!("ABC/Com/001"));
    let workbook = set(&workbook, saved, "polymerType", json!("PP"));
    let workbook = set(&workbook, saved, "componentPolymer", json!("PP"));
    let workbook = set(&workbook, saved, "category", json!("Category I"));
    let workbook = set(&workbook, saved, "thickness", json!(80));
    assert_eq!(persistence.save_row(&workbook, saved).unwrap().saved, vec![saved]);

    let edited = set(&workbook, saved, "componentDescription", json!("Lid"));
    let (edited, unsaved) = add(&edited, Collection::Components);
    assert_eq!(persistence.dirty_rows(&edited), vec![saved, unsaved]);

    let restored = persistence.cancel(&edited, saved).unwrap().workbook;
    assert_eq!(restored.component(saved.id).unwrap().component_description, "Cap");

    let applied = persistence.cancel(&restored, unsaved).unwrap();
    assert_eq!(applied.deleted, Some(unsaved));
    assert!(persistence.dirty_rows(&applied.workbook).is_empty());
}
