//! 工廠合規報告示例

use epr::calc::{ComplianceReport, Workbook};
use epr::core::EngineConfig;

const WORKBOOK: &str = r#"{
    "products": [
        {
            "skuCode": "SKU-100",
            "skuDescription": "Mango Juice 1L",
            "componentDescription": "Bottle",
            "componentCode": "ABC/PLAN/Com/001",
            "supplierName": "Acme Plastics",
            "generate": "No"
        },
        {
            "skuCode": "SKU-100",
            "skuDescription": "Mango Juice 1L",
            "componentDescription": "Carry Bag",
            "componentCode": "ABC/PLAN/Com/002",
            "supplierName": "Beta Films",
            "generate": "No"
        }
    ],
    "components": [
        {
            "systemCode": "ABC/Com/001",
            "componentCode": "ABC/PLAN/Com/001",
            "componentDescription": "Bottle",
            "polymerType": "PET",
            "componentPolymer": "PET",
            "category": "Category I",
            "thickness": "300"
        },
        {
            "systemCode": "ABC/Com/002",
            "componentCode": "ABC/PLAN/Com/002",
            "componentDescription": "Carry Bag",
            "polymerType": "LDPE",
            "componentPolymer": "LDPE",
            "category": "Category II",
            "categoryIIType": "Carry Bags",
            "thickness": "100"
        }
    ],
    "monthlyProcurement": [
        {
            "systemCode": "ABC/Com/001",
            "componentCode": "ABC/PLAN/Com/001",
            "dateOfInvoice": "12-05-2024",
            "purchaseQty": "1000",
            "uom": "Units",
            "perPieceWeightKg": "0.015",
            "recycledPercent": "40",
            "recycledRate": "50",
            "virginRate": "80"
        },
        {
            "systemCode": "ABC/Com/002",
            "componentCode": "ABC/PLAN/Com/002",
            "dateOfInvoice": "03-11-2024",
            "purchaseQty": "250",
            "uom": "KG",
            "recycledPercent": "0.1",
            "recycledRate": "40",
            "virginRate": "60"
        }
    ],
    "recycledUsage": [
        {
            "systemCode": "ABC/Com/001",
            "category": "Category I",
            "annualConsumption": "12",
            "uom": "MT",
            "usedRecycledPercent": "0.3"
        },
        {
            "systemCode": "ABC/Com/002",
            "category": "Category II",
            "annualConsumption": "3000",
            "uom": "KG",
            "usedRecycledPercent": "0.05"
        }
    ]
}"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== 工廠合規報告示例 ===\n");

    let config = EngineConfig::new("ABC Foods", "PLANT-1");
    let workbook = Workbook::from_json(config, WORKBOOK)?;

    println!("每月採購:");
    for row in &workbook.monthly_procurement {
        println!(
            "  - {} {}（{}）: {} MT, 再生料 {} MT, 原生料 {} MT",
            row.component_code,
            row.month_name,
            row.quarter,
            row.monthly_purchase_mt,
            row.recycled_qty,
            row.virgin_qty
        );
    }

    let report = ComplianceReport::build(&workbook);

    println!("\n類別彙總:");
    for category in &report.categories {
        println!(
            "  - {}: 使用量 {} MT, 再生料 {}%, 狀態 {:?}",
            category.category,
            category.total_annual_consumption_mt,
            category.used_percent_points(),
            category.status
        );
    }

    println!("\n未通過檢查的組件:");
    for finding in &report.component_findings {
        println!(
            "  - {} {}: {:?}",
            finding.component_code, finding.component_description, finding.thickness
        );
    }

    println!("\n{}", report.to_json_pretty()?);

    Ok(())
}
