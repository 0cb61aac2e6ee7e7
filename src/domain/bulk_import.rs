// ==========================================
// CNC 零件库存管理 - 批量导入领域模型
// ==========================================
// 职责: 导入行 (ParsedRow) / 校验结果 / 已解析记录 / 导入结果
// 生命周期: 仅存在于一次导入会话内，不落库
// ==========================================

use crate::domain::types::{Currency, Field, ImportCategory, SupplierStatus};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};

// ==========================================
// 导入行（映射后、解析外键前）
// ==========================================

/// 库存导入行
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryImportRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    // 校验阶段解析
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_id: Option<String>,
    #[serde(rename = "isUpdate")]
    pub is_update: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_inventory_id: Option<String>,
}

/// 零件单价导入行
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartPriceImportRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_from: Option<String>, // YYYY-MM-DD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_code: Option<String>,

    // 校验阶段解析
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<String>,
}

/// 供应商导入行
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SupplierImportRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// 导入行（按类别打标签的联合体）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParsedRow {
    Inventory(InventoryImportRow),
    PartPrice(PartPriceImportRow),
    Supplier(SupplierImportRow),
}

impl ParsedRow {
    /// 指定类别的空记录
    pub fn empty(category: ImportCategory) -> Self {
        match category {
            ImportCategory::Inventory => ParsedRow::Inventory(InventoryImportRow::default()),
            ImportCategory::PartPrices => ParsedRow::PartPrice(PartPriceImportRow::default()),
            ImportCategory::Suppliers => ParsedRow::Supplier(SupplierImportRow::default()),
        }
    }

    pub fn category(&self) -> ImportCategory {
        match self {
            ParsedRow::Inventory(_) => ImportCategory::Inventory,
            ParsedRow::PartPrice(_) => ImportCategory::PartPrices,
            ParsedRow::Supplier(_) => ImportCategory::Suppliers,
        }
    }

    /// 写入文本字段；字段不属于本类别时返回 false
    pub fn set_text(&mut self, field: Field, value: String) -> bool {
        let slot = match (self, field) {
            (ParsedRow::Inventory(r), Field::PartCode) => &mut r.part_code,
            (ParsedRow::Inventory(r), Field::Location) => &mut r.location,
            (ParsedRow::PartPrice(r), Field::PartCode) => &mut r.part_code,
            (ParsedRow::PartPrice(r), Field::Currency) => &mut r.currency,
            (ParsedRow::PartPrice(r), Field::EffectiveFrom) => &mut r.effective_from,
            (ParsedRow::PartPrice(r), Field::SupplierCode) => &mut r.supplier_code,
            (ParsedRow::Supplier(r), Field::SupplierCode) => &mut r.supplier_code,
            (ParsedRow::Supplier(r), Field::SupplierName) => &mut r.supplier_name,
            (ParsedRow::Supplier(r), Field::ContactPerson) => &mut r.contact_person,
            (ParsedRow::Supplier(r), Field::Phone) => &mut r.phone,
            (ParsedRow::Supplier(r), Field::Email) => &mut r.email,
            (ParsedRow::Supplier(r), Field::Country) => &mut r.country,
            (ParsedRow::Supplier(r), Field::Address) => &mut r.address,
            (ParsedRow::Supplier(r), Field::Website) => &mut r.website,
            (ParsedRow::Supplier(r), Field::Status) => &mut r.status,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// 写入数值字段；字段不属于本类别时返回 false
    pub fn set_number(&mut self, field: Field, value: f64) -> bool {
        let slot = match (self, field) {
            (ParsedRow::Inventory(r), Field::Quantity) => &mut r.quantity,
            (ParsedRow::PartPrice(r), Field::UnitPrice) => &mut r.unit_price,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

// ==========================================
// 行级错误
// ==========================================

/// 行级错误码（对外以 i18n key 呈现）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowErrorCode {
    PartCodeRequired,
    PartNotFound,
    DuplicateInFile,
    InvalidQuantity,
    LocationRequired,
    InvalidPrice,
    InvalidCurrency,
    InvalidDate,
    SupplierNotFound,
    SupplierCodeRequired,
    DuplicateSupplierCode,
    NameRequired,
    ContactRequired,
    PhoneRequired,
    InvalidEmail,
    CountryTooLong,
    InvalidStatus,
}

impl RowErrorCode {
    pub const ALL: [RowErrorCode; 17] = [
        RowErrorCode::PartCodeRequired,
        RowErrorCode::PartNotFound,
        RowErrorCode::DuplicateInFile,
        RowErrorCode::InvalidQuantity,
        RowErrorCode::LocationRequired,
        RowErrorCode::InvalidPrice,
        RowErrorCode::InvalidCurrency,
        RowErrorCode::InvalidDate,
        RowErrorCode::SupplierNotFound,
        RowErrorCode::SupplierCodeRequired,
        RowErrorCode::DuplicateSupplierCode,
        RowErrorCode::NameRequired,
        RowErrorCode::ContactRequired,
        RowErrorCode::PhoneRequired,
        RowErrorCode::InvalidEmail,
        RowErrorCode::CountryTooLong,
        RowErrorCode::InvalidStatus,
    ];

    pub fn message_key(&self) -> &'static str {
        match self {
            RowErrorCode::PartCodeRequired => "bulk_import.errors.part_code_required",
            RowErrorCode::PartNotFound => "bulk_import.errors.part_not_found",
            RowErrorCode::DuplicateInFile => "bulk_import.errors.duplicate_in_file",
            RowErrorCode::InvalidQuantity => "bulk_import.errors.invalid_quantity",
            RowErrorCode::LocationRequired => "bulk_import.errors.location_required",
            RowErrorCode::InvalidPrice => "bulk_import.errors.invalid_price",
            RowErrorCode::InvalidCurrency => "bulk_import.errors.invalid_currency",
            RowErrorCode::InvalidDate => "bulk_import.errors.invalid_date",
            RowErrorCode::SupplierNotFound => "bulk_import.errors.supplier_not_found",
            RowErrorCode::SupplierCodeRequired => "bulk_import.errors.supplier_code_required",
            RowErrorCode::DuplicateSupplierCode => "bulk_import.errors.duplicate_supplier_code",
            RowErrorCode::NameRequired => "bulk_import.errors.name_required",
            RowErrorCode::ContactRequired => "bulk_import.errors.contact_required",
            RowErrorCode::PhoneRequired => "bulk_import.errors.phone_required",
            RowErrorCode::InvalidEmail => "bulk_import.errors.invalid_email",
            RowErrorCode::CountryTooLong => "bulk_import.errors.country_too_long",
            RowErrorCode::InvalidStatus => "bulk_import.errors.invalid_status",
        }
    }
}

impl Serialize for RowErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message_key())
    }
}

/// 字段级错误: {field, message-key}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    #[serde(rename = "message")]
    pub code: RowErrorCode,
}

impl FieldError {
    pub fn new(field: Field, code: RowErrorCode) -> Self {
        Self { field, code }
    }

    pub fn message_key(&self) -> &'static str {
        self.code.message_key()
    }
}

// ==========================================
// 已解析记录（写入阶段的工作单元）
// ==========================================
// 外键在校验阶段解析一次，写入阶段不再查询

/// 库存写入动作
#[derive(Debug, Clone, PartialEq)]
pub enum InventoryAction {
    Insert,
    Update { inventory_id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInventory {
    pub part_id: String,
    pub quantity: i64,
    pub location: String,
    pub action: InventoryAction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPartPrice {
    pub part_id: String,
    pub unit_price: f64,
    pub currency: Currency,
    pub effective_from: NaiveDate,
    pub supplier_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSupplier {
    pub supplier_code: String, // 已转大写
    pub supplier_name: String,
    pub contact_person: String,
    pub phone: String,
    pub email: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub status: SupplierStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedRow {
    Inventory(ResolvedInventory),
    PartPrice(ResolvedPartPrice),
    Supplier(ResolvedSupplier),
}

impl ResolvedRow {
    pub fn category(&self) -> ImportCategory {
        match self {
            ResolvedRow::Inventory(_) => ImportCategory::Inventory,
            ResolvedRow::PartPrice(_) => ImportCategory::PartPrices,
            ResolvedRow::Supplier(_) => ImportCategory::Suppliers,
        }
    }

    pub fn is_update(&self) -> bool {
        matches!(
            self,
            ResolvedRow::Inventory(ResolvedInventory {
                action: InventoryAction::Update { .. },
                ..
            })
        )
    }
}

// ==========================================
// ValidationResult - 单行校验结果
// ==========================================
// 不变式: valid == errors.is_empty()；data/resolved 仅在 valid 时存在
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    #[serde(rename = "rowIndex")]
    row_index: usize,
    valid: bool,
    errors: Vec<FieldError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<ParsedRow>,
    #[serde(skip)]
    resolved: Option<ResolvedRow>,
}

impl ValidationResult {
    /// 校验通过
    pub fn accepted(row_index: usize, data: ParsedRow, resolved: ResolvedRow) -> Self {
        Self {
            row_index,
            valid: true,
            errors: Vec::new(),
            data: Some(data),
            resolved: Some(resolved),
        }
    }

    /// 校验失败（errors 不可为空）
    pub fn rejected(row_index: usize, errors: Vec<FieldError>) -> Self {
        debug_assert!(!errors.is_empty());
        Self {
            row_index,
            valid: errors.is_empty(),
            errors,
            data: None,
            resolved: None,
        }
    }

    /// 原始表格行号（1 起，表头为第 1 行）
    pub fn row_index(&self) -> usize {
        self.row_index
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn data(&self) -> Option<&ParsedRow> {
        self.data.as_ref()
    }

    pub fn resolved(&self) -> Option<&ResolvedRow> {
        self.resolved.as_ref()
    }

    /// 是否在指定字段上有错误
    pub fn has_error_on(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

// ==========================================
// ValidatedBatch - 写入阶段入参
// ==========================================
// 只能由校验结果构造，且只收录 valid 且类别一致的行：其余行在类型边界上即被拦截
#[derive(Debug, Clone)]
pub struct ValidatedRow {
    pub row_index: usize,
    pub record: ResolvedRow,
}

#[derive(Debug, Clone)]
pub struct ValidatedBatch {
    category: ImportCategory,
    rows: Vec<ValidatedRow>,
}

impl ValidatedBatch {
    pub fn from_results(category: ImportCategory, results: &[ValidationResult]) -> Self {
        let rows = results
            .iter()
            .filter(|r| r.is_valid())
            .filter_map(|r| {
                r.resolved()
                    .filter(|record| record.category() == category)
                    .map(|record| ValidatedRow {
                        row_index: r.row_index(),
                        record: record.clone(),
                    })
            })
            .collect();

        Self { category, rows }
    }

    pub fn category(&self) -> ImportCategory {
        self.category
    }

    pub fn rows(&self) -> &[ValidatedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<ValidatedRow> {
        self.rows
    }
}

// ==========================================
// PreviewSummary - 预览统计
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub to_insert: usize,
    /// 仅库存类别可能非 0
    pub to_update: usize,
}

impl PreviewSummary {
    pub fn from_results(results: &[ValidationResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Default::default()
        };
        for result in results {
            match result.resolved() {
                Some(record) if record.is_update() => {
                    summary.valid += 1;
                    summary.to_update += 1;
                }
                Some(_) => {
                    summary.valid += 1;
                    summary.to_insert += 1;
                }
                None => summary.invalid += 1,
            }
        }
        summary
    }
}

// ==========================================
// ImportContext - 写入上下文
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportContext {
    pub factory_id: String,
    pub user_id: String,
}

impl ImportContext {
    pub fn new(factory_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            factory_id: factory_id.into(),
            user_id: user_id.into(),
        }
    }
}

// ==========================================
// BulkImportResult - 一次导入的终态
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportResult {
    pub success: bool,
    pub inserted_count: usize,
    pub updated_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 失败前已提交记录的 ID（按提交顺序；更新行记录的是既有 ID）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_inserts: Option<Vec<String>>,
    /// 失败行的表格行号
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_row_index: Option<usize>,
}

impl BulkImportResult {
    pub fn committed(&self) -> usize {
        self.inserted_count + self.updated_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory_row() -> ParsedRow {
        ParsedRow::Inventory(InventoryImportRow {
            part_code: Some("MT001".to_string()),
            quantity: Some(100.0),
            location: Some("A-1-01".to_string()),
            part_id: Some("p-1".to_string()),
            is_update: false,
            existing_inventory_id: None,
        })
    }

    fn resolved() -> ResolvedRow {
        ResolvedRow::Inventory(ResolvedInventory {
            part_id: "p-1".to_string(),
            quantity: 100,
            location: "A-1-01".to_string(),
            action: InventoryAction::Insert,
        })
    }

    #[test]
    fn test_set_text_rejects_foreign_field() {
        let mut row = ParsedRow::empty(ImportCategory::Inventory);
        assert!(row.set_text(Field::PartCode, "MT001".to_string()));
        assert!(!row.set_text(Field::Phone, "0901".to_string()));
        assert!(!row.set_number(Field::UnitPrice, 1.0));
        assert!(row.set_number(Field::Quantity, 5.0));
    }

    #[test]
    fn test_validation_result_invariant() {
        let ok = ValidationResult::accepted(2, inventory_row(), resolved());
        assert!(ok.is_valid());
        assert!(ok.errors().is_empty());
        assert!(ok.data().is_some());

        let bad = ValidationResult::rejected(
            3,
            vec![FieldError::new(Field::Location, RowErrorCode::LocationRequired)],
        );
        assert!(!bad.is_valid());
        assert!(bad.data().is_none());
        assert!(bad.resolved().is_none());
        assert!(bad.has_error_on(Field::Location));
    }

    #[test]
    fn test_validated_batch_keeps_only_valid_rows() {
        let results = vec![
            ValidationResult::accepted(2, inventory_row(), resolved()),
            ValidationResult::rejected(
                3,
                vec![FieldError::new(Field::PartCode, RowErrorCode::PartNotFound)],
            ),
        ];

        let batch = ValidatedBatch::from_results(ImportCategory::Inventory, &results);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.rows()[0].row_index, 2);
    }

    #[test]
    fn test_validated_batch_drops_other_categories() {
        let supplier = ResolvedRow::Supplier(ResolvedSupplier {
            supplier_code: "SUP001".to_string(),
            supplier_name: "A".to_string(),
            contact_person: "Kim".to_string(),
            phone: "010".to_string(),
            email: None,
            country: None,
            address: None,
            website: None,
            status: SupplierStatus::Active,
        });
        let results = vec![
            ValidationResult::accepted(2, inventory_row(), resolved()),
            ValidationResult::accepted(3, inventory_row(), supplier),
        ];

        let batch = ValidatedBatch::from_results(ImportCategory::Inventory, &results);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.rows()[0].record.category(), ImportCategory::Inventory);

        let batch = ValidatedBatch::from_results(ImportCategory::PartPrices, &results);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_preview_summary_counts() {
        let update = ResolvedRow::Inventory(ResolvedInventory {
            part_id: "p-1".to_string(),
            quantity: 5,
            location: "B-2".to_string(),
            action: InventoryAction::Update {
                inventory_id: "inv-1".to_string(),
            },
        });
        let results = vec![
            ValidationResult::accepted(2, inventory_row(), resolved()),
            ValidationResult::accepted(3, inventory_row(), update),
            ValidationResult::rejected(
                4,
                vec![FieldError::new(Field::PartCode, RowErrorCode::PartCodeRequired)],
            ),
        ];

        let summary = PreviewSummary::from_results(&results);

        assert_eq!(
            summary,
            PreviewSummary {
                total: 3,
                valid: 2,
                invalid: 1,
                to_insert: 1,
                to_update: 1,
            }
        );
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["toUpdate"], 1);
    }

    #[test]
    fn test_validation_result_wire_format() {
        let bad = ValidationResult::rejected(
            4,
            vec![FieldError::new(Field::Currency, RowErrorCode::InvalidCurrency)],
        );
        let json = serde_json::to_value(&bad).unwrap();

        assert_eq!(json["rowIndex"], 4);
        assert_eq!(json["valid"], false);
        assert_eq!(json["errors"][0]["field"], "currency");
        assert_eq!(
            json["errors"][0]["message"],
            "bulk_import.errors.invalid_currency"
        );
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_bulk_import_result_wire_format() {
        let result = BulkImportResult {
            success: false,
            inserted_count: 2,
            updated_count: 1,
            error: Some("boom".to_string()),
            partial_inserts: Some(vec!["a".to_string(), "b".to_string(), "c".to_string()]),
            failed_row_index: Some(5),
        };
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["insertedCount"], 2);
        assert_eq!(json["updatedCount"], 1);
        assert_eq!(json["partialInserts"].as_array().unwrap().len(), 3);
        assert_eq!(result.committed(), 3);
    }
}
