// ==========================================
// CNC 零件库存管理 - 领域模型层
// ==========================================
// 职责: 定义导入类型、导入行、校验结果、写入载荷
// 红线: 不含数据访问逻辑
// ==========================================

pub mod bulk_import;
pub mod inventory;
pub mod types;

// 重导出核心类型
pub use bulk_import::{
    BulkImportResult, FieldError, ImportContext, InventoryAction, InventoryImportRow,
    ParsedRow, PartPriceImportRow, PreviewSummary, ResolvedInventory, ResolvedPartPrice,
    ResolvedRow, ResolvedSupplier, RowErrorCode, SupplierImportRow, ValidatedBatch, ValidatedRow,
    ValidationResult,
};
pub use inventory::{
    InventoryRef, InventoryUpdate, NewInventory, NewPartPrice, NewSupplier, PartRef, SupplierRef,
};
pub use types::{Currency, Field, FieldKind, ImportCategory, SupplierStatus, TemplateLanguage};
