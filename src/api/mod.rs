// ==========================================
// CNC 零件库存管理 - API 层
// ==========================================
// 职责: 提供批量导入业务接口，供 CLI 或上层应用调用
// ==========================================

pub mod error;
pub mod import_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use import_api::{result_message, BulkImportApi};
