// ==========================================
// CNC 零件库存管理 - 核心库
// ==========================================
// 功能: Excel 批量导入（库存 / 零件单价 / 供应商）
// 技术栈: Rust + SQLite
// 定位: 预览后由人工确认写入
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "ko");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 导入行 / 校验结果 / 写入记录
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 读取 / 映射 / 校验 / 写入 / 模板
pub mod importer;

// 配置层 - 导入参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Currency, Field, ImportCategory, SupplierStatus, TemplateLanguage};

// 领域实体
pub use domain::{BulkImportResult, ImportContext, PreviewSummary, ValidationResult};

// 导入管道
pub use importer::{BulkImporter, ImportError, ImportPreview, TemplateFile};

// API
pub use api::{ApiError, BulkImportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "CNC 零件库存管理";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
