// ==========================================
// CNC 零件库存管理 - 批量导入层
// ==========================================
// 职责: 表格文件 → 校验结果 → 数据存储
// 支持: Excel (.xlsx, .xls)；类别: 库存 / 单价 / 供应商
// ==========================================

// 模块声明
pub mod bulk_import_trait;
pub mod bulk_importer;
pub mod bulk_writer;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod header_detector;
pub mod header_vocabulary;
pub mod row_validator;
pub mod template_generator;

// 重导出核心类型
pub use bulk_importer::{BulkImporter, ImportPreview};
pub use bulk_writer::BulkWriterImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{CandidateRow, ParsedSheet, VocabularyFieldMapper};
pub use file_parser::{check_upload, CellValue, ExcelGridReader, SpreadsheetGrid};
pub use header_detector::detect_language;
pub use row_validator::{RowValidatorImpl, ValidationRules};
pub use template_generator::TemplateFile;

// 重导出 Trait 接口
pub use bulk_import_trait::{BulkWriter, FieldMapper, FileParser, RowValidator};
