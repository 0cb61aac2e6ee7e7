// ==========================================
// CNC 零件库存管理 - 批量导入阶段 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 管道: 读取 → 表头识别/映射 → 校验 → 写入
// ==========================================

use crate::domain::bulk_import::{BulkImportResult, ImportContext, ValidatedBatch, ValidationResult};
use crate::domain::types::ImportCategory;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::{CandidateRow, ParsedSheet};
use crate::importer::file_parser::SpreadsheetGrid;
use async_trait::async_trait;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 表格读取（阶段 0）
// 实现者: ExcelGridReader
pub trait FileParser: Send + Sync {
    /// 读取首个工作表为网格
    ///
    /// # 错误
    /// - EmptyOrInvalidFile: 无法解析或首个工作表无任何行
    fn read_grid(&self, bytes: &[u8]) -> ImportResult<SpreadsheetGrid>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 表头语言识别 + 行映射（阶段 1）
// 实现者: VocabularyFieldMapper
pub trait FieldMapper: Send + Sync {
    /// 将网格映射为候选行，表头语言每个文件只判定一次
    fn map_sheet(&self, category: ImportCategory, grid: &SpreadsheetGrid) -> ParsedSheet;
}

// ==========================================
// RowValidator Trait
// ==========================================
// 用途: 行校验与外键解析（阶段 2）
// 实现者: RowValidatorImpl
// 约束: 只读，不得写入数据存储；同输入同存储状态下结果一致
#[async_trait]
pub trait RowValidator: Send + Sync {
    /// 每个候选行产出一个 ValidationResult，保持输入顺序
    ///
    /// # 错误
    /// - Store: 读取数据存储失败（不产出部分结果）
    async fn validate(
        &self,
        category: ImportCategory,
        rows: &[CandidateRow],
        factory_id: &str,
    ) -> ImportResult<Vec<ValidationResult>>;
}

// ==========================================
// BulkWriter Trait
// ==========================================
// 用途: 提交有效行（阶段 3）
// 实现者: BulkWriterImpl
// 约束: 逐行提交，失败即停止，不回滚已提交行
#[async_trait]
pub trait BulkWriter: Send + Sync {
    /// 写入失败体现在 BulkImportResult 中，而非 Err
    async fn commit(&self, batch: ValidatedBatch, ctx: &ImportContext) -> BulkImportResult;
}
