// ==========================================
// CNC 零件库存管理 - 批量导入编排器
// ==========================================
// 流程: 上传预检 → 读取 → 表头识别/映射 → 校验（预览）→ 确认写入
// 说明:
// - 预览与写入是两次独立的用户操作
// - 写入消费预览（按值传入），同一预览最多提交一次
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::bulk_import::{
    BulkImportResult, ImportContext, PreviewSummary, ValidatedBatch, ValidationResult,
};
use crate::domain::types::{ImportCategory, TemplateLanguage};
use crate::importer::bulk_import_trait::{BulkWriter, FieldMapper, FileParser, RowValidator};
use crate::importer::bulk_writer::BulkWriterImpl;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::VocabularyFieldMapper;
use crate::importer::file_parser::{check_upload, ExcelGridReader};
use crate::importer::row_validator::{RowValidatorImpl, ValidationRules};
use crate::importer::template_generator::{self, TemplateFile};
use crate::repository::InventoryStore;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// 一次预览的结果（供用户确认）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview {
    pub category: ImportCategory,
    pub detected_language: TemplateLanguage,
    pub results: Vec<ValidationResult>,
    pub summary: PreviewSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unmapped_headers: Vec<String>,
}

impl ImportPreview {
    pub fn has_valid_rows(&self) -> bool {
        self.summary.valid > 0
    }
}

// ==========================================
// BulkImporter
// ==========================================
pub struct BulkImporter {
    // 配置读取器
    config: Arc<dyn ImportConfigReader>,

    // 导入组件
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
    row_validator: Box<dyn RowValidator>,
    bulk_writer: Box<dyn BulkWriter>,
}

impl BulkImporter {
    pub fn new(
        config: Arc<dyn ImportConfigReader>,
        file_parser: Box<dyn FileParser>,
        field_mapper: Box<dyn FieldMapper>,
        row_validator: Box<dyn RowValidator>,
        bulk_writer: Box<dyn BulkWriter>,
    ) -> Self {
        Self {
            config,
            file_parser,
            field_mapper,
            row_validator,
            bulk_writer,
        }
    }

    /// 使用默认组件装配（Excel 读取 + 词汇表映射 + 存储校验/写入）
    ///
    /// # 错误
    /// - Config: 校验参数读取失败
    pub async fn with_store<S>(
        store: Arc<S>,
        config: Arc<dyn ImportConfigReader>,
    ) -> ImportResult<Self>
    where
        S: InventoryStore + ?Sized + 'static,
    {
        let rules = ValidationRules::load(config.as_ref()).await?;

        Ok(Self::new(
            config,
            Box::new(ExcelGridReader),
            Box::new(VocabularyFieldMapper),
            Box::new(RowValidatorImpl::new(store.clone(), rules)),
            Box::new(BulkWriterImpl::new(store)),
        ))
    }

    /// 生成模板；未指定语言时使用配置的默认语言
    pub async fn template(
        &self,
        category: ImportCategory,
        language: Option<TemplateLanguage>,
    ) -> ImportResult<TemplateFile> {
        let language = match language {
            Some(language) => language,
            None => self
                .config
                .get_default_template_language()
                .await
                .map_err(|e| ImportError::Config(e.to_string()))?,
        };

        template_generator::generate(category, language)
    }

    /// 预览: 预检 → 读取 → 映射 → 校验
    ///
    /// # 错误
    /// - UnsupportedFormat / FileTooLarge: 解析前拦截
    /// - EmptyOrInvalidFile: 无法解析或无非空数据行
    /// - Store: 校验时读取数据存储失败
    #[instrument(skip(self, bytes), fields(category = %category, size = bytes.len()))]
    pub async fn preview(
        &self,
        category: ImportCategory,
        file_name: &str,
        bytes: &[u8],
        factory_id: &str,
    ) -> ImportResult<ImportPreview> {
        let start_time = Instant::now();

        // === 步骤 1: 上传预检 ===
        let max_bytes = self
            .config
            .get_max_upload_bytes()
            .await
            .map_err(|e| ImportError::Config(e.to_string()))?;
        check_upload(file_name, bytes.len() as u64, max_bytes)?;

        // === 步骤 2: 读取 ===
        let grid = self.file_parser.read_grid(bytes)?;

        // === 步骤 3: 表头识别 + 映射 ===
        let sheet = self.field_mapper.map_sheet(category, &grid);
        if sheet.rows.is_empty() {
            warn!(file_name = file_name, "无非空数据行");
            return Err(ImportError::EmptyOrInvalidFile("无非空数据行".to_string()));
        }
        if !sheet.unmapped_headers.is_empty() {
            warn!(headers = ?sheet.unmapped_headers, "存在未识别表头，对应列被忽略");
        }

        // === 步骤 4: 校验 ===
        let results = self
            .row_validator
            .validate(category, &sheet.rows, factory_id)
            .await?;
        let summary = PreviewSummary::from_results(&results);

        info!(
            total = summary.total,
            valid = summary.valid,
            invalid = summary.invalid,
            to_insert = summary.to_insert,
            to_update = summary.to_update,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "预览完成"
        );

        Ok(ImportPreview {
            category,
            detected_language: sheet.detected_language,
            results,
            summary,
            unmapped_headers: sheet.unmapped_headers,
        })
    }

    /// 确认写入: 仅提交预览中的有效行
    #[instrument(skip(self, preview, ctx), fields(category = %preview.category))]
    pub async fn commit(&self, preview: ImportPreview, ctx: &ImportContext) -> BulkImportResult {
        let batch = ValidatedBatch::from_results(preview.category, &preview.results);
        info!(
            rows = batch.len(),
            skipped = preview.summary.invalid,
            "开始写入"
        );
        self.bulk_writer.commit(batch, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefaultImportConfig;
    use crate::domain::bulk_import::{
        FieldError, InventoryAction, ResolvedInventory, ResolvedRow, RowErrorCode,
    };
    use crate::domain::types::Field;
    use crate::importer::field_mapper::CandidateRow;
    use crate::importer::file_parser::{CellValue, SpreadsheetGrid};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FixedGrid {
        rows: Vec<Vec<&'static str>>,
        calls: Arc<AtomicUsize>,
    }

    impl FileParser for FixedGrid {
        fn read_grid(&self, _: &[u8]) -> ImportResult<SpreadsheetGrid> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SpreadsheetGrid {
                header_row_number: 1,
                rows: self
                    .rows
                    .iter()
                    .map(|r| {
                        r.iter()
                            .map(|s| {
                                if s.is_empty() {
                                    CellValue::Empty
                                } else {
                                    CellValue::Text(s.to_string())
                                }
                            })
                            .collect()
                    })
                    .collect(),
            })
        }
    }

    // 偶数行有效，奇数行缺少位置
    struct ParityValidator;

    #[async_trait]
    impl RowValidator for ParityValidator {
        async fn validate(
            &self,
            _: ImportCategory,
            rows: &[CandidateRow],
            _: &str,
        ) -> ImportResult<Vec<ValidationResult>> {
            Ok(rows
                .iter()
                .map(|r| {
                    if r.row_index % 2 == 0 {
                        ValidationResult::accepted(
                            r.row_index,
                            r.row.clone(),
                            ResolvedRow::Inventory(ResolvedInventory {
                                part_id: format!("p-{}", r.row_index),
                                quantity: 1,
                                location: "A".to_string(),
                                action: InventoryAction::Insert,
                            }),
                        )
                    } else {
                        ValidationResult::rejected(
                            r.row_index,
                            vec![FieldError::new(Field::Location, RowErrorCode::LocationRequired)],
                        )
                    }
                })
                .collect())
        }
    }

    #[derive(Default)]
    struct RecordingWriter {
        committed_rows: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl BulkWriter for Arc<RecordingWriter> {
        async fn commit(&self, batch: ValidatedBatch, _: &ImportContext) -> BulkImportResult {
            let rows: Vec<usize> = batch.rows().iter().map(|r| r.row_index).collect();
            let inserted = rows.len();
            self.committed_rows.lock().unwrap().extend(rows);
            BulkImportResult {
                success: true,
                inserted_count: inserted,
                updated_count: 0,
                error: None,
                partial_inserts: None,
                failed_row_index: None,
            }
        }
    }

    fn importer(
        rows: Vec<Vec<&'static str>>,
    ) -> (BulkImporter, Arc<AtomicUsize>, Arc<RecordingWriter>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let writer = Arc::new(RecordingWriter::default());
        let importer = BulkImporter::new(
            Arc::new(DefaultImportConfig),
            Box::new(FixedGrid {
                rows,
                calls: calls.clone(),
            }),
            Box::new(VocabularyFieldMapper),
            Box::new(ParityValidator),
            Box::new(writer.clone()),
        );
        (importer, calls, writer)
    }

    #[tokio::test]
    async fn test_oversized_file_rejected_before_parsing() {
        let (importer, calls, _) = importer(vec![vec!["부품코드"]]);
        let bytes = vec![0u8; 8 * 1024 * 1024];

        let err = importer
            .preview(ImportCategory::Inventory, "big.xlsx", &bytes, "f-1")
            .await
            .unwrap_err();

        assert!(matches!(err, ImportError::FileTooLarge { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_wrong_extension_rejected_before_parsing() {
        let (importer, calls, _) = importer(vec![vec!["부품코드"]]);

        let err = importer
            .preview(ImportCategory::Inventory, "data.csv", b"a,b", "f-1")
            .await
            .unwrap_err();

        assert!(matches!(err, ImportError::UnsupportedFormat(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_header_only_file_is_empty() {
        let (importer, _, _) = importer(vec![vec!["부품코드", "수량", "위치"], vec!["", "", ""]]);

        let err = importer
            .preview(ImportCategory::Inventory, "a.xlsx", b"x", "f-1")
            .await
            .unwrap_err();

        assert!(matches!(err, ImportError::EmptyOrInvalidFile(_)));
        assert_eq!(err.message_key(), "bulk_import.errors.empty_file");
    }

    #[tokio::test]
    async fn test_commit_only_valid_rows() {
        let (importer, _, writer) = importer(vec![
            vec!["Mã phụ tùng", "Số lượng", "Vị trí", "Ghi chú"],
            vec!["MT001", "1", "A", ""],
            vec!["MT002", "1", "", ""],
            vec!["MT003", "1", "A", ""],
        ]);

        let preview = importer
            .preview(ImportCategory::Inventory, "kho.XLSX", b"x", "f-1")
            .await
            .unwrap();

        assert_eq!(preview.detected_language, TemplateLanguage::Vi);
        assert_eq!(preview.summary.total, 3);
        assert_eq!(preview.summary.valid, 2);
        assert_eq!(preview.summary.invalid, 1);
        assert_eq!(preview.unmapped_headers, vec!["Ghi chú".to_string()]);
        assert!(preview.has_valid_rows());

        let result = importer
            .commit(preview, &ImportContext::new("f-1", "u-1"))
            .await;

        assert!(result.success);
        assert_eq!(result.inserted_count, 2);
        assert_eq!(*writer.committed_rows.lock().unwrap(), vec![2, 4]);
    }

    #[tokio::test]
    async fn test_template_uses_configured_default_language() {
        let (importer, _, _) = importer(Vec::new());

        let file = importer
            .template(ImportCategory::Suppliers, None)
            .await
            .unwrap();
        assert_eq!(file.file_name, "공급업체_템플릿.xlsx");

        let file = importer
            .template(ImportCategory::Suppliers, Some(TemplateLanguage::Vi))
            .await
            .unwrap();
        assert_eq!(file.file_name, "mau_nha_cung_cap.xlsx");
    }
}
