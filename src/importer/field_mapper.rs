// ==========================================
// CNC 零件库存管理 - 行映射器
// ==========================================
// 阶段 1: 网格行 → 类别导入行 (ParsedRow)
// 规则:
// - 全空白行跳过，行号保持物理行号
// - 数值字段: 可解析取值，不可解析记 0，空白视为缺失
// - 文本字段: trim，空白视为缺失
// - 未识别表头的列忽略
// ==========================================

use crate::domain::bulk_import::ParsedRow;
use crate::domain::types::{Field, FieldKind, ImportCategory, TemplateLanguage};
use crate::importer::bulk_import_trait::FieldMapper;
use crate::importer::file_parser::SpreadsheetGrid;
use crate::importer::header_detector::detect_language;
use crate::importer::header_vocabulary::resolve_header;
use tracing::{debug, info};

/// 映射后的候选行
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRow {
    /// 物理行号（表头为第 1 行时，首个数据行为 2）
    pub row_index: usize,
    pub row: ParsedRow,
}

/// 一个文件的映射结果
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSheet {
    pub category: ImportCategory,
    pub detected_language: TemplateLanguage,
    pub rows: Vec<CandidateRow>,
    /// 未能识别的非空表头
    pub unmapped_headers: Vec<String>,
}

// ==========================================
// VocabularyFieldMapper - FieldMapper 实现
// ==========================================
pub struct VocabularyFieldMapper;

impl VocabularyFieldMapper {
    /// 列下标 → 标准字段；同一字段出现多次时取第一列
    fn column_map(
        category: ImportCategory,
        language: TemplateLanguage,
        headers: &[String],
    ) -> (Vec<(usize, Field)>, Vec<String>) {
        let mut mapped: Vec<(usize, Field)> = Vec::new();
        let mut unmapped = Vec::new();

        for (col, header) in headers.iter().enumerate() {
            let header = header.trim();
            if header.is_empty() {
                continue;
            }
            match resolve_header(category, language, header) {
                Some(field) if !mapped.iter().any(|(_, f)| *f == field) => {
                    mapped.push((col, field))
                }
                Some(_) => {}
                None => unmapped.push(header.to_string()),
            }
        }

        (mapped, unmapped)
    }
}

impl FieldMapper for VocabularyFieldMapper {
    fn map_sheet(&self, category: ImportCategory, grid: &SpreadsheetGrid) -> ParsedSheet {
        let headers = grid.header_texts();
        let language = detect_language(category, &headers);
        let (columns, unmapped_headers) = Self::column_map(category, language, &headers);

        info!(
            category = %category,
            language = %language,
            mapped_columns = columns.len(),
            unmapped_columns = unmapped_headers.len(),
            "表头识别完成"
        );

        let mut rows = Vec::new();
        for (row_index, cells) in grid.data_rows() {
            if cells.iter().all(|c| c.is_blank()) {
                debug!(row_index = row_index, "跳过空白行");
                continue;
            }

            let mut row = ParsedRow::empty(category);
            for (col, field) in &columns {
                let Some(cell) = cells.get(*col) else {
                    continue;
                };
                match field.kind() {
                    FieldKind::Number => {
                        if let Some(n) = cell.as_number() {
                            row.set_number(*field, n);
                        }
                    }
                    FieldKind::Text => {
                        if let Some(text) = cell.as_text() {
                            row.set_text(*field, text);
                        }
                    }
                }
            }

            rows.push(CandidateRow { row_index, row });
        }

        ParsedSheet {
            category,
            detected_language: language,
            rows,
            unmapped_headers,
        }
    }
}
