// ==========================================
// CNC 零件库存管理 - 表格读取器
// ==========================================
// 阶段 0: 上传预检 + 读取首个工作表为单元格网格
// 支持: Excel (.xlsx/.xls)
// ==========================================

use crate::importer::bulk_import_trait::FileParser;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::NaiveDate;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

/// 允许的扩展名（小写）
pub const ALLOWED_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

// ==========================================
// CellValue - 单元格值
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// 去除首尾空白后为空即视为空单元格
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 文本形式（已 trim；空白返回 None）
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::Bool(b) => Some(b.to_string()),
        }
    }

    /// 数值形式
    ///
    /// # 返回
    /// - None: 空单元格
    /// - Some(0.0): 有内容但无法解析为数字
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Empty => None,
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    // 千分位 / 小数逗号含义不明确，一律按无法解析处理
                    Some(trimmed.parse::<f64>().ok().filter(|n| n.is_finite()).unwrap_or(0.0))
                }
            }
            CellValue::Bool(_) => Some(0.0),
        }
    }
}

/// 整数值不带小数点（1.0 → "1"）
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ==========================================
// SpreadsheetGrid - 首个工作表的网格
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadsheetGrid {
    /// 表头所在的物理行号（1 起）
    pub header_row_number: usize,
    /// rows[0] 为表头
    pub rows: Vec<Vec<CellValue>>,
}

impl SpreadsheetGrid {
    pub fn header(&self) -> &[CellValue] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// 表头文本（已 trim）
    pub fn header_texts(&self) -> Vec<String> {
        self.header()
            .iter()
            .map(|c| c.as_text().unwrap_or_default())
            .collect()
    }

    /// 数据行及其物理行号
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[CellValue])> + '_ {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(move |(idx, row)| (self.header_row_number + idx, row.as_slice()))
    }
}

// ==========================================
// 上传预检（解析前）
// ==========================================

/// 校验扩展名与文件大小
///
/// # 错误
/// - UnsupportedFormat: 扩展名不是 .xlsx/.xls
/// - FileTooLarge: 超过上限
pub fn check_upload(file_name: &str, size: u64, max_bytes: u64) -> ImportResult<()> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        warn!(file_name = file_name, "文件格式不支持");
        return Err(ImportError::UnsupportedFormat(file_name.to_string()));
    }

    if size > max_bytes {
        warn!(file_name = file_name, size = size, max = max_bytes, "文件过大");
        return Err(ImportError::FileTooLarge {
            size,
            max: max_bytes,
        });
    }

    Ok(())
}

// ==========================================
// ExcelGridReader - FileParser 实现
// ==========================================
pub struct ExcelGridReader;

impl ExcelGridReader {
    fn convert_cell(cell: &Data) -> CellValue {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            // 日期单元格统一转为 YYYY-MM-DD 文本
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(value) => CellValue::Text(value.date().format("%Y-%m-%d").to_string()),
                None => CellValue::Number(dt.as_f64()),
            },
            Data::DateTimeIso(s) => {
                let date_part = s.get(..10).unwrap_or(s);
                match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
                    Ok(date) => CellValue::Text(date.format("%Y-%m-%d").to_string()),
                    Err(_) => CellValue::Text(s.clone()),
                }
            }
            Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(_) => CellValue::Empty,
        }
    }
}

impl FileParser for ExcelGridReader {
    fn read_grid(&self, bytes: &[u8]) -> ImportResult<SpreadsheetGrid> {
        let cursor = Cursor::new(bytes.to_vec());
        let mut workbook = open_workbook_auto_from_rs(cursor)?;

        // 只读取第一个工作表
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ImportError::EmptyOrInvalidFile("工作簿无工作表".to_string()))??;

        let rows: Vec<Vec<CellValue>> = range
            .rows()
            .map(|row| row.iter().map(Self::convert_cell).collect())
            .collect();

        if rows.is_empty() {
            return Err(ImportError::EmptyOrInvalidFile("工作表无数据".to_string()));
        }

        // Range 从第一个非空单元格开始，换算回物理行号
        let header_row_number = range.start().map(|(r, _)| r as usize + 1).unwrap_or(1);

        debug!(
            rows = rows.len(),
            header_row_number = header_row_number,
            "工作表读取完成"
        );

        Ok(SpreadsheetGrid {
            header_row_number,
            rows,
        })
    }
}
