// ==========================================
// CNC 零件库存管理 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 行级问题不是错误，走 ValidationResult.errors
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误（解析前拦截）=====
    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls）")]
    UnsupportedFormat(String),

    #[error("文件过大: {size} 字节，上限 {max} 字节")]
    FileTooLarge { size: u64, max: u64 },

    #[error("文件为空或无法解析: {0}")]
    EmptyOrInvalidFile(String),

    // ===== 数据存储错误 =====
    #[error("数据存储访问失败: {0}")]
    Store(#[from] RepositoryError),

    // ===== 模板错误 =====
    #[error("模板生成失败: {0}")]
    TemplateError(String),

    // ===== 配置错误 =====
    #[error("配置读取失败: {0}")]
    Config(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 所有文件级错误的 i18n key
    pub const MESSAGE_KEYS: [&'static str; 4] = [
        "bulk_import.errors.invalid_format",
        "bulk_import.errors.file_too_large",
        "bulk_import.errors.empty_file",
        "bulk_import.errors.read_failed",
    ];

    /// 面向用户的 i18n key
    pub fn message_key(&self) -> &'static str {
        match self {
            ImportError::UnsupportedFormat(_) => "bulk_import.errors.invalid_format",
            ImportError::FileTooLarge { .. } => "bulk_import.errors.file_too_large",
            ImportError::EmptyOrInvalidFile(_) => "bulk_import.errors.empty_file",
            _ => "bulk_import.errors.read_failed",
        }
    }

    /// 渲染 message_key 所需的参数
    pub fn message_args(&self) -> Vec<(&'static str, String)> {
        match self {
            ImportError::FileTooLarge { max, .. } => {
                let max_mb = (*max as f64) / (1024.0 * 1024.0);
                vec![("max_mb", format!("{}", (max_mb * 10.0).round() / 10.0))]
            }
            _ => Vec::new(),
        }
    }

    /// 是否为解析前即可判定的输入错误
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ImportError::UnsupportedFormat(_)
                | ImportError::FileTooLarge { .. }
                | ImportError::EmptyOrInvalidFile(_)
        )
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::EmptyOrInvalidFile(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ImportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ImportError::TemplateError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_keys() {
        let err = ImportError::FileTooLarge {
            size: 8 * 1024 * 1024,
            max: 5 * 1024 * 1024,
        };
        assert_eq!(err.message_key(), "bulk_import.errors.file_too_large");
        assert_eq!(err.message_args(), vec![("max_mb", "5".to_string())]);
        assert!(err.is_input_error());

        let err = ImportError::Store(RepositoryError::DatabaseQueryError("x".into()));
        assert_eq!(err.message_key(), "bulk_import.errors.read_failed");
        assert!(!err.is_input_error());
    }
}
