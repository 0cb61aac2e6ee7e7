// ==========================================
// CNC 零件库存管理 - API 层错误类型
// ==========================================
// 职责: 将导入层/仓储层错误转换为面向用户的错误
// 约束: 每个错误都有可翻译的 message_key（ko / vi / en）
// ==========================================

use crate::i18n;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    /// 文件在解析前或解析时被拒绝（格式/大小/空文件）
    #[error("文件被拒绝: {message}")]
    FileRejected {
        message_key: &'static str,
        args: Vec<(&'static str, String)>,
        message: String,
    },

    #[error("没有可导入的有效行")]
    NoValidRows,

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 基础设施错误
    // ==========================================
    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("模板生成失败: {0}")]
    TemplateError(String),

    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 面向用户的 i18n key
    pub fn message_key(&self) -> &'static str {
        match self {
            ApiError::FileRejected { message_key, .. } => *message_key,
            ApiError::NoValidRows => "bulk_import.errors.no_valid_rows",
            _ => "bulk_import.errors.read_failed",
        }
    }

    /// 按指定语言渲染错误消息
    pub fn localized(&self, locale: &str) -> String {
        match self {
            ApiError::FileRejected { args, .. } => {
                let args: Vec<(&str, &str)> = args.iter().map(|(k, v)| (*k, v.as_str())).collect();
                i18n::translate_with_args(self.message_key(), locale, &args)
            }
            _ => i18n::translate(self.message_key(), locale),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        if err.is_input_error() {
            return ApiError::FileRejected {
                message_key: err.message_key(),
                args: err.message_args(),
                message: err.to_string(),
            };
        }

        match err {
            ImportError::Store(repo_err) => repo_err.into(),
            ImportError::TemplateError(msg) => ApiError::TemplateError(msg),
            ImportError::Config(msg) => ApiError::ConfigError(msg),
            ImportError::Other(err) => ApiError::Other(err),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
