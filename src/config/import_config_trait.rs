// ==========================================
// CNC 零件库存管理 - 导入配置读取 Trait
// ==========================================
// 职责: 定义批量导入所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::types::TemplateLanguage;
use async_trait::async_trait;
use std::error::Error;

/// 配置读取错误
pub type ConfigError = Box<dyn Error + Send + Sync>;

// ==========================================
// 默认值
// ==========================================
pub mod defaults {
    /// 上传文件大小上限: 5 MB
    pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;
    /// 供应商国家字段最大长度
    pub const SUPPLIER_COUNTRY_MAX_LEN: usize = 50;
    /// IN (...) 批量查询分块大小
    pub const LOOKUP_CHUNK_SIZE: usize = 200;
}

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 上传文件大小上限（字节）
    ///
    /// # 默认值
    /// - 5242880
    async fn get_max_upload_bytes(&self) -> Result<u64, ConfigError>;

    /// 模板下载的默认语言
    ///
    /// # 默认值
    /// - ko
    async fn get_default_template_language(&self) -> Result<TemplateLanguage, ConfigError>;

    /// 供应商 country 字段最大长度
    ///
    /// # 默认值
    /// - 50
    async fn get_supplier_country_max_len(&self) -> Result<usize, ConfigError>;

    /// 批量查询时每条 SQL 的 IN 参数个数上限
    ///
    /// # 默认值
    /// - 200
    async fn get_lookup_chunk_size(&self) -> Result<usize, ConfigError>;
}

// ==========================================
// DefaultImportConfig - 全默认值实现
// ==========================================
// 用途: 无 config_kv 表时（测试 / 临时库）直接使用默认值
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultImportConfig;

#[async_trait]
impl ImportConfigReader for DefaultImportConfig {
    async fn get_max_upload_bytes(&self) -> Result<u64, ConfigError> {
        Ok(defaults::MAX_UPLOAD_BYTES)
    }

    async fn get_default_template_language(&self) -> Result<TemplateLanguage, ConfigError> {
        Ok(TemplateLanguage::DEFAULT)
    }

    async fn get_supplier_country_max_len(&self) -> Result<usize, ConfigError> {
        Ok(defaults::SUPPLIER_COUNTRY_MAX_LEN)
    }

    async fn get_lookup_chunk_size(&self) -> Result<usize, ConfigError> {
        Ok(defaults::LOOKUP_CHUNK_SIZE)
    }
}
