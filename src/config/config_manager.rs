// ==========================================
// CNC 零件库存管理 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config_kv 表 (scope_id + key + value)
// ==========================================

use crate::config::import_config_trait::{defaults, ConfigError, ImportConfigReader};
use crate::db::open_sqlite_connection;
use crate::domain::types::TemplateLanguage;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, ConfigError> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, ConfigError> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        self.get_config_value(key)
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;

        tracing::info!(config_key = key, value = value, "配置已更新");
        Ok(())
    }

    /// 读取并解析配置；缺失时使用默认值，格式错误时报错
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => raw.trim().parse::<T>().map_err(|e| {
                tracing::warn!(config_key = key, raw_value = %raw, "配置值格式错误");
                format!("配置值格式错误 (key: {}, value: {}): {}", key, raw, e).into()
            }),
        }
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_max_upload_bytes(&self) -> Result<u64, ConfigError> {
        self.get_parsed_or_default(config_keys::MAX_UPLOAD_BYTES, defaults::MAX_UPLOAD_BYTES)
    }

    async fn get_default_template_language(&self) -> Result<TemplateLanguage, ConfigError> {
        self.get_parsed_or_default(config_keys::DEFAULT_TEMPLATE_LANGUAGE, TemplateLanguage::DEFAULT)
    }

    async fn get_supplier_country_max_len(&self) -> Result<usize, ConfigError> {
        self.get_parsed_or_default(
            config_keys::SUPPLIER_COUNTRY_MAX_LEN,
            defaults::SUPPLIER_COUNTRY_MAX_LEN,
        )
    }

    async fn get_lookup_chunk_size(&self) -> Result<usize, ConfigError> {
        let size =
            self.get_parsed_or_default(config_keys::LOOKUP_CHUNK_SIZE, defaults::LOOKUP_CHUNK_SIZE)?;
        if size == 0 {
            return Err(format!("配置值必须大于 0 (key: {})", config_keys::LOOKUP_CHUNK_SIZE).into());
        }
        Ok(size)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 上传
    pub const MAX_UPLOAD_BYTES: &str = "bulk_import.max_upload_bytes";

    // 模板
    pub const DEFAULT_TEMPLATE_LANGUAGE: &str = "bulk_import.default_template_language";

    // 校验
    pub const SUPPLIER_COUNTRY_MAX_LEN: &str = "bulk_import.supplier_country_max_len";
    pub const LOOKUP_CHUNK_SIZE: &str = "bulk_import.lookup_chunk_size";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE config_kv (
                scope_id TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                PRIMARY KEY (scope_id, key)
            );",
        )
        .unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_absent() {
        let config = manager();

        assert_eq!(config.get_max_upload_bytes().await.unwrap(), 5_242_880);
        assert_eq!(
            config.get_default_template_language().await.unwrap(),
            TemplateLanguage::Ko
        );
        assert_eq!(config.get_supplier_country_max_len().await.unwrap(), 50);
        assert_eq!(config.get_lookup_chunk_size().await.unwrap(), 200);
    }

    #[tokio::test]
    async fn test_override_and_invalid_value() {
        let config = manager();

        config
            .set_global_config_value(config_keys::DEFAULT_TEMPLATE_LANGUAGE, "vi")
            .unwrap();
        assert_eq!(
            config.get_default_template_language().await.unwrap(),
            TemplateLanguage::Vi
        );

        config
            .set_global_config_value(config_keys::MAX_UPLOAD_BYTES, "five")
            .unwrap();
        assert!(config.get_max_upload_bytes().await.is_err());

        config
            .set_global_config_value(config_keys::LOOKUP_CHUNK_SIZE, "0")
            .unwrap();
        assert!(config.get_lookup_chunk_size().await.is_err());
    }
}
