// ==========================================
// CNC 零件库存管理 - 批量导入 API
// ==========================================
// 职责: 封装模板下载 / 预览 / 确认写入三个用户操作
// 说明: 预览结果由调用方持有，确认时按值交回
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::bulk_import::{BulkImportResult, ImportContext};
use crate::domain::types::{ImportCategory, TemplateLanguage};
use crate::i18n;
use crate::importer::{BulkImporter, ImportPreview, TemplateFile};
use crate::repository::SqliteInventoryStore;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// 批量导入 API
pub struct BulkImportApi {
    importer: BulkImporter,
}

impl BulkImportApi {
    /// 打开数据库并装配默认导入管道
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（不存在时创建并建表）
    pub async fn new(db_path: &str) -> ApiResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn).map_err(|e| ApiError::DatabaseError(format!("建表失败: {}", e)))?;
        let conn = Arc::new(Mutex::new(conn));

        let store = Arc::new(SqliteInventoryStore::from_connection(conn.clone()));
        let config = ConfigManager::from_connection(conn)
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        let importer = BulkImporter::with_store(store, Arc::new(config)).await?;
        info!(db_path = db_path, "批量导入 API 初始化完成");

        Ok(Self { importer })
    }

    /// 下载模板
    ///
    /// # 参数
    /// - category: inventory / partPrices / suppliers
    /// - language: ko / vi，缺省时使用配置的默认语言
    pub async fn download_template(
        &self,
        category: &str,
        language: Option<&str>,
    ) -> ApiResult<TemplateFile> {
        let category = parse_category(category)?;
        let language = language.map(parse_language).transpose()?;

        Ok(self.importer.template(category, language).await?)
    }

    /// 上传文件并预览校验结果（不写入）
    pub async fn preview(
        &self,
        category: &str,
        file_name: &str,
        bytes: &[u8],
        factory_id: &str,
    ) -> ApiResult<ImportPreview> {
        let category = parse_category(category)?;
        if factory_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("factory_id 不能为空".to_string()));
        }

        Ok(self
            .importer
            .preview(category, file_name, bytes, factory_id)
            .await?)
    }

    /// 确认写入预览中的有效行
    ///
    /// # 错误
    /// - NoValidRows: 预览中没有有效行
    /// - InvalidInput: 上下文缺少 factory_id / user_id
    ///
    /// 写入失败不返回 Err，而是体现在 BulkImportResult 中
    pub async fn confirm(
        &self,
        preview: ImportPreview,
        ctx: &ImportContext,
    ) -> ApiResult<BulkImportResult> {
        if !preview.has_valid_rows() {
            warn!(category = %preview.category, "没有可导入的有效行");
            return Err(ApiError::NoValidRows);
        }
        if ctx.factory_id.trim().is_empty() || ctx.user_id.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "factory_id / user_id 不能为空".to_string(),
            ));
        }

        Ok(self.importer.commit(preview, ctx).await)
    }
}

fn parse_category(value: &str) -> ApiResult<ImportCategory> {
    value
        .parse()
        .map_err(|_| ApiError::InvalidInput(format!("无效的导入类别: {}", value)))
}

fn parse_language(value: &str) -> ApiResult<TemplateLanguage> {
    value
        .parse()
        .map_err(|_| ApiError::InvalidInput(format!("无效的模板语言: {}", value)))
}

/// 将导入结果渲染为用户消息
pub fn result_message(result: &BulkImportResult, locale: &str) -> String {
    if result.success {
        let inserted = result.inserted_count.to_string();
        let updated = result.updated_count.to_string();
        return i18n::translate_with_args(
            "bulk_import.success.imported",
            locale,
            &[("inserted", inserted.as_str()), ("updated", updated.as_str())],
        );
    }

    let committed = result.committed().to_string();
    let row = result
        .failed_row_index
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_string());
    i18n::translate_with_args(
        "bulk_import.errors.import_failed",
        locale,
        &[
            ("committed", committed.as_str()),
            ("row", row.as_str()),
            ("error", result.error.as_deref().unwrap_or_default()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category_and_language() {
        assert_eq!(parse_category("partPrices").unwrap(), ImportCategory::PartPrices);
        assert!(matches!(parse_category("orders"), Err(ApiError::InvalidInput(_))));
        assert_eq!(parse_language("vi").unwrap(), TemplateLanguage::Vi);
        assert!(parse_language("en").is_err());
    }

    #[test]
    fn test_result_message() {
        let ok = BulkImportResult {
            success: true,
            inserted_count: 3,
            updated_count: 1,
            error: None,
            partial_inserts: None,
            failed_row_index: None,
        };
        let msg = result_message(&ok, "en");
        assert!(msg.contains('3'));
        assert!(msg.contains('1'));

        let failed = BulkImportResult {
            success: false,
            inserted_count: 2,
            updated_count: 0,
            error: Some("UNIQUE constraint failed".to_string()),
            partial_inserts: Some(vec!["a".to_string(), "b".to_string()]),
            failed_row_index: Some(7),
        };
        let msg = result_message(&failed, "vi");
        assert!(msg.contains('7'));
        assert!(msg.contains("UNIQUE constraint failed"));
    }
}
