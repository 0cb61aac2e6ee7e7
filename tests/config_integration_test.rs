// ==========================================
// 导入配置集成测试
// ==========================================
// config_kv 中的覆盖值经 BulkImportApi 生效

use cnc_inventory::api::{ApiError, BulkImportApi};
use cnc_inventory::config::{config_keys, ConfigManager, ImportConfigReader};
use cnc_inventory::domain::{Field, RowErrorCode};
use cnc_inventory::TemplateLanguage;

use test_helpers::*;

#[tokio::test]
async fn test_defaults_when_config_is_empty() {
    let (_temp_file, db_path) = create_test_db().expect("创建测试数据库失败");
    let config = ConfigManager::new(&db_path).unwrap();

    assert_eq!(
        config
            .get_global_config_value(config_keys::MAX_UPLOAD_BYTES)
            .unwrap(),
        None
    );
    assert_eq!(config.get_max_upload_bytes().await.unwrap(), 5 * 1024 * 1024);
    assert_eq!(
        config.get_default_template_language().await.unwrap(),
        TemplateLanguage::Ko
    );
    assert_eq!(config.get_supplier_country_max_len().await.unwrap(), 50);
    assert_eq!(config.get_lookup_chunk_size().await.unwrap(), 200);
}

#[tokio::test]
async fn test_max_upload_override() {
    let (_temp_file, db_path) = create_test_db().expect("创建测试数据库失败");
    set_config(&db_path, config_keys::MAX_UPLOAD_BYTES, "1024");
    let api = BulkImportApi::new(&db_path).await.unwrap();

    let err = api
        .preview("inventory", "a.xlsx", &vec![0u8; 2048], FACTORY_ID)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::FileRejected { .. }));
    assert_eq!(err.message_key(), "bulk_import.errors.file_too_large");
}

#[tokio::test]
async fn test_default_template_language_override() {
    let (_temp_file, db_path) = create_test_db().expect("创建测试数据库失败");
    set_config(&db_path, config_keys::DEFAULT_TEMPLATE_LANGUAGE, "vi");
    let api = BulkImportApi::new(&db_path).await.unwrap();

    let file = api.download_template("partPrices", None).await.unwrap();
    assert_eq!(file.file_name, "mau_don_gia.xlsx");

    let file = api.download_template("partPrices", Some("ko")).await.unwrap();
    assert_eq!(file.file_name, "단가_템플릿.xlsx");

    let err = api.download_template("orders", None).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn test_country_length_and_chunk_size_overrides() {
    let (_temp_file, db_path) = create_test_db().expect("创建测试数据库失败");
    set_config(&db_path, config_keys::SUPPLIER_COUNTRY_MAX_LEN, "5");
    set_config(&db_path, config_keys::LOOKUP_CHUNK_SIZE, "1");
    seed_supplier(&db_path, FACTORY_ID, "s-1", "SUP001");
    let api = BulkImportApi::new(&db_path).await.unwrap();

    let bytes = build_xlsx(
        &["공급업체코드", "이름", "담당자", "전화번호", "이메일", "국가"],
        &[
            vec![t("SUP001"), t("A"), t("김"), t("010"), Cell::Blank, t("Korea")],
            vec![t("SUP002"), t("B"), t("이"), t("011"), t("b@x.com"), t("Vietnam")],
            vec![t("SUP003"), t("C"), t("박"), t("012"), t("not-an-email"), t("VN")],
        ],
    );
    let preview = api
        .preview("suppliers", "공급업체.xlsx", &bytes, FACTORY_ID)
        .await
        .unwrap();

    // 分块为 1 时仍能查到既有编码
    assert_eq!(
        preview.results[0].errors()[0].code,
        RowErrorCode::DuplicateSupplierCode
    );
    assert!(preview.results[1].has_error_on(Field::Country));
    assert!(preview.results[2].has_error_on(Field::Email));
    assert!(!preview.results[2].has_error_on(Field::Country));
}

#[tokio::test]
async fn test_unparsable_config_value_fails_fast() {
    let (_temp_file, db_path) = create_test_db().expect("创建测试数据库失败");
    set_config(&db_path, config_keys::LOOKUP_CHUNK_SIZE, "lots");

    let result = BulkImportApi::new(&db_path).await;

    assert!(matches!(result, Err(ApiError::ConfigError(_))));
}
