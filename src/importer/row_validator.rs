// ==========================================
// CNC 零件库存管理 - 行校验器
// ==========================================
// 阶段 2: 必填/格式校验 + 外键解析 + 文件内重复检测
// 约束:
// - 只读数据存储，编码批量查询（按块 IN 查询）
// - 行级问题累积为 FieldError，不抛错
// - 外键在此解析一次，写入阶段直接使用
// ==========================================

use crate::config::{defaults, ImportConfigReader};
use crate::domain::bulk_import::{
    FieldError, InventoryAction, InventoryImportRow, ParsedRow, PartPriceImportRow,
    ResolvedInventory, ResolvedPartPrice, ResolvedRow, ResolvedSupplier, RowErrorCode,
    SupplierImportRow, ValidationResult,
};
use crate::domain::inventory::{InventoryRef, PartRef, SupplierRef};
use crate::domain::types::{Currency, Field, ImportCategory, SupplierStatus};
use crate::importer::bulk_import_trait::RowValidator;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::CandidateRow;
use crate::repository::InventoryStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock};
use tracing::{info, instrument};

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

static DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date regex"));

// ==========================================
// ValidationRules - 可配置的校验参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRules {
    pub country_max_len: usize,
    pub lookup_chunk_size: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            country_max_len: defaults::SUPPLIER_COUNTRY_MAX_LEN,
            lookup_chunk_size: defaults::LOOKUP_CHUNK_SIZE,
        }
    }
}

impl ValidationRules {
    /// 从配置读取
    pub async fn load(config: &dyn ImportConfigReader) -> ImportResult<Self> {
        let country_max_len = config
            .get_supplier_country_max_len()
            .await
            .map_err(|e| ImportError::Config(e.to_string()))?;
        let lookup_chunk_size = config
            .get_lookup_chunk_size()
            .await
            .map_err(|e| ImportError::Config(e.to_string()))?;

        Ok(Self {
            country_max_len,
            lookup_chunk_size,
        })
    }
}

// ==========================================
// 字段级规则（纯函数）
// ==========================================

/// 编码规范化: trim + 大写；空白返回 None
pub fn normalize_code(code: Option<&str>) -> Option<String> {
    code.map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_uppercase)
}

/// 数量: 非负整数
pub fn parse_quantity(value: Option<f64>) -> Option<i64> {
    value
        .filter(|q| q.is_finite() && *q >= 0.0 && q.fract() == 0.0 && *q <= i64::MAX as f64)
        .map(|q| q as i64)
}

/// 单价: 正数
pub fn parse_unit_price(value: Option<f64>) -> Option<f64> {
    value.filter(|p| p.is_finite() && *p > 0.0)
}

/// 日期: 严格 YYYY-MM-DD 且为真实日期
pub fn parse_effective_date(value: Option<&str>) -> Option<NaiveDate> {
    let value = value?.trim();
    if !DATE_REGEX.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value.trim())
}

/// 标记文件内重复: 第二次及之后出现的编码返回 true
fn mark_duplicates(codes: &[Option<String>]) -> Vec<bool> {
    let mut seen = HashSet::new();
    codes
        .iter()
        .map(|code| match code {
            Some(c) => !seen.insert(c.clone()),
            None => false,
        })
        .collect()
}

/// 去重后的编码（保持首次出现顺序）
fn distinct<'a>(codes: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen = HashSet::new();
    codes.filter(|c| seen.insert(*c)).cloned().collect()
}

// ==========================================
// RowValidatorImpl
// ==========================================
pub struct RowValidatorImpl<S>
where
    S: InventoryStore + ?Sized,
{
    store: Arc<S>,
    rules: ValidationRules,
}

impl<S> RowValidatorImpl<S>
where
    S: InventoryStore + ?Sized,
{
    pub fn new(store: Arc<S>, rules: ValidationRules) -> Self {
        Self { store, rules }
    }

    // ===== 批量查询（分块）=====

    async fn lookup_parts(&self, codes: &[String]) -> ImportResult<HashMap<String, PartRef>> {
        let mut found = HashMap::new();
        for chunk in codes.chunks(self.rules.lookup_chunk_size.max(1)) {
            for part in self.store.find_parts_by_codes(chunk).await? {
                found.insert(part.part_code.trim().to_uppercase(), part);
            }
        }
        Ok(found)
    }

    async fn lookup_suppliers(
        &self,
        factory_id: &str,
        codes: &[String],
    ) -> ImportResult<HashMap<String, SupplierRef>> {
        let mut found = HashMap::new();
        for chunk in codes.chunks(self.rules.lookup_chunk_size.max(1)) {
            for supplier in self.store.find_suppliers_by_codes(factory_id, chunk).await? {
                found.insert(supplier.supplier_code.trim().to_uppercase(), supplier);
            }
        }
        Ok(found)
    }

    async fn lookup_inventory(
        &self,
        factory_id: &str,
        part_ids: &[String],
    ) -> ImportResult<HashMap<String, InventoryRef>> {
        let mut found = HashMap::new();
        for chunk in part_ids.chunks(self.rules.lookup_chunk_size.max(1)) {
            for record in self.store.find_inventory_by_part_ids(factory_id, chunk).await? {
                found.insert(record.part_id.clone(), record);
            }
        }
        Ok(found)
    }

    // ===== 库存 =====

    async fn validate_inventory(
        &self,
        rows: &[(usize, &InventoryImportRow)],
        factory_id: &str,
    ) -> ImportResult<Vec<ValidationResult>> {
        let codes: Vec<Option<String>> = rows
            .iter()
            .map(|(_, r)| normalize_code(r.part_code.as_deref()))
            .collect();
        let duplicates = mark_duplicates(&codes);

        // 重复行不参与查询
        let lookup_codes = distinct(
            codes
                .iter()
                .zip(&duplicates)
                .filter(|(_, dup)| !**dup)
                .filter_map(|(c, _)| c.as_ref()),
        );
        let parts = self.lookup_parts(&lookup_codes).await?;

        let part_ids = distinct(parts.values().map(|p| &p.id));
        let inventory = self.lookup_inventory(factory_id, &part_ids).await?;

        let results = rows
            .iter()
            .zip(codes.iter().zip(&duplicates))
            .map(|((row_index, row), (code, duplicate))| {
                let mut errors = Vec::new();

                let part = match code {
                    None => {
                        errors.push(FieldError::new(Field::PartCode, RowErrorCode::PartCodeRequired));
                        None
                    }
                    Some(_) if *duplicate => {
                        errors.push(FieldError::new(Field::PartCode, RowErrorCode::DuplicateInFile));
                        None
                    }
                    Some(c) => {
                        let part = parts.get(c);
                        if part.is_none() {
                            errors.push(FieldError::new(Field::PartCode, RowErrorCode::PartNotFound));
                        }
                        part
                    }
                };

                let quantity = parse_quantity(row.quantity);
                if quantity.is_none() {
                    errors.push(FieldError::new(Field::Quantity, RowErrorCode::InvalidQuantity));
                }

                if row.location.is_none() {
                    errors.push(FieldError::new(Field::Location, RowErrorCode::LocationRequired));
                }

                match (part, quantity, &row.location) {
                    (Some(part), Some(quantity), Some(location)) if errors.is_empty() => {
                        let existing = inventory.get(&part.id);
                        let action = match existing {
                            Some(inv) => InventoryAction::Update {
                                inventory_id: inv.id.clone(),
                            },
                            None => InventoryAction::Insert,
                        };

                        let data = InventoryImportRow {
                            part_code: row.part_code.clone(),
                            quantity: row.quantity,
                            location: row.location.clone(),
                            part_id: Some(part.id.clone()),
                            is_update: existing.is_some(),
                            existing_inventory_id: existing.map(|inv| inv.id.clone()),
                        };
                        let resolved = ResolvedRow::Inventory(ResolvedInventory {
                            part_id: part.id.clone(),
                            quantity,
                            location: location.clone(),
                            action,
                        });

                        ValidationResult::accepted(*row_index, ParsedRow::Inventory(data), resolved)
                    }
                    _ => ValidationResult::rejected(*row_index, errors),
                }
            })
            .collect();

        Ok(results)
    }

    // ===== 单价 =====

    async fn validate_part_prices(
        &self,
        rows: &[(usize, &PartPriceImportRow)],
        factory_id: &str,
    ) -> ImportResult<Vec<ValidationResult>> {
        let part_codes: Vec<Option<String>> = rows
            .iter()
            .map(|(_, r)| normalize_code(r.part_code.as_deref()))
            .collect();
        let supplier_codes: Vec<Option<String>> = rows
            .iter()
            .map(|(_, r)| normalize_code(r.supplier_code.as_deref()))
            .collect();

        let parts = self
            .lookup_parts(&distinct(part_codes.iter().flatten()))
            .await?;
        let suppliers = self
            .lookup_suppliers(factory_id, &distinct(supplier_codes.iter().flatten()))
            .await?;

        let results = rows
            .iter()
            .zip(part_codes.iter().zip(&supplier_codes))
            .map(|((row_index, row), (part_code, supplier_code))| {
                let mut errors = Vec::new();

                let part = match part_code {
                    None => {
                        errors.push(FieldError::new(Field::PartCode, RowErrorCode::PartCodeRequired));
                        None
                    }
                    Some(c) => {
                        let part = parts.get(c);
                        if part.is_none() {
                            errors.push(FieldError::new(Field::PartCode, RowErrorCode::PartNotFound));
                        }
                        part
                    }
                };

                let unit_price = parse_unit_price(row.unit_price);
                if unit_price.is_none() {
                    errors.push(FieldError::new(Field::UnitPrice, RowErrorCode::InvalidPrice));
                }

                let currency = row.currency.as_deref().and_then(Currency::parse);
                if currency.is_none() {
                    errors.push(FieldError::new(Field::Currency, RowErrorCode::InvalidCurrency));
                }

                let effective_from = parse_effective_date(row.effective_from.as_deref());
                if effective_from.is_none() {
                    errors.push(FieldError::new(Field::EffectiveFrom, RowErrorCode::InvalidDate));
                }

                // 供应商编码可选，但给出时必须存在
                let supplier = supplier_code.as_ref().and_then(|c| suppliers.get(c));
                if supplier_code.is_some() && supplier.is_none() {
                    errors.push(FieldError::new(Field::SupplierCode, RowErrorCode::SupplierNotFound));
                }

                match (part, unit_price, currency, effective_from) {
                    (Some(part), Some(unit_price), Some(currency), Some(effective_from))
                        if errors.is_empty() =>
                    {
                        let data = PartPriceImportRow {
                            part_code: row.part_code.clone(),
                            unit_price: Some(unit_price),
                            currency: Some(currency.as_str().to_string()),
                            effective_from: Some(effective_from.format("%Y-%m-%d").to_string()),
                            supplier_code: row.supplier_code.clone(),
                            part_id: Some(part.id.clone()),
                            supplier_id: supplier.map(|s| s.id.clone()),
                        };
                        let resolved = ResolvedRow::PartPrice(ResolvedPartPrice {
                            part_id: part.id.clone(),
                            unit_price,
                            currency,
                            effective_from,
                            supplier_id: supplier.map(|s| s.id.clone()),
                        });

                        ValidationResult::accepted(*row_index, ParsedRow::PartPrice(data), resolved)
                    }
                    _ => ValidationResult::rejected(*row_index, errors),
                }
            })
            .collect();

        Ok(results)
    }

    // ===== 供应商 =====

    async fn validate_suppliers(
        &self,
        rows: &[(usize, &SupplierImportRow)],
        factory_id: &str,
    ) -> ImportResult<Vec<ValidationResult>> {
        let codes: Vec<Option<String>> = rows
            .iter()
            .map(|(_, r)| normalize_code(r.supplier_code.as_deref()))
            .collect();
        let duplicates = mark_duplicates(&codes);

        let existing = self
            .lookup_suppliers(factory_id, &distinct(codes.iter().flatten()))
            .await?;

        let results = rows
            .iter()
            .zip(codes.iter().zip(&duplicates))
            .map(|((row_index, row), (code, duplicate))| {
                let mut errors = Vec::new();

                match code {
                    None => errors.push(FieldError::new(
                        Field::SupplierCode,
                        RowErrorCode::SupplierCodeRequired,
                    )),
                    Some(_) if *duplicate => errors.push(FieldError::new(
                        Field::SupplierCode,
                        RowErrorCode::DuplicateInFile,
                    )),
                    Some(c) if existing.contains_key(c) => errors.push(FieldError::new(
                        Field::SupplierCode,
                        RowErrorCode::DuplicateSupplierCode,
                    )),
                    Some(_) => {}
                }

                if row.supplier_name.is_none() {
                    errors.push(FieldError::new(Field::SupplierName, RowErrorCode::NameRequired));
                }
                if row.contact_person.is_none() {
                    errors.push(FieldError::new(Field::ContactPerson, RowErrorCode::ContactRequired));
                }
                if row.phone.is_none() {
                    errors.push(FieldError::new(Field::Phone, RowErrorCode::PhoneRequired));
                }
                if matches!(&row.email, Some(email) if !is_valid_email(email)) {
                    errors.push(FieldError::new(Field::Email, RowErrorCode::InvalidEmail));
                }
                if matches!(&row.country, Some(c) if c.chars().count() > self.rules.country_max_len)
                {
                    errors.push(FieldError::new(Field::Country, RowErrorCode::CountryTooLong));
                }

                let status = match row.status.as_deref() {
                    None => Some(SupplierStatus::default()),
                    Some(raw) => SupplierStatus::parse(raw),
                };
                if status.is_none() {
                    errors.push(FieldError::new(Field::Status, RowErrorCode::InvalidStatus));
                }

                match (code, &row.supplier_name, &row.contact_person, &row.phone, status) {
                    (Some(code), Some(name), Some(contact), Some(phone), Some(status))
                        if errors.is_empty() =>
                    {
                        let data = SupplierImportRow {
                            supplier_code: Some(code.clone()),
                            status: Some(status.as_str().to_string()),
                            ..(*row).clone()
                        };
                        let resolved = ResolvedRow::Supplier(ResolvedSupplier {
                            supplier_code: code.clone(),
                            supplier_name: name.clone(),
                            contact_person: contact.clone(),
                            phone: phone.clone(),
                            email: row.email.clone(),
                            country: row.country.clone(),
                            address: row.address.clone(),
                            website: row.website.clone(),
                            status,
                        });

                        ValidationResult::accepted(*row_index, ParsedRow::Supplier(data), resolved)
                    }
                    _ => ValidationResult::rejected(*row_index, errors),
                }
            })
            .collect();

        Ok(results)
    }
}

#[async_trait]
impl<S> RowValidator for RowValidatorImpl<S>
where
    S: InventoryStore + ?Sized,
{
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    async fn validate(
        &self,
        category: ImportCategory,
        rows: &[CandidateRow],
        factory_id: &str,
    ) -> ImportResult<Vec<ValidationResult>> {
        // 统一分派点: 类别与行形态不一致的行视为空记录
        let results = match category {
            ImportCategory::Inventory => {
                let fallback = InventoryImportRow::default();
                let typed: Vec<(usize, &InventoryImportRow)> = rows
                    .iter()
                    .map(|c| match &c.row {
                        ParsedRow::Inventory(r) => (c.row_index, r),
                        _ => (c.row_index, &fallback),
                    })
                    .collect();
                self.validate_inventory(&typed, factory_id).await?
            }
            ImportCategory::PartPrices => {
                let fallback = PartPriceImportRow::default();
                let typed: Vec<(usize, &PartPriceImportRow)> = rows
                    .iter()
                    .map(|c| match &c.row {
                        ParsedRow::PartPrice(r) => (c.row_index, r),
                        _ => (c.row_index, &fallback),
                    })
                    .collect();
                self.validate_part_prices(&typed, factory_id).await?
            }
            ImportCategory::Suppliers => {
                let fallback = SupplierImportRow::default();
                let typed: Vec<(usize, &SupplierImportRow)> = rows
                    .iter()
                    .map(|c| match &c.row {
                        ParsedRow::Supplier(r) => (c.row_index, r),
                        _ => (c.row_index, &fallback),
                    })
                    .collect();
                self.validate_suppliers(&typed, factory_id).await?
            }
        };

        let valid = results.iter().filter(|r| r.is_valid()).count();
        let to_update = results
            .iter()
            .filter(|r| r.resolved().is_some_and(ResolvedRow::is_update))
            .count();
        info!(
            category = %category,
            total = results.len(),
            valid = valid,
            invalid = results.len() - valid,
            to_insert = valid - to_update,
            to_update = to_update,
            "行校验完成"
        );

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inventory::{
        InventoryUpdate, NewInventory, NewPartPrice, NewSupplier,
    };
    use crate::repository::{RepositoryError, RepositoryResult};
    use std::sync::Mutex;

    // 内存版数据存储，记录批量查询次数
    #[derive(Default)]
    struct MemoryStore {
        parts: Vec<PartRef>,
        suppliers: Vec<SupplierRef>,
        inventory: Vec<InventoryRef>,
        part_queries: Mutex<Vec<usize>>,
        fail_reads: bool,
    }

    #[async_trait]
    impl InventoryStore for MemoryStore {
        async fn find_parts_by_codes(&self, codes: &[String]) -> RepositoryResult<Vec<PartRef>> {
            if self.fail_reads {
                return Err(RepositoryError::DatabaseQueryError("offline".into()));
            }
            self.part_queries.lock().unwrap().push(codes.len());
            Ok(self
                .parts
                .iter()
                .filter(|p| codes.iter().any(|c| c.eq_ignore_ascii_case(&p.part_code)))
                .cloned()
                .collect())
        }

        async fn find_suppliers_by_codes(
            &self,
            _factory_id: &str,
            codes: &[String],
        ) -> RepositoryResult<Vec<SupplierRef>> {
            Ok(self
                .suppliers
                .iter()
                .filter(|s| codes.iter().any(|c| c.eq_ignore_ascii_case(&s.supplier_code)))
                .cloned()
                .collect())
        }

        async fn find_inventory_by_part_ids(
            &self,
            _factory_id: &str,
            part_ids: &[String],
        ) -> RepositoryResult<Vec<InventoryRef>> {
            Ok(self
                .inventory
                .iter()
                .filter(|i| part_ids.contains(&i.part_id))
                .cloned()
                .collect())
        }

        async fn insert_inventory(&self, _: NewInventory) -> RepositoryResult<String> {
            unreachable!("校验阶段不得写入")
        }
        async fn update_inventory(&self, _: InventoryUpdate) -> RepositoryResult<String> {
            unreachable!("校验阶段不得写入")
        }
        async fn insert_part_price(&self, _: NewPartPrice) -> RepositoryResult<String> {
            unreachable!("校验阶段不得写入")
        }
        async fn insert_supplier(&self, _: NewSupplier) -> RepositoryResult<String> {
            unreachable!("校验阶段不得写入")
        }
    }

    fn part(id: &str, code: &str) -> PartRef {
        PartRef {
            id: id.to_string(),
            part_code: code.to_string(),
        }
    }

    fn store() -> MemoryStore {
        MemoryStore {
            parts: vec![part("p-1", "MT001"), part("p-2", "MT002")],
            suppliers: vec![SupplierRef {
                id: "s-1".to_string(),
                supplier_code: "SUP001".to_string(),
            }],
            inventory: vec![InventoryRef {
                id: "inv-2".to_string(),
                part_id: "p-2".to_string(),
            }],
            ..Default::default()
        }
    }

    fn validator(store: MemoryStore) -> RowValidatorImpl<MemoryStore> {
        RowValidatorImpl::new(Arc::new(store), ValidationRules::default())
    }

    fn inventory(row_index: usize, code: Option<&str>, qty: Option<f64>, loc: Option<&str>) -> CandidateRow {
        CandidateRow {
            row_index,
            row: ParsedRow::Inventory(InventoryImportRow {
                part_code: code.map(String::from),
                quantity: qty,
                location: loc.map(String::from),
                ..Default::default()
            }),
        }
    }

    fn price(row_index: usize, currency: &str, date: &str, supplier: Option<&str>) -> CandidateRow {
        CandidateRow {
            row_index,
            row: ParsedRow::PartPrice(PartPriceImportRow {
                part_code: Some("MT001".to_string()),
                unit_price: Some(50000.0),
                currency: Some(currency.to_string()),
                effective_from: Some(date.to_string()),
                supplier_code: supplier.map(String::from),
                ..Default::default()
            }),
        }
    }

    fn supplier(row_index: usize, code: &str, phone: Option<&str>) -> CandidateRow {
        CandidateRow {
            row_index,
            row: ParsedRow::Supplier(SupplierImportRow {
                supplier_code: Some(code.to_string()),
                supplier_name: Some("ABC Supply".to_string()),
                contact_person: Some("Nguyen Van A".to_string()),
                phone: phone.map(String::from),
                ..Default::default()
            }),
        }
    }

    fn codes(result: &ValidationResult) -> Vec<(Field, RowErrorCode)> {
        result.errors().iter().map(|e| (e.field, e.code)).collect()
    }

    #[test]
    fn test_field_rules() {
        assert_eq!(parse_quantity(Some(100.0)), Some(100));
        assert_eq!(parse_quantity(Some(0.0)), Some(0));
        assert_eq!(parse_quantity(Some(1.5)), None);
        assert_eq!(parse_quantity(Some(-1.0)), None);
        assert_eq!(parse_unit_price(Some(0.0)), None);
        assert_eq!(
            parse_effective_date(Some("2025-02-03")),
            NaiveDate::from_ymd_opt(2025, 2, 3)
        );
        assert_eq!(parse_effective_date(Some("2025-2-3")), None);
        assert_eq!(parse_effective_date(Some("2025-02-30")), None);
        assert!(is_valid_email("abc@example.com"));
        assert!(!is_valid_email("abc@example"));
        assert_eq!(normalize_code(Some(" sup001 ")), Some("SUP001".to_string()));
        assert_eq!(normalize_code(Some("  ")), None);
    }

    #[tokio::test]
    async fn test_inventory_insert_and_update_classification() {
        let v = validator(store());
        let rows = vec![
            inventory(2, Some("MT001"), Some(100.0), Some("A-1-01")),
            inventory(3, Some("mt002"), Some(5.0), Some("B-1")),
        ];

        let results = v.validate(ImportCategory::Inventory, &rows, "f-1").await.unwrap();

        assert!(results[0].is_valid());
        match results[0].data() {
            Some(ParsedRow::Inventory(r)) => {
                assert!(!r.is_update);
                assert_eq!(r.part_id.as_deref(), Some("p-1"));
            }
            other => panic!("unexpected data: {:?}", other),
        }

        assert!(results[1].is_valid());
        match results[1].data() {
            Some(ParsedRow::Inventory(r)) => {
                assert!(r.is_update);
                assert_eq!(r.existing_inventory_id.as_deref(), Some("inv-2"));
            }
            other => panic!("unexpected data: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_inventory_errors_accumulate() {
        let v = validator(store());
        let rows = vec![
            inventory(2, None, Some(-1.0), None),
            inventory(3, Some("MT999"), Some(1.0), Some("A")),
            inventory(4, Some("MT001"), Some(1.0), Some("A")),
            inventory(5, Some("mt001"), Some(2.0), Some("B")),
        ];

        let results = v.validate(ImportCategory::Inventory, &rows, "f-1").await.unwrap();

        assert_eq!(
            codes(&results[0]),
            vec![
                (Field::PartCode, RowErrorCode::PartCodeRequired),
                (Field::Quantity, RowErrorCode::InvalidQuantity),
                (Field::Location, RowErrorCode::LocationRequired),
            ]
        );
        assert_eq!(codes(&results[1]), vec![(Field::PartCode, RowErrorCode::PartNotFound)]);
        assert!(results[2].is_valid());
        assert_eq!(codes(&results[3]), vec![(Field::PartCode, RowErrorCode::DuplicateInFile)]);
        assert_eq!(
            results.iter().map(|r| r.row_index()).collect::<Vec<_>>(),
            vec![2, 3, 4, 5]
        );
    }

    #[tokio::test]
    async fn test_part_price_rules() {
        let v = validator(store());
        let rows = vec![
            price(2, "EUR", "2025-02-03", None),
            price(3, "vnd", "2025-02-03", Some("sup001")),
            price(4, "USD", "03/02/2025", Some("SUP404")),
        ];

        let results = v.validate(ImportCategory::PartPrices, &rows, "f-1").await.unwrap();

        assert_eq!(codes(&results[0]), vec![(Field::Currency, RowErrorCode::InvalidCurrency)]);

        assert!(results[1].is_valid());
        match results[1].data() {
            Some(ParsedRow::PartPrice(r)) => {
                assert_eq!(r.currency.as_deref(), Some("VND"));
                assert_eq!(r.supplier_id.as_deref(), Some("s-1"));
            }
            other => panic!("unexpected data: {:?}", other),
        }

        assert_eq!(
            codes(&results[2]),
            vec![
                (Field::EffectiveFrom, RowErrorCode::InvalidDate),
                (Field::SupplierCode, RowErrorCode::SupplierNotFound),
            ]
        );
    }

    #[tokio::test]
    async fn test_supplier_rules() {
        let v = validator(store());
        let mut bad_email = supplier(5, "SUP005", Some("010"));
        if let ParsedRow::Supplier(r) = &mut bad_email.row {
            r.email = Some("not-an-email".to_string());
            r.status = Some("paused".to_string());
        }
        let rows = vec![
            supplier(2, "sup002", None),
            supplier(3, "SUP003", Some("0901234567")),
            supplier(4, "SUP001", Some("010")),
            bad_email,
            supplier(6, "Sup003", Some("010")),
        ];

        let results = v.validate(ImportCategory::Suppliers, &rows, "f-1").await.unwrap();

        assert_eq!(codes(&results[0]), vec![(Field::Phone, RowErrorCode::PhoneRequired)]);

        assert!(results[1].is_valid());
        match results[1].resolved() {
            Some(ResolvedRow::Supplier(s)) => {
                assert_eq!(s.supplier_code, "SUP003");
                assert_eq!(s.status, SupplierStatus::Active);
            }
            other => panic!("unexpected resolved: {:?}", other),
        }

        assert_eq!(
            codes(&results[2]),
            vec![(Field::SupplierCode, RowErrorCode::DuplicateSupplierCode)]
        );
        assert_eq!(
            codes(&results[3]),
            vec![
                (Field::Email, RowErrorCode::InvalidEmail),
                (Field::Status, RowErrorCode::InvalidStatus),
            ]
        );
        assert_eq!(
            codes(&results[4]),
            vec![(Field::SupplierCode, RowErrorCode::DuplicateInFile)]
        );
    }

    #[tokio::test]
    async fn test_lookups_are_batched_in_chunks() {
        let v = RowValidatorImpl::new(
            Arc::new(store()),
            ValidationRules {
                lookup_chunk_size: 2,
                ..ValidationRules::default()
            },
        );
        let rows: Vec<CandidateRow> = (0..5)
            .map(|i| inventory(i + 2, Some(&format!("C{}", i)), Some(1.0), Some("A")))
            .collect();

        v.validate(ImportCategory::Inventory, &rows, "f-1").await.unwrap();

        assert_eq!(*v.store.part_queries.lock().unwrap(), vec![2, 2, 1]);
    }

    #[tokio::test]
    async fn test_validation_is_idempotent() {
        let v = validator(store());
        let rows = vec![
            inventory(2, Some("MT001"), Some(1.0), Some("A")),
            inventory(3, Some("MT404"), None, None),
        ];

        let first = v.validate(ImportCategory::Inventory, &rows, "f-1").await.unwrap();
        let second = v.validate(ImportCategory::Inventory, &rows, "f-1").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_store_read_failure_aborts() {
        let v = validator(MemoryStore {
            fail_reads: true,
            ..store()
        });
        let rows = vec![inventory(2, Some("MT001"), Some(1.0), Some("A"))];

        let err = v
            .validate(ImportCategory::Inventory, &rows, "f-1")
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Store(_)));
    }
}
