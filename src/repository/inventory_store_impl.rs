// ==========================================
// CNC 零件库存管理 - 库存数据存储实现
// ==========================================
// 职责: 实现 InventoryStore（使用 rusqlite）
// 约束: 每次调用一条语句，不开启跨行事务
// ==========================================

use crate::domain::inventory::{
    InventoryRef, InventoryUpdate, NewInventory, NewPartPrice, NewSupplier, PartRef, SupplierRef,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::inventory_store::InventoryStore;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, Row, ToSql};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

// ==========================================
// SqliteInventoryStore
// ==========================================
pub struct SqliteInventoryStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteInventoryStore {
    /// 从已有连接创建（与 ConfigManager 共享同一连接）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(format!("锁获取失败: {}", e)))
    }

    /// 执行 `... IN (?, ?, ...)` 查询
    ///
    /// # 参数
    /// - sql_prefix: IN 子句前的 SQL（以 `IN` 结尾）
    /// - fixed: IN 列表之前的固定参数
    /// - list: IN 列表
    fn query_in<T, F>(
        conn: &Connection,
        sql_prefix: &str,
        fixed: &[&dyn ToSql],
        list: &[String],
        map_row: F,
    ) -> RepositoryResult<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        if list.is_empty() {
            return Ok(Vec::new());
        }

        // 构建 IN 子句的占位符
        let placeholders = list.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let query = format!("{} ({})", sql_prefix, placeholders);

        let mut stmt = conn.prepare(&query)?;

        // 绑定参数
        let mut bound: Vec<&dyn ToSql> = fixed.to_vec();
        bound.extend(list.iter().map(|code| code as &dyn ToSql));

        let rows = stmt
            .query_map(bound.as_slice(), map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

#[async_trait]
impl InventoryStore for SqliteInventoryStore {
    async fn find_parts_by_codes(&self, codes: &[String]) -> RepositoryResult<Vec<PartRef>> {
        let conn = self.lock()?;

        let parts = Self::query_in(
            &conn,
            "SELECT id, part_code FROM parts WHERE part_code COLLATE NOCASE IN",
            &[],
            codes,
            |row| {
                Ok(PartRef {
                    id: row.get(0)?,
                    part_code: row.get(1)?,
                })
            },
        )?;

        debug!(requested = codes.len(), found = parts.len(), "零件批量查询");
        Ok(parts)
    }

    async fn find_suppliers_by_codes(
        &self,
        factory_id: &str,
        codes: &[String],
    ) -> RepositoryResult<Vec<SupplierRef>> {
        let conn = self.lock()?;

        let suppliers = Self::query_in(
            &conn,
            "SELECT id, supplier_code FROM suppliers
             WHERE factory_id = ? AND supplier_code COLLATE NOCASE IN",
            &[&factory_id as &dyn ToSql],
            codes,
            |row| {
                Ok(SupplierRef {
                    id: row.get(0)?,
                    supplier_code: row.get(1)?,
                })
            },
        )?;

        debug!(
            factory_id = factory_id,
            requested = codes.len(),
            found = suppliers.len(),
            "供应商批量查询"
        );
        Ok(suppliers)
    }

    async fn find_inventory_by_part_ids(
        &self,
        factory_id: &str,
        part_ids: &[String],
    ) -> RepositoryResult<Vec<InventoryRef>> {
        let conn = self.lock()?;

        let records = Self::query_in(
            &conn,
            "SELECT id, part_id FROM inventory WHERE factory_id = ? AND part_id IN",
            &[&factory_id as &dyn ToSql],
            part_ids,
            |row| {
                Ok(InventoryRef {
                    id: row.get(0)?,
                    part_id: row.get(1)?,
                })
            },
        )?;

        debug!(
            factory_id = factory_id,
            requested = part_ids.len(),
            found = records.len(),
            "库存批量查询"
        );
        Ok(records)
    }

    async fn insert_inventory(&self, record: NewInventory) -> RepositoryResult<String> {
        let conn = self.lock()?;
        let id = Uuid::new_v4().to_string();

        conn.execute(
            r#"
            INSERT INTO inventory (
                id, part_id, factory_id, current_quantity, location,
                last_count_date, updated_at, updated_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                id,
                record.part_id,
                record.factory_id,
                record.current_quantity,
                record.location,
                record.last_count_date.format("%Y-%m-%d").to_string(),
                Utc::now().to_rfc3339(),
                record.updated_by,
            ],
        )?;

        Ok(id)
    }

    async fn update_inventory(&self, update: InventoryUpdate) -> RepositoryResult<String> {
        let conn = self.lock()?;

        let affected = conn.execute(
            r#"
            UPDATE inventory
            SET current_quantity = ?2,
                location = ?3,
                last_count_date = ?4,
                updated_at = ?5,
                updated_by = ?6
            WHERE id = ?1
            "#,
            params![
                update.inventory_id,
                update.current_quantity,
                update.location,
                update.last_count_date.format("%Y-%m-%d").to_string(),
                Utc::now().to_rfc3339(),
                update.updated_by,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "inventory".to_string(),
                id: update.inventory_id,
            });
        }

        Ok(update.inventory_id)
    }

    async fn insert_part_price(&self, record: NewPartPrice) -> RepositoryResult<String> {
        let conn = self.lock()?;
        let id = Uuid::new_v4().to_string();

        conn.execute(
            r#"
            INSERT INTO part_prices (
                id, part_id, supplier_id, unit_price, currency,
                effective_from, is_current, created_by, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?8)
            "#,
            params![
                id,
                record.part_id,
                record.supplier_id,
                record.unit_price,
                record.currency.as_str(),
                record.effective_from.format("%Y-%m-%d").to_string(),
                record.created_by,
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(id)
    }

    async fn insert_supplier(&self, record: NewSupplier) -> RepositoryResult<String> {
        let conn = self.lock()?;
        let id = Uuid::new_v4().to_string();

        conn.execute(
            r#"
            INSERT INTO suppliers (
                id, factory_id, supplier_code, supplier_name, contact_person,
                phone, email, country, address, website, status,
                created_by, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                id,
                record.factory_id,
                record.supplier_code,
                record.supplier_name,
                record.contact_person,
                record.phone,
                record.email,
                record.country,
                record.address,
                record.website,
                record.status.as_str(),
                record.created_by,
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(id)
    }
}
