// ==========================================
// CNC 零件库存管理 - 库存数据存储 Trait
// ==========================================
// 职责: 定义批量导入所需的数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::inventory::{
    InventoryRef, InventoryUpdate, NewInventory, NewPartPrice, NewSupplier, PartRef, SupplierRef,
};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// InventoryStore Trait
// ==========================================
// 实现者: SqliteInventoryStore（使用 rusqlite）
// 约定:
// - 编码匹配不区分大小写（调用方传入已 trim 的编码）
// - 单条写入，不提供跨行事务
#[async_trait]
pub trait InventoryStore: Send + Sync {
    // ===== 批量读取 =====

    /// 按编码批量查询零件
    ///
    /// # 返回
    /// - 仅包含存在的零件，顺序不保证
    async fn find_parts_by_codes(&self, codes: &[String]) -> RepositoryResult<Vec<PartRef>>;

    /// 按编码批量查询指定工厂的供应商
    async fn find_suppliers_by_codes(
        &self,
        factory_id: &str,
        codes: &[String],
    ) -> RepositoryResult<Vec<SupplierRef>>;

    /// 按零件 ID 批量查询指定工厂的库存记录
    async fn find_inventory_by_part_ids(
        &self,
        factory_id: &str,
        part_ids: &[String],
    ) -> RepositoryResult<Vec<InventoryRef>>;

    // ===== 单条查询（基于批量查询的默认实现）=====

    async fn find_part_by_code(&self, code: &str) -> RepositoryResult<Option<PartRef>> {
        let found = self.find_parts_by_codes(&[code.to_string()]).await?;
        Ok(found.into_iter().next())
    }

    async fn find_supplier_by_code(
        &self,
        factory_id: &str,
        code: &str,
    ) -> RepositoryResult<Option<SupplierRef>> {
        let found = self
            .find_suppliers_by_codes(factory_id, &[code.to_string()])
            .await?;
        Ok(found.into_iter().next())
    }

    async fn find_inventory_by_part_id(
        &self,
        factory_id: &str,
        part_id: &str,
    ) -> RepositoryResult<Option<InventoryRef>> {
        let found = self
            .find_inventory_by_part_ids(factory_id, &[part_id.to_string()])
            .await?;
        Ok(found.into_iter().next())
    }

    // ===== 单条写入 =====

    /// 新增库存记录，返回新 ID
    async fn insert_inventory(&self, record: NewInventory) -> RepositoryResult<String>;

    /// 按 ID 更新库存数量与位置，返回被更新记录的 ID
    ///
    /// # 错误
    /// - NotFound: 记录不存在（影响行数为 0）
    async fn update_inventory(&self, update: InventoryUpdate) -> RepositoryResult<String>;

    /// 新增单价记录，返回新 ID
    async fn insert_part_price(&self, record: NewPartPrice) -> RepositoryResult<String>;

    /// 新增供应商，返回新 ID
    async fn insert_supplier(&self, record: NewSupplier) -> RepositoryResult<String>;
}
