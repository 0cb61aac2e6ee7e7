// ==========================================
// CNC 零件库存管理 - 主数据引用与写入载荷
// ==========================================
// 职责: 仓储层读写所用的记录形态
// 红线: 不含数据访问逻辑
// ==========================================

use crate::domain::types::{Currency, SupplierStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// 读取引用（校验阶段解析外键用）
// ==========================================

/// 零件引用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRef {
    pub id: String,
    pub part_code: String,
}

/// 供应商引用（按工厂隔离）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRef {
    pub id: String,
    pub supplier_code: String,
}

/// 库存引用（按工厂隔离，part_id 唯一）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRef {
    pub id: String,
    pub part_id: String,
}

// ==========================================
// 写入载荷
// ==========================================

#[derive(Debug, Clone, PartialEq)]
pub struct NewInventory {
    pub part_id: String,
    pub factory_id: String,
    pub current_quantity: i64,
    pub location: String,
    pub last_count_date: NaiveDate,
    pub updated_by: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryUpdate {
    pub inventory_id: String,
    pub current_quantity: i64,
    pub location: String,
    pub last_count_date: NaiveDate,
    pub updated_by: String,
}

/// 新单价（写入即为当前价 is_current = true）
#[derive(Debug, Clone, PartialEq)]
pub struct NewPartPrice {
    pub part_id: String,
    pub supplier_id: Option<String>,
    pub unit_price: f64,
    pub currency: Currency,
    pub effective_from: NaiveDate,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSupplier {
    pub factory_id: String,
    pub supplier_code: String,
    pub supplier_name: String,
    pub contact_person: String,
    pub phone: String,
    pub email: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub status: SupplierStatus,
    pub created_by: String,
}
