// ==========================================
// CNC 零件库存管理 - 领域类型定义
// ==========================================
// 职责: 导入类别 / 模板语言 / 标准字段 / 货币 / 供应商状态
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 导入类别 (Import Category)
// ==========================================
// 决定字段集合与校验规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportCategory {
    Inventory,  // 库存
    PartPrices, // 零件单价
    Suppliers,  // 供应商
}

impl ImportCategory {
    pub const ALL: [ImportCategory; 3] = [
        ImportCategory::Inventory,
        ImportCategory::PartPrices,
        ImportCategory::Suppliers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImportCategory::Inventory => "inventory",
            ImportCategory::PartPrices => "partPrices",
            ImportCategory::Suppliers => "suppliers",
        }
    }
}

impl fmt::Display for ImportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ImportCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inventory" => Ok(ImportCategory::Inventory),
            "partprices" | "part_prices" | "part-prices" => Ok(ImportCategory::PartPrices),
            "suppliers" => Ok(ImportCategory::Suppliers),
            other => Err(format!("未知导入类别: {}", other)),
        }
    }
}

// ==========================================
// 模板语言 (Template Language)
// ==========================================
// 顺序即优先级: 匹配数相同时取第一个
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateLanguage {
    Ko, // 韩语
    Vi, // 越南语
}

impl TemplateLanguage {
    pub const ALL: [TemplateLanguage; 2] = [TemplateLanguage::Ko, TemplateLanguage::Vi];

    /// 无法判定时使用的默认语言
    pub const DEFAULT: TemplateLanguage = TemplateLanguage::Ko;

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateLanguage::Ko => "ko",
            TemplateLanguage::Vi => "vi",
        }
    }
}

impl Default for TemplateLanguage {
    fn default() -> Self {
        TemplateLanguage::DEFAULT
    }
}

impl fmt::Display for TemplateLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TemplateLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ko" => Ok(TemplateLanguage::Ko),
            "vi" => Ok(TemplateLanguage::Vi),
            other => Err(format!("未知模板语言: {}", other)),
        }
    }
}

// ==========================================
// 字段值类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
}

// ==========================================
// 标准字段 (Canonical Field)
// ==========================================
// 序列化为 snake_case，与数据表列名一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    // 库存 / 单价
    PartCode,
    Quantity,
    Location,
    UnitPrice,
    Currency,
    EffectiveFrom,
    // 供应商
    SupplierCode,
    SupplierName,
    ContactPerson,
    Phone,
    Email,
    Country,
    Address,
    Website,
    Status,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::PartCode => "part_code",
            Field::Quantity => "quantity",
            Field::Location => "location",
            Field::UnitPrice => "unit_price",
            Field::Currency => "currency",
            Field::EffectiveFrom => "effective_from",
            Field::SupplierCode => "supplier_code",
            Field::SupplierName => "supplier_name",
            Field::ContactPerson => "contact_person",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::Country => "country",
            Field::Address => "address",
            Field::Website => "website",
            Field::Status => "status",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Quantity | Field::UnitPrice => FieldKind::Number,
            _ => FieldKind::Text,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 货币 (Currency)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Vnd,
    Usd,
    Krw,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Vnd, Currency::Usd, Currency::Krw];

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Vnd => "VND",
            Currency::Usd => "USD",
            Currency::Krw => "KRW",
        }
    }

    /// 不区分大小写解析，非法返回 None
    pub fn parse(value: &str) -> Option<Self> {
        let upper = value.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|c| c.as_str() == upper)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 供应商状态 (Supplier Status)
// ==========================================
// 缺省: ACTIVE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupplierStatus {
    Active,
    Inactive,
}

impl SupplierStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupplierStatus::Active => "ACTIVE",
            SupplierStatus::Inactive => "INACTIVE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Some(SupplierStatus::Active),
            "INACTIVE" => Some(SupplierStatus::Inactive),
            _ => None,
        }
    }
}

impl Default for SupplierStatus {
    fn default() -> Self {
        SupplierStatus::Active
    }
}

impl fmt::Display for SupplierStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str() {
        assert_eq!(
            "partPrices".parse::<ImportCategory>().unwrap(),
            ImportCategory::PartPrices
        );
        assert_eq!(
            " Inventory ".parse::<ImportCategory>().unwrap(),
            ImportCategory::Inventory
        );
        assert!("parts".parse::<ImportCategory>().is_err());
    }

    #[test]
    fn test_currency_case_insensitive() {
        assert_eq!(Currency::parse("vnd"), Some(Currency::Vnd));
        assert_eq!(Currency::parse(" Usd "), Some(Currency::Usd));
        assert_eq!(Currency::parse("EUR"), None);
    }

    #[test]
    fn test_supplier_status_default() {
        assert_eq!(SupplierStatus::default(), SupplierStatus::Active);
        assert_eq!(SupplierStatus::parse("inactive"), Some(SupplierStatus::Inactive));
        assert_eq!(SupplierStatus::parse("PAUSED"), None);
    }

    #[test]
    fn test_field_serializes_as_column_name() {
        let json = serde_json::to_string(&Field::EffectiveFrom).unwrap();
        assert_eq!(json, "\"effective_from\"");
        assert_eq!(Field::UnitPrice.kind(), FieldKind::Number);
        assert_eq!(Field::Phone.kind(), FieldKind::Text);
    }
}
