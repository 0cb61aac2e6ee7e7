// ==========================================
// CNC 零件库存管理 - 表头词汇表
// ==========================================
// (类别, 语言, 本地化表头) → 标准字段
// 模板生成与导入解析共用此表，表头文本必须逐字节一致
// ==========================================

use crate::domain::types::{Field, ImportCategory, TemplateLanguage};

/// 单列定义: 本地化表头 + 标准字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderEntry {
    pub header: &'static str,
    pub field: Field,
}

const fn entry(header: &'static str, field: Field) -> HeaderEntry {
    HeaderEntry { header, field }
}

// ===== 库存 =====
const INVENTORY_KO: &[HeaderEntry] = &[
    entry("부품코드", Field::PartCode),
    entry("수량", Field::Quantity),
    entry("위치", Field::Location),
];

const INVENTORY_VI: &[HeaderEntry] = &[
    entry("Mã phụ tùng", Field::PartCode),
    entry("Số lượng", Field::Quantity),
    entry("Vị trí", Field::Location),
];

// ===== 单价 =====
const PART_PRICES_KO: &[HeaderEntry] = &[
    entry("부품코드", Field::PartCode),
    entry("단가", Field::UnitPrice),
    entry("통화", Field::Currency),
    entry("적용일", Field::EffectiveFrom),
    entry("공급업체코드", Field::SupplierCode),
];

const PART_PRICES_VI: &[HeaderEntry] = &[
    entry("Mã phụ tùng", Field::PartCode),
    entry("Đơn giá", Field::UnitPrice),
    entry("Loại tiền", Field::Currency),
    entry("Ngày áp dụng", Field::EffectiveFrom),
    entry("Mã NCC", Field::SupplierCode),
];

// ===== 供应商 =====
const SUPPLIERS_KO: &[HeaderEntry] = &[
    entry("공급업체코드", Field::SupplierCode),
    entry("이름", Field::SupplierName),
    entry("담당자", Field::ContactPerson),
    entry("전화번호", Field::Phone),
    entry("이메일", Field::Email),
    entry("국가", Field::Country),
    entry("주소", Field::Address),
    entry("웹사이트", Field::Website),
    entry("상태", Field::Status),
];

const SUPPLIERS_VI: &[HeaderEntry] = &[
    entry("Mã NCC", Field::SupplierCode),
    entry("Tên", Field::SupplierName),
    entry("Người liên hệ", Field::ContactPerson),
    entry("SĐT", Field::Phone),
    entry("Email", Field::Email),
    entry("Quốc gia", Field::Country),
    entry("Địa chỉ", Field::Address),
    entry("Website", Field::Website),
    entry("Trạng thái", Field::Status),
];

/// 指定类别与语言的表头（按模板列顺序）
pub fn vocabulary(category: ImportCategory, language: TemplateLanguage) -> &'static [HeaderEntry] {
    match (category, language) {
        (ImportCategory::Inventory, TemplateLanguage::Ko) => INVENTORY_KO,
        (ImportCategory::Inventory, TemplateLanguage::Vi) => INVENTORY_VI,
        (ImportCategory::PartPrices, TemplateLanguage::Ko) => PART_PRICES_KO,
        (ImportCategory::PartPrices, TemplateLanguage::Vi) => PART_PRICES_VI,
        (ImportCategory::Suppliers, TemplateLanguage::Ko) => SUPPLIERS_KO,
        (ImportCategory::Suppliers, TemplateLanguage::Vi) => SUPPLIERS_VI,
    }
}

/// 本地化表头 → 标准字段（表头需已 trim）
pub fn resolve_header(
    category: ImportCategory,
    language: TemplateLanguage,
    header: &str,
) -> Option<Field> {
    vocabulary(category, language)
        .iter()
        .find(|e| e.header == header)
        .map(|e| e.field)
}

/// 类别的标准字段集合（按列顺序）
pub fn fields(category: ImportCategory) -> Vec<Field> {
    vocabulary(category, TemplateLanguage::DEFAULT)
        .iter()
        .map(|e| e.field)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_languages_cover_same_fields_in_same_order() {
        for category in ImportCategory::ALL {
            let expected = fields(category);
            for language in TemplateLanguage::ALL {
                let got: Vec<Field> = vocabulary(category, language)
                    .iter()
                    .map(|e| e.field)
                    .collect();
                assert_eq!(got, expected, "{} / {}", category, language);
            }
        }
    }

    #[test]
    fn test_headers_unique_and_trimmed() {
        for category in ImportCategory::ALL {
            for language in TemplateLanguage::ALL {
                let vocab = vocabulary(category, language);
                let headers: HashSet<&str> = vocab.iter().map(|e| e.header).collect();
                assert_eq!(headers.len(), vocab.len());
                assert!(vocab.iter().all(|e| e.header.trim() == e.header));
            }
        }
    }

    #[test]
    fn test_resolve_header() {
        assert_eq!(
            resolve_header(ImportCategory::PartPrices, TemplateLanguage::Vi, "Mã NCC"),
            Some(Field::SupplierCode)
        );
        assert_eq!(
            resolve_header(ImportCategory::Inventory, TemplateLanguage::Ko, "단가"),
            None
        );
    }
}
