// ==========================================
// CNC 零件库存管理 - 导入模板生成器
// ==========================================
// 输出: 每个 (类别, 语言) 一个 .xlsx
// - 工作表 1: 空白数据录入表（表头取自表头词汇表）
// - 工作表 2: 字段说明（字段名/必填/格式/示例/说明）
// ==========================================

use crate::domain::types::{Field, ImportCategory, TemplateLanguage};
use crate::importer::error::ImportResult;
use crate::importer::header_vocabulary::vocabulary;
use rust_xlsxwriter::{Format, FormatBorder, Workbook, XlsxError};
use tracing::info;

/// 数据表列宽
const DATA_COLUMN_WIDTH: f64 = 20.0;
/// 说明表列宽
const GUIDE_COLUMN_WIDTHS: [f64; 5] = [15.0, 10.0, 20.0, 20.0, 40.0];

/// 生成的模板文件
#[derive(Debug, Clone)]
pub struct TemplateFile {
    pub file_name: &'static str,
    pub bytes: Vec<u8>,
}

/// 说明表中的一行（文本按语言给出）
#[derive(Debug, Clone, Copy)]
struct GuideText {
    format: &'static str,
    example: &'static str,
    description: &'static str,
}

/// (韩语, 越南语)
type Localized = (GuideText, GuideText);

const fn text(format: &'static str, example: &'static str, description: &'static str) -> GuideText {
    GuideText {
        format,
        example,
        description,
    }
}

pub fn file_name(category: ImportCategory, language: TemplateLanguage) -> &'static str {
    match (category, language) {
        (ImportCategory::Inventory, TemplateLanguage::Ko) => "재고_템플릿.xlsx",
        (ImportCategory::Inventory, TemplateLanguage::Vi) => "mau_kho.xlsx",
        (ImportCategory::PartPrices, TemplateLanguage::Ko) => "단가_템플릿.xlsx",
        (ImportCategory::PartPrices, TemplateLanguage::Vi) => "mau_don_gia.xlsx",
        (ImportCategory::Suppliers, TemplateLanguage::Ko) => "공급업체_템플릿.xlsx",
        (ImportCategory::Suppliers, TemplateLanguage::Vi) => "mau_nha_cung_cap.xlsx",
    }
}

pub fn data_sheet_name(language: TemplateLanguage) -> &'static str {
    match language {
        TemplateLanguage::Ko => "데이터입력",
        TemplateLanguage::Vi => "Nhập dữ liệu",
    }
}

pub fn guide_sheet_name(language: TemplateLanguage) -> &'static str {
    match language {
        TemplateLanguage::Ko => "사용방법",
        TemplateLanguage::Vi => "Hướng dẫn",
    }
}

fn guide_header(language: TemplateLanguage) -> [&'static str; 5] {
    match language {
        TemplateLanguage::Ko => ["필드명", "필수", "형식", "예시", "설명"],
        TemplateLanguage::Vi => ["Tên trường", "Bắt buộc", "Định dạng", "Ví dụ", "Mô tả"],
    }
}

fn yes_no(language: TemplateLanguage, required: bool) -> &'static str {
    match (language, required) {
        (TemplateLanguage::Ko, true) => "예",
        (TemplateLanguage::Ko, false) => "아니오",
        (TemplateLanguage::Vi, true) => "Có",
        (TemplateLanguage::Vi, false) => "Không",
    }
}

/// 字段是否必填（供应商编码在单价模板中为可选）
fn is_required(category: ImportCategory, field: Field) -> bool {
    match category {
        ImportCategory::Inventory => true,
        ImportCategory::PartPrices => field != Field::SupplierCode,
        ImportCategory::Suppliers => matches!(
            field,
            Field::SupplierCode | Field::SupplierName | Field::ContactPerson | Field::Phone
        ),
    }
}

fn guide_text(category: ImportCategory, field: Field) -> Localized {
    match (category, field) {
        (_, Field::PartCode) => (
            text("텍스트", "MT001", "부품 테이블에 등록된 코드"),
            text("Văn bản", "MT001", "Mã đã đăng ký trong bảng phụ tùng"),
        ),
        (_, Field::Quantity) => (
            text("정수 >= 0", "100", "현재 재고 수량"),
            text("Số nguyên >= 0", "100", "Số lượng tồn kho hiện tại"),
        ),
        (_, Field::Location) => (
            text("텍스트", "A-1-01", "보관 위치"),
            text("Văn bản", "A-1-01", "Vị trí lưu trữ"),
        ),
        (_, Field::UnitPrice) => (
            text("숫자 > 0", "50000", "부품 단가"),
            text("Số > 0", "50000", "Đơn giá phụ tùng"),
        ),
        (_, Field::Currency) => (
            text("VND/USD/KRW", "VND", "통화 단위"),
            text("VND/USD/KRW", "VND", "Đơn vị tiền tệ"),
        ),
        (_, Field::EffectiveFrom) => (
            text("YYYY-MM-DD", "2025-02-03", "단가 적용 시작일"),
            text("YYYY-MM-DD", "2025-02-03", "Ngày bắt đầu áp dụng"),
        ),
        (ImportCategory::PartPrices, Field::SupplierCode) => (
            text("텍스트", "SUP001", "공급업체 코드 (선택)"),
            text("Văn bản", "SUP001", "Mã nhà cung cấp (tùy chọn)"),
        ),
        (_, Field::SupplierCode) => (
            text("텍스트", "SUP001", "고유한 공급업체 코드"),
            text("Văn bản", "SUP001", "Mã nhà cung cấp duy nhất"),
        ),
        (_, Field::SupplierName) => (
            text("텍스트", "ABC 공급", "공급업체명"),
            text("Văn bản", "ABC Supply", "Tên nhà cung cấp"),
        ),
        (_, Field::ContactPerson) => (
            text("텍스트", "홍길동", "담당자 이름"),
            text("Văn bản", "Nguyễn Văn A", "Tên người liên hệ"),
        ),
        (_, Field::Phone) => (
            text("텍스트", "010-1234-5678", "연락처"),
            text("Văn bản", "0901234567", "Số điện thoại"),
        ),
        (_, Field::Email) => (
            text("이메일", "abc@example.com", "이메일 주소"),
            text("Email", "abc@example.com", "Địa chỉ email"),
        ),
        (_, Field::Country) => (
            text("텍스트", "Vietnam", "국가"),
            text("Văn bản", "Vietnam", "Quốc gia"),
        ),
        (_, Field::Address) => (
            text("텍스트", "Hanoi", "주소 (선택)"),
            text("Văn bản", "Hanoi", "Địa chỉ (tùy chọn)"),
        ),
        (_, Field::Website) => (
            text("URL", "https://example.com", "웹사이트 (선택)"),
            text("URL", "https://example.com", "Website (tùy chọn)"),
        ),
        (_, Field::Status) => (
            text("ACTIVE/INACTIVE", "ACTIVE", "상태 (기본: ACTIVE)"),
            text("ACTIVE/INACTIVE", "ACTIVE", "Trạng thái (mặc định: ACTIVE)"),
        ),
    }
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color("#D9E1F2")
        .set_border(FormatBorder::Thin)
}

fn write_data_sheet(
    workbook: &mut Workbook,
    category: ImportCategory,
    language: TemplateLanguage,
) -> Result<(), XlsxError> {
    let ws = workbook.add_worksheet();
    ws.set_name(data_sheet_name(language))?;

    let hdr = header_format();
    for (col, entry) in vocabulary(category, language).iter().enumerate() {
        ws.write_with_format(0, col as u16, entry.header, &hdr)?;
        ws.set_column_width(col as u16, DATA_COLUMN_WIDTH)?;
    }
    ws.set_freeze_panes(1, 0)?;

    Ok(())
}

fn write_guide_sheet(
    workbook: &mut Workbook,
    category: ImportCategory,
    language: TemplateLanguage,
) -> Result<(), XlsxError> {
    let ws = workbook.add_worksheet();
    ws.set_name(guide_sheet_name(language))?;

    let hdr = header_format();
    for (col, title) in guide_header(language).iter().enumerate() {
        ws.write_with_format(0, col as u16, *title, &hdr)?;
    }

    for (idx, entry) in vocabulary(category, language).iter().enumerate() {
        let row = (idx + 1) as u32;
        let (ko, vi) = guide_text(category, entry.field);
        let guide = match language {
            TemplateLanguage::Ko => ko,
            TemplateLanguage::Vi => vi,
        };

        ws.write(row, 0, entry.header)?;
        ws.write(row, 1, yes_no(language, is_required(category, entry.field)))?;
        ws.write(row, 2, guide.format)?;
        ws.write(row, 3, guide.example)?;
        ws.write(row, 4, guide.description)?;
    }

    for (col, width) in GUIDE_COLUMN_WIDTHS.iter().enumerate() {
        ws.set_column_width(col as u16, *width)?;
    }

    Ok(())
}

/// 生成模板
pub fn generate(category: ImportCategory, language: TemplateLanguage) -> ImportResult<TemplateFile> {
    let mut workbook = Workbook::new();
    write_data_sheet(&mut workbook, category, language)?;
    write_guide_sheet(&mut workbook, category, language)?;
    let bytes = workbook.save_to_buffer()?;

    info!(
        category = %category,
        language = %language,
        size = bytes.len(),
        "模板生成完成"
    );

    Ok(TemplateFile {
        file_name: file_name(category, language),
        bytes,
    })
}
