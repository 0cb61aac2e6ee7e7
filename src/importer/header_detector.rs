// ==========================================
// CNC 零件库存管理 - 表头语言识别
// ==========================================
// 规则: 统计各语言词汇在表头中的命中数，取最大者
// 平局（含 0:0）取 TemplateLanguage::ALL 中靠前的语言
// ==========================================

use crate::domain::types::{ImportCategory, TemplateLanguage};
use crate::importer::header_vocabulary::vocabulary;

/// 统计某语言词汇在表头中的命中数
pub fn count_matches(
    category: ImportCategory,
    language: TemplateLanguage,
    headers: &[String],
) -> usize {
    vocabulary(category, language)
        .iter()
        .filter(|entry| headers.iter().any(|h| h.trim() == entry.header))
        .count()
}

/// 识别表头语言（每个文件只判定一次）
pub fn detect_language(category: ImportCategory, headers: &[String]) -> TemplateLanguage {
    let mut best = TemplateLanguage::DEFAULT;
    let mut best_count = count_matches(category, best, headers);

    for language in TemplateLanguage::ALL {
        let count = count_matches(category, language, headers);
        // 严格大于才替换，保证平局时默认语言优先
        if count > best_count {
            best = language;
            best_count = count;
        }
    }

    best
}
