// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持韩语（默认）、越南语和英语
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 支持的界面语言
pub const SUPPORTED_LOCALES: [&str; 3] = ["ko", "vi", "en"];

/// 默认界面语言
pub const DEFAULT_LOCALE: &str = "ko";

/// 规范化语言代码，不支持的回落到默认语言
pub fn normalize_locale(locale: &str) -> &'static str {
    let lower = locale.trim().to_ascii_lowercase();
    let primary = lower.split(['-', '_']).next().unwrap_or_default();
    SUPPORTED_LOCALES
        .iter()
        .copied()
        .find(|l| *l == primary)
        .unwrap_or(DEFAULT_LOCALE)
}

/// 按指定语言翻译（无参数）
///
/// # 示例
/// ```no_run
/// use cnc_inventory::i18n::translate;
/// let msg = translate("bulk_import.errors.empty_file", "vi");
/// ```
pub fn translate(key: &str, locale: &str) -> String {
    let locale = normalize_locale(locale);
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 按指定语言翻译（带参数，占位符格式 %{name}）
///
/// # 示例
/// ```no_run
/// use cnc_inventory::i18n::translate_with_args;
/// let msg = translate_with_args(
///     "bulk_import.success.imported",
///     "ko",
///     &[("inserted", "3"), ("updated", "1")],
/// );
/// ```
pub fn translate_with_args(key: &str, locale: &str, args: &[(&str, &str)]) -> String {
    let mut result = translate(key, locale);
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
