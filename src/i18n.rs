// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持中文和英文，行级错误消息经此翻译
// 默认语言 zh-CN，首次翻译或切换语言前生效
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use std::sync::Once;

/// 默认语言
pub const DEFAULT_LOCALE: &str = "zh-CN";

static DEFAULT_LOCALE_INIT: Once = Once::new();

/// 应用默认语言（进程内只执行一次）
///
/// rust-i18n 的全局语言初始为 "en"，fallback 只覆盖缺失的 key
pub fn init_default_locale() {
    DEFAULT_LOCALE_INIT.call_once(|| rust_i18n::set_locale(DEFAULT_LOCALE));
}

/// 获取当前语言
pub fn current_locale() -> String {
    init_default_locale();
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"zh-CN" 或 "en"）
pub fn set_locale(locale: &str) {
    init_default_locale();
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use trade_catalog_import::i18n::t;
/// let msg = t("import.duplicate_in_catalog");
/// ```
pub fn t(key: &str) -> String {
    init_default_locale();
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use trade_catalog_import::i18n::t_with_args;
/// let msg = t_with_args("import.invalid_status", &[("value", "在售")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    init_default_locale();
    fill_args(rust_i18n::t!(key).to_string(), args)
}

/// 按指定语言翻译（不改变全局语言）
pub fn t_in(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    fill_args(rust_i18n::t!(key, locale = locale).to_string(), args)
}

fn fill_args(mut result: String, args: &[(&str, &str)]) -> String {
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
