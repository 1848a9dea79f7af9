//! 多语言错误消息模块
//!
//! 使用rat_embed_lang框架提供统一的错误消息多语言支持

use rat_embed_lang::register_translations;
use std::collections::HashMap;
use once_cell::sync::Lazy;

/// 首次访问时注册全部翻译
static TRANSLATIONS_REGISTERED: Lazy<()> = Lazy::new(ErrorMessageI18n::register_all_translations);

/// 错误消息翻译注册器
pub struct ErrorMessageI18n;

impl ErrorMessageI18n {
    fn entry(zh: &str, en: &str, ja: &str) -> HashMap<String, String> {
        let mut messages = HashMap::new();
        messages.insert("zh-CN".to_string(), zh.to_string());
        messages.insert("en-US".to_string(), en.to_string());
        messages.insert("ja-JP".to_string(), ja.to_string());
        messages
    }

    /// 注册所有错误消息翻译
    pub fn register_all_translations() {
        let mut translations = HashMap::new();

        // 模型验证错误
        translations.insert(
            "error.model_validation".to_string(),
            Self::entry(
                "模型验证失败: {model}（{count} 个字段）",
                "Model validation failed: {model} ({count} fields)",
                "モデル検証が失敗しました: {model}（{count} フィールド）",
            ),
        );

        // 字段类型无效
        translations.insert(
            "error.invalid_datatype".to_string(),
            Self::entry(
                "字段 '{field}' 的类型无效: {datatype}",
                "Field '{field}' has an invalid datatype: {datatype}",
                "フィールド '{field}' のデータ型が無効です: {datatype}",
            ),
        );

        // 多个主键
        translations.insert(
            "error.multiple_primary_keys".to_string(),
            Self::entry(
                "不能设置多个主键: '{existing}' 与 '{field}'",
                "Cannot set multiple primary keys: '{existing}' and '{field}'",
                "複数の主キーは設定できません: '{existing}' と '{field}'",
            ),
        );

        // 验证规则引用
        translations.insert(
            "error.rule_not_found".to_string(),
            Self::entry(
                "字段 '{field}' 引用的验证规则 '{rule}' 不存在",
                "Validation rule '{rule}' referenced by field '{field}' does not exist",
                "フィールド '{field}' が参照する検証ルール '{rule}' が存在しません",
            ),
        );

        translations.insert(
            "error.rule_not_callable".to_string(),
            Self::entry(
                "字段 '{field}' 的验证规则 {rule} 既不是函数也不是名称",
                "Validation rule {rule} of field '{field}' is neither a function nor a name",
                "フィールド '{field}' の検証ルール {rule} は関数でも名前でもありません",
            ),
        );

        // 方法未找到
        translations.insert(
            "error.method_not_found".to_string(),
            Self::entry(
                "方法 '{name}' 不存在",
                "Method '{name}' does not exist",
                "メソッド '{name}' が存在しません",
            ),
        );

        // 配置错误
        translations.insert(
            "error.config".to_string(),
            Self::entry(
                "配置错误: {message}",
                "Configuration error: {message}",
                "設定エラー: {message}",
            ),
        );

        // 序列化错误
        translations.insert(
            "error.serialization".to_string(),
            Self::entry(
                "数据序列化失败: {message}",
                "Data serialization failed: {message}",
                "データシリアライズが失敗しました: {message}",
            ),
        );

        // 注册所有翻译
        register_translations(translations);
    }

    /// 确保翻译只注册一次
    pub fn ensure_registered() {
        Lazy::force(&TRANSLATIONS_REGISTERED);
    }

    /// 初始化错误消息多语言支持
    pub fn init() {
        Self::ensure_registered();

        // 从环境变量获取语言设置，默认为zh-CN
        let lang = std::env::var("RAT_LANG")
            .or_else(|_| std::env::var("LANG"))
            .unwrap_or_else(|_| "zh-CN".to_string());

        Self::apply_language(&lang);
    }

    /// 设置当前语言
    pub fn apply_language(lang: &str) {
        Self::ensure_registered();

        // 标准化语言代码
        use rat_embed_lang::normalize_language_code;
        let normalized_lang = normalize_language_code(lang);
        set_language(&normalized_lang);
    }
}

/// 重新导出rat_embed_lang的核心函数
pub use rat_embed_lang::{current_language, set_language, t, tf};

/// 翻译前确保已注册
pub fn localized(key: &str, args: &[(&str, &str)]) -> String {
    ErrorMessageI18n::ensure_registered();
    tf(key, args)
}
