use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

// マークアップタグ（<...>のひと続き）にマッチするパターン
static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("固定パターン"));

/// 文字列を日付型に変換するヘルパー関数
///
/// `dateparser`クレートを利用して、様々な形式の日付文字列を解析し、
/// `DateTime<Utc>`型に変換する。
///
/// ソーススキーマの`post_date`はタイムゾーンを持たないため、
/// タイムゾーン指定のない文字列はUTCとして解釈する。ローカルタイムゾーンで
/// 補完すると環境によって日付部分がずれるためここで固定する。
///
/// # サポート形式の例
/// - "2021-03-05 10:00:00"
/// - "2021-03-05"
/// - "2021-03-05T10:00:00+09:00"
///
/// # 戻り値
/// - `Ok(DateTime<Utc>)`: 解析が成功した場合
/// - `Err(anyhow::Error)`: 解析に失敗した場合
pub fn parse_date(date_str: &str) -> Result<DateTime<Utc>> {
    dateparser::parse_with_timezone(date_str, &Utc)
        .map_err(|_| anyhow!("不正な日付形式: {}", date_str))
}

/// 文字列からマークアップタグを取り除く
///
/// ティーザー生成用の簡易的なタグ除去。属性付きタグ・閉じタグ・コメントを
/// まとめて落とし、タグの外側のテキストだけを残す。
pub fn strip_markup(input: &str) -> String {
    TAG_PATTERN.replace_all(input, "").into_owned()
}
