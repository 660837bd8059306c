use crate::infra::parser::{parse_date, strip_markup};
use crate::types::{MappingError, MappingResult};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// ティーザーに残す最大文字数（Unicodeスカラ値単位）
pub const TEASER_MAX_CHARS: usize = 180;

/// ティーザー末尾に付ける省略マーカー。出力互換のためリテラルを変更しないこと
pub const TEASER_MARKER: &str = "&nbsp;[…]";

// 結合クエリが返す生の1行（テーブル定義と一致）
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostRow {
    pub id: i64,
    pub post_title: String,
    pub post_date: String,
    pub post_content: String,
    pub post_name: String,
    pub thumbnail_path: Option<String>,
    pub seo_description: Option<String>,
}

// 表示用の記事レコード（構築時に全フィールドを導出し、以後不変）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    /// 記事タイトル
    pub title: String,
    /// MM/DD/YYYY形式に正規化した公開日
    pub date: String,
    /// 本文から導出した短いプレビュー文字列
    pub teaser: String,
    /// サムネイル画像の相対パス
    pub img_src: Option<String>,
    /// URLスラッグ
    pub url: String,
}

impl BlogPost {
    /// 生の行から表示用レコードを構築する
    ///
    /// フレームワークによる暗黙のフィールド注入は使わず、導出はすべて
    /// この関数で行う。日付が解釈できない行は`MappingError`を返す
    /// （プロセスを落とさない）。
    pub fn from_row(row: PostRow) -> MappingResult<Self> {
        let date = parse_date(&row.post_date)
            .map_err(|_| MappingError::invalid_date(row.post_date.as_str()))?
            .format("%m/%d/%Y")
            .to_string();

        let teaser = derive_teaser(&row.post_content, row.seo_description.as_deref());

        Ok(Self {
            id: row.id,
            title: row.post_title,
            date,
            teaser,
            img_src: row.thumbnail_path,
            url: row.post_name,
        })
    }
}

/// 本文からティーザーを導出する
///
/// SEO説明が空でなければそのまま返す。なければ本文からタグを除去し、
/// 前後の空白を落とし、180文字を超える場合は先頭180文字に切り詰めたうえで
/// 省略マーカーを付ける（切り詰めの有無にかかわらず必ず付く）。
fn derive_teaser(content: &str, seo_description: Option<&str>) -> String {
    if let Some(description) = seo_description {
        if !description.is_empty() {
            return description.to_string();
        }
    }

    let stripped = strip_markup(content);
    let trimmed = stripped.trim();
    let cut: String = trimmed.chars().take(TEASER_MAX_CHARS).collect();

    format!("{}{}", cut, TEASER_MARKER)
}

// 変換に失敗した行の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingPolicy {
    /// 最初の失敗でバッチ全体をエラーにする
    FailFast,
    /// 失敗した行を記録してスキップし、残りを返す
    SkipInvalid,
}

/// 生の行の列を表示用レコードの列に変換する
pub fn map_rows(rows: Vec<PostRow>, policy: MappingPolicy) -> MappingResult<Vec<BlogPost>> {
    match policy {
        MappingPolicy::FailFast => rows.into_iter().map(BlogPost::from_row).collect(),
        MappingPolicy::SkipInvalid => Ok(rows
            .into_iter()
            .filter_map(|row| match BlogPost::from_row(row) {
                Ok(post) => Some(post),
                Err(e) => {
                    eprintln!("記事レコードへの変換に失敗したためスキップします: {}", e);
                    None
                }
            })
            .collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> PostRow {
        PostRow {
            id: 1,
            post_title: "テスト記事".to_string(),
            post_date: "2021-03-05 10:00:00".to_string(),
            post_content: "<p>テスト記事の本文です。</p>".to_string(),
            post_name: "test-post".to_string(),
            thumbnail_path: Some("2021/03/cover.jpg".to_string()),
            seo_description: None,
        }
    }

    // ドメインロジック・振る舞い系テスト
    mod domain {
        use super::*;

        #[test]
        fn test_short_content_keeps_full_text() {
            let row = PostRow {
                post_content: "短い本文".to_string(),
                ..sample_row()
            };
            let post = BlogPost::from_row(row).unwrap();

            // 180文字以下なら切り詰めず、マーカーだけが付く
            assert_eq!(post.teaser, format!("短い本文{}", TEASER_MARKER));
        }

        #[test]
        fn test_long_content_truncated_to_180_chars() {
            let row = PostRow {
                post_content: "あ".repeat(200),
                ..sample_row()
            };
            let post = BlogPost::from_row(row).unwrap();

            let prefix = post
                .teaser
                .strip_suffix(TEASER_MARKER)
                .expect("マーカーで終わるべき");
            assert_eq!(prefix.chars().count(), TEASER_MAX_CHARS);
            assert_eq!(prefix, "あ".repeat(180));
        }

        #[test]
        fn test_exactly_180_chars_not_truncated() {
            let row = PostRow {
                post_content: "a".repeat(180),
                ..sample_row()
            };
            let post = BlogPost::from_row(row).unwrap();

            assert_eq!(post.teaser, format!("{}{}", "a".repeat(180), TEASER_MARKER));
        }

        #[test]
        fn test_markup_stripped_and_whitespace_trimmed() {
            let row = PostRow {
                post_content: "  <p>本文<br/>です。</p>  ".to_string(),
                ..sample_row()
            };
            let post = BlogPost::from_row(row).unwrap();

            assert_eq!(post.teaser, format!("本文です。{}", TEASER_MARKER));
        }

        #[test]
        fn test_seo_description_overrides_content() {
            let row = PostRow {
                seo_description: Some("SEO用の説明文".to_string()),
                ..sample_row()
            };
            let post = BlogPost::from_row(row).unwrap();

            // 説明文はそのまま返る（マーカーも付かない）
            assert_eq!(post.teaser, "SEO用の説明文");
        }

        #[test]
        fn test_empty_seo_description_falls_back_to_content() {
            let row = PostRow {
                post_content: "本文から導出".to_string(),
                seo_description: Some(String::new()),
                ..sample_row()
            };
            let post = BlogPost::from_row(row).unwrap();

            assert_eq!(post.teaser, format!("本文から導出{}", TEASER_MARKER));
        }

        #[test]
        fn test_date_normalized_to_mm_dd_yyyy() {
            let post = BlogPost::from_row(sample_row()).unwrap();
            assert_eq!(post.date, "03/05/2021");
        }

        #[test]
        fn test_display_fields_pass_through() {
            let post = BlogPost::from_row(sample_row()).unwrap();

            assert_eq!(post.title, "テスト記事");
            assert_eq!(post.img_src.as_deref(), Some("2021/03/cover.jpg"));
            assert_eq!(post.url, "test-post");
        }

        #[test]
        fn test_invalid_date_is_mapping_error() {
            let row = PostRow {
                post_date: "0000-99-99".to_string(),
                ..sample_row()
            };
            let result = BlogPost::from_row(row);

            assert!(matches!(result, Err(MappingError::InvalidDate { .. })));
        }

        #[test]
        fn test_map_rows_fail_fast_aborts_batch() {
            let bad = PostRow {
                post_date: "not-a-date".to_string(),
                ..sample_row()
            };
            let rows = vec![sample_row(), bad];

            assert!(map_rows(rows, MappingPolicy::FailFast).is_err());
        }

        #[test]
        fn test_map_rows_skip_invalid_keeps_rest() {
            let bad = PostRow {
                post_date: "not-a-date".to_string(),
                ..sample_row()
            };
            let rows = vec![sample_row(), bad];

            let posts = map_rows(rows, MappingPolicy::SkipInvalid).unwrap();
            assert_eq!(posts.len(), 1);
            assert_eq!(posts[0].url, "test-post");

            println!("✅ 不正行スキップテスト成功");
        }
    }
}
