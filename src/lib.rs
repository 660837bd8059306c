//! WordPress互換スキーマから公開済みブログ記事を読み出し、
//! 表示用の派生レコード（タイトル・ティーザー・日付・画像パス・スラッグ）に変換するクレート。

pub mod domain;
pub mod infra;
pub mod types;
