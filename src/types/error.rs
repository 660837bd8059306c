use crate::types::config::ConfigError;
use thiserror::Error;

/// データベース層のエラー型
/// 接続断とクエリ失敗を区別し、呼び出し元が再試行・中断を判断できるようにする
#[derive(Error, Debug)]
pub enum DbError {
    /// データベース接続エラー（ネットワーク・認証）
    #[error("データベース接続エラー: {source}")]
    Connection {
        #[source]
        source: sqlx::Error,
    },

    /// データベースクエリエラー（SQL不正・制約違反）
    #[error("データベースクエリエラー: {operation} - {source}")]
    Query {
        operation: String,
        #[source]
        source: sqlx::Error,
    },

    /// 結果列を文字列表現へ変換できない
    #[error("結果列のデコードに失敗しました: {column}")]
    Decode { column: String },

    /// 設定エラー
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DbError {
    /// データベース接続エラーを作成
    pub fn connection(source: sqlx::Error) -> Self {
        Self::Connection { source }
    }

    /// データベースクエリエラーを作成
    pub fn query<O: Into<String>>(operation: O, source: sqlx::Error) -> Self {
        Self::Query {
            operation: operation.into(),
            source,
        }
    }

    /// 列デコードエラーを作成
    pub fn decode<C: Into<String>>(column: C) -> Self {
        Self::Decode {
            column: column.into(),
        }
    }

    /// クエリ実行時のエラーを接続系とクエリ系に振り分ける
    pub fn from_execution<O: Into<String>>(operation: O, source: sqlx::Error) -> Self {
        match source {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => Self::connection(source),
            _ => Self::query(operation, source),
        }
    }
}

/// データベースエラーのResult型エイリアス
pub type DbResult<T> = std::result::Result<T, DbError>;

/// 行から表示用レコードへの変換エラー型
/// 1行単位で発生し、バッチ全体を巻き込まない
#[derive(Error, Debug)]
pub enum MappingError {
    /// 公開日時が日付として解釈できない
    #[error("公開日時を解釈できません: {value}")]
    InvalidDate { value: String },
}

impl MappingError {
    /// 日付解釈エラーを作成
    pub fn invalid_date<V: Into<String>>(value: V) -> Self {
        Self::InvalidDate {
            value: value.into(),
        }
    }
}

/// 変換エラーのResult型エイリアス
pub type MappingResult<T> = std::result::Result<T, MappingError>;

/// 記事ドメイン層のエラー型（データベース層と変換層の合流点）
#[derive(Error, Debug)]
pub enum PostError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

/// 記事ドメインエラーのResult型エイリアス
pub type PostResult<T> = std::result::Result<T, PostError>;
