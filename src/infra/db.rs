use crate::types::{ConfigError, DbError, DbResult};
use sqlx::PgPool;
use std::env;

/// 環境変数DATABASE_URLから接続プールを作成する
///
/// このクレート本体はプールを開かない（開いたハンドルを受け取るだけ）。
/// プールの取得はバイナリ側の責務で、この関数はその入口になる。
pub async fn create_pool() -> DbResult<PgPool> {
    let database_url = env::var("DATABASE_URL")
        .map_err(|_| DbError::from(ConfigError::missing_env_var("DATABASE_URL")))?;

    PgPool::connect(&database_url)
        .await
        .map_err(DbError::connection)
}

/// データベースの初期化（開発・テスト用スキーマ作成）
pub async fn initialize_database(pool: &PgPool) -> DbResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DbError::query("データベースマイグレーション実行", e.into()))
}

/// プール作成とスキーマ初期化をまとめて行う便利関数
pub async fn setup_database() -> DbResult<PgPool> {
    let pool = create_pool().await?;
    initialize_database(&pool).await?;
    Ok(pool)
}
