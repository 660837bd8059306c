use super::model::{map_rows, BlogPost, MappingPolicy, PostRow};
use crate::types::{DbError, PostResult};
use sqlx::{PgPool, Postgres, QueryBuilder};

/// ピックアップ対象に含める記事の公開日の下限（この日より後の記事のみ）
pub const RECENT_CUTOFF: &str = "2017-11-24";

// ピックアップ記事の並び順
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderMode {
    /// ランダム順
    Random,
    /// 公開日の新しい順
    ByDateDesc,
}

/// 最新の公開記事を取得する
///
/// 公開済み（post_status='publish'）かつ通常記事（post_type='post'）を
/// 公開日の新しい順に`limit`件まで返す。サムネイルのパスは
/// メタテーブルを2段（_thumbnail_id → _wp_attached_file）たどって解決し、
/// SEO説明（_aioseop_description）があればティーザーに優先使用される。
///
/// `limit`は必ずプレースホルダとしてバインドする（SQL文字列への直接埋め込みはしない）。
pub async fn latest_published(
    limit: i64,
    policy: MappingPolicy,
    pool: &PgPool,
) -> PostResult<Vec<BlogPost>> {
    let mut qb = QueryBuilder::<Postgres>::new(
        r#"
        SELECT
            p1.id,
            p1.post_title,
            p1.post_date::text AS post_date,
            left(p1.post_content, 221) AS post_content,
            p1.post_name,
            wm2.meta_value AS thumbnail_path,
            wm3.meta_value AS seo_description
        FROM aa_posts p1
        LEFT JOIN aa_postmeta wm1
            ON (wm1.post_id = p1.id
                AND wm1.meta_value IS NOT NULL
                AND wm1.meta_key = '_thumbnail_id')
        LEFT JOIN aa_postmeta wm2
            ON (wm1.meta_value = wm2.post_id::text
                AND wm2.meta_key = '_wp_attached_file'
                AND wm2.meta_value IS NOT NULL)
        LEFT JOIN aa_postmeta wm3
            ON (wm1.post_id = wm3.post_id
                AND wm3.meta_value IS NOT NULL
                AND wm3.meta_key = '_aioseop_description')
        WHERE p1.post_status = 'publish'
            AND p1.post_type = 'post'
        ORDER BY p1.post_date DESC
        LIMIT "#,
    );
    qb.push_bind(limit);

    let rows = qb
        .build_query_as::<PostRow>()
        .fetch_all(pool)
        .await
        .map_err(|e| DbError::from_execution("最新公開記事の取得", e))?;

    Ok(map_rows(rows, policy)?)
}

/// カットオフ日より後の公開記事をピックアップする
///
/// 公開済み・通常記事のうち公開日が`RECENT_CUTOFF`より後のものを、
/// ランダム順または新しい順で`amount`件まで返す。この経路では
/// SEO説明を引かないため、ティーザーは常に本文から導出される。
pub async fn random_or_recent_published(
    amount: i64,
    order: OrderMode,
    policy: MappingPolicy,
    pool: &PgPool,
) -> PostResult<Vec<BlogPost>> {
    let mut qb = QueryBuilder::<Postgres>::new(
        r#"
        SELECT
            p1.id,
            p1.post_title,
            p1.post_date::text AS post_date,
            left(p1.post_content, 221) AS post_content,
            p1.post_name,
            wm2.meta_value AS thumbnail_path,
            NULL::text AS seo_description
        FROM aa_posts p1
        LEFT JOIN aa_postmeta wm1
            ON (wm1.post_id = p1.id
                AND wm1.meta_value IS NOT NULL
                AND wm1.meta_key = '_thumbnail_id')
        LEFT JOIN aa_postmeta wm2
            ON (wm1.meta_value = wm2.post_id::text
                AND wm2.meta_key = '_wp_attached_file'
                AND wm2.meta_value IS NOT NULL)
        WHERE p1.post_status = 'publish'
            AND p1.post_type = 'post'
            AND p1.post_date > "#,
    );
    qb.push_bind(RECENT_CUTOFF);
    qb.push("::date");
    match order {
        OrderMode::Random => qb.push(" ORDER BY RANDOM()"),
        OrderMode::ByDateDesc => qb.push(" ORDER BY p1.post_date DESC"),
    };
    qb.push(" LIMIT ");
    qb.push_bind(amount);

    let rows = qb
        .build_query_as::<PostRow>()
        .fetch_all(pool)
        .await
        .map_err(|e| DbError::from_execution("ピックアップ記事の取得", e))?;

    Ok(map_rows(rows, policy)?)
}
