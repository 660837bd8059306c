use blogdoggo::domain::post::{
    latest_published, random_or_recent_published, BlogPost, MappingPolicy, OrderMode,
};
use blogdoggo::infra::db::setup_database;

// 表示レイヤの代わりに5フィールドをそのまま出力する
fn print_post(post: &BlogPost) {
    println!("{}", post.title);
    println!("{}", post.teaser);
    println!("{}", post.date);
    if let Some(img_src) = &post.img_src {
        println!("{}", img_src);
    }
    println!("{}", post.url);
    println!();
}

#[tokio::main]
async fn main() {
    // 環境変数を読み込み（.envファイルがあれば使用）
    let _ = dotenvy::dotenv();

    let pool = match setup_database().await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("データベースのセットアップに失敗しました: {}", e);
            return;
        }
    };

    // 最新記事
    println!("=== 最新の公開記事 ===");
    match latest_published(3, MappingPolicy::SkipInvalid, &pool).await {
        Ok(posts) => {
            for post in &posts {
                print_post(post);
            }
        }
        Err(e) => eprintln!("最新記事の取得中にエラーが発生しました: {}", e),
    }

    // ピックアップ記事
    println!("=== 新着順のピックアップ記事 ===");
    match random_or_recent_published(3, OrderMode::ByDateDesc, MappingPolicy::SkipInvalid, &pool)
        .await
    {
        Ok(posts) => {
            for post in &posts {
                print_post(post);
            }
        }
        Err(e) => eprintln!("ピックアップ記事の取得中にエラーが発生しました: {}", e),
    }
}
