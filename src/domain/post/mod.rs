pub mod model;
pub mod repository;

// 公開APIの再エクスポート

// model.rsから
pub use model::{map_rows, BlogPost, MappingPolicy, PostRow};

// repository.rsから
pub use repository::{latest_published, random_or_recent_published, OrderMode};
