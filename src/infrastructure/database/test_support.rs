//! In-memory SQLite fixtures shared by the database tests

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ActiveValue::NotSet, ConnectionTrait, DatabaseConnection, EntityTrait, Schema, Set};

use crate::config::{init_database, DatabaseConfig};

pub mod article {
    use chrono::{DateTime, Utc};
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "articles")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub title: String,
        pub author: String,
        pub view_count: i32,
        pub published: bool,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub const ARTICLE_COUNT: i32 = 25;

/// View count of the article with the given id. A permutation of 0..25, so
/// sorting by it never ties.
pub fn view_count_for(id: i32) -> i32 {
    (id * 7) % ARTICLE_COUNT
}

fn created_at_for(id: i32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::hours(id as i64)
}

/// Routes test logs through the test harness; `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Empty in-memory database without any tables.
pub async fn empty_db() -> DatabaseConnection {
    init_tracing();
    init_database(&DatabaseConfig::in_memory()).await.unwrap()
}

/// In-memory database holding articles 1..=25, every even id published.
pub async fn seeded_db() -> DatabaseConnection {
    let db = empty_db().await;
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(article::Entity)))
        .await
        .unwrap();

    let rows = (1..=ARTICLE_COUNT).map(|id| article::ActiveModel {
        id: NotSet,
        title: Set(format!("Article {:02}", id)),
        author: Set(if id % 3 == 0 { "alice" } else { "bob" }.to_string()),
        view_count: Set(view_count_for(id)),
        published: Set(id % 2 == 0),
        created_at: Set(created_at_for(id)),
    });
    article::Entity::insert_many(rows).exec(&db).await.unwrap();
    db
}
