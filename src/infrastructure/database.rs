use crate::config::AppConfig;
use crate::entities::{file_models, posts};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm::{ConnectionTrait, Schema};
use std::time::Duration;
use tracing::info;

pub async fn setup_database(config: &AppConfig) -> anyhow::Result<DatabaseConnection> {
    info!("📂 Database: {}", config.database_url);

    let db = connect(config).await?;

    info!("✅ Database connected successfully");

    run_migrations(&db).await?;

    Ok(db)
}

pub async fn connect(config: &AppConfig) -> anyhow::Result<DatabaseConnection> {
    // Every pooled connection to an in-memory SQLite database sees its own
    // empty database, so the pool is pinned to a single connection.
    let in_memory = config.database_url.contains(":memory:");
    let max_connections = if in_memory {
        1
    } else {
        config.db_max_connections.max(1)
    };

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.max_connections(max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    if in_memory {
        // Recycling the only connection would drop the database with it.
        let forever = Duration::from_secs(60 * 60 * 24 * 365 * 100);
        opt.idle_timeout(forever).max_lifetime(forever);
    } else {
        opt.idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800));
    }

    Ok(Database::connect(opt).await?)
}

pub async fn run_migrations(db: &DatabaseConnection) -> anyhow::Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    info!("🔄 Running auto-migrations...");

    let stmts = vec![
        (
            "posts",
            schema
                .create_table_from_entity(posts::Entity)
                .if_not_exists()
                .to_owned(),
        ),
        (
            "file_models",
            schema
                .create_table_from_entity(file_models::Entity)
                .if_not_exists()
                .to_owned(),
        ),
    ];

    for (name, stmt) in stmts {
        let stmt = builder.build(&stmt);
        db.execute(stmt).await?;
        info!("   - Table '{}' checked/created", name);
    }

    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_file_models_parent ON file_models(parent_type, parent_id)",
    ];

    for query in indexes {
        match db
            .execute(sea_orm::Statement::from_string(builder, query.to_owned()))
            .await
        {
            Ok(_) => info!("   - Executed schema update: {}", query),
            Err(e) => tracing::warn!("   - Schema update warning: {} -> {}", query, e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ActiveModelTrait, EntityTrait, Set};

    #[tokio::test]
    async fn test_migrations_create_tables() {
        let db = connect(&AppConfig::development()).await.unwrap();
        run_migrations(&db).await.unwrap();
        // Running twice is a no-op.
        run_migrations(&db).await.unwrap();

        let post = posts::ActiveModel {
            title: Set(Some("Post One".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
        assert_eq!(post.id, 1);

        let found = posts::Entity::find_by_id(1).one(&db).await.unwrap();
        assert_eq!(found.unwrap().title.as_deref(), Some("Post One"));
    }
}
