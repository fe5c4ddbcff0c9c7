pub mod doctor_repository;
pub mod news_repository;
pub mod schema;
pub mod user_repository;

#[cfg(test)]
pub(crate) async fn test_pool() -> sqlx::SqlitePool {
    let pool = crate::infrastructure::database::init_pool(
        &crate::infrastructure::config::AppConfig::in_memory(),
    )
    .await
    .unwrap();
    schema::ensure_schema(&pool).await.unwrap();
    pool
}
