use crate::domain::hospital::{Comment, News, NewComment, NewNews};
use crate::domain::repository::NewsRepository;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, instrument};

const NEWS_COLUMNS: &str = "id, title, body, published_at, image_url";
const COMMENT_COLUMNS: &str = "id, news_id, sender, body, created_at";

#[derive(Clone)]
pub struct SqliteNewsRepository {
    pool: SqlitePool,
}

impl SqliteNewsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NewsRepository for SqliteNewsRepository {
    #[instrument(skip(self, news), fields(title = %news.title))]
    async fn create_news(&self, news: NewNews) -> Result<News> {
        let created = sqlx::query_as::<_, News>(&format!(
            "INSERT INTO news (title, body, published_at, image_url) VALUES (?, ?, ?, ?) RETURNING {}",
            NEWS_COLUMNS
        ))
        .bind(&news.title)
        .bind(&news.body)
        .bind(news.published_at)
        .bind(&news.image_url)
        .fetch_one(&self.pool)
        .await?;

        debug!(news_id = created.id, "News saved");
        Ok(created)
    }

    async fn list_news(&self) -> Result<Vec<News>> {
        let news = sqlx::query_as::<_, News>(&format!(
            "SELECT {} FROM news ORDER BY published_at DESC, id DESC",
            NEWS_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(news)
    }

    async fn latest_news(&self, limit: i64) -> Result<Vec<News>> {
        let news = sqlx::query_as::<_, News>(&format!(
            "SELECT {} FROM news ORDER BY published_at DESC, id DESC LIMIT ?",
            NEWS_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(news)
    }

    async fn find_news(&self, id: i64) -> Result<Option<News>> {
        let news = sqlx::query_as::<_, News>(&format!(
            "SELECT {} FROM news WHERE id = ?",
            NEWS_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(news)
    }

    async fn count_news(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM news")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    #[instrument(skip(self, comment), fields(news_id = comment.news_id))]
    async fn create_comment(&self, comment: NewComment) -> Result<Comment> {
        let created = sqlx::query_as::<_, Comment>(&format!(
            "INSERT INTO comments (news_id, sender, body, created_at) VALUES (?, ?, ?, ?) RETURNING {}",
            COMMENT_COLUMNS
        ))
        .bind(comment.news_id)
        .bind(&comment.sender)
        .bind(&comment.body)
        .bind(comment.created_at)
        .fetch_one(&self.pool)
        .await?;

        debug!(comment_id = created.id, "Comment saved");
        Ok(created)
    }

    async fn comments_for_news(&self, news_id: i64) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {} FROM comments WHERE news_id = ? ORDER BY created_at ASC, id ASC",
            COMMENT_COLUMNS
        ))
        .bind(news_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }
}
