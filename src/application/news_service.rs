use crate::domain::error::DomainError;
use crate::domain::hospital::{Comment, CommentForm, News, NewsForm};
use crate::domain::repository::NewsRepository;
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// How many articles the home page shows.
pub const HOME_NEWS_LIMIT: i64 = 3;

pub struct NewsService<R: NewsRepository> {
    repository: Arc<R>,
}

impl<R: NewsRepository> NewsService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> Result<Vec<News>> {
        self.repository.list_news().await
    }

    pub async fn latest(&self) -> Result<Vec<News>> {
        self.repository.latest_news(HOME_NEWS_LIMIT).await
    }

    pub async fn get(&self, id: i64) -> Result<News> {
        self.repository.find_news(id).await?.ok_or_else(|| {
            warn!(news_id = id, "News not found");
            DomainError::NotFound(format!("News {} not found", id)).into()
        })
    }

    /// A news item together with its comments, oldest comment first.
    pub async fn detail(&self, id: i64) -> Result<(News, Vec<Comment>)> {
        let news = self.get(id).await?;
        let comments = self.comments_for_news(id).await?;
        Ok((news, comments))
    }

    pub async fn comments_for_news(&self, id: i64) -> Result<Vec<Comment>> {
        self.repository.comments_for_news(id).await
    }

    #[instrument(skip(self, form))]
    pub async fn publish(&self, form: NewsForm) -> Result<News> {
        let news = form.into_new_news(Utc::now())?;
        let news = self.repository.create_news(news).await?;
        info!(news_id = news.id, title = %news.title, "News published");
        Ok(news)
    }

    #[instrument(skip(self, form))]
    pub async fn add_comment(&self, news_id: i64, form: CommentForm) -> Result<Comment> {
        // 404 takes precedence over field validation
        self.get(news_id).await?;
        let comment = form.into_new_comment(news_id, Utc::now())?;
        let comment = self.repository.create_comment(comment).await?;
        info!(news_id, comment_id = comment.id, "Comment added");
        Ok(comment)
    }
}
