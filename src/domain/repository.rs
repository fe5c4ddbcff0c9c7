use crate::domain::hospital::{
    Appointment, Comment, Doctor, News, NewAppointment, NewComment, NewDoctor, NewNews,
};
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user. A username collision surfaces as `DomainError::UsernameTaken`.
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn count_users(&self) -> Result<i64>;
}

#[async_trait]
pub trait NewsRepository: Send + Sync {
    async fn create_news(&self, news: NewNews) -> Result<News>;
    /// Newest first.
    async fn list_news(&self) -> Result<Vec<News>>;
    async fn latest_news(&self, limit: i64) -> Result<Vec<News>>;
    async fn find_news(&self, id: i64) -> Result<Option<News>>;
    async fn count_news(&self) -> Result<i64>;
    async fn create_comment(&self, comment: NewComment) -> Result<Comment>;
    /// Oldest first.
    async fn comments_for_news(&self, news_id: i64) -> Result<Vec<Comment>>;
}

#[async_trait]
pub trait DoctorRepository: Send + Sync {
    async fn create_doctor(&self, doctor: NewDoctor) -> Result<Doctor>;
    async fn list_doctors(&self) -> Result<Vec<Doctor>>;
    async fn find_doctor(&self, id: i64) -> Result<Option<Doctor>>;
    async fn count_doctors(&self) -> Result<i64>;
    async fn create_appointment(&self, appointment: NewAppointment) -> Result<Appointment>;
    /// Oldest first.
    async fn appointments_for_doctor(&self, doctor_id: i64) -> Result<Vec<Appointment>>;
}
