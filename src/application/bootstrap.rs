//! First-run setup: schema plus sample content for empty tables.

use crate::data::schema::ensure_schema;
use crate::domain::hospital::{NewDoctor, NewNews};
use crate::domain::repository::{DoctorRepository, NewsRepository};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub news_inserted: usize,
    pub doctors_inserted: usize,
}

fn sample_news() -> Vec<NewNews> {
    let now = Utc::now();
    vec![
        NewNews {
            title: "Penyuluhan Kesehatan Jantung bagi Prajurit".to_string(),
            body: "RST Slamet Riyadi mengadakan penyuluhan kesehatan jantung koroner..."
                .to_string(),
            image_url: Some(
                "https://images.unsplash.com/photo-1576091160399-112ba8d25d1d?auto=format&fit=crop&w=500&q=60"
                    .to_string(),
            ),
            published_at: now,
        },
        NewNews {
            title: "Peresmian Ruang Operasi Baru".to_string(),
            body: "Kepala Rumah Sakit meresmikan fasilitas bedah sentral terbaru dengan teknologi robotik..."
                .to_string(),
            image_url: Some(
                "https://images.unsplash.com/photo-1519494026892-80bbd2d6fd0d?auto=format&fit=crop&w=500&q=60"
                    .to_string(),
            ),
            published_at: now,
        },
    ]
}

fn sample_doctors() -> Vec<NewDoctor> {
    let doctor = |name: &str, specialty: &str, schedule: &str, photo: &str| NewDoctor {
        name: name.to_string(),
        specialty: specialty.to_string(),
        schedule: schedule.to_string(),
        photo_url: Some(format!(
            "https://images.unsplash.com/{}?auto=format&fit=crop&w=300&q=80",
            photo
        )),
    };

    vec![
        doctor(
            "dr. Budi Santoso, Sp.PD",
            "Penyakit Dalam",
            "Senin - Kamis (08.00 - 14.00)",
            "photo-1612349317150-e413f6a5b16d",
        ),
        doctor(
            "dr. Sarah Wijaya, Sp.A",
            "Anak",
            "Selasa - Jumat (09.00 - 15.00)",
            "photo-1594824476967-48c8b964273f",
        ),
        doctor(
            "dr. Hartono, Sp.B",
            "Bedah Umum",
            "Senin, Rabu, Jumat (10.00 - 16.00)",
            "photo-1537368910025-700350fe46c7",
        ),
        doctor(
            "dr. Linda Kusuma, Sp.M",
            "Mata",
            "Selasa & Kamis (08.00 - 12.00)",
            "photo-1559839734-2b71ea197ec2",
        ),
    ]
}

/// Inserts the sample rows into whichever of the two tables is empty.
#[instrument(skip_all)]
pub async fn seed_if_empty<N, D>(news: &N, doctors: &D) -> Result<SeedReport>
where
    N: NewsRepository,
    D: DoctorRepository,
{
    let mut report = SeedReport::default();

    if news.count_news().await? == 0 {
        for item in sample_news() {
            news.create_news(item).await?;
            report.news_inserted += 1;
        }
    } else {
        debug!("News table already populated");
    }

    if doctors.count_doctors().await? == 0 {
        for item in sample_doctors() {
            doctors.create_doctor(item).await?;
            report.doctors_inserted += 1;
        }
    } else {
        debug!("Doctor table already populated");
    }

    info!(
        news_inserted = report.news_inserted,
        doctors_inserted = report.doctors_inserted,
        "Seed data checked"
    );
    Ok(report)
}

/// Creates the schema and seeds it.
pub async fn bootstrap<N, D>(pool: &SqlitePool, news: &N, doctors: &D) -> Result<SeedReport>
where
    N: NewsRepository,
    D: DoctorRepository,
{
    ensure_schema(pool).await?;
    seed_if_empty(news, doctors).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::doctor_repository::SqliteDoctorRepository;
    use crate::data::news_repository::SqliteNewsRepository;
    use crate::infrastructure::config::AppConfig;
    use crate::infrastructure::database::init_pool;

    #[tokio::test]
    async fn test_bootstrap_twice_does_not_duplicate() {
        let pool = init_pool(&AppConfig::in_memory()).await.unwrap();
        let news = SqliteNewsRepository::new(pool.clone());
        let doctors = SqliteDoctorRepository::new(pool.clone());

        let first = bootstrap(&pool, &news, &doctors).await.unwrap();
        let second = bootstrap(&pool, &news, &doctors).await.unwrap();

        assert_eq!(
            first,
            SeedReport {
                news_inserted: 2,
                doctors_inserted: 4
            }
        );
        assert_eq!(second, SeedReport::default());
        assert_eq!(news.count_news().await.unwrap(), 2);
        assert_eq!(doctors.count_doctors().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_seed_only_fills_empty_tables() {
        let pool = init_pool(&AppConfig::in_memory()).await.unwrap();
        ensure_schema(&pool).await.unwrap();
        let news = SqliteNewsRepository::new(pool.clone());
        let doctors = SqliteDoctorRepository::new(pool.clone());

        doctors
            .create_doctor(NewDoctor {
                name: "dr. Tunggal".to_string(),
                specialty: "Umum".to_string(),
                schedule: "Setiap hari".to_string(),
                photo_url: None,
            })
            .await
            .unwrap();

        let report = seed_if_empty(&news, &doctors).await.unwrap();
        assert_eq!(report.news_inserted, 2);
        assert_eq!(report.doctors_inserted, 0);
        assert_eq!(doctors.count_doctors().await.unwrap(), 1);
    }
}
