use crate::domain::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const APPOINTMENT_STATUS_PENDING: &str = "pending";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct News {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub published_at: DateTime<Utc>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub news_id: i64,
    pub sender: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub specialty: String,
    pub schedule: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Appointment {
    pub id: i64,
    pub doctor_id: i64,
    pub patient_name: String,
    pub phone: String,
    pub complaint: String,
    pub requested_date: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNews {
    pub title: String,
    pub body: String,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub news_id: i64,
    pub sender: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub name: String,
    pub specialty: String,
    pub schedule: String,
    pub photo_url: Option<String>,
}

/// Appointment request as accepted by the repository. There is no status
/// field: every stored request starts out as [`APPOINTMENT_STATUS_PENDING`].
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub doctor_id: i64,
    pub patient_name: String,
    pub phone: String,
    pub complaint: String,
    pub requested_date: String,
    pub created_at: DateTime<Utc>,
}

// Submitted forms. Absent fields deserialize as empty strings so the
// services can report them as validation errors instead of failing the
// extractor with a bare 400.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsForm {
    #[serde(rename = "judul")]
    pub title: String,
    #[serde(rename = "konten")]
    pub body: String,
    #[serde(rename = "gambar")]
    pub image_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    #[serde(rename = "nama")]
    pub sender: String,
    #[serde(rename = "isi")]
    pub body: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DoctorForm {
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "spesialis")]
    pub specialty: String,
    #[serde(rename = "jadwal")]
    pub schedule: String,
    #[serde(rename = "foto")]
    pub photo_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentForm {
    #[serde(rename = "nama_pasien")]
    pub patient_name: String,
    #[serde(rename = "no_hp")]
    pub phone: String,
    #[serde(rename = "keluhan")]
    pub complaint: String,
    #[serde(rename = "dokter_id")]
    pub doctor_id: String,
    #[serde(rename = "tanggal")]
    pub requested_date: String,
}

impl NewsForm {
    pub fn into_new_news(self, published_at: DateTime<Utc>) -> Result<NewNews, DomainError> {
        Ok(NewNews {
            title: required(&self.title, "title")?,
            body: required(&self.body, "content")?,
            image_url: optional(&self.image_url),
            published_at,
        })
    }
}

impl CommentForm {
    pub fn into_new_comment(
        self,
        news_id: i64,
        created_at: DateTime<Utc>,
    ) -> Result<NewComment, DomainError> {
        Ok(NewComment {
            news_id,
            sender: required(&self.sender, "name")?,
            body: required(&self.body, "comment")?,
            created_at,
        })
    }
}

impl DoctorForm {
    pub fn into_new_doctor(self) -> Result<NewDoctor, DomainError> {
        Ok(NewDoctor {
            name: required(&self.name, "name")?,
            specialty: required(&self.specialty, "specialty")?,
            schedule: required(&self.schedule, "schedule")?,
            photo_url: optional(&self.photo_url),
        })
    }
}

impl AppointmentForm {
    /// Validates the text fields and parses the doctor id. Whether the doctor
    /// exists is checked by the service against the repository.
    pub fn into_new_appointment(
        self,
        created_at: DateTime<Utc>,
    ) -> Result<NewAppointment, DomainError> {
        let doctor_id = parse_id(&self.doctor_id)
            .ok_or_else(|| DomainError::Validation("Please choose a doctor".to_string()))?;
        Ok(NewAppointment {
            doctor_id,
            patient_name: required(&self.patient_name, "patient name")?,
            phone: required(&self.phone, "phone number")?,
            complaint: required(&self.complaint, "complaint")?,
            requested_date: required(&self.requested_date, "date")?,
            created_at,
        })
    }
}

/// Parses a positive row id from free text.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

fn required(value: &str, field: &str) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::Validation(format!("The {} field is required", field)));
    }
    Ok(value.to_string())
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
