use crate::domain::hospital::{
    APPOINTMENT_STATUS_PENDING, Appointment, Doctor, NewAppointment, NewDoctor,
};
use crate::domain::repository::DoctorRepository;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, instrument};

const DOCTOR_COLUMNS: &str = "id, name, specialty, schedule, photo_url";
const APPOINTMENT_COLUMNS: &str =
    "id, doctor_id, patient_name, phone, complaint, requested_date, status, created_at";

#[derive(Clone)]
pub struct SqliteDoctorRepository {
    pool: SqlitePool,
}

impl SqliteDoctorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DoctorRepository for SqliteDoctorRepository {
    #[instrument(skip(self, doctor), fields(name = %doctor.name))]
    async fn create_doctor(&self, doctor: NewDoctor) -> Result<Doctor> {
        let created = sqlx::query_as::<_, Doctor>(&format!(
            "INSERT INTO doctors (name, specialty, schedule, photo_url) VALUES (?, ?, ?, ?) RETURNING {}",
            DOCTOR_COLUMNS
        ))
        .bind(&doctor.name)
        .bind(&doctor.specialty)
        .bind(&doctor.schedule)
        .bind(&doctor.photo_url)
        .fetch_one(&self.pool)
        .await?;

        debug!(doctor_id = created.id, "Doctor saved");
        Ok(created)
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>> {
        let doctors = sqlx::query_as::<_, Doctor>(&format!(
            "SELECT {} FROM doctors ORDER BY id",
            DOCTOR_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(doctors)
    }

    async fn find_doctor(&self, id: i64) -> Result<Option<Doctor>> {
        let doctor = sqlx::query_as::<_, Doctor>(&format!(
            "SELECT {} FROM doctors WHERE id = ?",
            DOCTOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(doctor)
    }

    async fn count_doctors(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM doctors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    #[instrument(skip(self, appointment), fields(doctor_id = appointment.doctor_id))]
    async fn create_appointment(&self, appointment: NewAppointment) -> Result<Appointment> {
        let created = sqlx::query_as::<_, Appointment>(&format!(
            "INSERT INTO appointments \
             (doctor_id, patient_name, phone, complaint, requested_date, status, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {}",
            APPOINTMENT_COLUMNS
        ))
        .bind(appointment.doctor_id)
        .bind(&appointment.patient_name)
        .bind(&appointment.phone)
        .bind(&appointment.complaint)
        .bind(&appointment.requested_date)
        .bind(APPOINTMENT_STATUS_PENDING)
        .bind(appointment.created_at)
        .fetch_one(&self.pool)
        .await?;

        debug!(appointment_id = created.id, "Appointment saved");
        Ok(created)
    }

    async fn appointments_for_doctor(&self, doctor_id: i64) -> Result<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {} FROM appointments WHERE doctor_id = ? ORDER BY created_at ASC, id ASC",
            APPOINTMENT_COLUMNS
        ))
        .bind(doctor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(appointments)
    }
}
