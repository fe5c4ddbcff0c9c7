use crate::domain::error::DomainError;
use crate::domain::hospital::{Appointment, AppointmentForm, Doctor, DoctorForm};
use crate::domain::repository::DoctorRepository;
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub struct DoctorService<R: DoctorRepository> {
    repository: Arc<R>,
}

impl<R: DoctorRepository> DoctorService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> Result<Vec<Doctor>> {
        self.repository.list_doctors().await
    }

    pub async fn find(&self, id: i64) -> Result<Option<Doctor>> {
        self.repository.find_doctor(id).await
    }

    /// Every doctor paired with its appointment requests, oldest request first.
    pub async fn list_with_appointments(&self) -> Result<Vec<(Doctor, Vec<Appointment>)>> {
        let doctors = self.repository.list_doctors().await?;
        let mut result = Vec::with_capacity(doctors.len());
        for doctor in doctors {
            let appointments = self.appointments_for_doctor(doctor.id).await?;
            result.push((doctor, appointments));
        }
        Ok(result)
    }

    pub async fn appointments_for_doctor(&self, doctor_id: i64) -> Result<Vec<Appointment>> {
        self.repository.appointments_for_doctor(doctor_id).await
    }

    #[instrument(skip(self, form))]
    pub async fn add_doctor(&self, form: DoctorForm) -> Result<Doctor> {
        let doctor = self.repository.create_doctor(form.into_new_doctor()?).await?;
        info!(doctor_id = doctor.id, name = %doctor.name, "Doctor added");
        Ok(doctor)
    }

    /// Stores an appointment request. The referenced doctor must exist; the
    /// status is always assigned here, never taken from the request.
    #[instrument(skip(self, form))]
    pub async fn request_appointment(&self, form: AppointmentForm) -> Result<Appointment> {
        let appointment = form.into_new_appointment(Utc::now())?;

        if self.find(appointment.doctor_id).await?.is_none() {
            warn!(doctor_id = appointment.doctor_id, "Appointment for unknown doctor");
            let message = "The selected doctor does not exist".to_string();
            return Err(DomainError::Validation(message).into());
        }

        let appointment = self.repository.create_appointment(appointment).await?;
        info!(
            appointment_id = appointment.id,
            doctor_id = appointment.doctor_id,
            "Appointment requested"
        );
        Ok(appointment)
    }
}
