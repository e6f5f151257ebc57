//! Appointment booking and listing

use super::{ApiResponse, AppState};
use crate::core::auth::Principal;
use crate::core::error::{FieldValidationError, PortalError};
use crate::core::validation::Validated;
use crate::core::validation::validators::parse_calendar_date;
use crate::entities::{Appointment, CreateAppointmentRequest};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// `POST /appointments`, booked on behalf of the caller
pub async fn create_appointment(
    State(state): State<AppState>,
    principal: Principal,
    Validated(body): Validated<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, PortalError> {
    let date = parse_calendar_date(&body.appointment_date).ok_or_else(|| {
        PortalError::fields(vec![FieldValidationError::new(
            "appointmentDate",
            "Please provide a valid date",
        )])
    })?;

    let appointment = Appointment::new(
        principal.id,
        body.doctor,
        date,
        body.appointment_time,
        body.reason,
    );
    let appointment = state.appointments.create(appointment).await?;
    tracing::debug!(appointment_id = %appointment.id, patient = %principal.id, "appointment booked");

    Ok((StatusCode::CREATED, ApiResponse::ok(appointment)))
}

/// `GET /appointments`, scoped to what the caller may see
pub async fn list_appointments(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<ApiResponse<Vec<Appointment>>>, PortalError> {
    let mut appointments: Vec<Appointment> = state
        .appointments
        .list()
        .await?
        .into_iter()
        .filter(|a| a.visible_to(&principal))
        .collect();
    appointments.sort_by(|a, b| {
        (a.appointment_date, &a.appointment_time).cmp(&(b.appointment_date, &b.appointment_time))
    });

    Ok(ApiResponse::ok(appointments))
}
