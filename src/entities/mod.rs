//! Records owned by the portal and the request bodies that produce them

pub mod analysis;
pub mod appointment;
pub mod user;

pub use analysis::{AnalysisStatus, SymptomAnalysis, SymptomRequest};
pub use appointment::{Appointment, AppointmentStatus, CreateAppointmentRequest};
pub use user::{LoginRequest, RegisterRequest, UpdateUserRequest, User};
