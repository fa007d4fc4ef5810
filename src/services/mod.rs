// Service layer: domain logic between the HTTP handlers and storage

pub mod error;
pub mod event;
pub mod health;
pub mod reminder;
pub mod user;

pub use error::{ErrorBody, ServiceError};
pub use event::{CreateEventInput, EventService, UpdateEventInput};
pub use health::HealthService;
pub use reminder::{CreateReminderInput, ReminderService, UpdateReminderInput};
pub use user::{ExposedUser, SessionData, UserService};
