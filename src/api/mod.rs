// HTTP API layer: one router per resource, merged under the API prefix

pub mod common;
pub mod events;
pub mod health;
pub mod reminders;
pub mod users;
pub mod validation;
