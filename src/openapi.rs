// OpenAPI documentation

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::events::list_events,
        api::events::get_event,
        api::events::create_event,
        api::events::update_event,
        api::events::delete_event,
        api::reminders::list_reminders,
        api::reminders::get_reminder_by_event,
        api::reminders::create_reminder,
        api::reminders::update_reminder,
        api::reminders::delete_reminder,
        api::users::login,
        api::users::register,
        api::users::list_users,
        api::users::get_user,
        api::users::update_user,
        api::users::delete_user,
        api::health::ping,
        api::health::version,
    ),
    components(
        schemas(
            api::common::EventWithUser,
            api::common::ReminderWithUser,
            api::common::UserSummary,
            api::common::PageResponse<api::common::EventWithUser>,
            api::common::PageResponse<api::common::ReminderWithUser>,
            api::common::PageResponse<services::ExposedUser>,
            api::events::EventBody,
            api::reminders::ReminderBody,
            api::users::LoginBody,
            api::users::RegisterBody,
            api::users::UpdateUserBody,
            services::ExposedUser,
            services::SessionData,
            services::ErrorBody,
            services::health::Ping,
            services::health::VersionInfo,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "events", description = "Event management endpoints"),
        (name = "reminders", description = "Reminder management endpoints"),
        (name = "users", description = "Account and session endpoints"),
        (name = "health", description = "Liveness and build metadata")
    ),
    info(
        title = "Calendar API",
        description = "REST API for managing calendar events and their reminders",
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_builds_and_covers_the_surface() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/events"));
        assert!(doc.paths.paths.contains_key("/events/{id}"));
        assert!(doc.paths.paths.contains_key("/reminders"));
        assert!(doc.paths.paths.contains_key("/users/login"));
        assert!(doc.paths.paths.contains_key("/health/ping"));
    }
}
