use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub struct BearerAuthModifier;

impl Modify for BearerAuthModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(schema) = openapi.components.as_mut() {
            schema.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::routes::auth::register_handler,
        crate::web::routes::auth::login_handler,
        crate::web::routes::users::me_handler,
        crate::web::routes::modules::modules_generate_handler,
        crate::web::routes::modules::modules_list_handler,
        crate::web::routes::modules::modules_get_handler,
        crate::web::routes::modules::modules_delete_handler,
        crate::web::routes::modules::quiz_submit_handler,
        crate::web::routes::modules::modules_pdf_handler,
        crate::web::routes::modules::modules_assignment_handler,
        crate::web::routes::assignments::assignment_latex_handler,
        crate::web::routes::assignments::assignment_pdf_handler,
        crate::web::routes::chat::chat_handler,
        crate::web::routes::progress::progress_handler,
        crate::web::routes::recommendations::videos_handler,
        crate::web::routes::recommendations::next_topics_handler,
        crate::web::routes::health::health_handler,
        crate::web::routes::health::live_handler,
        crate::web::routes::health::ready_handler,
    ),
    modifiers(&BearerAuthModifier),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "modules", description = "Generated learning modules"),
        (name = "quiz", description = "Quiz grading"),
        (name = "assignments", description = "Assignment downloads"),
        (name = "chat", description = "Learning assistant"),
        (name = "recommendations", description = "Videos and next topics"),
    )
)]
pub struct ApiDoc;
