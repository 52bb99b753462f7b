use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct StatusMessageDoc { pub message: String, pub success: bool }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::handlers::questions::add_question,
        crate::handlers::questions::get_question,
        crate::handlers::questions::get_faqs,
        crate::handlers::questions::update_question,
        crate::handlers::questions::delete_question,
        crate::handlers::comments::add_comment,
        crate::handlers::comments::get_comments,
        crate::handlers::comments::update_comment,
        crate::handlers::comments::delete_comment,
    ),
    components(
        schemas(
            HealthResponse,
            StatusMessageDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "questions"),
        (name = "comments")
    )
)]
pub struct ApiDoc;
