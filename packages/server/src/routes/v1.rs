use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/content", content_routes())
        .nest("/inquiries", inquiry_routes())
        .nest("/public", public_routes())
}

fn content_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::content::list_content,
            handlers::content::create_content
        ))
        .routes(routes!(
            handlers::content::get_content,
            handlers::content::update_content,
            handlers::content::delete_content
        ))
        .routes(routes!(handlers::content::toggle_content_active))
        .layer(handlers::content::content_body_limit())
}

fn inquiry_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::inquiry::list_inquiries))
        .routes(routes!(
            handlers::inquiry::get_inquiry,
            handlers::inquiry::delete_inquiry
        ))
        .routes(routes!(handlers::inquiry::assign_inquiry))
        .routes(routes!(handlers::inquiry::set_inquiry_status))
}

fn public_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::content::list_public_content))
        .routes(routes!(handlers::inquiry::submit_inquiry))
}
