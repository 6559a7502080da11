use axum::{
    Extension,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use super::assets::embedded;
use super::auth::AdminAccount;

/// GET /
pub async fn index() -> Redirect {
    Redirect::temporary("/login")
}

/// GET /login
pub async fn login_page() -> Response {
    embedded("login.html").unwrap_or_else(|| {
        tracing::error!("Embedded login page is missing");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}

/// GET /admin/dashboard
pub async fn admin_dashboard(
    Extension(AdminAccount(admin)): Extension<AdminAccount>,
) -> Html<String> {
    let name = html_escape::encode_text(&admin.username);

    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>wboard dashboard</title>\
         <link rel=\"stylesheet\" href=\"/static/app.css\"></head>\n\
         <body><main class=\"card\"><h1>Dashboard</h1><p>Signed in as <strong>{name}</strong>.</p></main></body>\n</html>\n"
    ))
}
