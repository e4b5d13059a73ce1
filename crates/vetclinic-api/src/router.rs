//! HTTP router.
//!
//! Returns a composable `Router`. Everything except the health check and
//! session issuance requires bearer-token authentication.

use axum::routing::{get, patch, post};
use axum::Router;

use vetclinic_core::Database;

use crate::endpoints;
use crate::middleware;
use crate::types::ApiContext;

/// Build the API router over an opened database.
pub fn api_router(db: Database) -> Router {
    build_router(ApiContext::new(db))
}

fn build_router(ctx: ApiContext) -> Router {
    // Protected routes — require a valid bearer token.
    //
    // Handlers use `State<ApiContext>`; middleware uses
    // `Extension<ApiContext>`, so the Extension layer sits outermost.
    let protected = Router::new()
        // Pet registration
        .route("/pets", post(endpoints::pets::submit))
        .route("/pets/owner/my-pets", get(endpoints::pets::list_mine))
        .route("/pets/clinic/pending", get(endpoints::pets::list_pending))
        .route(
            "/pets/:id",
            get(endpoints::pets::get)
                .patch(endpoints::pets::update)
                .delete(endpoints::pets::delete),
        )
        .route("/pets/:id/approve", patch(endpoints::pets::approve))
        .route("/pets/:id/reject", patch(endpoints::pets::reject))
        // Clinics & staff
        .route(
            "/clinics",
            post(endpoints::clinics::create).get(endpoints::clinics::list),
        )
        .route("/clinics/staff", post(endpoints::clinics::add_staff))
        .route("/clinics/staff/:id", patch(endpoints::clinics::update_staff))
        .route(
            "/clinics/staff/:id/deactivate",
            patch(endpoints::clinics::deactivate_staff),
        )
        .route(
            "/clinics/staff/:id/activate",
            patch(endpoints::clinics::activate_staff),
        )
        .route("/clinics/:id", patch(endpoints::clinics::update))
        .route(
            "/vets/active-clinic",
            patch(endpoints::clinics::switch_active_clinic),
        )
        .route("/vets/:id", patch(endpoints::clinics::update_vet))
        .route(
            "/vets/:id/deactivate",
            patch(endpoints::clinics::deactivate_vet),
        )
        .route("/vets/:id/activate", patch(endpoints::clinics::activate_vet))
        // Appointments
        .route("/appointments/book", post(endpoints::appointments::book))
        .route(
            "/appointments/owner/my-appointments",
            get(endpoints::appointments::list_mine),
        )
        .route(
            "/appointments/pet/:pet_id",
            get(endpoints::appointments::list_for_pet),
        )
        .route(
            "/appointments/vet/:vet_id",
            get(endpoints::appointments::list_for_vet),
        )
        .route(
            "/appointments/:id/cancel",
            patch(endpoints::appointments::cancel),
        )
        .route(
            "/appointments/:id/confirm",
            patch(endpoints::appointments::confirm),
        )
        .route(
            "/appointments/:id/complete",
            patch(endpoints::appointments::complete),
        )
        .route(
            "/appointments/:id/reschedule",
            patch(endpoints::appointments::reschedule),
        )
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::require_auth))
        // Extension must be outermost so the middleware can extract ApiContext
        .layer(axum::Extension(ctx.clone()));

    // Unprotected routes: health probe and the identity-tier bridge.
    let unprotected = Router::new()
        .route("/health", get(endpoints::health::check))
        // Issuing is the identity-tier bridge; revoking needs only the
        // token being revoked, which the handler reads itself.
        .route(
            "/sessions",
            post(endpoints::sessions::issue).delete(endpoints::sessions::revoke),
        )
        .route("/vets/register", post(endpoints::clinics::register_vet))
        .with_state(ctx);

    Router::new().merge(protected).merge(unprotected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use vetclinic_core::auth;
    use vetclinic_core::Actor;

    fn test_app() -> Router {
        api_router(Database::open_in_memory().unwrap())
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header("Authorization", format!("Bearer {t}"));
        }
        match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn health_is_open() {
        let response = test_app()
            .oneshot(request("GET", "/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_routes_require_auth() {
        let response = test_app()
            .oneshot(request("GET", "/pets/owner/my-pets", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_token_returns_401() {
        let response = test_app()
            .oneshot(request("GET", "/pets/owner/my-pets", Some("bogus"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn owner_token_reaches_handler() {
        let db = Database::open_in_memory().unwrap();
        let token = auth::issue_session(&db, &Actor::Owner("owner-1".into())).unwrap();
        let app = api_router(db);

        let response = app
            .oneshot(request("GET", "/pets/owner/my-pets", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn revoked_token_stops_working() {
        let db = Database::open_in_memory().unwrap();
        let token = auth::issue_session(&db, &Actor::Owner("owner-1".into())).unwrap();
        let app = api_router(db);

        let response = app
            .clone()
            .oneshot(request("DELETE", "/sessions", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(request("GET", "/pets/owner/my-pets", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = test_app()
            .oneshot(request("GET", "/nope", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
