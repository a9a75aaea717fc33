use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use crate::auth::JwtKeys;
use crate::config::AppConfig;
use crate::database::Store;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::{OwnershipPolicy, Services};

/// Shared request state. Everything inside is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub store: Store,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(store: Store, jwt: JwtKeys, policy: OwnershipPolicy, password_cost: u32) -> Self {
        let services = Services::new(&store, policy, jwt.clone(), password_cost);
        Self { services, store, jwt }
    }
}

/// Full router: public routes, JWT-protected routes, CORS and request tracing.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let protected = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(task_list_routes())
        .merge(task_routes())
        .merge(label_routes())
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let router = Router::new()
        // Public
        .route("/", get(public::root::root))
        .route("/health", get(public::root::health))
        .merge(auth_public_routes())
        // Protected API
        .merge(protected)
        .layer(cors_layer(&config.security.cors_origins))
        .with_state(state);

    if config.server.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
}

fn auth_routes() -> Router<AppState> {
    use protected::auth;

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        .route("/api/auth/password", patch(auth::change_password))
}

fn user_routes() -> Router<AppState> {
    use protected::users;

    Router::new()
        .route("/api/user", get(users::list))
        .route(
            "/api/user/:id",
            get(users::get).patch(users::update).delete(users::delete),
        )
        .route("/api/user/:id/task-lists", get(users::task_lists))
}

fn task_list_routes() -> Router<AppState> {
    use protected::task_lists;

    Router::new()
        .route("/api/task-list", post(task_lists::create).get(task_lists::list))
        .route(
            "/api/task-list/:id",
            get(task_lists::get)
                .patch(task_lists::update)
                .delete(task_lists::delete),
        )
        .route("/api/task-list/:id/tasks", get(task_lists::tasks))
}

fn task_routes() -> Router<AppState> {
    use protected::tasks;

    Router::new()
        .route("/api/task", post(tasks::create).get(tasks::list))
        .route(
            "/api/task/:id",
            get(tasks::get).patch(tasks::update).delete(tasks::delete),
        )
}

fn label_routes() -> Router<AppState> {
    use protected::labels;

    Router::new()
        .route("/api/label", post(labels::create).get(labels::list))
        .route(
            "/api/label/:id",
            get(labels::get).patch(labels::update).delete(labels::delete),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
