use crate::handlers::{
    auth::{login, me, register},
    categories::{category_stats, category_summary},
    health::health_check,
    persons::{create_person, delete_person, get_person, list_persons, update_person},
    salaries::{create_salary, delete_salary, get_salary, list_salaries, update_salary},
    stats,
    templates::{
        create_template, delete_template, get_default_template, get_template, list_templates,
        template_category_stats, update_template,
    },
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Permissive CORS unless specific origins are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Authentication
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/me", get(me))
        // Person CRUD routes
        .route("/api/v1/persons", get(list_persons).post(create_person))
        .route(
            "/api/v1/persons/:person_id",
            get(get_person).put(update_person).delete(delete_person),
        )
        // Salary record routes
        .route("/api/v1/persons/:person_id/salaries", post(create_salary))
        .route("/api/v1/salaries", get(list_salaries))
        .route(
            "/api/v1/salaries/:record_id",
            get(get_salary).put(update_salary).delete(delete_salary),
        )
        // Salary templates
        .route("/api/v1/salary-templates", get(list_templates).post(create_template))
        .route("/api/v1/salary-templates/default", get(get_default_template))
        .route("/api/v1/salary-templates/category-stats", get(template_category_stats))
        .route(
            "/api/v1/salary-templates/:template_id",
            get(get_template).put(update_template).delete(delete_template),
        )
        // Statistics
        .route("/api/v1/stats/monthly", get(stats::monthly))
        .route("/api/v1/stats/yearly", get(stats::yearly))
        .route("/api/v1/stats/family", get(stats::family))
        .route("/api/v1/stats/net-income/monthly", get(stats::net_income_monthly))
        .route("/api/v1/stats/gross-vs-net/monthly", get(stats::gross_vs_net_monthly))
        .route("/api/v1/stats/waterfall", get(stats::waterfall))
        .route("/api/v1/stats/income-composition", get(stats::income_composition))
        .route("/api/v1/stats/deductions/breakdown", get(stats::deductions_breakdown))
        .route(
            "/api/v1/stats/contributions/cumulative",
            get(stats::cumulative_contributions),
        )
        .route("/api/v1/stats/tables/monthly", get(stats::monthly_table))
        .route("/api/v1/stats/tables/annual", get(stats::annual_table))
        .route("/api/v1/stats/tables/annual-monthly", get(stats::annual_monthly_table))
        .route("/api/v1/stats/categories", get(category_stats))
        .route("/api/v1/stats/categories/summary", get(category_summary))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(cors),
        )
        .with_state(state)
}
