pub mod config;
pub mod db;
pub mod errors;
pub mod schema;
pub mod seed;

pub mod application {
    pub mod order_service;
}

pub mod domain {
    pub mod errors;
    pub mod order;
    pub mod ports;
    pub mod validation;
}

pub mod handlers {
    pub mod orders;
}

pub mod infrastructure {
    pub mod memory_repo;
    pub mod models;
    pub mod order_repo;
}

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use application::order_service::{OrderService, SharedOrderService};
pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::create_order,
        handlers::orders::get_order,
        handlers::orders::list_orders,
        handlers::orders::list_user_orders,
        handlers::orders::delete_order,
    ),
    components(schemas(
        handlers::orders::AddressDto,
        handlers::orders::ClientDto,
        handlers::orders::CreateOrderLineRequest,
        handlers::orders::CreateOrderRequest,
        handlers::orders::OrderLineResponse,
        handlers::orders::OrderResponse,
        handlers::orders::ListOrdersResponse,
    )),
    tags((name = "orders", description = "Order aggregate endpoints"))
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    log::info!("Applied {} pending migration(s)", applied.len());
    Ok(())
}

/// Registers the `/orders` routes. Expects a `web::Data<SharedOrderService>`
/// in the app data.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .service(
                web::resource("")
                    .route(web::post().to(handlers::orders::create_order))
                    .route(web::get().to(handlers::orders::list_orders)),
            )
            .service(
                web::resource("/user/{user_id}")
                    .route(web::get().to(handlers::orders::list_user_orders)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(handlers::orders::get_order))
                    .route(web::delete().to(handlers::orders::delete_order)),
            ),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    service: SharedOrderService,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let service = web::Data::new(service);
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(Logger::default())
            .configure(configure_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
