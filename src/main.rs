use std::io;
use std::sync::Arc;

use dotenvy::dotenv;
use shop_orders::config::Config;
use shop_orders::domain::ports::OrderRepository;
use shop_orders::infrastructure::memory_repo::InMemoryOrderRepository;
use shop_orders::infrastructure::order_repo::DieselOrderRepository;
use shop_orders::{build_server, create_pool, run_migrations, seed, OrderService};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let repo: Arc<dyn OrderRepository> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).map_err(io::Error::other)?;
            run_migrations(&pool).map_err(io::Error::other)?;
            Arc::new(DieselOrderRepository::new(pool))
        }
        None => {
            log::warn!("DATABASE_URL not set, orders are kept in memory only");
            Arc::new(InMemoryOrderRepository::default())
        }
    };
    let service = OrderService::new(repo);

    if config.seed_sample_data {
        seed::load_sample_orders(&service).map_err(io::Error::other)?;
    }

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(service, &config.host, config.port)?.await
}
