pub mod db;
pub mod handlers;
pub mod service;
pub mod models;
pub mod dto;
pub mod errors;

use std::sync::Arc;

use actix_web::{HttpServer, App, web};
use chrono_tz::Tz;
use db::init_db_pool;
use log::warn;
use service::email::{DynMailer, LogMailer};
use sqlx::{postgres::Postgres, Pool};
use dotenv::dotenv;
use std::env;
use tokio_util::sync::CancellationToken;

type PGPool = Pool<Postgres>;

const DEFAULT_SCHEDULER_TZ: Tz = chrono_tz::Europe::Moscow;


#[actix_web::main]
async fn main() -> std::io::Result<()>{
    dotenv().ok();
    service::log::init_logger();
    let db_url = env::var("DATABASE_URL")
    .unwrap_or_else(|e| {
        panic!("Failed to get env with name 'DATABASE_URL': {:?}", e);
    });
    let pool: PGPool = init_db_pool(&db_url).await;

    let tz: Tz = match env::var("SCHEDULER_TZ") {
        Ok(name) => name.parse().unwrap_or_else(|_| {
            warn!("unknown timezone '{}', falling back to {}", name, DEFAULT_SCHEDULER_TZ);
            DEFAULT_SCHEDULER_TZ
        }),
        Err(_) => DEFAULT_SCHEDULER_TZ
    };
    let mailer: DynMailer = Arc::new(LogMailer);
    let shutdown = CancellationToken::new();
    let jobs = service::jobs::spawn_worker(pool.clone(), mailer.clone(), shutdown.clone());
    service::scheduler::spawn(tz, mailer.clone(), pool.clone(), shutdown.clone());

    let served = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(jobs.clone()))
            .app_data(web::Data::new(mailer.clone()))
            .wrap(service::log::LoggerMiddleware)
            .service(
                web::scope("/events")
                    .wrap(service::auth::IdentityMiddleware)
                    .configure(handlers::event::init_routes)
            )
            .service(
                web::scope("/invitations")
                    .wrap(service::auth::IdentityMiddleware)
                    .configure(handlers::invite::init_routes)
            )
            .service(
                web::scope("/notifications")
                    .wrap(service::auth::IdentityMiddleware)
                    .configure(handlers::notification::init_routes)
            )
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await;
    shutdown.cancel();
    served
}
