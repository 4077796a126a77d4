pub mod user;
pub mod event;
pub mod rsvp;
pub mod invitations;
pub mod notification;
pub mod email_queue;
use crate::PGPool;
use log::info;
use sqlx::postgres::PgPoolOptions;

pub async fn init_db_pool(db_url: &str) -> PGPool {
    let pool: PGPool = PgPoolOptions::new()
        .max_connections(10)
        .connect(db_url)
        .await
        .unwrap_or_else(|err| {
            panic!("Failed to connect to postgresql: {:?}", err);
        });
    info!("connected to postgresql");
    pool
}
