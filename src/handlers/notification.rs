use actix_web::{Responder, web, get, post, HttpResponse, HttpRequest, HttpMessage};
use uuid::Uuid;

use crate::{PGPool, service::auth::UserAuthData, db, errors::ApiError};

#[get("/")]
pub async fn list(req: HttpRequest, pool_state: web::Data<PGPool>) -> impl Responder {
    let conn: &PGPool = pool_state.get_ref();
    match req.extensions().get::<UserAuthData>() {
        Some(user_auth_data) => {
            let res = db::notification::list_for_user(user_auth_data.user_id, conn)
                .await;
            match res {
                Ok(notifications) => HttpResponse::Ok().json(notifications),
                Err(_) => HttpResponse::from_error(ApiError::InternalError)
            }
        },
        None => HttpResponse::from_error(ApiError::Unauthorized)
    }
}

#[post("/{id}/read")]
pub async fn mark_read(
    id: web::Path<Uuid>,
    req: HttpRequest,
    pool_state: web::Data<PGPool>
) -> impl Responder {
    let conn: &PGPool = pool_state.get_ref();
    match req.extensions().get::<UserAuthData>() {
        Some(user_auth_data) => {
            let notification = match db::notification::get_by_id(id.into_inner(), conn).await {
                Ok(notification) => notification,
                Err(err) => return HttpResponse::from_error(ApiError::from(err))
            };
            if notification.recipient != user_auth_data.user_id {
                return HttpResponse::from_error(ApiError::Forbidden);
            }
            match db::notification::mark_seen(notification.id, conn).await {
                Ok(_) => HttpResponse::Ok().json("marked as read"),
                Err(_) => HttpResponse::from_error(ApiError::InternalError)
            }
        },
        None => HttpResponse::from_error(ApiError::Unauthorized)
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list);
    cfg.service(mark_read);
}
