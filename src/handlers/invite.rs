use actix_web::{Responder, web, post, HttpResponse, HttpRequest, HttpMessage};
use uuid::Uuid;

use crate::{PGPool, service::{auth::UserAuthData, self}, dto::InviteResponseDto, errors::ApiError};

#[post("/{id}/respond")]
pub async fn respond(
    id: web::Path<Uuid>,
    response_dto: web::Json<InviteResponseDto>,
    req: HttpRequest,
    pool_state: web::Data<PGPool>
) -> impl Responder {
    let conn: &PGPool = pool_state.get_ref();
    match req.extensions().get::<UserAuthData>() {
        Some(user_auth_data) => {
            let res = service::invite::respond(
                id.into_inner(),
                user_auth_data.user_id,
                response_dto.into_inner().status,
                conn
            ).await;
            match res {
                Ok(_) => HttpResponse::Ok().json("response recorded"),
                Err(err) => HttpResponse::from_error(err)
            }
        },
        None => HttpResponse::from_error(ApiError::Unauthorized)
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(respond);
}
