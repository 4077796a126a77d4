use actix_web::{Responder, web, get, post, put, HttpResponse, HttpRequest, HttpMessage};
use uuid::Uuid;
use crate::{PGPool, service::{auth::UserAuthData, jobs::{Job, JobSender}, email::DynMailer, self}, db, dto::{NewEventDto, UpdateEventDto, RsvpDto, NewInviteDto, EventResponse}, errors::ApiError};


#[post("/create")]
pub async fn create(
   req: HttpRequest,
   new_event_dto: web::Json<NewEventDto>,
   pool_state: web::Data<PGPool>,
   jobs: web::Data<JobSender>
) -> impl Responder {
   let conn: &PGPool = pool_state.get_ref();
   let new_event = new_event_dto.into_inner();
   match req.extensions().get::<UserAuthData>() {
      Some(user_auth_data) => {
         let response_result = service::event::create(user_auth_data, new_event, conn)
         .await;
         match response_result {
            Ok(event) => {
               jobs.submit(Job::EnqueueDigest {
                  event_id: event.id,
                  author_id: event.creator
               });
               HttpResponse::Created().json(event)
            },
            Err(err) => HttpResponse::from_error(err)
         }
      },
      None => {
         HttpResponse::from_error(ApiError::Unauthorized)
      }
   }
}

#[get("/")]
pub async fn get_all(pool_state: web::Data<PGPool>) -> impl Responder {
   let conn: &PGPool = pool_state.get_ref();
   let res = service::event::get_all(conn)
      .await;
   match res {
      Ok(events) => {
         HttpResponse::Ok().json(events)
      },
      Err(err) => {
         HttpResponse::from_error(err)
      }
   }
}

#[get("/mine")]
pub async fn get_mine(req: HttpRequest, pool_state: web::Data<PGPool>) -> impl Responder {
   let conn: &PGPool = pool_state.get_ref();
   match req.extensions().get::<UserAuthData>() {
      Some(user_auth_data) => {
         let res = service::event::get_by_creator(user_auth_data.user_id, conn)
            .await;
         match res {
            Ok(events) => HttpResponse::Ok().json(events),
            Err(err) => HttpResponse::from_error(err)
         }
      },
      None => HttpResponse::from_error(ApiError::Unauthorized)
   }
}

#[get("/{id}")]
pub async fn get_by_id(id: web::Path<Uuid>, pool_state: web::Data<PGPool>) -> impl Responder {
   let conn: &PGPool = pool_state.get_ref();
   let event_id = id.into_inner();
   let res = service::event::get_by_id(event_id, conn)
      .await;
   match res {
      Ok(event) => {
         let tags = db::event::get_tags(event_id, conn)
            .await
            .unwrap_or_default();
         HttpResponse::Ok().json(EventResponse {
            id: event.id,
            title: event.title,
            descr: event.descr,
            dt: event.dt,
            place: event.place,
            address: event.address,
            max_attendees: event.max_attendees,
            number_of_attendees: event.number_of_attendees,
            status: event.status,
            creator: event.creator,
            tags
         })
      },
      Err(err) => HttpResponse::from_error(err)
   }
}

#[put("/update/{id}")]
pub async fn update(
   id: web::Path<Uuid>,
   update_event_dto: web::Json<UpdateEventDto>,
   req: HttpRequest,
   pool_state: web::Data<PGPool>,
   jobs: web::Data<JobSender>
) -> impl Responder {
   let conn = pool_state.get_ref();
   let event_fields = update_event_dto.into_inner();
   let event_id = id.into_inner();
   match req.extensions().get::<UserAuthData>() {
      Some(user_auth_data) => {
         let update_res = service::event::update(
            event_id,
            event_fields,
            user_auth_data,
            conn
         ).await;
         match update_res {
            Ok(_) => {
               jobs.submit(Job::NotifyEventUpdated { event_id });
               jobs.submit(Job::EnqueueDigest {
                  event_id,
                  author_id: user_auth_data.user_id
               });
               HttpResponse::Ok().json("Update successfull")
            },
            Err(err) => HttpResponse::from_error(err)
         }
      },
      None => HttpResponse::from_error(ApiError::Unauthorized)
   }
}

#[post("/{id}/cancel")]
pub async fn cancel(
   id: web::Path<Uuid>,
   req: HttpRequest,
   pool_state: web::Data<PGPool>,
   jobs: web::Data<JobSender>
) -> impl Responder {
   let conn = pool_state.get_ref();
   let event_id = id.into_inner();
   match req.extensions().get::<UserAuthData>() {
      Some(user_auth_data) => {
         let res = service::event::cancel(event_id, user_auth_data, conn)
            .await;
         match res {
            Ok(_) => {
               jobs.submit(Job::NotifyEventCanceled { event_id });
               HttpResponse::Ok().json("Event canceled")
            },
            Err(err) => HttpResponse::from_error(err)
         }
      },
      None => HttpResponse::from_error(ApiError::Unauthorized)
   }
}

#[post("/{id}/rsvp")]
pub async fn rsvp(
   id: web::Path<Uuid>,
   rsvp_dto: web::Json<RsvpDto>,
   req: HttpRequest,
   pool_state: web::Data<PGPool>
) -> impl Responder {
   let conn = pool_state.get_ref();
   match req.extensions().get::<UserAuthData>() {
      Some(user_auth_data) => {
         let res = service::rsvp::submit(
            id.into_inner(),
            user_auth_data.user_id,
            rsvp_dto.into_inner().status,
            conn
         ).await;
         match res {
            Ok(_) => HttpResponse::Ok().json("rsvp recorded"),
            Err(err) => HttpResponse::from_error(err)
         }
      },
      None => HttpResponse::from_error(ApiError::Unauthorized)
   }
}

#[post("/{id}/invitation")]
pub async fn create_invitation(
   id: web::Path<Uuid>,
   invite_dto: web::Json<NewInviteDto>,
   req: HttpRequest,
   pool_state: web::Data<PGPool>,
   mailer: web::Data<DynMailer>
) -> impl Responder {
   let conn = pool_state.get_ref();
   match req.extensions().get::<UserAuthData>() {
      Some(user_auth_data) => {
         let res = service::invite::send(
            id.into_inner(),
            user_auth_data,
            &invite_dto.identifier,
            mailer.get_ref().as_ref(),
            conn
         ).await;
         match res {
            Ok(_) => HttpResponse::Created().json("invitation created"),
            Err(err) => HttpResponse::from_error(err)
         }
      },
      None => HttpResponse::from_error(ApiError::Unauthorized)
   }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
   cfg.service(create);
   cfg.service(get_all);
   cfg.service(get_mine);
   cfg.service(get_by_id);
   cfg.service(update);
   cfg.service(cancel);
   cfg.service(rsvp);
   cfg.service(create_invitation);
}
