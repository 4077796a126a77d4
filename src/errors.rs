use actix_web::{
    error,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use derive_more::{Display, Error};

#[derive(Debug, Display, Error, serde::Deserialize, serde::Serialize)]
pub enum ApiError {
    #[display(fmt = "not found")]
    NotFound,

    #[display(fmt = "forbidden")]
    Forbidden,

    #[display(fmt = "conflict")]
    Conflict,

    #[display(fmt = "bad request")]
    Validation,

    #[display(fmt = "event is full")]
    Capacity,

    #[display(fmt = "internal error")]
    InternalError,

    #[display(fmt = "unauthorized")]
    Unauthorized
}

impl error::ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::html())
            .body(self.to_string())
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::Validation => StatusCode::BAD_REQUEST,
            ApiError::Capacity => StatusCode::CONFLICT,
            ApiError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            _ => ApiError::InternalError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::Capacity.status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::Validation.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_row_maps_to_not_found() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound));
    }
}
