use std::sync::Arc;

use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use serde_json::Value;

use crate::assets::AssetHost;
use crate::dto::service_contents::{DataResponse, ListResponse, PagedResponse};
use crate::forms::service_contents::{
    KeywordSearchPayload, KeywordSearchQuery, PagePayload, PageQuery, ServiceContentForm,
    ServiceContentFormPayload,
};
use crate::repository::DieselRepository;
use crate::routes::{error_response, message_response};
use crate::services::ServiceError;
use crate::services::service_contents::{
    create_service_content as create_service_content_service,
    get_service_content as get_service_content_service, list_by_category as list_by_category_service,
    list_by_subcategory as list_by_subcategory_service,
    list_deleted_service_contents as list_deleted_service_contents_service,
    list_service_contents as list_service_contents_service,
    permanent_delete_service_content as permanent_delete_service_content_service,
    restore_service_content as restore_service_content_service,
    search_by_keywords as search_by_keywords_service,
    soft_delete_service_content as soft_delete_service_content_service,
    update_service_content as update_service_content_service,
};

/// Not-found listings keep the `{message, data}` shape with `empty` as data.
fn not_found_with_data(err: ServiceError, empty: Value) -> HttpResponse {
    match err {
        ServiceError::NotFound(message) => {
            HttpResponse::NotFound().json(DataResponse::new(message, empty))
        }
        err => error_response(&err),
    }
}

#[post("/api/create/service")]
pub async fn create_service_content(
    repo: web::Data<DieselRepository>,
    assets: web::Data<Arc<dyn AssetHost>>,
    web::Json(form): web::Json<ServiceContentForm>,
) -> impl Responder {
    let payload: ServiceContentFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(&ServiceError::from(e)),
    };

    match create_service_content_service(payload, repo.get_ref(), assets.get_ref().as_ref()).await
    {
        Ok(service) => HttpResponse::Created()
            .json(DataResponse::new("Service added successfully", service)),
        Err(err) => error_response(&err),
    }
}

#[put("/api/create/update/service/{id}")]
pub async fn update_service_content(
    service_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    assets: web::Data<Arc<dyn AssetHost>>,
    web::Json(form): web::Json<ServiceContentForm>,
) -> impl Responder {
    let payload: ServiceContentFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(&ServiceError::from(e)),
    };

    match update_service_content_service(
        service_id.into_inner(),
        payload,
        repo.get_ref(),
        assets.get_ref().as_ref(),
    )
    .await
    {
        Ok(service) => {
            HttpResponse::Ok().json(DataResponse::new("Service updated successfully", service))
        }
        Err(err) => error_response(&err),
    }
}

#[delete("/api/mark/delete/{id}")]
pub async fn soft_delete_service_content(
    service_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match soft_delete_service_content_service(service_id.into_inner(), repo.get_ref()) {
        Ok(()) => message_response("Service soft-deleted successfully"),
        Err(err) => error_response(&err),
    }
}

#[delete("/api/permanent/delete/{id}")]
pub async fn permanent_delete_service_content(
    service_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    assets: web::Data<Arc<dyn AssetHost>>,
) -> impl Responder {
    match permanent_delete_service_content_service(
        service_id.into_inner(),
        repo.get_ref(),
        assets.get_ref().as_ref(),
    )
    .await
    {
        Ok(()) => message_response("Service permanently deleted successfully"),
        Err(err) => error_response(&err),
    }
}

#[put("/api/restore/service/{id}")]
pub async fn restore_service_content(
    service_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match restore_service_content_service(service_id.into_inner(), repo.get_ref()) {
        Ok(service) => {
            HttpResponse::Ok().json(DataResponse::new("Service restored successfully", service))
        }
        Err(err) => error_response(&err),
    }
}

#[get("/api/all/service")]
pub async fn list_service_contents(repo: web::Data<DieselRepository>) -> impl Responder {
    match list_service_contents_service(repo.get_ref()) {
        Ok((total, data)) => HttpResponse::Ok().json(ListResponse {
            message: "Services retrieved successfully".to_string(),
            data,
            total,
        }),
        Err(err) => error_response(&err),
    }
}

#[get("/api/mark/delete/service")]
pub async fn list_deleted_service_contents(
    repo: web::Data<DieselRepository>,
    web::Query(query): web::Query<PageQuery>,
) -> impl Responder {
    let page: PagePayload = match query.try_into() {
        Ok(page) => page,
        Err(e) => return error_response(&ServiceError::from(e)),
    };

    match list_deleted_service_contents_service(page, repo.get_ref()) {
        Ok((data, pagination)) => HttpResponse::Ok().json(PagedResponse {
            message: "Deleted services retrieved successfully".to_string(),
            data,
            pagination,
        }),
        Err(err) => error_response(&err),
    }
}

#[get("/api/single/service/{id}")]
pub async fn get_service_content(
    service_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match get_service_content_service(service_id.into_inner(), repo.get_ref()) {
        Ok(service) => {
            HttpResponse::Ok().json(DataResponse::new("Service retrieved successfully", service))
        }
        Err(err) => not_found_with_data(err, Value::Null),
    }
}

#[get("/api/category/{category}")]
pub async fn list_by_category(
    category: web::Path<String>,
    repo: web::Data<DieselRepository>,
    assets: web::Data<Arc<dyn AssetHost>>,
) -> impl Responder {
    match list_by_category_service(&category, repo.get_ref(), assets.get_ref().as_ref()).await {
        Ok(services) => HttpResponse::Ok().json(DataResponse::new(
            "Services retrieved successfully",
            services,
        )),
        Err(err) => not_found_with_data(err, Value::Array(vec![])),
    }
}

#[get("/api/subcategory/{subcategory}")]
pub async fn list_by_subcategory(
    subcategory: web::Path<String>,
    repo: web::Data<DieselRepository>,
    assets: web::Data<Arc<dyn AssetHost>>,
) -> impl Responder {
    match list_by_subcategory_service(&subcategory, repo.get_ref(), assets.get_ref().as_ref())
        .await
    {
        Ok(services) => HttpResponse::Ok().json(DataResponse::new(
            "Services retrieved successfully",
            services,
        )),
        Err(err) => not_found_with_data(err, Value::Array(vec![])),
    }
}

#[get("/api/keyword/search")]
pub async fn search_by_keywords(
    repo: web::Data<DieselRepository>,
    web::Query(query): web::Query<KeywordSearchQuery>,
) -> impl Responder {
    let payload: KeywordSearchPayload = match query.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(&ServiceError::from(e)),
    };

    match search_by_keywords_service(payload, repo.get_ref()) {
        Ok((data, pagination)) => HttpResponse::Ok().json(PagedResponse {
            message: "Services retrieved successfully".to_string(),
            data,
            pagination,
        }),
        Err(err) => error_response(&err),
    }
}
