use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, put, web};

use crate::forms::categories::{
    CreateCategoryForm, CreateCategoryFormPayload, RenameCategoryForm, RenameCategoryFormPayload,
    SubcategoryForm, SubcategoryFormPayload,
};
use crate::repository::DieselRepository;
use crate::routes::{error_response, message_response};
use crate::services::ServiceError;
use crate::services::categories::{
    add_subcategory as add_subcategory_service, create_category as create_category_service,
    hard_delete_category as hard_delete_category_service,
    hard_delete_subcategory as hard_delete_subcategory_service,
    list_active_categories as list_active_categories_service,
    list_active_subcategories as list_active_subcategories_service,
    list_all_active_subcategories as list_all_active_subcategories_service,
    list_deleted_categories as list_deleted_categories_service,
    list_deleted_subcategories as list_deleted_subcategories_service,
    rename_category as rename_category_service, rename_subcategory as rename_subcategory_service,
    restore_category as restore_category_service,
    restore_subcategory as restore_subcategory_service,
    soft_delete_category as soft_delete_category_service,
    soft_delete_subcategory as soft_delete_subcategory_service,
};

/// Name of the cookie recorded as the category's provenance token.
pub const TOKEN_COOKIE: &str = "token";

#[post("/api/categories")]
pub async fn create_category(
    request: HttpRequest,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateCategoryForm>,
) -> impl Responder {
    let payload: CreateCategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(&ServiceError::from(e)),
    };
    let token = request.cookie(TOKEN_COOKIE);

    match create_category_service(payload, token.as_ref().map(|c| c.value()), repo.get_ref()) {
        Ok(category) => HttpResponse::Created().json(category),
        Err(err) => error_response(&err),
    }
}

#[post("/api/categories/{category_id}/subcategories")]
pub async fn add_subcategory(
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<SubcategoryForm>,
) -> impl Responder {
    let payload: SubcategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(&ServiceError::from(e)),
    };

    match add_subcategory_service(category_id.into_inner(), payload, repo.get_ref()) {
        Ok(category) => HttpResponse::Ok().json(category),
        Err(err) => error_response(&err),
    }
}

#[put("/api/categories/{category_id}")]
pub async fn rename_category(
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<RenameCategoryForm>,
) -> impl Responder {
    let payload: RenameCategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(&ServiceError::from(e)),
    };

    match rename_category_service(category_id.into_inner(), payload, repo.get_ref()) {
        Ok(category) => HttpResponse::Ok().json(category),
        Err(err) => error_response(&err),
    }
}

#[put("/api/categories/{category_id}/subcategories/{subcategory_id}")]
pub async fn rename_subcategory(
    path: web::Path<(i32, i32)>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<SubcategoryForm>,
) -> impl Responder {
    let payload: SubcategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(&ServiceError::from(e)),
    };
    let (category_id, subcategory_id) = path.into_inner();

    match rename_subcategory_service(category_id, subcategory_id, payload, repo.get_ref()) {
        Ok(()) => message_response("Subcategory updated successfully"),
        Err(err) => error_response(&err),
    }
}

#[delete("/api/categories/{category_id}")]
pub async fn soft_delete_category(
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match soft_delete_category_service(category_id.into_inner(), repo.get_ref()) {
        Ok(()) => message_response("Category marked as deleted"),
        Err(err) => error_response(&err),
    }
}

#[delete("/api/categories/{category_id}/subcategories/{subcategory_id}")]
pub async fn soft_delete_subcategory(
    path: web::Path<(i32, i32)>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (category_id, subcategory_id) = path.into_inner();

    match soft_delete_subcategory_service(category_id, subcategory_id, repo.get_ref()) {
        Ok(category) => HttpResponse::Ok().json(category),
        Err(err) => error_response(&err),
    }
}

#[put("/api/categories/{category_id}/restore")]
pub async fn restore_category(
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match restore_category_service(category_id.into_inner(), repo.get_ref()) {
        Ok(()) => message_response("Category restored successfully"),
        Err(err) => error_response(&err),
    }
}

#[put("/api/categories/{category_id}/subcategories/{subcategory_id}/restore")]
pub async fn restore_subcategory(
    path: web::Path<(i32, i32)>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (category_id, subcategory_id) = path.into_inner();

    match restore_subcategory_service(category_id, subcategory_id, repo.get_ref()) {
        Ok(category) => HttpResponse::Ok().json(category),
        Err(err) => error_response(&err),
    }
}

#[delete("/api/categories/delete/category/{category_id}")]
pub async fn hard_delete_category(
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match hard_delete_category_service(category_id.into_inner(), repo.get_ref()) {
        Ok(()) => message_response("Category deleted completely"),
        Err(err) => error_response(&err),
    }
}

#[delete("/api/categories/delete/{category_id}/subcategory/{subcategory_id}")]
pub async fn hard_delete_subcategory(
    path: web::Path<(i32, i32)>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (category_id, subcategory_id) = path.into_inner();

    match hard_delete_subcategory_service(category_id, subcategory_id, repo.get_ref()) {
        Ok(()) => message_response("Subcategory deleted completely"),
        Err(err) => error_response(&err),
    }
}

#[get("/api/bilvani/get/category")]
pub async fn list_active_categories(repo: web::Data<DieselRepository>) -> impl Responder {
    match list_active_categories_service(repo.get_ref()) {
        Ok(categories) => HttpResponse::Ok().json(categories),
        Err(err) => error_response(&err),
    }
}

#[get("/api/bilvani/get/subcategory")]
pub async fn list_all_active_subcategories(repo: web::Data<DieselRepository>) -> impl Responder {
    match list_all_active_subcategories_service(repo.get_ref()) {
        Ok(subcategories) => HttpResponse::Ok().json(subcategories),
        Err(err) => error_response(&err),
    }
}

#[get("/api/bilvani/get/{category_id}/subcategories")]
pub async fn list_active_subcategories(
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_active_subcategories_service(category_id.into_inner(), repo.get_ref()) {
        Ok(subcategories) => HttpResponse::Ok().json(subcategories),
        Err(err) => error_response(&err),
    }
}

#[get("/api/bilvani/get/delete-category")]
pub async fn list_deleted_categories(repo: web::Data<DieselRepository>) -> impl Responder {
    match list_deleted_categories_service(repo.get_ref()) {
        Ok(categories) => HttpResponse::Ok().json(categories),
        Err(err) => error_response(&err),
    }
}

#[get("/api/bilvani/get/{category_id}/delete-subcategory")]
pub async fn list_deleted_subcategories(
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_deleted_subcategories_service(category_id.into_inner(), repo.get_ref()) {
        Ok(subcategories) => HttpResponse::Ok().json(subcategories),
        Err(err) => error_response(&err),
    }
}
