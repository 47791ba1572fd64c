use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use regex::Regex;

use crate::assets::{AssetHost, SERVICES_FOLDER, hosted_image_urls, public_id_for};
use crate::domain::service_content::{NewServiceContent, ServiceContent};
use crate::domain::types::ServiceContentId;
use crate::dto::service_contents::{
    ImageInfo, PaginationDto, ServiceContentDto, ServiceSummaryDto, ServiceWithImagesDto,
};
use crate::forms::service_contents::{KeywordSearchPayload, PagePayload, ServiceContentFormPayload};
use crate::repository::{ServiceContentListQuery, ServiceContentReader, ServiceContentWriter};

use super::{ServiceError, ServiceResult};

/// Largest decoded inline image accepted in service content.
pub const MAX_INLINE_IMAGE_BYTES: usize = 5 * 1024 * 1024;

// Other image types are left in the content as they are.
const INLINE_IMAGE_PATTERN: &str = r#"data:image/(jpeg|png|gif);base64,([^"]+)"#;

pub const SERVICE_NOT_FOUND: &str = "Service not found";
const METADATA_FAILED: &str = "Failed to fetch image metadata";

fn service_not_found() -> ServiceError {
    ServiceError::NotFound(SERVICE_NOT_FOUND.to_string())
}

fn parse_service_id(raw: i32) -> ServiceResult<ServiceContentId> {
    ServiceContentId::new(raw).map_err(|_| service_not_found())
}

fn load_service<R>(repo: &R, id: ServiceContentId) -> ServiceResult<ServiceContent>
where
    R: ServiceContentReader,
{
    match repo.get_service_content_by_id(id) {
        Ok(Some(service)) => Ok(service),
        Ok(None) => Err(service_not_found()),
        Err(e) => {
            log::error!("Failed to get service {id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn list<R>(repo: &R, query: ServiceContentListQuery) -> ServiceResult<(usize, Vec<ServiceContent>)>
where
    R: ServiceContentReader,
{
    repo.list_service_contents(query).map_err(|e| {
        log::error!("Failed to list services: {e}");
        ServiceError::Internal
    })
}

/// Upload every inline JPEG, PNG or GIF `data:image/...;base64,` image to the
/// asset host and replace it with the hosted URL.
pub async fn process_inline_images(content: &str, assets: &dyn AssetHost) -> ServiceResult<String> {
    let pattern = Regex::new(INLINE_IMAGE_PATTERN).map_err(|e| {
        log::error!("Invalid inline image pattern: {e}");
        ServiceError::Internal
    })?;

    let mut processed = content.to_string();
    for captures in pattern.captures_iter(content) {
        let image_type = &captures[1];
        let bytes = STANDARD.decode(&captures[2]).map_err(|_| {
            ServiceError::Form("An image in content is not valid base64 data.".to_string())
        })?;
        if bytes.len() > MAX_INLINE_IMAGE_BYTES {
            return Err(ServiceError::Form(
                "An image in content exceeds 5MB. Please use a smaller image.".to_string(),
            ));
        }

        let mime = format!("image/{image_type}");
        let hosted = assets
            .upload(&bytes, &mime, SERVICES_FOLDER)
            .await
            .map_err(|e| {
                log::error!("Failed to upload inline image: {e}");
                ServiceError::Asset("Failed to upload image".to_string())
            })?;

        processed = processed.replacen(&captures[0], &hosted.secure_url, 1);
    }

    Ok(processed)
}

async fn into_new_service(
    payload: ServiceContentFormPayload,
    assets: &dyn AssetHost,
) -> ServiceResult<NewServiceContent> {
    let content = process_inline_images(&payload.content, assets).await?;
    let now = Utc::now().naive_utc();
    Ok(NewServiceContent {
        title: payload.title,
        content,
        category: payload.category,
        subcategory: payload.subcategory,
        seo_keywords: payload.seo_keywords,
        short_description: payload.short_description,
        created_at: now,
        updated_at: now,
    })
}

pub async fn create_service_content<R>(
    payload: ServiceContentFormPayload,
    repo: &R,
    assets: &dyn AssetHost,
) -> ServiceResult<ServiceContentDto>
where
    R: ServiceContentWriter,
{
    let service = into_new_service(payload, assets).await?;

    match repo.create_service_content(&service) {
        Ok(service) => Ok(service.into()),
        Err(e) => {
            log::error!("Failed to create service: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub async fn update_service_content<R>(
    service_id: i32,
    payload: ServiceContentFormPayload,
    repo: &R,
    assets: &dyn AssetHost,
) -> ServiceResult<ServiceContentDto>
where
    R: ServiceContentReader + ServiceContentWriter,
{
    let service_id = parse_service_id(service_id)?;
    load_service(repo, service_id)?;

    let service = into_new_service(payload, assets).await?;

    match repo.update_service_content(service_id, &service) {
        Ok(Some(service)) => Ok(service.into()),
        Ok(None) => Err(service_not_found()),
        Err(e) => {
            log::error!("Failed to update service {service_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn soft_delete_service_content<R>(service_id: i32, repo: &R) -> ServiceResult<()>
where
    R: ServiceContentWriter,
{
    let service_id = parse_service_id(service_id)?;

    match repo.set_service_content_deleted(service_id, true) {
        Ok(0) => Err(service_not_found()),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to soft-delete service {service_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn restore_service_content<R>(service_id: i32, repo: &R) -> ServiceResult<ServiceContentDto>
where
    R: ServiceContentReader + ServiceContentWriter,
{
    let service_id = parse_service_id(service_id)?;

    let service = load_service(repo, service_id)?;
    if !service.is_deleted {
        return Err(ServiceError::InvalidStateTransition(
            "Service is not deleted".to_string(),
        ));
    }

    if let Err(e) = repo.set_service_content_deleted(service_id, false) {
        log::error!("Failed to restore service {service_id}: {e}");
        return Err(ServiceError::Internal);
    }

    Ok(load_service(repo, service_id)?.into())
}

/// Remove the service and every hosted image its content references.
pub async fn permanent_delete_service_content<R>(
    service_id: i32,
    repo: &R,
    assets: &dyn AssetHost,
) -> ServiceResult<()>
where
    R: ServiceContentReader + ServiceContentWriter,
{
    let service_id = parse_service_id(service_id)?;
    let service = load_service(repo, service_id)?;

    for url in hosted_image_urls(&service.content, assets.delivery_base_url()) {
        let public_id = public_id_for(&url);
        if let Err(e) = assets.destroy(&public_id).await {
            log::error!("Failed to destroy hosted image {public_id}: {e}");
            return Err(ServiceError::Asset(
                "Error permanently deleting service".to_string(),
            ));
        }
    }

    match repo.delete_service_content(service_id) {
        Ok(0) => Err(service_not_found()),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to delete service {service_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Every active service together with their count.
pub fn list_service_contents<R>(repo: &R) -> ServiceResult<(usize, Vec<ServiceContentDto>)>
where
    R: ServiceContentReader,
{
    let (total, services) = list(repo, ServiceContentListQuery::default().deleted(false))?;
    Ok((total, services.into_iter().map(Into::into).collect()))
}

pub fn list_deleted_service_contents<R>(
    page: PagePayload,
    repo: &R,
) -> ServiceResult<(Vec<ServiceContentDto>, PaginationDto)>
where
    R: ServiceContentReader,
{
    let query = ServiceContentListQuery::default()
        .deleted(true)
        .paginate(page.page, page.limit);
    let (total, services) = list(repo, query)?;

    Ok((
        services.into_iter().map(Into::into).collect(),
        PaginationDto::new(total, page.page, page.limit),
    ))
}

pub fn get_service_content<R>(service_id: i32, repo: &R) -> ServiceResult<ServiceSummaryDto>
where
    R: ServiceContentReader,
{
    let service = load_service(repo, parse_service_id(service_id)?)?;
    if service.is_deleted {
        return Err(service_not_found());
    }
    Ok(service.into())
}

async fn describe_images(content: &str, assets: &dyn AssetHost) -> Vec<ImageInfo> {
    let mut images = vec![];
    for url in hosted_image_urls(content, assets.delivery_base_url()) {
        let public_id = public_id_for(&url);
        let info = match assets.describe(&public_id).await {
            Ok(metadata) => ImageInfo::Found {
                url: metadata.secure_url,
                public_id: metadata.public_id,
                format: metadata.format,
                width: metadata.width,
                height: metadata.height,
            },
            Err(e) => {
                log::error!("Failed to fetch hosted image {public_id}: {e}");
                ImageInfo::Failed {
                    url,
                    error: METADATA_FAILED.to_string(),
                }
            }
        };
        images.push(info);
    }
    images
}

async fn with_images(
    services: Vec<ServiceContent>,
    assets: &dyn AssetHost,
) -> Vec<ServiceWithImagesDto> {
    let mut enriched = Vec::with_capacity(services.len());
    for service in services {
        let images = describe_images(&service.content, assets).await;
        enriched.push(ServiceWithImagesDto {
            service: service.into(),
            images,
        });
    }
    enriched
}

/// Active services of a category, matched ignoring case, with image metadata.
pub async fn list_by_category<R>(
    category: &str,
    repo: &R,
    assets: &dyn AssetHost,
) -> ServiceResult<Vec<ServiceWithImagesDto>>
where
    R: ServiceContentReader,
{
    let category = category.trim();
    if category.is_empty() {
        return Err(ServiceError::Form("Invalid category name".to_string()));
    }

    let query = ServiceContentListQuery::default()
        .deleted(false)
        .category(category);
    let (_total, services) = list(repo, query)?;
    if services.is_empty() {
        return Err(ServiceError::NotFound(
            "No services found for this category".to_string(),
        ));
    }

    Ok(with_images(services, assets).await)
}

/// Active services of a subcategory, matched exactly, with image metadata.
pub async fn list_by_subcategory<R>(
    subcategory: &str,
    repo: &R,
    assets: &dyn AssetHost,
) -> ServiceResult<Vec<ServiceWithImagesDto>>
where
    R: ServiceContentReader,
{
    let subcategory = subcategory.trim();
    if subcategory.is_empty() {
        return Err(ServiceError::Form("Invalid subcategory".to_string()));
    }

    let query = ServiceContentListQuery::default()
        .deleted(false)
        .subcategory(subcategory);
    let (_total, services) = list(repo, query)?;
    if services.is_empty() {
        return Err(ServiceError::NotFound(
            "No services found for this subcategory".to_string(),
        ));
    }

    Ok(with_images(services, assets).await)
}

pub fn search_by_keywords<R>(
    payload: KeywordSearchPayload,
    repo: &R,
) -> ServiceResult<(Vec<ServiceContentDto>, PaginationDto)>
where
    R: ServiceContentReader,
{
    let page = payload.page;
    let query = ServiceContentListQuery::default()
        .deleted(false)
        .keywords(payload.keywords)
        .paginate(page.page, page.limit);
    let (total, services) = list(repo, query)?;

    Ok((
        services.into_iter().map(Into::into).collect(),
        PaginationDto::new(total, page.page, page.limit),
    ))
}
