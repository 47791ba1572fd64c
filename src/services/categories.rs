use std::collections::HashSet;

use crate::domain::category::{Category, fold_name};
use crate::domain::types::{CategoryId, ProvenanceToken, SubcategoryId, SubcategoryName};
use crate::dto::categories::{CategoryDto, SubcategoryDto};
use crate::forms::categories::{
    CreateCategoryFormPayload, RenameCategoryFormPayload, SubcategoryFormPayload,
};
use crate::repository::{CategoryListQuery, CategoryReader, CategoryWriter, RepositoryError};

use super::{ServiceError, ServiceResult};

/// Attempts of one read-modify-write before giving up on a contended category.
const MAX_SAVE_ATTEMPTS: usize = 3;

pub const CATEGORY_NOT_FOUND: &str = "Category not found";
pub const SUBCATEGORY_NOT_FOUND: &str = "Subcategory not found";
const DUPLICATE_GLOBAL_NAME: &str = "Subcategory with this name already exists globally";
const DUPLICATE_IN_REQUEST: &str = "Subcategory names must be unique";

fn category_not_found() -> ServiceError {
    ServiceError::NotFound(CATEGORY_NOT_FOUND.to_string())
}

fn parse_category_id(raw: i32) -> ServiceResult<CategoryId> {
    CategoryId::new(raw).map_err(|_| category_not_found())
}

fn parse_subcategory_id(raw: i32) -> ServiceResult<SubcategoryId> {
    SubcategoryId::new(raw).map_err(|_| ServiceError::NotFound(SUBCATEGORY_NOT_FOUND.to_string()))
}

fn load_category<R>(repo: &R, id: CategoryId) -> ServiceResult<Category>
where
    R: CategoryReader,
{
    match repo.get_category_by_id(id) {
        Ok(Some(category)) => Ok(category),
        Ok(None) => Err(category_not_found()),
        Err(e) => {
            log::error!("Failed to get category {id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Read the category, apply `mutate` and save it, starting over when another
/// writer saved the category in between.
fn modify_category<R, F>(repo: &R, id: CategoryId, mut mutate: F) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter,
    F: FnMut(&mut Category) -> ServiceResult<()>,
{
    for attempt in 1..=MAX_SAVE_ATTEMPTS {
        let mut category = load_category(repo, id)?;
        mutate(&mut category)?;

        match repo.save_category(&category) {
            Ok(saved) => return Ok(saved),
            Err(RepositoryError::Conflict) => {
                log::warn!("Category {id} was modified concurrently (attempt {attempt})");
            }
            Err(e) => {
                log::error!("Failed to save category {id}: {e}");
                return Err(ServiceError::Internal);
            }
        }
    }

    log::error!("Giving up on category {id} after {MAX_SAVE_ATTEMPTS} conflicting saves");
    Err(ServiceError::Conflict)
}

/// Rejects `name` when an active subcategory anywhere in the store already
/// uses it, ignoring case.
fn ensure_globally_unique<R>(repo: &R, name: &SubcategoryName) -> ServiceResult<()>
where
    R: CategoryReader,
{
    let owners = repo
        .find_categories_with_subcategory_name(name.as_str(), true)
        .map_err(|e| {
            log::error!("Failed to look up subcategory name {name}: {e}");
            ServiceError::Internal
        })?;

    if owners.iter().any(|c| c.has_active_subcategory_named(name)) {
        return Err(ServiceError::DuplicateName(DUPLICATE_GLOBAL_NAME.to_string()));
    }
    Ok(())
}

pub fn create_category<R>(
    payload: CreateCategoryFormPayload,
    token: Option<&str>,
    repo: &R,
) -> ServiceResult<CategoryDto>
where
    R: CategoryReader + CategoryWriter,
{
    let created_by = token
        .and_then(|t| ProvenanceToken::new(t).ok())
        .ok_or(ServiceError::MissingToken)?;

    let mut requested = HashSet::new();
    for name in &payload.subcategories {
        if !requested.insert(fold_name(name.as_str())) {
            return Err(ServiceError::DuplicateName(DUPLICATE_IN_REQUEST.to_string()));
        }
        ensure_globally_unique(repo, name)?;
    }

    let category = payload.into_new_category(created_by);
    match repo.insert_category(&category) {
        Ok(category) => Ok(category.into()),
        Err(e) => {
            log::error!("Failed to create category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn add_subcategory<R>(
    category_id: i32,
    payload: SubcategoryFormPayload,
    repo: &R,
) -> ServiceResult<CategoryDto>
where
    R: CategoryReader + CategoryWriter,
{
    let category_id = parse_category_id(category_id)?;

    let category = modify_category(repo, category_id, |category| {
        ensure_globally_unique(repo, &payload.name)?;
        category.add_subcategory(payload.name.clone());
        Ok(())
    })?;

    Ok(category.into())
}

pub fn rename_category<R>(
    category_id: i32,
    payload: RenameCategoryFormPayload,
    repo: &R,
) -> ServiceResult<CategoryDto>
where
    R: CategoryReader + CategoryWriter,
{
    let category_id = parse_category_id(category_id)?;

    let category = modify_category(repo, category_id, |category| {
        category.rename(payload.name.clone());
        Ok(())
    })?;

    Ok(category.into())
}

pub fn rename_subcategory<R>(
    category_id: i32,
    subcategory_id: i32,
    payload: SubcategoryFormPayload,
    repo: &R,
) -> ServiceResult<()>
where
    R: CategoryReader + CategoryWriter,
{
    let category_id = parse_category_id(category_id)?;
    let subcategory_id = parse_subcategory_id(subcategory_id)?;

    modify_category(repo, category_id, |category| {
        Ok(category.rename_subcategory(subcategory_id, payload.name.clone())?)
    })?;

    Ok(())
}

pub fn soft_delete_category<R>(category_id: i32, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader + CategoryWriter,
{
    let category_id = parse_category_id(category_id)?;
    modify_category(repo, category_id, |category| Ok(category.soft_delete()?))?;
    Ok(())
}

pub fn restore_category<R>(category_id: i32, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader + CategoryWriter,
{
    let category_id = parse_category_id(category_id)?;
    modify_category(repo, category_id, |category| Ok(category.restore()?))?;
    Ok(())
}

pub fn soft_delete_subcategory<R>(
    category_id: i32,
    subcategory_id: i32,
    repo: &R,
) -> ServiceResult<CategoryDto>
where
    R: CategoryReader + CategoryWriter,
{
    let category_id = parse_category_id(category_id)?;
    let subcategory_id = parse_subcategory_id(subcategory_id)?;

    let category = modify_category(repo, category_id, |category| {
        Ok(category.soft_delete_subcategory(subcategory_id)?)
    })?;

    Ok(category.into())
}

pub fn restore_subcategory<R>(
    category_id: i32,
    subcategory_id: i32,
    repo: &R,
) -> ServiceResult<CategoryDto>
where
    R: CategoryReader + CategoryWriter,
{
    let category_id = parse_category_id(category_id)?;
    let subcategory_id = parse_subcategory_id(subcategory_id)?;

    let category = modify_category(repo, category_id, |category| {
        Ok(category.restore_subcategory(subcategory_id)?)
    })?;

    Ok(category.into())
}

pub fn hard_delete_category<R>(category_id: i32, repo: &R) -> ServiceResult<()>
where
    R: CategoryWriter,
{
    let category_id = parse_category_id(category_id)?;

    match repo.delete_category(category_id) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(category_not_found()),
        Err(e) => {
            log::error!("Failed to delete category {category_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn hard_delete_subcategory<R>(
    category_id: i32,
    subcategory_id: i32,
    repo: &R,
) -> ServiceResult<()>
where
    R: CategoryReader + CategoryWriter,
{
    let category_id = parse_category_id(category_id)?;
    let subcategory_id = parse_subcategory_id(subcategory_id)?;

    modify_category(repo, category_id, |category| {
        category.remove_subcategory(subcategory_id)?;
        Ok(())
    })?;

    Ok(())
}

fn list_categories<R>(repo: &R, deleted: bool) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader,
{
    repo.list_categories(CategoryListQuery::default().deleted(deleted))
        .map_err(|e| {
            log::error!("Failed to list categories: {e}");
            ServiceError::Internal
        })
}

pub fn list_active_categories<R>(repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    Ok(list_categories(repo, false)?
        .into_iter()
        .map(CategoryDto::from)
        .collect())
}

pub fn list_deleted_categories<R>(repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    Ok(list_categories(repo, true)?
        .into_iter()
        .map(CategoryDto::from)
        .collect())
}

/// Active subcategories of every active category, in category order.
pub fn list_all_active_subcategories<R>(repo: &R) -> ServiceResult<Vec<SubcategoryDto>>
where
    R: CategoryReader,
{
    Ok(list_categories(repo, false)?
        .iter()
        .flat_map(|c| c.active_subcategories().map(|s| SubcategoryDto::new(c.id, s)))
        .collect())
}

pub fn list_active_subcategories<R>(
    category_id: i32,
    repo: &R,
) -> ServiceResult<Vec<SubcategoryDto>>
where
    R: CategoryReader,
{
    let category = load_category(repo, parse_category_id(category_id)?)?;
    Ok(category
        .active_subcategories()
        .map(|s| SubcategoryDto::new(category.id, s))
        .collect())
}

pub fn list_deleted_subcategories<R>(
    category_id: i32,
    repo: &R,
) -> ServiceResult<Vec<SubcategoryDto>>
where
    R: CategoryReader,
{
    let category = load_category(repo, parse_category_id(category_id)?)?;
    Ok(category
        .deleted_subcategories()
        .map(|s| SubcategoryDto::new(category.id, s))
        .collect())
}
