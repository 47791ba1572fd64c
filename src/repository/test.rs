use std::sync::Mutex;

use chrono::Utc;

use crate::domain::admin::{Admin, NewAdmin, NewOtpCode, OtpCode};
use crate::domain::category::{Category, NewCategory, Subcategory, fold_name};
use crate::domain::service_content::{NewServiceContent, ServiceContent};
use crate::domain::types::{
    AdminId, CategoryId, EmailAddress, OtpId, OtpPurpose, ServiceContentId, SubcategoryId,
};
use crate::repository::{
    AdminReader, AdminWriter, CategoryListQuery, CategoryReader, CategoryWriter, OtpReader,
    OtpWriter, RepositoryError, RepositoryResult, ServiceContentListQuery, ServiceContentReader,
    ServiceContentWriter,
};

#[derive(Default)]
struct State {
    categories: Vec<Category>,
    services: Vec<ServiceContent>,
    admins: Vec<Admin>,
    otps: Vec<OtpCode>,
    next_id: i32,
    /// Saves that will observe a concurrent writer before applying.
    interfering_saves: usize,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Simple in-memory repository used for unit tests.
#[derive(Default)]
pub struct TestRepository {
    state: Mutex<State>,
}

impl TestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_services(services: Vec<ServiceContent>) -> Self {
        let repo = Self::default();
        {
            let mut state = repo.lock();
            state.next_id = services.iter().map(|s| s.id.get()).max().unwrap_or(0);
            state.services = services;
        }
        repo
    }

    /// Make the next `count` saves race with another writer, so they fail
    /// with [`RepositoryError::Conflict`].
    pub fn interfere_with_next_saves(&self, count: usize) {
        self.lock().interfering_saves = count;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

impl CategoryReader for TestRepository {
    fn list_categories(&self, query: CategoryListQuery) -> RepositoryResult<Vec<Category>> {
        let mut items = self.lock().categories.clone();
        if let Some(deleted) = query.deleted {
            items.retain(|c| c.is_deleted == deleted);
        }
        Ok(items)
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        Ok(self.lock().categories.iter().find(|c| c.id == id).cloned())
    }

    fn find_categories_with_subcategory_name(
        &self,
        name: &str,
        case_insensitive: bool,
    ) -> RepositoryResult<Vec<Category>> {
        let folded = fold_name(name);
        let matches = |s: &Subcategory| {
            if case_insensitive {
                fold_name(&s.name) == folded
            } else {
                s.name.as_str() == name
            }
        };
        Ok(self
            .lock()
            .categories
            .iter()
            .filter(|c| c.subcategories.iter().any(matches))
            .cloned()
            .collect())
    }
}

impl CategoryWriter for TestRepository {
    fn insert_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        let mut state = self.lock();
        let id = CategoryId::new(state.next_id())?;
        let subcategories = category
            .subcategories
            .iter()
            .enumerate()
            .map(|(position, name)| {
                Ok(Subcategory {
                    id: SubcategoryId::new(position as i32 + 1)?,
                    name: name.clone(),
                    is_deleted: false,
                })
            })
            .collect::<RepositoryResult<Vec<_>>>()?;
        let stored = Category {
            id,
            name: category.name.clone(),
            next_subcategory_id: SubcategoryId::new(subcategories.len() as i32 + 1)?,
            subcategories,
            is_deleted: false,
            created_by: category.created_by.clone(),
            version: 1,
            created_at: category.created_at,
            updated_at: category.updated_at,
        };
        state.categories.push(stored.clone());
        Ok(stored)
    }

    fn save_category(&self, category: &Category) -> RepositoryResult<Category> {
        let mut state = self.lock();
        let interfering = state.interfering_saves > 0;
        if interfering {
            state.interfering_saves -= 1;
        }

        let Some(stored) = state.categories.iter_mut().find(|c| c.id == category.id) else {
            return Err(RepositoryError::Conflict);
        };
        if interfering {
            stored.version += 1;
        }
        if stored.version != category.version {
            return Err(RepositoryError::Conflict);
        }

        *stored = Category {
            version: category.version + 1,
            updated_at: Utc::now().naive_utc(),
            ..category.clone()
        };
        Ok(stored.clone())
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        let mut state = self.lock();
        let position = state.categories.iter().position(|c| c.id == id);
        Ok(position.map(|index| state.categories.remove(index)))
    }
}

impl ServiceContentReader for TestRepository {
    fn list_service_contents(
        &self,
        query: ServiceContentListQuery,
    ) -> RepositoryResult<(usize, Vec<ServiceContent>)> {
        let mut items = self.lock().services.clone();
        if let Some(deleted) = query.deleted {
            items.retain(|s| s.is_deleted == deleted);
        }
        if let Some(category) = &query.category {
            let folded = fold_name(category);
            items.retain(|s| fold_name(s.category.as_str()) == folded);
        }
        if let Some(subcategory) = &query.subcategory {
            items.retain(|s| s.subcategory.as_ref().is_some_and(|v| v.as_str() == subcategory));
        }
        if !query.keywords.is_empty() {
            let needles: Vec<String> = query.keywords.iter().map(|k| fold_name(k)).collect();
            items.retain(|s| {
                s.seo_keywords.iter().any(|keyword| {
                    let keyword = fold_name(keyword.as_str());
                    needles.iter().any(|needle| keyword.contains(needle.as_str()))
                })
            });
        }
        let total = items.len();
        if let Some(pagination) = query.pagination {
            items = items
                .into_iter()
                .skip(pagination.offset())
                .take(pagination.per_page)
                .collect();
        }
        Ok((total, items))
    }

    fn get_service_content_by_id(
        &self,
        id: ServiceContentId,
    ) -> RepositoryResult<Option<ServiceContent>> {
        Ok(self.lock().services.iter().find(|s| s.id == id).cloned())
    }
}

impl ServiceContentWriter for TestRepository {
    fn create_service_content(
        &self,
        service: &NewServiceContent,
    ) -> RepositoryResult<ServiceContent> {
        let mut state = self.lock();
        let stored = ServiceContent {
            id: ServiceContentId::new(state.next_id())?,
            title: service.title.clone(),
            content: service.content.clone(),
            category: service.category.clone(),
            subcategory: service.subcategory.clone(),
            seo_keywords: service.seo_keywords.clone(),
            short_description: service.short_description.clone(),
            is_deleted: false,
            created_at: service.created_at,
            updated_at: service.updated_at,
        };
        state.services.push(stored.clone());
        Ok(stored)
    }

    fn update_service_content(
        &self,
        id: ServiceContentId,
        service: &NewServiceContent,
    ) -> RepositoryResult<Option<ServiceContent>> {
        let mut state = self.lock();
        let Some(stored) = state.services.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        stored.title = service.title.clone();
        stored.content = service.content.clone();
        stored.category = service.category.clone();
        stored.subcategory = service.subcategory.clone();
        stored.seo_keywords = service.seo_keywords.clone();
        stored.short_description = service.short_description.clone();
        stored.updated_at = service.updated_at;
        Ok(Some(stored.clone()))
    }

    fn set_service_content_deleted(
        &self,
        id: ServiceContentId,
        deleted: bool,
    ) -> RepositoryResult<usize> {
        let mut state = self.lock();
        match state.services.iter_mut().find(|s| s.id == id) {
            Some(stored) => {
                stored.is_deleted = deleted;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_service_content(&self, id: ServiceContentId) -> RepositoryResult<usize> {
        let mut state = self.lock();
        let before = state.services.len();
        state.services.retain(|s| s.id != id);
        Ok(before - state.services.len())
    }
}

impl AdminReader for TestRepository {
    fn get_admin_by_email(&self, email: &EmailAddress) -> RepositoryResult<Option<Admin>> {
        Ok(self.lock().admins.iter().find(|a| a.email == *email).cloned())
    }
}

impl AdminWriter for TestRepository {
    fn create_admin(&self, admin: &NewAdmin) -> RepositoryResult<Admin> {
        let mut state = self.lock();
        let stored = Admin {
            id: AdminId::new(state.next_id())?,
            email: admin.email.clone(),
            password_hash: admin.password_hash.clone(),
            created_at: admin.created_at,
        };
        state.admins.push(stored.clone());
        Ok(stored)
    }

    fn update_admin_password(
        &self,
        email: &EmailAddress,
        password_hash: &str,
    ) -> RepositoryResult<usize> {
        let mut state = self.lock();
        match state.admins.iter_mut().find(|a| a.email == *email) {
            Some(admin) => {
                admin.password_hash = password_hash.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

impl OtpReader for TestRepository {
    fn get_latest_otp(
        &self,
        email: &EmailAddress,
        purpose: OtpPurpose,
    ) -> RepositoryResult<Option<OtpCode>> {
        Ok(self
            .lock()
            .otps
            .iter()
            .rev()
            .find(|o| o.email == *email && o.purpose == purpose)
            .cloned())
    }
}

impl OtpWriter for TestRepository {
    fn create_otp(&self, otp: &NewOtpCode) -> RepositoryResult<usize> {
        let mut state = self.lock();
        let stored = OtpCode {
            id: OtpId::new(state.next_id())?,
            email: otp.email.clone(),
            purpose: otp.purpose,
            code: otp.code.clone(),
            password_hash: otp.password_hash.clone(),
            expires_at: otp.expires_at,
            created_at: otp.created_at,
        };
        state.otps.push(stored);
        Ok(1)
    }

    fn delete_otps(&self, email: &EmailAddress, purpose: OtpPurpose) -> RepositoryResult<usize> {
        let mut state = self.lock();
        let before = state.otps.len();
        state
            .otps
            .retain(|o| !(o.email == *email && o.purpose == purpose));
        Ok(before - state.otps.len())
    }
}
