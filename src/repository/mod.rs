use crate::db::{DbConnection, DbPool};
use crate::domain::admin::{Admin, NewAdmin, NewOtpCode, OtpCode};
use crate::domain::category::{Category, NewCategory};
use crate::domain::service_content::{NewServiceContent, ServiceContent};
use crate::domain::types::{CategoryId, EmailAddress, OtpPurpose, ServiceContentId};

pub mod admin;
pub mod category;
pub mod errors;
pub mod service_content;
#[cfg(test)]
pub mod test;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Page selection for list queries. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Number of rows skipped before this page starts.
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1) * self.per_page
    }
}

/// Query parameters used when listing categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryListQuery {
    /// Filter by tombstone flag; `None` lists every category.
    pub deleted: Option<bool>,
}

impl CategoryListQuery {
    pub fn deleted(mut self, deleted: bool) -> Self {
        self.deleted = Some(deleted);
        self
    }
}

/// Query parameters used when listing or searching service content.
#[derive(Debug, Clone, Default)]
pub struct ServiceContentListQuery {
    /// Filter by tombstone flag; `None` lists both.
    pub deleted: Option<bool>,
    /// Category name, matched ignoring ASCII case.
    pub category: Option<String>,
    /// Subcategory name, matched exactly.
    pub subcategory: Option<String>,
    /// Keep services having a keyword containing any of these, ignoring case.
    pub keywords: Vec<String>,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl ServiceContentListQuery {
    pub fn deleted(mut self, deleted: bool) -> Self {
        self.deleted = Some(deleted);
        self
    }
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
    pub fn subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }
    pub fn keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only operations for category documents.
pub trait CategoryReader {
    /// List categories, ordered by creation, with their subcategories.
    fn list_categories(&self, query: CategoryListQuery) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category document by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
    /// Categories owning at least one subcategory, deleted or not, named
    /// `name`. With `case_insensitive` the comparison uses folded names.
    fn find_categories_with_subcategory_name(
        &self,
        name: &str,
        case_insensitive: bool,
    ) -> RepositoryResult<Vec<Category>>;
}

/// Write operations for category documents.
pub trait CategoryWriter {
    /// Persist a new category and its initial subcategories.
    fn insert_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Persist the whole document atomically.
    ///
    /// Fails with [`RepositoryError::Conflict`] when the stored version no
    /// longer equals `category.version`. Returns the stored document with
    /// its new version.
    fn save_category(&self, category: &Category) -> RepositoryResult<Category>;
    /// Remove a category and all of its subcategories.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
}

/// Read-only operations for service content.
pub trait ServiceContentReader {
    /// List service content matching the query, with the total before paging.
    fn list_service_contents(
        &self,
        query: ServiceContentListQuery,
    ) -> RepositoryResult<(usize, Vec<ServiceContent>)>;
    /// Retrieve service content by its identifier, deleted or not.
    fn get_service_content_by_id(
        &self,
        id: ServiceContentId,
    ) -> RepositoryResult<Option<ServiceContent>>;
}

/// Write operations for service content.
pub trait ServiceContentWriter {
    fn create_service_content(
        &self,
        service: &NewServiceContent,
    ) -> RepositoryResult<ServiceContent>;
    /// Replace every editable field. `None` when the record does not exist.
    fn update_service_content(
        &self,
        id: ServiceContentId,
        service: &NewServiceContent,
    ) -> RepositoryResult<Option<ServiceContent>>;
    /// Set the tombstone flag, returning the number of affected rows.
    fn set_service_content_deleted(
        &self,
        id: ServiceContentId,
        deleted: bool,
    ) -> RepositoryResult<usize>;
    /// Remove the record and its keywords permanently.
    fn delete_service_content(&self, id: ServiceContentId) -> RepositoryResult<usize>;
}

/// Read-only operations for admin accounts.
pub trait AdminReader {
    fn get_admin_by_email(&self, email: &EmailAddress) -> RepositoryResult<Option<Admin>>;
}

/// Write operations for admin accounts.
pub trait AdminWriter {
    fn create_admin(&self, admin: &NewAdmin) -> RepositoryResult<Admin>;
    fn update_admin_password(
        &self,
        email: &EmailAddress,
        password_hash: &str,
    ) -> RepositoryResult<usize>;
}

/// Read-only operations for issued one-time codes.
pub trait OtpReader {
    /// The most recently issued code for the address and purpose.
    fn get_latest_otp(
        &self,
        email: &EmailAddress,
        purpose: OtpPurpose,
    ) -> RepositoryResult<Option<OtpCode>>;
}

/// Write operations for issued one-time codes.
pub trait OtpWriter {
    fn create_otp(&self, otp: &NewOtpCode) -> RepositoryResult<usize>;
    /// Remove every code issued to the address for the purpose.
    fn delete_otps(&self, email: &EmailAddress, purpose: OtpPurpose) -> RepositoryResult<usize>;
}
