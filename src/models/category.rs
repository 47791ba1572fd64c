use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::{
    Category as DomainCategory, NewCategory as DomainNewCategory,
    Subcategory as DomainSubcategory, fold_name,
};
use crate::domain::types::{
    CategoryName, ProvenanceToken, SubcategoryId, SubcategoryName, TypeConstraintError,
};

/// Diesel model representing the `categories` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::categories)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub created_by: String,
    pub is_deleted: bool,
    pub version: i32,
    pub next_subcategory_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Category`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory {
    pub name: String,
    pub created_by: String,
    pub is_deleted: bool,
    pub version: i32,
    pub next_subcategory_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Diesel model representing the `subcategories` table.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::subcategories)]
pub struct Subcategory {
    pub category_id: i32,
    pub id: i32,
    pub name: String,
    pub name_folded: String,
    pub is_deleted: bool,
    pub position: i32,
}

impl Subcategory {
    /// Row for the subcategory at `position` within category `category_id`.
    pub fn from_domain(category_id: i32, position: usize, subcategory: &DomainSubcategory) -> Self {
        Self {
            category_id,
            id: subcategory.id.get(),
            name: subcategory.name.as_str().to_string(),
            name_folded: fold_name(&subcategory.name),
            is_deleted: subcategory.is_deleted,
            position: position as i32,
        }
    }
}

impl TryFrom<Subcategory> for DomainSubcategory {
    type Error = TypeConstraintError;

    fn try_from(subcategory: Subcategory) -> Result<Self, Self::Error> {
        Ok(Self {
            id: subcategory.id.try_into()?,
            name: SubcategoryName::new(subcategory.name)?,
            is_deleted: subcategory.is_deleted,
        })
    }
}

impl Category {
    /// Assemble the domain document from the category row and its
    /// subcategory rows, already sorted by position.
    pub fn into_domain(
        self,
        subcategories: Vec<Subcategory>,
    ) -> Result<DomainCategory, TypeConstraintError> {
        Ok(DomainCategory {
            id: self.id.try_into()?,
            name: CategoryName::new(self.name)?,
            subcategories: subcategories
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<Vec<_>, _>>()?,
            is_deleted: self.is_deleted,
            created_by: ProvenanceToken::new(self.created_by)?,
            version: self.version,
            next_subcategory_id: SubcategoryId::new(self.next_subcategory_id)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<&DomainNewCategory> for NewCategory {
    fn from(category: &DomainNewCategory) -> Self {
        Self {
            name: category.name.as_str().to_string(),
            created_by: category.created_by.as_str().to_string(),
            is_deleted: false,
            version: 1,
            next_subcategory_id: category.subcategories.len() as i32 + 1,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}
