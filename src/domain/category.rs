use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::types::{
    CategoryId, CategoryName, ProvenanceToken, SubcategoryId, SubcategoryName,
};

/// Case-folded form of a subcategory name used for uniqueness checks.
pub fn fold_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Rule violations raised while mutating a [`Category`] document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    #[error("Subcategory not found")]
    SubcategoryNotFound(SubcategoryId),
    #[error("{0}")]
    DuplicateName(&'static str),
    #[error("{0}")]
    InvalidStateTransition(&'static str),
}

/// Subcategory owned by exactly one [`Category`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subcategory {
    pub id: SubcategoryId,
    pub name: SubcategoryName,
    pub is_deleted: bool,
}

/// Category document together with its ordered subcategories.
///
/// The document is the unit of persistence: every mutation is applied here
/// and the whole document is written back, guarded by `version`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub subcategories: Vec<Subcategory>,
    pub is_deleted: bool,
    /// Token of the session that created the category. Audit only.
    pub created_by: ProvenanceToken,
    pub version: i32,
    pub next_subcategory_id: SubcategoryId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub subcategories: Vec<SubcategoryName>,
    pub created_by: ProvenanceToken,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Category {
    pub fn subcategory(&self, id: SubcategoryId) -> Option<&Subcategory> {
        self.subcategories.iter().find(|s| s.id == id)
    }

    fn subcategory_mut(&mut self, id: SubcategoryId) -> Result<&mut Subcategory, TaxonomyError> {
        self.subcategories
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(TaxonomyError::SubcategoryNotFound(id))
    }

    /// Whether a non-deleted subcategory of this category matches `name`
    /// ignoring case.
    pub fn has_active_subcategory_named(&self, name: &str) -> bool {
        let folded = fold_name(name);
        self.subcategories
            .iter()
            .any(|s| !s.is_deleted && fold_name(&s.name) == folded)
    }

    pub fn active_subcategories(&self) -> impl Iterator<Item = &Subcategory> {
        self.subcategories.iter().filter(|s| !s.is_deleted)
    }

    pub fn deleted_subcategories(&self) -> impl Iterator<Item = &Subcategory> {
        self.subcategories.iter().filter(|s| s.is_deleted)
    }

    pub fn rename(&mut self, name: CategoryName) {
        self.name = name;
    }

    /// Appends a new active subcategory and returns its identifier.
    ///
    /// Global uniqueness is checked by the caller against the whole store.
    pub fn add_subcategory(&mut self, name: SubcategoryName) -> SubcategoryId {
        let id = self.next_subcategory_id;
        self.next_subcategory_id = id.next();
        self.subcategories.push(Subcategory {
            id,
            name,
            is_deleted: false,
        });
        id
    }

    /// Renames a subcategory, rejecting names already used by any other
    /// subcategory of this category, deleted ones included.
    pub fn rename_subcategory(
        &mut self,
        id: SubcategoryId,
        name: SubcategoryName,
    ) -> Result<(), TaxonomyError> {
        if self.subcategory(id).is_none() {
            return Err(TaxonomyError::SubcategoryNotFound(id));
        }

        let folded = fold_name(&name);
        if self
            .subcategories
            .iter()
            .any(|s| s.id != id && fold_name(&s.name) == folded)
        {
            return Err(TaxonomyError::DuplicateName(
                "Subcategory name must be unique within the category",
            ));
        }

        self.subcategory_mut(id)?.name = name;
        Ok(())
    }

    pub fn soft_delete(&mut self) -> Result<(), TaxonomyError> {
        if self.is_deleted {
            return Err(TaxonomyError::InvalidStateTransition(
                "Category is already marked as deleted",
            ));
        }
        self.is_deleted = true;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<(), TaxonomyError> {
        if !self.is_deleted {
            return Err(TaxonomyError::InvalidStateTransition(
                "Category is not marked as deleted",
            ));
        }
        self.is_deleted = false;
        Ok(())
    }

    pub fn soft_delete_subcategory(&mut self, id: SubcategoryId) -> Result<(), TaxonomyError> {
        let subcategory = self.subcategory_mut(id)?;
        if subcategory.is_deleted {
            return Err(TaxonomyError::InvalidStateTransition(
                "Subcategory is already marked as deleted",
            ));
        }
        subcategory.is_deleted = true;
        Ok(())
    }

    pub fn restore_subcategory(&mut self, id: SubcategoryId) -> Result<(), TaxonomyError> {
        let subcategory = self.subcategory_mut(id)?;
        if !subcategory.is_deleted {
            return Err(TaxonomyError::InvalidStateTransition(
                "Subcategory is not marked as deleted",
            ));
        }
        subcategory.is_deleted = false;
        Ok(())
    }

    /// Removes a subcategory permanently; the remaining ones keep their order.
    pub fn remove_subcategory(&mut self, id: SubcategoryId) -> Result<Subcategory, TaxonomyError> {
        let index = self
            .subcategories
            .iter()
            .position(|s| s.id == id)
            .ok_or(TaxonomyError::SubcategoryNotFound(id))?;
        Ok(self.subcategories.remove(index))
    }
}
