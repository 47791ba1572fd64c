use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::category::{Category, NewCategory, fold_name};
use crate::domain::types::CategoryId;
use crate::models::category::{
    Category as DbCategory, NewCategory as DbNewCategory, Subcategory as DbSubcategory,
};
use crate::repository::{
    CategoryListQuery, CategoryReader, CategoryWriter, DieselRepository, RepositoryError,
    RepositoryResult,
};

/// Attach subcategories to category rows, preserving the order of `rows`.
fn assemble(conn: &mut SqliteConnection, rows: Vec<DbCategory>) -> RepositoryResult<Vec<Category>> {
    use crate::schema::subcategories;

    if rows.is_empty() {
        return Ok(vec![]);
    }

    let ids: Vec<i32> = rows.iter().map(|c| c.id).collect();
    let mut grouped: HashMap<i32, Vec<DbSubcategory>> = HashMap::new();
    for row in subcategories::table
        .filter(subcategories::category_id.eq_any(ids))
        .order((
            subcategories::category_id.asc(),
            subcategories::position.asc(),
        ))
        .load::<DbSubcategory>(conn)?
    {
        grouped.entry(row.category_id).or_default().push(row);
    }

    rows.into_iter()
        .map(|row| {
            let subcategories = grouped.remove(&row.id).unwrap_or_default();
            Ok(row.into_domain(subcategories)?)
        })
        .collect()
}

fn load_category(conn: &mut SqliteConnection, id: i32) -> RepositoryResult<Option<Category>> {
    use crate::schema::categories;

    let row = categories::table
        .find(id)
        .first::<DbCategory>(conn)
        .optional()?;

    match row {
        Some(row) => Ok(assemble(conn, vec![row])?.pop()),
        None => Ok(None),
    }
}

fn insert_subcategories(
    conn: &mut SqliteConnection,
    rows: &[DbSubcategory],
) -> RepositoryResult<usize> {
    use crate::schema::subcategories;

    if rows.is_empty() {
        return Ok(0);
    }
    Ok(diesel::insert_into(subcategories::table)
        .values(rows)
        .execute(conn)?)
}

impl CategoryReader for DieselRepository {
    fn list_categories(&self, query: CategoryListQuery) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let mut items = categories::table.into_boxed::<Sqlite>();
        if let Some(deleted) = query.deleted {
            items = items.filter(categories::is_deleted.eq(deleted));
        }

        let rows = items
            .order(categories::id.asc())
            .load::<DbCategory>(&mut conn)?;

        assemble(&mut conn, rows)
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        let mut conn = self.conn()?;
        load_category(&mut conn, id.get())
    }

    fn find_categories_with_subcategory_name(
        &self,
        name: &str,
        case_insensitive: bool,
    ) -> RepositoryResult<Vec<Category>> {
        use crate::schema::{categories, subcategories};

        let mut conn = self.conn()?;

        let mut matching = subcategories::table
            .select(subcategories::category_id)
            .distinct()
            .into_boxed::<Sqlite>();
        matching = if case_insensitive {
            matching.filter(subcategories::name_folded.eq(fold_name(name)))
        } else {
            matching.filter(subcategories::name.eq(name.to_string()))
        };
        let ids: Vec<i32> = matching.load(&mut conn)?;

        let rows = categories::table
            .filter(categories::id.eq_any(ids))
            .order(categories::id.asc())
            .load::<DbCategory>(&mut conn)?;

        assemble(&mut conn, rows)
    }
}

impl CategoryWriter for DieselRepository {
    fn insert_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let row: DbCategory = diesel::insert_into(categories::table)
                .values(DbNewCategory::from(category))
                .get_result(conn)?;

            let subcategories: Vec<DbSubcategory> = category
                .subcategories
                .iter()
                .enumerate()
                .map(|(position, name)| DbSubcategory {
                    category_id: row.id,
                    id: position as i32 + 1,
                    name: name.as_str().to_string(),
                    name_folded: fold_name(name),
                    is_deleted: false,
                    position: position as i32,
                })
                .collect();
            insert_subcategories(conn, &subcategories)?;

            Ok(row.into_domain(subcategories)?)
        })
    }

    fn save_category(&self, category: &Category) -> RepositoryResult<Category> {
        use crate::schema::{categories, subcategories};

        let mut conn = self.conn()?;
        let id = category.id.get();

        conn.immediate_transaction(|conn| {
            let affected = diesel::update(
                categories::table
                    .filter(categories::id.eq(id))
                    .filter(categories::version.eq(category.version)),
            )
            .set((
                categories::name.eq(category.name.as_str()),
                categories::is_deleted.eq(category.is_deleted),
                categories::version.eq(category.version + 1),
                categories::next_subcategory_id.eq(category.next_subcategory_id.get()),
                categories::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;

            if affected == 0 {
                return Err(RepositoryError::Conflict);
            }

            diesel::delete(subcategories::table.filter(subcategories::category_id.eq(id)))
                .execute(conn)?;

            let rows: Vec<DbSubcategory> = category
                .subcategories
                .iter()
                .enumerate()
                .map(|(position, subcategory)| DbSubcategory::from_domain(id, position, subcategory))
                .collect();
            insert_subcategories(conn, &rows)?;

            load_category(conn, id)?.ok_or(RepositoryError::Conflict)
        })
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::{categories, subcategories};

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let Some(existing) = load_category(conn, id.get())? else {
                return Ok(None);
            };

            diesel::delete(subcategories::table.filter(subcategories::category_id.eq(id.get())))
                .execute(conn)?;
            diesel::delete(categories::table.find(id.get())).execute(conn)?;

            Ok(Some(existing))
        })
    }
}
