use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::category::fold_name;
use crate::domain::service_content::{NewServiceContent, ServiceContent};
use crate::domain::types::ServiceContentId;
use crate::models::service_content::{
    NewServiceContent as DbNewServiceContent, ServiceContent as DbServiceContent,
    ServiceContentChanges, ServiceContentKeyword, keyword_rows,
};
use crate::repository::{
    DieselRepository, RepositoryResult, ServiceContentListQuery, ServiceContentReader,
    ServiceContentWriter,
};

/// Escape `LIKE` wildcards so `value` matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn attach_keywords(
    conn: &mut SqliteConnection,
    rows: Vec<DbServiceContent>,
) -> RepositoryResult<Vec<ServiceContent>> {
    use crate::schema::service_content_keywords;

    if rows.is_empty() {
        return Ok(vec![]);
    }

    let ids: Vec<i32> = rows.iter().map(|s| s.id).collect();
    let mut grouped: HashMap<i32, Vec<ServiceContentKeyword>> = HashMap::new();
    for keyword in service_content_keywords::table
        .filter(service_content_keywords::service_content_id.eq_any(ids))
        .order((
            service_content_keywords::service_content_id.asc(),
            service_content_keywords::position.asc(),
        ))
        .load::<ServiceContentKeyword>(conn)?
    {
        grouped
            .entry(keyword.service_content_id)
            .or_default()
            .push(keyword);
    }

    rows.into_iter()
        .map(|row| {
            let keywords = grouped.remove(&row.id).unwrap_or_default();
            Ok(row.into_domain(keywords)?)
        })
        .collect()
}

fn load_service_content(
    conn: &mut SqliteConnection,
    id: i32,
) -> RepositoryResult<Option<ServiceContent>> {
    use crate::schema::service_contents;

    let row = service_contents::table
        .find(id)
        .first::<DbServiceContent>(conn)
        .optional()?;

    match row {
        Some(row) => Ok(attach_keywords(conn, vec![row])?.pop()),
        None => Ok(None),
    }
}

fn replace_keywords(
    conn: &mut SqliteConnection,
    id: i32,
    service: &NewServiceContent,
) -> RepositoryResult<()> {
    use crate::schema::service_content_keywords;

    diesel::delete(
        service_content_keywords::table
            .filter(service_content_keywords::service_content_id.eq(id)),
    )
    .execute(conn)?;

    let rows = keyword_rows(id, &service.seo_keywords);
    if !rows.is_empty() {
        diesel::insert_into(service_content_keywords::table)
            .values(&rows)
            .execute(conn)?;
    }
    Ok(())
}

impl ServiceContentReader for DieselRepository {
    fn list_service_contents(
        &self,
        query: ServiceContentListQuery,
    ) -> RepositoryResult<(usize, Vec<ServiceContent>)> {
        use crate::schema::{service_content_keywords, service_contents};

        let mut conn = self.conn()?;

        let keyword_matches: Option<Vec<i32>> = if query.keywords.is_empty() {
            None
        } else {
            let mut matching = service_content_keywords::table
                .select(service_content_keywords::service_content_id)
                .distinct()
                .into_boxed::<Sqlite>();
            for keyword in &query.keywords {
                matching = matching.or_filter(
                    service_content_keywords::keyword_folded
                        .like(format!("%{}%", escape_like(&fold_name(keyword))))
                        .escape('\\'),
                );
            }
            Some(matching.load(&mut conn)?)
        };

        let query_builder = || {
            let mut items = service_contents::table.into_boxed::<Sqlite>();

            if let Some(deleted) = query.deleted {
                items = items.filter(service_contents::is_deleted.eq(deleted));
            }

            if let Some(category) = &query.category {
                items = items.filter(service_contents::category_folded.eq(fold_name(category)));
            }

            if let Some(subcategory) = &query.subcategory {
                items = items.filter(service_contents::subcategory.eq(subcategory.clone()));
            }

            if let Some(ids) = &keyword_matches {
                items = items.filter(service_contents::id.eq_any(ids.clone()));
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();

        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset() as i64)
                .limit(pagination.per_page as i64);
        }

        let rows = items
            .order(service_contents::id.asc())
            .load::<DbServiceContent>(&mut conn)?;

        Ok((total, attach_keywords(&mut conn, rows)?))
    }

    fn get_service_content_by_id(
        &self,
        id: ServiceContentId,
    ) -> RepositoryResult<Option<ServiceContent>> {
        let mut conn = self.conn()?;
        load_service_content(&mut conn, id.get())
    }
}

impl ServiceContentWriter for DieselRepository {
    fn create_service_content(
        &self,
        service: &NewServiceContent,
    ) -> RepositoryResult<ServiceContent> {
        use crate::schema::service_contents;

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let row: DbServiceContent = diesel::insert_into(service_contents::table)
                .values(DbNewServiceContent::from(service))
                .get_result(conn)?;

            let id = row.id;
            replace_keywords(conn, id, service)?;

            Ok(row.into_domain(keyword_rows(id, &service.seo_keywords))?)
        })
    }

    fn update_service_content(
        &self,
        id: ServiceContentId,
        service: &NewServiceContent,
    ) -> RepositoryResult<Option<ServiceContent>> {
        use crate::schema::service_contents;

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let affected = diesel::update(service_contents::table.find(id.get()))
                .set(ServiceContentChanges::from(service))
                .execute(conn)?;
            if affected == 0 {
                return Ok(None);
            }

            replace_keywords(conn, id.get(), service)?;

            load_service_content(conn, id.get())
        })
    }

    fn set_service_content_deleted(
        &self,
        id: ServiceContentId,
        deleted: bool,
    ) -> RepositoryResult<usize> {
        use crate::schema::service_contents;

        let mut conn = self.conn()?;

        let affected = diesel::update(service_contents::table.find(id.get()))
            .set((
                service_contents::is_deleted.eq(deleted),
                service_contents::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_service_content(&self, id: ServiceContentId) -> RepositoryResult<usize> {
        use crate::schema::{service_content_keywords, service_contents};

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            diesel::delete(
                service_content_keywords::table
                    .filter(service_content_keywords::service_content_id.eq(id.get())),
            )
            .execute(conn)?;

            Ok(diesel::delete(service_contents::table.find(id.get())).execute(conn)?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("visa"), "visa");
        assert_eq!(escape_like("100%_off\\"), "100\\%\\_off\\\\");
    }
}
