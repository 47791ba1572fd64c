use chrono::{Duration, Utc};
use greenhead_admin::domain::admin::{NewAdmin, NewOtpCode};
use greenhead_admin::domain::category::NewCategory;
use greenhead_admin::domain::service_content::NewServiceContent;
use greenhead_admin::domain::types::{
    CategoryName, EmailAddress, OneTimeCode, OtpPurpose, ProvenanceToken, SeoKeyword,
    ServiceTitle, SubcategoryId, SubcategoryName,
};
use greenhead_admin::repository::{
    AdminReader, AdminWriter, CategoryListQuery, CategoryReader, CategoryWriter,
    DieselRepository, OtpReader, OtpWriter, RepositoryError, ServiceContentListQuery,
    ServiceContentReader, ServiceContentWriter,
};

mod common;

fn new_category(name: &str, subcategories: &[&str]) -> NewCategory {
    let now = Utc::now().naive_utc();
    NewCategory {
        name: CategoryName::new(name).expect("valid category name"),
        subcategories: subcategories
            .iter()
            .map(|s| SubcategoryName::new(*s).expect("valid subcategory name"))
            .collect(),
        created_by: ProvenanceToken::new("session-token").expect("valid token"),
        created_at: now,
        updated_at: now,
    }
}

fn new_service(title: &str, category: &str, subcategory: Option<&str>, keywords: &[&str]) -> NewServiceContent {
    let now = Utc::now().naive_utc();
    NewServiceContent {
        title: ServiceTitle::new(title).expect("valid title"),
        content: format!("<p>{title}</p>"),
        category: CategoryName::new(category).expect("valid category"),
        subcategory: subcategory.map(|s| SubcategoryName::new(s).expect("valid subcategory")),
        seo_keywords: keywords
            .iter()
            .map(|k| SeoKeyword::new(*k).expect("valid keyword"))
            .collect(),
        short_description: String::new(),
        created_at: now,
        updated_at: now,
    }
}

fn names(category: &greenhead_admin::domain::category::Category) -> Vec<&str> {
    category
        .subcategories
        .iter()
        .map(|s| s.name.as_str())
        .collect()
}

#[test]
fn insert_category_assigns_ids_in_order() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let category = repo
        .insert_category(&new_category("Visas", &["Student", "Work"]))
        .expect("should insert category");

    assert_eq!(category.version, 1);
    assert_eq!(names(&category), vec!["Student", "Work"]);
    assert_eq!(category.subcategories[0].id, 1);
    assert_eq!(category.subcategories[1].id, 2);
    assert_eq!(category.next_subcategory_id, 3);

    let loaded = repo
        .get_category_by_id(category.id)
        .expect("should load category")
        .expect("category should exist");
    assert_eq!(loaded.created_by.as_str(), "session-token");
    assert_eq!(names(&loaded), vec!["Student", "Work"]);
}

#[test]
fn save_category_rewrites_document_and_bumps_version() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let mut category = repo
        .insert_category(&new_category("Visas", &["Student", "Work"]))
        .expect("should insert category");

    category.add_subcategory(SubcategoryName::new("Tourist").unwrap());
    category
        .remove_subcategory(SubcategoryId::new(1).unwrap())
        .expect("subcategory exists");
    category
        .soft_delete_subcategory(SubcategoryId::new(2).unwrap())
        .expect("subcategory is active");

    let saved = repo.save_category(&category).expect("should save category");

    assert_eq!(saved.version, 2);
    assert_eq!(names(&saved), vec!["Work", "Tourist"]);
    assert!(saved.subcategories[0].is_deleted);
    assert_eq!(saved.subcategories[1].id, 3);
    assert_eq!(saved.next_subcategory_id, 4);
}

#[test]
fn save_category_with_stale_version_conflicts() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let category = repo
        .insert_category(&new_category("Visas", &["Student"]))
        .expect("should insert category");

    let mut first = category.clone();
    first.rename(CategoryName::new("Visa Services").unwrap());
    repo.save_category(&first).expect("first writer wins");

    let mut second = category;
    second.add_subcategory(SubcategoryName::new("Work").unwrap());
    let err = repo.save_category(&second).unwrap_err();

    assert!(matches!(err, RepositoryError::Conflict));
    let stored = repo.get_category_by_id(second.id).unwrap().unwrap();
    assert_eq!(stored.name.as_str(), "Visa Services");
    assert_eq!(names(&stored), vec!["Student"]);
}

#[test]
fn subcategory_name_lookup_folds_case_and_includes_deleted() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let mut visas = repo
        .insert_category(&new_category("Visas", &["Student"]))
        .expect("should insert category");
    repo.insert_category(&new_category("Education", &["MBA"]))
        .expect("should insert category");

    visas
        .soft_delete_subcategory(SubcategoryId::new(1).unwrap())
        .unwrap();
    repo.save_category(&visas).expect("should save category");

    let folded = repo
        .find_categories_with_subcategory_name("STUDENT", true)
        .expect("should search");
    assert_eq!(folded.len(), 1);
    assert_eq!(folded[0].id, visas.id);
    assert!(!folded[0].has_active_subcategory_named("student"));

    let exact = repo
        .find_categories_with_subcategory_name("STUDENT", false)
        .expect("should search");
    assert!(exact.is_empty());
}

#[test]
fn list_and_delete_categories() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let mut visas = repo
        .insert_category(&new_category("Visas", &["Student"]))
        .expect("should insert category");
    let education = repo
        .insert_category(&new_category("Education", &[]))
        .expect("should insert category");

    visas.soft_delete().unwrap();
    repo.save_category(&visas).expect("should save category");

    let active = repo
        .list_categories(CategoryListQuery::default().deleted(false))
        .expect("should list");
    let deleted = repo
        .list_categories(CategoryListQuery::default().deleted(true))
        .expect("should list");
    let all = repo
        .list_categories(CategoryListQuery::default())
        .expect("should list");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, education.id);
    assert_eq!(deleted[0].id, visas.id);
    assert_eq!(all.len(), 2);
    assert!(all[0].id < all[1].id);

    let removed = repo
        .delete_category(visas.id)
        .expect("should delete")
        .expect("category existed");
    assert_eq!(names(&removed), vec!["Student"]);
    assert!(repo.get_category_by_id(visas.id).unwrap().is_none());
    assert!(
        repo.find_categories_with_subcategory_name("student", true)
            .unwrap()
            .is_empty()
    );
    assert!(repo.delete_category(visas.id).unwrap().is_none());
}

#[test]
fn service_content_filters_and_pagination() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let study = repo
        .create_service_content(&new_service(
            "Study permit",
            "Visas",
            Some("Student"),
            &["Canada Study", "permit"],
        ))
        .expect("should create");
    repo.create_service_content(&new_service("Work permit", "visas", None, &["work"]))
        .expect("should create");
    let mba = repo
        .create_service_content(&new_service("MBA", "Education", Some("MBA"), &["100% scholarship"]))
        .expect("should create");
    repo.set_service_content_deleted(mba.id, true)
        .expect("should soft delete");

    let (total, visas) = repo
        .list_service_contents(ServiceContentListQuery::default().deleted(false).category("VISAS"))
        .expect("should list");
    assert_eq!(total, 2);
    assert_eq!(visas[0].id, study.id);
    assert_eq!(visas[0].seo_keywords[0].as_str(), "Canada Study");

    let (_, students) = repo
        .list_service_contents(ServiceContentListQuery::default().subcategory("Student"))
        .expect("should list");
    assert_eq!(students.len(), 1);
    let (_, none) = repo
        .list_service_contents(ServiceContentListQuery::default().subcategory("student"))
        .expect("should list");
    assert!(none.is_empty());

    let (total, page) = repo
        .list_service_contents(
            ServiceContentListQuery::default()
                .deleted(false)
                .keywords(vec!["PERMIT".into(), "work".into()])
                .paginate(2, 1),
        )
        .expect("should search");
    assert_eq!(total, 2);
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].title.as_str(), "Work permit");

    let (total, _) = repo
        .list_service_contents(ServiceContentListQuery::default().keywords(vec!["0%".into()]))
        .expect("should search");
    assert_eq!(total, 1);
    let (total, _) = repo
        .list_service_contents(ServiceContentListQuery::default().keywords(vec!["_".into()]))
        .expect("should search");
    assert_eq!(total, 0);

    let (deleted, _) = repo
        .list_service_contents(ServiceContentListQuery::default().deleted(true))
        .expect("should list");
    assert_eq!(deleted, 1);
}

#[test]
fn service_content_update_and_delete() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let created = repo
        .create_service_content(&new_service("Study permit", "Visas", None, &["a", "b"]))
        .expect("should create");

    let updated = repo
        .update_service_content(
            created.id,
            &new_service("Study visa", "Visas", Some("Student"), &["c"]),
        )
        .expect("should update")
        .expect("service exists");
    assert_eq!(updated.title.as_str(), "Study visa");
    assert_eq!(updated.seo_keywords.len(), 1);
    assert_eq!(updated.subcategory.as_ref().map(|s| s.as_str()), Some("Student"));

    assert_eq!(repo.delete_service_content(created.id).unwrap(), 1);
    assert!(repo.get_service_content_by_id(created.id).unwrap().is_none());
    assert!(
        repo.update_service_content(created.id, &new_service("x", "y", None, &[]))
            .unwrap()
            .is_none()
    );
    assert_eq!(repo.set_service_content_deleted(created.id, true).unwrap(), 0);
}

#[test]
fn admins_and_otp_codes() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let email = EmailAddress::new("admin@example.com").unwrap();
    let now = Utc::now().naive_utc();

    let admin = repo
        .create_admin(&NewAdmin {
            email: email.clone(),
            password_hash: "salt$hash".into(),
            created_at: now,
        })
        .expect("should create admin");
    assert_eq!(admin.email, email);
    assert!(
        repo.create_admin(&NewAdmin {
            email: email.clone(),
            password_hash: "other".into(),
            created_at: now,
        })
        .is_err()
    );

    assert_eq!(repo.update_admin_password(&email, "new$hash").unwrap(), 1);
    let stored = repo.get_admin_by_email(&email).unwrap().unwrap();
    assert_eq!(stored.password_hash, "new$hash");

    for code in ["111111", "222222"] {
        repo.create_otp(&NewOtpCode {
            email: email.clone(),
            purpose: OtpPurpose::Signup,
            code: OneTimeCode::new(code).unwrap(),
            password_hash: Some("pending".into()),
            expires_at: now + Duration::minutes(10),
            created_at: now,
        })
        .expect("should store otp");
    }

    let latest = repo
        .get_latest_otp(&email, OtpPurpose::Signup)
        .unwrap()
        .expect("otp exists");
    assert_eq!(latest.code.as_str(), "222222");
    assert_eq!(latest.password_hash.as_deref(), Some("pending"));
    assert!(
        repo.get_latest_otp(&email, OtpPurpose::PasswordReset)
            .unwrap()
            .is_none()
    );

    assert_eq!(repo.delete_otps(&email, OtpPurpose::Signup).unwrap(), 2);
    assert!(repo.get_latest_otp(&email, OtpPurpose::Signup).unwrap().is_none());
}

#[test]
fn service_content_matching_folds_non_ascii_case() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let created = repo
        .create_service_content(&new_service(
            "Permis d'études",
            "Études",
            None,
            &["Résidence Permanente"],
        ))
        .expect("should create");

    let (total, by_category) = repo
        .list_service_contents(ServiceContentListQuery::default().category("ÉTUDES"))
        .expect("should list");
    assert_eq!(total, 1);
    assert_eq!(by_category[0].id, created.id);

    let (total, by_keyword) = repo
        .list_service_contents(
            ServiceContentListQuery::default().keywords(vec!["RÉSIDENCE".into()]),
        )
        .expect("should search");
    assert_eq!(total, 1);
    assert_eq!(by_keyword[0].seo_keywords[0].as_str(), "Résidence Permanente");

    let updated = repo
        .update_service_content(created.id, &new_service("Permis", "Santé", None, &["Médecin"]))
        .expect("should update")
        .expect("service exists");
    let (total, _) = repo
        .list_service_contents(ServiceContentListQuery::default().category("SANTÉ"))
        .expect("should list");
    assert_eq!(total, 1);
    let (total, _) = repo
        .list_service_contents(ServiceContentListQuery::default().keywords(vec!["MÉDECIN".into()]))
        .expect("should search");
    assert_eq!(total, 1);
    assert_eq!(updated.category.as_str(), "Santé");
}
