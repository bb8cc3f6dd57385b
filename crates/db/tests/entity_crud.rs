//! Integration tests for user / project / screenshot CRUD operations.
//!
//! Exercises the full repository layer against a real database:
//! - Create the full hierarchy (user -> project -> screenshot)
//! - Write-time validation of required fields and length limits
//! - Cascade delete behaviour
//! - Unique and foreign key violations
//! - Update and list operations

use assert_matches::assert_matches;
use folio_core::error::CoreError;
use folio_db::models::project::{CreateProject, UpdateProject};
use folio_db::models::screenshot::{CreateScreenshot, UpdateScreenshot};
use folio_db::models::user::{CreateUser, UpdateUser, UserUploadSlot};
use folio_db::repositories::{ProjectRepo, ScreenshotRepo, UserRepo};
use folio_db::RepoError;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(username: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        password_hash: "pbkdf2_sha256$test".to_string(),
        email: format!("{username}@example.com"),
        first_name: "Geek".to_string(),
        last_name: "User".to_string(),
        ..Default::default()
    }
}

fn new_project(user_id: i64, name: &str) -> CreateProject {
    CreateProject {
        user_id,
        name: name.to_string(),
        short_description: "A portfolio project".to_string(),
        full_description: None,
        tech_stack: "Rust, PostgreSQL".to_string(),
        role: "Developer".to_string(),
        private: None,
        live_url: None,
        repo_url: None,
    }
}

fn new_screenshot(project_id: i64, image: &str) -> CreateScreenshot {
    CreateScreenshot {
        project_id,
        image: image.to_string(),
        caption: None,
    }
}

fn owned(user_id: i64, name: &str) -> String {
    format!("uploads/user_{user_id}/{name}")
}

async fn user_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Test: Full hierarchy creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_full_hierarchy(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("geek")).await.unwrap();
    assert_eq!(user.account.username, "geek");
    assert!(user.account.is_active);
    assert!(!user.account.is_staff);
    assert_eq!(user.image, None);

    let project = ProjectRepo::create(&pool, &new_project(user.id, "Portfolio"))
        .await
        .unwrap();
    assert_eq!(project.user_id, user.id);
    assert_eq!(project.name, "Portfolio");

    let screenshot = ScreenshotRepo::create(
        &pool,
        &new_screenshot(project.id, &owned(user.id, "home.png")),
    )
    .await
    .unwrap();
    assert_eq!(screenshot.project_id, project.id);
    assert_eq!(
        ScreenshotRepo::owner_id(&pool, screenshot.id).await.unwrap(),
        Some(user.id)
    );
}

// ---------------------------------------------------------------------------
// Test: Required user fields are enforced on every write
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_required_fields(pool: PgPool) {
    for field in ["email", "first_name", "last_name"] {
        let mut input = new_user("nerd");
        match field {
            "email" => input.email.clear(),
            "first_name" => input.first_name.clear(),
            _ => input.last_name.clear(),
        }

        let err = UserRepo::create(&pool, &input).await.unwrap_err();
        assert_matches!(err, RepoError::Core(CoreError::InvalidFields(_)));
        assert_eq!(err.invalid_fields(), vec![field]);
    }

    assert_eq!(user_count(&pool).await, 0, "invalid users must not be persisted");

    UserRepo::create(&pool, &new_user("nerd")).await.unwrap();
    assert_eq!(user_count(&pool).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_short_bio_limit(pool: PgPool) {
    let ok = CreateUser {
        short_bio: Some("b".repeat(300)),
        ..new_user("bio_ok")
    };
    let user = UserRepo::create(&pool, &ok).await.unwrap();
    assert_eq!(user.short_bio.as_deref().map(str::len), Some(300));

    let too_long = CreateUser {
        short_bio: Some("b".repeat(301)),
        ..new_user("bio_long")
    };
    let err = UserRepo::create(&pool, &too_long).await.unwrap_err();
    assert_eq!(err.invalid_fields(), vec!["short_bio"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_update_cannot_blank_required_fields(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("editor")).await.unwrap();

    let err = UserRepo::update(
        &pool,
        user.id,
        &UpdateUser {
            last_name: Some(String::new()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.invalid_fields(), vec!["last_name"]);

    let unchanged = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(unchanged.last_name, "User");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_update_profile(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("profile")).await.unwrap();

    let updated = UserRepo::update(
        &pool,
        user.id,
        &UpdateUser {
            short_bio: Some("Rustacean".to_string()),
            github_profile: Some("https://github.com/profile".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("Update should return the row");

    assert_eq!(updated.short_bio.as_deref(), Some("Rustacean"));
    assert_eq!(
        updated.github_profile.as_deref(),
        Some("https://github.com/profile")
    );
    assert_eq!(updated.first_name, "Geek");
    assert!(updated.updated_at >= user.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_lookup(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("finder")).await.unwrap();

    let by_name = UserRepo::find_by_username(&pool, "finder").await.unwrap();
    assert_eq!(by_name.map(|u| u.id), Some(user.id));

    let by_email = UserRepo::find_by_email(&pool, "FINDER@example.com")
        .await
        .unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(user.id));

    assert!(UserRepo::find_by_username(&pool, "nobody")
        .await
        .unwrap()
        .is_none());
    assert_eq!(UserRepo::list(&pool).await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: Unique constraint violation on duplicate username
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_username_rejected(pool: PgPool) {
    UserRepo::create(&pool, &new_user("unique")).await.unwrap();
    let err = UserRepo::create(&pool, &new_user("unique")).await.unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::Conflict(_)));
}

// ---------------------------------------------------------------------------
// Test: Project constraints and defaults
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_private_defaults_to_false(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("owner")).await.unwrap();
    let project = ProjectRepo::create(&pool, &new_project(user.id, "Public"))
        .await
        .unwrap();
    assert!(!project.private);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_length_limits(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("limits")).await.unwrap();
    let base = new_project(user.id, "Limits");

    let cases = [
        (
            "name",
            CreateProject {
                name: "n".repeat(51),
                ..base.clone()
            },
        ),
        (
            "short_description",
            CreateProject {
                short_description: "s".repeat(101),
                ..base.clone()
            },
        ),
        (
            "tech_stack",
            CreateProject {
                tech_stack: "t".repeat(201),
                ..base.clone()
            },
        ),
        (
            "role",
            CreateProject {
                role: "r".repeat(301),
                ..base.clone()
            },
        ),
        (
            "full_description",
            CreateProject {
                full_description: Some("f".repeat(1001)),
                ..base.clone()
            },
        ),
    ];

    for (field, input) in cases {
        let err = ProjectRepo::create(&pool, &input).await.unwrap_err();
        assert_eq!(err.invalid_fields(), vec![field], "{field} limit not enforced");
    }

    assert!(ProjectRepo::list_by_user(&pool, user.id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_without_user_is_referential_violation(pool: PgPool) {
    let err = ProjectRepo::create(&pool, &new_project(999_999, "Orphan"))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        RepoError::Core(CoreError::MissingParent {
            entity: "project",
            parent: "user",
            id: Some(999_999),
        })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_screenshot_without_project_is_referential_violation(pool: PgPool) {
    let err = ScreenshotRepo::create(&pool, &new_screenshot(999_999, "uploads/user_1/a.png"))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        RepoError::Core(CoreError::MissingParent {
            entity: "screenshot",
            parent: "project",
            ..
        })
    );
}

// ---------------------------------------------------------------------------
// Test: Cascade delete user removes all children
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cascade_delete_user(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("cascade")).await.unwrap();
    let p1 = ProjectRepo::create(&pool, &new_project(user.id, "One"))
        .await
        .unwrap();
    let p2 = ProjectRepo::create(&pool, &new_project(user.id, "Two"))
        .await
        .unwrap();
    let s1 = ScreenshotRepo::create(&pool, &new_screenshot(p1.id, &owned(user.id, "a.png")))
        .await
        .unwrap();
    let s2 = ScreenshotRepo::create(&pool, &new_screenshot(p2.id, &owned(user.id, "b.png")))
        .await
        .unwrap();

    // Another user's data must survive.
    let other = UserRepo::create(&pool, &new_user("bystander")).await.unwrap();
    let other_project = ProjectRepo::create(&pool, &new_project(other.id, "Safe"))
        .await
        .unwrap();

    assert!(UserRepo::delete(&pool, user.id).await.unwrap());

    for id in [p1.id, p2.id] {
        assert!(ProjectRepo::find_by_id(&pool, id).await.unwrap().is_none());
    }
    for id in [s1.id, s2.id] {
        assert!(ScreenshotRepo::find_by_id(&pool, id).await.unwrap().is_none());
    }
    assert!(ProjectRepo::find_by_id(&pool, other_project.id)
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cascade_delete_project(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("projdel")).await.unwrap();
    let project = ProjectRepo::create(&pool, &new_project(user.id, "Doomed"))
        .await
        .unwrap();
    let shot = ScreenshotRepo::create(&pool, &new_screenshot(project.id, &owned(user.id, "x.png")))
        .await
        .unwrap();

    assert!(ProjectRepo::delete(&pool, project.id).await.unwrap());
    assert!(ScreenshotRepo::find_by_id(&pool, shot.id)
        .await
        .unwrap()
        .is_none());
    assert!(UserRepo::find_by_id(&pool, user.id).await.unwrap().is_some());
}

// ---------------------------------------------------------------------------
// Test: Update and delete of missing rows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_project(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("updater")).await.unwrap();
    let project = ProjectRepo::create(&pool, &new_project(user.id, "Before Update"))
        .await
        .unwrap();

    let updated = ProjectRepo::update(
        &pool,
        project.id,
        &UpdateProject {
            name: Some("After Update".to_string()),
            private: Some(true),
            repo_url: Some("https://github.com/updater/after".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("Update should return the row");

    assert_eq!(updated.name, "After Update");
    assert!(updated.private);
    assert_eq!(
        updated.repo_url.as_deref(),
        Some("https://github.com/updater/after")
    );
    assert_eq!(updated.role, "Developer");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_nonexistent_returns_none(pool: PgPool) {
    let result = ProjectRepo::update(
        &pool,
        999_999,
        &UpdateProject {
            name: Some("Ghost".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(result.is_none(), "Updating non-existent ID should return None");

    let result = ScreenshotRepo::update(
        &pool,
        999_999,
        &UpdateScreenshot {
            caption: Some("Ghost".to_string()),
            image: None,
        },
    )
    .await
    .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_nonexistent_returns_false(pool: PgPool) {
    assert!(!UserRepo::delete(&pool, 999_999).await.unwrap());
    assert!(!ProjectRepo::delete(&pool, 999_999).await.unwrap());
    assert!(!ScreenshotRepo::delete(&pool, 999_999).await.unwrap());
}

// ---------------------------------------------------------------------------
// Test: Listing is scoped to the owner
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_projects_scoped_to_user(pool: PgPool) {
    let u1 = UserRepo::create(&pool, &new_user("u1")).await.unwrap();
    let u2 = UserRepo::create(&pool, &new_user("u2")).await.unwrap();

    ProjectRepo::create(&pool, &new_project(u1.id, "A"))
        .await
        .unwrap();
    ProjectRepo::create(
        &pool,
        &CreateProject {
            private: Some(true),
            ..new_project(u1.id, "B")
        },
    )
    .await
    .unwrap();
    ProjectRepo::create(&pool, &new_project(u2.id, "C"))
        .await
        .unwrap();

    assert_eq!(ProjectRepo::list_by_user(&pool, u1.id).await.unwrap().len(), 2);
    assert_eq!(ProjectRepo::list_by_user(&pool, u2.id).await.unwrap().len(), 1);

    let public = ProjectRepo::list_public_by_user(&pool, u1.id).await.unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].name, "A");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_screenshots_listed_in_upload_order(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("shots")).await.unwrap();
    let project = ProjectRepo::create(&pool, &new_project(user.id, "Gallery"))
        .await
        .unwrap();

    for name in ["first.png", "second.png", "third.png"] {
        ScreenshotRepo::create(
            &pool,
            &new_screenshot(project.id, &owned(user.id, name)),
        )
        .await
        .unwrap();
    }

    let images: Vec<String> = ScreenshotRepo::list_by_project(&pool, project.id)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.image)
        .collect();
    assert_eq!(
        images,
        vec![
            owned(user.id, "first.png"),
            owned(user.id, "second.png"),
            owned(user.id, "third.png"),
        ]
    );
    assert_eq!(ProjectRepo::owner_id(&pool, project.id).await.unwrap(), Some(user.id));
}

// ---------------------------------------------------------------------------
// Test: Stored upload paths stay in the owner's directory
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_screenshot_image_must_belong_to_project_owner(pool: PgPool) {
    let owner = UserRepo::create(&pool, &new_user("pathowner")).await.unwrap();
    let other = UserRepo::create(&pool, &new_user("pathother")).await.unwrap();
    let project = ProjectRepo::create(&pool, &new_project(owner.id, "Paths"))
        .await
        .unwrap();

    let err = ScreenshotRepo::create(&pool, &new_screenshot(project.id, &owned(other.id, "x.png")))
        .await
        .unwrap_err();
    assert_eq!(err.invalid_fields(), vec!["image"]);

    let shot = ScreenshotRepo::create(&pool, &new_screenshot(project.id, &owned(owner.id, "x.png")))
        .await
        .unwrap();

    for bad in [
        owned(999, "x.png"),
        "../../etc/passwd".to_string(),
        format!("uploads/user_{}/../user_{}/x.png", owner.id, other.id),
    ] {
        let err = ScreenshotRepo::update(
            &pool,
            shot.id,
            &UpdateScreenshot {
                image: Some(bad.clone()),
                caption: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.invalid_fields(), vec!["image"], "{bad} should be rejected");
    }

    let unchanged = ScreenshotRepo::find_by_id(&pool, shot.id).await.unwrap().unwrap();
    assert_eq!(unchanged.image, owned(owner.id, "x.png"));

    let moved = ScreenshotRepo::update(
        &pool,
        shot.id,
        &UpdateScreenshot {
            image: Some(owned(owner.id, "y.png")),
            caption: None,
        },
    )
    .await
    .unwrap()
    .expect("Update should return the row");
    assert_eq!(moved.image, owned(owner.id, "y.png"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_upload_slots_must_point_into_own_directory(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("slotowner")).await.unwrap();

    let err = UserRepo::set_image(&pool, user.id, &owned(user.id + 1, "me.png"))
        .await
        .unwrap_err();
    assert_eq!(err.invalid_fields(), vec!["image"]);

    let err = UserRepo::set_resume(&pool, user.id, "../../etc/passwd")
        .await
        .unwrap_err();
    assert_eq!(err.invalid_fields(), vec!["resume"]);

    let long = owned(user.id, &format!("{}.pdf", "a".repeat(250)));
    let err = UserRepo::set_resume(&pool, user.id, &long).await.unwrap_err();
    assert_eq!(err.invalid_fields(), vec!["resume"]);

    let updated = UserRepo::set_image(&pool, user.id, &owned(user.id, "me.png"))
        .await
        .unwrap()
        .expect("Update should return the row");
    assert_eq!(updated.image, Some(owned(user.id, "me.png")));

    let cleared = UserRepo::set_upload(&pool, user.id, UserUploadSlot::Image, None)
        .await
        .unwrap()
        .expect("Update should return the row");
    assert_eq!(cleared.image, None);
}
