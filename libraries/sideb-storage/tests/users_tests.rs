//! Integration tests for the users vertical slice


use sideb_core::{PageRequest, SidebError, UpdateUser, UserId};
use test_helpers::*;

#[tokio::test]
async fn test_create_and_lookup_user() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = sideb_storage::users::create(pool, "vinylhead")
        .await
        .expect("Failed to create user");
    assert_eq!(user.username, "vinylhead");

    let by_id = sideb_storage::users::get_by_id(pool, user.id.clone())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_id, user);

    let by_name = sideb_storage::users::get_by_username(pool, "vinylhead")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_name.id, user.id);

    assert!(!sideb_storage::users::is_username_available(pool, "vinylhead")
        .await
        .unwrap());
    assert!(sideb_storage::users::is_username_available(pool, "fresh")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_user(pool, "taken").await;

    let err = sideb_storage::users::create(pool, "taken")
        .await
        .expect_err("Duplicate username should fail");
    assert!(matches!(err, SidebError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn test_update_profile() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user_id = create_test_user(pool, "someone").await;

    let updated = sideb_storage::users::update(
        pool,
        user_id,
        UpdateUser {
            display_name: Some("Someone Else".to_string()),
            bio: Some("Crate digger".to_string()),
            profile_image: None,
        },
    )
    .await
    .expect("Failed to update user");

    assert_eq!(updated.display_name, Some("Someone Else".to_string()));
    assert_eq!(updated.bio, Some("Crate digger".to_string()));

    let err = sideb_storage::users::update(pool, UserId::new("nope"), UpdateUser::default())
        .await
        .expect_err("Unknown user should fail");
    assert!(matches!(err, SidebError::NotFound { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_search_users() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_user(pool, "jazzcat").await;
    let other = create_test_user(pool, "quiet").await;
    sideb_storage::users::update(
        pool,
        other,
        UpdateUser {
            display_name: Some("The Jazz Librarian".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    create_test_user(pool, "unrelated").await;

    let results = sideb_storage::users::search(pool, "jazz", PageRequest::default())
        .await
        .expect("Failed to search users");
    assert_eq!(results.total, 2);
}
