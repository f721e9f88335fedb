mod common;

use educafric::services::sandbox::seed_sandbox;

#[tokio::test]
async fn sandbox_seed_is_repeatable() {
    let storage = common::memory_storage().await;

    seed_sandbox(&storage).await.expect("first seed");
    let school = storage
        .get_sandbox_school()
        .await
        .unwrap()
        .expect("sandbox school");
    assert!(school.is_sandbox);
    let members = storage.list_school_users(school.id, None).await.unwrap();
    assert!(members.iter().all(|u| u.is_test_account));
    assert!(!members.iter().any(|u| u.role.is_platform_admin()));

    seed_sandbox(&storage).await.expect("second seed");
    let again = storage.list_school_users(school.id, None).await.unwrap();
    assert_eq!(again.len(), members.len());
    assert_eq!(storage.list_classes(school.id).await.unwrap().len(), 1);

    let terms = storage.list_terms(school.id).await.unwrap();
    assert_eq!(terms.len(), 1);
    assert!(terms[0].is_active);
}
