mod common;

use chrono::NaiveDate;
use educafric::models::bulletins::{
    BulletinAction, BulletinGradeRow, BulletinStatus, BulletinTransition, NewBulletin,
};
use educafric::models::schools::CreateTermRequest;
use educafric::models::users::UserRole;

fn transition(
    bulletin_id: i64,
    from: BulletinStatus,
    version: i32,
    to: BulletinStatus,
    action: BulletinAction,
    actor_id: i64,
) -> BulletinTransition {
    BulletinTransition {
        bulletin_id,
        expected_status: from,
        expected_version: version,
        new_status: to,
        action,
        actor_id,
        comment: None,
        batch_id: None,
        publish: None,
    }
}

#[tokio::test]
async fn stale_transitions_are_rejected_and_history_is_kept() {
    let storage = common::memory_storage().await;
    let school = common::school(&storage, "Lycée Joss").await;
    let teacher = common::user(&storage, "prof@example.cm", UserRole::Teacher, Some(school.id)).await;
    let director = common::user(&storage, "dir@example.cm", UserRole::Director, Some(school.id)).await;
    let student = common::user(&storage, "eleve@example.cm", UserRole::Student, Some(school.id)).await;
    let class = common::class(&storage, school.id, "Terminale C", 40).await;
    let term = storage
        .create_term(
            school.id,
            CreateTermRequest {
                name: "Premier trimestre".to_string(),
                academic_year: "2025-2026".to_string(),
                start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 12, 20).unwrap(),
            },
        )
        .await
        .unwrap();

    let bulletin = storage
        .create_bulletin(NewBulletin {
            school_id: school.id,
            student_id: student.id,
            class_id: class.id,
            term_id: term.id,
            created_by: teacher.id,
        })
        .await
        .unwrap();
    assert_eq!(bulletin.status, BulletinStatus::Draft);
    assert_eq!(bulletin.version, 1);

    let submit = transition(
        bulletin.id,
        BulletinStatus::Draft,
        1,
        BulletinStatus::Submitted,
        BulletinAction::Submit,
        teacher.id,
    );
    assert!(storage.apply_bulletin_transition(submit.clone()).await.unwrap());
    // 同一版本的第二次提交失败
    assert!(!storage.apply_bulletin_transition(submit).await.unwrap());

    let mut reject = transition(
        bulletin.id,
        BulletinStatus::Submitted,
        2,
        BulletinStatus::Rejected,
        BulletinAction::Reject,
        director.id,
    );
    reject.comment = Some("Moyenne de mathématiques à vérifier".to_string());
    assert!(storage.apply_bulletin_transition(reject).await.unwrap());

    let current = storage.get_bulletin_by_id(bulletin.id).await.unwrap().unwrap();
    assert_eq!(current.status, BulletinStatus::Rejected);
    assert_eq!(current.version, 3);

    let history = storage.list_bulletin_approvals(bulletin.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().any(|h| h.comment.is_some()));
}

fn row(subject_id: i64, grade: f64) -> BulletinGradeRow {
    BulletinGradeRow {
        subject_id,
        grade,
        coefficient: 2.0,
        comment: None,
    }
}

async fn first_term(storage: &std::sync::Arc<dyn educafric::storage::Storage>, school_id: i64) -> i64 {
    storage
        .create_term(
            school_id,
            CreateTermRequest {
                name: "Premier trimestre".to_string(),
                academic_year: "2025-2026".to_string(),
                start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 12, 20).unwrap(),
            },
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn grade_edits_require_the_current_version() {
    let storage = common::memory_storage().await;
    let school = common::school(&storage, "Lycée de Bonabéri").await;
    let teacher = common::user(&storage, "t@example.cm", UserRole::Teacher, Some(school.id)).await;
    let student = common::user(&storage, "s@example.cm", UserRole::Student, Some(school.id)).await;
    let class = common::class(&storage, school.id, "4ème A", 40).await;
    let maths = common::subject(&storage, school.id, "MATH").await;
    let term_id = first_term(&storage, school.id).await;

    let bulletin = storage
        .create_bulletin(NewBulletin {
            school_id: school.id,
            student_id: student.id,
            class_id: class.id,
            term_id,
            created_by: teacher.id,
        })
        .await
        .unwrap();

    let edited = storage
        .upsert_bulletin_grades(bulletin.id, 1, vec![row(maths.id, 14.0)], None)
        .await
        .unwrap()
        .expect("first edit");
    assert_eq!(edited.version, 2);
    assert_eq!(edited.general_average, Some(14.0));

    // 基于旧版本的第二次编辑被拒绝，数据保持不变
    let stale = storage
        .upsert_bulletin_grades(bulletin.id, 1, vec![row(maths.id, 3.0)], None)
        .await
        .unwrap();
    assert!(stale.is_none());
    let current = storage.get_bulletin_by_id(bulletin.id).await.unwrap().unwrap();
    assert_eq!(current.general_average, Some(14.0));

    // 编辑后版本前移，持有旧版本的提交失败
    let stale_submit = transition(
        bulletin.id,
        BulletinStatus::Draft,
        1,
        BulletinStatus::Submitted,
        BulletinAction::Submit,
        teacher.id,
    );
    assert!(!storage.apply_bulletin_transition(stale_submit).await.unwrap());

    let submit = transition(
        bulletin.id,
        BulletinStatus::Draft,
        2,
        BulletinStatus::Submitted,
        BulletinAction::Submit,
        teacher.id,
    );
    assert!(storage.apply_bulletin_transition(submit).await.unwrap());

    // 已提交的成绩单不可再编辑
    let locked = storage
        .upsert_bulletin_grades(bulletin.id, 3, vec![row(maths.id, 20.0)], None)
        .await
        .unwrap();
    assert!(locked.is_none());
}

#[tokio::test]
async fn ranks_only_count_approved_bulletins() {
    let storage = common::memory_storage().await;
    let school = common::school(&storage, "Collège Vogt").await;
    let teacher = common::user(&storage, "prof@vogt.cm", UserRole::Teacher, Some(school.id)).await;
    let director = common::user(&storage, "dir@vogt.cm", UserRole::Director, Some(school.id)).await;
    let class = common::class(&storage, school.id, "3ème B", 40).await;
    let maths = common::subject(&storage, school.id, "MATH").await;
    let term_id = first_term(&storage, school.id).await;

    let mut ids = Vec::new();
    for (email, grade) in [("a@vogt.cm", 12.0), ("b@vogt.cm", 18.0)] {
        let student = common::user(&storage, email, UserRole::Student, Some(school.id)).await;
        let bulletin = storage
            .create_bulletin(NewBulletin {
                school_id: school.id,
                student_id: student.id,
                class_id: class.id,
                term_id,
                created_by: teacher.id,
            })
            .await
            .unwrap();
        storage
            .upsert_bulletin_grades(bulletin.id, 1, vec![row(maths.id, grade)], None)
            .await
            .unwrap()
            .expect("grades saved");
        ids.push(bulletin.id);
    }

    // 只有第一份走完审批，第二份仍是草稿
    let approved = ids[0];
    assert!(storage
        .apply_bulletin_transition(transition(
            approved,
            BulletinStatus::Draft,
            2,
            BulletinStatus::Submitted,
            BulletinAction::Submit,
            teacher.id,
        ))
        .await
        .unwrap());
    assert!(storage
        .apply_bulletin_transition(transition(
            approved,
            BulletinStatus::Submitted,
            3,
            BulletinStatus::Approved,
            BulletinAction::Approve,
            director.id,
        ))
        .await
        .unwrap());

    let averages = storage.list_class_term_averages(class.id, term_id).await.unwrap();
    assert_eq!(averages, vec![(approved, 12.0)]);

    storage.refresh_bulletin_ranks(class.id, term_id).await.unwrap();
    let ranked = storage.get_bulletin_by_id(approved).await.unwrap().unwrap();
    assert_eq!(ranked.class_rank, Some(1));
    assert_eq!(ranked.total_students_in_class, Some(1));
    let draft = storage.get_bulletin_by_id(ids[1]).await.unwrap().unwrap();
    assert_eq!(draft.class_rank, None);

    assert_eq!(
        storage
            .count_unpublished_class_bulletins(class.id, term_id)
            .await
            .unwrap(),
        2
    );
}
