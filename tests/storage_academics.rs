mod common;

use chrono::NaiveDate;
use educafric::models::classes::{EnrollOutcome, EnrollmentStatus, LinkParentRequest, RelationshipType};
use educafric::models::schools::CreateTermRequest;
use educafric::models::timetable::{CreateTimetableSlotRequest, TimetableQuery};
use educafric::models::users::UserRole;

#[tokio::test]
async fn enrollment_respects_capacity_and_transfers() {
    let storage = common::memory_storage().await;
    let school = common::school(&storage, "Lycée de Bonabéri").await;
    let small = common::class(&storage, school.id, "6ème B", 1).await;
    let other = common::class(&storage, school.id, "6ème C", 30).await;

    let first = common::user(&storage, "ada@example.cm", UserRole::Student, Some(school.id)).await;
    let second = common::user(&storage, "ben@example.cm", UserRole::Student, Some(school.id)).await;

    assert!(matches!(
        storage.enroll_student(small.id, first.id).await.unwrap(),
        EnrollOutcome::Enrolled(_)
    ));
    assert!(matches!(
        storage.enroll_student(small.id, first.id).await.unwrap(),
        EnrollOutcome::AlreadyEnrolled
    ));
    assert!(matches!(
        storage.enroll_student(small.id, second.id).await.unwrap(),
        EnrollOutcome::ClassFull
    ));

    // 转班后旧注册失效，原班级腾出名额
    assert!(matches!(
        storage.enroll_student(other.id, first.id).await.unwrap(),
        EnrollOutcome::Enrolled(_)
    ));
    let active = storage.get_active_enrollment(first.id).await.unwrap().unwrap();
    assert_eq!(active.class_id, other.id);
    assert_eq!(active.status, EnrollmentStatus::Active);
    assert!(matches!(
        storage.enroll_student(small.id, second.id).await.unwrap(),
        EnrollOutcome::Enrolled(_)
    ));
    assert_eq!(storage.list_class_students(small.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn only_one_term_is_active_per_school() {
    let storage = common::memory_storage().await;
    let school = common::school(&storage, "Collège Saint-Michel").await;
    let term = |name: &str, start: (u32, u32), end: (u32, u32)| CreateTermRequest {
        name: name.to_string(),
        academic_year: "2025-2026".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, start.0, start.1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, end.0, end.1).unwrap(),
    };

    let first = storage
        .create_term(school.id, term("Premier trimestre", (9, 1), (12, 20)))
        .await
        .unwrap();
    let second = storage
        .create_term(school.id, term("Deuxième trimestre", (1, 5), (3, 28)))
        .await
        .unwrap();

    assert!(storage.activate_term(school.id, first.id).await.unwrap());
    assert!(storage.activate_term(school.id, second.id).await.unwrap());

    let active: Vec<_> = storage
        .list_terms(school.id)
        .await
        .unwrap()
        .into_iter()
        .filter(|t| t.is_active)
        .collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, second.id);

    // 其他学校的学期不能被激活
    let elsewhere = common::school(&storage, "Autre école").await;
    assert!(!storage.activate_term(elsewhere.id, first.id).await.unwrap());
}

#[tokio::test]
async fn parent_links_are_queryable_both_ways() {
    let storage = common::memory_storage().await;
    let school = common::school(&storage, "École du Centre").await;
    let parent = common::user(&storage, "mama@example.cm", UserRole::Parent, Some(school.id)).await;
    let kid = common::user(&storage, "kid@example.cm", UserRole::Student, Some(school.id)).await;

    storage
        .link_parent(LinkParentRequest {
            parent_id: parent.id,
            student_id: kid.id,
            relationship: RelationshipType::Mother,
            is_primary: true,
        })
        .await
        .unwrap();

    let children = storage.list_children(parent.id).await.unwrap();
    assert_eq!(children.iter().map(|u| u.id).collect::<Vec<_>>(), vec![kid.id]);
    let parents = storage.list_parents_of_student(kid.id).await.unwrap();
    assert_eq!(parents[0].id, parent.id);
    assert!(
        storage
            .get_parent_student_relation(parent.id, kid.id)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn emails_are_stored_lowercase() {
    let storage = common::memory_storage().await;
    let created = common::user(&storage, "Director@Example.CM", UserRole::Director, None).await;
    assert_eq!(created.email, "director@example.cm");
    let found = storage.get_user_by_email("director@example.cm").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(created.id));
}

#[tokio::test]
async fn timetable_lists_slots_in_time_order() {
    let storage = common::memory_storage().await;
    let school = common::school(&storage, "Lycée Joss").await;
    let class = common::class(&storage, school.id, "5ème A", 40).await;
    let maths = common::subject(&storage, school.id, "MATH").await;
    let teacher = common::user(&storage, "prof@joss.cm", UserRole::Teacher, Some(school.id)).await;

    for (start, end) in [("10:00", "11:00"), ("7:05", "8:00")] {
        storage
            .create_timetable_slot(
                school.id,
                CreateTimetableSlotRequest {
                    class_id: class.id,
                    subject_id: maths.id,
                    teacher_id: teacher.id,
                    day_of_week: 1,
                    start_time: start.to_string(),
                    end_time: end.to_string(),
                    classroom: None,
                },
            )
            .await
            .unwrap();
    }

    let slots = storage
        .list_timetable(
            school.id,
            TimetableQuery {
                class_id: Some(class.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let starts: Vec<_> = slots.iter().map(|s| s.start_time.as_str()).collect();
    assert_eq!(starts, vec!["07:05", "10:00"]);
    assert_eq!(slots[0].end_time, "08:00");
}

#[tokio::test]
async fn teacher_day_slots_span_every_school() {
    let storage = common::memory_storage().await;
    let morning = common::school(&storage, "Collège du Matin").await;
    let evening = common::school(&storage, "Institut du Soir").await;
    let teacher = common::user(&storage, "vacataire@example.cm", UserRole::Teacher, Some(morning.id)).await;

    for (school_id, day, start, end) in [
        (morning.id, 2, "08:00", "10:00"),
        (evening.id, 2, "17:00", "19:00"),
        (evening.id, 3, "17:00", "19:00"),
    ] {
        let class = common::class(&storage, school_id, &format!("Classe {start} {day}"), 40).await;
        let subject = common::subject(&storage, school_id, &format!("S{day}{}", &start[..2])).await;
        storage
            .create_timetable_slot(
                school_id,
                CreateTimetableSlotRequest {
                    class_id: class.id,
                    subject_id: subject.id,
                    teacher_id: teacher.id,
                    day_of_week: day,
                    start_time: start.to_string(),
                    end_time: end.to_string(),
                    classroom: None,
                },
            )
            .await
            .unwrap();
    }

    let tuesday = storage.list_teacher_day_slots(teacher.id, 2).await.unwrap();
    let mut schools: Vec<_> = tuesday.iter().map(|s| s.school_id).collect();
    schools.sort();
    assert_eq!(schools, vec![morning.id, evening.id]);
    assert_eq!(storage.list_teacher_day_slots(teacher.id, 4).await.unwrap().len(), 0);
}
