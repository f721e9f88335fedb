//! 教师端：任课班级、成绩、考勤、作业与课表

pub mod attendance;
pub mod classes;
pub mod dashboard;
pub mod grades;
pub mod homework;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::attendance::{AttendanceQuery, MarkAttendanceRequest};
use crate::models::grades::{CreateGradeRequest, GradeListQuery, PublishGradesRequest, UpdateGradeRequest};
use crate::models::homework::{CreateHomeworkRequest, GradeSubmissionRequest, HomeworkListQuery};
use crate::storage::Storage;

pub struct TeacherService {
    storage: Option<Arc<dyn Storage>>,
}

impl TeacherService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::common::storage_from_request(request),
        }
    }

    pub async fn my_classes(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        classes::my_classes(self, request).await
    }

    pub async fn class_students(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        classes::class_students(self, request, class_id).await
    }

    pub async fn my_timetable(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        classes::my_timetable(self, request).await
    }

    pub async fn record_grade(
        &self,
        request: &HttpRequest,
        grade: CreateGradeRequest,
    ) -> ActixResult<HttpResponse> {
        grades::record_grade(self, request, grade).await
    }

    pub async fn list_grades(
        &self,
        request: &HttpRequest,
        query: GradeListQuery,
    ) -> ActixResult<HttpResponse> {
        grades::list_grades(self, request, query).await
    }

    pub async fn update_grade(
        &self,
        request: &HttpRequest,
        grade_id: i64,
        update: UpdateGradeRequest,
    ) -> ActixResult<HttpResponse> {
        grades::update_grade(self, request, grade_id, update).await
    }

    pub async fn delete_grade(
        &self,
        request: &HttpRequest,
        grade_id: i64,
    ) -> ActixResult<HttpResponse> {
        grades::delete_grade(self, request, grade_id).await
    }

    pub async fn publish_grades(
        &self,
        request: &HttpRequest,
        publish: PublishGradesRequest,
    ) -> ActixResult<HttpResponse> {
        grades::publish_grades(self, request, publish).await
    }

    pub async fn mark_attendance(
        &self,
        request: &HttpRequest,
        mark: MarkAttendanceRequest,
    ) -> ActixResult<HttpResponse> {
        attendance::mark_attendance(self, request, mark).await
    }

    pub async fn list_attendance(
        &self,
        request: &HttpRequest,
        query: AttendanceQuery,
    ) -> ActixResult<HttpResponse> {
        attendance::list_attendance(self, request, query).await
    }

    pub async fn create_homework(
        &self,
        request: &HttpRequest,
        homework: CreateHomeworkRequest,
    ) -> ActixResult<HttpResponse> {
        homework::create_homework(self, request, homework).await
    }

    pub async fn publish_homework(
        &self,
        request: &HttpRequest,
        homework_id: i64,
    ) -> ActixResult<HttpResponse> {
        homework::publish_homework(self, request, homework_id).await
    }

    pub async fn list_homework(
        &self,
        request: &HttpRequest,
        query: HomeworkListQuery,
    ) -> ActixResult<HttpResponse> {
        homework::list_homework(self, request, query).await
    }

    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        homework_id: i64,
    ) -> ActixResult<HttpResponse> {
        homework::list_submissions(self, request, homework_id).await
    }

    pub async fn grade_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        grade: GradeSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        homework::grade_submission(self, request, submission_id, grade).await
    }

    pub async fn dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        dashboard::dashboard(self, request).await
    }
}
