//! 学生端：本人成绩、考勤、作业、课表与成绩单

pub mod dashboard;
pub mod homework;
pub mod records;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::grades::GradeListQuery;
use crate::models::homework::SubmitHomeworkRequest;
use crate::storage::Storage;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::common::storage_from_request(request),
        }
    }

    pub async fn my_grades(
        &self,
        request: &HttpRequest,
        query: GradeListQuery,
    ) -> ActixResult<HttpResponse> {
        records::my_grades(self, request, query).await
    }

    pub async fn my_attendance(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        records::my_attendance(self, request).await
    }

    pub async fn my_timetable(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        records::my_timetable(self, request).await
    }

    pub async fn my_bulletins(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        records::my_bulletins(self, request).await
    }

    pub async fn my_homework(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        homework::my_homework(self, request).await
    }

    pub async fn submit_homework(
        &self,
        request: &HttpRequest,
        homework_id: i64,
        submission: SubmitHomeworkRequest,
    ) -> ActixResult<HttpResponse> {
        homework::submit_homework(self, request, homework_id, submission).await
    }

    pub async fn dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        dashboard::dashboard(self, request).await
    }
}
