//! 校长端：本校资料、学期、班级、科目、成员、课表与家长申请

pub mod classes;
pub mod dashboard;
pub mod enrollment;
pub mod members;
pub mod parent_requests;
pub mod profile;
pub mod subjects;
pub mod terms;
pub mod timetable;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::classes::{
    CreateClassRequest, CreateMemberRequest, CreateSubjectRequest, EnrollStudentRequest,
    LinkParentRequest, StudentListQuery, UpdateClassRequest,
};
use crate::models::parent_requests::{ParentRequestListQuery, RespondParentRequest};
use crate::models::schools::{CreateTermRequest, UpdateSchoolRequest};
use crate::models::timetable::{CreateTimetableSlotRequest, TimetableQuery};
use crate::storage::Storage;

pub struct DirectorService {
    storage: Option<Arc<dyn Storage>>,
}

impl DirectorService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::common::storage_from_request(request),
        }
    }

    pub async fn school_profile(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile::school_profile(self, request).await
    }

    pub async fn update_school_profile(
        &self,
        request: &HttpRequest,
        update: UpdateSchoolRequest,
    ) -> ActixResult<HttpResponse> {
        profile::update_school_profile(self, request, update).await
    }

    pub async fn create_term(
        &self,
        request: &HttpRequest,
        term: CreateTermRequest,
    ) -> ActixResult<HttpResponse> {
        terms::create_term(self, request, term).await
    }

    pub async fn list_terms(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        terms::list_terms(self, request).await
    }

    pub async fn activate_term(
        &self,
        request: &HttpRequest,
        term_id: i64,
    ) -> ActixResult<HttpResponse> {
        terms::activate_term(self, request, term_id).await
    }

    pub async fn create_class(
        &self,
        request: &HttpRequest,
        class: CreateClassRequest,
    ) -> ActixResult<HttpResponse> {
        classes::create_class(self, request, class).await
    }

    pub async fn list_classes(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        classes::list_classes(self, request).await
    }

    pub async fn update_class(
        &self,
        request: &HttpRequest,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> ActixResult<HttpResponse> {
        classes::update_class(self, request, class_id, update).await
    }

    pub async fn delete_class(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        classes::delete_class(self, request, class_id).await
    }

    pub async fn create_subject(
        &self,
        request: &HttpRequest,
        subject: CreateSubjectRequest,
    ) -> ActixResult<HttpResponse> {
        subjects::create_subject(self, request, subject).await
    }

    pub async fn list_subjects(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        subjects::list_subjects(self, request).await
    }

    pub async fn delete_subject(
        &self,
        request: &HttpRequest,
        subject_id: i64,
    ) -> ActixResult<HttpResponse> {
        subjects::delete_subject(self, request, subject_id).await
    }

    pub async fn create_member(
        &self,
        request: &HttpRequest,
        member: CreateMemberRequest,
    ) -> ActixResult<HttpResponse> {
        members::create_member(self, request, member).await
    }

    pub async fn list_teachers(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        members::list_teachers(self, request).await
    }

    pub async fn list_students(
        &self,
        request: &HttpRequest,
        query: StudentListQuery,
    ) -> ActixResult<HttpResponse> {
        members::list_students(self, request, query).await
    }

    pub async fn enroll_student(
        &self,
        request: &HttpRequest,
        class_id: i64,
        enroll: EnrollStudentRequest,
    ) -> ActixResult<HttpResponse> {
        enrollment::enroll_student(self, request, class_id, enroll).await
    }

    pub async fn link_parent(
        &self,
        request: &HttpRequest,
        link: LinkParentRequest,
    ) -> ActixResult<HttpResponse> {
        enrollment::link_parent(self, request, link).await
    }

    pub async fn create_timetable_slot(
        &self,
        request: &HttpRequest,
        slot: CreateTimetableSlotRequest,
    ) -> ActixResult<HttpResponse> {
        timetable::create_timetable_slot(self, request, slot).await
    }

    pub async fn list_timetable(
        &self,
        request: &HttpRequest,
        query: TimetableQuery,
    ) -> ActixResult<HttpResponse> {
        timetable::list_timetable(self, request, query).await
    }

    pub async fn delete_timetable_slot(
        &self,
        request: &HttpRequest,
        slot_id: i64,
    ) -> ActixResult<HttpResponse> {
        timetable::delete_timetable_slot(self, request, slot_id).await
    }

    pub async fn list_parent_requests(
        &self,
        request: &HttpRequest,
        query: ParentRequestListQuery,
    ) -> ActixResult<HttpResponse> {
        parent_requests::list_parent_requests(self, request, query).await
    }

    pub async fn respond_parent_request(
        &self,
        request: &HttpRequest,
        request_id: i64,
        response: RespondParentRequest,
    ) -> ActixResult<HttpResponse> {
        parent_requests::respond_parent_request(self, request, request_id, response).await
    }

    pub async fn dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        dashboard::dashboard(self, request).await
    }
}
