use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infrastructure::postgres::schema::{courses, degree_courses};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = courses)]
pub struct CourseEntity {
    pub id: i64,
    pub title: String,
    pub course_type: i16,
    pub degree_course_id: Option<i64>,
    pub brief: String,
    pub status: i16,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = degree_courses)]
pub struct DegreeCourseEntity {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}
