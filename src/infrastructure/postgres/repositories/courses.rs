use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::entities::courses::{CourseEntity, DegreeCourseEntity};
use crate::domain::repositories::courses::CourseRepository;
use crate::domain::value_objects::priceable::{PriceableModel, PriceableRef};
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad,
    schema::{courses, degree_courses},
};

pub struct CoursePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CoursePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CourseRepository for CoursePostgres {
    async fn find_priceable(&self, entity: PriceableRef) -> Result<Option<PriceableModel>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        match entity {
            PriceableRef::Course(id) => {
                let row = courses::table
                    .filter(courses::id.eq(id))
                    .select(CourseEntity::as_select())
                    .first::<CourseEntity>(&mut conn)
                    .optional()?;
                Ok(row.map(PriceableModel::Course))
            }
            PriceableRef::DegreeCourse(id) => {
                let row = degree_courses::table
                    .filter(degree_courses::id.eq(id))
                    .select(DegreeCourseEntity::as_select())
                    .first::<DegreeCourseEntity>(&mut conn)
                    .optional()?;
                Ok(row.map(PriceableModel::DegreeCourse))
            }
        }
    }
}
