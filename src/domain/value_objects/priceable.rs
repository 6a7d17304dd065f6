use serde::{Deserialize, Serialize};

use crate::domain::entities::courses::{CourseEntity, DegreeCourseEntity};

/// Reference to something price policies and coupons can attach to.
/// Persisted as an (entity kind, entity id) column pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PriceableRef {
    Course(i64),
    DegreeCourse(i64),
}

impl PriceableRef {
    pub fn kind(&self) -> &'static str {
        match self {
            PriceableRef::Course(_) => "course",
            PriceableRef::DegreeCourse(_) => "degree_course",
        }
    }

    pub fn entity_id(&self) -> i64 {
        match self {
            PriceableRef::Course(id) | PriceableRef::DegreeCourse(id) => *id,
        }
    }

    pub fn from_parts(kind: &str, entity_id: i64) -> Option<Self> {
        match kind {
            "course" => Some(PriceableRef::Course(entity_id)),
            "degree_course" => Some(PriceableRef::DegreeCourse(entity_id)),
            _ => None,
        }
    }
}

/// A resolved priceable row, loaded through
/// [`CourseRepository::find_priceable`](crate::domain::repositories::courses::CourseRepository::find_priceable).
#[derive(Debug, Clone)]
pub enum PriceableModel {
    Course(CourseEntity),
    DegreeCourse(DegreeCourseEntity),
}

impl PriceableModel {
    pub fn title(&self) -> &str {
        match self {
            PriceableModel::Course(course) => &course.title,
            PriceableModel::DegreeCourse(degree_course) => &degree_course.title,
        }
    }

    pub fn entity_ref(&self) -> PriceableRef {
        match self {
            PriceableModel::Course(course) => PriceableRef::Course(course.id),
            PriceableModel::DegreeCourse(degree_course) => {
                PriceableRef::DegreeCourse(degree_course.id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_id_round_trip_through_from_parts() {
        let entity = PriceableRef::Course(7);
        assert_eq!(
            PriceableRef::from_parts(entity.kind(), entity.entity_id()),
            Some(entity)
        );

        let entity = PriceableRef::DegreeCourse(3);
        assert_eq!(
            PriceableRef::from_parts(entity.kind(), entity.entity_id()),
            Some(entity)
        );

        assert_eq!(PriceableRef::from_parts("chapter", 1), None);
    }
}
