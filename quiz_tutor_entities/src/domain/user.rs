use std::collections::BTreeSet;

use sea_orm::prelude::*;
use serde::{Serialize, Deserialize};

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct CourseExecution {
    pub uuid: Uuid,
    pub course_id: Uuid,
}

// Tournament membership holds ids only; the tournament's participant set
// is the other side of the relation.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct User {
    pub uuid: Uuid,
    pub name: String,
    pub course_executions: Vec<CourseExecution>,
    pub tournaments: BTreeSet<Uuid>,
}

impl User {
    pub fn new(name: impl Into<String>, course_executions: Vec<CourseExecution>) -> Self {
        User {
            uuid: Uuid::new_v4(),
            name: name.into(),
            course_executions,
            tournaments: BTreeSet::new(),
        }
    }
}
