use std::collections::BTreeSet;

use chrono::Duration;
use sea_orm::prelude::*;

use faker_rand::en_us::names::FullName;

use crate::domain::topic::Topic;
use crate::domain::tournament::{Tournament, TournamentSettings};
use crate::domain::user::{CourseExecution, User};

#[derive(Debug)]
pub struct MockOption {
    pub deterministic_uuids: bool,
    pub num_participants: u32,
    pub num_topics: u32,
    pub use_random_names: bool,
}

impl Default for MockOption {
    fn default() -> Self {
        Self {
            deterministic_uuids: false,
            num_participants: 5,
            num_topics: 3,
            use_random_names: false,
        }
    }
}

#[derive(Debug)]
pub struct MockCourse {
    pub course_id: Uuid,
    pub course_execution: CourseExecution,
    pub creator: User,
    pub participants: Vec<User>,
    pub topics: Vec<Topic>,
}

pub fn make_mock_course() -> MockCourse {
    make_mock_course_with_options(Default::default())
}

pub fn make_mock_course_with_options(options: MockOption) -> MockCourse {
    /*
    Course: 10
    Course execution: 11
    Creator: 100
    Participants: 200
    Topics: 300
    */
    let course_id = if options.deterministic_uuids { Uuid::from_u128(10) } else { Uuid::new_v4() };
    let course_execution = CourseExecution {
        uuid: if options.deterministic_uuids { Uuid::from_u128(11) } else { Uuid::new_v4() },
        course_id,
    };

    let creator = User {
        uuid: if options.deterministic_uuids { Uuid::from_u128(100) } else { Uuid::new_v4() },
        name: mock_name(&options, "Creator".into()),
        course_executions: vec![course_execution.clone()],
        tournaments: BTreeSet::new(),
    };

    let participants = (0..options.num_participants).map(|i| {
        User {
            uuid: if options.deterministic_uuids { Uuid::from_u128(200 + i as u128) } else { Uuid::new_v4() },
            name: mock_name(&options, format!("Participant {}", i + 1)),
            course_executions: vec![course_execution.clone()],
            tournaments: BTreeSet::new(),
        }
    }).collect();

    let topics = (0..options.num_topics).map(|i| {
        Topic {
            uuid: if options.deterministic_uuids { Uuid::from_u128(300 + i as u128) } else { Uuid::new_v4() },
            name: format!("Topic {}", i + 1),
            course_id,
        }
    }).collect();

    MockCourse {
        course_id,
        course_execution,
        creator,
        participants,
        topics,
    }
}

fn mock_name(options: &MockOption, fallback: String) -> String {
    if options.use_random_names {
        rand::random::<FullName>().to_string()
    } else {
        fallback
    }
}

/// A schedule two hours out with a one hour window; valid at `now`.
pub fn make_mock_settings(now: DateTime) -> TournamentSettings {
    TournamentSettings {
        start_time: Some(now + Duration::hours(2)),
        end_time: Some(now + Duration::hours(3)),
        number_of_questions: 10,
        ..Default::default()
    }
}

pub fn make_mock_tournament(course: &MockCourse, now: DateTime) -> Tournament {
    Tournament::new(&course.creator, course.topics.clone(), make_mock_settings(now), now)
        .expect("mock tournament settings are valid")
}
