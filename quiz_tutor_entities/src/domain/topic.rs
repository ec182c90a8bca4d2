use sea_orm::prelude::*;
use serde::{Serialize, Deserialize};

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct Topic {
    pub uuid: Uuid,
    pub name: String,
    pub course_id: Uuid,
}

/// The topic set a tournament draws its questions from. Owned by the
/// tournament; replacement goes through the aggregate so course
/// eligibility is checked first.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct TopicConjunction {
    uuid: Uuid,
    topics: Vec<Topic>,
}

impl TopicConjunction {
    pub(crate) fn new(topics: Vec<Topic>) -> Self {
        TopicConjunction {
            uuid: Uuid::new_v4(),
            topics,
        }
    }

    pub(crate) fn from_rows(uuid: Uuid, topics: Vec<Topic>) -> Self {
        TopicConjunction { uuid, topics }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub(crate) fn replace_topics(&mut self, topics: Vec<Topic>) {
        self.topics = topics;
    }
}
