use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Duration;
use itertools::{izip, Itertools};
use sea_orm::{prelude::*, ActiveValue};
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::schema;
use crate::utilities::BatchLoad;

use super::entity::{CourseExecutionEntity, LoadEntity};
use super::topic::{Topic, TopicConjunction};
use super::user::{CourseExecution, User};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TournamentError {
    #[error("inconsistent tournament schedule: {field}")]
    InconsistentSchedule { field: &'static str },
    #[error("a tournament requires a positive number of questions")]
    InconsistentQuestionCount,
    #[error("topic {0} does not belong to the tournament course")]
    TopicCourseMismatch(Uuid),
    #[error("a tournament requires at least one topic")]
    EmptyTopicSet,
    #[error("user {0} did not create this tournament")]
    NotCreator(Uuid),
    #[error("tournament {0} is currently open")]
    TournamentIsOpen(Uuid),
    #[error("tournament {0} has already closed")]
    TournamentAlreadyClosed(Uuid),
    #[error("user {0} is not enrolled in a course execution")]
    MissingEnrollment(Uuid),
    #[error("user {0} is enrolled in more than one course execution")]
    AmbiguousEnrollment(Uuid),
}

/// Derived from the schedule and a caller-supplied instant. Cancellation
/// is tracked separately and does not affect the schedule state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TournamentStatus {
    Scheduled,
    Open,
    Closed,
}

/// Scheduling parameters of a creation or edit request. Timestamps are
/// optional at the boundary; validation rejects absence.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Default)]
pub struct TournamentSettings {
    pub start_time: Option<DateTime>,
    pub end_time: Option<DateTime>,
    pub number_of_questions: i32,
    pub is_private: bool,
    pub password: Option<String>,
    pub is_canceled: bool,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct Tournament {
    uuid: Uuid,
    start_time: DateTime,
    end_time: DateTime,
    number_of_questions: i32,
    creator_id: Option<Uuid>,
    participants: BTreeSet<Uuid>,
    course_execution: Option<CourseExecution>,
    topic_conjunction: Option<TopicConjunction>,
    quiz_id: Option<Uuid>,
    is_canceled: bool,
    is_private: bool,
    password: Option<String>,
}

#[derive(Debug, Error)]
enum TournamentRowError {
    #[error("tournament row carries a partial course execution reference")]
    PartialCourseExecution,
}

impl Tournament {
    /// Builds a tournament for the creator's single course execution.
    /// Nothing is constructed unless every check passes.
    pub fn new(creator: &User, topics: Vec<Topic>, settings: TournamentSettings, now: DateTime) -> Result<Self, TournamentError> {
        let start_time = Self::validated_start_time(settings.start_time, settings.end_time, now)?;
        let end_time = Self::validated_end_time(settings.end_time, Some(start_time))?;
        let number_of_questions = Self::validated_question_count(settings.number_of_questions)?;
        let course_execution = Self::single_enrollment(creator)?;
        let topics = Self::validated_topics(topics, Some(course_execution.course_id))?;

        Ok(Tournament {
            uuid: Uuid::new_v4(),
            start_time,
            end_time,
            number_of_questions,
            creator_id: Some(creator.uuid),
            participants: BTreeSet::new(),
            course_execution: Some(course_execution),
            topic_conjunction: Some(TopicConjunction::new(topics)),
            quiz_id: None,
            is_canceled: settings.is_canceled,
            is_private: settings.is_private,
            password: settings.password,
        })
    }

    fn validated_start_time(start_time: Option<DateTime>, end_time: Option<DateTime>, now: DateTime) -> Result<DateTime, TournamentError> {
        let start_time = start_time.ok_or(TournamentError::InconsistentSchedule { field: "start_time" })?;

        // Grace buffer: starts up to one minute in the past still pass.
        if start_time + Duration::minutes(1) < now {
            return Err(TournamentError::InconsistentSchedule { field: "start_time" });
        }

        if let Some(end_time) = end_time {
            if end_time < start_time {
                return Err(TournamentError::InconsistentSchedule { field: "start_time" });
            }
        }

        Ok(start_time)
    }

    fn validated_end_time(end_time: Option<DateTime>, start_time: Option<DateTime>) -> Result<DateTime, TournamentError> {
        let end_time = end_time.ok_or(TournamentError::InconsistentSchedule { field: "end_time" })?;

        if let Some(start_time) = start_time {
            if end_time < start_time {
                return Err(TournamentError::InconsistentSchedule { field: "end_time" });
            }
        }

        Ok(end_time)
    }

    fn validated_question_count(number_of_questions: i32) -> Result<i32, TournamentError> {
        if number_of_questions <= 0 {
            return Err(TournamentError::InconsistentQuestionCount);
        }
        Ok(number_of_questions)
    }

    fn single_enrollment(user: &User) -> Result<CourseExecution, TournamentError> {
        let mut enrollments = user.course_executions.iter();
        let enrollment = enrollments.next().ok_or(TournamentError::MissingEnrollment(user.uuid))?;
        if enrollments.next().is_some() {
            return Err(TournamentError::AmbiguousEnrollment(user.uuid));
        }
        Ok(enrollment.clone())
    }

    fn validated_topics(topics: Vec<Topic>, course_id: Option<Uuid>) -> Result<Vec<Topic>, TournamentError> {
        if topics.is_empty() {
            return Err(TournamentError::EmptyTopicSet);
        }
        for topic in &topics {
            if Some(topic.course_id) != course_id {
                return Err(TournamentError::TopicCourseMismatch(topic.uuid));
            }
        }
        Ok(topics)
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn start_time(&self) -> DateTime {
        self.start_time
    }

    /// Re-validated against the currently stored end time. The stored
    /// value is untouched when validation fails.
    pub fn set_start_time(&mut self, start_time: Option<DateTime>, now: DateTime) -> Result<(), TournamentError> {
        self.start_time = Self::validated_start_time(start_time, Some(self.end_time), now)?;
        Ok(())
    }

    pub fn end_time(&self) -> DateTime {
        self.end_time
    }

    pub fn set_end_time(&mut self, end_time: Option<DateTime>) -> Result<(), TournamentError> {
        self.end_time = Self::validated_end_time(end_time, Some(self.start_time))?;
        Ok(())
    }

    pub fn number_of_questions(&self) -> i32 {
        self.number_of_questions
    }

    pub fn set_number_of_questions(&mut self, number_of_questions: i32) -> Result<(), TournamentError> {
        self.number_of_questions = Self::validated_question_count(number_of_questions)?;
        Ok(())
    }

    pub fn creator_id(&self) -> Option<Uuid> {
        self.creator_id
    }

    pub fn participants(&self) -> &BTreeSet<Uuid> {
        &self.participants
    }

    pub fn course_execution(&self) -> Option<&CourseExecution> {
        self.course_execution.as_ref()
    }

    pub fn topic_conjunction(&self) -> Option<&TopicConjunction> {
        self.topic_conjunction.as_ref()
    }

    pub fn update_topics(&mut self, new_topics: Vec<Topic>) -> Result<(), TournamentError> {
        let course_id = self.course_execution.as_ref().map(|course_execution| course_execution.course_id);
        let new_topics = Self::validated_topics(new_topics, course_id)?;

        if let Some(conjunction) = self.topic_conjunction.as_mut() {
            conjunction.replace_topics(new_topics);
        }
        Ok(())
    }

    // Membership is recorded on both sides in one call. Set semantics;
    // adding twice is a no-op.
    pub fn add_participant(&mut self, user: &mut User) {
        self.participants.insert(user.uuid);
        user.tournaments.insert(self.uuid);
    }

    pub fn remove_participant(&mut self, user: &mut User) {
        self.participants.remove(&user.uuid);
        user.tournaments.remove(&self.uuid);
    }

    pub fn quiz_id(&self) -> Option<Uuid> {
        self.quiz_id
    }

    pub fn set_quiz_id(&mut self, quiz_id: Option<Uuid>) {
        self.quiz_id = quiz_id;
    }

    pub fn has_quiz(&self) -> bool {
        self.quiz_id.is_some()
    }

    pub fn is_canceled(&self) -> bool {
        self.is_canceled
    }

    // There is no way back.
    pub fn cancel(&mut self) {
        self.is_canceled = true;
    }

    pub fn is_private(&self) -> bool {
        self.is_private
    }

    pub fn set_private(&mut self, is_private: bool) {
        self.is_private = is_private;
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn set_password(&mut self, password: Option<String>) {
        self.password = password;
    }

    pub fn status(&self, now: DateTime) -> TournamentStatus {
        if now < self.start_time {
            TournamentStatus::Scheduled
        } else if now < self.end_time {
            TournamentStatus::Open
        } else {
            TournamentStatus::Closed
        }
    }

    pub fn is_open(&self, now: DateTime) -> bool {
        self.status(now) == TournamentStatus::Open
    }

    pub fn is_closed(&self, now: DateTime) -> bool {
        self.status(now) == TournamentStatus::Closed
    }

    pub fn check_creator(&self, user: &User) -> Result<(), TournamentError> {
        if self.creator_id != Some(user.uuid) {
            return Err(TournamentError::NotCreator(user.uuid));
        }
        Ok(())
    }

    /// Edit-window check. Scheduled tournaments may always change; open
    /// ones never; closed ones only while no answer has been recorded.
    pub fn check_can_change(&self, number_of_answers: i32, now: DateTime) -> Result<(), TournamentError> {
        match self.status(now) {
            TournamentStatus::Scheduled => Ok(()),
            TournamentStatus::Open => Err(TournamentError::TournamentIsOpen(self.uuid)),
            TournamentStatus::Closed if number_of_answers == 0 => Ok(()),
            TournamentStatus::Closed => Err(TournamentError::TournamentAlreadyClosed(self.uuid)),
        }
    }

    /// Full detachment ahead of record deletion: severs the creator and
    /// course execution, erases the membership from every supplied
    /// participant, and drops the owned conjunction.
    pub fn remove<'a>(&mut self, participants: impl IntoIterator<Item = &'a mut User>) {
        self.creator_id = None;
        self.course_execution = None;

        for participant in participants {
            participant.tournaments.remove(&self.uuid);
        }
        self.participants.clear();

        self.topic_conjunction = None;
    }

    pub fn from_rows(
        tournament: schema::tournament::Model,
        participants: Vec<schema::tournament_participant::Model>,
        conjunction: Option<(schema::topic_conjunction::Model, Vec<schema::topic_conjunction_topic::Model>)>,
    ) -> Result<Self, anyhow::Error> {
        let course_execution = match (tournament.course_execution_id, tournament.course_id) {
            (Some(uuid), Some(course_id)) => Some(CourseExecution { uuid, course_id }),
            (None, None) => None,
            _ => return Err(TournamentRowError::PartialCourseExecution.into()),
        };

        let topic_conjunction = conjunction.map(|(conjunction, topic_rows)| {
            let topics = topic_rows
                .into_iter()
                .sorted_by_key(|row| row.topic_id)
                .map(|row| Topic {
                    uuid: row.topic_id,
                    name: row.name,
                    course_id: row.course_id,
                })
                .collect();
            TopicConjunction::from_rows(conjunction.uuid, topics)
        });

        Ok(Tournament {
            uuid: tournament.uuid,
            start_time: tournament.start_time,
            end_time: tournament.end_time,
            number_of_questions: tournament.number_of_questions,
            creator_id: tournament.creator_id,
            participants: participants.into_iter().map(|row| row.user_id).collect(),
            course_execution,
            topic_conjunction,
            quiz_id: tournament.quiz_id,
            is_canceled: tournament.is_canceled,
            is_private: tournament.is_private,
            password: tournament.password,
        })
    }

    pub(crate) async fn load_from_rows<C>(db: &C, rows: Vec<schema::tournament::Model>) -> Result<Vec<Tournament>, anyhow::Error> where C: ConnectionTrait {
        let participants = rows.load_many(schema::tournament_participant::Entity, db).await?;
        let conjunctions = rows.load_one(schema::topic_conjunction::Entity, db).await?;

        let conjunction_models = conjunctions.iter().flatten().cloned().collect::<Vec<_>>();
        let topic_rows = conjunction_models.load_many(schema::topic_conjunction_topic::Entity, db).await?;
        let mut topic_rows_by_conjunction: HashMap<Uuid, Vec<schema::topic_conjunction_topic::Model>> =
            izip!(conjunction_models, topic_rows)
                .map(|(conjunction, topic_rows)| (conjunction.uuid, topic_rows))
                .collect();

        izip!(rows, participants, conjunctions)
            .map(|(row, participant_rows, conjunction)| {
                let conjunction = conjunction.map(|conjunction| {
                    let topic_rows = topic_rows_by_conjunction.remove(&conjunction.uuid).unwrap_or_default();
                    (conjunction, topic_rows)
                });
                Self::from_rows(row, participant_rows, conjunction)
            })
            .collect()
    }
}

fn pad<E>(vec: Vec<E>, mask: &[bool]) -> Vec<Option<E>> {
    let mut out = vec![];
    let mut it = vec.into_iter();
    for &exists in mask {
        if exists {
            out.push(it.next());
        } else {
            out.push(None);
        }
    }
    out
}

#[async_trait]
impl LoadEntity for Tournament {
    async fn try_get_many<C>(db: &C, uuids: Vec<Uuid>) -> Result<Vec<Option<Self>>, anyhow::Error> where C: ConnectionTrait {
        let rows = schema::tournament::Entity::batch_load(db, uuids).await?;
        let exists_mask = rows.iter().map(|row| row.is_some()).collect::<Vec<_>>();

        let rows = rows.into_iter().flatten().collect::<Vec<_>>();
        let tournaments = Self::load_from_rows(db, rows).await?;

        Ok(pad(tournaments, &exists_mask))
    }
}

#[async_trait]
impl CourseExecutionEntity for Tournament {
    async fn save<C>(&self, db: &C, guarantee_insert: bool) -> Result<(), anyhow::Error> where C: ConnectionTrait {
        let model = schema::tournament::ActiveModel {
            uuid: ActiveValue::Set(self.uuid),
            start_time: ActiveValue::Set(self.start_time),
            end_time: ActiveValue::Set(self.end_time),
            number_of_questions: ActiveValue::Set(self.number_of_questions),
            creator_id: ActiveValue::Set(self.creator_id),
            course_execution_id: ActiveValue::Set(self.course_execution.as_ref().map(|course_execution| course_execution.uuid)),
            course_id: ActiveValue::Set(self.course_execution.as_ref().map(|course_execution| course_execution.course_id)),
            quiz_id: ActiveValue::Set(self.quiz_id),
            is_canceled: ActiveValue::Set(self.is_canceled),
            is_private: ActiveValue::Set(self.is_private),
            password: ActiveValue::Set(self.password.clone()),
        };

        if guarantee_insert {
            model.insert(db).await?;
        }
        else {
            let prev_model = schema::tournament::Entity::find_by_id(self.uuid).one(db).await?;

            if prev_model.is_some() {
                model.update(db).await?;
            } else {
                model.insert(db).await?;
            }
        }

        let new_participant_rows = self.participants.iter().map(|user_id| {
            schema::tournament_participant::ActiveModel {
                tournament_id: ActiveValue::Set(self.uuid),
                user_id: ActiveValue::Set(*user_id),
            }
        }).collect_vec();

        if guarantee_insert {
            if !new_participant_rows.is_empty() {
                schema::tournament_participant::Entity::insert_many(new_participant_rows).exec(db).await?;
            }
        } else {
            let prev_rows = schema::tournament_participant::Entity::find()
                .filter(schema::tournament_participant::Column::TournamentId.eq(self.uuid))
                .all(db)
                .await?;

            let to_delete = prev_rows.iter()
                .filter(|row| !self.participants.contains(&row.user_id))
                .map(|row| row.user_id)
                .collect_vec();

            if !to_delete.is_empty() {
                schema::tournament_participant::Entity::delete_many().filter(
                    schema::tournament_participant::Column::TournamentId.eq(self.uuid)
                        .and(schema::tournament_participant::Column::UserId.is_in(to_delete))
                ).exec(db).await?;
            }

            let to_insert = new_participant_rows.into_iter().filter(|row| {
                !prev_rows.iter().any(|prev| prev.user_id == *row.user_id.as_ref())
            }).collect_vec();

            if !to_insert.is_empty() {
                schema::tournament_participant::Entity::insert_many(to_insert).exec(db).await?;
            }
        }

        match &self.topic_conjunction {
            Some(conjunction) => {
                let conjunction_model = schema::topic_conjunction::ActiveModel {
                    uuid: ActiveValue::Set(conjunction.uuid()),
                    tournament_id: ActiveValue::Set(self.uuid),
                };

                if guarantee_insert {
                    conjunction_model.insert(db).await?;
                } else {
                    let prev_model = schema::topic_conjunction::Entity::find_by_id(conjunction.uuid()).one(db).await?;

                    if prev_model.is_some() {
                        conjunction_model.update(db).await?;
                    } else {
                        conjunction_model.insert(db).await?;
                    }
                }

                let new_topic_rows = conjunction.topics().iter().map(|topic| {
                    schema::topic_conjunction_topic::ActiveModel {
                        conjunction_id: ActiveValue::Set(conjunction.uuid()),
                        topic_id: ActiveValue::Set(topic.uuid),
                        course_id: ActiveValue::Set(topic.course_id),
                        name: ActiveValue::Set(topic.name.clone()),
                    }
                }).collect_vec();

                if guarantee_insert {
                    if !new_topic_rows.is_empty() {
                        schema::topic_conjunction_topic::Entity::insert_many(new_topic_rows).exec(db).await?;
                    }
                } else {
                    let prev_topic_rows = schema::topic_conjunction_topic::Entity::find()
                        .filter(schema::topic_conjunction_topic::Column::ConjunctionId.eq(conjunction.uuid()))
                        .all(db)
                        .await?;

                    let to_delete = prev_topic_rows.iter()
                        .filter(|row| !conjunction.topics().iter().any(|topic| topic.uuid == row.topic_id))
                        .map(|row| row.topic_id)
                        .collect_vec();

                    if !to_delete.is_empty() {
                        schema::topic_conjunction_topic::Entity::delete_many().filter(
                            schema::topic_conjunction_topic::Column::ConjunctionId.eq(conjunction.uuid())
                                .and(schema::topic_conjunction_topic::Column::TopicId.is_in(to_delete))
                        ).exec(db).await?;
                    }

                    for topic in conjunction.topics() {
                        match prev_topic_rows.iter().find(|row| row.topic_id == topic.uuid) {
                            Some(prev_row) => {
                                if prev_row.name != topic.name || prev_row.course_id != topic.course_id {
                                    schema::topic_conjunction_topic::ActiveModel {
                                        conjunction_id: ActiveValue::Unchanged(conjunction.uuid()),
                                        topic_id: ActiveValue::Unchanged(topic.uuid),
                                        course_id: ActiveValue::Set(topic.course_id),
                                        name: ActiveValue::Set(topic.name.clone()),
                                    }.update(db).await?;
                                }
                            }
                            None => {
                                schema::topic_conjunction_topic::ActiveModel {
                                    conjunction_id: ActiveValue::Set(conjunction.uuid()),
                                    topic_id: ActiveValue::Set(topic.uuid),
                                    course_id: ActiveValue::Set(topic.course_id),
                                    name: ActiveValue::Set(topic.name.clone()),
                                }.insert(db).await?;
                            }
                        }
                    }
                }
            }
            None => {
                // Conjunction topic rows go with it through the cascade.
                schema::topic_conjunction::Entity::delete_many()
                    .filter(schema::topic_conjunction::Column::TournamentId.eq(self.uuid))
                    .exec(db).await?;
            }
        }

        Ok(())
    }

    async fn get_many_course_executions<C>(_db: &C, entities: &Vec<&Self>) -> Result<Vec<Option<Uuid>>, anyhow::Error> where C: ConnectionTrait {
        Ok(entities.iter().map(|tournament| {
            tournament.course_execution.as_ref().map(|course_execution| course_execution.uuid)
        }).collect())
    }

    async fn delete_many<C>(db: &C, ids: Vec<Uuid>) -> Result<(), anyhow::Error> where C: ConnectionTrait {
        schema::tournament::Entity::delete_many().filter(schema::tournament::Column::Uuid.is_in(ids)).exec(db).await?;
        Ok(())
    }
}

#[cfg(test)]
fn test_now() -> DateTime {
    chrono::NaiveDate::from_ymd_opt(2026, 3, 14).unwrap().and_hms_opt(12, 0, 0).unwrap()
}

#[cfg(test)]
fn test_course_execution() -> CourseExecution {
    CourseExecution {
        uuid: Uuid::from_u128(11),
        course_id: Uuid::from_u128(10),
    }
}

#[cfg(test)]
fn test_creator() -> User {
    User {
        uuid: Uuid::from_u128(100),
        name: "Creator".into(),
        course_executions: vec![test_course_execution()],
        tournaments: BTreeSet::new(),
    }
}

#[cfg(test)]
fn test_topics() -> Vec<Topic> {
    vec![
        Topic {
            uuid: Uuid::from_u128(300),
            name: "Graphs".into(),
            course_id: Uuid::from_u128(10),
        },
        Topic {
            uuid: Uuid::from_u128(301),
            name: "Sorting".into(),
            course_id: Uuid::from_u128(10),
        },
    ]
}

#[cfg(test)]
fn test_settings(now: DateTime) -> TournamentSettings {
    TournamentSettings {
        start_time: Some(now + Duration::hours(2)),
        end_time: Some(now + Duration::hours(3)),
        number_of_questions: 10,
        ..Default::default()
    }
}

#[cfg(test)]
fn test_tournament() -> Tournament {
    Tournament::new(&test_creator(), test_topics(), test_settings(test_now()), test_now()).unwrap()
}

#[test]
fn test_new_binds_creator_course_and_topics() {
    let tournament = test_tournament();

    assert_eq!(tournament.creator_id(), Some(Uuid::from_u128(100)));
    assert_eq!(tournament.course_execution(), Some(&test_course_execution()));
    assert_eq!(tournament.number_of_questions(), 10);
    assert_eq!(tournament.topic_conjunction().unwrap().topics(), &test_topics()[..]);
    assert!(tournament.participants().is_empty());
    assert!(!tournament.is_canceled());
    assert!(!tournament.has_quiz());
}

#[test]
fn test_new_rejects_missing_start_time() {
    let mut settings = test_settings(test_now());
    settings.start_time = None;

    let result = Tournament::new(&test_creator(), test_topics(), settings, test_now());
    assert_eq!(result.unwrap_err(), TournamentError::InconsistentSchedule { field: "start_time" });
}

#[test]
fn test_new_rejects_start_time_in_the_past() {
    let now = test_now();
    let mut settings = test_settings(now);
    settings.start_time = Some(now - Duration::minutes(2));

    let result = Tournament::new(&test_creator(), test_topics(), settings, now);
    assert_eq!(result.unwrap_err(), TournamentError::InconsistentSchedule { field: "start_time" });
}

#[test]
fn test_new_accepts_start_time_within_grace_buffer() {
    let now = test_now();
    let mut settings = test_settings(now);
    settings.start_time = Some(now - Duration::seconds(59));

    assert!(Tournament::new(&test_creator(), test_topics(), settings, now).is_ok());
}

#[test]
fn test_new_rejects_missing_end_time() {
    let mut settings = test_settings(test_now());
    settings.end_time = None;

    let result = Tournament::new(&test_creator(), test_topics(), settings, test_now());
    assert_eq!(result.unwrap_err(), TournamentError::InconsistentSchedule { field: "end_time" });
}

#[test]
fn test_new_rejects_end_before_start() {
    let now = test_now();
    let mut settings = test_settings(now);
    settings.end_time = Some(now + Duration::hours(1));

    let result = Tournament::new(&test_creator(), test_topics(), settings, now);
    assert_eq!(result.unwrap_err(), TournamentError::InconsistentSchedule { field: "start_time" });
}

#[test]
fn test_new_rejects_non_positive_question_count() {
    let now = test_now();

    for number_of_questions in [0, -1, -10] {
        let mut settings = test_settings(now);
        settings.number_of_questions = number_of_questions;

        let result = Tournament::new(&test_creator(), test_topics(), settings, now);
        assert_eq!(result.unwrap_err(), TournamentError::InconsistentQuestionCount);
    }
}

#[test]
fn test_new_rejects_unenrolled_creator() {
    let mut creator = test_creator();
    creator.course_executions.clear();

    let result = Tournament::new(&creator, test_topics(), test_settings(test_now()), test_now());
    assert_eq!(result.unwrap_err(), TournamentError::MissingEnrollment(creator.uuid));
}

#[test]
fn test_new_rejects_ambiguous_enrollment() {
    let mut creator = test_creator();
    creator.course_executions.push(CourseExecution {
        uuid: Uuid::from_u128(12),
        course_id: Uuid::from_u128(20),
    });

    let result = Tournament::new(&creator, test_topics(), test_settings(test_now()), test_now());
    assert_eq!(result.unwrap_err(), TournamentError::AmbiguousEnrollment(creator.uuid));
}

#[test]
fn test_new_rejects_empty_topic_set() {
    let result = Tournament::new(&test_creator(), vec![], test_settings(test_now()), test_now());
    assert_eq!(result.unwrap_err(), TournamentError::EmptyTopicSet);
}

#[test]
fn test_new_rejects_topic_from_other_course() {
    let mut topics = test_topics();
    topics.push(Topic {
        uuid: Uuid::from_u128(310),
        name: "Other".into(),
        course_id: Uuid::from_u128(20),
    });

    let result = Tournament::new(&test_creator(), topics, test_settings(test_now()), test_now());
    assert_eq!(result.unwrap_err(), TournamentError::TopicCourseMismatch(Uuid::from_u128(310)));
}

#[test]
fn test_set_start_time_checks_stored_end_time() {
    let now = test_now();
    let mut tournament = test_tournament();
    let prev_start = tournament.start_time();

    let result = tournament.set_start_time(Some(now + Duration::hours(4)), now);
    assert_eq!(result.unwrap_err(), TournamentError::InconsistentSchedule { field: "start_time" });
    assert_eq!(tournament.start_time(), prev_start);

    tournament.set_start_time(Some(now + Duration::hours(1)), now).unwrap();
    assert_eq!(tournament.start_time(), now + Duration::hours(1));
}

#[test]
fn test_set_end_time_checks_stored_start_time() {
    let now = test_now();
    let mut tournament = test_tournament();
    let prev_end = tournament.end_time();

    let result = tournament.set_end_time(Some(now + Duration::hours(1)));
    assert_eq!(result.unwrap_err(), TournamentError::InconsistentSchedule { field: "end_time" });
    assert_eq!(tournament.end_time(), prev_end);

    let result = tournament.set_end_time(None);
    assert_eq!(result.unwrap_err(), TournamentError::InconsistentSchedule { field: "end_time" });

    tournament.set_end_time(Some(now + Duration::hours(5))).unwrap();
    assert_eq!(tournament.end_time(), now + Duration::hours(5));
}

#[test]
fn test_set_number_of_questions_rejects_non_positive() {
    let mut tournament = test_tournament();

    let result = tournament.set_number_of_questions(0);
    assert_eq!(result.unwrap_err(), TournamentError::InconsistentQuestionCount);
    assert_eq!(tournament.number_of_questions(), 10);

    tournament.set_number_of_questions(5).unwrap();
    assert_eq!(tournament.number_of_questions(), 5);
}

#[test]
fn test_update_topics_rejects_empty_set() {
    let mut tournament = test_tournament();

    let result = tournament.update_topics(vec![]);
    assert_eq!(result.unwrap_err(), TournamentError::EmptyTopicSet);
    assert_eq!(tournament.topic_conjunction().unwrap().topics(), &test_topics()[..]);
}

#[test]
fn test_update_topics_rejects_other_course_and_keeps_prior_set() {
    let mut tournament = test_tournament();

    let foreign_topic = Topic {
        uuid: Uuid::from_u128(310),
        name: "Other".into(),
        course_id: Uuid::from_u128(20),
    };
    let result = tournament.update_topics(vec![test_topics().remove(0), foreign_topic]);
    assert_eq!(result.unwrap_err(), TournamentError::TopicCourseMismatch(Uuid::from_u128(310)));
    assert_eq!(tournament.topic_conjunction().unwrap().topics(), &test_topics()[..]);
}

#[test]
fn test_update_topics_replaces_conjunction_set() {
    let mut tournament = test_tournament();

    let replacement = vec![Topic {
        uuid: Uuid::from_u128(302),
        name: "Trees".into(),
        course_id: Uuid::from_u128(10),
    }];
    tournament.update_topics(replacement.clone()).unwrap();
    assert_eq!(tournament.topic_conjunction().unwrap().topics(), &replacement[..]);
}

#[test]
fn test_participant_round_trip_restores_both_sides() {
    let mut tournament = test_tournament();
    let mut user = User {
        uuid: Uuid::from_u128(200),
        name: "Participant".into(),
        course_executions: vec![test_course_execution()],
        tournaments: BTreeSet::new(),
    };

    tournament.add_participant(&mut user);
    assert!(tournament.participants().contains(&user.uuid));
    assert!(user.tournaments.contains(&tournament.uuid()));

    // A second add is a no-op under set semantics.
    tournament.add_participant(&mut user);
    assert_eq!(tournament.participants().len(), 1);
    assert_eq!(user.tournaments.len(), 1);

    tournament.remove_participant(&mut user);
    assert!(tournament.participants().is_empty());
    assert!(user.tournaments.is_empty());
}

#[test]
fn test_cancel_is_idempotent() {
    let mut tournament = test_tournament();
    assert!(!tournament.is_canceled());

    tournament.cancel();
    assert!(tournament.is_canceled());

    tournament.cancel();
    assert!(tournament.is_canceled());
}

#[test]
fn test_check_creator() {
    let tournament = test_tournament();

    assert!(tournament.check_creator(&test_creator()).is_ok());

    let other = User {
        uuid: Uuid::from_u128(101),
        name: "Other".into(),
        course_executions: vec![test_course_execution()],
        tournaments: BTreeSet::new(),
    };
    assert_eq!(tournament.check_creator(&other).unwrap_err(), TournamentError::NotCreator(other.uuid));
}

#[test]
fn test_status_follows_the_schedule() {
    let now = test_now();
    let tournament = test_tournament();

    assert_eq!(tournament.status(now), TournamentStatus::Scheduled);
    assert_eq!(tournament.status(tournament.start_time()), TournamentStatus::Open);
    assert_eq!(tournament.status(now + Duration::hours(2) + Duration::minutes(30)), TournamentStatus::Open);
    assert_eq!(tournament.status(tournament.end_time()), TournamentStatus::Closed);
    assert_eq!(tournament.status(now + Duration::hours(4)), TournamentStatus::Closed);
}

#[test]
fn test_check_can_change_while_scheduled() {
    let tournament = test_tournament();
    assert!(tournament.check_can_change(0, test_now()).is_ok());
}

#[test]
fn test_check_can_change_while_open() {
    let tournament = test_tournament();
    let within_window = test_now() + Duration::hours(2) + Duration::minutes(30);

    let result = tournament.check_can_change(0, within_window);
    assert_eq!(result.unwrap_err(), TournamentError::TournamentIsOpen(tournament.uuid()));
}

#[test]
fn test_check_can_change_after_close_depends_on_answers() {
    let tournament = test_tournament();
    let after_window = test_now() + Duration::hours(4);

    assert!(tournament.check_can_change(0, after_window).is_ok());

    let result = tournament.check_can_change(1, after_window);
    assert_eq!(result.unwrap_err(), TournamentError::TournamentAlreadyClosed(tournament.uuid()));
}

#[test]
fn test_remove_detaches_everything() {
    let mut tournament = test_tournament();
    let mut user = User {
        uuid: Uuid::from_u128(200),
        name: "Participant".into(),
        course_executions: vec![test_course_execution()],
        tournaments: BTreeSet::new(),
    };
    tournament.add_participant(&mut user);

    tournament.remove([&mut user]);

    assert_eq!(tournament.creator_id(), None);
    assert_eq!(tournament.course_execution(), None);
    assert!(tournament.participants().is_empty());
    assert!(user.tournaments.is_empty());
    assert!(tournament.topic_conjunction().is_none());
}

#[test]
fn test_quiz_linkage() {
    let mut tournament = test_tournament();
    assert!(!tournament.has_quiz());

    tournament.set_quiz_id(Some(Uuid::from_u128(900)));
    assert!(tournament.has_quiz());
    assert_eq!(tournament.quiz_id(), Some(Uuid::from_u128(900)));
}

#[test]
fn test_serde_round_trip() {
    let tournament = test_tournament();

    let serialized = serde_json::to_string(&tournament).unwrap();
    let deserialized: Tournament = serde_json::from_str(&serialized).unwrap();

    assert_eq!(tournament, deserialized);
}
