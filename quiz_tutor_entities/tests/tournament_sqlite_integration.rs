use std::error::Error;

use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection, DbErr, Statement};
use sea_orm::prelude::*;

use quiz_tutor_entities::mock::{make_mock_course_with_options, make_mock_tournament, MockCourse, MockOption};
use quiz_tutor_entities::prelude::*;
use quiz_tutor_entities::schema;

pub async fn set_up_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    migration::Migrator::up(&db, None).await.unwrap();
    db.execute(Statement::from_sql_and_values(
        db.get_database_backend(),
        "PRAGMA foreign_keys = ON;",
        vec![])
    ).await?;
    Ok(db)
}

fn mock_now() -> DateTime {
    chrono::NaiveDate::from_ymd_opt(2026, 3, 14).unwrap().and_hms_opt(12, 0, 0).unwrap()
}

fn make_course() -> MockCourse {
    make_mock_course_with_options(MockOption {
        deterministic_uuids: true,
        ..Default::default()
    })
}

async fn test_tournament_roundtrip_in_db<C>(db: &C, tournament: Tournament, as_insert: bool) -> Result<(), Box<dyn Error>> where C: ConnectionTrait {
    tournament.save(db, as_insert).await?;

    let saved_tournament = Tournament::get(db, tournament.uuid()).await?;
    assert_eq!(tournament, saved_tournament);

    Ok(())
}

#[tokio::test]
async fn test_tournament_roundtrip() -> Result<(), Box<dyn Error>> {
    let db = set_up_db().await?;
    let course = make_course();

    test_tournament_roundtrip_in_db(&db, make_mock_tournament(&course, mock_now()), true).await?;

    Ok(())
}

#[tokio::test]
async fn test_tournament_roundtrip_with_participants() -> Result<(), Box<dyn Error>> {
    let db = set_up_db().await?;
    let mut course = make_course();
    let mut tournament = make_mock_tournament(&course, mock_now());

    for participant in course.participants.iter_mut().take(2) {
        tournament.add_participant(participant);
    }
    test_tournament_roundtrip_in_db(&db, tournament.clone(), true).await?;

    tournament.remove_participant(&mut course.participants[0]);
    test_tournament_roundtrip_in_db(&db, tournament, false).await?;

    Ok(())
}

#[tokio::test]
async fn test_tournament_edit_roundtrip() -> Result<(), Box<dyn Error>> {
    let db = set_up_db().await?;
    let now = mock_now();
    let course = make_course();
    let mut tournament = make_mock_tournament(&course, now);

    tournament.save(&db, true).await?;

    tournament.set_end_time(Some(now + chrono::Duration::hours(8)))?;
    tournament.set_start_time(Some(now + chrono::Duration::hours(6)), now)?;
    tournament.set_number_of_questions(20)?;
    tournament.set_quiz_id(Some(Uuid::from_u128(900)));
    tournament.set_private(true);
    tournament.set_password(Some("hunter2".into()));
    tournament.cancel();

    test_tournament_roundtrip_in_db(&db, tournament, false).await?;

    Ok(())
}

#[tokio::test]
async fn test_tournament_topic_update_roundtrip() -> Result<(), Box<dyn Error>> {
    let db = set_up_db().await?;
    let course = make_course();
    let mut tournament = make_mock_tournament(&course, mock_now());

    tournament.save(&db, true).await?;

    let mut replacement = vec![course.topics[0].clone()];
    replacement.push(Topic {
        uuid: Uuid::from_u128(310),
        name: "Recursion".into(),
        course_id: course.course_id,
    });
    tournament.update_topics(replacement)?;

    test_tournament_roundtrip_in_db(&db, tournament.clone(), false).await?;

    let topic_rows = schema::topic_conjunction_topic::Entity::find().all(&db).await?;
    assert_eq!(topic_rows.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_tournament_remove_detaches_everything() -> Result<(), Box<dyn Error>> {
    let db = set_up_db().await?;
    let mut course = make_course();
    let mut tournament = make_mock_tournament(&course, mock_now());

    for participant in course.participants.iter_mut() {
        tournament.add_participant(participant);
    }
    tournament.save(&db, true).await?;

    tournament.remove(course.participants.iter_mut());
    tournament.save(&db, false).await?;

    let saved_tournament = Tournament::get(&db, tournament.uuid()).await?;
    assert_eq!(saved_tournament.creator_id(), None);
    assert_eq!(saved_tournament.course_execution(), None);
    assert!(saved_tournament.participants().is_empty());
    assert!(saved_tournament.topic_conjunction().is_none());

    for participant in course.participants.iter() {
        assert!(participant.tournaments.is_empty());
    }

    let participant_rows = schema::tournament_participant::Entity::find().all(&db).await?;
    assert!(participant_rows.is_empty());
    let conjunction_rows = schema::topic_conjunction::Entity::find().all(&db).await?;
    assert!(conjunction_rows.is_empty());
    let topic_rows = schema::topic_conjunction_topic::Entity::find().all(&db).await?;
    assert!(topic_rows.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_tournament_delete_cascades_to_child_rows() -> Result<(), Box<dyn Error>> {
    let db = set_up_db().await?;
    let mut course = make_course();
    let mut tournament = make_mock_tournament(&course, mock_now());

    tournament.add_participant(&mut course.participants[0]);
    tournament.save(&db, true).await?;

    Tournament::delete(&db, tournament.uuid()).await?;

    assert!(Tournament::try_get(&db, tournament.uuid()).await?.is_none());

    let participant_rows = schema::tournament_participant::Entity::find().all(&db).await?;
    assert!(participant_rows.is_empty());
    let conjunction_rows = schema::topic_conjunction::Entity::find().all(&db).await?;
    assert!(conjunction_rows.is_empty());
    let topic_rows = schema::topic_conjunction_topic::Entity::find().all(&db).await?;
    assert!(topic_rows.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_try_get_unknown_tournament() -> Result<(), Box<dyn Error>> {
    let db = set_up_db().await?;

    assert!(Tournament::try_get(&db, Uuid::from_u128(999)).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_get_course_execution_projection_on_entity() -> Result<(), Box<dyn Error>> {
    let db = set_up_db().await?;
    let course = make_course();
    let tournament = make_mock_tournament(&course, mock_now());

    tournament.save(&db, true).await?;

    assert_eq!(tournament.get_course_execution(&db).await?, Some(course.course_execution.uuid));

    Ok(())
}
