use std::collections::BTreeSet;
use std::error::Error;

use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection, DbErr, Statement};
use sea_orm::prelude::*;

use quiz_tutor_entities::prelude::*;
use quiz_tutor_entities::queries;

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

fn make_user(uuid: u128, course_execution: &CourseExecution) -> User {
    User {
        uuid: Uuid::from_u128(uuid),
        name: format!("User {}", uuid),
        course_executions: vec![course_execution.clone()],
        tournaments: BTreeSet::new(),
    }
}

fn make_topic(uuid: u128, course_id: Uuid) -> Topic {
    Topic {
        uuid: Uuid::from_u128(uuid),
        name: format!("Topic {}", uuid),
        course_id,
    }
}

fn make_tournament(creator: &User, topics: Vec<Topic>, start_time: DateTime, end_time: DateTime, created_at: DateTime) -> Tournament {
    Tournament::new(
        creator,
        topics,
        TournamentSettings {
            start_time: Some(start_time),
            end_time: Some(end_time),
            number_of_questions: 5,
            ..Default::default()
        },
        created_at,
    ).unwrap()
}

fn tournament_uuids(tournaments: &[Tournament]) -> BTreeSet<Uuid> {
    tournaments.iter().map(|tournament| tournament.uuid()).collect()
}

struct QueryFixture {
    course_execution_1: CourseExecution,
    course_execution_2: CourseExecution,
    alice: User,
    carol: User,
    closed: Tournament,
    open: Tournament,
    scheduled_canceled: Tournament,
    open_canceled: Tournament,
    closed_canceled: Tournament,
}

/// Five tournaments across two course executions: one in each schedule
/// state, plus canceled ones in the open and closed windows.
async fn set_up_fixture(db: &DatabaseConnection) -> Result<QueryFixture, Box<dyn Error>> {
    let now = mock_now();
    let creation_time = now - chrono::Duration::hours(6);

    let course_execution_1 = CourseExecution {
        uuid: Uuid::from_u128(11),
        course_id: Uuid::from_u128(10),
    };
    let course_execution_2 = CourseExecution {
        uuid: Uuid::from_u128(21),
        course_id: Uuid::from_u128(20),
    };

    let alice = make_user(100, &course_execution_1);
    let bob = make_user(101, &course_execution_2);
    let mut carol = make_user(102, &course_execution_1);

    let topics_1 = vec![make_topic(300, course_execution_1.course_id)];
    let topics_2 = vec![make_topic(400, course_execution_2.course_id)];

    let mut closed = make_tournament(
        &alice,
        topics_1.clone(),
        now - chrono::Duration::hours(2),
        now - chrono::Duration::hours(1),
        creation_time,
    );
    let open = make_tournament(
        &alice,
        topics_1.clone(),
        now - chrono::Duration::minutes(30),
        now + chrono::Duration::minutes(30),
        creation_time,
    );
    let mut scheduled_canceled = make_tournament(
        &alice,
        topics_1.clone(),
        now + chrono::Duration::hours(1),
        now + chrono::Duration::hours(2),
        creation_time,
    );
    let mut open_canceled = make_tournament(
        &bob,
        topics_2.clone(),
        now - chrono::Duration::minutes(30),
        now + chrono::Duration::minutes(30),
        creation_time,
    );
    let mut closed_canceled = make_tournament(
        &bob,
        topics_2.clone(),
        now - chrono::Duration::hours(2),
        now - chrono::Duration::hours(1),
        creation_time,
    );

    scheduled_canceled.cancel();
    open_canceled.cancel();
    closed_canceled.cancel();

    closed.add_participant(&mut carol);
    open_canceled.add_participant(&mut carol);

    for tournament in [&closed, &open, &scheduled_canceled, &open_canceled, &closed_canceled] {
        tournament.save(db, true).await?;
    }

    Ok(QueryFixture {
        course_execution_1,
        course_execution_2,
        alice,
        carol,
        closed,
        open,
        scheduled_canceled,
        open_canceled,
        closed_canceled,
    })
}

#[tokio::test]
async fn test_query_all_for_course_executions() -> Result<(), Box<dyn Error>> {
    let db = set_up_db().await?;
    let fixture = set_up_fixture(&db).await?;

    let result = queries::query_all_for_course_executions(&db, &[fixture.course_execution_1.uuid]).await?;
    assert_eq!(
        tournament_uuids(&result),
        BTreeSet::from([fixture.closed.uuid(), fixture.open.uuid(), fixture.scheduled_canceled.uuid()])
    );

    let result = queries::query_all_for_course_executions(
        &db,
        &[fixture.course_execution_1.uuid, fixture.course_execution_2.uuid],
    ).await?;
    assert_eq!(result.len(), 5);

    Ok(())
}

#[tokio::test]
async fn test_query_open_for_course_executions() -> Result<(), Box<dyn Error>> {
    let db = set_up_db().await?;
    let fixture = set_up_fixture(&db).await?;

    let result = queries::query_open_for_course_executions(
        &db,
        &[fixture.course_execution_1.uuid, fixture.course_execution_2.uuid],
        mock_now(),
    ).await?;

    // The canceled tournament in the same window does not count as open.
    assert_eq!(tournament_uuids(&result), BTreeSet::from([fixture.open.uuid()]));

    Ok(())
}

#[tokio::test]
async fn test_query_open_includes_the_start_instant() -> Result<(), Box<dyn Error>> {
    let db = set_up_db().await?;
    let fixture = set_up_fixture(&db).await?;

    let result = queries::query_open_for_course_executions(
        &db,
        &[fixture.course_execution_1.uuid],
        fixture.open.start_time(),
    ).await?;
    assert!(tournament_uuids(&result).contains(&fixture.open.uuid()));

    let result = queries::query_open_for_course_executions(
        &db,
        &[fixture.course_execution_1.uuid],
        fixture.open.end_time(),
    ).await?;
    assert!(!tournament_uuids(&result).contains(&fixture.open.uuid()));

    Ok(())
}

#[tokio::test]
async fn test_query_closed_for_course_executions() -> Result<(), Box<dyn Error>> {
    let db = set_up_db().await?;
    let fixture = set_up_fixture(&db).await?;

    let result = queries::query_closed_for_course_executions(
        &db,
        &[fixture.course_execution_1.uuid, fixture.course_execution_2.uuid],
        mock_now(),
    ).await?;

    assert_eq!(tournament_uuids(&result), BTreeSet::from([fixture.closed.uuid()]));

    Ok(())
}

#[tokio::test]
async fn test_query_by_creator() -> Result<(), Box<dyn Error>> {
    let db = set_up_db().await?;
    let fixture = set_up_fixture(&db).await?;

    let result = queries::query_by_creator(&db, fixture.alice.uuid).await?;
    assert_eq!(
        tournament_uuids(&result),
        BTreeSet::from([fixture.closed.uuid(), fixture.open.uuid(), fixture.scheduled_canceled.uuid()])
    );

    let result = queries::query_by_creator(&db, Uuid::from_u128(999)).await?;
    assert!(result.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_query_by_participant() -> Result<(), Box<dyn Error>> {
    let db = set_up_db().await?;
    let fixture = set_up_fixture(&db).await?;

    let result = queries::query_by_participant(&db, fixture.carol.uuid).await?;
    assert_eq!(
        tournament_uuids(&result),
        BTreeSet::from([fixture.closed.uuid(), fixture.open_canceled.uuid()])
    );

    Ok(())
}

#[tokio::test]
async fn test_query_for_course_execution() -> Result<(), Box<dyn Error>> {
    let db = set_up_db().await?;
    let fixture = set_up_fixture(&db).await?;

    let result = queries::query_for_course_execution(&db, fixture.course_execution_2.uuid).await?;
    assert_eq!(
        tournament_uuids(&result),
        BTreeSet::from([fixture.open_canceled.uuid(), fixture.closed_canceled.uuid()])
    );

    Ok(())
}

#[tokio::test]
async fn test_query_course_execution_id_projection() -> Result<(), Box<dyn Error>> {
    let db = set_up_db().await?;
    let fixture = set_up_fixture(&db).await?;

    let result = queries::query_course_execution_id(&db, fixture.closed.uuid()).await?;
    assert_eq!(result, Some(fixture.course_execution_1.uuid));

    let result = queries::query_course_execution_id(&db, Uuid::from_u128(999)).await?;
    assert_eq!(result, None);

    Ok(())
}
