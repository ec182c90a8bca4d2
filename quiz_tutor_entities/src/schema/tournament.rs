use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tournament")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uuid: Uuid,
    pub start_time: DateTime,
    pub end_time: DateTime,
    pub number_of_questions: i32,
    pub creator_id: Option<Uuid>,
    pub course_execution_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    pub quiz_id: Option<Uuid>,
    pub is_canceled: bool,
    pub is_private: bool,
    pub password: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tournament_participant::Entity")]
    TournamentParticipant,
    #[sea_orm(has_one = "super::topic_conjunction::Entity")]
    TopicConjunction,
}

impl Related<super::tournament_participant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TournamentParticipant.def()
    }
}

impl Related<super::topic_conjunction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TopicConjunction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
