use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "topic_conjunction_topic")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub conjunction_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub topic_id: Uuid,
    pub course_id: Uuid,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::topic_conjunction::Entity",
        from = "Column::ConjunctionId",
        to = "super::topic_conjunction::Column::Uuid",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    TopicConjunction,
}

impl Related<super::topic_conjunction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TopicConjunction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
