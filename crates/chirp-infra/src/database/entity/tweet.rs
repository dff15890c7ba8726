//! Tweet entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tweets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub username: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tweet_hashtag::Entity")]
    TweetHashtag,
}

impl Related<super::tweet_hashtag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TweetHashtag.def()
    }
}

impl Related<super::hashtag::Entity> for Entity {
    fn to() -> RelationDef {
        super::tweet_hashtag::Relation::Hashtag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::tweet_hashtag::Relation::Tweet.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
