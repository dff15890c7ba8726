//! HashTag entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "hashtags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub tag: String,
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

impl Related<super::tweet::Entity> for Entity {
    fn to() -> RelationDef {
        super::tweet_hashtag::Relation::Tweet.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::tweet_hashtag::Relation::Hashtag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to the domain entity.
impl From<Model> for chirp_core::domain::HashTag {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            tag: model.tag,
        }
    }
}
