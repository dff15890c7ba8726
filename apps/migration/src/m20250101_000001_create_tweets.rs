//! Creates the tweets, hashtags, and tweet_hashtags tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tweets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tweets::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tweets::Username).string().not_null())
                    .col(ColumnDef::new(Tweets::Body).text().not_null())
                    .col(
                        ColumnDef::new(Tweets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Hashtags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Hashtags::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Hashtags::Tag)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TweetHashtags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TweetHashtags::TweetId).uuid().not_null())
                    .col(ColumnDef::new(TweetHashtags::HashtagId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(TweetHashtags::TweetId)
                            .col(TweetHashtags::HashtagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tweet_hashtags_tweet")
                            .from(TweetHashtags::Table, TweetHashtags::TweetId)
                            .to(Tweets::Table, Tweets::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tweet_hashtags_hashtag")
                            .from(TweetHashtags::Table, TweetHashtags::HashtagId)
                            .to(Hashtags::Table, Hashtags::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The list paths order and filter on these.
        manager
            .create_index(
                Index::create()
                    .name("idx_tweets_created_at")
                    .table(Tweets::Table)
                    .col(Tweets::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tweets_username")
                    .table(Tweets::Table)
                    .col(Tweets::Username)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TweetHashtags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Hashtags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tweets::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tweets {
    Table,
    Id,
    Username,
    Body,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Hashtags {
    Table,
    Id,
    Tag,
}

#[derive(DeriveIden)]
enum TweetHashtags {
    Table,
    TweetId,
    HashtagId,
}
