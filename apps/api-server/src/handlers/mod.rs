//! HTTP handlers and route configuration.

mod health;
mod tweets;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/tweets")
                .route("", web::post().to(tweets::create_tweet))
                .route("", web::get().to(tweets::list_tweets))
                .route("/{tweetId}", web::delete().to(tweets::delete_tweet)),
        );
}
