use feed_application::command::CreateFeedEvent;
use feed_application::command_handler::CommandHandler;
use feed_application::query::GetTimeline;
use feed_application::query_handler::QueryHandler;
use feed_application::{AppContext, FeedConfig, FeedService};
use feed_domain::eventing::{BusinessEvent, EventBus, EventConsumer, InMemoryEventBus};
use feed_domain::ext::ExtendFields;
use feed_domain::feed_event::EventKind;
use feed_domain::graph::InMemorySocialGraph;
use feed_domain::persist::InMemoryFeedEventRepository;
use feed_domain::registry::HandlerRegistry;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = FeedConfig::from_env()?;
    info!(?config, "feed demo starting");

    let repo = Arc::new(InMemoryFeedEventRepository::new());
    let graph = Arc::new(InMemorySocialGraph::new());
    // 2 号是大 V，3 号是普通用户；1 号同时关注两人
    for follower in 1..=(config.article.fanout_threshold + 1) {
        graph.follow(follower, 2).await;
    }
    graph.follow(1, 3).await;

    let registry = HandlerRegistry::with_defaults(repo, graph, config.article)?;
    let service = Arc::new(FeedService::new(Arc::new(registry), config));

    let bus = Arc::new(InMemoryEventBus::new(256));
    let consumer = Arc::new(
        EventConsumer::builder()
            .event_bus(bus.clone())
            .handler(service.clone())
            .build(),
    );
    let handle = consumer.start();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let ctx = AppContext::default().with_request_id("demo");
    CommandHandler::handle(
        service.as_ref(),
        &ctx,
        CreateFeedEvent::new(
            EventKind::Article.as_str(),
            ExtendFields::new().with("uid", "2").with("title", "hello from a hub"),
        ),
    )
    .await?;

    let incoming = [
        BusinessEvent::new(
            EventKind::Article.as_str(),
            ExtendFields::new().with("uid", "3").with("title", "hello from a friend"),
        ),
        BusinessEvent::new(
            EventKind::Like.as_str(),
            ExtendFields::new()
                .with("liked", "1")
                .with("liker", "3")
                .with("biz", "article")
                .with("bizId", "1"),
        ),
        BusinessEvent::new(
            EventKind::Follow.as_str(),
            ExtendFields::new().with("followee", "1").with("follower", "4"),
        ),
    ];
    bus.publish_batch(&incoming).await?;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let timeline = QueryHandler::handle(service.as_ref(), &ctx, GetTimeline::new(1)).await?;
    info!(events = timeline.len(), "timeline fetched");
    println!("{}", serde_json::to_string_pretty(&timeline)?);

    handle.shutdown();
    handle.join().await;
    Ok(())
}
