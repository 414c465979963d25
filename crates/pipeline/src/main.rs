//! Command-line entry point: answer one question and print the result as JSON.
//!
//! ```text
//! querygate "지난 분기 카테고리별 매출은?"
//! QUERYGATE_CONFIG=config.yaml querygate "weekly revenue"
//! ```

use std::time::Duration;

use anyhow::Result;

use querygate_cache::ResponseCache;
use querygate_common::config::AppConfig;
use querygate_common::models::QueryRequest;
use querygate_common::telemetry::init_tracing;
use querygate_pipeline::QueryPipeline;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = match std::env::var("QUERYGATE_CONFIG") {
        Ok(path) => AppConfig::from_file(&path)?,
        Err(_) => AppConfig::default(),
    };

    let question = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if question.trim().is_empty() {
        eprintln!("usage: querygate <question>");
        std::process::exit(2);
    }

    let pipeline = QueryPipeline::new(&config);
    let request = QueryRequest::new(question);

    let result = if config.cache.enabled {
        let cache = ResponseCache::in_memory(
            config.cache.max_entries,
            Duration::from_secs(config.cache.ttl_seconds),
        );
        let result = pipeline.answer_cached(&request, &cache).await;
        cache.close().await;
        result
    } else {
        pipeline.answer(&request).await
    };

    match result {
        Ok(answer) => {
            println!("{}", serde_json::to_string_pretty(&answer)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.to_json());
            std::process::exit(1);
        }
    }
}
