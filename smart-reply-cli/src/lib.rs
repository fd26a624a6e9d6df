//! # smart_reply
//!
//! Wiring for the `smart-reply` binary: builds the enrichment sources, the aggregator, the
//! LLM client and the generation transport once from [`AppConfig`], then runs commands.

pub mod cli;
pub mod config;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use contact_match::ContactDirectory;
use context::ContextAggregator;
use llm_client::{LlmClient, OpenAILlmClient};
use reply_core::{GenerationRequest, LearnType, ServiceResult};
use reply_relay::ReplyRelay;
use reply_stream::{
    GenerationOutcome, GenerationTransport, HttpGenerationClient, HttpReplySink, ReplyGenerator,
};
use sentiment::{FallbackClassifier, SentimentAnalyzer, SentimentCache};
use service_client::{
    ContactSource, HttpContactService, HttpSentimentService, HttpStyleService, SentimentSource,
    StyleSource,
};
use style_learner::StyleLearner;
use tracing::info;

pub use cli::{Cli, Commands};
pub use config::AppConfig;

/// The OpenAI client, when an API key is configured.
pub fn build_llm(config: &AppConfig) -> Option<Arc<dyn LlmClient>> {
    config
        .llm
        .as_ref()
        .map(|cfg| Arc::new(OpenAILlmClient::from_config(cfg)) as Arc<dyn LlmClient>)
}

/// HTTP services, or in-process equivalents when `local` is set.
pub fn build_aggregator(config: &AppConfig, local: bool) -> Result<ContextAggregator> {
    let aggregator = if local {
        let mut analyzer = SentimentAnalyzer::new().with_cache(Arc::new(SentimentCache::new()));
        if let Some(llm) = build_llm(config) {
            analyzer = analyzer.with_llm(llm);
        }
        let contacts = match &config.contacts_file {
            Some(path) => ContactDirectory::from_json_file(path)?,
            None => ContactDirectory::default(),
        };
        let sentiment: Arc<dyn SentimentSource> = Arc::new(analyzer);
        let contacts: Arc<dyn ContactSource> = Arc::new(contacts);
        let style: Arc<dyn StyleSource> =
            Arc::new(StyleLearner::open(&config.style_samples_file)?);
        ContextAggregator::new(sentiment, contacts, style)
    } else {
        ContextAggregator::new(
            Arc::new(HttpSentimentService::from_config(&config.services)),
            Arc::new(HttpContactService::from_config(&config.services)),
            Arc::new(HttpStyleService::from_config(&config.services)),
        )
    };
    Ok(aggregator.with_call_timeout(config.services.timeout))
}

/// Relay over HTTP when RELAY_URL is set, otherwise the in-process relay.
pub fn build_generator(
    config: &AppConfig,
    aggregator: Option<Arc<ContextAggregator>>,
) -> Result<ReplyGenerator> {
    if let Some(url) = &config.relay_url {
        info!(relay = %url, "Using HTTP relay");
        let transport: Arc<dyn GenerationTransport> = Arc::new(HttpGenerationClient::new(url));
        return Ok(ReplyGenerator::new(transport).with_sink(Arc::new(HttpReplySink::new(url))));
    }
    let llm = match build_llm(config) {
        Some(llm) => llm,
        None => bail!("Set RELAY_URL or OPENAI_API_KEY to generate replies"),
    };
    let mut relay = ReplyRelay::new(llm);
    if let Some(aggregator) = aggregator {
        relay = relay.with_aggregator(aggregator);
    }
    Ok(ReplyGenerator::new(Arc::new(relay)))
}

pub async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    match cli.command {
        Commands::Classify { message, llm } => classify(&config, &message, llm).await,
        Commands::Context { message } => {
            let aggregator = build_aggregator(&config, cli.local)?;
            let context = aggregator.build(&message).await;
            if context.is_empty() {
                println!("(no context available)");
            } else {
                println!("{}", context);
            }
            Ok(())
        }
        Commands::Suggest {
            message,
            tone,
            intent,
            context,
            conversation_id,
            no_context,
        } => {
            let mut request = GenerationRequest::new(message, tone);
            request.intent = intent;
            request.context = context;
            request.conversation_id = conversation_id;
            let aggregator = if no_context {
                None
            } else {
                Some(Arc::new(build_aggregator(&config, cli.local)?))
            };
            suggest(build_generator(&config, aggregator)?, request).await
        }
        Commands::Learn {
            content,
            learn_type,
        } => learn(&config, cli.local, &content, learn_type).await,
    }
}

async fn classify(config: &AppConfig, message: &str, use_llm: bool) -> Result<()> {
    let verdict = if use_llm {
        let llm = build_llm(config).context("--llm needs OPENAI_API_KEY")?;
        SentimentAnalyzer::new().with_llm(llm).analyze(message).await
    } else {
        FallbackClassifier::new().classify(message)
    };
    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(())
}

async fn suggest(generator: ReplyGenerator, request: GenerationRequest) -> Result<()> {
    let generator = Arc::new(generator);
    let cancel_on_ctrl_c = {
        let generator = generator.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                generator.cancel().await;
            }
        })
    };
    let outcome = generator.generate(request).await;
    cancel_on_ctrl_c.abort();

    match outcome? {
        GenerationOutcome::Completed(generated) => {
            if generated.replies.is_empty() {
                println!("No replies could be parsed from the model output.");
            }
            for reply in &generated.replies {
                println!("{}. {}", reply.index + 1, reply.text);
            }
            if let Some(id) = generated.conversation_id {
                println!("(conversation {})", id);
            }
        }
        GenerationOutcome::Cancelled => println!("Cancelled."),
    }
    Ok(())
}

async fn learn(config: &AppConfig, local: bool, content: &str, learn_type: LearnType) -> Result<()> {
    let result = if local {
        let learner = StyleLearner::open(&config.style_samples_file)?;
        ServiceResult::Success(learner.learn(content, learn_type).await)
    } else {
        HttpStyleService::from_config(&config.services)
            .learn(content, learn_type)
            .await
    };
    match result {
        ServiceResult::Success(true) => println!("Sample accepted."),
        ServiceResult::Success(false) => println!("Sample rejected."),
        ServiceResult::Unavailable | ServiceResult::Timeout => {
            bail!("Style service {}", result.outcome())
        }
    }
    Ok(())
}
