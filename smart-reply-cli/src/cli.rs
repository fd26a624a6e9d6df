//! Command-line arguments.

use clap::{Parser, Subcommand};
use reply_core::{LearnType, Tone};

#[derive(Parser)]
#[command(name = "smart-reply")]
#[command(about = "Smart-reply assistant: context, sentiment and reply suggestions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Use in-process sentiment, contact and style logic instead of the HTTP services.
    #[arg(long, global = true)]
    pub local: bool,

    /// Mirror log events to stderr. They always go to LOG_FILE.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a message with the heuristic classifier (or the LLM with --llm).
    Classify {
        message: String,
        #[arg(long)]
        llm: bool,
    },
    /// Print the enhanced context built for a message.
    Context { message: String },
    /// Generate three reply suggestions. Ctrl-C cancels.
    Suggest {
        message: String,
        #[arg(short, long, default_value = "friendly")]
        tone: Tone,
        /// What the reply should accomplish.
        #[arg(short, long)]
        intent: Option<String>,
        /// Context to use instead of building it.
        #[arg(long)]
        context: Option<String>,
        #[arg(long)]
        conversation_id: Option<String>,
        /// Skip context aggregation.
        #[arg(long)]
        no_context: bool,
    },
    /// Submit a writing sample to the style service.
    Learn {
        content: String,
        #[arg(short = 't', long = "type", default_value = "sent_message")]
        learn_type: LearnType,
    },
}
