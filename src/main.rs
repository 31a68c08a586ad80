// SPDX-License-Identifier: MIT

use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use scribe_rs::adk::model::Provider;
use scribe_rs::scribe::interactive::prompt_request;
use scribe_rs::scribe::state::parse_tags;
use scribe_rs::scribe::{ArticleRequest, ArticleWorkflow, ScribeConfig};
use std::io;
use std::path::PathBuf;

/// Generate articles using AI-powered research and writing agents
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None,
    after_help = "Examples:\n  \
        scribe-rs --topic \"Quarterly Tax Planning Tips\"\n  \
        scribe-rs --topic \"Home Office Deduction\" --url \"https://www.irs.gov/businesses/small-businesses-self-employed/home-office-deduction\"\n  \
        scribe-rs --topic \"S-Corp Election Deadline\" --tags \"s-corp,deadlines\" -r \"Include late election relief\"\n  \
        scribe-rs --topic \"Estimated Tax Payments\" --filename \"estimated-taxes-guide.mdx\""
)]
struct Args {
    /// The topic for the article
    #[arg(short, long, required_unless_present = "interactive")]
    topic: Option<String>,

    /// URL to research for article content
    #[arg(short, long)]
    url: Option<String>,

    /// Article category (defaults to the configured category)
    #[arg(short, long)]
    category: Option<String>,

    /// Comma-separated list of tags (e.g. "s-corp,tax-planning,deductions")
    #[arg(long)]
    tags: Option<String>,

    /// Additional requirements or constraints for the article
    #[arg(short, long, default_value = "")]
    requirements: String,

    /// Custom output filename; derived from the article title when omitted
    #[arg(short, long)]
    filename: Option<String>,

    /// Prompt for each field instead of reading flags
    #[arg(short, long)]
    interactive: bool,

    /// Path to a YAML config file (defaults to ./scribe.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the article is written to
    #[arg(long)]
    articles_dir: Option<PathBuf>,

    /// Model used for research
    #[arg(long)]
    research_model: Option<String>,

    /// Model used for writing
    #[arg(long)]
    writing_model: Option<String>,

    /// Model provider (openai, anthropic, gemini); inferred from model names when omitted
    #[arg(long)]
    provider: Option<Provider>,
}

impl Args {
    fn apply_overrides(&self, config: &mut ScribeConfig) {
        if let Some(provider) = self.provider {
            config.provider = Some(provider);
        }
        if let Some(model) = &self.research_model {
            config.research.model = model.clone();
        }
        if let Some(model) = &self.writing_model {
            config.writing.model = model.clone();
        }
        if let Some(dir) = &self.articles_dir {
            config.articles_dir = dir.clone();
        }
    }

    fn to_request(&self, default_category: &str) -> anyhow::Result<ArticleRequest> {
        let topic = self
            .topic
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .context("a non-empty --topic is required")?;

        let mut request = ArticleRequest::new(topic)
            .with_category(self.category.as_deref().unwrap_or(default_category))
            .with_tags(parse_tags(self.tags.as_deref().unwrap_or_default()))
            .with_requirements(self.requirements.clone());
        if let Some(url) = &self.url {
            request = request.with_source_url(url.clone());
        }
        if let Some(filename) = &self.filename {
            request = request.with_filename(filename.clone());
        }
        Ok(request)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config =
        ScribeConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    args.apply_overrides(&mut config);

    let request = if args.interactive {
        let stdin = io::stdin();
        prompt_request(&mut stdin.lock(), &mut io::stdout(), &config.default_category)?
    } else {
        args.to_request(&config.default_category)?
    };

    println!("\nInitializing article generation workflow...\n");
    let workflow = ArticleWorkflow::from_config(&config)?;
    let outcome = workflow.run(request).await;

    if !outcome.state.errors().is_empty() {
        println!("\nNotes from this run:");
        for error in outcome.state.errors() {
            println!("  - {}", error);
        }
    }

    match (&outcome.failure, outcome.state.output_path()) {
        (None, Some(path)) => {
            println!("\nSuccess! Your article has been generated.");
            println!("\nLocation: {}", path.display());
            println!("\nNext steps:");
            println!("  1. Review the generated article");
            println!("  2. Make any necessary edits");
            println!("  3. Commit to your repository");
            Ok(())
        }
        (failure, _) => {
            match failure {
                Some(e) => eprintln!("\nArticle generation failed: {}", e),
                None => eprintln!("\nArticle generation failed: no article was saved"),
            }
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_required_without_interactive() {
        assert!(Args::try_parse_from(["scribe-rs"]).is_err());
        assert!(Args::try_parse_from(["scribe-rs", "-i"]).is_ok());
    }

    #[test]
    fn test_flags_build_request() {
        let args = Args::try_parse_from([
            "scribe-rs",
            "-t",
            "S-Corp Election Deadline",
            "--tags",
            "s-corp, deadlines,,s-corp",
            "-r",
            "Focus on 2024",
            "-u",
            "https://www.irs.gov/x",
        ])
        .unwrap();

        let request = args.to_request("Tax Planning").unwrap();
        assert_eq!(request.topic, "S-Corp Election Deadline");
        assert_eq!(request.category, "Tax Planning");
        assert_eq!(request.tags, vec!["s-corp", "deadlines"]);
        assert_eq!(request.requirements, "Focus on 2024");
        assert_eq!(request.source_url.as_deref(), Some("https://www.irs.gov/x"));
        assert!(request.filename.is_none());
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let args = Args::try_parse_from([
            "scribe-rs",
            "-t",
            "x",
            "--provider",
            "anthropic",
            "--writing-model",
            "claude-sonnet-4-5",
            "--articles-dir",
            "out",
        ])
        .unwrap();

        let mut config = ScribeConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.provider, Some(Provider::Anthropic));
        assert_eq!(config.writing.model, "claude-sonnet-4-5");
        assert_eq!(config.research.model, "gpt-4o-mini");
        assert_eq!(config.articles_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        assert!(Args::try_parse_from(["scribe-rs", "-t", "x", "--provider", "mistral"]).is_err());
    }
}
