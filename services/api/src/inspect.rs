use crate::infra::ProgramServices;
use clap::Args;
use program_finder::config::AppConfig;
use program_finder::error::AppError;
use program_finder::requirements::{parse_program_url, FetchError, RequirementsResponse};
use program_finder::search::{build_query, SearchFilters, SearchResponse};
use serde::Serialize;

#[derive(Args, Debug)]
pub(crate) struct RequirementsArgs {
    /// Programme page to inspect (absolute http or https URL)
    pub(crate) url: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SearchArgs {
    /// Subject area, e.g. "computer science"
    #[arg(long)]
    pub(crate) field: Option<String>,
    /// Country or region name (defaults to all)
    #[arg(long)]
    pub(crate) country: Option<String>,
    /// Degree level: master or bachelor (defaults to master)
    #[arg(long)]
    pub(crate) degree: Option<String>,
    /// Restrict to English-taught programmes: yes or no (defaults to yes)
    #[arg(long)]
    pub(crate) english: Option<String>,
}

impl From<SearchArgs> for SearchFilters {
    fn from(args: SearchArgs) -> Self {
        SearchFilters {
            country: args.country,
            field: args.field,
            degree: args.degree,
            english: args.english,
        }
    }
}

pub(crate) async fn run_requirements(args: RequirementsArgs) -> Result<(), AppError> {
    let url = parse_program_url(&args.url)
        .ok_or_else(|| FetchError::InvalidUrl(args.url.clone()))?;

    let config = AppConfig::load()?;
    let services = ProgramServices::from_config(&config)?;
    let record = services.requirements.requirements(&url).await?;

    print_json(&RequirementsResponse::from(record));
    Ok(())
}

pub(crate) async fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let services = ProgramServices::from_config(&config)?;

    let query = build_query(&SearchFilters::from(args));
    println!("Query: {}", query.as_str());
    let items = services.search.search(&query).await?;

    print_json(&SearchResponse {
        items,
        error: None,
        q: Some(query.into_inner()),
    });
    Ok(())
}

fn print_json<T: Serialize>(payload: &T) {
    match serde_json::to_string_pretty(payload) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("Payload unavailable: {err}"),
    }
}
