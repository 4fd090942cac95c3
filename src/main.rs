use anyhow::Context;
use clap::{Parser, Subcommand};
use property_report::catalog::{seed, InMemoryCatalog, PropertyCatalog};
use property_report::email::templates::format_money;
use property_report::email::{EmailDispatcher, MockEmailDispatcher};
use property_report::error::LeadError;
use property_report::gate::{FileStore, UnlockGate};
use property_report::lead::LeadPipeline;
use property_report::models::{ContactSubmission, LeadSubmission, PropertyDetail};
use property_report::report::{Aggregator, Synthesizer};
use property_report::search::Matcher;
use property_report::view::{RenderPlan, Section};
use property_report::{Config, DetailError};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "property-report", about = "Search properties and unlock their reports")]
struct Cli {
    /// Log what would be emailed instead of sending it
    #[arg(long, global = true)]
    dry_run: bool,

    /// Print machine-readable JSON; locked report sections are left out
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find properties by address, suburb, postcode or city nickname
    Search { query: String },
    /// Show a property report; gated sections stay hidden until unlocked
    Details { id: String },
    /// Request the full report for a property
    Unlock {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        message: Option<String>,
    },
    /// Whether a property's report is unlocked on this machine
    Status { id: String },
    /// Send a general enquiry
    Contact {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
        #[arg(long)]
        phone: Option<String>,
    },
}

struct App {
    config: Config,
    aggregator: Aggregator,
    gate: UnlockGate,
    dispatcher: Arc<dyn EmailDispatcher>,
}

impl App {
    async fn build(config: Config, dry_run: bool) -> anyhow::Result<Self> {
        let catalog: Arc<dyn PropertyCatalog> = match &config.data_path {
            Some(path) => Arc::new(InMemoryCatalog::from_json_file(path).await?),
            None => Arc::new(seed::demo_catalog()),
        };
        info!("📚 Catalog source: {}", catalog.source_name());

        let store = FileStore::open(&config.store_path)
            .await
            .with_context(|| format!("Failed to open unlock store {}", config.store_path.display()))?;

        let dispatcher: Arc<dyn EmailDispatcher> = if dry_run {
            info!("🧪 Dry run: emails are recorded, not sent");
            Arc::new(MockEmailDispatcher::new())
        } else {
            config.email_dispatcher()?
        };

        Ok(Self {
            aggregator: Aggregator::new(catalog, Synthesizer::new(config.synthesis_mode)),
            gate: UnlockGate::new(Arc::new(store)),
            dispatcher,
            config,
        })
    }

    fn pipeline(&self) -> LeadPipeline {
        LeadPipeline::new(self.dispatcher.clone(), self.gate.clone())
            .with_policy(self.config.settlement_policy)
            .with_report_copy(self.config.send_report_copy)
    }

    async fn details(&self, id: &str) -> anyhow::Result<Option<PropertyDetail>> {
        match self.aggregator.get_property_details(id).await {
            Ok(detail) => Ok(Some(detail)),
            Err(DetailError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    info!("🏠 Property Report");
    info!("==================");

    let app = App::build(config, cli.dry_run).await?;

    match cli.command {
        Command::Search { query } => {
            let summaries = app.aggregator.summaries().await?;
            let matcher = Matcher::with_limit(summaries, app.config.search_max_results);
            let results = matcher.search(&query);
            info!("🔎 {} result(s) for {:?}", results.len(), query);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                for (i, summary) in results.iter().enumerate() {
                    println!("{}. {}", i + 1, summary.display_address);
                    println!("   {} · ID: {}", summary.property_type.as_str(), summary.id);
                }
            }
        }

        Command::Details { id } => {
            let Some(detail) = app.details(&id).await? else {
                println!("Property {} was not found. Try another search.", id);
                return Ok(());
            };
            let plan = RenderPlan::new(&detail, app.gate.state(&id).await);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&serde_json::json!({
                    "property": plan.visible_json(&detail)?,
                    "plan": plan,
                }))?);
            } else {
                print_report(&detail, &plan);
            }
        }

        Command::Unlock { id, name, email, phone, message } => {
            let Some(detail) = app.details(&id).await? else {
                println!("Property {} was not found. Try another search.", id);
                return Ok(());
            };

            let form = LeadSubmission {
                phone,
                message,
                property_id: Some(id.clone()),
                ..LeadSubmission::new(name, email)
            };

            match app.pipeline().submit(&form, Some(&detail)).await {
                Ok(receipt) => {
                    info!("✅ Report {} settled for {}", receipt.report_id, id);
                    if let Some(warning) = &receipt.warning {
                        warn!("⚠️  {}", warning);
                    }
                    if cli.json {
                        println!("{}", serde_json::to_string_pretty(&receipt)?);
                    } else if receipt.unlocked {
                        println!("Report unlocked for {}", detail.summary.display_address);
                    }
                }
                Err(LeadError::Validation(errors)) => {
                    for error in errors {
                        println!("   {}: {}", error.field, error.message);
                    }
                    anyhow::bail!("Form has invalid fields");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Command::Status { id } => {
            let state = app.gate.state(&id).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&serde_json::json!({
                    "propertyId": id,
                    "gate": state,
                    "record": app.gate.record(&id).await?,
                }))?);
            } else {
                println!("{}: {:?}", id, state);
            }
        }

        Command::Contact { first_name, last_name, email, message, phone } => {
            let form = ContactSubmission {
                first_name,
                last_name,
                email,
                phone: phone.unwrap_or_default(),
                message,
            };
            let receipt = app.pipeline().submit_contact(&form).await?;
            info!("📨 Enquiry sent");
            if let Some(id) = receipt.message_id {
                println!("Message ID: {}", id);
            }
        }
    }

    Ok(())
}

fn print_report(detail: &PropertyDetail, plan: &RenderPlan) {
    let locked = "🔒 unlock the full report to view";

    println!("{}", detail.summary.display_address);
    if let Some(image) = &plan.preview_image {
        println!("   Preview: {}", image);
    }

    if plan.is_obscured(Section::Features) {
        println!("   Features: {}", locked);
    } else {
        println!(
            "   {} · {} bed · {} bath · {} car{}",
            detail.summary.property_type.as_str(),
            detail.beds,
            detail.baths,
            detail.parking,
            detail.land_size.map(|m| format!(" · {} m²", m)).unwrap_or_default()
        );
    }

    if plan.is_obscured(Section::Estimate) {
        println!("   Estimate: {}", locked);
        return;
    }

    let estimate = &detail.price_estimate;
    println!(
        "   Estimate: {} to {} (mid {})",
        format_money(estimate.low),
        format_money(estimate.high),
        format_money(estimate.mid)
    );
    if let Some(rent) = &detail.rental_estimate {
        println!(
            "   Rent: {} to {} per week, {:.1}% yield",
            format_money(rent.weekly_low),
            format_money(rent.weekly_high),
            rent.gross_yield_percent
        );
    }

    let insights = &detail.suburb_insights;
    println!(
        "   {}: median {}, {:+.1}% growth, {} days on market",
        detail.summary.suburb,
        format_money(insights.median_price),
        insights.growth_percent,
        insights.days_on_market
    );

    println!("   Comparable sales:");
    for sale in &detail.comparables {
        println!("     {} · {} · {}", sale.address, format_money(sale.sale_price), sale.sale_date);
    }
    println!("   Schools:");
    for school in &detail.schools {
        println!("     {} · {:.1} km · {}/10", school.name, school.distance_km, school.rating);
    }
    println!("   Sales history:");
    for sale in &detail.sales_history {
        println!("     {} · {}", sale.sale_date, format_money(sale.sale_price));
    }
}
