use anyhow::Result;
use shared::{
    extract_records, fetch_with_config, place_all, render, Config, DateRange, HtmlFileSink,
    RenderOutcome,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod prompt;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("visualizer=info,shared=info")),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        "Starting NEO visualizer (sampling: {:?}, locale: {:?})",
        config.sphere_sampling, config.locale
    );

    println!("=== NASA Near-Earth Asteroid Visualizer ===");
    let range = {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        prompt::prompt_range(&mut input, &mut output)?
    };

    run(&config, &range).await
}

async fn run(config: &Config, range: &DateRange) -> Result<()> {
    println!(
        "\nLoading data for {} to {} ({} days)...",
        range.start_param(),
        range.end_param(),
        range.days()
    );

    let feed = match fetch_with_config(config, range).await {
        Ok(feed) => feed,
        Err(e) => {
            error!("Feed request failed: {}", e);
            println!("Could not load data ({}). Check the API key and the date range.", e);
            return Ok(());
        }
    };

    let extraction = extract_records(&feed);
    if !extraction.skipped.is_empty() {
        warn!("{} objects could not be read and were skipped", extraction.skipped.len());
    }
    if extraction.is_empty() {
        println!("No asteroids found in the given range.");
        return Ok(());
    }

    println!("\nFound: {} asteroids", extraction.records.len());
    println!("Potentially hazardous: {}", extraction.hazardous_count());
    if !extraction.skipped.is_empty() {
        println!("Skipped (incomplete data): {}", extraction.skipped.len());
    }

    println!("\nBuilding 3D visualization...");
    let placed = place_all(
        &extraction.records,
        config.sphere_sampling,
        &mut rand::thread_rng(),
    );

    let path = config.reports_dir.join(format!(
        "neo_{}_{}.html",
        range.start_param(),
        range.end_param()
    ));
    let sink = HtmlFileSink::new(
        path,
        config.plotly_js_url.clone(),
        config.locale,
        config.open_browser,
    );

    match render(&placed, config.locale, &sink) {
        Ok(RenderOutcome::Rendered(location)) => {
            println!("Visualization written to {}", location.display());
        }
        Ok(RenderOutcome::NoData) => println!("No asteroid data available."),
        Err(e) => {
            error!("Rendering failed: {}", e);
            println!("Could not create the visualization: {}", e);
        }
    }

    Ok(())
}
