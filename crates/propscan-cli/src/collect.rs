//! Collection runners wiring config, clients, and JSON input/output.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::de::DeserializeOwned;

use propscan_core::AppConfig;
use propscan_fetch::FetchConfig;
use propscan_geo::{PostcodeRecord, PostcodeTable};
use propscan_rightmove::{RightmoveClient, SearchFilters, DEFAULT_EXCLUDED_TYPES};
use propscan_tfl::{write_rows_json, Departure, JourneyClient, JourneyResults};

use crate::{JourneysArgs, PropertiesArgs};

fn fetch_config(config: &AppConfig, rate_limit_ms: u64) -> FetchConfig {
    FetchConfig {
        min_interval: Duration::from_millis(rate_limit_ms),
        timeout: Duration::from_secs(config.request_timeout_secs),
        max_retries: config.max_retries,
        user_agent: config.user_agent.clone(),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))
}

fn load_postcode_table(path: &Path) -> anyhow::Result<PostcodeTable> {
    let records: Vec<PostcodeRecord> = read_json(path)?;
    let table = PostcodeTable::from_records(records);
    tracing::info!(postcodes = table.len(), "postcode table loaded");
    Ok(table)
}

pub(crate) async fn run_properties(config: &AppConfig, args: &PropertiesArgs) -> anyhow::Result<()> {
    let table = load_postcode_table(&args.postcodes)?;
    let outcode_codes: HashMap<String, u64> = read_json(&args.outcode_codes)?;

    let client = RightmoveClient::new(&fetch_config(config, config.rightmove_rate_limit_ms), outcode_codes)?
        .with_max_concurrent(config.max_concurrent_targets);
    let filters = SearchFilters {
        min_bedrooms: args.min_bedrooms,
        max_bedrooms: args.max_bedrooms,
        ..SearchFilters::default()
    };

    let outcodes = table.outcodes();
    let mut results = client.search(args.prop_type, &filters, &outcodes).await?;
    results.clean(args.prop_type, DEFAULT_EXCLUDED_TYPES);
    results.estimate_postcodes(&table);
    if let Some(path) = &args.journey_times {
        let journey_times: HashMap<String, f64> = read_json(path)?;
        results.add_journey_times(&journey_times);
    }

    results.write_json(&args.out)?;
    tracing::info!(
        locations = results.len(),
        properties = results.property_count(),
        out = %args.out.display(),
        "property collection written"
    );
    Ok(())
}

pub(crate) async fn run_journeys(config: &AppConfig, args: &JourneysArgs) -> anyhow::Result<()> {
    let app_id = config
        .tfl_app_id
        .as_deref()
        .context("TFL_APP_ID is not set")?;
    let app_key = config
        .tfl_app_key
        .as_deref()
        .context("TFL_APP_KEY is not set")?;

    let table = load_postcode_table(&args.postcodes)?;
    let departure = Departure::new(args.year, args.month, args.day, args.hour)?;

    let client = JourneyClient::new(&fetch_config(config, config.tfl_rate_limit_ms), app_id, app_key)?
        .with_max_concurrent(config.max_concurrent_targets);
    let coord_map = table.to_coord_map();

    let results = if let Some(existing_path) = &args.update {
        let mut existing = JourneyResults::read_json(existing_path)?;
        let fresh = client
            .plan_missing(
                &coord_map,
                &existing.collected_postcodes(),
                &args.destination,
                departure,
            )
            .await?;
        existing.merge(fresh);
        existing
    } else {
        client
            .plan_journeys(&coord_map, &args.destination, departure)
            .await?
    };

    results.write_json(&args.out)?;
    if let Some(rows_path) = &args.rows_out {
        write_rows_json(rows_path, &results.postcode_rows())?;
    }
    tracing::info!(
        postcodes = results.len(),
        out = %args.out.display(),
        "journey collection written"
    );
    Ok(())
}
