use log::info;
use panel_core::QueryFacade;
use serde_json::{json, Value};

use crate::args::Commands;
use crate::CliError;

/// Runs one report against the facade and returns its JSON document.
pub fn run(facade: &QueryFacade, command: &Commands) -> Result<Value, CliError> {
    let value = match command {
        Commands::Quarters { year } => match year {
            Some(year) => serde_json::to_value(facade.list_quarters(*year))?,
            None => serde_json::to_value(facade.panel().quarters())?,
        },
        Commands::Snapshot { year, quarter } => {
            serde_json::to_value(facade.snapshot_for(*year, *quarter))?
        }
        Commands::Distribution {
            year,
            quarter,
            field,
            weighting,
        } => {
            info!("{} distribution by {}", weighting, field);
            let top = facade.top_n_share(*year, *quarter, *field, *weighting, usize::MAX);
            let distribution = match weighting {
                panel::Weighting::EqualWeighted => {
                    serde_json::to_value(facade.category_distribution(*year, *quarter, *field))?
                }
                panel::Weighting::CapWeighted => serde_json::to_value(
                    facade.cap_weighted_distribution(*year, *quarter, *field),
                )?,
            };
            json!({
                "quarter": facade.resolve_quarter(*year, *quarter),
                "field": field,
                "weighting": weighting,
                "distribution": distribution,
                "ranked": top,
            })
        }
        Commands::Concentration { year, quarter, n } => {
            serde_json::to_value(facade.concentration(*year, *quarter, *n))?
        }
        Commands::Turnover => serde_json::to_value(facade.turnover_series())?,
        Commands::Search { query, limit } => {
            serde_json::to_value(facade.search_entities(query, *limit))?
        }
        Commands::Entity { key } => {
            let profile = facade
                .entity_profile(key)
                .ok_or_else(|| CliError::UnknownEntity(key.clone()))?;
            json!({
                "profile": profile,
                "timeseries": facade.entity_timeseries(key),
            })
        }
    };
    Ok(value)
}
