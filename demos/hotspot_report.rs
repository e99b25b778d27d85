//! Loads the accident CSV given on the command line and prints the chart summaries
//! and the densest hotspots.
//!
//! cargo run --example hotspot_report -- US_Accidents_March23.csv [row_limit]

use accident_hotspots::{weekday_name, AccidentsError, PointSelection, UsAccidents};
use std::env;
use std::path::PathBuf;
use std::process;

#[tokio::main]
async fn main() -> Result<(), AccidentsError> {
    configure_polars_display();
    let mut args = env::args().skip(1);
    let path = PathBuf::from(
        args.next()
            .unwrap_or_else(|| "US_Accidents_March23.csv".to_string()),
    );
    let row_limit = match parse_row_limit(args.next()) {
        Ok(limit) => limit,
        Err(message) => {
            eprintln!("{}", message);
            process::exit(2);
        }
    };

    let accidents = UsAccidents::load()
        .path(&path)
        .maybe_row_limit(row_limit)
        .call()
        .await?;

    // --- Summaries ---
    let summary = accidents.summary().call();
    println!("Loaded {} accident records", summary.total_records);

    println!("\n--- Accidents by time of day ---");
    for (period, count) in &summary.by_time_of_day {
        println!("{:<10} {}", period.label(), count);
    }

    println!("\n--- Accidents by year ---");
    for (year, count) in &summary.by_year {
        println!("{} {}", year, count);
    }

    println!("\n--- Accidents by hour ---");
    for (hour, count) in &summary.by_hour {
        println!("{:02}:00 {}", hour, count);
    }

    println!("\n--- Accidents by weekday ---");
    for (day, count) in &summary.by_weekday {
        println!("{:<10} {}", weekday_name(*day), count);
    }

    println!("\n--- Top weather conditions ---");
    for (condition, count) in &summary.top_weather {
        println!("{:<25} {}", condition, count);
    }

    println!("\n--- Road features ---");
    println!("{:#?}", summary.road_features);

    // --- Hotspots ---
    let report = accidents
        .hotspots()
        .selection(PointSelection::default())
        .call()?;

    println!(
        "\n--- Top {} hotspots ({} points, {} active cells) ---",
        report.hotspots.len(),
        report.total_points,
        report.statistics.active_cells
    );
    println!(
        "Accidents per active cell: mean {:.2}, max {}, std-dev {:.2}",
        report.statistics.mean, report.statistics.max, report.statistics.std_dev
    );
    println!("{}", report.to_dataframe()?);

    Ok(())
}

fn parse_row_limit(arg: Option<String>) -> Result<Option<usize>, String> {
    arg.map(|raw| {
        raw.parse::<usize>()
            .map_err(|e| format!("Invalid row limit '{}': {}", raw, e))
    })
    .transpose()
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    // show 20 rows
    env::set_var("POLARS_FMT_MAX_ROWS", "20");
}
