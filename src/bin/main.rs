use chrono::NaiveDate;
use rental_stats::{Aggregate, DatasetLoader, DateInterval, UnmappedPolicy};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "rental-stats", about = "Bike rental dataset summary and aggregation")]
struct Opt {
    /// Path to the rental dataset CSV file
    path: String,
    /// Date column name
    #[structopt(long, default_value = "dteday")]
    date_column: String,
    /// Interval start date (YYYY-MM-DD), defaults to the dataset minimum
    #[structopt(short, long)]
    start: Option<NaiveDate>,
    /// Interval end date (YYYY-MM-DD), defaults to the dataset maximum
    #[structopt(short, long)]
    end: Option<NaiveDate>,
    /// Drop rows with an unmapped category code instead of tagging them
    #[structopt(long)]
    drop_unmapped: bool,
    /// Aggregate for the weather series
    #[structopt(long, default_value = "mean")]
    weather_op: Aggregate,
    /// Save the summary table to a CSV file
    #[structopt(long)]
    csv: Option<String>,
    /// Print the summary table and both series as JSON
    #[structopt(long)]
    json: bool,
    /// Render the two bar charts to SVG files
    #[cfg(feature = "plot")]
    #[structopt(short, long)]
    plot: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let opt = Opt::from_args();

    let dataset = DatasetLoader::default()
        .source(&opt.path)
        .date_column(opt.date_column.as_str())
        .load()?;

    let full = dataset
        .date_range()
        .ok_or("the dataset has no dates to filter on")?;
    let interval = DateInterval::new(
        opt.start.unwrap_or(full.start()),
        opt.end.unwrap_or(full.end()),
    )?;

    let mut filtered = dataset.filter(&interval);
    log::info!("{} of {} records in {}", filtered.len(), dataset.len(), interval);
    let policy = if opt.drop_unmapped {
        UnmappedPolicy::Drop
    } else {
        UnmappedPolicy::Tag
    };
    filtered.map_labels(policy);

    let summary = filtered.summarize();
    let seasons = filtered.aggregate_by("season", "cnt", Aggregate::Mean)?;
    let weather = filtered.aggregate_by("weathersit", "cnt", opt.weather_op)?;

    if opt.json {
        let report = serde_json::json!({
            "interval": {
                "start": interval.start().to_string(),
                "end": interval.end().to_string(),
            },
            "summary": summary,
            "rentals_by_season": seasons,
            "rentals_by_weather": weather,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", summary);
        println!("{}", seasons);
        println!("{}", weather);
    }

    if let Some(filename) = opt.csv {
        summary.to_csv(&filename)?;
    }

    #[cfg(feature = "plot")]
    if opt.plot {
        rental_stats::plot::bar_chart(
            &seasons,
            "Average rentals per season",
            "Season",
            "Average rentals",
            "season.svg",
        );
        rental_stats::plot::bar_chart(
            &weather,
            "Rentals by weather condition",
            "Weather",
            "Rentals",
            "weather.svg",
        );
    }

    Ok(())
}
