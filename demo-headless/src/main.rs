use clap::{Parser, ValueEnum};
use ecoclimate_core::{
    ClimateConfig, ClimateLibrary, FormatCatalog, Granularity, InputLayout, ParseRequest,
    ZoneClimate, ZoneRegistry,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum GranularityArg {
    Daily,
    Monthly,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LayoutArg {
    Wide,
    Long,
}

/// Load a climate file, normalise it and print per-zone annual summaries
#[derive(Parser, Debug)]
#[command(name = "ecoclimate")]
#[command(about = "Climate series normalisation and drought/fire indices", long_about = None)]
struct Args {
    /// Climate file to load
    input: Option<PathBuf>,

    /// Records per year in the file
    #[arg(short, long, value_enum, default_value_t = GranularityArg::Daily)]
    granularity: GranularityArg,

    /// Trigger-word blocks (wide) or Year,Month[,Day],Variable rows (long)
    #[arg(short, long, value_enum, default_value_t = LayoutArg::Wide)]
    layout: LayoutArg,

    /// Unit format name for wide files
    #[arg(short, long, default_value = "daily_temp-c_precip-mmday")]
    format: String,

    /// Zone names in column order, comma separated
    #[arg(short, long, value_delimiter = ',', required_unless_present = "list_formats")]
    zones: Vec<String>,

    /// JSON run configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable fire weather with the configured (or default) season
    #[arg(long)]
    fire: bool,

    /// Override the SPEI accumulation window (months)
    #[arg(long)]
    spei_window: Option<usize>,

    /// Write the annual summaries as JSON instead of a table
    #[arg(long)]
    json: Option<PathBuf>,

    /// Print the known wide-format names and exit
    #[arg(long)]
    list_formats: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if args.list_formats {
        for name in FormatCatalog::format_names() {
            println!("{}", name);
        }
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let Some(input) = &args.input else {
        return Err("no input file given".into());
    };

    let mut config = match &args.config {
        Some(path) => ClimateConfig::from_json_file(path)?,
        None => ClimateConfig::default(),
    };
    if args.fire {
        config.fire.enabled = true;
    }
    if let Some(window) = args.spei_window {
        config.spei_window_months = window;
    }

    let zones = ZoneRegistry::from_names(args.zones.as_slice())?;
    let request = ParseRequest {
        layout: match args.layout {
            LayoutArg::Wide => InputLayout::Wide,
            LayoutArg::Long => InputLayout::Long,
        },
        granularity: match args.granularity {
            GranularityArg::Daily => Granularity::Daily,
            GranularityArg::Monthly => Granularity::Monthly,
        },
        format: &args.format,
        zones: &zones,
    };

    let series = ClimateLibrary::load(input, &request, &config)?;
    let annual = ClimateLibrary::annual(&series, &config)?;

    if let Some(path) = &args.json {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), &annual)?;
        println!("Wrote {} zone summaries to {}", annual.len(), path.display());
        return Ok(());
    }

    print_table(&annual, &zones, series.granularity() == Granularity::Daily && config.fire.enabled);
    Ok(())
}

fn print_table(annual: &[ZoneClimate], zones: &ZoneRegistry, fire: bool) {
    for zone in annual {
        let name = zones
            .zones()
            .get(zone.zone)
            .map_or("?", |z| z.name.as_str());
        println!("\n=== Zone {} ({}) ===", zone.zone, name);
        println!("Year | MAT(°C) | JJA(°C) | Precip(cm) | GDD    | Season      | SPEI min/max");
        println!("-----|---------|---------|------------|--------|-------------|-------------");

        for year in &zone.years {
            let (spei_min, spei_max) = year
                .monthly_spei
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                });
            println!(
                "{:4} | {:7.2} | {:7.2} | {:10.1} | {:6.0} | {:3}-{:3} {:3}d | {:5.2}/{:5.2}{}",
                year.calendar_year,
                year.mean_annual_temperature,
                year.jja_temperature,
                year.annual_precipitation,
                year.growing_degree_days,
                year.begin_growing_day,
                year.end_growing_day,
                year.growing_season_days,
                spei_min,
                spei_max,
                if year.pet_estimated { "  (PET estimated)" } else { "" }
            );
        }

        if fire {
            let peak = zone
                .years
                .iter()
                .flat_map(|y| y.monthly.iter())
                .map(|m| m.fire_weather_index)
                .fold(0.0, f64::max);
            println!("Peak monthly mean FWI: {:.1}", peak);
        }
    }
}
