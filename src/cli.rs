use anyhow::Context;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use weather_silver::{
    CurrentSelection, DecodeMode, PipelineConfig, SnapshotReader, SqliteRecordStore,
    TemperatureBounds, TransformOptions, ViewKind, WeatherPipeline, DEFAULT_DATABASE_PATH,
    DEFAULT_PREVIEW_ROWS, DEFAULT_SILVER_LAYER_PATH, DEFAULT_TABLE,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-silver",
    version,
    about = "Derive hourly, current and daily-statistics views from stored weather captures"
)]
pub struct Cli {
    #[command(flatten)]
    pub paths: PathArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct PathArgs {
    /// SQLite file holding the raw captures.
    #[arg(long = "db", global = true, env = "WEATHER_DB_PATH", default_value = DEFAULT_DATABASE_PATH)]
    pub database_path: PathBuf,

    /// Directory the snapshots are written to.
    #[arg(long = "out", global = true, env = "WEATHER_SILVER_PATH", default_value = DEFAULT_SILVER_LAYER_PATH)]
    pub silver_layer_path: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the pipeline and export every view.
    Run {
        /// Capture table to process; repeat for several. Defaults to every table in the store.
        #[arg(long = "table")]
        tables: Vec<String>,

        /// Abort on the first payload that does not match the schema.
        #[arg(long)]
        strict: bool,

        /// Let records without a forecast supply the current-conditions row.
        #[arg(long)]
        current_only: bool,

        /// Lowest plausible hourly temperature.
        #[arg(long, default_value_t = TemperatureBounds::default().min, allow_negative_numbers = true)]
        min_temp: f64,

        /// Highest plausible hourly temperature.
        #[arg(long, default_value_t = TemperatureBounds::default().max, allow_negative_numbers = true)]
        max_temp: f64,

        /// Rows shown per view.
        #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
        preview: usize,
    },

    /// Append captures from a JSON file (one object or an array of objects).
    Seed {
        #[arg(long, default_value = DEFAULT_TABLE)]
        table: String,

        #[arg(long)]
        file: PathBuf,
    },

    /// Print the newest snapshot of a view.
    Latest {
        #[arg(long, default_value = DEFAULT_TABLE)]
        table: String,

        /// One of hourly_weather, current_weather, daily_stats.
        #[arg(long)]
        view: ViewKind,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Run {
                tables,
                strict,
                current_only,
                min_temp,
                max_temp,
                preview,
            } => {
                let temperature_bounds = TemperatureBounds::try_new(min_temp, max_temp)?;
                let store = SqliteRecordStore::open(&self.paths.database_path)?;
                let tables = if tables.is_empty() {
                    store.tables()?
                } else {
                    tables
                };

                let config = PipelineConfig::builder()
                    .database_path(self.paths.database_path)
                    .silver_layer_path(self.paths.silver_layer_path)
                    .tables(tables)
                    .decode_mode(if strict {
                        DecodeMode::Strict
                    } else {
                        DecodeMode::Isolate
                    })
                    .transform(TransformOptions {
                        temperature_bounds,
                        current_selection: if current_only {
                            CurrentSelection::CurrentOnly
                        } else {
                            CurrentSelection::RequireHourly
                        },
                    })
                    .preview_rows(preview)
                    .build();

                let pipeline = WeatherPipeline::with_store(store, config);
                let runs = pipeline.run(Local::now().naive_local())?;
                if runs.is_empty() {
                    println!("No capture tables found.");
                }

                for run in runs {
                    println!("=== {} ===", run.table);
                    for (frame, path) in run.frames.iter().zip(&run.exported) {
                        println!("--- {} ({} rows) -> {}", frame.kind, frame.height(), path.display());
                        println!("{}", frame.preview(pipeline.config().preview_rows));
                    }
                    if !run.failures.is_empty() {
                        println!("Skipped {} undecodable record(s):", run.failures.len());
                        for failure in &run.failures {
                            println!("  {}", failure.error);
                        }
                    }
                }
            }
            Command::Seed { table, file } => {
                let text = std::fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                let value: serde_json::Value = serde_json::from_str(&text)
                    .with_context(|| format!("{} is not valid JSON", file.display()))?;
                let payloads = match value {
                    serde_json::Value::Array(items) => items,
                    other => vec![other],
                };

                let store = SqliteRecordStore::open_or_create(&self.paths.database_path)?;
                for payload in &payloads {
                    let id = store.append(&table, payload)?;
                    println!("Stored capture {} in '{}'", id, table);
                }
            }
            Command::Latest { table, view } => {
                let reader = SnapshotReader::new(self.paths.silver_layer_path);
                match reader.latest(&view.logical_name(&table))? {
                    Some(path) => {
                        println!("{}", path.display());
                        println!("{}", reader.load(view, &path)?);
                    }
                    None => println!("No snapshot of {} for '{}' yet.", view, table),
                }
            }
        }

        Ok(())
    }
}
