use clap::{Parser, Subcommand};
use std::{
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wisent::{
    aggregate::par_sum_element, parse_head_path, table, BufferBuilder, BufferFile, Element,
    LoadConfig, Node,
};

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(about = "Wisent CLI - Inspect and aggregate memory-mapped expression buffers")]
struct Cli {
    /// Validate sections lazily instead of at open time
    #[arg(long, global = true)]
    lazy: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show buffer layout info
    Info {
        /// Path to a Wisent buffer file
        file: PathBuf,
    },
    /// Print the tree below a head path
    Dump {
        /// Path to a Wisent buffer file
        file: PathBuf,

        /// Head path from the root (format: a/b/c)
        #[arg(long)]
        path: Option<String>,

        /// Print as JSON instead of s-expressions
        #[arg(long)]
        json: bool,
    },
    /// Sum the numeric values of one table column
    Sum {
        /// Path to a Wisent buffer file
        file: PathBuf,

        /// Head path from the root to the table
        #[arg(long, default_value = "resources/List/Object/path/Table")]
        path: String,

        /// Column to aggregate
        #[arg(long, default_value = "GB_temperature")]
        column: String,

        /// Number of timed repetitions
        #[arg(long, default_value_t = 1)]
        repeat: usize,
    },
    /// Write a sample datapackage buffer
    Generate {
        /// Output file
        out: PathBuf,

        /// Rows per column
        #[arg(long, default_value_t = 10_000)]
        rows: usize,
    },
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = LoadConfig::default().with_verify_layout(!cli.lazy);
    let start_time = Instant::now();

    match &cli.command {
        Commands::Info { file } => handle_info(file, &config)?,
        Commands::Dump { file, path, json } => handle_dump(file, &config, path.as_deref(), *json)?,
        Commands::Sum {
            file,
            path,
            column,
            repeat,
        } => handle_sum(file, &config, path, column, *repeat)?,
        Commands::Generate { out, rows } => handle_generate(out, *rows)?,
    }

    let elapsed = start_time.elapsed();
    println!("Completed in {elapsed:.2?}");

    Ok(())
}

fn handle_info(file: &Path, config: &LoadConfig) -> CliResult<()> {
    let mapped = BufferFile::open(file, config)?;
    let buffer = mapped.buffer()?;

    println!("Buffer Info:");
    println!("  Path: {}", file.display());
    println!("  Arguments: {}", buffer.argument_count());
    println!("  Expressions: {}", buffer.expression_count());
    println!("  String blob: {} bytes", buffer.string_blob().len());
    println!("  Total size: {} bytes", buffer.as_bytes().len());
    match buffer.root() {
        Some(root) => match root.as_expression()? {
            Some(expression) => println!(
                "  Root: ({} ...) with {} children",
                expression.head()?,
                expression.child_count()?
            ),
            None => println!("  Root: {root}"),
        },
        None => println!("  Root: <empty>"),
    }

    mapped.release();
    Ok(())
}

fn handle_dump(
    file: &Path,
    config: &LoadConfig,
    path: Option<&str>,
    json: bool,
) -> CliResult<()> {
    let mapped = BufferFile::open(file, config)?;
    let buffer = mapped.buffer()?;
    let Some(root) = buffer.root() else {
        println!("<empty buffer>");
        return Ok(());
    };

    let target = match path {
        Some(path) => resolve(&root, path)?,
        None => Some(root),
    };
    match target {
        Some(element) if json => print_json(&element)?,
        Some(element) => println!("{element}"),
        None => println!("No element at '{}'", path.unwrap_or_default()),
    }

    mapped.release();
    Ok(())
}

#[cfg(feature = "serde")]
fn print_json(element: &Element<'_>) -> CliResult<()> {
    let value = wisent::to_json(element)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

#[cfg(not(feature = "serde"))]
fn print_json(_element: &Element<'_>) -> CliResult<()> {
    Err("JSON output requires the 'serde' feature".into())
}

fn handle_sum(
    file: &Path,
    config: &LoadConfig,
    path: &str,
    column: &str,
    repeat: usize,
) -> CliResult<()> {
    let mapped = BufferFile::open(file, config)?;
    let buffer = mapped.buffer()?;
    let root = buffer.root().ok_or("buffer has no root element")?;

    let found = resolve(&root, path)?.ok_or_else(|| format!("no table at '{path}'"))?;
    let values = table::column(&found.expression()?, column)?
        .ok_or_else(|| format!("no column named '{column}'"))?;

    let mut total = 0;
    for round in 0..repeat.max(1) {
        let start = Instant::now();
        total = par_sum_element(&values)?;
        info!(round, elapsed = ?start.elapsed(), "aggregated column");
    }
    println!("{column} = {total}");

    mapped.release();
    Ok(())
}

fn handle_generate(out: &Path, rows: usize) -> CliResult<()> {
    let temperatures = (0..rows).map(|i| Node::Double(-5.0 + (i % 40) as f64 * 0.5));
    let hours = (0..rows).map(|i| Node::Long((i % 24) as i64));
    let column = |name: &str, values: Vec<Node>| {
        Node::expression(
            "Column",
            vec![Node::symbol(name), Node::expression("List", values)],
        )
    };
    let columns = Node::expression(
        "Table",
        vec![
            column("GB_temperature", temperatures.collect()),
            column("hour", hours.collect()),
        ],
    );
    let resource = Node::expression(
        "Object",
        vec![
            Node::expression("name", vec![Node::text("weather_point_data")]),
            Node::expression("path", vec![columns]),
        ],
    );
    let root = Node::expression(
        "Object",
        vec![
            Node::expression("name", vec![Node::text("opsd-weather")]),
            Node::expression("resources", vec![Node::expression("List", vec![resource])]),
        ],
    );

    let bytes = BufferBuilder::new().encode(&root)?;
    std::fs::write(out, &bytes)?;
    println!("Wrote {} bytes to {}", bytes.len(), out.display());
    Ok(())
}

fn resolve<'a>(root: &Element<'a>, path: &str) -> CliResult<Option<Element<'a>>> {
    Ok(root.path(parse_head_path(path)?)?)
}
