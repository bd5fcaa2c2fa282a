use clap::{Args, Parser, Subcommand};

use cycletime::report::{platform_row_count, CycleSummary, MetricStat};
use cycletime::{
    Config, Dashboard, DashboardReport, Filters, MetricDistribution, MetricName, StatKind,
    TrendSeries, TRENDED_METRICS,
};

#[derive(Parser)]
#[command(name = "cycletime", about = "Ticket cycle-time dashboard CLI")]
struct Cli {
    /// Sheet JSON to read (default: $CYCLETIME_DATA or ~/.cycletime/sheet.json; `-` for stdin)
    #[arg(long)]
    data: Option<String>,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// Platform to include, or "all"
    #[arg(long, default_value = "all")]
    platform: String,
    /// Month to include (YYYY-MM), or "all"
    #[arg(long, default_value = "all")]
    month: String,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl FilterArgs {
    fn filters(&self) -> anyhow::Result<Filters> {
        Ok(Filters {
            platform: self.platform.parse()?,
            month: self.month.parse()?,
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Full dashboard: summary, dev cycle, trend and distributions
    Report {
        #[command(flatten)]
        filter: FilterArgs,
        /// Statistic for the summary: mean or median
        #[arg(long, default_value = "mean")]
        stat: String,
    },
    /// Per-step statistic for all nine metrics
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value = "mean")]
        stat: String,
    },
    /// Monthly averages per step
    Trend {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Fast/medium/slow split for one metric
    Distribution {
        #[command(flatten)]
        filter: FilterArgs,
        /// Metric to bucket (e.g. pull_request, tester_assignment)
        #[arg(long, default_value = "pull_request")]
        metric: String,
    },
    /// List the platforms and months available for filtering
    Filters {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show what was loaded
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = Config::resolve(cli.data.as_deref())?;
    let dashboard = cycletime::open_dashboard(&config).await?;

    match cli.command {
        Commands::Report { filter, stat } => {
            let stat: StatKind = stat.parse()?;
            let report = dashboard.report(&filter.filters()?, stat);
            if filter.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Summary { filter, stat } => {
            let stat: StatKind = stat.parse()?;
            let report = dashboard.report(&filter.filters()?, stat);
            if filter.json {
                println!("{}", serde_json::to_string_pretty(&report.summary)?);
            } else {
                println!("Tickets: {}", report.ticket_count);
                print_summary(report.stat, &report.summary);
                print_dev_cycle(&report.dev_cycle);
            }
        }
        Commands::Trend { filter } => {
            let records = dashboard.records(&filter.filters()?);
            let trend = cycletime::compute_trend(&records, &TRENDED_METRICS);
            if filter.json {
                println!("{}", serde_json::to_string_pretty(&trend)?);
            } else {
                print_trend(&trend);
            }
        }
        Commands::Distribution { filter, metric } => {
            let metric: MetricName = metric.parse()?;
            let records = dashboard.records(&filter.filters()?);
            let dist = cycletime::distribution::distribution_for(&records, metric);
            if filter.json {
                println!("{}", serde_json::to_string_pretty(&dist)?);
            } else {
                print_distribution(&dist);
            }
        }
        Commands::Filters { json } => {
            let options = dashboard.filter_options();
            if json {
                println!("{}", serde_json::to_string_pretty(&options)?);
            } else {
                println!("Platforms:");
                for p in &options.platforms {
                    println!("  {p}");
                }
                println!("Months:");
                for m in &options.months {
                    println!("  {}  {}", m.month, m.label);
                }
            }
        }
        Commands::Status => {
            print_status(&config, &dashboard);
        }
    }

    Ok(())
}

fn print_status(config: &Config, dashboard: &Dashboard) {
    let table = dashboard.table();
    println!("Data:    {}", config.data_path.display());
    println!("Tickets: {}", table.len());
    if let Some(header) = table.header() {
        println!("Header:  {} columns", header.len());
    }
    let options = dashboard.filter_options();
    println!("Platforms:");
    for platform in options.platforms {
        let filters = Filters {
            platform: cycletime::PlatformFilter::Only(platform.clone()),
            ..Filters::default()
        };
        println!("  {:<20} {}", platform, platform_row_count(table, &filters));
    }
    match (options.months.first(), options.months.last()) {
        (Some(first), Some(last)) => println!("Months:  {} to {}", first.month, last.month),
        _ => println!("Months:  none"),
    }
}

fn print_report(report: &DashboardReport) {
    println!("Tickets: {}", report.ticket_count);
    print_summary(report.stat, &report.summary);
    print_dev_cycle(&report.dev_cycle);
    print_trend(&report.trend);
    for dist in &report.distributions {
        print_distribution(dist);
    }
}

fn print_summary(stat: StatKind, summary: &[MetricStat]) {
    println!("  {}:", stat.label());
    for s in summary {
        println!("    {:<24} {:>5}  (n={})", s.label, s.value, s.samples);
    }
}

fn print_dev_cycle(c: &CycleSummary) {
    println!("  Dev Cycle:");
    println!("    Average: {} days", c.average);
    println!("    Median:  {} days", c.median);
}

fn print_trend(trend: &TrendSeries) {
    println!("  Trend:");
    if trend.is_empty() {
        println!("    No data");
        return;
    }
    print!("    {:<24}", "");
    for label in &trend.labels {
        print!(" {label:>9}");
    }
    println!();
    for series in &trend.series {
        print!("    {:<24}", series.label);
        for point in &series.points {
            match point {
                Some(v) => print!(" {v:>9}"),
                None => print!(" {:>9}", "-"),
            }
        }
        println!();
    }
}

fn print_distribution(dist: &MetricDistribution) {
    println!("  {} distribution:", dist.metric.label());
    let pct = [
        dist.percentages.fast,
        dist.percentages.medium,
        dist.percentages.slow,
    ];
    for ((label, count), pct) in dist.counts.labelled().into_iter().zip(pct) {
        println!("    {label:<14} {count:>5} tickets ({pct}%)");
    }
}
