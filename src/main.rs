use clap::{Parser, Subcommand};
use hubgen::pipeline::{self, PathOverrides, Site};
use hubgen::{config, output};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hubgen")]
#[command(about = "Static site generator for front-matter articles with brand, topic and country hubs")]
#[command(long_about = "\
Static site generator for front-matter articles with brand, topic and country hubs

Every markdown file in the articles directory becomes a page. Its front-matter
decides which hub pages list it.

Site structure:

  site/
  ├── config.toml                  # Optional: see 'hubgen gen-config'
  ├── articles/
  │   └── spring-lineup.md         # One article per file
  ├── templates/                   # Optional: article.html + hub.html (Tera)
  │   ├── header.html              # Optional partials, raw HTML on every page
  │   └── footer.html
  └── static/                      # Optional: copied into the output root

Front-matter:

  ---
  title: Spring Lineup
  slug: spring-lineup              # Default: slugified title
  brand: Acme
  series: Spring '24               # Only used together with brand
  topics: [Reviews, News]
  countries: [France]
  date: 2024-02-01
  summary: Everything Acme showed for spring.
  ---

Output (flat layout):

  builds/index.html                # Every article, newest first
  builds/articles/<slug>.html
  builds/brand/<brand>.html
  builds/brand/<brand>-<series>.html
  builds/topic/<topic>.html
  builds/country/<country>.html

The output directory is deleted and recreated on every build.")]
#[command(version)]
struct Cli {
    /// Site root holding config.toml
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Articles directory (overrides paths.articles)
    #[arg(long, global = true)]
    articles: Option<PathBuf>,

    /// Templates directory (overrides paths.templates)
    #[arg(long, global = true)]
    templates: Option<PathBuf>,

    /// Output directory (overrides paths.output)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site: scan → index → generate
    Build,
    /// Validate articles and show the hubs they produce, without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let overrides = PathOverrides {
        articles: cli.articles,
        templates: cli.templates,
        output: cli.output,
    };

    match cli.command {
        Command::Build => {
            let site = Site::load(&cli.source, &overrides)?;
            println!("==> Building {}", site.paths.articles.display());
            let report = pipeline::build(&site)?;
            output::print_build_output(&report.index, &report.generated);
            println!("==> Build complete: {}", site.paths.output.display());
        }
        Command::Check => {
            let site = Site::load(&cli.source, &overrides)?;
            println!("==> Checking {}", site.paths.articles.display());
            let report = pipeline::check(&site)?;
            output::print_check_output(&report.index, &report.path_collisions);
            println!("==> Articles are valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `info` by default, `debug` with `--verbose`. `RUST_LOG` wins over both.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
