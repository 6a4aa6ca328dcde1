use anyhow::{Context as AnyhowContext, Result};
use apery_protocol::{serialize_json, AnalysisReport, ErrorEnvelope};
use clap::{Args, Parser, Subcommand};
use command::{CommandAction, CommandHandler, CommandRequest};
use config::AppConfig;
use http_api::HttpState;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

mod command;
mod config;
mod http_api;
mod server_security;
mod topics;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn render_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    if pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        serialize_json(value)
    }
}

#[derive(Parser)]
#[command(name = "apery")]
#[command(about = "Apéry sets, Apéry graphs and exact security numbers", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for results)
    #[arg(long, global = true)]
    quiet: bool,

    /// Config file, JSON or TOML (env: APERY_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the Apéry set, Apéry graph and security number
    Analyze(AnalyzeArgs),

    /// Execute a JSON Command API request
    Command(CommandArgs),

    /// Serve the Command API over HTTP (POST /command, POST /analyze)
    ServeHttp(ServeArgs),

    /// Print advisory text about a topic
    Explain(ExplainArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Generators, space or comma separated (e.g. `3 5` or `3,5`)
    #[arg(
        required = true,
        num_args = 1..,
        value_delimiter = ',',
        allow_negative_numbers = true
    )]
    generators: Vec<i64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Largest integer enumerated when closing the semigroup
    #[arg(long)]
    closure_bound: Option<u64>,

    /// Also report vertex connectivity
    #[arg(long)]
    connectivity: bool,
}

#[derive(Args)]
struct CommandArgs {
    /// Inline JSON payload (mutually exclusive with --file)
    #[arg(long, conflicts_with = "file")]
    json: Option<String>,

    /// Path to file containing JSON payload
    #[arg(long)]
    file: Option<PathBuf>,

    /// Pretty-print JSON response
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct ServeArgs {
    /// Bind address, e.g. 127.0.0.1:7700
    #[arg(long, default_value = "127.0.0.1:7700")]
    bind: String,

    /// Allow binding to non-loopback addresses (requires --auth-token)
    #[arg(long)]
    public: bool,

    /// Require Authorization: Bearer <token> on all requests (env: APERY_AUTH_TOKEN)
    #[arg(long)]
    auth_token: Option<String>,
}

#[derive(Args)]
struct ExplainArgs {
    /// Topic tag or free-text question
    #[arg(num_args = 0..)]
    topic: Vec<String>,

    /// List the known topic tags
    #[arg(long, conflicts_with = "topic")]
    list: bool,

    /// Print the explanation as JSON
    #[arg(long)]
    json: bool,
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON consumers.
    let json_output = match &cli.command {
        Commands::Analyze(args) => args.json,
        Commands::Command(_) => true,
        Commands::Explain(args) => args.json,
        Commands::ServeHttp(_) => false,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze(args) => run_analyze(args, config).await?,
        Commands::Command(args) => run_command(args, config).await?,
        Commands::ServeHttp(args) => serve_http(args, config).await?,
        Commands::Explain(args) => run_explain(args)?,
    }

    Ok(())
}

async fn run_analyze(args: AnalyzeArgs, config: AppConfig) -> Result<()> {
    let mut payload = serde_json::json!({
        "generators": args.generators,
        "include_connectivity": args.connectivity,
    });
    if let Some(bound) = args.closure_bound {
        payload["closure_bound"] = bound.into();
    }

    let response = CommandHandler::new(config)
        .execute(CommandRequest {
            action: CommandAction::Analyze,
            payload,
        })
        .await;

    if let Some(error) = &response.error {
        if args.json {
            print_stdout(&render_json(error, args.pretty)?)?;
        } else {
            eprintln!("{}", describe_error(error));
        }
        std::process::exit(1);
    }

    if args.json {
        print_stdout(&render_json(&response.data, args.pretty)?)?;
    } else {
        let report: AnalysisReport = serde_json::from_value(response.data)
            .context("Malformed analysis report")?;
        print_stdout(&human_summary(&report))?;
    }
    Ok(())
}

fn describe_error(error: &ErrorEnvelope) -> String {
    let mut out = format!("Error [{}]: {}", error.code, error.message);
    if let Some(hint) = &error.hint {
        out.push_str(&format!("\nHint: {hint}"));
    }
    out
}

fn join(values: &[u64]) -> String {
    values
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn human_summary(report: &AnalysisReport) -> String {
    let mut lines = vec![
        format!("Generators:      {}", join(&report.generators)),
        format!("Modulus:         {}", report.modulus),
        format!("Apéry set:       {{{}}}", join(&report.apery_set)),
        format!(
            "Apéry graph:     {} vertices, {} edges",
            report.num_nodes, report.num_edges
        ),
    ];
    match report.security_number {
        Some(number) => {
            lines.push(format!("Security number: {number}"));
            lines.push(format!("Secure set:      {{{}}}", join(&report.secure_set)));
        }
        None => lines.push("Security number: undefined (empty graph)".to_string()),
    }
    if let Some(connectivity) = report.vertex_connectivity {
        lines.push(format!("Connectivity:    {connectivity}"));
    }
    if !report.sample_edges.is_empty() {
        lines.push("Sample edges:".to_string());
        for [a, b, weight] in &report.sample_edges {
            lines.push(format!("  {a} - {b} (difference {weight})"));
        }
    }
    lines.join("\n")
}

async fn run_command(args: CommandArgs, config: AppConfig) -> Result<()> {
    let raw = read_payload(&args)?;
    let response = match serde_json::from_str::<CommandRequest>(&raw) {
        Ok(request) => command::execute(request, config).await,
        Err(err) => {
            let err = anyhow::Error::new(command::domain::RequestError::Invalid(err.to_string()))
                .context("Invalid JSON passed to --json/--file");
            command::error_response(&err, 0)
        }
    };

    print_stdout(&render_json(&response, args.pretty)?)?;

    if response.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

fn read_payload(args: &CommandArgs) -> Result<String> {
    if let Some(raw) = &args.json {
        return Ok(raw.clone());
    }
    if let Some(path) = &args.file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read JSON from {}", path.display()));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read JSON from stdin")?;

    if buffer.trim().is_empty() {
        anyhow::bail!("Command request is empty. Provide --json, --file, or pipe JSON via stdin.");
    }

    Ok(buffer)
}

fn run_explain(args: ExplainArgs) -> Result<()> {
    if args.list {
        for tag in topics::tags() {
            print_stdout(tag)?;
        }
        return Ok(());
    }

    let query = args.topic.join(" ");
    let topic = topics::resolve(Some(query.as_str()));
    if args.json {
        let explanation = apery_protocol::Explanation {
            topic: topic.tag.to_string(),
            text: topic.text.to_string(),
        };
        print_stdout(&serialize_json(&explanation)?)?;
    } else {
        print_stdout(topic.text)?;
    }
    Ok(())
}

async fn serve_http(args: ServeArgs, config: AppConfig) -> Result<()> {
    let token = args
        .auth_token
        .clone()
        .or_else(|| std::env::var(server_security::AUTH_TOKEN_ENV).ok());
    let access =
        server_security::resolve_access(&args.bind, args.public, token.as_deref()).await?;

    let state = Arc::new(HttpState {
        handler: CommandHandler::new(config),
        auth_token: access.token,
    });
    let app = http_api::router(state.clone());

    let listener = tokio::net::TcpListener::bind(access.addrs.as_slice())
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    let local_addr = listener.local_addr()?;
    let base_url = format!("http://{local_addr}");
    log::info!("Listening on {local_addr}");

    print_stdout(&format!("Serving Command API: {base_url}/command"))?;
    print_stdout(&format!("Analysis endpoint: {base_url}/analyze"))?;
    print_stdout(&format!("Health endpoint: {base_url}/health"))?;

    if state.auth_token.is_some() {
        print_stdout(&format!(
            "Auth enabled: add header 'Authorization: Bearer ${}'",
            server_security::AUTH_TOKEN_ENV
        ))?;
    }
    if args.public {
        let addrs = access
            .addrs
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        print_stdout(&format!(
            "Public bind enabled (--public). Resolved addresses: {addrs}"
        ))?;
    }

    print_stdout(&format!(
        "Try: curl -X POST {base_url}/analyze -H 'Content-Type: application/json' -d '{{\"generators\":[3,5]}}'"
    ))?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn report() -> AnalysisReport {
        AnalysisReport {
            generators: vec![3, 5],
            modulus: 3,
            apery_set: vec![0, 5, 10],
            num_nodes: 3,
            num_edges: 3,
            security_number: Some(2),
            secure_set: vec![0, 5],
            sample_edges: vec![[0, 5, 5], [0, 10, 10], [5, 10, 5]],
            vertex_connectivity: None,
        }
    }

    #[test]
    fn summary_lists_the_result() {
        let summary = human_summary(&report());
        assert_eq!(
            summary,
            "Generators:      3, 5\n\
Modulus:         3\n\
Apéry set:       {0, 5, 10}\n\
Apéry graph:     3 vertices, 3 edges\n\
Security number: 2\n\
Secure set:      {0, 5}\n\
Sample edges:\n\
\x20 0 - 5 (difference 5)\n\
\x20 0 - 10 (difference 10)\n\
\x20 5 - 10 (difference 5)"
        );
    }

    #[test]
    fn summary_marks_undefined_security_number() {
        let summary = human_summary(&AnalysisReport {
            security_number: None,
            secure_set: vec![],
            vertex_connectivity: Some(0),
            ..report()
        });
        assert!(summary.contains("Security number: undefined"));
        assert!(summary.contains("Connectivity:    0"));
    }

    #[test]
    fn errors_print_code_and_hint() {
        let text = describe_error(&ErrorEnvelope {
            code: "too_large".to_string(),
            message: "too big".to_string(),
            hint: Some("lower it".to_string()),
        });
        assert_eq!(text, "Error [too_large]: too big\nHint: lower it");
    }
}
