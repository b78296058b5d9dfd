//! # CLI Module
//!
//! Command-line interface for the RBV indicator.
//!
//! Every rating command reads its ratings the same way: an optional JSON
//! file (`--input`) mapping factor ids to an integer or `null`, then any
//! number of `--rate factor=value` flags, which win over the file.
//!
//! Each `cmd_*` function prints to stdout; the matching `render_*` function
//! returns the text so it can be tested without capturing output.

use crate::config::ConfigError;
use clap::{Args, Parser, Subcommand};
use rbv_core::{
    Assessment, AssessmentError, FactorId, FactorRole, FactorSet, MissingRatingPolicy, Tenths,
    VrioFinding, report,
};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Assessment(#[from] AssessmentError),

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid ratings file {}: {source}", .path.display())]
    InputFormat {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("cannot encode output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

// =============================================================================
// ARGUMENTS
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "rbv")]
#[command(about = "RBV internationalization potential indicator for SMEs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log filter (e.g. warn, info, rbv=debug). Overrides RUST_LOG; the
    /// default is warn.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the nine factors and their rating levels
    Factors {
        #[arg(long)]
        json: bool,
    },
    /// Compute the potential score, tier and contributions
    Assess {
        #[command(flatten)]
        ratings: RatingArgs,
        #[arg(long)]
        json: bool,
    },
    /// Show the VRIO matrix with competitive implications
    Vrio {
        #[command(flatten)]
        ratings: RatingArgs,
        #[arg(long)]
        json: bool,
    },
    /// Print the full assessment report
    Report {
        #[command(flatten)]
        ratings: RatingArgs,
        #[arg(long)]
        json: bool,
    },
    /// Show the advice for the resulting tier
    Advise {
        #[command(flatten)]
        ratings: RatingArgs,
        #[arg(long)]
        json: bool,
    },
    /// Show the profile summary; unrated factors are allowed
    Profile {
        #[command(flatten)]
        ratings: RatingArgs,
        #[arg(long)]
        json: bool,
    },
    /// Run the HTTP API
    Serve(ServeArgs),
}

/// Where ratings come from.
#[derive(Args, Debug, Clone)]
pub struct RatingArgs {
    /// A rating as FACTOR=VALUE (repeatable, overrides --input)
    #[arg(long = "rate", value_name = "FACTOR=VALUE")]
    pub rate: Vec<String>,

    /// JSON file mapping factor ids to 1-5 or null
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// How unrated factors are handled: require-all or midpoint
    #[arg(long, default_value = "require-all")]
    pub policy: MissingRatingPolicy,
}

impl Default for RatingArgs {
    fn default() -> Self {
        Self {
            rate: Vec::new(),
            input: None,
            policy: MissingRatingPolicy::RequireAll,
        }
    }
}

/// Flags for `rbv serve`. Unset flags fall back to `RBV_*` variables.
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    #[arg(long)]
    pub api_key: Option<String>,

    /// Requests per second across all clients
    #[arg(long)]
    pub rate_limit: Option<NonZeroU32>,

    #[arg(long)]
    pub max_sessions: Option<usize>,

    /// Policy for new sessions: require-all or midpoint
    #[arg(long)]
    pub policy: Option<MissingRatingPolicy>,

    /// Seconds a session may stay idle before it is dropped
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub session_ttl: Option<u64>,
}

// =============================================================================
// RATING INPUT
// =============================================================================

/// Parse a `factor=value` flag.
pub fn parse_rate(entry: &str) -> Result<(FactorId, i64), CliError> {
    let (name, value) = entry.split_once('=').ok_or_else(|| {
        CliError::InvalidArgument(format!("expected FACTOR=VALUE, got '{}'", entry))
    })?;
    let factor: FactorId = name.parse()?;
    let value = value.trim().parse::<i64>().map_err(|_| {
        CliError::InvalidArgument(format!("rating for {} must be a whole number, got '{}'", factor, value))
    })?;
    Ok((factor, value))
}

/// Read a ratings file. A factor may appear only once, in any spelling.
pub fn read_ratings_file(path: &Path) -> Result<FactorSet, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: BTreeMap<String, Option<i64>> =
        serde_json::from_str(&text).map_err(|source| CliError::InputFormat {
            path: path.to_path_buf(),
            source,
        })?;

    let mut seen: BTreeMap<FactorId, &str> = BTreeMap::new();
    for name in raw.keys() {
        let factor: FactorId = name.parse()?;
        if let Some(first) = seen.insert(factor, name.as_str()) {
            return Err(CliError::InvalidArgument(format!(
                "{}: factor {} is given twice ('{}' and '{}')",
                path.display(),
                factor,
                first,
                name
            )));
        }
    }

    Ok(FactorSet::from_named_values(
        raw.iter().map(|(name, value)| (name.as_str(), *value)),
    )?)
}

/// Build an assessment from the file and flags.
pub fn load_assessment(args: &RatingArgs) -> Result<Assessment, CliError> {
    let mut ratings = match &args.input {
        Some(path) => read_ratings_file(path)?,
        None => FactorSet::new(),
    };
    for entry in &args.rate {
        let (factor, value) = parse_rate(entry)?;
        ratings.rate(factor, value)?;
    }

    tracing::debug!(
        rated = ratings.rated_count(),
        policy = %args.policy,
        "ratings loaded"
    );
    Ok(Assessment::with_ratings(ratings, args.policy))
}

// =============================================================================
// RENDERING
// =============================================================================

fn signed(points: Tenths) -> String {
    if points.raw() > 0 {
        format!("+{}", points)
    } else {
        points.to_string()
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn render_factors(json: bool) -> Result<String, CliError> {
    let catalog = FactorId::catalog();
    if json {
        return to_json(&catalog);
    }

    let mut out = String::new();
    for role in [FactorRole::Supporting, FactorRole::Barrier] {
        out.push_str(&format!("{} factors\n", role.label()));
        for info in catalog.iter().filter(|i| i.role == role) {
            out.push_str(&format!("  {:<28} {}\n", info.id.id(), info.name));
            for (level, text) in info.levels.iter().enumerate() {
                out.push_str(&format!("    {}  {}\n", level + 1, text));
            }
        }
        out.push('\n');
    }
    Ok(out)
}

pub fn render_assess(args: &RatingArgs, json: bool) -> Result<String, CliError> {
    let assessment = load_assessment(args)?;
    let breakdown = assessment.breakdown()?;
    if json {
        return to_json(&breakdown);
    }

    let mut out = format!(
        "Internationalization potential: {} % ({} tier)\n{}\n\nContributions\n",
        breakdown.potential,
        breakdown.tier,
        breakdown.tier.advice().interpretation
    );
    for c in &breakdown.contributions {
        out.push_str(&format!("  {:<20} {:>6}\n", c.label, signed(c.points)));
    }
    Ok(out)
}

pub fn render_vrio(args: &RatingArgs, json: bool) -> Result<String, CliError> {
    let matrix = load_assessment(args)?.vrio()?;
    if json {
        let rows: Vec<VrioFinding> = matrix.rows.iter().map(VrioFinding::from).collect();
        return to_json(&rows);
    }

    let mut out = format!("{:<20} V  R  I  O  Implication\n", "Resource");
    for (row, implication) in matrix.implications() {
        out.push_str(&format!(
            "{:<20} {}  {}  {}  {}  {}\n",
            row.resource.name(),
            report::mark(row.valuable),
            report::mark(row.rare),
            report::mark(row.inimitable),
            report::mark(row.organized),
            implication
        ));
    }
    Ok(out)
}

pub fn render_report(args: &RatingArgs, json: bool) -> Result<String, CliError> {
    let report = load_assessment(args)?.report()?;
    if json {
        return to_json(&report);
    }
    Ok(report.to_text())
}

pub fn render_advise(args: &RatingArgs, json: bool) -> Result<String, CliError> {
    let assessment = load_assessment(args)?;
    let score = assessment.score()?;
    let advice = score.tier().advice();
    if json {
        return to_json(&serde_json::json!({
            "potential": score,
            "advice": advice,
        }));
    }

    let mut out = format!("{}\n\n{}\n\n", advice.headline, advice.interpretation);
    for (i, rec) in advice.recommendations.iter().enumerate() {
        out.push_str(&format!("{}. {}\n   {}\n", i + 1, rec.title, rec.detail));
    }
    Ok(out)
}

pub fn render_profile(args: &RatingArgs, json: bool) -> Result<String, CliError> {
    let assessment = load_assessment(args)?;
    let ratings = assessment.ratings();
    let profile = assessment.profile();
    if json {
        return to_json(&serde_json::json!({
            "complete": ratings.is_complete(),
            "missing": ratings.missing(),
            "factors": profile,
        }));
    }

    let mut out = String::new();
    for entry in &profile {
        let rating = entry
            .rating
            .map(|r| format!("{}/5", r))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!("{:<36} {:>4}  {}\n", entry.name, rating, entry.summary));
    }
    if !ratings.is_complete() {
        out.push_str(&format!(
            "\n{} of {} factors rated\n",
            ratings.rated_count(),
            FactorId::ALL.len()
        ));
    }
    Ok(out)
}

// =============================================================================
// COMMANDS
// =============================================================================

pub fn cmd_factors(json: bool) -> Result<(), CliError> {
    println!("{}", render_factors(json)?);
    Ok(())
}

pub fn cmd_assess(args: &RatingArgs, json: bool) -> Result<(), CliError> {
    println!("{}", render_assess(args, json)?);
    Ok(())
}

pub fn cmd_vrio(args: &RatingArgs, json: bool) -> Result<(), CliError> {
    println!("{}", render_vrio(args, json)?);
    Ok(())
}

pub fn cmd_report(args: &RatingArgs, json: bool) -> Result<(), CliError> {
    println!("{}", render_report(args, json)?);
    Ok(())
}

pub fn cmd_advise(args: &RatingArgs, json: bool) -> Result<(), CliError> {
    println!("{}", render_advise(args, json)?);
    Ok(())
}

pub fn cmd_profile(args: &RatingArgs, json: bool) -> Result<(), CliError> {
    println!("{}", render_profile(args, json)?);
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_rate_accepts_pairs() {
        let parsed = parse_rate("human-capital=4").ok();
        assert_eq!(parsed, Some((FactorId::HumanCapital, 4)));
    }

    #[test]
    fn parse_rate_rejects_malformed() {
        assert!(matches!(parse_rate("innovation"), Err(CliError::InvalidArgument(_))));
        assert!(matches!(parse_rate("innovation=high"), Err(CliError::InvalidArgument(_))));
        assert!(matches!(
            parse_rate("charisma=3"),
            Err(CliError::Assessment(AssessmentError::UnknownFactor { .. }))
        ));
    }

    #[test]
    fn subcommands_parse() {
        let cli = Cli::try_parse_from([
            "rbv", "assess", "--rate", "innovation=5", "--policy", "midpoint", "--json",
        ]);
        let Ok(cli) = cli else {
            unreachable!("assess arguments should parse");
        };
        match cli.command {
            Commands::Assess { ratings, json } => {
                assert!(json);
                assert_eq!(ratings.rate, vec!["innovation=5".to_string()]);
                assert_eq!(ratings.policy, MissingRatingPolicy::Midpoint);
            }
            other => unreachable!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn policy_defaults_to_require_all() {
        let cli = Cli::try_parse_from(["rbv", "profile"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Profile { ratings, .. }) if ratings.policy == MissingRatingPolicy::RequireAll
        ));
    }

    #[test]
    fn signed_points() {
        assert_eq!(signed(Tenths::new(75)), "+7.5");
        assert_eq!(signed(Tenths::ZERO), "0.0");
        assert_eq!(signed(Tenths::new(-25)), "-2.5");
    }
}
