//! sitefix-gen: CLI tool for generating the JSON index from rule text.

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use sitefix::index::encode_offsets;
use sitefix::{parser, RuleIndex, SECTION_SEPARATOR};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sitefix-gen")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Generate and check site-fix rule indexes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a JSON index from a rule text file
    Generate {
        /// Input rule text file
        #[arg(short, long)]
        input: PathBuf,

        /// Output JSON index file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Existing index to carry embedded-site fix entries from
        #[arg(long)]
        cache_from: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Check that an index matches a rule text file
    Check {
        /// Rule text file
        #[arg(short, long)]
        rules: PathBuf,

        /// JSON index file
        #[arg(short, long)]
        index: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            input,
            output,
            cache_from,
            verbose,
        } => generate(&input, output.as_deref(), cache_from.as_deref(), verbose),
        Commands::Check { rules, index } => check(&rules, &index),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn generate(
    input: &std::path::Path,
    output: Option<&std::path::Path>,
    cache_from: Option<&std::path::Path>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(input)?;

    let (offsets, headings) = scan_sections(&text);
    if headings.is_empty() {
        return Err("no sections found in rule text".into());
    }
    if headings[0] != "*" {
        return Err(format!(
            "section 0 must carry the generic marker '*', found {:?}",
            headings[0]
        )
        .into());
    }

    let mut domains: BTreeMap<String, usize> = BTreeMap::new();
    let mut labels: BTreeMap<String, usize> = BTreeMap::new();
    for (section, heading) in headings.iter().enumerate() {
        for name in heading.split(&[' ', ','][..]).filter(|s| !s.is_empty()) {
            if name == "*" {
                labels.insert(name.to_string(), section);
            } else if let Some(previous) = domains.insert(name.to_string(), section) {
                return Err(format!(
                    "domain {:?} named by sections {} and {}",
                    name, previous, section
                )
                .into());
            }
        }
    }

    // Embedded-site fixes are hand-maintained; carry them over from an
    // existing index rather than inventing them.
    let (cache_domain_index, cache_site_fix, cache_cleanup_timer) = match cache_from {
        Some(path) => {
            let existing: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
            (
                existing
                    .get("cacheDomainIndex")
                    .cloned()
                    .unwrap_or_else(|| json!({})),
                existing
                    .get("cacheSiteFix")
                    .cloned()
                    .unwrap_or_else(|| json!({})),
                existing
                    .get("cacheCleanupTimer")
                    .cloned()
                    .unwrap_or_else(|| json!(13)),
            )
        }
        None => (json!({}), json!({}), json!(13)),
    };

    let index_value = json!({
        "offsets": encode_offsets(&offsets)?,
        "domains": &domains,
        "domainLabels": &labels,
        "nonstandard": [],
        "cacheDomainIndex": cache_domain_index,
        "cacheSiteFix": cache_site_fix,
        "cacheCleanupTimer": cache_cleanup_timer,
    });
    let rendered = format!("{}\n", serde_json::to_string_pretty(&index_value)?);

    // Round-trip through the real loader before writing anything.
    let index = RuleIndex::from_json(&rendered)?;
    index.validate(text.len())?;
    let sections = parser::parse_all(&text, index.offsets())?;

    if verbose {
        for section in &sections {
            println!(
                "section {} ({:?}): {} directives, {} unknown blocks",
                section.index,
                section.heading,
                section.directives().len(),
                section.unknown_blocks().len()
            );
        }
    }

    match output {
        Some(path) => {
            fs::write(path, &rendered)?;
            println!(
                "Generated {:?}: {} sections, {} domains",
                path,
                sections.len(),
                domains.len()
            );
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn check(
    rules_path: &std::path::Path,
    index_path: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(rules_path)?;
    let index = RuleIndex::from_json(&fs::read_to_string(index_path)?)?;

    index.validate(text.len())?;
    let sections = parser::parse_all(&text, index.offsets())?;

    // Offsets must agree with where sections actually start.
    let (scanned, _) = scan_sections(&text);
    if scanned.as_slice() != index.offsets() {
        return Err("offsets table does not match scanned section starts".into());
    }

    println!(
        "OK: {} sections, {} unknown blocks",
        sections.len(),
        sections
            .iter()
            .map(|s| s.unknown_blocks().len())
            .sum::<usize>()
    );
    Ok(())
}

/// Locate section starts: position 0 plus the first non-blank line
/// after each separator.
fn scan_sections(text: &str) -> (Vec<usize>, Vec<String>) {
    let mut offsets = Vec::new();
    let mut headings = Vec::new();
    let mut pos = 0usize;
    let mut expecting_heading = true;

    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches('\n');
        if content == SECTION_SEPARATOR {
            expecting_heading = true;
        } else if expecting_heading && !content.is_empty() {
            offsets.push(pos);
            headings.push(content.to_string());
            expecting_heading = false;
        }
        pos += line.len();
    }

    offsets.push(text.len());
    (offsets, headings)
}
