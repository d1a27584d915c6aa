//! Run command - Translate a Score file into Helm values.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Map;
use tracing::{info, warn};

use score_helm::{convert, HelmValues, ValuesWriter};
use score_spec::{apply_property, merge_overrides, SchemaValidator, SpecReader};

pub const SCORE_FILE_DEFAULT: &str = "./score.yaml";
pub const OVERRIDES_FILE_DEFAULT: &str = "./overrides.score.yaml";

#[derive(Args)]
pub struct RunArgs {
    /// Source SCORE file
    #[arg(short, long, env = "SCORE_HELM_FILE", default_value = SCORE_FILE_DEFAULT)]
    pub file: PathBuf,

    /// Overrides file
    #[arg(long, default_value = OVERRIDES_FILE_DEFAULT)]
    pub overrides: PathBuf,

    /// Imported values file (in YAML format)
    #[arg(long, env = "SCORE_HELM_VALUES")]
    pub values: Option<PathBuf>,

    /// Output file
    #[arg(short, long, env = "SCORE_HELM_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Overrides selected property value (`path=value`), or removes it (`path`)
    #[arg(short = 'p', long = "property")]
    pub properties: Vec<String>,

    /// DEPRECATED: Disables Score file schema validation
    #[arg(long)]
    pub skip_validation: bool,
}

pub fn execute(args: RunArgs) -> Result<()> {
    let values = prepare_values(&args)?;

    info!("Writing Helm values...");
    let content = ValuesWriter::to_yaml_string(&values).context("rendering Helm values")?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(content.as_bytes())?;
    stdout.flush()?;

    if let Some(output) = &args.output {
        info!("Creating '{}'...", output.display());
        fs::write(output, &content)
            .with_context(|| format!("writing output file '{}'", output.display()))?;
    }

    Ok(())
}

/// Load, override, validate and convert the Score file.
fn prepare_values(args: &RunArgs) -> Result<HelmValues> {
    info!("Reading '{}'...", args.file.display());
    let mut document = SpecReader::read_document(&args.file)
        .with_context(|| format!("reading '{}'", args.file.display()))?;

    if let Some(overrides) = load_overrides(&args.overrides)? {
        info!("Applying SCORE overrides...");
        merge_overrides(&mut document, overrides);
    }

    for property in &args.properties {
        info!("Applying SCORE properties overrides...");
        apply_property(&mut document, property)
            .with_context(|| format!("overriding '{}'", property))?;
    }

    let imported = match &args.values {
        Some(path) => {
            info!("Importing values from '{}'...", path.display());
            SpecReader::read_values(path)
                .with_context(|| format!("parsing values file '{}'", path.display()))?
        }
        None => Map::new(),
    };

    if args.skip_validation {
        warn!("--skip-validation is deprecated, schema validation is disabled");
    } else {
        info!("Validating SCORE spec...");
        let result = SchemaValidator::new()?.validate(&document);
        for warning in &result.warnings {
            warn!("{}", warning);
        }
        result.into_result().context("validating workload spec")?;
    }

    let workload = SpecReader::decode_workload(document).context("decoding workload spec")?;

    info!("Preparing Helm values...");
    let values = convert(&workload, &imported).context("preparing Helm values")?;
    Ok(values)
}

/// A missing overrides file is only an error when it was asked for explicitly.
fn load_overrides(path: &Path) -> Result<Option<serde_json::Value>> {
    if path.as_os_str().is_empty() {
        return Ok(None);
    }

    info!("Checking '{}'...", path.display());
    if !path.exists() {
        if path == Path::new(OVERRIDES_FILE_DEFAULT) {
            return Ok(None);
        }
        anyhow::bail!("overrides file not found: {}", path.display());
    }

    let overrides = SpecReader::read_document(path)
        .with_context(|| format!("applying overrides from '{}'", path.display()))?;
    Ok(Some(overrides))
}
