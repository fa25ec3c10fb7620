use clap::Args;
use std::path::PathBuf;

use sbomcheck::checker::{Compliance, SbomChecker, SbomSpec};
use sbomcheck::defaults::Defaults;
use sbomcheck::io::write_file;
use sbomcheck::paths;
use sbomcheck::report::{self, OutputFormat};
use sbomcheck::version::get_spdx_version;
use sbomcheck::{log_status, Error};
use tracing::{debug, warn};

use super::CmdResult;

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// SBOM file to check
    #[arg(value_name = "FILE")]
    pub file: Option<String>,

    /// SBOM file to check (legacy form of FILE)
    #[arg(long = "file", value_name = "FILE", hide = true)]
    pub legacy_file: Option<String>,

    /// SBOM specification [default: spdx2]
    #[arg(short = 's', long, value_enum)]
    pub sbom_spec: Option<SbomSpec>,

    /// Compliance standard to check against [default: ntia]
    #[arg(short = 'c', long, value_enum, alias = "conform")]
    pub comply: Option<Compliance>,

    /// Skip SPDX validation of the document
    #[arg(long, overrides_with = "no_skip_validation")]
    pub skip_validation: bool,

    /// Validate even when the config file sets skipValidation
    #[arg(long, overrides_with = "skip_validation")]
    pub no_skip_validation: bool,

    /// Output format [default: print]
    #[arg(short = 'r', long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Write the JSON or HTML report to this file instead of stdout
    #[arg(short = 'o', long, value_name = "PATH", alias = "output_path")]
    pub output_file: Option<String>,

    /// Show validation context and components missing information
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl CheckArgs {
    /// Positional FILE, falling back to the legacy `--file` option.
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref().or(self.legacy_file.as_deref())
    }

    pub fn output_format(&self, defaults: &Defaults) -> OutputFormat {
        self.output.unwrap_or(defaults.output)
    }

    /// Whether to validate: the last of the two flags wins, config otherwise.
    pub fn validate(&self, defaults: &Defaults) -> bool {
        if self.no_skip_validation {
            true
        } else if self.skip_validation {
            false
        } else {
            !defaults.skip_validation
        }
    }
}

/// What the command produced, for `main` to emit.
#[derive(Debug)]
pub enum CheckOutput {
    Stdout(String),
    Written(PathBuf),
    Silent,
}

pub fn run(args: CheckArgs, defaults: &Defaults) -> CmdResult<CheckOutput> {
    let file = args
        .file()
        .ok_or_else(|| Error::validation_missing_argument(vec!["FILE".to_string()]))?
        .to_string();
    let path = paths::expand(&file);

    let requested = args.sbom_spec.unwrap_or(defaults.sbom_spec);
    let compliance = args.comply.unwrap_or(defaults.comply);
    let validate = args.validate(defaults);
    let output = args.output_format(defaults);

    if !path.is_file() {
        return Err(Error::file_not_found(path.display().to_string(), "read SBOM"));
    }

    let version =
        get_spdx_version(&path, requested).ok_or_else(|| Error::sbom_version_undetected(&file))?;

    if !defaults.is_supported_version(version) {
        return Err(Error::sbom_version_unsupported(
            &file,
            format!("{}.{}", version.0, version.1),
        ));
    }

    let sbom_spec = SbomSpec::for_version(version).unwrap_or(requested);
    if sbom_spec != requested {
        debug!(
            "Detected SPDX {}.{}, switching to {}",
            version.0,
            version.1,
            sbom_spec
        );
    }

    log_status!(
        "check",
        "Checking {} against {}",
        path.display(),
        compliance.title()
    );

    let checker = SbomChecker::new(&path, validate, compliance, sbom_spec);
    let exit_code = if checker.compliant { 0 } else { 1 };

    let rendered = match output {
        OutputFormat::Quiet => return Ok((CheckOutput::Silent, exit_code)),
        OutputFormat::Print => {
            if args.output_file.is_some() {
                warn!("--output-file only applies to json and html output");
            }
            return Ok((
                CheckOutput::Stdout(report::render_table_output(&checker, args.verbose)),
                exit_code,
            ));
        }
        OutputFormat::Json => serde_json::to_string_pretty(&report::output_json(&checker))
            .map_err(|e| Error::internal_json(e.to_string(), Some("serialize report".to_string())))?,
        OutputFormat::Html => report::output_html(&checker),
    };

    match args.output_file.as_deref() {
        Some(target) => {
            let target = paths::expand(target);
            write_file(&target, &rendered, "write report")?;
            log_status!("check", "Report written to {}", target.display());
            Ok((CheckOutput::Written(target), exit_code))
        }
        None => Ok((CheckOutput::Stdout(rendered), exit_code)),
    }
}
