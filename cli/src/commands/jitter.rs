use anyhow::Result;
use featurejitter::{jitter_dataset, JitterConfig};

/// Start from the config file (or the defaults) and let explicit flags override it.
fn resolve_config(args: &crate::cli::JitterArgs) -> Result<JitterConfig> {
    let mut config = match &args.config {
        Some(path) => JitterConfig::from_json_file(path)?,
        None => JitterConfig::default(),
    };
    if let Some(min_dist) = args.min_dist { config.min_dist = min_dist }
    if let Some(max_dist) = args.max_dist { config.max_dist = max_dist }
    if let Some(seed) = args.seed { config.seed = Some(seed) }
    Ok(config)
}

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::JitterArgs) -> Result<()> {
    let config = resolve_config(args)?;

    log::info!(
        "[jitter] {} -> {} by [{}, {}]",
        args.input.display(), args.output.display(), config.min_dist, config.max_dist
    );
    let report = jitter_dataset(&args.input, &args.output, &config, args.force)?;

    let kind = report.shape_kind.map(|kind| format!("{kind} ")).unwrap_or_default();
    println!(
        "Jittered {} {}features into {} in {:.3} seconds",
        report.features,
        kind,
        args.output.display(),
        report.elapsed.as_secs_f64()
    );

    Ok(())
}
