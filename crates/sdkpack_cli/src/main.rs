mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use sdkpack_io_fs::{
    EnumSdkPreset, EnumStageFailurePolicy, Installer, ReportInstall, SpecInstallOptions,
    SpecSdkConfig,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(report) => {
            for spec_error in report.iter_errors() {
                warn!("{spec_error}");
            }
            info!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(cli: &Cli) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

fn load_config(cli: &Cli) -> Result<SpecSdkConfig> {
    match &cli.config {
        Some(path_config) => SpecSdkConfig::load(path_config)
            .with_context(|| format!("loading SDK config '{}'", path_config.display())),
        None => Ok(EnumSdkPreset::from(cli.preset).config()),
    }
}

fn run(cli: &Cli) -> Result<ReportInstall> {
    let config = load_config(cli)?;
    info!(
        library = %config.library_name,
        source = %cli.source_root.display(),
        destination = %cli.dest_root.display(),
        "packaging SDK"
    );

    let options = SpecInstallOptions {
        rule_stage_failure: if cli.fail_fast {
            EnumStageFailurePolicy::FailFast
        } else {
            EnumStageFailurePolicy::BestEffort
        },
        if_dry_run: cli.dry_run,
    };
    let installer = Installer::new(config.resolve(&cli.source_root, &cli.dest_root), options);
    let report = installer
        .run()
        .with_context(|| format!("installing `{}`", config.library_name))?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use tempfile::TempDir;

    use super::{load_config, run};
    use crate::cli::Cli;

    #[test]
    fn load_config_prefers_config_file_over_preset() {
        let tmp = TempDir::new().expect("tempdir");
        let path_config = tmp.path().join("zlib.toml");
        fs::write(
            &path_config,
            r#"
library_name = "zlib"

[layout]
paths = ["include", "lib/X64"]

[[headers]]
source = "."
destination = "include"

[libraries]
source = "out"
destination = "lib"
mappings = [["x64", "X64"]]
"#,
        )
        .expect("write config");

        let c_config = path_config.to_string_lossy().to_string();
        let cli = Cli::try_parse_from(["sdkpack", "/src", "/dst", "--config", &c_config])
            .expect("parse");
        assert_eq!(load_config(&cli).expect("load").library_name, "zlib");

        let cli = Cli::try_parse_from(["sdkpack", "/src", "/dst", "--preset", "gfx_lib"])
            .expect("parse");
        assert_eq!(load_config(&cli).expect("preset").library_name, "gfx_lib");
    }

    #[test]
    fn run_packages_gfx_lib_preset() {
        let tmp = TempDir::new().expect("tempdir");
        let root_src = tmp.path().join("src");
        let root_dst = tmp.path().join("dst");
        let path_header = root_src.join("gfx_lib/gfx_lib/vector4.h");
        let path_lib = root_src.join("gfx_lib/build_output/X64/lib/gfx_lib.lib");
        for path_file in [&path_header, &path_lib] {
            fs::create_dir_all(path_file.parent().expect("parent")).expect("mkdir");
            fs::write(path_file, "x").expect("write");
        }
        fs::create_dir_all(&root_dst).expect("mkdir dst");

        let c_src = root_src.to_string_lossy().to_string();
        let c_dst = root_dst.to_string_lossy().to_string();
        let cli = Cli::try_parse_from(["sdkpack", &c_src, &c_dst, "--preset", "gfx_lib"])
            .expect("parse");
        let report = run(&cli).expect("run");

        assert!(root_dst.join("gfx_lib/include/gfx/vector4.h").exists());
        assert!(root_dst.join("gfx_lib/lib/X64/gfx_lib.lib").exists());
        assert_eq!(report.report_libraries.error_count(), 1);
    }

    #[test]
    fn run_fail_fast_reports_error() {
        let tmp = TempDir::new().expect("tempdir");
        let c_src = tmp.path().join("src").to_string_lossy().to_string();
        let c_dst = tmp.path().join("missing").to_string_lossy().to_string();
        let cli = Cli::try_parse_from(["sdkpack", &c_src, &c_dst, "--fail-fast"]).expect("parse");

        let err = run(&cli).expect_err("must stop");
        assert!(format!("{err:#}").contains("Stage `build` failed"));
    }
}
