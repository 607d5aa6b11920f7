use super::prompt::{ForceOverwrite, PromptConfirmation};
use crate::config::{
    kubeconfig_path, resolve_editor, ConfigSource, EditorSource, FileSource, PathOrigin, Settings,
};
use crate::kubeconfig::{CollisionPolicy, MergeEngine, MergeOutcome};
use crate::types::Args;
use crate::utils::logging::{FileLogger, Logger, MultiLogger, StderrLogger};
use std::{
    env, fs,
    io::{self, Write},
    path::Path,
};

pub fn run(args: &Args) -> io::Result<()> {
    let settings = Settings::load(args.settings.as_deref())?;
    let logger = build_logger(args, &settings)?;

    let (path, origin) = kubeconfig_path(args.kubeconfig.as_deref())?;

    let source: Box<dyn ConfigSource> = match &args.new_config {
        Some(p) => Box::new(FileSource::new(p)),
        None => Box::new(EditorSource::new(resolve_editor(
            settings.editor.as_deref(),
            env::var("EDITOR").ok(),
        ))),
    };

    let policy: Box<dyn CollisionPolicy> = if args.force || settings.always_force {
        Box::new(ForceOverwrite)
    } else {
        Box::new(PromptConfirmation)
    };

    let mut engine = MergeEngine::new(logger, policy);
    merge_into(
        &mut engine,
        &path,
        origin,
        source,
        &args.context_name,
        args.dry_run,
        &mut io::stdout(),
    )?;
    Ok(())
}

fn build_logger(args: &Args, settings: &Settings) -> io::Result<Box<dyn Logger>> {
    let debug = args.verbose > 0 || settings.debug;
    let mut loggers: Vec<Box<dyn Logger>> = vec![Box::new(StderrLogger::new(debug))];

    if let Some(log_file) = args.log_file.as_deref().or(settings.log_file.as_deref()) {
        let log_file = shellexpand::tilde(log_file).to_string();
        loggers.push(Box::new(FileLogger::new(&log_file, debug)?));
    }

    Ok(Box::new(MultiLogger::new(loggers)))
}

/// Reads both documents, merges and writes the result back to `path` (or to
/// `out` for a dry run). A declined overwrite leaves the file untouched.
pub fn merge_into(
    engine: &mut MergeEngine,
    path: &Path,
    origin: PathOrigin,
    mut source: Box<dyn ConfigSource>,
    name: &str,
    dry_run: bool,
    out: &mut dyn Write,
) -> io::Result<MergeOutcome> {
    engine.debug_log(&format!(
        "using kubeconfig {} (from {})",
        path.display(),
        origin
    ));
    let current = fs::read(path).map_err(|e| {
        io::Error::new(
            e.kind(),
            format!("could not load kubeconfig file '{}': {}", path.display(), e),
        )
    })?;

    engine.debug_log(&format!("reading new config from {}", source.describe()));
    let incoming = source.read()?;

    let (merged, outcome) = engine.merge_documents(&current, &incoming, name)?;

    if dry_run {
        out.write_all(&merged)?;
        return Ok(outcome);
    }

    if outcome == MergeOutcome::Skipped {
        engine.log(&format!("kubeconfig {} left unchanged", path.display()));
        return Ok(outcome);
    }

    engine.debug_log(&format!("saving config to {}", path.display()));
    fs::write(path, &merged)?;
    engine.log(&format!("saved context '{}' to {}", name, path.display()));
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubeconfig::{Decision, KubeConfig};
    use crate::utils::logging::MemoryLogger;
    use tempfile::TempDir;

    const TARGET: &str = r#"apiVersion: v1
kind: Config
current-context: prod
clusters:
- name: prod
  cluster:
    server: https://prod.example.com
users:
- name: prod
  user:
    client-key-data: UFJPRA==
contexts:
- name: prod
  context:
    cluster: prod
    user: prod
preferences: {}
"#;

    const INCOMING: &str = r#"clusters:
- name: kind
  cluster:
    server: https://127.0.0.1:39000
users:
- name: kind
  user:
    client-key-data: S0lORA==
contexts:
- name: kind
  context:
    cluster: kind
    user: kind
"#;

    struct Fixed(Decision);

    impl CollisionPolicy for Fixed {
        fn decide(&mut self, _name: &str) -> io::Result<Decision> {
            Ok(self.0)
        }
    }

    struct Setup {
        _dir: TempDir,
        target: std::path::PathBuf,
        incoming: String,
    }

    fn setup() -> io::Result<Setup> {
        let dir = TempDir::new()?;
        let target = dir.path().join("config");
        let incoming = dir.path().join("new.yaml");
        fs::write(&target, TARGET)?;
        fs::write(&incoming, INCOMING)?;
        Ok(Setup {
            incoming: incoming.to_string_lossy().to_string(),
            target,
            _dir: dir,
        })
    }

    fn engine(decision: Decision) -> (MergeEngine, MemoryLogger) {
        let logger = MemoryLogger::new();
        (
            MergeEngine::new(Box::new(logger.clone()), Box::new(Fixed(decision))),
            logger,
        )
    }

    #[test]
    fn appends_and_writes_back() -> io::Result<()> {
        let setup = setup()?;
        let (mut engine, logger) = engine(Decision::Skip);
        let mut out = Vec::new();

        let outcome = merge_into(
            &mut engine,
            &setup.target,
            PathOrigin::Flag,
            Box::new(FileSource::new(&setup.incoming)),
            "kind-dev",
            false,
            &mut out,
        )?;

        assert_eq!(outcome, MergeOutcome::Appended);
        assert!(out.is_empty());
        let written = KubeConfig::from_yaml(&fs::read(&setup.target)?)?;
        assert_eq!(written.contexts.len(), 2);
        assert_eq!(written.contexts[1].name, "kind-dev");
        assert_eq!(written.contexts[1].context.cluster, "kind-dev");
        assert!(logger
            .lines()
            .iter()
            .any(|l| l.starts_with("saved context 'kind-dev'")));
        Ok(())
    }

    #[test]
    fn declined_overwrite_leaves_file_untouched() -> io::Result<()> {
        let setup = setup()?;
        let (mut engine, _) = engine(Decision::Skip);

        let outcome = merge_into(
            &mut engine,
            &setup.target,
            PathOrigin::Environment,
            Box::new(FileSource::new(&setup.incoming)),
            "prod",
            false,
            &mut Vec::new(),
        )?;

        assert_eq!(outcome, MergeOutcome::Skipped);
        assert_eq!(fs::read_to_string(&setup.target)?, TARGET);
        Ok(())
    }

    #[test]
    fn dry_run_prints_instead_of_writing() -> io::Result<()> {
        let setup = setup()?;
        let (mut engine, _) = engine(Decision::Overwrite);
        let mut out = Vec::new();

        let outcome = merge_into(
            &mut engine,
            &setup.target,
            PathOrigin::Home,
            Box::new(FileSource::new(&setup.incoming)),
            "prod",
            true,
            &mut out,
        )?;

        assert_eq!(outcome, MergeOutcome::Overwritten);
        assert_eq!(fs::read_to_string(&setup.target)?, TARGET);
        let printed = KubeConfig::from_yaml(&out)?;
        assert_eq!(
            printed.find_cluster("prod")?.cluster.server,
            "https://127.0.0.1:39000"
        );
        Ok(())
    }

    #[test]
    fn partial_collision_writes_nothing() -> io::Result<()> {
        let setup = setup()?;
        let partial = TARGET.replace("- name: prod\n  context:", "- name: other\n  context:");
        fs::write(&setup.target, &partial)?;
        let (mut engine, _) = engine(Decision::Overwrite);

        let err = merge_into(
            &mut engine,
            &setup.target,
            PathOrigin::Flag,
            Box::new(FileSource::new(&setup.incoming)),
            "prod",
            false,
            &mut Vec::new(),
        )
        .unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(fs::read_to_string(&setup.target)?, partial);
        Ok(())
    }

    #[test]
    fn missing_kubeconfig_is_fatal() -> io::Result<()> {
        let setup = setup()?;
        let (mut engine, _) = engine(Decision::Overwrite);
        let missing = setup.target.with_file_name("absent");

        let err = merge_into(
            &mut engine,
            &missing,
            PathOrigin::Flag,
            Box::new(FileSource::new(&setup.incoming)),
            "prod",
            false,
            &mut Vec::new(),
        )
        .unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("could not load kubeconfig file"));
        assert!(!missing.exists());
        Ok(())
    }

    #[test]
    fn undecodable_new_config_is_invalid_data() -> io::Result<()> {
        let setup = setup()?;
        fs::write(&setup.incoming, "clusters: [")?;
        let (mut engine, _) = engine(Decision::Overwrite);

        let err = merge_into(
            &mut engine,
            &setup.target,
            PathOrigin::Flag,
            Box::new(FileSource::new(&setup.incoming)),
            "staging",
            false,
            &mut Vec::new(),
        )
        .unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(fs::read_to_string(&setup.target)?, TARGET);
        Ok(())
    }
}
