// config/paths.rs
use std::ffi::OsString;
use std::{env, io, path::PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOrigin {
    Flag,
    Environment,
    Home,
}

impl std::fmt::Display for PathOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag => write!(f, "--kubeconfig"),
            Self::Environment => write!(f, "KUBECONFIG"),
            Self::Home => write!(f, "default location"),
        }
    }
}

pub fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

/// Picks the kubeconfig to modify: the explicit path, then the first entry of
/// `KUBECONFIG`, then `~/.kube/config`.
pub fn resolve_kubeconfig_path(
    explicit: Option<&str>,
    kubeconfig_env: Option<OsString>,
    home: Option<PathBuf>,
) -> io::Result<(PathBuf, PathOrigin)> {
    if let Some(path) = explicit.filter(|p| !p.is_empty()) {
        return Ok((expand(path), PathOrigin::Flag));
    }

    if let Some(paths) = kubeconfig_env {
        if let Some(first) = env::split_paths(&paths).find(|p| !p.as_os_str().is_empty()) {
            return Ok((expand(&first.to_string_lossy()), PathOrigin::Environment));
        }
    }

    match home {
        Some(home) => Ok((home.join(".kube").join("config"), PathOrigin::Home)),
        None => Err(io::Error::new(
            io::ErrorKind::NotFound,
            "could not find home directory",
        )),
    }
}

pub fn kubeconfig_path(explicit: Option<&str>) -> io::Result<(PathBuf, PathOrigin)> {
    resolve_kubeconfig_path(explicit, env::var_os("KUBECONFIG"), dirs::home_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let (path, origin) = resolve_kubeconfig_path(
            Some("/tmp/kube.yaml"),
            Some(OsString::from("/env/config")),
            Some(PathBuf::from("/home/dev")),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/tmp/kube.yaml"));
        assert_eq!(origin, PathOrigin::Flag);
    }

    #[test]
    fn environment_before_home() {
        let (path, origin) = resolve_kubeconfig_path(
            None,
            Some(OsString::from("/env/config")),
            Some(PathBuf::from("/home/dev")),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/env/config"));
        assert_eq!(origin, PathOrigin::Environment);
    }

    #[cfg(unix)]
    #[test]
    fn environment_list_uses_first_entry() {
        let (path, _) = resolve_kubeconfig_path(
            None,
            Some(OsString::from(":/env/a:/env/b")),
            None,
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/env/a"));
    }

    #[test]
    fn empty_environment_falls_back_to_home() {
        let (path, origin) = resolve_kubeconfig_path(
            Some(""),
            Some(OsString::new()),
            Some(PathBuf::from("/home/dev")),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/home/dev").join(".kube").join("config"));
        assert_eq!(origin, PathOrigin::Home);
    }

    #[test]
    fn no_home_is_an_error() {
        let err = resolve_kubeconfig_path(None, None, None).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
