//! Helper resolution and process invocation.

use crate::error::{Result, SwitchError};
use crate::{ImeSwitcher, ToggleKey};
use async_trait::async_trait;
use imeswitch_context::TargetLang;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::RwLock;
use std::time::Duration;
use tokio::process::Command;

/// File name of the bundled native helper.
pub const HELPER_EXE: &str = "ime-switcher.exe";

/// File name of the PowerShell fallback helper.
pub const HELPER_SCRIPT: &str = "ime-switcher.ps1";

/// Upper bound on a single helper run.
pub const DEFAULT_HELPER_TIMEOUT: Duration = Duration::from_secs(5);

const POWERSHELL: &str = "powershell.exe";
const POWERSHELL_PREFIX: &[&str] = &[
    "-NoProfile",
    "-NonInteractive",
    "-ExecutionPolicy",
    "Bypass",
    "-File",
];

/// A resolved helper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Helper {
    /// Native executable, run directly.
    Exe(PathBuf),
    /// PowerShell script, run through `powershell.exe -File`.
    Script(PathBuf),
}

impl Helper {
    /// Program and arguments for `set <lang>`.
    ///
    /// The executable takes `--key=<key>`; the script takes PowerShell's
    /// named-parameter form `-Key <key>`.
    pub fn set_command(&self, lang: TargetLang, key: ToggleKey) -> (OsString, Vec<OsString>) {
        match self {
            Helper::Exe(path) => (
                path.clone().into_os_string(),
                vec![
                    "set".into(),
                    lang.as_arg().into(),
                    format!("--key={}", key.as_arg()).into(),
                ],
            ),
            Helper::Script(path) => {
                let mut args = script_args(path);
                args.extend(["set", lang.as_arg(), "-Key", key.as_arg()].map(OsString::from));
                (POWERSHELL.into(), args)
            }
        }
    }

    /// Program and arguments for `query`.
    pub fn query_command(&self) -> (OsString, Vec<OsString>) {
        match self {
            Helper::Exe(path) => (path.clone().into_os_string(), vec!["query".into()]),
            Helper::Script(path) => {
                let mut args = script_args(path);
                args.push("query".into());
                (POWERSHELL.into(), args)
            }
        }
    }
}

fn script_args(path: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = POWERSHELL_PREFIX.iter().map(OsString::from).collect();
    args.push(path.as_os_str().to_os_string());
    args
}

/// [`ImeSwitcher`] backed by the external helper process.
///
/// Resolution order:
/// 1. the configured `executable`, used as-is
/// 2. `<base_dir>/bin/ime-switcher.exe`
/// 3. `<base_dir>/bin/ime-switcher.ps1`
pub struct HelperSwitcher {
    base_dir: Option<PathBuf>,
    executable: RwLock<Option<PathBuf>>,
    timeout: Duration,
}

impl HelperSwitcher {
    /// Create a switcher.
    ///
    /// # Arguments
    ///
    /// * `base_dir` - Install directory containing `bin/`. `None` disables
    ///   bundled-helper lookup.
    /// * `executable` - Explicit helper path; takes priority when set.
    pub fn new(base_dir: Option<PathBuf>, executable: Option<PathBuf>) -> Self {
        Self {
            base_dir,
            executable: RwLock::new(non_empty(executable)),
            timeout: DEFAULT_HELPER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the explicit helper path (e.g. after a settings change).
    pub fn set_executable(&self, executable: Option<PathBuf>) {
        let mut guard = self.executable.write().unwrap_or_else(|e| e.into_inner());
        *guard = non_empty(executable);
    }

    /// Find the helper to run.
    pub fn resolve(&self) -> Result<Helper> {
        let explicit = self
            .executable
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if let Some(path) = explicit {
            return Ok(Helper::Exe(path));
        }

        let Some(base_dir) = self.base_dir.as_ref() else {
            return Err(SwitchError::HelperNotFound {
                searched: "(no install directory)".to_string(),
            });
        };

        let bin = base_dir.join("bin");
        let exe = bin.join(HELPER_EXE);
        if exe.is_file() {
            return Ok(Helper::Exe(exe));
        }

        let script = bin.join(HELPER_SCRIPT);
        if script.is_file() {
            return Ok(Helper::Script(script));
        }

        Err(SwitchError::HelperNotFound {
            searched: bin.display().to_string(),
        })
    }

    /// Run the helper and return its combined, trimmed output.
    async fn run(&self, program: OsString, args: Vec<OsString>) -> Result<String> {
        tracing::debug!(program = ?program, args = ?args, "invoking switch helper");

        let child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SwitchError::HelperNotFound {
                        searched: Path::new(&program).display().to_string(),
                    }
                } else {
                    SwitchError::Spawn(e)
                }
            })?;

        // Dropping the future on timeout drops the child, which kills it.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| SwitchError::Timeout(self.timeout))?
            .map_err(SwitchError::Spawn)?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        let text = text.trim().to_string();

        tracing::debug!(status = ?output.status.code(), output = %text, "switch helper finished");

        if !output.status.success() {
            return Err(SwitchError::Exited {
                code: output.status.code(),
                output: text,
            });
        }
        Ok(text)
    }
}

fn non_empty(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
}

#[async_trait]
impl ImeSwitcher for HelperSwitcher {
    async fn switch(&self, lang: TargetLang, key: ToggleKey) -> Result<()> {
        let helper = self.resolve()?;
        let (program, args) = helper.set_command(lang, key);
        self.run(program, args).await.map(|_| ())
    }

    async fn query(&self) -> Result<Option<TargetLang>> {
        let helper = self.resolve()?;
        let (program, args) = helper.query_command();
        let output = self.run(program, args).await?;
        Ok(TargetLang::parse_arg(&output))
    }

    fn is_available(&self) -> bool {
        self.resolve().is_ok()
    }
}

impl std::fmt::Debug for HelperSwitcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelperSwitcher")
            .field("base_dir", &self.base_dir)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn os(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_exe_set_command() {
        let helper = Helper::Exe(PathBuf::from("C:/tools/ime-switcher.exe"));
        let (program, args) = helper.set_command(TargetLang::Zh, ToggleKey::Shift);
        assert_eq!(program, OsString::from("C:/tools/ime-switcher.exe"));
        assert_eq!(args, os(&["set", "zh", "--key=shift"]));
    }

    #[test]
    fn test_script_set_command() {
        let helper = Helper::Script(PathBuf::from("bin/ime-switcher.ps1"));
        let (program, args) = helper.set_command(TargetLang::En, ToggleKey::Auto);
        assert_eq!(program, OsString::from("powershell.exe"));
        assert_eq!(
            args,
            os(&[
                "-NoProfile",
                "-NonInteractive",
                "-ExecutionPolicy",
                "Bypass",
                "-File",
                "bin/ime-switcher.ps1",
                "set",
                "en",
                "-Key",
                "auto",
            ])
        );
    }

    #[test]
    fn test_query_command() {
        let helper = Helper::Exe(PathBuf::from("ime-switcher.exe"));
        assert_eq!(helper.query_command().1, os(&["query"]));

        let script = Helper::Script(PathBuf::from("x.ps1"));
        let (program, args) = script.query_command();
        assert_eq!(program, OsString::from("powershell.exe"));
        assert_eq!(args.last(), Some(&OsString::from("query")));
    }

    #[test]
    fn test_resolve_prefers_explicit_path() {
        let dir = tempdir().unwrap();
        let bin = dir.path().join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join(HELPER_EXE), b"").unwrap();

        let explicit = PathBuf::from("/opt/custom/ime-switcher.exe");
        let switcher = HelperSwitcher::new(Some(dir.path().to_path_buf()), Some(explicit.clone()));
        assert_eq!(switcher.resolve().unwrap(), Helper::Exe(explicit));
    }

    #[test]
    fn test_resolve_exe_before_script() {
        let dir = tempdir().unwrap();
        let bin = dir.path().join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join(HELPER_SCRIPT), b"").unwrap();

        let switcher = HelperSwitcher::new(Some(dir.path().to_path_buf()), None);
        assert_eq!(
            switcher.resolve().unwrap(),
            Helper::Script(bin.join(HELPER_SCRIPT))
        );

        std::fs::write(bin.join(HELPER_EXE), b"").unwrap();
        assert_eq!(switcher.resolve().unwrap(), Helper::Exe(bin.join(HELPER_EXE)));
    }

    #[test]
    fn test_resolve_missing_helper() {
        let dir = tempdir().unwrap();
        let switcher = HelperSwitcher::new(Some(dir.path().to_path_buf()), None);
        assert!(switcher.resolve().unwrap_err().is_helper_missing());
        assert!(!switcher.is_available());

        let switcher = HelperSwitcher::new(None, Some(PathBuf::new()));
        assert!(switcher.resolve().unwrap_err().is_helper_missing());
    }

    #[test]
    fn test_set_executable_at_runtime() {
        let switcher = HelperSwitcher::new(None, None);
        assert!(!switcher.is_available());
        switcher.set_executable(Some(PathBuf::from("ime-switcher.exe")));
        assert!(switcher.is_available());
        switcher.set_executable(None);
        assert!(!switcher.is_available());
    }

    #[tokio::test]
    async fn test_unspawnable_executable_is_helper_missing() {
        let switcher = HelperSwitcher::new(
            None,
            Some(PathBuf::from("imeswitch-definitely-missing-helper")),
        );
        let err = switcher
            .switch(TargetLang::Zh, ToggleKey::Auto)
            .await
            .unwrap_err();
        assert!(err.is_helper_missing(), "unexpected error: {err}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_status_decides_success() {
        let ok = HelperSwitcher::new(None, Some(PathBuf::from("true")));
        assert!(ok.switch(TargetLang::En, ToggleKey::Auto).await.is_ok());

        let failing = HelperSwitcher::new(None, Some(PathBuf::from("false")));
        match failing.switch(TargetLang::En, ToggleKey::Auto).await {
            Err(SwitchError::Exited { code, .. }) => assert_eq!(code, Some(1)),
            other => panic!("expected Exited, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_query_parses_output() {
        // `echo query` prints "query", which is not a language.
        let switcher = HelperSwitcher::new(None, Some(PathBuf::from("echo")));
        assert_eq!(switcher.query().await.unwrap(), None);
    }
}
