// src/host/identity.rs

//! Who and where we are: OS name, home, working directory, user.

use std::path::PathBuf;

/// Identity and environment queries. Pure reads that never fail; each falls
/// back to a sensible default when the OS cannot answer.
pub trait Environment: Send + Sync {
    fn os_name(&self) -> String;
    fn home_dir(&self) -> PathBuf;
    fn working_dir(&self) -> PathBuf;
    fn username(&self) -> String;
}

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn os_name(&self) -> String {
        match std::env::consts::OS {
            "linux" => "Linux".to_string(),
            "macos" => "Mac OS X".to_string(),
            "windows" => "Windows".to_string(),
            "freebsd" => "FreeBSD".to_string(),
            other => other.to_string(),
        }
    }

    fn home_dir(&self) -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| self.working_dir())
    }

    fn working_dir(&self) -> PathBuf {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }

    fn username(&self) -> String {
        ["USER", "USERNAME", "LOGNAME"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find(|v| !v.trim().is_empty())
            .or_else(user_from_uid)
            .unwrap_or_else(|| "unknown".to_string())
    }
}

#[cfg(unix)]
fn user_from_uid() -> Option<String> {
    let uid = nix::unistd::getuid();
    nix::unistd::User::from_uid(uid)
        .ok()
        .flatten()
        .map(|u| u.name)
}

#[cfg(not(unix))]
fn user_from_uid() -> Option<String> {
    None
}
