// src/host/mod.rs

//! Host collaborators around the process supervisor.
//!
//! Each is a small service object behind a trait (or generic over the
//! `Launcher`) so callers can swap in fakes:
//!
//! - [`identity`]: OS name, home/working directory, user name.
//! - [`clock`]: formatting the current date/time.
//! - [`clipboard`]: reading/writing clipboard text via platform tools.
//! - [`volume`]: filesystem-entry metadata and capacity.
//! - [`desktop`]: opening paths in the desktop shell.
//! - [`keyboard`]: keyboard layout from the locale.

pub mod clipboard;
pub mod clock;
pub mod desktop;
pub mod identity;
pub mod keyboard;
pub mod volume;

pub use clipboard::{ClipboardTools, CommandClipboard};
pub use clock::{SystemClock, TimeDate};
pub use desktop::{DesktopShell, EntryKind, OpenOutcome};
pub use identity::{Environment, SystemEnvironment};
pub use keyboard::{KeyboardLayout, LocaleKeyboard};
pub use volume::{SpaceUsage, SystemVolumes, VolumeInfo};
