// SPDX-License-Identifier: GPL-3.0-only
pub mod android;
pub mod launch;
pub mod traits;

pub use android::AndroidPlugin;
pub use launch::{accept_desktop_file, DesktopFileFilter, DesktopFileLauncher, KeyFile, Launcher};
pub use traits::StorePlugin;
