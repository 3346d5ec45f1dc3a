// SPDX-License-Identifier: GPL-3.0-only

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshMetadataFlags {
    pub interactive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListAppsFlags {
    pub interactive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstallAppsFlags {
    pub interactive: bool,
    /// Only apply previously downloaded payloads
    pub no_download: bool,
    /// Only download, do not apply
    pub no_apply: bool,
}

impl InstallAppsFlags {
    /// Split download/apply phases are not offered by the store service
    pub fn is_supported(&self) -> bool {
        !(self.no_download || self.no_apply)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UninstallAppsFlags {
    pub interactive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ManageRepositoryFlags {
    pub interactive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateAppsFlags {
    pub interactive: bool,
    pub no_download: bool,
    /// Download only; the store service applies nothing
    pub no_apply: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LaunchFlags {
    pub interactive: bool,
}
