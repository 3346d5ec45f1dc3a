// SPDX-License-Identifier: GPL-3.0-only

/// Coarse progress hint published while a store call is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginStatus {
    Downloading,
    Waiting,
}

/// Notifications published to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginEvent {
    /// The set of installed or updatable apps may have changed
    UpdatesChanged,
    Status(PluginStatus),
}
