// SPDX-License-Identifier: GPL-3.0-only
pub mod app_cache;

pub use app_cache::AppCache;
