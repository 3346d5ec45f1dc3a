// SPDX-License-Identifier: GPL-3.0-only
use url::Url;

use crate::model::RemoteIcon;

#[derive(thiserror::Error, Debug)]
pub enum IconUrlError {
    #[error("Icon URL must start with http:// or https://: {0}")]
    UnsupportedScheme(String),

    #[error("Invalid icon URL: {0}")]
    Invalid(#[from] url::ParseError),
}

/// Accept an icon URL only if it names an explicit HTTP(S) transfer scheme
pub fn parse_icon_url(raw: &str) -> Result<RemoteIcon, IconUrlError> {
    if !raw.starts_with("http://") && !raw.starts_with("https://") {
        return Err(IconUrlError::UnsupportedScheme(raw.to_string()));
    }

    let url = Url::parse(raw)?;
    Ok(RemoteIcon { url })
}
