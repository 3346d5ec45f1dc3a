// SPDX-License-Identifier: GPL-3.0-only
use crate::error::PluginError;

/// Optional boolean filter; `False` is a negative filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tristate {
    #[default]
    Unset,
    True,
    False,
}

impl From<bool> for Tristate {
    fn from(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}

/// Filter request issued by the host when listing apps
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub is_source: Tristate,
    pub is_installed: Tristate,
    pub is_for_update: Tristate,
    pub keywords: Option<Vec<String>>,
}

/// The four listings this adapter can answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    Sources,
    Installed,
    Updates,
    Search(Vec<String>),
}

impl Query {
    pub fn sources() -> Self {
        Self { is_source: Tristate::True, ..Self::default() }
    }

    pub fn installed() -> Self {
        Self { is_installed: Tristate::True, ..Self::default() }
    }

    pub fn for_update() -> Self {
        Self { is_for_update: Tristate::True, ..Self::default() }
    }

    pub fn search<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: Some(keywords.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Number of filter dimensions that carry a value
    pub fn n_properties_set(&self) -> usize {
        [self.is_source, self.is_installed, self.is_for_update]
            .iter()
            .filter(|value| **value != Tristate::Unset)
            .count()
            + usize::from(self.keywords.is_some())
    }

    /// Resolve the query into exactly one supported listing
    pub fn classify(&self) -> Result<QueryKind, PluginError> {
        let negative = [self.is_source, self.is_installed, self.is_for_update]
            .contains(&Tristate::False);
        if self.n_properties_set() != 1 || negative {
            return Err(PluginError::not_supported("Unsupported query"));
        }

        if self.is_source == Tristate::True {
            Ok(QueryKind::Sources)
        } else if self.is_installed == Tristate::True {
            Ok(QueryKind::Installed)
        } else if self.is_for_update == Tristate::True {
            Ok(QueryKind::Updates)
        } else if let Some(keywords) = &self.keywords {
            Ok(QueryKind::Search(keywords.clone()))
        } else {
            Err(PluginError::not_supported("Unsupported query type"))
        }
    }
}
