use serde::{Deserialize, Serialize};

use crate::normalize::NormalizationRules;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NormalizeConfig {
    /// Replaces the built-in skip list when set.
    #[serde(default)]
    pub skip_types: Option<Vec<String>>,
}

impl NormalizeConfig {
    pub fn rules(&self) -> NormalizationRules {
        match &self.skip_types {
            Some(types) => NormalizationRules::with_skip_types(types.iter().cloned()),
            None => NormalizationRules::default(),
        }
    }
}
