use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

pub const MIN_MAX_TOKENS: u32 = 1;
pub const MAX_MAX_TOKENS: u32 = 32_768;
pub const DEFAULT_MAX_TOKENS: u32 = 16_384;
pub const DEFAULT_TEMPERATURE: f64 = 0.0;

/// The Bedrock models a run may be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelChoice {
    #[default]
    Claude35Sonnet,
    Claude3Sonnet,
    Claude3Haiku,
}

impl ModelChoice {
    pub const ALL: [Self; 3] = [Self::Claude35Sonnet, Self::Claude3Sonnet, Self::Claude3Haiku];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Claude35Sonnet => "Claude 3.5 Sonnet",
            Self::Claude3Sonnet => "Claude 3 Sonnet",
            Self::Claude3Haiku => "Claude 3 Haiku",
        }
    }

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Claude35Sonnet => "anthropic.claude-3-5-sonnet-20240620-v1:0",
            Self::Claude3Sonnet => "anthropic.claude-3-sonnet-20240229-v1:0",
            Self::Claude3Haiku => "anthropic.claude-3-haiku-20240307-v1:0",
        }
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts either the display label or the Bedrock model id.
impl FromStr for ModelChoice {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|choice| choice.label() == value || choice.id() == value)
            .ok_or_else(|| ConfigError::UnknownModel(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub model: ModelChoice,
    pub max_tokens: u32,
    pub temperature: f64,
    pub include_explanation: bool,
}

impl ModelConfig {
    pub fn new(
        model: ModelChoice,
        max_tokens: u32,
        temperature: f64,
        include_explanation: bool,
    ) -> Result<Self, ConfigError> {
        if !(MIN_MAX_TOKENS..=MAX_MAX_TOKENS).contains(&max_tokens) {
            return Err(ConfigError::MaxTokensOutOfRange {
                value: max_tokens,
                min: MIN_MAX_TOKENS,
                max: MAX_MAX_TOKENS,
            });
        }
        if !(0.0..=1.0).contains(&temperature) {
            return Err(ConfigError::TemperatureOutOfRange(temperature));
        }

        Ok(Self {
            model,
            max_tokens,
            temperature,
            include_explanation,
        })
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: ModelChoice::default(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            include_explanation: false,
        }
    }
}
