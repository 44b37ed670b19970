use crate::domain::transaction::Transaction;
use crate::error::{PaymentError, Result};
use clap::Args;
use serde::Deserialize;
use tokio::sync::mpsc;

pub const DEFAULT_INBOUND_CAPACITY: usize = 64;
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 64;

/// Channel sizing for the validation pipeline.
///
/// The capacities are the backpressure knob: once the outbound channel is
/// full the worker stalls, stops draining the inbound channel, and
/// producers block as soon as that one fills up too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Args, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of transactions buffered between the producer and the validation worker.
    #[arg(long, default_value_t = DEFAULT_INBOUND_CAPACITY)]
    pub inbound_capacity: usize,

    /// Number of valid transactions buffered between the worker and the downstream consumer.
    #[arg(long, default_value_t = DEFAULT_OUTBOUND_CAPACITY)]
    pub outbound_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            inbound_capacity: DEFAULT_INBOUND_CAPACITY,
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
        }
    }
}

impl PipelineConfig {
    /// Bounded Tokio channels have no rendezvous mode, so both capacities must be at least one.
    pub fn validate(&self) -> Result<()> {
        if self.inbound_capacity == 0 {
            return Err(PaymentError::ConfigError(
                "inbound capacity must be at least 1".to_string(),
            ));
        }
        if self.outbound_capacity == 0 {
            return Err(PaymentError::ConfigError(
                "outbound capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn inbound_channel(&self) -> Result<(mpsc::Sender<Transaction>, mpsc::Receiver<Transaction>)> {
        self.validate()?;
        Ok(mpsc::channel(self.inbound_capacity))
    }

    pub fn outbound_channel(&self) -> Result<(mpsc::Sender<Transaction>, mpsc::Receiver<Transaction>)> {
        self.validate()?;
        Ok(mpsc::channel(self.outbound_capacity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.inbound_capacity, DEFAULT_INBOUND_CAPACITY);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let config = PipelineConfig {
            inbound_capacity: 8,
            outbound_capacity: 0,
        };

        assert!(matches!(config.validate(), Err(PaymentError::ConfigError(_))));
        assert!(config.outbound_channel().is_err());
        assert!(config.inbound_channel().is_err());
    }

    #[test]
    fn test_channel_capacity_matches_config() {
        let config = PipelineConfig {
            inbound_capacity: 3,
            outbound_capacity: 1,
        };

        let (inbound_tx, _inbound_rx) = config.inbound_channel().unwrap();
        let (outbound_tx, _outbound_rx) = config.outbound_channel().unwrap();
        assert_eq!(inbound_tx.max_capacity(), 3);
        assert_eq!(outbound_tx.max_capacity(), 1);
    }

    #[test]
    fn test_partial_config_deserialization_uses_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"outbound_capacity": 2}"#).unwrap();

        assert_eq!(config.inbound_capacity, DEFAULT_INBOUND_CAPACITY);
        assert_eq!(config.outbound_capacity, 2);
    }
}
