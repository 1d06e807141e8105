use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Configuration for a content store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentStoreConfig {
    /// Maximum number of content objects held at once.
    pub object_capacity: usize,
    /// Processing-delay parameters. The store never reads these; they are
    /// handed to whatever queue feeds it work.
    pub service_time: ServiceTimeConfig,
}

impl Default for ContentStoreConfig {
    fn default() -> Self {
        Self {
            object_capacity: 10_000,
            service_time: ServiceTimeConfig::default(),
        }
    }
}

impl ContentStoreConfig {
    /// A default configuration with the given capacity.
    pub fn with_capacity(object_capacity: usize) -> Self {
        Self {
            object_capacity,
            ..Default::default()
        }
    }

    /// Check the configuration for values no component can work with.
    pub fn validate(&self) -> StoreResult<()> {
        self.service_time.validate()
    }
}

/// Simulated processing delay of the store's input queue.
///
/// Servicing one work item takes
/// `layer_delay_constant + layer_delay_slope * name_bytes`, and
/// `layer_delay_servers` items are serviced in parallel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceTimeConfig {
    pub layer_delay_servers: u32,
    pub layer_delay_constant: Duration,
    pub layer_delay_slope: Duration,
}

impl Default for ServiceTimeConfig {
    fn default() -> Self {
        Self {
            layer_delay_servers: 1,
            layer_delay_constant: Duration::from_micros(1),
            layer_delay_slope: Duration::ZERO,
        }
    }
}

impl ServiceTimeConfig {
    /// Time needed to service an item whose name encodes to `name_bytes`.
    pub fn service_time(&self, name_bytes: usize) -> Duration {
        let bytes = u32::try_from(name_bytes).unwrap_or(u32::MAX);
        self.layer_delay_constant
            .saturating_add(self.layer_delay_slope.saturating_mul(bytes))
    }

    pub fn validate(&self) -> StoreResult<()> {
        if self.layer_delay_servers == 0 {
            return Err(StoreError::InvalidConfig(
                "layer_delay_servers must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ContentStoreConfig::default();
        assert_eq!(c.object_capacity, 10_000);
        assert_eq!(c.service_time.layer_delay_constant, Duration::from_micros(1));
        assert_eq!(c.service_time.layer_delay_slope, Duration::ZERO);
        assert_eq!(c.service_time.layer_delay_servers, 1);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn service_time_is_linear_in_name_bytes() {
        let st = ServiceTimeConfig {
            layer_delay_constant: Duration::from_micros(2),
            layer_delay_slope: Duration::from_nanos(10),
            layer_delay_servers: 1,
        };
        assert_eq!(st.service_time(0), Duration::from_micros(2));
        assert_eq!(st.service_time(100), Duration::from_micros(3));
    }

    #[test]
    fn zero_servers_is_invalid() {
        let mut c = ContentStoreConfig::with_capacity(4);
        c.service_time.layer_delay_servers = 0;
        assert!(matches!(c.validate(), Err(StoreError::InvalidConfig(_))));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let c: ContentStoreConfig = serde_json::from_str(r#"{"object_capacity": 3}"#).unwrap();
        assert_eq!(c, ContentStoreConfig::with_capacity(3));
    }
}
