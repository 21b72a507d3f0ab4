#![deny(unsafe_code)]

pub mod grpc;
pub mod pb;

use outliers_core::DetectorConfig;

/// Runtime configuration for the detection service.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub detector: DetectorConfig,
}

/// Shared server state. Detection is a pure function, so the state is just
/// configuration; every call operates on its own input and concurrent calls
/// never contend.
#[derive(Debug, Clone)]
pub struct ServiceState {
    pub detector: DetectorConfig,
}

impl ServiceState {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            detector: config.detector,
        }
    }
}
