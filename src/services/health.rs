// Health service: liveness ping and build metadata

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct Ping {
    pub pong: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VersionInfo {
    /// Environment the server is running in
    pub env: String,
    pub version: String,
    pub name: String,
}

#[derive(Clone)]
pub struct HealthService {
    environment: String,
}

impl HealthService {
    pub fn new(environment: String) -> Self {
        Self { environment }
    }

    pub fn ping(&self) -> Ping {
        Ping { pong: true }
    }

    pub fn version(&self) -> VersionInfo {
        VersionInfo {
            env: self.environment.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            name: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_pongs() {
        let service = HealthService::new("test".to_string());
        assert!(service.ping().pong);
    }

    #[test]
    fn version_reports_build_metadata() {
        let service = HealthService::new("test".to_string());
        let info = service.version();
        assert_eq!(info.env, "test");
        assert_eq!(info.name, env!("CARGO_PKG_NAME"));
        assert!(!info.version.is_empty());
    }
}
