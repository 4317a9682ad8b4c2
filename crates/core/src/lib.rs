#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod metrics;
pub mod page;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, ErrorKind, ResourceError, TestrackError};

// 설정
pub use config::TestrackConfig;

// 페이지 봉투
pub use page::Page;

// 도메인 타입
pub use types::{
    Activity, ActivitySpec, CatalogEntry, DistroSpec, Job, JobSpec, LinuxDistro,
    SoftwareComponent, SoftwareComponentSpec, TestEnvironment, TestEnvironmentSpec, TestResult,
    TestSpec, VersionInfo,
};
