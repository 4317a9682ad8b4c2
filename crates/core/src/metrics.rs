//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 크레이트는 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`
//! 매크로를 호출합니다. 레코더가 설치되지 않았으면 매크로는 아무 일도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `testrack_`
//! - 영역: `http_`, `registry_`, `jobs_`, `daemon_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency), 없음 (gauge)

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// HTTP 메서드 레이블 키
pub const LABEL_METHOD: &str = "method";

/// HTTP 상태 코드 레이블 키
pub const LABEL_STATUS: &str = "status";

/// 리소스 종류 레이블 키 (jobs, linuxdistros, ...)
pub const LABEL_RESOURCE: &str = "resource";

/// 에러 종류 레이블 키 (conflict, not_found, ...)
pub const LABEL_KIND: &str = "kind";

// ─── HTTP 메트릭 ────────────────────────────────────────────────────

/// HTTP: 처리된 요청 수 (counter, labels: method, status)
pub const HTTP_REQUESTS_TOTAL: &str = "testrack_http_requests_total";

/// HTTP: 요청 처리 지연 시간 (histogram, 초)
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "testrack_http_request_duration_seconds";

/// HTTP: 인증 실패 수 (counter)
pub const HTTP_AUTH_FAILURES_TOTAL: &str = "testrack_http_auth_failures_total";

// ─── Registry 메트릭 ────────────────────────────────────────────────

/// Registry: 생성된 리소스 수 (counter, label: resource)
pub const REGISTRY_RESOURCES_CREATED_TOTAL: &str = "testrack_registry_resources_created_total";

/// Registry: 삭제된 리소스 수 (counter, label: resource)
pub const REGISTRY_RESOURCES_DELETED_TOTAL: &str = "testrack_registry_resources_deleted_total";

/// Registry: 거부된 요청 수 (counter, label: kind)
pub const REGISTRY_REJECTIONS_TOTAL: &str = "testrack_registry_rejections_total";

/// Registry: 중첩 생성 시 재사용된 배포판 수 (counter)
pub const REGISTRY_DISTROS_REUSED_TOTAL: &str = "testrack_registry_distros_reused_total";

// ─── Job 메트릭 ─────────────────────────────────────────────────────

/// Jobs: 현재 저장된 잡 수 (gauge)
pub const JOBS_STORED: &str = "testrack_jobs_stored";

// ─── Daemon 메트릭 ──────────────────────────────────────────────────

/// Daemon: 가동 시간 (gauge, 초)
pub const DAEMON_UPTIME_SECONDS: &str = "testrack_daemon_uptime_seconds";

/// Daemon: 빌드 정보 (gauge, 항상 1, label: version)
pub const DAEMON_BUILD_INFO: &str = "testrack_daemon_build_info";

// ─── 히스토그램 버킷 정의 ────────────────────────────────────────────

/// 요청 처리 지연 시간 히스토그램 버킷 (초)
///
/// 100us ~ 1s 범위, 인메모리 저장소 기준
pub const REQUEST_DURATION_BUCKETS: [f64; 8] = [0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 1.0];

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
/// 일반적으로 `testrack-daemon`의 시작 시점에서 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    // HTTP
    describe_counter!(
        HTTP_REQUESTS_TOTAL,
        "Total number of HTTP requests handled, by method and status"
    );
    describe_histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "HTTP request handling latency in seconds"
    );
    describe_counter!(
        HTTP_AUTH_FAILURES_TOTAL,
        "Total number of requests rejected for missing or invalid credentials"
    );

    // Registry
    describe_counter!(
        REGISTRY_RESOURCES_CREATED_TOTAL,
        "Total number of resources created, by resource"
    );
    describe_counter!(
        REGISTRY_RESOURCES_DELETED_TOTAL,
        "Total number of resources deleted (including cascaded), by resource"
    );
    describe_counter!(
        REGISTRY_REJECTIONS_TOTAL,
        "Total number of rejected operations, by error kind"
    );
    describe_counter!(
        REGISTRY_DISTROS_REUSED_TOTAL,
        "Total number of test environments that reused an existing distro"
    );

    // Jobs
    describe_gauge!(JOBS_STORED, "Number of jobs currently stored");

    // Daemon
    describe_gauge!(DAEMON_UPTIME_SECONDS, "Daemon uptime in seconds");
    describe_gauge!(DAEMON_BUILD_INFO, "Build information (always 1)");
}
