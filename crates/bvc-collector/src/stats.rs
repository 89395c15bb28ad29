//! 수집 통계 구조체.

use bvc_data::RefreshReport;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 수집 작업 통계
///
/// 단일 실행이면 `total == 1`, 데몬 모드에서는 실행마다 누적됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionStats {
    /// 총 실행 횟수
    pub total: usize,
    /// 성공 횟수
    pub success: usize,
    /// 실패 횟수 (수집 실패 또는 빈 결과)
    pub errors: usize,
    /// 수집된 총 행 수
    pub rows: usize,
    /// DB에 반영된 총 행 수
    pub stored: usize,
    /// 원천 파일 기록 실패 횟수
    pub file_failures: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl CollectionStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 성공한 갱신 결과 반영
    pub fn record_success(&mut self, report: &RefreshReport) {
        self.total += 1;
        self.success += 1;
        self.rows += report.rows;
        self.stored += report.stored.unwrap_or(0);
        if !report.file_written {
            self.file_failures += 1;
        }
    }

    /// 실패한 실행 반영
    pub fn record_failure(&mut self) {
        self.total += 1;
        self.errors += 1;
    }

    /// 다른 실행 결과를 누적
    pub fn merge(&mut self, other: &CollectionStats) {
        self.total += other.total;
        self.success += other.success;
        self.errors += other.errors;
        self.rows += other.rows;
        self.stored += other.stored;
        self.file_failures += other.file_failures;
        self.elapsed += other.elapsed;
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            success = self.success,
            errors = self.errors,
            rows = self.rows,
            stored = self.stored,
            file_failures = self.file_failures,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "수집 완료"
        );
    }
}
