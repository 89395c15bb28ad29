//! 시간 소스 추상화.
//!
//! 캐시 TTL과 원천 파일 신선도 판정은 모두 `Clock`을 통해 현재 시각을 얻습니다.
//! 테스트에서는 `ManualClock`으로 시간을 직접 진행시킵니다.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// 원천 파일 `Timestamp` 컬럼 형식.
pub const SOURCE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 현재 시각 제공자.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// 현재 시각을 원천 파일 타임스탬프 형식(로컬 시간)으로 반환합니다.
    fn source_timestamp(&self) -> String {
        self.now()
            .with_timezone(&Local)
            .format(SOURCE_TIMESTAMP_FORMAT)
            .to_string()
    }
}

/// 시스템 시계.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 수동으로 진행시키는 시계.
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(start.timestamp_millis()),
        }
    }

    /// 시간을 앞으로 진행합니다.
    pub fn advance(&self, by: Duration) {
        self.millis.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }

    /// 특정 시각으로 설정합니다.
    pub fn set(&self, at: DateTime<Utc>) {
        self.millis.store(at.timestamp_millis(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let millis = self.millis.load(Ordering::SeqCst);
        Utc.timestamp_millis_opt(millis)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let start = Utc.with_ymd_and_hms(2025, 1, 6, 9, 30, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::seconds(61));
        assert_eq!(clock.now(), start + Duration::seconds(61));

        clock.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn test_source_timestamp_format() {
        let clock = ManualClock::new(Utc::now());
        let ts = clock.source_timestamp();
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, SOURCE_TIMESTAMP_FORMAT).is_ok());
    }
}
