use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn virtual_sleep_advances_without_waiting() {
    let clock = VirtualClock::new(date(2024, 3, 7));
    let wall = std::time::Instant::now();
    clock.sleep(Duration::from_secs(3600)).await;
    clock.sleep(Duration::from_millis(250)).await;
    assert!(wall.elapsed() < Duration::from_secs(5));
    assert_eq!(clock.elapsed(), Duration::from_millis(3_600_250));
    assert_eq!(
        clock.sleeps(),
        vec![Duration::from_secs(3600), Duration::from_millis(250)]
    );
}

#[test]
fn advance_moves_time_without_recording_a_sleep() {
    let clock = VirtualClock::new(date(2024, 3, 7));
    clock.advance(Duration::from_millis(40));
    assert_eq!(clock.elapsed(), Duration::from_millis(40));
    assert!(clock.sleeps().is_empty());
    assert_eq!(clock.today(), date(2024, 3, 7));
}

#[tokio::test(start_paused = true)]
async fn tokio_clock_follows_paused_runtime_time() {
    let clock = TokioClock::new();
    clock.sleep(Duration::from_millis(500)).await;
    assert!(clock.elapsed() >= Duration::from_millis(500));
}

#[test]
fn date_stamp_is_zero_padded_month_day() {
    assert_eq!(format_date_stamp(date(2024, 3, 7)), "03/07");
    assert_eq!(format_date_stamp(date(2023, 12, 25)), "12/25");
}
