mod tests {
    use embassy_time::{Duration, Instant};
    use kelvin_strip::fade::PowerFade;

    const DURATION: Duration = Duration::from_millis(1000);

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_steady_fade() {
        let mut fade = PowerFade::steady(255, DURATION);
        assert!(!fade.is_active());
        assert_eq!(fade.scale(at(0)), 255);
        assert_eq!(fade.scale(at(10_000)), 255);

        let mut fade = PowerFade::for_power(false, DURATION);
        assert_eq!(fade.scale(at(0)), 0);
    }

    #[test]
    fn test_fade_in() {
        let mut fade = PowerFade::steady(0, DURATION);
        fade.start(255, at(0));
        assert!(fade.is_active());
        assert_eq!(fade.target(), 255);

        assert_eq!(fade.scale(at(0)), 0);
        assert_eq!(fade.scale(at(500)), 127);
        assert!(fade.is_active());
        assert_eq!(fade.scale(at(1000)), 255);
        assert!(!fade.is_active());
        assert_eq!(fade.scale(at(1500)), 255);
        assert_eq!(fade.scale(at(60_000)), 255);
    }

    #[test]
    fn test_fade_out() {
        let mut fade = PowerFade::steady(255, DURATION);
        fade.start(0, at(2000));
        assert_eq!(fade.scale(at(2000)), 255);
        assert_eq!(fade.scale(at(2500)), 128);
        assert_eq!(fade.scale(at(3200)), 0);
        assert!(!fade.is_active());
    }

    #[test]
    fn test_retrigger_starts_from_emitted_value() {
        let mut fade = PowerFade::steady(0, DURATION);
        fade.start(255, at(0));
        assert_eq!(fade.scale(at(400)), 102);

        // Toggled back off mid-fade: continue from 102, not from 255
        fade.start(0, at(400));
        assert_eq!(fade.scale(at(400)), 102);
        assert_eq!(fade.scale(at(900)), 51);
        assert_eq!(fade.scale(at(1400)), 0);
        assert!(!fade.is_active());
    }

    #[test]
    fn test_retrigger_is_continuous() {
        let mut fade = PowerFade::steady(0, DURATION);
        fade.start(255, at(0));
        let mut last = fade.scale(at(0));
        let mut target = 255;
        for (step, ms) in (1..=3000u64).step_by(7).enumerate() {
            if step > 0 && step % 50 == 0 {
                target = 255 - target;
                fade.start(target, at(ms));
            }
            let value = fade.scale(at(ms));
            // One 7ms step moves at most 255 * 7 / 1000 + 1
            assert!(value.abs_diff(last) <= 3, "jump at {ms}ms: {last} -> {value}");
            last = value;
        }
    }

    #[test]
    fn test_start_at_target_does_not_fade() {
        let mut fade = PowerFade::steady(255, DURATION);
        fade.start(255, at(100));
        assert!(!fade.is_active());
        assert_eq!(fade.scale(at(100)), 255);
    }
}
