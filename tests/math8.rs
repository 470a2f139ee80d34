mod tests {
    use embassy_time::Duration;
    use kelvin_strip::math8::{clamp_u8, lerp8, percent8, scale255};

    #[test]
    fn test_scale255() {
        assert_eq!(scale255(255, 255), 255);
        assert_eq!(scale255(255, 128), 128);
        assert_eq!(scale255(128, 128), 64);
        assert_eq!(scale255(200, 0), 0);
        assert_eq!(scale255(0, 200), 0);
    }

    #[test]
    fn test_percent8() {
        assert_eq!(percent8(255, 100), 255);
        assert_eq!(percent8(255, 50), 127);
        assert_eq!(percent8(99, 1), 0);
        assert_eq!(percent8(200, 0), 0);
    }

    #[test]
    fn test_clamp_u8() {
        assert_eq!(clamp_u8(-1), 0);
        assert_eq!(clamp_u8(128), 128);
        assert_eq!(clamp_u8(300), 255);
    }

    #[test]
    fn test_lerp8() {
        let duration = Duration::from_millis(1000);
        assert_eq!(lerp8(0, 255, Duration::from_millis(0), duration), 0);
        assert_eq!(lerp8(0, 255, Duration::from_millis(500), duration), 127);
        assert_eq!(lerp8(255, 0, Duration::from_millis(500), duration), 128);
        assert_eq!(lerp8(0, 255, Duration::from_millis(1000), duration), 255);
        assert_eq!(lerp8(0, 255, Duration::from_millis(5000), duration), 255);
        assert_eq!(
            lerp8(10, 200, Duration::from_millis(10), Duration::from_millis(0)),
            200
        );
    }
}
