mod tests {
    use embassy_time::Instant;
    use heapless::String;
    use kelvin_strip::OutputDriver;
    use kelvin_strip::api::{
        ApiError, ClockTime, ContentType, HttpApi, HttpMethod, RequestContext, ResponseHeaders, Route,
        parse_query, percent_decode,
    };
    use kelvin_strip::color::Rgb;
    use kelvin_strip::config::StripConfig;
    use kelvin_strip::controller::Controller;
    use kelvin_strip::intent::IntentMailbox;
    use kelvin_strip::schedule::TimeOfDay;
    use kelvin_strip::settings::{Settings, SettingsPatch};
    use kelvin_strip::storage::{
        SETTINGS_RECORD_SIZE, SettingsStore, StorageDriver, StorageError, encode_settings,
    };

    const INDEX: &[u8] = b"<!doctype html><title>strip</title>";

    struct NullStrip;

    impl OutputDriver for NullStrip {
        fn write(&mut self, _colors: &[Rgb]) {}
    }

    struct MemoryStorage {
        data: [u8; SETTINGS_RECORD_SIZE],
    }

    impl StorageDriver for MemoryStorage {
        fn read(&mut self, buffer: &mut [u8]) -> Result<(), StorageError> {
            buffer.copy_from_slice(&self.data);
            Ok(())
        }

        fn write(&mut self, buffer: &[u8]) -> Result<(), StorageError> {
            self.data.copy_from_slice(buffer);
            Ok(())
        }
    }

    fn controller(mailbox: &IntentMailbox<2>) -> Controller<'_, NullStrip, MemoryStorage, 8, 2> {
        let storage = MemoryStorage {
            data: encode_settings(&Settings::DEFAULT),
        };
        Controller::boot(
            StripConfig::DEFAULT,
            SettingsStore::new(storage),
            NullStrip,
            mailbox.inbox(),
            Instant::from_millis(0),
        )
    }

    fn context() -> RequestContext<'static> {
        RequestContext {
            ip: "192.168.1.20",
            wifi_connected: true,
            local_time: None,
        }
    }

    #[test]
    fn test_route_resolve() {
        assert_eq!(Route::resolve(HttpMethod::Get, "/"), Route::Index);
        assert_eq!(Route::resolve(HttpMethod::Get, "/api/state"), Route::State);
        assert_eq!(
            Route::resolve(HttpMethod::Get, "/api/set?on=1"),
            Route::Set { query: "on=1" }
        );
        assert_eq!(
            Route::resolve(HttpMethod::Get, "/api/set"),
            Route::Set { query: "" }
        );
        assert_eq!(Route::resolve(HttpMethod::Other, "/"), Route::NotFound);
        assert_eq!(Route::resolve(HttpMethod::Get, "/favicon.ico"), Route::NotFound);
        assert_eq!(HttpMethod::parse("GET"), HttpMethod::Get);
        assert_eq!(HttpMethod::parse("POST"), HttpMethod::Other);
        assert_eq!(HttpMethod::parse("DELETE"), HttpMethod::Other);
    }

    #[test]
    fn test_parse_query() {
        let patch = parse_query(
            "brightness=40&temperature=2700&on=0&schedule=1&onTime=07%3A05&offTime=+22:15",
        );
        let expected = SettingsPatch::new()
            .with_brightness(40)
            .with_temperature(2700)
            .with_power(false)
            .with_schedule(true)
            .with_on_time(TimeOfDay::new(7, 5).unwrap())
            .with_off_time(TimeOfDay::new(22, 15).unwrap());
        assert_eq!(patch, expected);
    }

    #[test]
    fn test_parse_query_skips_garbage() {
        assert!(parse_query("").is_empty());
        assert!(parse_query("brightness=abc&onTime=25:00&foo=1&temperature").is_empty());
        assert!(parse_query("onTime=%zz").is_empty());
        assert!(parse_query("onTime=07:30:00&offTime=7&on=x&schedule=").is_empty());

        // A bad value does not clobber the valid ones around it
        assert_eq!(
            parse_query("brightness=abc&temperature=2700&on=off"),
            SettingsPatch::new().with_temperature(2700)
        );

        // Flags accept any non-zero integer
        assert_eq!(parse_query("on=2"), SettingsPatch::new().with_power(true));
        // Values are clamped later, not dropped
        assert_eq!(
            parse_query("brightness=250"),
            SettingsPatch::new().with_brightness(250)
        );
        // Later keys override earlier ones
        assert_eq!(
            parse_query("brightness=10&brightness=20"),
            SettingsPatch::new().with_brightness(20)
        );
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode::<16>("a%20b").unwrap(), "a b");
        assert_eq!(percent_decode::<16>("a+b").unwrap(), "a b");
        assert_eq!(percent_decode::<16>("%3a%3A").unwrap(), "::");
        assert_eq!(percent_decode::<16>("").unwrap(), "");
        assert_eq!(percent_decode::<16>("%4"), None);
        assert_eq!(percent_decode::<16>("%g0"), None);
        assert_eq!(percent_decode::<16>("%ff"), None);
        assert_eq!(percent_decode::<4>("12345"), None);
    }

    #[test]
    fn test_state_json() {
        let mailbox = IntentMailbox::new();
        let mut controller = controller(&mailbox);
        let api = HttpApi::new(INDEX);
        let mut buffer = [0u8; 256];

        let response = api
            .handle(
                &mut controller,
                HttpMethod::Get,
                "/api/state",
                &context(),
                Instant::from_millis(10),
                &mut buffer,
            )
            .unwrap();
        assert_eq!(response.headers.status, 200);
        assert_eq!(response.headers.content_type, ContentType::Json);
        assert_eq!(response.headers.content_length, response.body.len());
        assert_eq!(
            core::str::from_utf8(response.body).unwrap(),
            r#"{"brightness":70,"temperature":2000,"on":1,"schedule":0,"onTime":"18:00","offTime":"23:30","ip":"192.168.1.20","wifi":"connected","time":"--:--"}"#
        );
    }

    #[test]
    fn test_state_json_with_clock() {
        let mailbox = IntentMailbox::new();
        let mut controller = controller(&mailbox);
        let api = HttpApi::new(INDEX);
        let mut buffer = [0u8; 256];
        let context = RequestContext {
            ip: "10.0.0.2",
            wifi_connected: false,
            local_time: TimeOfDay::new(9, 3),
        };

        let response = api
            .handle(
                &mut controller,
                HttpMethod::Get,
                "/api/state",
                &context,
                Instant::from_millis(10),
                &mut buffer,
            )
            .unwrap();
        let body = core::str::from_utf8(response.body).unwrap();
        assert!(body.ends_with(r#""ip":"10.0.0.2","wifi":"disconnected","time":"09:03"}"#));
    }

    #[test]
    fn test_set_applies_changes() {
        let mailbox = IntentMailbox::new();
        let mut controller = controller(&mailbox);
        let api = HttpApi::new(INDEX);
        let mut buffer = [0u8; 256];

        let response = api
            .handle(
                &mut controller,
                HttpMethod::Get,
                "/api/set?brightness=40&temperature=9000&schedule=1&offTime=01%3A00",
                &context(),
                Instant::from_millis(10),
                &mut buffer,
            )
            .unwrap();
        assert_eq!(
            core::str::from_utf8(response.body).unwrap(),
            r#"{"brightness":40,"temperature":4000,"on":1,"schedule":1,"onTime":"18:00","offTime":"01:00","ip":"192.168.1.20","wifi":"connected","time":"--:--"}"#
        );

        let settings = controller.settings();
        assert_eq!(settings.brightness, 40);
        assert_eq!(settings.temperature, 4000);
        assert!(settings.schedule.enabled);
        assert!(controller.save_pending());
    }

    #[test]
    fn test_index_and_not_found() {
        let mailbox = IntentMailbox::new();
        let mut controller = controller(&mailbox);
        let api = HttpApi::new(INDEX);
        let mut buffer = [0u8; 256];
        let now = Instant::from_millis(10);

        let index = api
            .handle(&mut controller, HttpMethod::Get, "/", &context(), now, &mut buffer)
            .unwrap();
        assert_eq!(index.headers.status, 200);
        assert_eq!(index.headers.content_type, ContentType::TextHtml);
        assert_eq!(index.body, INDEX);

        let missing = api
            .handle(&mut controller, HttpMethod::Get, "/nope", &context(), now, &mut buffer)
            .unwrap();
        assert_eq!(missing.headers.status, 404);
        assert_eq!(missing.body, br#"{"error":"not_found"}"#);
    }

    #[test]
    fn test_small_buffer() {
        let mailbox = IntentMailbox::new();
        let mut controller = controller(&mailbox);
        let api = HttpApi::new(INDEX);
        let mut buffer = [0u8; 16];

        let result = api.handle(
            &mut controller,
            HttpMethod::Get,
            "/api/state",
            &context(),
            Instant::from_millis(10),
            &mut buffer,
        );
        assert_eq!(result.err(), Some(ApiError::ResponseTooLarge));
    }

    #[test]
    fn test_garbage_set_keeps_settings() {
        let mailbox = IntentMailbox::new();
        let mut controller = controller(&mailbox);
        let api = HttpApi::new(INDEX);
        let mut buffer = [0u8; 256];

        api.handle(
            &mut controller,
            HttpMethod::Get,
            "/api/set?brightness=abc&on=x",
            &context(),
            Instant::from_millis(10),
            &mut buffer,
        )
        .unwrap();
        assert_eq!(controller.settings().brightness, 70);
        assert!(controller.settings().power);
    }

    #[test]
    fn test_clock_time_serializes_as_hhmm() {
        let mut buffer = [0u8; 16];
        let len = serde_json_core::to_slice(&ClockTime(None), &mut buffer).unwrap();
        assert_eq!(&buffer[..len], br#""--:--""#);

        let len =
            serde_json_core::to_slice(&ClockTime(TimeOfDay::new(7, 5)), &mut buffer).unwrap();
        assert_eq!(&buffer[..len], br#""07:05""#);
    }

    #[test]
    fn test_response_headers() {
        let headers = ResponseHeaders {
            status: 404,
            content_type: ContentType::Json,
            content_length: 21,
        };
        let mut out = String::<128>::new();
        headers.write_to(&mut out).unwrap();
        assert_eq!(
            out.as_str(),
            "HTTP/1.1 404 Not Found\r\nContent-Type: application/json\r\nContent-Length: 21\r\nConnection: close\r\n\r\n"
        );
    }
}
