mod tests {
    use light_programs::program::{
        Alarm, DeviceHooks, LightProgram, NullHooks, Tick, INACTIVE_FACTOR,
    };

    const TICK: f32 = 0.05;

    #[derive(Default)]
    struct RecordingHooks {
        indicator_events: Vec<bool>,
    }

    impl DeviceHooks for RecordingHooks {
        fn set_indicator(&mut self, on: bool) {
            self.indicator_events.push(on);
        }

        fn set_capture_rate(&mut self, _ticks_per_second: u32) {}
    }

    fn run_ticks(alarm: &mut Alarm, hooks: &mut RecordingHooks, count: usize) {
        for _ in 0..count {
            let mut tick = Tick {
                seconds: TICK,
                speed: 1.0,
                alarm_factor: INACTIVE_FACTOR,
                hooks: &mut *hooks,
            };
            alarm.compute(&mut tick);
        }
    }

    #[test]
    fn test_inactive_alarm_reports_sentinel() {
        let mut alarm = Alarm::new();
        assert_eq!(alarm.factor(), INACTIVE_FACTOR);

        // Without an acquire, ticking changes nothing.
        let mut hooks = RecordingHooks::default();
        run_ticks(&mut alarm, &mut hooks, 10);
        assert_eq!(alarm.factor(), INACTIVE_FACTOR);
        assert!(hooks.indicator_events.is_empty());
    }

    #[test]
    fn test_factor_ramps_up_and_down() {
        let mut alarm = Alarm::new();
        let mut hooks = RecordingHooks::default();
        alarm.acquire(&mut NullHooks).unwrap();
        assert_eq!(alarm.factor(), 0.0);

        // Ramp reaches full brightness at 0.45 seconds.
        run_ticks(&mut alarm, &mut hooks, 9);
        assert!((alarm.factor() - 1.0).abs() < 1e-4);

        // Plateau holds until the fade-out begins at 1.3 seconds.
        run_ticks(&mut alarm, &mut hooks, 16);
        assert!((alarm.factor() - 1.0).abs() < 1e-4);

        // Fully dark once the 2.1 second sound has ended.
        run_ticks(&mut alarm, &mut hooks, 17);
        assert!(alarm.factor().abs() < 1e-4);
    }

    #[test]
    fn test_flash_repeats_then_goes_quiet() {
        let mut alarm = Alarm::new();
        let mut hooks = RecordingHooks::default();
        alarm.acquire(&mut NullHooks).unwrap();

        // One repeat period, the flash starts over.
        run_ticks(&mut alarm, &mut hooks, 51);
        assert_eq!(alarm.sound_count(), 1);
        assert!(alarm.factor() < 0.2);

        // Past ten seconds all four repetitions are done and the alarm
        // stays dark while still acquired.
        run_ticks(&mut alarm, &mut hooks, 155);
        assert_eq!(alarm.sound_count(), 4);
        assert_eq!(alarm.factor(), 0.0);
        run_ticks(&mut alarm, &mut hooks, 20);
        assert_eq!(alarm.factor(), 0.0);
    }

    #[test]
    fn test_indicator_toggles_with_hysteresis() {
        let mut alarm = Alarm::new();
        let mut hooks = RecordingHooks::default();
        alarm.acquire(&mut NullHooks).unwrap();

        // One full period produces exactly one on and one off event even
        // though the factor crosses the threshold region over many ticks.
        run_ticks(&mut alarm, &mut hooks, 50);
        assert_eq!(hooks.indicator_events, vec![true, false]);
    }

    #[test]
    fn test_release_restores_sentinel() {
        let mut alarm = Alarm::new();
        let mut hooks = RecordingHooks::default();
        alarm.acquire(&mut NullHooks).unwrap();
        run_ticks(&mut alarm, &mut hooks, 5);
        assert!(alarm.factor() > 0.0);

        alarm.release(&mut NullHooks);
        assert_eq!(alarm.factor(), INACTIVE_FACTOR);
    }
}
